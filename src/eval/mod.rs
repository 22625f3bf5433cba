//! # Template Evaluator
//!
//! Walks a syntax tree and renders it against a context [`Value`](value::Value).
//!
//! * [`evaluator`]: entry point, version check and [`EvalError`](evaluator::EvalError)
//! * [`statement`]: text, mustaches and sections
//! * [`expression`]: literals, paths and helper calls
//! * [`context`]: path resolution with the unsafe key denylist
//! * [`helper`]: the [`Helper`](helper::Helper) trait and the shared registry
//! * [`builtin`]: opt-in helpers such as `upper` or `join`
//!
//! A render is sequential. The only suspension points are helper calls, and
//! the tree is never mutated, so one tree can be rendered by many tasks at
//! once.

pub mod builtin;
pub mod context;
pub mod evaluator;
pub mod expression;
pub mod helper;
pub mod statement;
pub mod value;
