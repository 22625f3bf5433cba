use std::sync::Arc;

use thiserror::Error;

use super::{
    context::PathResolver, expression::ExpressionEvaluator, helper::HelperError,
    helper::HelperRegistry, statement::StatementEvaluator, value::Value,
};
use crate::ast::{Template, FORMAT_VERSION, MAX_NESTING_DEPTH};

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("unsupported syntax tree version {found}, expected {expected}")]
    UnsupportedVersion { found: i64, expected: i64 },
    #[error("syntax tree nests {depth} levels deep, at most {limit} are supported")]
    NestingTooDeep { depth: usize, limit: usize },
    #[error("unknown helper `{0}`")]
    UnknownHelper(String),
    #[error("helper `{name}` failed: {source}")]
    HelperExecution { name: String, source: HelperError },
}

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Default)]
pub struct Evaluator {
    statement_evaluator: StatementEvaluator,
}

impl Evaluator {
    pub fn new(helpers: HelperRegistry, resolver: PathResolver) -> Self {
        Self {
            statement_evaluator: StatementEvaluator::new(Arc::new(ExpressionEvaluator::new(
                helpers, resolver,
            ))),
        }
    }

    /// Top level entry point: renders a whole template against `context`.
    ///
    /// The tree version and nesting depth are checked before anything is
    /// evaluated.
    #[tracing::instrument(level = "debug", skip_all, fields(version = template.version))]
    pub async fn run(&self, template: &Template, context: &Value) -> EvalResult<String> {
        if template.version != FORMAT_VERSION {
            return Err(EvalError::UnsupportedVersion {
                found: template.version,
                expected: FORMAT_VERSION,
            });
        }
        let depth = template.nesting_depth();
        if depth > MAX_NESTING_DEPTH {
            return Err(EvalError::NestingTooDeep {
                depth,
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.statement_evaluator
            .eval_block(&template.statements, context)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;

    #[tokio::test]
    async fn test_version_mismatch() {
        let evaluator = Evaluator::default();
        for version in [-1, 0, 2, 1_000_000_000] {
            let mut template = Template::new(vec![Statement::text("never")]);
            template.version = version;
            let error = evaluator.run(&template, &Value::Undefined).await.unwrap_err();
            assert!(matches!(
                error,
                EvalError::UnsupportedVersion { found, expected: FORMAT_VERSION } if found == version
            ));
        }
    }

    #[tokio::test]
    async fn test_deep_tree_is_rejected() {
        let section = |inner: Statement| Statement::Section {
            expression: crate::ast::Expression::path(["a"]),
            negated: false,
            body: vec![inner],
            else_body: None,
        };
        let nested = |depth: usize| {
            Template::new(vec![(0..depth).fold(Statement::text("x"), |inner, _| section(inner))])
        };
        let context = Value::from(serde_json::json!({ "a": true }));
        let evaluator = Evaluator::default();

        let output = evaluator
            .run(&nested(MAX_NESTING_DEPTH), &context)
            .await
            .unwrap();
        assert_eq!(output, "x");

        let error = evaluator
            .run(&nested(MAX_NESTING_DEPTH + 1), &context)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            EvalError::NestingTooDeep { depth, limit: MAX_NESTING_DEPTH } if depth == MAX_NESTING_DEPTH + 1
        ));
    }

    #[tokio::test]
    async fn test_run() {
        let template = Template::new(vec![Statement::text("Lorem ipsum")]);
        let output = Evaluator::default()
            .run(&template, &Value::Undefined)
            .await
            .unwrap();
        assert_eq!(output, "Lorem ipsum");
    }
}
