use thiserror::Error;

use crate::analyzer::SyntaxError;
use crate::config::ConfigError;
use crate::eval::evaluator::EvalError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StacheResult<T> = Result<T, Error>;
