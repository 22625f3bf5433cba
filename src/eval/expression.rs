use async_recursion::async_recursion;
use tracing::debug;

use super::context::PathResolver;
use super::evaluator::{EvalError, EvalResult};
use super::helper::HelperRegistry;
use super::value::Value;
use crate::ast::Expression;

pub struct ExpressionEvaluator {
    helpers: HelperRegistry,
    resolver: PathResolver,
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new(HelperRegistry::new(), PathResolver::default())
    }
}

impl ExpressionEvaluator {
    pub fn new(helpers: HelperRegistry, resolver: PathResolver) -> Self {
        Self { helpers, resolver }
    }

    #[async_recursion]
    pub async fn eval_expression(&self, expr: &Expression, context: &Value) -> EvalResult<Value> {
        match expr {
            Expression::Literal { value } => Ok(Value::String(value.clone())),
            Expression::Path { segments } => Ok(self.resolver.resolve(context, segments)),
            Expression::HelperCall { name, arguments } => {
                self.eval_helper_call(name, arguments, context).await
            }
        }
    }

    async fn eval_helper_call(
        &self,
        name: &str,
        arguments: &[Expression],
        context: &Value,
    ) -> EvalResult<Value> {
        // left to right, one at a time
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.eval_expression(argument, context).await?);
        }

        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| EvalError::UnknownHelper(name.to_string()))?;

        debug!(helper = name, arguments = values.len(), "invoking helper");
        helper
            .call(values)
            .await
            .map_err(|source| EvalError::HelperExecution {
                name: name.to_string(),
                source,
            })
    }
}
