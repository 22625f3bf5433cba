use std::sync::Arc;

use async_recursion::async_recursion;
use tracing::debug;

use super::evaluator::EvalResult;
use super::expression::ExpressionEvaluator;
use super::value::Value;
use crate::ast::{Expression, Statement};

/// Renders statements to text. Each section threads only its enclosing
/// context; there is no context stack.
pub struct StatementEvaluator {
    pub expression_evaluator: Arc<ExpressionEvaluator>,
}

impl Default for StatementEvaluator {
    fn default() -> Self {
        Self {
            expression_evaluator: Arc::new(ExpressionEvaluator::default()),
        }
    }
}

impl StatementEvaluator {
    pub fn new(expression_evaluator: Arc<ExpressionEvaluator>) -> Self {
        Self {
            expression_evaluator,
        }
    }

    pub async fn eval_block(&self, statements: &[Statement], context: &Value) -> EvalResult<String> {
        let mut output = String::new();
        for statement in statements {
            output.push_str(&self.eval_statement(statement, context).await?);
        }
        Ok(output)
    }

    #[async_recursion]
    pub async fn eval_statement(&self, statement: &Statement, context: &Value) -> EvalResult<String> {
        match statement {
            Statement::Text { value } => Ok(value.clone()),
            Statement::Comment { .. } => Ok(String::new()),
            Statement::Mustache { expression } => Ok(self
                .expression_evaluator
                .eval_expression(expression, context)
                .await?
                .to_output_string()),
            Statement::Section {
                expression,
                negated,
                body,
                else_body,
            } => {
                self.eval_section(expression, *negated, body, else_body.as_deref(), context)
                    .await
            }
            Statement::Unknown => {
                debug!("skipping unknown statement");
                Ok(String::new())
            }
        }
    }

    async fn eval_section(
        &self,
        expression: &Expression,
        negated: bool,
        body: &[Statement],
        else_body: Option<&[Statement]>,
        context: &Value,
    ) -> EvalResult<String> {
        let value = self
            .expression_evaluator
            .eval_expression(expression, context)
            .await?;

        if negated {
            return if value.is_truthy() {
                self.eval_else(else_body, context).await
            } else {
                self.eval_block(body, context).await
            };
        }

        match &value {
            Value::Array(items) if !items.is_empty() => {
                let mut output = String::new();
                for item in items {
                    let item_context = if item.is_object() { item } else { context };
                    output.push_str(&self.eval_block(body, item_context).await?);
                }
                Ok(output)
            }
            Value::Object(_) => self.eval_block(body, &value).await,
            _ if value.is_truthy() => self.eval_block(body, context).await,
            _ => self.eval_else(else_body, context).await,
        }
    }

    async fn eval_else(&self, else_body: Option<&[Statement]>, context: &Value) -> EvalResult<String> {
        match else_body {
            Some(statements) => self.eval_block(statements, context).await,
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn section(path: &str, negated: bool, else_body: Option<Vec<Statement>>) -> Statement {
        Statement::Section {
            expression: Expression::path([path]),
            negated,
            body: vec![
                Statement::text("["),
                Statement::Mustache {
                    expression: Expression::path(["name"]),
                },
                Statement::text("]"),
            ],
            else_body,
        }
    }

    async fn render(statement: Statement, context: serde_json::Value) -> String {
        StatementEvaluator::default()
            .eval_statement(&statement, &Value::from(context))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_array_items() {
        let context = json!({ "name": "outer", "items": [{ "name": "a" }, 1, [], { "name": "b" }] });
        assert_eq!(
            render(section("items", false, None), context).await,
            "[a][outer][outer][b]"
        );
    }

    #[tokio::test]
    async fn test_object_and_scalar() {
        let context = json!({ "name": "outer", "user": { "name": "inner" }, "flag": "yes" });
        assert_eq!(
            render(section("user", false, None), context.clone()).await,
            "[inner]"
        );
        assert_eq!(render(section("flag", false, None), context).await, "[outer]");
    }

    #[tokio::test]
    async fn test_falsy_uses_else() {
        let context = json!({ "name": "outer", "items": [], "zero": 0 });
        let otherwise = Some(vec![Statement::text("none")]);
        assert_eq!(
            render(section("items", false, otherwise.clone()), context.clone()).await,
            "none"
        );
        assert_eq!(render(section("zero", false, None), context.clone()).await, "");
        assert_eq!(render(section("missing", false, otherwise), context).await, "none");
    }

    #[tokio::test]
    async fn test_negated() {
        let context = json!({ "name": "outer", "items": [1], "empty": "" });
        let otherwise = Some(vec![Statement::text("else")]);
        assert_eq!(
            render(section("empty", true, otherwise.clone()), context.clone()).await,
            "[outer]"
        );
        assert_eq!(render(section("items", true, otherwise), context.clone()).await, "else");
        assert_eq!(render(section("items", true, None), context).await, "");
    }

    #[tokio::test]
    async fn test_comment_and_unknown_emit_nothing() {
        let evaluator = StatementEvaluator::default();
        let statements = vec![
            Statement::text("a"),
            Statement::Comment {
                value: "hidden".to_string(),
            },
            Statement::Unknown,
            Statement::text("b"),
        ];
        assert_eq!(
            evaluator
                .eval_block(&statements, &Value::Undefined)
                .await
                .unwrap(),
            "ab"
        );
    }
}
