//! Template syntax tree.
//!
//! The tree is the contract between the compiler front-end and the evaluator.
//! It serializes to JSON with a `kind` tag on every node, so trees produced
//! elsewhere can be deserialized and run directly as long as their `version`
//! equals [`FORMAT_VERSION`].
//!
//! The node tag field is `kind`. Trees written by tools that tag nodes with
//! `type` instead must be converted before [`Template::from_json`] accepts
//! them; a `type`-tagged tree fails with a serialization error.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Syntax tree format understood by the current evaluator.
pub const FORMAT_VERSION: i64 = 1;

/// Deepest nesting of sections, or of helper calls inside one expression,
/// that the parser accepts and the evaluator runs.
pub const MAX_NESTING_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemplateKind {
    #[default]
    #[serde(rename = "TEMPLATE")]
    Template,
}

// Root of a compiled template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub kind: TemplateKind,
    pub version: i64,
    pub statements: Vec<Statement>,
}

impl Template {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            kind: TemplateKind::Template,
            version: FORMAT_VERSION,
            statements,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deepest section nesting or helper call nesting in the tree, whichever
    /// is larger. Walks with an explicit stack, so any tree can be measured.
    pub fn nesting_depth(&self) -> usize {
        enum Node<'a> {
            Statement(&'a Statement, usize),
            Expression(&'a Expression, usize),
        }

        let mut deepest = 0;
        let mut stack: Vec<Node> = self
            .statements
            .iter()
            .map(|statement| Node::Statement(statement, 0))
            .collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Statement(Statement::Mustache { expression }, _) => {
                    stack.push(Node::Expression(expression, 0));
                }
                Node::Statement(
                    Statement::Section {
                        expression,
                        body,
                        else_body,
                        ..
                    },
                    sections,
                ) => {
                    deepest = deepest.max(sections + 1);
                    stack.push(Node::Expression(expression, 0));
                    for statement in body.iter().chain(else_body.iter().flatten()) {
                        stack.push(Node::Statement(statement, sections + 1));
                    }
                }
                Node::Statement(_, _) => {}
                Node::Expression(Expression::HelperCall { arguments, .. }, calls) => {
                    deepest = deepest.max(calls + 1);
                    for argument in arguments {
                        stack.push(Node::Expression(argument, calls + 1));
                    }
                }
                Node::Expression(_, _) => {}
            }
        }
        deepest
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Statement {
    Text {
        value: String,
    },
    Comment {
        value: String,
    },
    Mustache {
        expression: Expression,
    },
    Section {
        expression: Expression,
        #[serde(default)]
        negated: bool,
        body: Vec<Statement>,
        #[serde(
            rename = "elseBody",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        else_body: Option<Vec<Statement>>,
    },
    /// Any statement kind this evaluator does not know. Evaluates to nothing.
    #[serde(other)]
    Unknown,
}

impl Statement {
    pub fn text(value: impl Into<String>) -> Self {
        Statement::Text {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Expression {
    Literal {
        value: String,
    },
    Path {
        segments: Vec<String>,
    },
    HelperCall {
        name: String,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    pub fn literal(value: impl Into<String>) -> Self {
        Expression::Literal {
            value: value.into(),
        }
    }

    pub fn path<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Expression::Path {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Name a section opened with this expression must be closed with.
    pub fn block_name(&self) -> String {
        match self {
            Expression::Literal { value } => value.clone(),
            Expression::Path { segments } => segments.join("."),
            Expression::HelperCall { name, .. } => name.clone(),
        }
    }
}
