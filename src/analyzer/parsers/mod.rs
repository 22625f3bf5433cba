pub mod expression;
pub mod statement;

pub use statement::parse_template;
