//! Expression language used by theme `if` filters and computed variables.
//!
//! Supports numbers, quoted strings, variables (`name`, `{name}` or
//! `${name}`), arithmetic, shifts, comparisons and boolean operators.

pub mod ast;
pub mod engine;
pub mod error;
pub mod parser;

pub use ast::{BinaryOperator, Expression, UnaryOperator};
pub use engine::{Value, VariableSource, evaluate};
pub use error::ExprError;
pub use parser::parse_expression;

/// Parses and evaluates `input` in one step.
pub fn eval_str(input: &str, vars: &dyn VariableSource) -> Result<Value, ExprError> {
    let expr = parse_expression(input)?;
    evaluate(&expr, vars)
}
