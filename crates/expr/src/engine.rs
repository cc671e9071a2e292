//! Evaluates parsed expressions against a set of typed variables.

use std::collections::HashMap;
use std::fmt;

use super::ast::*;
use crate::error::ExprError;
use vista_types::parse_float_prefix;

/// The result of evaluating an expression or the value of a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f32),
    Str(String),
}

impl Value {
    pub fn to_number(&self) -> f32 {
        match self {
            Value::Number(n) => *n,
            Value::Str(s) => parse_float_prefix(s),
        }
    }

    pub fn is_truthy(&self) -> bool {
        self.to_number() != 0.0
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Typed value for a raw variable: `true`/`false` become 1/0 and
    /// everything else stays a string.
    pub fn from_variable_text(text: &str) -> Value {
        match text {
            "true" => Value::Number(1.0),
            "false" => Value::Number(0.0),
            other => Value::Str(other.to_string()),
        }
    }
}

/// Numbers print with six decimals, strings verbatim.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{:.6}", n),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

/// Anything that can answer variable lookups during evaluation.
pub trait VariableSource {
    fn lookup(&self, name: &str) -> Option<Value>;
}

impl VariableSource for HashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

pub fn evaluate(expr: &Expression, vars: &dyn VariableSource) -> Result<Value, ExprError> {
    match expr {
        Expression::Number(n) => Ok(Value::Number(*n)),
        Expression::Literal(s) => Ok(Value::Str(s.clone())),
        Expression::Variable(name) => vars
            .lookup(name)
            .ok_or_else(|| ExprError::UnknownVariable(name.clone())),
        Expression::UnaryOp { op, expr } => {
            let value = evaluate(expr, vars)?;
            Ok(match op {
                UnaryOperator::Minus => Value::Number(-value.to_number()),
                UnaryOperator::Not => Value::from(value.to_number() == 0.0),
            })
        }
        Expression::BinaryOp { left, op, right } => {
            let left = evaluate(left, vars)?;
            let right = evaluate(right, vars)?;
            Ok(apply_binary(*op, left, right))
        }
    }
}

fn apply_binary(op: BinaryOperator, left: Value, right: Value) -> Value {
    use BinaryOperator::*;

    match op {
        Plus => match left {
            Value::Str(s) => Value::Str(format!("{}{}", s, right)),
            Value::Number(n) => Value::Number(n + right.to_number()),
        },
        Minus => Value::Number(left.to_number() - right.to_number()),
        Multiply => Value::Number(left.to_number() * right.to_number()),
        Divide => {
            let divisor = right.to_number();
            if divisor == 0.0 {
                Value::Number(0.0)
            } else {
                Value::Number(left.to_number() / divisor)
            }
        }
        Power => Value::Number(left.to_number().powf(right.to_number())),
        ShiftLeft => {
            let shifted = (left.to_number() as i32).wrapping_shl(right.to_number() as u32);
            Value::Number(shifted as f32)
        }
        ShiftRight => {
            let shifted = (left.to_number() as i32).wrapping_shr(right.to_number() as u32);
            Value::Number(shifted as f32)
        }
        LessThan => Value::from(left.to_number() < right.to_number()),
        LessThanOrEqual => Value::from(left.to_number() <= right.to_number()),
        GreaterThan => Value::from(left.to_number() > right.to_number()),
        GreaterThanOrEqual => Value::from(left.to_number() >= right.to_number()),
        And => Value::from(left.is_truthy() && right.is_truthy()),
        Or => Value::from(left.is_truthy() || right.is_truthy()),
        Equals => Value::from(values_equal(&left, &right)),
        NotEquals => Value::from(!values_equal(&left, &right)),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Str(a), other) => *a == other.to_string(),
        (Value::Number(a), other) => *a == other.to_number(),
    }
}
