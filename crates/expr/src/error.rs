use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Expression parse error in '{0}': {1}")]
    Parse(String, String),

    #[error("Unable to find the variable '{0}'")]
    UnknownVariable(String),
}
