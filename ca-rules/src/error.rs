use thiserror::Error;

/// An error that can occur when parsing a rule string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ParseRuleError {
    /// The syntax of the rule string is invalid.
    #[error("The syntax of the rule string is invalid")]
    InvalidSyntax,
    /// The birth or survival condition is invalid.
    #[error("The birth or survival condition is invalid")]
    InvalidCondition,
}
