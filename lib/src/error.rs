use crate::engine::{EngineState, Operation};
use ca_rules::ParseRuleError;
use thiserror::Error;

/// An error in the configuration of a simulation.
///
/// These are reported before any simulation starts, and are never recovered from.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The elementary rule number is outside `0..=255`.
    ///
    /// Wide enough to hold both a negative number and any parsed `u64`.
    #[error("The rule number {0} is outside 0..=255")]
    InvalidRuleNumber(i128),

    /// A stored lookup table does not match its rule number.
    #[error("The lookup table does not match rule number {0}")]
    InvalidRuleTable(u8),

    /// The survival range or the birth count of a Life-like rule is invalid.
    #[error(
        "The survival range {survive_min}..={survive_max} or the birth count {birth_count} is invalid"
    )]
    InvalidLifeRule {
        /// Lower bound of the survival range.
        survive_min: u8,
        /// Upper bound of the survival range.
        survive_max: u8,
        /// Birth count.
        birth_count: u8,
    },

    /// The rule string cannot be parsed.
    #[error("The rule string is invalid: {0}")]
    InvalidRule(#[from] ParseRuleError),

    /// The rule can be parsed, but is not supported.
    #[error("The rule is not supported")]
    UnsupportedRule,

    /// The width or height is zero, or the rows of a grid have different lengths.
    #[error("The width or height is zero, or the rows have different lengths")]
    InvalidSize,

    /// The density is outside `0..=1`.
    #[error("The density {0} is outside 0..=1")]
    InvalidDensity(f64),

    /// A pattern contains a character other than `.` or `o`.
    #[error("The pattern contains an invalid character")]
    InvalidPattern,

    /// A world, pattern, or position does not have the dimensionality of the automaton.
    #[error("The dimensions do not match the automaton")]
    DimensionMismatch,

    /// A saved engine is idle but has a simulation, or is not idle but has none.
    #[error("The engine state does not match its simulation")]
    InconsistentState,
}

/// An error that can occur when using a simulation.
///
/// Every error is a violation of the caller's contract. The engine is left unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum Error {
    /// The configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// An index is outside a 1-dimensional world.
    #[error("The index {index} is out of bounds for a line of {len} cells")]
    OutOfBounds {
        /// The index.
        index: usize,
        /// The number of cells in the line.
        len: usize,
    },

    /// An operation is not allowed in the current state of the engine.
    #[error("Cannot {operation} while the engine is {state}")]
    InvalidState {
        /// The rejected operation.
        operation: Operation,
        /// The state of the engine.
        state: EngineState,
    },
}
