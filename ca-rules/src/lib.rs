//! A crate for parsing rule strings of elementary and Life-like cellular automata.
//!
//! The parsed [`Rule`] is only a description of what the string says. Whether a
//! simulator supports it is up to the simulator.

#![warn(clippy::missing_const_for_fn)]
#![warn(missing_docs)]

mod error;
mod parse;
mod rule;

pub use error::ParseRuleError;
pub use parse::{parse_elementary, parse_life_like, parse_rule};
pub use rule::{Rule, LIFE_NEIGHBORHOOD_SIZE};
