//! A library for simulating elementary and Life-like cellular automata.
//!
//! An [`Engine`] owns a single simulation. It is advanced one tick at a time by a driver,
//! and its cells can be edited between ticks.
//!
//! # Example
//!
//! ```
//! use cellsim_lib::{Config, Engine};
//!
//! // Rule 90 on a line of 9 cells, starting from a single living cell in the middle.
//! let config = Config::new(9, None).with_rule("W90").check().unwrap();
//! let mut engine = Engine::from_config(&config).unwrap();
//!
//! assert_eq!(engine.step().unwrap().world().to_string(), "...o.o...");
//! assert_eq!(engine.step().unwrap().world().to_string(), "..o...o..");
//! ```

#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::use_self)]
#![warn(missing_docs)]

mod boundary;
mod config;
mod engine;
mod error;
mod grid;
mod rule;
mod world;

pub use boundary::Boundary;
pub use ca_rules::Rule;
pub use config::{Config, DEFAULT_ELEMENTARY_RULE, DEFAULT_LIFE_RULE};
pub use engine::{Edit, Engine, EngineState, Operation, Seed, DEFAULT_DENSITY};
pub use error::{ConfigError, Error};
pub use grid::{Grid, Line};
pub use rule::{CellState, LifeRule, RuleTable};
pub use world::{Automaton, Dimensions, Generation, Position, World};
