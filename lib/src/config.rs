use crate::{
    boundary::Boundary,
    engine::Seed,
    error::ConfigError,
    rule::{LifeRule, RuleTable},
    world::{Automaton, Dimensions, World},
};
use ca_rules::{parse_rule, Rule};
#[cfg(feature = "clap")]
use clap::Args;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The rule used for a 1-dimensional world when none is given.
pub const DEFAULT_ELEMENTARY_RULE: &str = "W30";

/// The rule used for a 2-dimensional world when none is given.
pub const DEFAULT_LIFE_RULE: &str = "B3/S23";

/// The configuration of a simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "clap", derive(Args))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// The rule string of the cellular automaton.
    ///
    /// The following rules are supported:
    ///
    /// - [Elementary rules](https://conwaylife.com/wiki/Elementary_cellular_automaton),
    ///   written as `W30`, `Rule 30` or `30`. The world must be 1-dimensional.
    ///
    /// - [Life-like rules](https://conwaylife.com/wiki/Life-like_cellular_automaton)
    ///   with a single birth count and a survival range without gaps, written as
    ///   `B3/S23`, `b3s23` or `23/3`. The world must be 2-dimensional.
    ///
    /// The default is `W30` for a 1-dimensional world, and `B3/S23` (Conway's Game of Life)
    /// for a 2-dimensional world.
    #[cfg_attr(feature = "clap", arg(short, long = "rule"))]
    pub rule_str: Option<String>,

    /// Width of the world.
    pub width: usize,

    /// Height of the world.
    ///
    /// If this is [`None`], the world is 1-dimensional.
    pub height: Option<usize>,

    /// How neighbors are counted at the edges of a 2-dimensional world.
    #[cfg_attr(
        feature = "clap",
        arg(short, long, value_enum, default_value = "toroidal")
    )]
    pub boundary: Boundary,

    /// Randomize the world after the start.
    ///
    /// Each cell is alive with this probability, which must be in `0..=1`.
    #[cfg_attr(feature = "clap", arg(short, long))]
    pub density: Option<f64>,

    /// The initial pattern, as rows of `.` and `o` separated by newlines or `$`.
    ///
    /// The pattern is placed in the middle of the world. It must fit in the world.
    ///
    /// If this is [`None`], a 1-dimensional world starts from a single living cell in the
    /// middle, and a 2-dimensional world starts empty.
    #[cfg_attr(feature = "clap", arg(short, long))]
    pub pattern: Option<String>,

    /// Random seed for randomizing the world.
    ///
    /// If this is [`None`], then the seed is randomly generated.
    #[cfg_attr(feature = "clap", arg(long))]
    pub seed: Option<u64>,

    /// Time between two generations while running, in milliseconds.
    #[cfg_attr(feature = "clap", arg(short, long, default_value = "50"))]
    pub interval: u64,
}

impl Config {
    /// Create a new configuration.
    ///
    /// If `height` is [`None`], the world is 1-dimensional.
    #[inline]
    pub const fn new(width: usize, height: Option<usize>) -> Self {
        Self {
            rule_str: None,
            width,
            height,
            boundary: Boundary::Toroidal,
            density: None,
            pattern: None,
            seed: None,
            interval: 50,
        }
    }

    /// Set the rule string.
    ///
    /// See [`rule_str`](Config::rule_str) for more details.
    #[inline]
    pub fn with_rule(mut self, rule_str: &str) -> Self {
        self.rule_str = Some(rule_str.to_string());
        self
    }

    /// Set the boundary.
    ///
    /// See [`boundary`](Config::boundary) for more details.
    #[inline]
    pub const fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the density of the random initial world.
    ///
    /// See [`density`](Config::density) for more details.
    #[inline]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }

    /// Set the initial pattern.
    ///
    /// See [`pattern`](Config::pattern) for more details.
    #[inline]
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    /// Set the random seed.
    ///
    /// See [`seed`](Config::seed) for more details.
    #[inline]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the time between two generations, in milliseconds.
    ///
    /// See [`interval`](Config::interval) for more details.
    #[inline]
    pub const fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    /// The size of the world.
    #[inline]
    pub const fn dimensions(&self) -> Dimensions {
        match self.height {
            None => Dimensions::Line(self.width),
            Some(rows) => Dimensions::Grid {
                rows,
                cols: self.width,
            },
        }
    }

    /// The time between two generations.
    #[inline]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }

    /// Parse the rule string, or the default rule for the dimensionality of the world.
    pub fn parse_rule(&self) -> Result<Rule, ConfigError> {
        let rule_str = self.rule_str.as_deref().unwrap_or(match self.height {
            None => DEFAULT_ELEMENTARY_RULE,
            Some(_) => DEFAULT_LIFE_RULE,
        });
        Ok(parse_rule(rule_str)?)
    }

    /// The automaton described by the rule string and the boundary.
    ///
    /// Elementary rules require a 1-dimensional world, and Life-like rules require a
    /// 2-dimensional world.
    pub fn automaton(&self) -> Result<Automaton, ConfigError> {
        let rule = self.parse_rule()?;

        match (self.height, rule.is_elementary()) {
            (None, true) => RuleTable::from_rule(&rule).map(Automaton::Elementary),
            (Some(_), false) => Ok(Automaton::Life {
                rule: LifeRule::from_rule(&rule)?,
                boundary: self.boundary,
            }),
            _ => Err(ConfigError::DimensionMismatch),
        }
    }

    /// The initial world, with the pattern placed in the middle.
    pub fn initial_seed(&self) -> Result<Seed, ConfigError> {
        let dimensions = self.dimensions();

        let Some(pattern) = &self.pattern else {
            return Ok(Seed::Blank(dimensions));
        };

        let pattern = World::parse(pattern, dimensions)?;
        let mut world = World::blank(dimensions)?;
        world.place_centered(&pattern)?;
        Ok(Seed::World(world))
    }

    /// Check whether the configuration is valid.
    pub fn check(self) -> Result<Self, ConfigError> {
        if self.width == 0 || self.height == Some(0) {
            return Err(ConfigError::InvalidSize);
        }

        if let Some(density) = self.density {
            if !(0.0..=1.0).contains(&density) {
                return Err(ConfigError::InvalidDensity(density));
            }
        }

        self.automaton()?;
        self.initial_seed()?;

        Ok(self)
    }
}
