use crate::error::ConfigError;
use ca_rules::{Rule, LIFE_NEIGHBORHOOD_SIZE};
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    ops::Not,
};

/// The state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellState {
    /// The cell is dead.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "0"))]
    Dead = 0,

    /// The cell is alive.
    #[cfg_attr(feature = "serde", serde(rename = "1"))]
    Alive = 1,
}

impl CellState {
    /// Whether the cell is alive.
    #[inline]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    /// Sample a cell that is alive with probability `density`.
    ///
    /// The cell is alive iff `uniform[0, 1) + density >= 1`. So a density of `0`
    /// never gives a living cell, and a density of `1` always does.
    #[inline]
    pub fn with_density<R: Rng + ?Sized>(rng: &mut R, density: f64) -> Self {
        Self::from(rng.gen::<f64>() + density >= 1.0)
    }
}

impl From<bool> for CellState {
    #[inline]
    fn from(alive: bool) -> Self {
        if alive {
            Self::Alive
        } else {
            Self::Dead
        }
    }
}

impl Not for CellState {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        match self {
            Self::Dead => Self::Alive,
            Self::Alive => Self::Dead,
        }
    }
}

impl Distribution<CellState> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CellState {
        CellState::from(rng.gen::<bool>())
    }
}

/// The lookup table of an elementary rule.
///
/// The table has 8 entries, one for each pattern of a cell and its left and right neighbors.
/// Entry `0` is for the pattern `111`, and entry `7` is for the pattern `000`. Reading the
/// entries in order gives the 8-digit binary expansion of the rule number. This is the
/// numbering introduced by Wolfram.
///
/// For example, rule 30 is `00011110` in binary:
///
/// ```text
/// pattern    111 110 101 100 011 010 001 000
/// successor   0   0   0   1   1   1   1   0
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRuleTable"))]
pub struct RuleTable {
    /// The Wolfram number of the rule.
    number: u8,

    /// The lookup table.
    table: [CellState; 8],
}

/// A deserialized [`RuleTable`] that has not been checked yet.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawRuleTable {
    number: u8,
    table: [CellState; 8],
}

#[cfg(feature = "serde")]
impl TryFrom<RawRuleTable> for RuleTable {
    type Error = ConfigError;

    fn try_from(raw: RawRuleTable) -> Result<Self, Self::Error> {
        let rule = Self::new(raw.number);
        if rule.table != raw.table {
            return Err(ConfigError::InvalidRuleTable(raw.number));
        }
        Ok(rule)
    }
}

impl fmt::Debug for RuleTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleTable")
            .field("number", &self.number)
            .field("table", &format_args!("{:#010b}", self.number))
            .finish()
    }
}

impl RuleTable {
    /// Create a rule table from a rule number.
    pub fn new(number: u8) -> Self {
        let table = std::array::from_fn(|i| CellState::from((number >> (7 - i)) & 1 == 1));
        Self { number, table }
    }

    /// Create a rule table from a rule number that may be out of range.
    ///
    /// Numbers outside `0..=255` are rejected, never clamped.
    pub fn decode(rule_number: i64) -> Result<Self, ConfigError> {
        u8::try_from(rule_number)
            .map(Self::new)
            .map_err(|_| ConfigError::InvalidRuleNumber(rule_number.into()))
    }

    /// Create a rule table from a parsed [`Rule`].
    ///
    /// Only elementary rules are supported.
    pub fn from_rule(rule: &Rule) -> Result<Self, ConfigError> {
        match rule {
            Rule::Elementary { number } => u8::try_from(*number)
                .map(Self::new)
                .map_err(|_| ConfigError::InvalidRuleNumber((*number).into())),
            Rule::LifeLike { .. } => Err(ConfigError::UnsupportedRule),
        }
    }

    /// The Wolfram number of the rule.
    #[inline]
    pub const fn number(&self) -> u8 {
        self.number
    }

    /// The entries of the table, from pattern `111` to pattern `000`.
    #[inline]
    pub const fn entries(&self) -> &[CellState; 8] {
        &self.table
    }

    /// The next state of a cell, given its current state and the states of its neighbors.
    #[inline]
    pub fn next(&self, left: CellState, center: CellState, right: CellState) -> CellState {
        let pattern = (left as usize) << 2 | (center as usize) << 1 | right as usize;
        self.table[7 - pattern]
    }
}

impl Display for RuleTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.number)
    }
}

/// A 2-state Life-like rule with a survival range and a single birth count.
///
/// - A living cell stays alive iff its number of living neighbors is in
///   `survive_min..=survive_max`.
/// - A dead cell becomes alive iff its number of living neighbors is exactly `birth_count`.
///
/// The default is Conway's Game of Life, `B3/S23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLifeRule"))]
pub struct LifeRule {
    survive_min: u8,
    survive_max: u8,
    birth_count: u8,
}

/// A deserialized [`LifeRule`] that has not been checked yet.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawLifeRule {
    survive_min: u8,
    survive_max: u8,
    birth_count: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLifeRule> for LifeRule {
    type Error = ConfigError;

    fn try_from(raw: RawLifeRule) -> Result<Self, Self::Error> {
        Self::decode(raw.survive_min, raw.survive_max, raw.birth_count)
    }
}

impl Default for LifeRule {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl LifeRule {
    /// Conway's Game of Life.
    pub const CLASSIC: Self = Self {
        survive_min: 2,
        survive_max: 3,
        birth_count: 3,
    };

    /// Create a rule from its thresholds.
    ///
    /// Requires `survive_min <= survive_max <= 8` and `birth_count <= 8`.
    pub const fn decode(
        survive_min: u8,
        survive_max: u8,
        birth_count: u8,
    ) -> Result<Self, ConfigError> {
        if survive_min > survive_max
            || survive_max > LIFE_NEIGHBORHOOD_SIZE
            || birth_count > LIFE_NEIGHBORHOOD_SIZE
        {
            return Err(ConfigError::InvalidLifeRule {
                survive_min,
                survive_max,
                birth_count,
            });
        }

        Ok(Self {
            survive_min,
            survive_max,
            birth_count,
        })
    }

    /// Create a rule whose survival test is written as `count < survive_below`.
    ///
    /// Neighbor counts are integers, so this is the same as `count <= survive_below - 1`.
    /// In particular `from_exclusive_bound(2, 4, 3)` is [`CLASSIC`](Self::CLASSIC).
    pub const fn from_exclusive_bound(
        survive_min: u8,
        survive_below: u8,
        birth_count: u8,
    ) -> Result<Self, ConfigError> {
        if survive_below == 0 {
            return Err(ConfigError::InvalidLifeRule {
                survive_min,
                survive_max: 0,
                birth_count,
            });
        }

        Self::decode(survive_min, survive_below - 1, birth_count)
    }

    /// Create a rule from a parsed [`Rule`].
    ///
    /// The birth conditions must be a single count, and the survival conditions must be
    /// a non-empty range without gaps.
    pub fn from_rule(rule: &Rule) -> Result<Self, ConfigError> {
        let Rule::LifeLike { birth, survival } = rule else {
            return Err(ConfigError::UnsupportedRule);
        };

        let &[birth_count] = birth.as_slice() else {
            return Err(ConfigError::UnsupportedRule);
        };

        let mut survival = survival.clone();
        survival.sort_unstable();
        survival.dedup();

        let (Some(&survive_min), Some(&survive_max)) = (survival.first(), survival.last()) else {
            return Err(ConfigError::UnsupportedRule);
        };

        if usize::from(survive_max - survive_min) + 1 != survival.len() {
            return Err(ConfigError::UnsupportedRule);
        }

        Self::decode(survive_min, survive_max, birth_count)
    }

    /// Lower bound of the survival range.
    #[inline]
    pub const fn survive_min(&self) -> u8 {
        self.survive_min
    }

    /// Upper bound of the survival range.
    #[inline]
    pub const fn survive_max(&self) -> u8 {
        self.survive_max
    }

    /// The number of living neighbors that brings a dead cell to life.
    #[inline]
    pub const fn birth_count(&self) -> u8 {
        self.birth_count
    }

    /// The next state of a cell, given its current state and its number of living neighbors.
    #[inline]
    pub const fn next(&self, current: CellState, live_neighbors: u8) -> CellState {
        let alive = match current {
            CellState::Alive => {
                self.survive_min <= live_neighbors && live_neighbors <= self.survive_max
            }
            CellState::Dead => live_neighbors == self.birth_count,
        };

        if alive {
            CellState::Alive
        } else {
            CellState::Dead
        }
    }

    /// The rule as a parsed [`Rule`].
    pub fn to_rule(&self) -> Rule {
        Rule::LifeLike {
            birth: vec![self.birth_count],
            survival: (self.survive_min..=self.survive_max).collect(),
        }
    }
}

/// Written in B/S notation, e.g. `B3/S23`.
impl Display for LifeRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rule())
    }
}
