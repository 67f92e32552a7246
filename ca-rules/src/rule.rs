use std::fmt::{self, Display, Formatter};

/// The number of neighbors of a cell in a Life-like rule.
///
/// Only the Moore neighborhood of radius 1 is supported:
///
/// ```text
/// # # #
/// # O #
/// # # #
/// ```
pub const LIFE_NEIGHBORHOOD_SIZE: u8 = 8;

/// A cellular automaton rule, as written in a rule string.
///
/// # Elementary rules
///
/// An [elementary cellular automaton](https://en.wikipedia.org/wiki/Elementary_cellular_automaton)
/// is a 1-dimensional automaton where the next state of a cell depends on itself and its two
/// immediate neighbors. The rule is identified by its Wolfram number.
///
/// The number is stored exactly as written. It is not checked to be in `0..=255` here,
/// so that a simulator can report the actual value it rejected.
///
/// # Life-like rules
///
/// A [Life-like](https://conwaylife.com/wiki/Life-like_cellular_automaton) rule is a
/// 2-dimensional rule where the next state of a cell depends on its own state and the number
/// of living cells among its 8 neighbors.
///
/// - A dead cell becomes alive if the number of living neighbors is in `birth`.
/// - A living cell stays alive if the number of living neighbors is in `survival`.
///
/// Both lists are sorted and contain no duplicates.
///
/// # Examples
///
/// Conway's Game of Life:
///
/// ```rust
/// # use ca_rules::Rule;
/// let rule = Rule::LifeLike {
///     birth: vec![3],
///     survival: vec![2, 3],
/// };
/// assert_eq!(rule.to_string(), "B3/S23");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rule {
    /// An elementary rule with the given Wolfram number.
    Elementary {
        /// The Wolfram number of the rule.
        number: u64,
    },
    /// A Life-like rule.
    LifeLike {
        /// Birth conditions.
        birth: Vec<u8>,
        /// Survival conditions.
        survival: Vec<u8>,
    },
}

impl Rule {
    /// Whether this is an elementary rule.
    pub const fn is_elementary(&self) -> bool {
        matches!(self, Self::Elementary { .. })
    }

    /// Checks whether the birth and survival conditions are valid.
    ///
    /// These conditions should not contain any number greater than the neighborhood size.
    /// Elementary rules have no conditions, so they are always valid.
    pub fn check_conditions(&self) -> bool {
        match self {
            Self::Elementary { .. } => true,
            Self::LifeLike { birth, survival } => birth
                .iter()
                .chain(survival)
                .all(|&n| n <= LIFE_NEIGHBORHOOD_SIZE),
        }
    }
}

/// Elementary rules are written as `W{number}`, Life-like rules in B/S notation.
impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elementary { number } => write!(f, "W{number}"),
            Self::LifeLike { birth, survival } => {
                write!(f, "B")?;
                for n in birth {
                    write!(f, "{n}")?;
                }
                write!(f, "/S")?;
                for n in survival {
                    write!(f, "{n}")?;
                }
                Ok(())
            }
        }
    }
}
