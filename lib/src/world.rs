use crate::{
    boundary::Boundary,
    error::{ConfigError, Error},
    grid::{cell_char, Grid, Line},
    rule::{CellState, LifeRule, RuleTable},
};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter, Write};

/// The size of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dimensions {
    /// A line of the given length.
    Line(usize),
    /// A grid with the given number of rows and columns.
    Grid {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
}

/// The position of a cell in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// An index in a line.
    Index(usize),
    /// A row and a column in a grid. Both wrap around.
    Cell {
        /// Row index.
        row: isize,
        /// Column index.
        col: isize,
    },
}

/// The cells of a simulation, either 1-dimensional or 2-dimensional.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum World {
    /// A 1-dimensional world.
    Line(Line),
    /// A 2-dimensional world.
    Grid(Grid),
}

impl World {
    /// Create a world of dead cells.
    pub fn blank(dimensions: Dimensions) -> Result<Self, ConfigError> {
        match dimensions {
            Dimensions::Line(len) => Line::new(len).map(Self::Line),
            Dimensions::Grid { rows, cols } => Grid::new(rows, cols).map(Self::Grid),
        }
    }

    /// Parse a plaintext pattern with the given dimensionality.
    ///
    /// Only the variant of `dimensions` matters, not the size.
    pub fn parse(pattern: &str, dimensions: Dimensions) -> Result<Self, ConfigError> {
        match dimensions {
            Dimensions::Line(_) => pattern.parse::<Line>().map(Self::Line),
            Dimensions::Grid { .. } => pattern.parse::<Grid>().map(Self::Grid),
        }
    }

    /// The size of the world.
    pub fn dimensions(&self) -> Dimensions {
        match self {
            Self::Line(line) => Dimensions::Line(line.len()),
            Self::Grid(grid) => Dimensions::Grid {
                rows: grid.rows(),
                cols: grid.cols(),
            },
        }
    }

    /// Number of living cells.
    pub fn population(&self) -> usize {
        match self {
            Self::Line(line) => line.population(),
            Self::Grid(grid) => grid.population(),
        }
    }

    /// Get the state of a cell.
    pub fn get(&self, position: Position) -> Result<CellState, Error> {
        match (self, position) {
            (Self::Line(line), Position::Index(index)) => line.get(index),
            (Self::Grid(grid), Position::Cell { row, col }) => Ok(grid.get(row, col)),
            _ => Err(ConfigError::DimensionMismatch.into()),
        }
    }

    /// Set the state of a cell.
    pub fn set(&mut self, position: Position, state: CellState) -> Result<(), Error> {
        match (self, position) {
            (Self::Line(line), Position::Index(index)) => line.set(index, state),
            (Self::Grid(grid), Position::Cell { row, col }) => {
                grid.set(row, col, state);
                Ok(())
            }
            _ => Err(ConfigError::DimensionMismatch.into()),
        }
    }

    /// Set every cell to a random state.
    pub(crate) fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        match self {
            Self::Line(line) => line.randomize(rng, density),
            Self::Grid(grid) => grid.randomize(rng, density),
        }
    }

    /// Copy a pattern of the same dimensionality into the middle of this world.
    pub(crate) fn place_centered(&mut self, pattern: &Self) -> Result<(), ConfigError> {
        match (self, pattern) {
            (Self::Line(line), Self::Line(pattern)) => line.place_centered(pattern),
            (Self::Grid(grid), Self::Grid(pattern)) => grid.place_centered(pattern),
            _ => Err(ConfigError::DimensionMismatch),
        }
    }

    /// Output the world as a plaintext pattern with a header.
    ///
    /// - Dead cells are represented by `.`.
    /// - Alive cells are represented by `o`.
    /// - Each row is terminated by `$`.
    /// - The whole pattern is terminated by `!`.
    ///
    /// A line is written as a single row.
    pub fn rle(&self, rule: impl Display) -> String {
        let mut s = String::new();

        let (w, h) = match self.dimensions() {
            Dimensions::Line(len) => (len, 1),
            Dimensions::Grid { rows, cols } => (cols, rows),
        };

        writeln!(s, "x = {w}, y = {h}, rule = {rule}").unwrap();

        let rows: Vec<&[CellState]> = match self {
            Self::Line(line) => vec![line.cells()],
            Self::Grid(grid) => grid.iter_rows().collect(),
        };

        for (y, row) in rows.into_iter().enumerate() {
            s.extend(row.iter().map(|&cell| cell_char(cell)));

            if y + 1 < h {
                s.push('$');
            } else {
                s.push('!');
            }
            s.push('\n');
        }

        s
    }
}

impl Display for World {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => line.fmt(f),
            Self::Grid(grid) => grid.fmt(f),
        }
    }
}

/// A snapshot of a world, together with the number of ticks since the run started.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Generation {
    pub(crate) tick: u64,
    pub(crate) world: World,
}

impl Generation {
    /// The seed generation of a run.
    pub(crate) const fn seed(world: World) -> Self {
        Self { tick: 0, world }
    }

    /// The number of ticks since the run started. The seed is tick `0`.
    #[inline]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The world.
    #[inline]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Number of living cells.
    #[inline]
    pub fn population(&self) -> usize {
        self.world.population()
    }
}

/// The rule of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Automaton {
    /// An elementary automaton on a line.
    Elementary(RuleTable),
    /// A Life-like automaton on a grid.
    Life {
        /// The rule.
        rule: LifeRule,
        /// How neighbors are counted at the edges.
        boundary: Boundary,
    },
}

impl Automaton {
    /// Whether a world of the given size can be simulated by this automaton.
    pub const fn accepts(&self, dimensions: Dimensions) -> bool {
        matches!(
            (self, dimensions),
            (Self::Elementary(_), Dimensions::Line(_)) | (Self::Life { .. }, Dimensions::Grid { .. })
        )
    }

    /// The world a run starts from when no pattern is given.
    ///
    /// An elementary automaton starts from a single living cell in the middle of the line.
    /// A Life-like automaton starts from an empty grid.
    pub fn initial_world(&self, dimensions: Dimensions) -> Result<World, ConfigError> {
        match (self, dimensions) {
            (Self::Elementary(_), Dimensions::Line(len)) => Line::with_center(len).map(World::Line),
            (Self::Life { .. }, Dimensions::Grid { rows, cols }) => {
                Grid::new(rows, cols).map(World::Grid)
            }
            _ => Err(ConfigError::DimensionMismatch),
        }
    }

    /// Compute the next world.
    ///
    /// The given world is not modified.
    pub fn step(&self, world: &World) -> Result<World, ConfigError> {
        match (self, world) {
            (Self::Elementary(rule), World::Line(line)) => Ok(World::Line(line.step(rule))),
            (Self::Life { rule, boundary }, World::Grid(grid)) => {
                Ok(World::Grid(grid.step(rule, *boundary)))
            }
            _ => Err(ConfigError::DimensionMismatch),
        }
    }
}

/// The rule, in `W` notation for elementary rules and B/S notation for Life-like rules.
impl Display for Automaton {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elementary(rule) => rule.fmt(f),
            Self::Life { rule, .. } => rule.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::CellState::{Alive, Dead};

    #[test]
    fn test_blank() {
        let world = World::blank(Dimensions::Grid { rows: 2, cols: 3 }).unwrap();
        assert_eq!(world.dimensions(), Dimensions::Grid { rows: 2, cols: 3 });
        assert_eq!(world.population(), 0);

        assert_eq!(
            World::blank(Dimensions::Line(0)),
            Err(ConfigError::InvalidSize)
        );
    }

    #[test]
    fn test_position_mismatch() {
        let mut world = World::blank(Dimensions::Line(3)).unwrap();
        assert_eq!(world.get(Position::Index(1)), Ok(Dead));
        assert_eq!(
            world.get(Position::Cell { row: 0, col: 1 }),
            Err(Error::InvalidConfiguration(ConfigError::DimensionMismatch))
        );

        let mut grid = World::blank(Dimensions::Grid { rows: 2, cols: 2 }).unwrap();
        assert!(grid.set(Position::Index(0), Alive).is_err());
        grid.set(Position::Cell { row: -1, col: 0 }, Alive).unwrap();
        assert_eq!(grid.get(Position::Cell { row: 1, col: 0 }), Ok(Alive));

        assert_eq!(
            world.set(Position::Index(3), Alive),
            Err(Error::OutOfBounds { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_rle() {
        let world = World::parse(".o.\n..o\nooo", Dimensions::Grid { rows: 0, cols: 0 }).unwrap();
        assert_eq!(
            world.rle(LifeRule::CLASSIC),
            "x = 3, y = 3, rule = B3/S23\n.o.$\n..o$\nooo!\n"
        );

        let world = World::Line(Line::with_center(5).unwrap());
        assert_eq!(world.rle("W30"), "x = 5, y = 1, rule = W30\n..o..!\n");
    }

    #[test]
    fn test_automaton_accepts() {
        let elementary = Automaton::Elementary(RuleTable::new(30));
        let life = Automaton::Life {
            rule: LifeRule::CLASSIC,
            boundary: Boundary::Toroidal,
        };

        assert!(elementary.accepts(Dimensions::Line(10)));
        assert!(!elementary.accepts(Dimensions::Grid { rows: 3, cols: 3 }));
        assert!(life.accepts(Dimensions::Grid { rows: 3, cols: 3 }));
        assert!(!life.accepts(Dimensions::Line(10)));

        assert_eq!(elementary.to_string(), "W30");
        assert_eq!(life.to_string(), "B3/S23");
    }

    #[test]
    fn test_initial_world() {
        let elementary = Automaton::Elementary(RuleTable::new(30));
        let world = elementary.initial_world(Dimensions::Line(7)).unwrap();
        assert_eq!(world.to_string(), "...o...");

        let life = Automaton::Life {
            rule: LifeRule::CLASSIC,
            boundary: Boundary::Bounded,
        };
        let world = life
            .initial_world(Dimensions::Grid { rows: 2, cols: 2 })
            .unwrap();
        assert_eq!(world.population(), 0);

        assert_eq!(
            life.initial_world(Dimensions::Line(7)),
            Err(ConfigError::DimensionMismatch)
        );
    }

    #[test]
    fn test_rule_90_sierpinski() {
        let automaton = Automaton::Elementary(RuleTable::new(90));
        let mut world = automaton.initial_world(Dimensions::Line(9)).unwrap();

        let expected = [
            "....o....",
            "...o.o...",
            "..o...o..",
            ".o.o.o.o.",
        ];

        for row in expected {
            assert_eq!(world.to_string(), row);
            world = automaton.step(&world).unwrap();
        }
    }

    #[test]
    fn test_rule_30() {
        let automaton = Automaton::Elementary(RuleTable::new(30));
        let mut world = automaton.initial_world(Dimensions::Line(9)).unwrap();

        let expected = [
            "....o....",
            "...ooo...",
            "..oo..o..",
            ".oo.oooo.",
        ];

        for row in expected {
            assert_eq!(world.to_string(), row);
            world = automaton.step(&world).unwrap();
        }
    }
}
