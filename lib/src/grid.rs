use crate::{
    boundary::Boundary,
    error::{ConfigError, Error},
    rule::{CellState, LifeRule, RuleTable},
};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter, Write},
    str::FromStr,
};

/// Offsets of the 8 neighbors of a cell, as `(row, column)`.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Parse a single character of a plaintext pattern.
fn parse_cell(c: char) -> Result<CellState, ConfigError> {
    match c {
        '.' | 'b' => Ok(CellState::Dead),
        'o' | 'O' | '*' => Ok(CellState::Alive),
        _ => Err(ConfigError::InvalidPattern),
    }
}

/// Format a single cell in a plaintext pattern.
pub(crate) const fn cell_char(state: CellState) -> char {
    match state {
        CellState::Dead => '.',
        CellState::Alive => 'o',
    }
}

/// A 1-dimensional world: a line of cells.
///
/// The length is at least 1 and never changes. The first and the last cells are
/// boundary cells. They are copied unchanged from one generation to the next,
/// and are never evaluated by the rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLine"))]
pub struct Line {
    cells: Vec<CellState>,
}

/// A deserialized [`Line`] that has not been checked yet.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawLine {
    cells: Vec<CellState>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLine> for Line {
    type Error = ConfigError;

    fn try_from(raw: RawLine) -> Result<Self, Self::Error> {
        Self::from_cells(raw.cells)
    }
}

#[allow(clippy::len_without_is_empty)]
impl Line {
    /// Create a line of dead cells.
    pub fn new(len: usize) -> Result<Self, ConfigError> {
        Self::from_cells(vec![CellState::Dead; len])
    }

    /// Create a line of dead cells, except a single living cell in the middle.
    ///
    /// The living cell is at index `len / 2`.
    pub fn with_center(len: usize) -> Result<Self, ConfigError> {
        let mut line = Self::new(len)?;
        line.cells[len / 2] = CellState::Alive;
        Ok(line)
    }

    /// Create a line from a list of cells.
    pub fn from_cells(cells: Vec<CellState>) -> Result<Self, ConfigError> {
        if cells.is_empty() {
            return Err(ConfigError::InvalidSize);
        }
        Ok(Self { cells })
    }

    /// Number of cells in the line.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// The cells of the line.
    #[inline]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Number of living cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Get the state of a cell.
    #[inline]
    pub fn get(&self, index: usize) -> Result<CellState, Error> {
        self.cells
            .get(index)
            .copied()
            .ok_or(Error::OutOfBounds {
                index,
                len: self.len(),
            })
    }

    /// Set the state of a cell.
    #[inline]
    pub fn set(&mut self, index: usize, state: CellState) -> Result<(), Error> {
        let len = self.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, len })?;
        *cell = state;
        Ok(())
    }

    /// Get the states of a cell and its left and right neighbors.
    ///
    /// The edges are clamped: the left neighbor of the first cell is the cell itself,
    /// and so is the right neighbor of the last cell. The rule never sees these two
    /// cells, so this only matters for callers that inspect them.
    pub fn neighborhood(&self, index: usize) -> Result<(CellState, CellState, CellState), Error> {
        let center = self.get(index)?;
        let left = index
            .checked_sub(1)
            .map_or(center, |left| self.cells[left]);
        let right = self.cells.get(index + 1).copied().unwrap_or(center);
        Ok((left, center, right))
    }

    /// Compute the next generation.
    ///
    /// The boundary cells are copied. Every other cell is looked up in the rule table.
    pub(crate) fn step(&self, rule: &RuleTable) -> Self {
        let len = self.len();
        let mut cells = Vec::with_capacity(len);

        cells.push(self.cells[0]);
        cells.extend(
            self.cells
                .windows(3)
                .map(|window| rule.next(window[0], window[1], window[2])),
        );
        if len > 1 {
            cells.push(self.cells[len - 1]);
        }

        Self { cells }
    }

    /// Set every cell to a random state.
    pub(crate) fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        for cell in &mut self.cells {
            *cell = CellState::with_density(rng, density);
        }
    }

    /// Copy a pattern into the middle of this line.
    pub(crate) fn place_centered(&mut self, pattern: &Self) -> Result<(), ConfigError> {
        let offset = self
            .len()
            .checked_sub(pattern.len())
            .ok_or(ConfigError::DimensionMismatch)?
            / 2;
        self.cells[offset..offset + pattern.len()].copy_from_slice(&pattern.cells);
        Ok(())
    }
}

/// Written as a single row of `.` and `o`.
impl Display for Line {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for &cell in &self.cells {
            f.write_char(cell_char(cell))?;
        }
        Ok(())
    }
}

/// Parse a single row of `.` and `o`, optionally terminated by `!`.
impl FromStr for Line {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_suffix('!').unwrap_or(s);
        let cells = s.chars().map(parse_cell).collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(cells)
    }
}

/// A 2-dimensional world: a rectangular grid of cells.
///
/// The size is at least 1×1 and never changes. Cells are stored row by row.
///
/// Indices wrap around: row and column indices are taken modulo the height and the
/// width, so indexed access never fails. How neighbors are counted at the edges is
/// decided by a [`Boundary`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid"))]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

/// A deserialized [`Grid`] that has not been checked yet.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for Grid {
    type Error = ConfigError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let len = Self::checked_len(raw.rows, raw.cols)?;
        if raw.cells.len() != len {
            return Err(ConfigError::InvalidSize);
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            cells: raw.cells,
        })
    }
}

impl Grid {
    /// Number of cells in a grid of the given size.
    ///
    /// Fails if either side is zero, or if the product overflows.
    fn checked_len(rows: usize, cols: usize) -> Result<usize, ConfigError> {
        rows.checked_mul(cols)
            .filter(|&len| len > 0)
            .ok_or(ConfigError::InvalidSize)
    }

    /// Create a grid of dead cells.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        let len = Self::checked_len(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![CellState::Dead; len],
        })
    }

    /// Create a grid from a list of rows.
    ///
    /// All rows must have the same non-zero length.
    pub fn from_rows(rows: Vec<Vec<CellState>>) -> Result<Self, ConfigError> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(ConfigError::InvalidSize);
        }

        let mut grid = Self::new(rows.len(), cols)?;
        grid.cells = rows.into_iter().flatten().collect();
        Ok(grid)
    }

    /// Number of rows.
    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// The cells of a row.
    ///
    /// The row index wraps around.
    #[inline]
    pub fn row(&self, row: isize) -> &[CellState] {
        let start = self.wrap_row(row) * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Iterate over the rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks_exact(self.cols)
    }

    /// Number of living cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    #[inline]
    fn wrap_row(&self, row: isize) -> usize {
        row.rem_euclid(self.rows as isize) as usize
    }

    #[inline]
    fn wrap_col(&self, col: isize) -> usize {
        col.rem_euclid(self.cols as isize) as usize
    }

    #[inline]
    fn index(&self, row: isize, col: isize) -> usize {
        self.wrap_row(row) * self.cols + self.wrap_col(col)
    }

    /// Get the state of a cell.
    #[inline]
    pub fn get(&self, row: isize, col: isize) -> CellState {
        self.cells[self.index(row, col)]
    }

    /// Set the state of a cell.
    #[inline]
    pub fn set(&mut self, row: isize, col: isize, state: CellState) {
        let index = self.index(row, col);
        self.cells[index] = state;
    }

    /// Count the living cells among the 8 neighbors of a cell.
    ///
    /// On a very small torus the same cell may be counted more than once,
    /// as it is reached through several offsets.
    pub fn live_neighbor_count(&self, row: isize, col: isize, boundary: Boundary) -> u8 {
        let (row, col) = (self.wrap_row(row), self.wrap_col(col));

        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dr, dc)| {
                let r = boundary.neighbor(row, dr, self.rows)?;
                let c = boundary.neighbor(col, dc, self.cols)?;
                Some(self.cells[r * self.cols + c])
            })
            .filter(|cell| cell.is_alive())
            .count() as u8
    }

    /// Compute the next generation.
    pub(crate) fn step(&self, rule: &LifeRule, boundary: Boundary) -> Self {
        let cells = (0..self.rows as isize)
            .flat_map(|row| (0..self.cols as isize).map(move |col| (row, col)))
            .map(|(row, col)| {
                let count = self.live_neighbor_count(row, col, boundary);
                rule.next(self.get(row, col), count)
            })
            .collect();

        Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Set every cell to a random state.
    pub(crate) fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        for cell in &mut self.cells {
            *cell = CellState::with_density(rng, density);
        }
    }

    /// Copy a pattern into the middle of this grid.
    pub(crate) fn place_centered(&mut self, pattern: &Self) -> Result<(), ConfigError> {
        let (Some(dr), Some(dc)) = (
            self.rows.checked_sub(pattern.rows),
            self.cols.checked_sub(pattern.cols),
        ) else {
            return Err(ConfigError::DimensionMismatch);
        };

        for (r, row) in pattern.iter_rows().enumerate() {
            let start = (r + dr / 2) * self.cols + dc / 2;
            self.cells[start..start + pattern.cols].copy_from_slice(row);
        }
        Ok(())
    }
}

/// Written as rows of `.` and `o`, one row per line.
impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (r, row) in self.iter_rows().enumerate() {
            if r > 0 {
                f.write_char('\n')?;
            }
            for &cell in row {
                f.write_char(cell_char(cell))?;
            }
        }
        Ok(())
    }
}

/// Parse rows of `.` and `o`.
///
/// Rows are separated by newlines or `$`. The pattern may be terminated by `!`.
/// Empty lines are ignored.
impl FromStr for Grid {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_suffix('!').unwrap_or(s);
        let rows = s
            .split(|c| c == '\n' || c == '$')
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .map(|row| row.chars().map(parse_cell).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::CellState::{Alive, Dead};

    #[test]
    fn test_line_new() {
        let line = Line::new(5).unwrap();
        assert_eq!(line.len(), 5);
        assert_eq!(line.population(), 0);

        assert_eq!(Line::new(0), Err(ConfigError::InvalidSize));

        let line = Line::with_center(5).unwrap();
        assert_eq!(line.to_string(), "..o..");
        let line = Line::with_center(4).unwrap();
        assert_eq!(line.to_string(), "..o.");
        let line = Line::with_center(1).unwrap();
        assert_eq!(line.to_string(), "o");
    }

    #[test]
    fn test_line_bounds() {
        let mut line = Line::new(3).unwrap();
        assert_eq!(line.get(2), Ok(Dead));
        assert_eq!(line.get(3), Err(Error::OutOfBounds { index: 3, len: 3 }));
        assert_eq!(
            line.set(7, Alive),
            Err(Error::OutOfBounds { index: 7, len: 3 })
        );
        assert_eq!(line.population(), 0);

        line.set(1, Alive).unwrap();
        assert_eq!(line.get(1), Ok(Alive));
    }

    #[test]
    fn test_line_neighborhood() {
        let line: Line = "o.oo".parse().unwrap();
        assert_eq!(line.neighborhood(1), Ok((Alive, Dead, Alive)));
        assert_eq!(line.neighborhood(2), Ok((Dead, Alive, Alive)));

        // The edges are clamped.
        assert_eq!(line.neighborhood(0), Ok((Alive, Alive, Dead)));
        assert_eq!(line.neighborhood(3), Ok((Alive, Alive, Alive)));

        assert!(line.neighborhood(4).is_err());
    }

    #[test]
    fn test_line_step_keeps_boundary() {
        // Rule 255 turns every evaluated cell alive.
        let rule = RuleTable::new(255);
        let line: Line = "......".parse().unwrap();
        assert_eq!(line.step(&rule).to_string(), ".oooo.");

        // Rule 0 turns every evaluated cell dead.
        let rule = RuleTable::new(0);
        let line: Line = "oooooo".parse().unwrap();
        assert_eq!(line.step(&rule).to_string(), "o....o");

        // Too short to have any cell that is not on the boundary.
        for pattern in ["o", ".", "o.", ".o"] {
            let line: Line = pattern.parse().unwrap();
            assert_eq!(line.step(&rule), line);
        }
    }

    #[test]
    fn test_line_parse() {
        let line: Line = ".o.!".parse().unwrap();
        assert_eq!(line.cells(), &[Dead, Alive, Dead]);
        assert_eq!("".parse::<Line>(), Err(ConfigError::InvalidSize));
        assert_eq!(".x.".parse::<Line>(), Err(ConfigError::InvalidPattern));
    }

    #[test]
    fn test_line_place_centered() {
        let mut line = Line::new(7).unwrap();
        line.place_centered(&"ooo".parse().unwrap()).unwrap();
        assert_eq!(line.to_string(), "..ooo..");

        let mut line = Line::new(2).unwrap();
        assert_eq!(
            line.place_centered(&"ooo".parse().unwrap()),
            Err(ConfigError::DimensionMismatch)
        );
    }

    #[test]
    fn test_grid_wraps() {
        let mut grid = Grid::new(3, 4).unwrap();
        grid.set(-1, -1, Alive);
        assert_eq!(grid.get(2, 3), Alive);
        assert_eq!(grid.get(5, 7), Alive);
        assert_eq!(grid.get(-4, -5), Alive);
        assert_eq!(grid.row(2), &[Dead, Dead, Dead, Alive]);
        assert_eq!(grid.population(), 1);

        assert_eq!(Grid::new(0, 3), Err(ConfigError::InvalidSize));
        assert_eq!(Grid::new(3, 0), Err(ConfigError::InvalidSize));
    }

    #[test]
    fn test_grid_size_overflow() {
        assert_eq!(Grid::new(usize::MAX, 2), Err(ConfigError::InvalidSize));
        assert_eq!(
            Grid::new(1 << (usize::BITS / 2), 1 << (usize::BITS / 2)),
            Err(ConfigError::InvalidSize)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_line_serde() {
        let line: Line = "o.oo".parse().unwrap();
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(json, r#"{"cells":["1","0","1","1"]}"#);
        assert_eq!(serde_json::from_str::<Line>(&json).unwrap(), line);

        let err = serde_json::from_str::<Line>(r#"{"cells":[]}"#).unwrap_err();
        assert!(err.to_string().starts_with("The width or height is zero"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_grid_serde() {
        let grid: Grid = ".o.\n..o\nooo".parse().unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);

        for json in [
            r#"{"rows":3,"cols":3,"cells":["1"]}"#,
            r#"{"rows":1,"cols":1,"cells":["1","0"]}"#,
            r#"{"rows":0,"cols":3,"cells":[]}"#,
        ] {
            let err = serde_json::from_str::<Grid>(json).unwrap_err();
            assert!(err.to_string().starts_with("The width or height is zero"));
        }
    }

    #[test]
    fn test_grid_neighbor_count() {
        let grid: Grid = "o..o\n....\n....\no..o".parse().unwrap();

        // On a torus the four corners are neighbors of each other.
        assert_eq!(grid.live_neighbor_count(0, 0, Boundary::Toroidal), 3);
        assert_eq!(grid.live_neighbor_count(0, 0, Boundary::Bounded), 0);

        assert_eq!(grid.live_neighbor_count(1, 1, Boundary::Toroidal), 1);
        assert_eq!(grid.live_neighbor_count(1, 1, Boundary::Bounded), 1);
        assert_eq!(grid.live_neighbor_count(2, 2, Boundary::Toroidal), 1);

        let full: Grid = "ooo\nooo\nooo".parse().unwrap();
        assert_eq!(full.live_neighbor_count(1, 1, Boundary::Bounded), 8);
        assert_eq!(full.live_neighbor_count(0, 0, Boundary::Bounded), 3);
        assert_eq!(full.live_neighbor_count(0, 0, Boundary::Toroidal), 8);
    }

    #[test]
    fn test_grid_step_block_is_stable() {
        let grid: Grid = "....\n.oo.\n.oo.\n....".parse().unwrap();
        for boundary in [Boundary::Toroidal, Boundary::Bounded] {
            assert_eq!(grid.step(&LifeRule::CLASSIC, boundary), grid);
        }
    }

    #[test]
    fn test_grid_step_single_cell_dies() {
        let grid: Grid = "...\n.o.\n...".parse().unwrap();
        let next = grid.step(&LifeRule::CLASSIC, Boundary::Toroidal);
        assert_eq!(next.population(), 0);
        assert_eq!(next, Grid::new(3, 3).unwrap());
    }

    #[test]
    fn test_grid_step_blinker() {
        let horizontal: Grid = ".....\n.....\n.ooo.\n.....\n.....".parse().unwrap();
        let vertical: Grid = ".....\n..o..\n..o..\n..o..\n.....".parse().unwrap();

        let next = horizontal.step(&LifeRule::CLASSIC, Boundary::Toroidal);
        assert_eq!(next, vertical);
        let next = next.step(&LifeRule::CLASSIC, Boundary::Toroidal);
        assert_eq!(next, horizontal);
    }

    #[test]
    fn test_grid_step_boundary_matters() {
        // A blinker lying on the top edge.
        let grid: Grid = ".ooo.\n.....\n.....\n.....\n.....".parse().unwrap();

        // On a torus it keeps oscillating, reaching into the bottom row.
        let toroidal = grid.step(&LifeRule::CLASSIC, Boundary::Toroidal);
        assert_eq!(toroidal.to_string(), "..o..\n..o..\n.....\n.....\n..o..");

        // With edges, the cells above the top row are missing.
        let bounded = grid.step(&LifeRule::CLASSIC, Boundary::Bounded);
        assert_eq!(bounded.to_string(), "..o..\n..o..\n.....\n.....\n.....");
    }

    #[test]
    fn test_grid_parse() {
        let grid: Grid = ".o.$..o$ooo!".parse().unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.to_string(), ".o.\n..o\nooo");

        assert_eq!("o.\no".parse::<Grid>(), Err(ConfigError::InvalidSize));
        assert_eq!("".parse::<Grid>(), Err(ConfigError::InvalidSize));
        assert_eq!("o?".parse::<Grid>(), Err(ConfigError::InvalidPattern));
    }

    #[test]
    fn test_grid_place_centered() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.place_centered(&"ooo".parse().unwrap()).unwrap();
        assert_eq!(grid.to_string(), ".....\n.....\n.ooo.\n.....\n.....");

        let mut grid = Grid::new(2, 5).unwrap();
        assert_eq!(
            grid.place_centered(&"o\no\no".parse().unwrap()),
            Err(ConfigError::DimensionMismatch)
        );
    }
}
