//! Character grids shared by the maze and farm games.

use serde::{Deserialize, Serialize};

use blockscript_program::Direction;
use blockscript_runtime::AdapterError;

use crate::error::{LevelError, Result};

/// Wall cell.
pub const WALL: char = '#';
/// Open floor.
pub const OPEN: char = '.';
/// Where the character starts. Open floor once the level is loaded.
pub const START: char = 'S';

/// A cell coordinate. `y` grows downwards, row by row.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell `heading` points at.
    pub fn step(self, heading: Heading, forward: bool) -> Self {
        let (dx, dy) = heading.delta();
        let sign = if forward { 1 } else { -1 };
        Self::new(self.x + dx * sign, self.y + dy * sign)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass heading on a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    #[default]
    North,
    East,
    South,
    West,
}

impl Heading {
    const CLOCKWISE: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    fn index(self) -> i64 {
        match self {
            Heading::North => 0,
            Heading::East => 1,
            Heading::South => 2,
            Heading::West => 3,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    /// Rotate by a whole number of quarter turns.
    pub fn turn(
        self,
        direction: Direction,
        degrees: f64,
    ) -> std::result::Result<Self, AdapterError> {
        let quarters = degrees / 90.0;
        if !quarters.is_finite() || (quarters - quarters.round()).abs() > 1e-9 {
            return Err(AdapterError::new(format!(
                "grid turns must be a multiple of 90 degrees, got {}",
                degrees
            )));
        }
        // Left is counter-clockwise, which walks the clockwise table backwards.
        // Reduced in floating point so that huge angles cannot overflow.
        let delta = (-direction.sign() * quarters.round()).rem_euclid(4.0) as i64;
        let index = (self.index() + delta).rem_euclid(4) as usize;
        Ok(Self::CLOCKWISE[index])
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Heading::North => "north",
            Heading::East => "east",
            Heading::South => "south",
            Heading::West => "west",
        };
        write!(f, "{}", s)
    }
}

/// A rectangular level map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<char>>,
    start: Position,
}

impl Grid {
    /// Parse rows of cell characters.
    ///
    /// `extra` lists the game-specific cell characters accepted besides
    /// walls, floor and the single start cell.
    pub fn parse<S: AsRef<str>>(rows: &[S], extra: &[char]) -> Result<Self> {
        let rows: Vec<Vec<char>> = rows.iter().map(|r| r.as_ref().chars().collect()).collect();

        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(LevelError::invalid("the map is empty"));
        }
        if let Some(y) = rows.iter().position(|r| r.len() != width) {
            return Err(LevelError::invalid(format!(
                "row {} has {} cells, expected {}",
                y,
                rows[y].len(),
                width
            )));
        }

        let mut start = None;
        for (y, row) in rows.iter().enumerate() {
            for (x, &c) in row.iter().enumerate() {
                match c {
                    WALL | OPEN => {}
                    START if start.is_none() => start = Some(Position::new(x as i32, y as i32)),
                    START => return Err(LevelError::invalid("the map has more than one start")),
                    c if extra.contains(&c) => {}
                    c => {
                        return Err(LevelError::invalid(format!(
                            "unknown cell {:?} at ({}, {})",
                            c, x, y
                        )))
                    }
                }
            }
        }

        let start = start.ok_or_else(|| LevelError::invalid("the map has no start"))?;
        Ok(Self { rows, start })
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// The cell character at `pos`, or `None` outside the map.
    pub fn get(&self, pos: Position) -> Option<char> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Everything outside the map counts as wall.
    pub fn is_wall(&self, pos: Position) -> bool {
        self.get(pos).map_or(true, |c| c == WALL)
    }

    /// Every position holding `cell`, in reading order.
    pub fn find(&self, cell: char) -> impl Iterator<Item = Position> + '_ {
        self.rows.iter().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .filter(move |(_, c)| **c == cell)
                .map(move |(x, _)| Position::new(x as i32, y as i32))
        })
    }

    /// Walk `steps` cells along `heading`, backwards when negative.
    ///
    /// Stops at the last open cell and returns the wall that blocked the
    /// walk, if any.
    pub fn walk(&self, pos: &mut Position, heading: Heading, steps: i32) -> Option<Position> {
        let forward = steps >= 0;
        for _ in 0..steps.unsigned_abs() {
            let next = pos.step(heading, forward);
            if self.is_wall(next) {
                return Some(next);
            }
            *pos = next;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::parse(rows, &['G']).unwrap()
    }

    #[test]
    fn parse_finds_start() {
        let g = grid(&["#####", "#S.G#", "#####"]);
        assert_eq!(g.start(), Position::new(1, 1));
        assert_eq!(g.width(), 5);
        assert_eq!(g.height(), 3);
        assert_eq!(g.find('G').collect::<Vec<_>>(), vec![Position::new(3, 1)]);
    }

    #[test]
    fn parse_errors() {
        let cases: &[&[&str]] = &[
            &[],
            &[""],
            &["S..", "..", "..."],
            &["...", "..."],
            &["S.S"],
            &["S.X"],
        ];
        for rows in cases {
            assert!(
                matches!(Grid::parse(*rows, &['G']), Err(LevelError::Invalid(_))),
                "{:?} should be rejected",
                rows
            );
        }
    }

    #[test]
    fn outside_is_wall() {
        let g = grid(&["S."]);
        assert!(!g.is_wall(Position::new(1, 0)));
        assert!(g.is_wall(Position::new(2, 0)));
        assert!(g.is_wall(Position::new(-1, 0)));
        assert!(g.is_wall(Position::new(0, 1)));
        assert_eq!(g.get(Position::new(0, -1)), None);
    }

    #[test]
    fn turns_by_quarters() {
        use Direction::*;
        assert_eq!(Heading::North.turn(Left, 90.0).unwrap(), Heading::West);
        assert_eq!(Heading::North.turn(Right, 90.0).unwrap(), Heading::East);
        assert_eq!(Heading::East.turn(Right, 180.0).unwrap(), Heading::West);
        assert_eq!(Heading::South.turn(Left, 360.0).unwrap(), Heading::South);
        assert_eq!(Heading::West.turn(Left, -90.0).unwrap(), Heading::North);
        assert!(Heading::North.turn(Left, 45.0).is_err());
        assert!(Heading::North.turn(Left, f64::NAN).is_err());
    }

    #[test]
    fn huge_turns_wrap_around() {
        use Direction::*;
        assert_eq!(Heading::East.turn(Right, 1e300).unwrap(), Heading::East);
        assert_eq!(Heading::North.turn(Left, -1e300).unwrap(), Heading::North);
        assert_eq!(Heading::South.turn(Left, f64::MAX).unwrap(), Heading::South);
        // 1_000_000_000_001 quarter turns is one quarter turn.
        assert_eq!(
            Heading::North.turn(Right, 90_000_000_000_090.0).unwrap(),
            Heading::East
        );
        assert_eq!(
            Heading::North.turn(Left, 90_000_000_000_090.0).unwrap(),
            Heading::West
        );
        assert!(Heading::North.turn(Left, f64::INFINITY).is_err());
    }

    #[test]
    fn walk_stops_at_walls() {
        let g = grid(&["#####", "#S..#", "#####"]);

        let mut pos = g.start();
        assert_eq!(g.walk(&mut pos, Heading::East, 2), None);
        assert_eq!(pos, Position::new(3, 1));

        assert_eq!(g.walk(&mut pos, Heading::East, 1), Some(Position::new(4, 1)));
        assert_eq!(pos, Position::new(3, 1));

        assert_eq!(g.walk(&mut pos, Heading::East, -5), Some(Position::new(0, 1)));
        assert_eq!(pos, Position::new(1, 1));
    }

    #[test]
    fn heading_serde() {
        let h: Heading = serde_json::from_str("\"south\"").unwrap();
        assert_eq!(h, Heading::South);
        assert_eq!(h.to_string(), "south");
    }
}
