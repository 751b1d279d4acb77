//! Grid maze: walk the character to the goal without touching a wall.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use blockscript_program::{Op, OpKind};
use blockscript_runtime::{Adapter, AdapterError, Outcome};

use crate::error::LevelError;
use crate::grid::{Grid, Heading, Position};
use crate::level::Level;
use crate::pace::Pace;

/// Goal cell.
pub const GOAL: char = 'G';

#[derive(Deserialize)]
struct MazeFile {
    rows: Vec<String>,
    #[serde(default)]
    facing: Heading,
}

/// A maze map and the direction the character starts facing.
///
/// ```json
/// { "rows": ["#####", "#S.G#", "#####"], "facing": "east" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "MazeFile")]
pub struct MazeLevel {
    grid: Grid,
    facing: Heading,
}

impl MazeLevel {
    pub fn new<S: AsRef<str>>(rows: &[S], facing: Heading) -> Result<Self, LevelError> {
        let grid = Grid::parse(rows, &[GOAL])?;
        if grid.find(GOAL).next().is_none() {
            return Err(LevelError::invalid("the maze has no goal"));
        }
        Ok(Self { grid, facing })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn facing(&self) -> Heading {
        self.facing
    }
}

impl TryFrom<MazeFile> for MazeLevel {
    type Error = LevelError;

    fn try_from(file: MazeFile) -> Result<Self, Self::Error> {
        MazeLevel::new(file.rows.as_slice(), file.facing)
    }
}

impl Level for MazeLevel {}

/// Where the character is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MazeState {
    pub position: Position,
    pub facing: Heading,
    /// Cells walked since the last reset.
    pub moves: u32,
}

/// Plays [`MazeLevel`]s.
///
/// Moving into a wall loses the level. Ending a move on a goal wins it.
#[derive(Debug, Clone)]
pub struct MazeAdapter {
    level: MazeLevel,
    pace: Pace,
}

impl MazeAdapter {
    pub fn new(level: MazeLevel) -> Self {
        Self {
            level,
            pace: Pace::INSTANT,
        }
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    pub fn level(&self) -> &MazeLevel {
        &self.level
    }

    /// The state a run starts from.
    pub fn initial_state(&self) -> MazeState {
        MazeState {
            position: self.level.grid.start(),
            facing: self.level.facing,
            moves: 0,
        }
    }
}

#[async_trait]
impl Adapter for MazeAdapter {
    type State = MazeState;

    async fn apply_op(&mut self, op: &Op, state: &mut MazeState) -> Result<Outcome, AdapterError> {
        match &op.kind {
            OpKind::Start => Ok(Outcome::Continue),
            OpKind::Move { steps } => {
                self.pace.step().await;
                let before = state.position;
                let blocked = self.level.grid.walk(&mut state.position, state.facing, *steps);
                state.moves += before.x.abs_diff(state.position.x);
                state.moves += before.y.abs_diff(state.position.y);
                debug!(block = %op.block, position = %state.position, "maze move");

                if let Some(wall) = blocked {
                    return Ok(Outcome::failure(format!("hit a wall at {}", wall)));
                }
                if self.level.grid.get(state.position) == Some(GOAL) {
                    return Ok(Outcome::win("reached the goal"));
                }
                Ok(Outcome::Continue)
            }
            OpKind::Turn { direction, degrees } => {
                self.pace.step().await;
                state.facing = state.facing.turn(*direction, *degrees)?;
                Ok(Outcome::Continue)
            }
            OpKind::Wait { millis } => {
                self.pace.hold(*millis).await;
                Ok(Outcome::Continue)
            }
            other => Err(AdapterError::unsupported(other)),
        }
    }

    async fn reset(&mut self, state: &mut MazeState) -> Result<(), AdapterError> {
        *state = self.initial_state();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockscript_program::Direction;

    fn corridor() -> MazeAdapter {
        MazeAdapter::new(MazeLevel::new(&["#####", "#S.G#", "#####"], Heading::East).unwrap())
    }

    async fn play(adapter: &mut MazeAdapter, ops: &[Op]) -> (Vec<Outcome>, MazeState) {
        let mut state = MazeState::default();
        adapter.reset(&mut state).await.unwrap();
        let mut outcomes = Vec::new();
        for op in ops {
            outcomes.push(adapter.apply_op(op, &mut state).await.unwrap());
        }
        (outcomes, state)
    }

    #[test]
    fn level_from_json() {
        let level = MazeLevel::from_json(r#"{"rows": ["S.G"], "facing": "east"}"#).unwrap();
        assert_eq!(level.facing(), Heading::East);
        assert_eq!(level.grid().start(), Position::new(0, 0));

        let level = MazeLevel::from_json(r#"{"rows": ["S.G"]}"#).unwrap();
        assert_eq!(level.facing(), Heading::North);
    }

    #[test]
    fn level_needs_a_goal() {
        let err = MazeLevel::from_json(r#"{"rows": ["S.."]}"#).unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)));
        assert!(err.to_string().contains("no goal"));
        assert!(matches!(
            MazeLevel::new(&["S.."], Heading::North),
            Err(LevelError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn walking_to_the_goal_wins() {
        let mut adapter = corridor();
        let (outcomes, state) = play(&mut adapter, &[Op::start("s"), Op::move_by("m", 2)]).await;
        assert_eq!(outcomes, vec![Outcome::Continue, Outcome::win("reached the goal")]);
        assert_eq!(state.position, Position::new(3, 1));
        assert_eq!(state.moves, 2);
    }

    #[tokio::test]
    async fn walls_lose() {
        let mut adapter = corridor();
        let (outcomes, state) = play(&mut adapter, &[Op::move_by("m", -1)]).await;
        assert_eq!(outcomes, vec![Outcome::failure("hit a wall at (0, 1)")]);
        assert_eq!(state.position, Position::new(1, 1));

        let (outcomes, _) = play(
            &mut adapter,
            &[Op::turn("t", Direction::Left), Op::move_by("m", 1)],
        )
        .await;
        assert_eq!(outcomes[1], Outcome::failure("hit a wall at (1, 0)"));
    }

    #[tokio::test]
    async fn passing_over_the_goal_does_not_win() {
        let mut adapter =
            MazeAdapter::new(MazeLevel::new(&["SG.."], Heading::East).unwrap());
        let (outcomes, state) = play(&mut adapter, &[Op::move_by("m", 3)]).await;
        assert_eq!(outcomes, vec![Outcome::Continue]);
        assert_eq!(state.position, Position::new(3, 0));
    }

    #[tokio::test]
    async fn reset_restores_start() {
        let mut adapter = corridor();
        let mut state = MazeState {
            position: Position::new(9, 9),
            facing: Heading::South,
            moves: 40,
        };
        adapter.reset(&mut state).await.unwrap();
        assert_eq!(state, adapter.initial_state());
        assert_eq!(state.facing, Heading::East);
    }

    #[tokio::test]
    async fn drawing_ops_are_unsupported() {
        let mut adapter = corridor();
        let mut state = adapter.initial_state();
        let err = adapter.apply_op(&Op::pen("p", true), &mut state).await.unwrap_err();
        assert_eq!(err, AdapterError::unsupported(&OpKind::Pen { down: true }));

        let err = adapter
            .apply_op(&Op::turn_by("t", Direction::Left, 30.0), &mut state)
            .await
            .unwrap_err();
        assert!(err.message().contains("multiple of 90"));
    }
}
