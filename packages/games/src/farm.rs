//! Farm: walk a grid collecting items and growing crops.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use blockscript_program::{Op, OpKind};
use blockscript_runtime::{Adapter, AdapterError, Outcome};

use crate::error::LevelError;
use crate::grid::{Grid, Heading, Position};
use crate::level::Level;
use crate::pace::Pace;

/// An item to pick up.
pub const ITEM: char = '*';
/// Soil that can be planted.
pub const PLOT: char = 'o';

/// What a level asks for. Both counts must be reached to win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmGoal {
    pub collect: u32,
    pub harvest: u32,
}

impl FarmGoal {
    fn met_by(&self, state: &FarmState) -> bool {
        state.collected >= self.collect && state.harvested >= self.harvest
    }
}

#[derive(Deserialize)]
struct FarmFile {
    rows: Vec<String>,
    #[serde(default)]
    facing: Heading,
    goal: FarmGoal,
}

/// A farm map and its goal.
///
/// ```json
/// { "rows": ["S*o"], "facing": "east", "goal": { "collect": 1, "harvest": 1 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FarmFile")]
pub struct FarmLevel {
    grid: Grid,
    facing: Heading,
    goal: FarmGoal,
}

impl FarmLevel {
    pub fn new<S: AsRef<str>>(
        rows: &[S],
        facing: Heading,
        goal: FarmGoal,
    ) -> Result<Self, LevelError> {
        let grid = Grid::parse(rows, &[ITEM, PLOT])?;
        if goal == FarmGoal::default() {
            return Err(LevelError::invalid("the farm has no goal"));
        }
        let items = grid.find(ITEM).count();
        if goal.collect as usize > items {
            return Err(LevelError::invalid(format!(
                "the goal asks for {} items but the map has {}",
                goal.collect, items
            )));
        }
        if goal.harvest > 0 && grid.find(PLOT).next().is_none() {
            return Err(LevelError::invalid("the goal asks for a harvest but the map has no plot"));
        }
        Ok(Self { grid, facing, goal })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn goal(&self) -> FarmGoal {
        self.goal
    }
}

impl TryFrom<FarmFile> for FarmLevel {
    type Error = LevelError;

    fn try_from(file: FarmFile) -> Result<Self, Self::Error> {
        FarmLevel::new(file.rows.as_slice(), file.facing, file.goal)
    }
}

impl Level for FarmLevel {}

/// Growth stage of a plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Plot {
    #[default]
    Empty,
    Seeded,
    Watered,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FarmState {
    pub position: Position,
    pub facing: Heading,
    /// Items still lying on the map.
    pub items: BTreeSet<Position>,
    pub plots: BTreeMap<Position, Plot>,
    pub collected: u32,
    pub harvested: u32,
}

/// Plays [`FarmLevel`]s.
///
/// A crop is planted, watered, then harvested, each on its plot. Walking
/// into a wall or acting on the wrong cell loses the level. Reaching both
/// goal counts wins it.
#[derive(Debug, Clone)]
pub struct FarmAdapter {
    level: FarmLevel,
    pace: Pace,
}

impl FarmAdapter {
    pub fn new(level: FarmLevel) -> Self {
        Self {
            level,
            pace: Pace::INSTANT,
        }
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    pub fn level(&self) -> &FarmLevel {
        &self.level
    }

    pub fn initial_state(&self) -> FarmState {
        let grid = &self.level.grid;
        FarmState {
            position: grid.start(),
            facing: self.level.facing,
            items: grid.find(ITEM).collect(),
            plots: grid.find(PLOT).map(|p| (p, Plot::Empty)).collect(),
            collected: 0,
            harvested: 0,
        }
    }

    /// Move a plot from one stage to the next, or explain why it cannot.
    fn tend(state: &mut FarmState, from: Plot, to: Plot, refusal: &str) -> Option<Outcome> {
        match state.plots.get_mut(&state.position) {
            Some(plot) if *plot == from => {
                *plot = to;
                None
            }
            _ => Some(Outcome::failure(refusal)),
        }
    }
}

#[async_trait]
impl Adapter for FarmAdapter {
    type State = FarmState;

    async fn apply_op(&mut self, op: &Op, state: &mut FarmState) -> Result<Outcome, AdapterError> {
        let refused = match &op.kind {
            OpKind::Start => return Ok(Outcome::Continue),
            OpKind::Move { steps } => {
                self.pace.step().await;
                let blocked = self.level.grid.walk(&mut state.position, state.facing, *steps);
                if let Some(wall) = blocked {
                    return Ok(Outcome::failure(format!("hit a wall at {}", wall)));
                }
                None
            }
            OpKind::Turn { direction, degrees } => {
                self.pace.step().await;
                state.facing = state.facing.turn(*direction, *degrees)?;
                None
            }
            OpKind::Wait { millis } => {
                self.pace.hold(*millis).await;
                None
            }
            OpKind::Collect => {
                self.pace.step().await;
                if state.items.remove(&state.position) {
                    state.collected += 1;
                    None
                } else {
                    Some(Outcome::failure("there is nothing to collect here"))
                }
            }
            OpKind::Plant => {
                self.pace.step().await;
                if state.plots.contains_key(&state.position) {
                    Self::tend(state, Plot::Empty, Plot::Seeded, "this plot is already planted")
                } else {
                    Some(Outcome::failure("there is no plot here"))
                }
            }
            OpKind::Water => {
                self.pace.step().await;
                Self::tend(state, Plot::Seeded, Plot::Watered, "there is nothing to water here")
            }
            OpKind::Harvest => {
                self.pace.step().await;
                let refused = Self::tend(
                    state,
                    Plot::Watered,
                    Plot::Empty,
                    "there is nothing ready to harvest here",
                );
                if refused.is_none() {
                    state.harvested += 1;
                }
                refused
            }
            other => return Err(AdapterError::unsupported(other)),
        };

        debug!(
            block = %op.block,
            position = %state.position,
            collected = state.collected,
            harvested = state.harvested,
            "farm step"
        );

        if let Some(outcome) = refused {
            return Ok(outcome);
        }
        if self.level.goal.met_by(state) {
            return Ok(Outcome::win("the farm work is done"));
        }
        Ok(Outcome::Continue)
    }

    async fn reset(&mut self, state: &mut FarmState) -> Result<(), AdapterError> {
        *state = self.initial_state();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_literals::btree;

    fn field() -> FarmAdapter {
        let level = FarmLevel::new(
            &["S*o.", "####"],
            Heading::East,
            FarmGoal {
                collect: 1,
                harvest: 1,
            },
        )
        .unwrap();
        FarmAdapter::new(level)
    }

    async fn play(adapter: &mut FarmAdapter, ops: &[Op]) -> (Vec<Outcome>, FarmState) {
        let mut state = FarmState::default();
        adapter.reset(&mut state).await.unwrap();
        let mut outcomes = Vec::new();
        for op in ops {
            outcomes.push(adapter.apply_op(op, &mut state).await.unwrap());
        }
        (outcomes, state)
    }

    #[test]
    fn level_checks_goal() {
        let level = FarmLevel::from_json(r#"{"rows": ["S*"], "goal": {"collect": 1}}"#).unwrap();
        assert_eq!(level.goal(), FarmGoal { collect: 1, harvest: 0 });

        for json in [
            r#"{"rows": ["S*"], "goal": {}}"#,
            r#"{"rows": ["S*"], "goal": {"collect": 2}}"#,
            r#"{"rows": ["S*"], "goal": {"harvest": 1}}"#,
            r#"{"rows": ["S*"]}"#,
        ] {
            assert!(FarmLevel::from_json(json).is_err(), "{} should be rejected", json);
        }
    }

    #[tokio::test]
    async fn reset_lays_out_items_and_plots() {
        let adapter = field();
        let state = adapter.initial_state();
        assert_eq!(state.items, BTreeSet::from([Position::new(1, 0)]));
        assert_eq!(state.plots, btree! { Position::new(2, 0) => Plot::Empty });
    }

    #[tokio::test]
    async fn full_cycle_wins() {
        let mut adapter = field();
        let (outcomes, state) = play(
            &mut adapter,
            &[
                Op::start("s"),
                Op::move_by("m1", 1),
                Op::collect("c"),
                Op::move_by("m2", 1),
                Op::plant("p"),
                Op::water("w"),
                Op::harvest("h"),
            ],
        )
        .await;

        assert_eq!(outcomes.last(), Some(&Outcome::win("the farm work is done")));
        assert!(outcomes[..6].iter().all(|o| *o == Outcome::Continue));
        assert_eq!(state.collected, 1);
        assert_eq!(state.harvested, 1);
        assert!(state.items.is_empty());
        assert_eq!(state.plots[&Position::new(2, 0)], Plot::Empty);
    }

    #[tokio::test]
    async fn wrong_actions_lose() {
        let mut adapter = field();

        let (outcomes, _) = play(&mut adapter, &[Op::collect("c")]).await;
        assert_eq!(outcomes, vec![Outcome::failure("there is nothing to collect here")]);

        let (outcomes, _) = play(&mut adapter, &[Op::plant("p")]).await;
        assert_eq!(outcomes, vec![Outcome::failure("there is no plot here")]);

        let (outcomes, _) = play(&mut adapter, &[Op::move_by("m", 2), Op::water("w")]).await;
        assert_eq!(outcomes[1], Outcome::failure("there is nothing to water here"));

        let (outcomes, _) = play(
            &mut adapter,
            &[Op::move_by("m", 2), Op::plant("p"), Op::plant("p")],
        )
        .await;
        assert_eq!(outcomes[2], Outcome::failure("this plot is already planted"));

        let (outcomes, _) = play(
            &mut adapter,
            &[Op::move_by("m", 2), Op::plant("p"), Op::harvest("h")],
        )
        .await;
        assert_eq!(outcomes[2], Outcome::failure("there is nothing ready to harvest here"));

        let (outcomes, _) = play(&mut adapter, &[Op::move_by("m", 4)]).await;
        assert_eq!(outcomes, vec![Outcome::failure("hit a wall at (4, 0)")]);
    }

    #[tokio::test]
    async fn collecting_twice_fails() {
        let mut adapter = FarmAdapter::new(
            FarmLevel::new(&["S**"], Heading::East, FarmGoal { collect: 2, harvest: 0 }).unwrap(),
        );
        let (outcomes, state) = play(
            &mut adapter,
            &[Op::move_by("m", 1), Op::collect("c"), Op::collect("c")],
        )
        .await;
        assert_eq!(outcomes[1], Outcome::Continue);
        assert_eq!(outcomes[2], Outcome::failure("there is nothing to collect here"));
        assert_eq!(state.collected, 1);
    }

    #[tokio::test]
    async fn drawing_ops_are_unsupported() {
        let mut adapter = field();
        let mut state = adapter.initial_state();
        let err = adapter
            .apply_op(&Op::color("c", "#fff"), &mut state)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AdapterError::unsupported(&OpKind::Color {
                color: "#fff".into()
            })
        );
    }
}
