//! Turtle drawing on a bounded canvas.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use blockscript_program::{Op, OpKind};
use blockscript_runtime::{Adapter, AdapterError, Outcome};

use crate::error::LevelError;
use crate::level::Level;
use crate::pace::Pace;

/// Coordinates closer than this are the same point.
const EPSILON: f64 = 1e-6;
const SNAP: f64 = 1e6;

/// A canvas point. `y` grows upwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn close_to(self, other: Point) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }

    /// Snap to the epsilon grid so repeated turns do not drift.
    fn snapped(self) -> Self {
        let snap = |v: f64| (v * SNAP).round() / SNAP;
        Self::new(snap(self.x), snap(self.y))
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A line the level asks to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

impl Line {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// Same endpoints, in either order.
    pub fn matches(&self, from: Point, to: Point) -> bool {
        (self.from.close_to(from) && self.to.close_to(to))
            || (self.from.close_to(to) && self.to.close_to(from))
    }
}

/// A stroke the turtle has drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: String,
    pub width: f64,
}

fn default_heading() -> f64 {
    90.0
}

fn default_step_length() -> f64 {
    1.0
}

#[derive(Deserialize)]
struct ArtistFile {
    width: f64,
    height: f64,
    #[serde(default)]
    start: Option<Point>,
    #[serde(default = "default_heading")]
    heading: f64,
    #[serde(default = "default_step_length")]
    step_length: f64,
    #[serde(default)]
    target: Vec<Line>,
}

/// A canvas, where the turtle starts and what it should draw.
///
/// Headings are in degrees, counter-clockwise from the positive x axis, so
/// the default of 90 faces up. The turtle starts in the middle of the
/// canvas unless `start` says otherwise. Each target line has to be drawn
/// by a single move.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ArtistFile")]
pub struct ArtistLevel {
    width: f64,
    height: f64,
    start: Point,
    heading: f64,
    step_length: f64,
    target: Vec<Line>,
}

impl ArtistLevel {
    pub fn new(width: f64, height: f64) -> Result<Self, LevelError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(LevelError::invalid(format!(
                "canvas size {}x{} is not positive",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            start: Point::new(width / 2.0, height / 2.0),
            heading: default_heading(),
            step_length: default_step_length(),
            target: Vec::new(),
        })
    }

    pub fn with_start(mut self, start: Point, heading: f64) -> Result<Self, LevelError> {
        if !self.contains(start) {
            return Err(LevelError::invalid(format!("start {} is off the canvas", start)));
        }
        if !heading.is_finite() {
            return Err(LevelError::invalid("heading is not a number"));
        }
        self.start = start;
        self.heading = heading;
        Ok(self)
    }

    pub fn with_step_length(mut self, step_length: f64) -> Result<Self, LevelError> {
        if !(step_length.is_finite() && step_length > 0.0) {
            return Err(LevelError::invalid("step length must be positive"));
        }
        self.step_length = step_length;
        Ok(self)
    }

    pub fn with_target(mut self, target: Vec<Line>) -> Self {
        self.target = target;
        self
    }

    pub fn contains(&self, p: Point) -> bool {
        (-EPSILON..=self.width + EPSILON).contains(&p.x)
            && (-EPSILON..=self.height + EPSILON).contains(&p.y)
    }

    pub fn target(&self) -> &[Line] {
        &self.target
    }
}

impl TryFrom<ArtistFile> for ArtistLevel {
    type Error = LevelError;

    fn try_from(file: ArtistFile) -> Result<Self, Self::Error> {
        let level = ArtistLevel::new(file.width, file.height)?;
        let start = file.start.unwrap_or(level.start);
        Ok(level
            .with_start(start, file.heading)?
            .with_step_length(file.step_length)?
            .with_target(file.target))
    }
}

impl Level for ArtistLevel {}

/// The turtle and everything it has drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistState {
    pub position: Point,
    pub heading: f64,
    pub pen_down: bool,
    pub color: String,
    pub width: f64,
    pub segments: Vec<Segment>,
}

impl Default for ArtistState {
    fn default() -> Self {
        Self {
            position: Point::default(),
            heading: default_heading(),
            pen_down: true,
            color: "#000000".to_string(),
            width: 1.0,
            segments: Vec::new(),
        }
    }
}

impl ArtistState {
    fn has_drawn(&self, line: &Line) -> bool {
        self.segments.iter().any(|s| line.matches(s.from, s.to))
    }
}

/// Plays [`ArtistLevel`]s.
///
/// Moving off the canvas loses the level. Drawing every target line wins
/// it. A level with no target never ends on its own.
#[derive(Debug, Clone)]
pub struct ArtistAdapter {
    level: ArtistLevel,
    pace: Pace,
}

impl ArtistAdapter {
    pub fn new(level: ArtistLevel) -> Self {
        Self {
            level,
            pace: Pace::INSTANT,
        }
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    pub fn level(&self) -> &ArtistLevel {
        &self.level
    }

    pub fn initial_state(&self) -> ArtistState {
        ArtistState {
            position: self.level.start,
            heading: self.level.heading,
            ..ArtistState::default()
        }
    }

    fn finished(&self, state: &ArtistState) -> bool {
        !self.level.target.is_empty() && self.level.target.iter().all(|l| state.has_drawn(l))
    }
}

#[async_trait]
impl Adapter for ArtistAdapter {
    type State = ArtistState;

    async fn apply_op(
        &mut self,
        op: &Op,
        state: &mut ArtistState,
    ) -> Result<Outcome, AdapterError> {
        match &op.kind {
            OpKind::Start => return Ok(Outcome::Continue),
            OpKind::Move { steps } => {
                self.pace.step().await;
                let distance = f64::from(*steps) * self.level.step_length;
                let radians = state.heading.to_radians();
                let from = state.position;
                let to = Point::new(
                    from.x + distance * radians.cos(),
                    from.y + distance * radians.sin(),
                )
                .snapped();

                if !self.level.contains(to) {
                    return Ok(Outcome::failure(format!("left the canvas at {}", to)));
                }
                state.position = to;
                if state.pen_down && *steps != 0 {
                    state.segments.push(Segment {
                        from,
                        to,
                        color: state.color.clone(),
                        width: state.width,
                    });
                }
                debug!(block = %op.block, position = %to, pen = state.pen_down, "artist move");
            }
            OpKind::Turn { direction, degrees } => {
                self.pace.step().await;
                state.heading = (state.heading + direction.sign() * degrees).rem_euclid(360.0);
            }
            OpKind::Wait { millis } => self.pace.hold(*millis).await,
            OpKind::Pen { down } => state.pen_down = *down,
            OpKind::Color { color } => state.color = color.clone(),
            OpKind::Width { width } => {
                if !(width.is_finite() && *width > 0.0) {
                    return Err(AdapterError::new(format!("invalid pen width {}", width)));
                }
                state.width = *width;
            }
            other => return Err(AdapterError::unsupported(other)),
        }

        if self.finished(state) {
            Ok(Outcome::win("the picture is complete"))
        } else {
            Ok(Outcome::Continue)
        }
    }

    async fn reset(&mut self, state: &mut ArtistState) -> Result<(), AdapterError> {
        *state = self.initial_state();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockscript_program::Direction;

    fn square_level() -> ArtistLevel {
        ArtistLevel::new(100.0, 100.0)
            .unwrap()
            .with_start(Point::new(10.0, 10.0), 0.0)
            .unwrap()
            .with_step_length(10.0)
            .unwrap()
            .with_target(vec![
                Line::new(Point::new(10.0, 10.0), Point::new(20.0, 10.0)),
                Line::new(Point::new(20.0, 10.0), Point::new(20.0, 20.0)),
                Line::new(Point::new(20.0, 20.0), Point::new(10.0, 20.0)),
                Line::new(Point::new(10.0, 10.0), Point::new(10.0, 20.0)),
            ])
    }

    async fn play(adapter: &mut ArtistAdapter, ops: &[Op]) -> (Vec<Outcome>, ArtistState) {
        let mut state = ArtistState::default();
        adapter.reset(&mut state).await.unwrap();
        let mut outcomes = Vec::new();
        for op in ops {
            outcomes.push(adapter.apply_op(op, &mut state).await.unwrap());
        }
        (outcomes, state)
    }

    #[test]
    fn level_from_json_defaults() {
        let level = ArtistLevel::from_json(r#"{"width": 200, "height": 100}"#).unwrap();
        assert_eq!(level.start, Point::new(100.0, 50.0));
        assert_eq!(level.heading, 90.0);
        assert_eq!(level.step_length, 1.0);
        assert!(level.target().is_empty());
    }

    #[test]
    fn level_rejects_bad_canvas() {
        assert!(ArtistLevel::from_json(r#"{"width": 0, "height": 100}"#).is_err());
        assert!(ArtistLevel::from_json(
            r#"{"width": 10, "height": 10, "start": {"x": 11, "y": 1}}"#
        )
        .is_err());
        assert!(ArtistLevel::from_json(r#"{"width": 10, "height": 10, "step_length": -1}"#)
            .is_err());
    }

    #[tokio::test]
    async fn drawing_a_square_wins_on_the_last_side() {
        let mut adapter = ArtistAdapter::new(square_level());
        let side = || {
            vec![
                Op::move_by("m", 1),
                Op::turn("t", Direction::Left),
            ]
        };
        let ops: Vec<Op> = (0..4).flat_map(|_| side()).collect();

        let (outcomes, state) = play(&mut adapter, &ops).await;

        assert_eq!(state.segments.len(), 4);
        assert_eq!(outcomes[6], Outcome::win("the picture is complete"));
        assert!(outcomes[..6].iter().all(|o| *o == Outcome::Continue));
        assert!(state.position.close_to(Point::new(10.0, 10.0)));
    }

    #[tokio::test]
    async fn pen_up_moves_without_drawing() {
        let mut adapter = ArtistAdapter::new(square_level());
        let (_, state) = play(
            &mut adapter,
            &[Op::pen("u", false), Op::move_by("m", 2), Op::pen("d", true), Op::move_by("m", 1)],
        )
        .await;
        assert_eq!(state.segments.len(), 1);
        assert_eq!(state.segments[0].from, Point::new(30.0, 10.0));
        assert_eq!(state.segments[0].to, Point::new(40.0, 10.0));
    }

    #[tokio::test]
    async fn color_and_width_apply_to_later_strokes() {
        let mut adapter = ArtistAdapter::new(square_level());
        let (_, state) = play(
            &mut adapter,
            &[
                Op::move_by("a", 1),
                Op::color("c", "#ff0000"),
                Op::width("w", 4.0),
                Op::move_by("b", 1),
            ],
        )
        .await;
        assert_eq!(state.segments[0].color, "#000000");
        assert_eq!(state.segments[0].width, 1.0);
        assert_eq!(state.segments[1].color, "#ff0000");
        assert_eq!(state.segments[1].width, 4.0);
    }

    #[tokio::test]
    async fn leaving_the_canvas_loses() {
        let mut adapter = ArtistAdapter::new(square_level());
        let (outcomes, state) = play(&mut adapter, &[Op::move_by("back", -2)]).await;
        assert_eq!(outcomes, vec![Outcome::failure("left the canvas at (-10, 10)")]);
        assert_eq!(state.position, Point::new(10.0, 10.0));
        assert!(state.segments.is_empty());
    }

    #[tokio::test]
    async fn turns_wrap_around() {
        let mut adapter = ArtistAdapter::new(square_level());
        let (_, state) = play(
            &mut adapter,
            &[
                Op::turn_by("r", Direction::Right, 45.0),
                Op::turn_by("l", Direction::Left, 720.0),
            ],
        )
        .await;
        assert_eq!(state.heading, 315.0);
    }

    #[tokio::test]
    async fn farm_ops_are_unsupported() {
        let mut adapter = ArtistAdapter::new(square_level());
        let mut state = adapter.initial_state();
        let err = adapter.apply_op(&Op::harvest("h"), &mut state).await.unwrap_err();
        assert_eq!(err, AdapterError::unsupported(&OpKind::Harvest));
    }
}
