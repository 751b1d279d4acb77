//! Reference games for the Blockscript runtime.
//!
//! Three small adapters that exercise the whole instruction set:
//!
//! - [`MazeAdapter`]: walk a grid to the goal without hitting a wall
//! - [`ArtistAdapter`]: draw lines with a turtle on a bounded canvas
//! - [`FarmAdapter`]: collect items and plant, water and harvest crops
//!
//! Levels are plain JSON files read through the [`Level`] trait. Each
//! adapter animates at the speed of its [`Pace`], which defaults to instant.

pub mod artist;
pub mod error;
pub mod farm;
pub mod grid;
pub mod level;
pub mod maze;
pub mod pace;

pub use artist::{ArtistAdapter, ArtistLevel, ArtistState, Line, Point, Segment};
pub use error::{LevelError, Result};
pub use farm::{FarmAdapter, FarmGoal, FarmLevel, FarmState, Plot};
pub use grid::{Grid, Heading, Position};
pub use level::Level;
pub use maze::{MazeAdapter, MazeLevel, MazeState};
pub use pace::Pace;
