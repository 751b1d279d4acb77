//! Built-in configurations for the bundled games.

use std::collections::BTreeMap;

use collection_literals::btree;
use lazy_static::lazy_static;

use crate::config::{BlockClass, CompilerConfig};

const START: [&str; 2] = ["when_run", "event_start"];
const REPEAT: [&str; 3] = ["controls_repeat", "controls_repeat_ext", "repeat_times"];
const WAIT: [&str; 3] = ["wait", "wait_ms", "wait_seconds"];

lazy_static! {
    static ref PRESETS: BTreeMap<&'static str, CompilerConfig> = btree! {
        "maze" => maze(),
        "artist" => artist(),
        "farm" => farm(),
    };
}

/// Look up a built-in configuration by game name.
pub fn preset(name: &str) -> Option<&'static CompilerConfig> {
    PRESETS.get(name)
}

/// Names of the built-in configurations, sorted.
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.keys().copied()
}

fn common(prefix: &str) -> CompilerConfig {
    let tag = |suffix: &str| format!("{}_{}", prefix, suffix);
    CompilerConfig::new()
        .with(BlockClass::Start, START)
        .with(BlockClass::Start, [tag("start")])
        .with(BlockClass::Move, ["move_forward".to_string(), tag("move_forward")])
        .with(BlockClass::Back, ["move_backward".to_string(), tag("move_backward")])
        .with(BlockClass::TurnLeft, ["turn_left".to_string(), tag("turn_left")])
        .with(BlockClass::TurnRight, ["turn_right".to_string(), tag("turn_right")])
        .with(BlockClass::Repeat, REPEAT)
        .with(BlockClass::Wait, WAIT)
}

fn maze() -> CompilerConfig {
    common("maze")
}

fn artist() -> CompilerConfig {
    common("artist")
        .with(BlockClass::PenUp, ["pen_up", "artist_pen_up"])
        .with(BlockClass::PenDown, ["pen_down", "artist_pen_down"])
        .with(BlockClass::Color, ["set_color", "artist_color"])
        .with(BlockClass::Width, ["set_width", "artist_width"])
}

fn farm() -> CompilerConfig {
    common("farm")
        .with(BlockClass::Collect, ["collect", "farm_collect"])
        .with(BlockClass::Plant, ["plant", "farm_plant"])
        .with(BlockClass::Water, ["water", "farm_water"])
        .with(BlockClass::Harvest, ["harvest", "farm_harvest"])
}
