use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MorphError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XDirection {
    None,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YDirection {
    None,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::None,
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::UpLeft => "upLeft",
            Direction::UpRight => "upRight",
            Direction::DownLeft => "downLeft",
            Direction::DownRight => "downRight",
        }
    }

    pub fn decompose(self) -> (XDirection, YDirection) {
        match self {
            Direction::None => (XDirection::None, YDirection::None),
            Direction::Up => (XDirection::None, YDirection::Up),
            Direction::Down => (XDirection::None, YDirection::Down),
            Direction::Left => (XDirection::Left, YDirection::None),
            Direction::Right => (XDirection::Right, YDirection::None),
            Direction::UpLeft => (XDirection::Left, YDirection::Up),
            Direction::UpRight => (XDirection::Right, YDirection::Up),
            Direction::DownLeft => (XDirection::Left, YDirection::Down),
            Direction::DownRight => (XDirection::Right, YDirection::Down),
        }
    }

    /// Next direction in [`Direction::ALL`] order, wrapping around.
    pub fn cycle(self) -> Self {
        let i = Self::ALL.iter().position(|&d| d == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = MorphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MorphError::UnknownDirection(s.to_string()))
    }
}

/// Scalar field that sweeps across the grid: 0 where the sweep starts, towards 1 where it ends.
///
/// Diagonals average their two cardinal components. `None` yields `default`.
pub fn normalized_phase(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    direction: Direction,
    default: f64,
) -> f64 {
    let fx = x as f64 / width as f64;
    let fy = y as f64 / height as f64;

    let horizontal = match direction.decompose().0 {
        XDirection::Right => Some(fx),
        XDirection::Left => Some(1.0 - fx),
        XDirection::None => None,
    };
    let vertical = match direction.decompose().1 {
        YDirection::Down => Some(fy),
        YDirection::Up => Some(1.0 - fy),
        YDirection::None => None,
    };

    match (horizontal, vertical) {
        (Some(h), Some(v)) => (h + v) / 2.0,
        (Some(h), None) => h,
        (None, Some(v)) => v,
        (None, None) => default,
    }
}

/// Phase span of one pixel along the swept axis.
pub fn pixel_phase_width(direction: Direction, width: usize, height: usize) -> f64 {
    match direction {
        Direction::Up | Direction::Down => 1.0 / height as f64,
        Direction::Left | Direction::Right => 1.0 / width as f64,
        _ => 1.0 / width.min(height) as f64,
    }
}
