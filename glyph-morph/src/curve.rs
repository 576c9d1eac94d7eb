use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MorphError;

/// Named shaping curves over `[0, 1]`.
///
/// These are the standard easing definitions. Most map 0 to 0 and 1 to 1;
/// the half-sine family and `Tri` rise and fall back to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Curve {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    Halfsine,
    HalfsineQuad,
    HalfsineSqrt,
    Tri,
}

impl Curve {
    pub const ALL: [Curve; 26] = [
        Curve::Linear,
        Curve::InQuad,
        Curve::OutQuad,
        Curve::InOutQuad,
        Curve::InCubic,
        Curve::OutCubic,
        Curve::InOutCubic,
        Curve::InQuart,
        Curve::OutQuart,
        Curve::InOutQuart,
        Curve::InQuint,
        Curve::OutQuint,
        Curve::InOutQuint,
        Curve::InSine,
        Curve::OutSine,
        Curve::InOutSine,
        Curve::InExpo,
        Curve::OutExpo,
        Curve::InOutExpo,
        Curve::InCirc,
        Curve::OutCirc,
        Curve::InOutCirc,
        Curve::Halfsine,
        Curve::HalfsineQuad,
        Curve::HalfsineSqrt,
        Curve::Tri,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Curve::Linear => "linear",
            Curve::InQuad => "inQuad",
            Curve::OutQuad => "outQuad",
            Curve::InOutQuad => "inOutQuad",
            Curve::InCubic => "inCubic",
            Curve::OutCubic => "outCubic",
            Curve::InOutCubic => "inOutCubic",
            Curve::InQuart => "inQuart",
            Curve::OutQuart => "outQuart",
            Curve::InOutQuart => "inOutQuart",
            Curve::InQuint => "inQuint",
            Curve::OutQuint => "outQuint",
            Curve::InOutQuint => "inOutQuint",
            Curve::InSine => "inSine",
            Curve::OutSine => "outSine",
            Curve::InOutSine => "inOutSine",
            Curve::InExpo => "inExpo",
            Curve::OutExpo => "outExpo",
            Curve::InOutExpo => "inOutExpo",
            Curve::InCirc => "inCirc",
            Curve::OutCirc => "outCirc",
            Curve::InOutCirc => "inOutCirc",
            Curve::Halfsine => "halfsine",
            Curve::HalfsineQuad => "halfsineQuad",
            Curve::HalfsineSqrt => "halfsineSqrt",
            Curve::Tri => "tri",
        }
    }

    pub fn apply(self, t: f64) -> f64 {
        match self {
            Curve::Linear => t,
            Curve::InQuad => t * t,
            Curve::OutQuad => t * (2.0 - t),
            Curve::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Curve::InCubic => t * t * t,
            Curve::OutCubic => (t - 1.0).powi(3) + 1.0,
            Curve::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            Curve::InQuart => t.powi(4),
            Curve::OutQuart => 1.0 - (t - 1.0).powi(4),
            Curve::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - 8.0 * (t - 1.0).powi(4)
                }
            }
            Curve::InQuint => t.powi(5),
            Curve::OutQuint => 1.0 + (t - 1.0).powi(5),
            Curve::InOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 + 16.0 * (t - 1.0).powi(5)
                }
            }
            Curve::InSine => 1.0 - (t * PI / 2.0).cos(),
            Curve::OutSine => (t * PI / 2.0).sin(),
            Curve::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Curve::InExpo => 2f64.powf(10.0 * (t - 1.0)),
            Curve::OutExpo => 1.0 - 2f64.powf(-10.0 * t),
            Curve::InOutExpo => {
                let t = t * 2.0;

                if t < 1.0 {
                    2f64.powf(10.0 * (t - 1.0)) / 2.0
                } else {
                    (2.0 - 2f64.powf(-10.0 * (t - 1.0))) / 2.0
                }
            }
            Curve::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Curve::OutCirc => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
            Curve::InOutCirc => {
                let t = t * 2.0;

                if t < 1.0 {
                    -((1.0 - t * t).sqrt() - 1.0) / 2.0
                } else {
                    let t = t - 2.0;
                    ((1.0 - t * t).sqrt() + 1.0) / 2.0
                }
            }
            Curve::Halfsine => (t * PI).sin(),
            Curve::HalfsineQuad => (t * PI).sin().powi(2),
            Curve::HalfsineSqrt => (t * PI).sin().max(0.0).sqrt(),
            Curve::Tri => 1.0 - ((t - 0.5) * 2.0).abs(),
        }
    }

    /// Next curve in [`Curve::ALL`] order, wrapping around.
    pub fn cycle(self) -> Self {
        let i = Self::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = MorphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MorphError::UnknownCurve(s.to_string()))
    }
}

/// A curve plus its input/output inversion flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapedCurve {
    pub curve: Curve,
    pub invert_input: bool,
    pub invert_output: bool,
}

impl ShapedCurve {
    pub const LINEAR: Self = Self::new(Curve::Linear);

    pub const fn new(curve: Curve) -> Self {
        Self {
            curve,
            invert_input: false,
            invert_output: false,
        }
    }

    pub const fn inverted(curve: Curve, invert_input: bool, invert_output: bool) -> Self {
        Self {
            curve,
            invert_input,
            invert_output,
        }
    }

    pub fn apply(&self, t: f64) -> f64 {
        let value = self
            .curve
            .apply(if self.invert_input { 1.0 - t } else { t });

        if self.invert_output { 1.0 - value } else { value }
    }
}

impl From<Curve> for ShapedCurve {
    fn from(curve: Curve) -> Self {
        Self::new(curve)
    }
}
