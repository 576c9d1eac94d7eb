use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::{Curve, ShapedCurve};
use crate::direction::Direction;
use crate::error::MorphResult;
use crate::morph::MorphOptions;
use crate::phase::{self, MAX_SPEED, MIN_SPEED};
use crate::registry::Registry;
use crate::styles;

pub const DEFAULT_COLOR: &str = "#e05d17";
pub const MAX_STAY: f64 = 0.75;

/// A curve slot as persisted: the curve is stored by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveSetting {
    pub name: String,
    pub invert_in: bool,
    pub invert_out: bool,
}

impl Default for CurveSetting {
    fn default() -> Self {
        Self::from(ShapedCurve::LINEAR)
    }
}

impl From<ShapedCurve> for CurveSetting {
    fn from(shaped: ShapedCurve) -> Self {
        Self {
            name: shaped.curve.name().to_string(),
            invert_in: shaped.invert_input,
            invert_out: shaped.invert_output,
        }
    }
}

impl CurveSetting {
    /// Unknown names fall back to linear.
    pub fn to_shaped(&self) -> ShapedCurve {
        let curve = self.name.parse().unwrap_or_else(|_| {
            tracing::warn!(name = %self.name, "unknown curve, using linear");
            Curve::Linear
        });

        ShapedCurve::inverted(curve, self.invert_in, self.invert_out)
    }
}

/// Everything the driver needs to reproduce a morph, stored as camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MorphParams {
    pub text1: String,
    pub text2: String,
    pub style: String,
    pub direction: Direction,
    pub speed: u32,
    pub stay_start: f64,
    pub stay_end: f64,
    pub mapping1: CurveSetting,
    pub mapping2: CurveSetting,
    pub mapping3: CurveSetting,
    pub pingpong: bool,
    pub color: String,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            text1: "19".into(),
            text2: "20".into(),
            style: styles::FLICKER.into(),
            direction: Direction::Down,
            speed: 30,
            stay_start: 0.0,
            stay_end: 0.0,
            mapping1: CurveSetting::default(),
            mapping2: CurveSetting::default(),
            mapping3: CurveSetting::default(),
            pingpong: false,
            color: DEFAULT_COLOR.into(),
        }
    }
}

impl MorphParams {
    /// Defaults with the registry's first style selected.
    pub fn for_registry(registry: &Registry) -> MorphResult<Self> {
        Ok(Self {
            style: registry.default_name()?.to_string(),
            ..Self::default()
        })
    }

    /// A missing file yields defaults; unreadable or malformed files are errors.
    pub fn load(path: &Path) -> MorphResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no saved params, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        let mut params: Self = serde_json::from_str(&text)?;
        params.validate();

        Ok(params)
    }

    pub fn save(&self, path: &Path) -> MorphResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        tracing::debug!(path = %path.display(), "saved params");

        Ok(())
    }

    /// Clamps stays to `[0, 0.75]` and speed to `1..=500`.
    pub fn validate(&mut self) {
        let stay_start = clamp_stay(self.stay_start);
        let stay_end = clamp_stay(self.stay_end);
        let speed = self.speed.clamp(MIN_SPEED, MAX_SPEED);

        if stay_start != self.stay_start || stay_end != self.stay_end || speed != self.speed {
            tracing::warn!(
                self.stay_start,
                self.stay_end,
                self.speed,
                "clamping out-of-range params"
            );
        }

        self.stay_start = stay_start;
        self.stay_end = stay_end;
        self.speed = speed;
    }

    pub fn curves(&self) -> [ShapedCurve; 3] {
        [
            self.mapping1.to_shaped(),
            self.mapping2.to_shaped(),
            self.mapping3.to_shaped(),
        ]
    }

    pub fn mapping_mut(&mut self, slot: usize) -> Option<&mut CurveSetting> {
        match slot {
            0 => Some(&mut self.mapping1),
            1 => Some(&mut self.mapping2),
            2 => Some(&mut self.mapping3),
            _ => None,
        }
    }

    pub fn options(&self) -> MorphOptions {
        MorphOptions {
            direction: self.direction,
            curves: self.curves(),
        }
    }

    /// Raw clock phase with the stay dead-zones applied, capped at 1.
    pub fn shaped_phase(&self, raw: f64) -> f64 {
        phase::apply_stay(raw, self.stay_start, self.stay_end).min(1.0)
    }

    /// Counter mode: `text1` becomes `n + increment`, `text2` becomes `n + 2 * increment`,
    /// where `n` is the integer `text1` starts with (0 if none). Saturates at the `i64` range.
    pub fn advance_counter(&mut self, increment: i64) {
        let n = leading_integer(&self.text1).unwrap_or(0);
        let step = increment.saturating_mul(2);

        let (next, after) = match (n.checked_add(increment), n.checked_add(step)) {
            (Some(next), Some(after)) => (next, after),
            _ => {
                tracing::warn!(n, increment, "counter out of range, saturating");
                (n.saturating_add(increment), n.saturating_add(step))
            }
        };

        self.text1 = next.to_string();
        self.text2 = after.to_string();
    }
}

/// Optional sign then decimal digits at the start of `text`, after leading whitespace.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let negative = text.starts_with('-');
    let sign_len = usize::from(negative || text.starts_with('+'));

    let digit_len = text[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }

    let number = &text[..sign_len + digit_len];
    Some(number.parse().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

fn clamp_stay(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_STAY)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("glyph-morph-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn defaults_match_first_style() {
        let registry = Registry::builtin();
        let params = MorphParams::for_registry(&registry).unwrap();

        assert_eq!(params.style, registry.default_name().unwrap());
        assert_eq!(params, MorphParams::default());
        assert!(MorphParams::for_registry(&Registry::new()).is_err());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let params: MorphParams =
            serde_json::from_str(r#"{ "text1": "7", "direction": "upLeft" }"#).unwrap();

        assert_eq!(params.text1, "7");
        assert_eq!(params.text2, "20");
        assert_eq!(params.direction, Direction::UpLeft);
        assert_eq!(params.speed, 30);
        assert_eq!(params.color, DEFAULT_COLOR);
    }

    #[test]
    fn json_uses_camel_case() {
        let json = serde_json::to_value(MorphParams::default()).unwrap();

        assert_eq!(json["stayStart"], 0.0);
        assert_eq!(json["mapping1"]["invertIn"], false);
        assert_eq!(json["mapping1"]["name"], "linear");
        assert_eq!(json["direction"], "down");
    }

    #[test]
    fn unknown_curve_falls_back_to_linear() {
        let setting = CurveSetting {
            name: "bounce".into(),
            invert_in: true,
            invert_out: false,
        };

        assert_eq!(setting.to_shaped(), ShapedCurve::inverted(Curve::Linear, true, false));
    }

    #[test]
    fn validate_clamps() {
        let mut params = MorphParams {
            stay_start: 0.9,
            stay_end: -1.0,
            speed: 0,
            ..MorphParams::default()
        };
        params.validate();

        assert_eq!(params.stay_start, MAX_STAY);
        assert_eq!(params.stay_end, 0.0);
        assert_eq!(params.speed, MIN_SPEED);
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip");
        let mut params = MorphParams {
            text1: "42".into(),
            style: styles::SCROLL.into(),
            pingpong: true,
            ..MorphParams::default()
        };
        params.mapping3 = ShapedCurve::inverted(Curve::OutExpo, false, true).into();

        params.save(&path).unwrap();
        let loaded = MorphParams::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, params);
        assert_eq!(loaded.options().curves[2], ShapedCurve::inverted(Curve::OutExpo, false, true));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let loaded = MorphParams::load(&temp_path("does-not-exist")).unwrap();
        assert_eq!(loaded, MorphParams::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{ not json").unwrap();
        let result = MorphParams::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(crate::error::MorphError::Json(_))));
    }

    #[test]
    fn loaded_params_are_validated() {
        let path = temp_path("clamped");
        std::fs::write(&path, r#"{ "stayEnd": 2.0, "speed": 9000 }"#).unwrap();
        let loaded = MorphParams::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.stay_end, MAX_STAY);
        assert_eq!(loaded.speed, MAX_SPEED);
    }

    #[test]
    fn shaped_phase_applies_stay() {
        let params = MorphParams {
            stay_start: 0.25,
            stay_end: 0.25,
            ..MorphParams::default()
        };

        assert_eq!(params.shaped_phase(0.1), 0.0);
        assert_eq!(params.shaped_phase(0.5), 0.5);
        assert_eq!(params.shaped_phase(0.8), 1.0);
    }

    #[test]
    fn counter_steps_both_texts() {
        let mut params = MorphParams::default();

        params.advance_counter(1);
        assert_eq!((params.text1.as_str(), params.text2.as_str()), ("20", "21"));

        params.advance_counter(-1);
        assert_eq!((params.text1.as_str(), params.text2.as_str()), ("19", "18"));

        params.text1 = "abc".into();
        params.advance_counter(1);
        assert_eq!((params.text1.as_str(), params.text2.as_str()), ("1", "2"));
    }

    #[test]
    fn counter_reads_leading_digits() {
        let mut params = MorphParams {
            text1: "12abc".into(),
            ..MorphParams::default()
        };
        params.advance_counter(1);
        assert_eq!((params.text1.as_str(), params.text2.as_str()), ("13", "14"));

        params.text1 = "  -7:30".into();
        params.advance_counter(-1);
        assert_eq!((params.text1.as_str(), params.text2.as_str()), ("-8", "-9"));

        params.text1 = "+4".into();
        params.advance_counter(1);
        assert_eq!(params.text1, "5");

        params.text1 = "-".into();
        params.advance_counter(1);
        assert_eq!(params.text1, "1");
    }

    #[test]
    fn counter_saturates_instead_of_overflowing() {
        let mut params = MorphParams {
            text1: i64::MAX.to_string(),
            ..MorphParams::default()
        };
        params.advance_counter(1);
        assert_eq!(params.text1, i64::MAX.to_string());
        assert_eq!(params.text2, i64::MAX.to_string());

        params.text1 = (i64::MIN + 1).to_string();
        params.advance_counter(-1);
        assert_eq!(params.text1, i64::MIN.to_string());
        assert_eq!(params.text2, i64::MIN.to_string());

        params.text1 = "99999999999999999999".into();
        params.advance_counter(-1);
        assert_eq!(params.text1, (i64::MAX - 1).to_string());
    }

    #[test]
    fn mapping_slots_are_addressable() {
        let mut params = MorphParams::default();

        if let Some(slot) = params.mapping_mut(1) {
            slot.name = "tri".into();
        }

        assert!(params.mapping_mut(3).is_none());
        assert_eq!(params.curves()[1].curve, Curve::Tri);
    }
}
