use rand::RngCore;

use crate::curve::ShapedCurve;
use crate::direction::Direction;
use crate::grid::{self, Grid, Size};
use crate::registry::Registry;

/// Per-invocation knobs. Styles read only the first `arity` curve slots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MorphOptions {
    pub direction: Direction,
    pub curves: [ShapedCurve; 3],
}

impl MorphOptions {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            curves: [ShapedCurve::LINEAR; 3],
        }
    }

    pub fn with_curve(mut self, slot: usize, curve: impl Into<ShapedCurve>) -> Self {
        if let Some(target) = self.curves.get_mut(slot) {
            *target = curve.into();
        }

        self
    }

    pub fn curve(&self, slot: usize) -> &ShapedCurve {
        &self.curves[slot.min(2)]
    }
}

/// Everything a style sees for one frame. Both grids are already `size`.
pub struct Frame<'a> {
    pub first: &'a Grid,
    pub second: &'a Grid,
    pub size: Size,
    pub phase: f64,
    pub options: &'a MorphOptions,
}

/// Interpolates between two grids at `phase`.
///
/// `phase < 0` yields `first`, `phase >= 1` yields `second`; both come back
/// resized to the common size. Unknown style names also yield `first`.
pub fn morph(
    registry: &Registry,
    first: &Grid,
    second: &Grid,
    phase: f64,
    style: &str,
    options: &MorphOptions,
    rng: &mut dyn RngCore,
) -> Grid {
    let (first, second, size) = grid::reconcile(first, second);

    if phase < 0.0 {
        return first;
    }

    if phase >= 1.0 {
        return second;
    }

    let Some(entry) = registry.get(style) else {
        tracing::debug!(style, "unknown style, showing first grid");
        return first;
    };

    tracing::trace!(style, phase, width = size.width, height = size.height, "morph");

    let frame = Frame {
        first: &first,
        second: &second,
        size,
        phase,
        options,
    };

    entry.apply(&frame, rng)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::curve::Curve;
    use crate::grid::max_size;
    use crate::styles;

    use super::*;

    fn pair() -> (Grid, Grid) {
        (
            Grid::parse("#.#.\n.#.#\n#.#.\n.#.#"),
            Grid::parse("####\n#..#\n####"),
        )
    }

    fn option_grid() -> Vec<MorphOptions> {
        let mut out = Vec::new();

        for direction in Direction::ALL {
            for curve in [Curve::Linear, Curve::InOutCubic, Curve::Halfsine, Curve::Tri] {
                out.push(MorphOptions::new(direction).with_curve(0, curve).with_curve(2, curve));
                out.push(
                    MorphOptions::new(direction)
                        .with_curve(1, ShapedCurve::inverted(curve, true, false))
                        .with_curve(2, ShapedCurve::inverted(curve, false, true)),
                );
            }
        }

        out
    }

    #[test]
    fn boundaries_clamp_for_every_style() {
        let registry = Registry::builtin();
        let (a, b) = pair();
        let (ra, rb, _) = grid::reconcile(&a, &b);
        let mut rng = StdRng::seed_from_u64(7);

        for name in registry.names() {
            for options in option_grid() {
                for phase in [-1.0, -0.01, f64::NEG_INFINITY] {
                    assert_eq!(morph(&registry, &a, &b, phase, name, &options, &mut rng), ra);
                }

                for phase in [1.0, 1.5, f64::INFINITY] {
                    assert_eq!(morph(&registry, &a, &b, phase, name, &options, &mut rng), rb);
                }
            }
        }
    }

    #[test]
    fn output_size_is_common_size() {
        let registry = Registry::builtin();
        let (a, b) = pair();
        let expected = max_size(a.size(), b.size());
        let mut rng = StdRng::seed_from_u64(1);

        for name in registry.names() {
            for options in option_grid() {
                for i in -2..=12 {
                    let phase = i as f64 / 10.0;
                    let out = morph(&registry, &a, &b, phase, name, &options, &mut rng);
                    assert_eq!(out.size(), expected, "{name} at {phase}");
                }
            }
        }
    }

    #[test]
    fn unknown_style_falls_back_to_first() {
        let registry = Registry::builtin();
        let (a, b) = pair();
        let (ra, _, _) = grid::reconcile(&a, &b);
        let mut rng = StdRng::seed_from_u64(0);

        let out = morph(&registry, &a, &b, 0.5, "melt", &MorphOptions::default(), &mut rng);
        assert_eq!(out, ra);
    }

    #[test]
    fn empty_grids_are_tolerated() {
        let registry = Registry::builtin();
        let mut rng = StdRng::seed_from_u64(0);
        let options = MorphOptions::new(Direction::DownRight);

        let empty = Grid::default();
        let pair = Grid::parse("##");

        for name in registry.names() {
            let out = morph(&registry, &empty, &empty, 0.5, name, &options, &mut rng);
            assert!(out.is_empty());

            let out = morph(&registry, &empty, &pair, 0.5, name, &options, &mut rng);
            assert_eq!(out.size(), Size::new(2, 1));
        }
    }

    #[test]
    fn cover_center_dot_scenario() {
        let registry = Registry::builtin();
        let first = Grid::parse("...\n.#.\n...");
        let second = Grid::parse("...\n...\n...");
        let mut rng = StdRng::seed_from_u64(0);
        let options = MorphOptions::new(Direction::Down);

        // Row y shows the second grid iff y / 3 < 0.5: rows 0 and 1 switch, row 2 stays.
        let out = morph(&registry, &first, &second, 0.5, styles::COVER, &options, &mut rng);
        assert_eq!(out.to_string(), "...\n...\n...");

        // Just past 1/3 only row 0 has switched, so the dot is still visible.
        let out = morph(&registry, &first, &second, 0.3, styles::COVER, &options, &mut rng);
        assert_eq!(out.to_string(), "...\n.#.\n...");
    }

    #[test]
    fn with_curve_ignores_out_of_range_slot() {
        let options = MorphOptions::default().with_curve(5, Curve::InQuad);
        assert_eq!(options, MorphOptions::default());
    }
}
