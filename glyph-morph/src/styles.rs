use rand::{Rng, RngCore};

use crate::direction::{normalized_phase, pixel_phase_width};
use crate::grid::{Grid, combine};
use crate::morph::Frame;

pub const FLICKER: &str = "flicker";
pub const COVER: &str = "cover";
pub const COVER_WITH_BORDER: &str = "coverWithBorder";
pub const SCROLL: &str = "scroll";

/// Random per-pixel switch. Pixels stay on the first grid while
/// `probability(rand) * movement(field) > phase`; for `None` the field is 1.
pub fn flicker(frame: &Frame<'_>, rng: &mut dyn RngCore) -> Grid {
    let movement = frame.options.curve(0);
    let probability = frame.options.curve(1);
    let direction = frame.options.direction;
    let (width, height) = (frame.size.width, frame.size.height);

    combine(frame.first, frame.second, |c1, c2, x, y| {
        let field = movement.apply(normalized_phase(x, y, width, height, direction, 1.0));
        let draw = probability.apply(rng.r#gen::<f64>());

        if draw * field > frame.phase { c1 } else { c2 }
    })
}

/// Hard edge sweeping across the grid.
pub fn cover(frame: &Frame<'_>, _: &mut dyn RngCore) -> Grid {
    let edge = frame.options.curve(0);
    let direction = frame.options.direction;
    let (width, height) = (frame.size.width, frame.size.height);

    combine(frame.first, frame.second, |c1, c2, x, y| {
        let field = edge.apply(normalized_phase(x, y, width, height, direction, 0.5));

        if field < frame.phase { c2 } else { c1 }
    })
}

/// Like [`cover`], with pixels within half a pixel of the edge blanked out.
pub fn cover_with_border(frame: &Frame<'_>, _: &mut dyn RngCore) -> Grid {
    let edge = frame.options.curve(0);
    let direction = frame.options.direction;
    let (width, height) = (frame.size.width, frame.size.height);
    let half_pixel = pixel_phase_width(direction, width, height) / 2.0;

    combine(frame.first, frame.second, |c1, c2, x, y| {
        let field = edge.apply(normalized_phase(x, y, width, height, direction, 0.5));

        if (field - frame.phase).abs() < half_pixel {
            false
        } else if field < frame.phase {
            c2
        } else {
            c1
        }
    })
}
