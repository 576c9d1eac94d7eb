use rand::RngCore;

use crate::direction::{XDirection, YDirection};
use crate::grid::{Grid, Size};
use crate::morph::Frame;

/// What a tile of the 3×3 neighbourhood around the primary tile shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Void,
    First,
    Second,
}

use Source::{First, Second, Void};

/// Tile contents in row-major order; index 4 is the primary tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood(pub [Source; 9]);

impl Neighborhood {
    /// Second grid above and below.
    #[rustfmt::skip]
    pub const VERTICAL: Self = Self([
        Void, Second, Void,
        Void, First, Void,
        Void, Second, Void,
    ]);

    /// Second grid left and right.
    #[rustfmt::skip]
    pub const HORIZONTAL: Self = Self([
        Void, Void, Void,
        Second, First, Second,
        Void, Void, Void,
    ]);

    /// Second grid in the corners, nothing on the sides.
    #[rustfmt::skip]
    pub const DIAGONAL: Self = Self([
        Second, Void, Second,
        Void, First, Void,
        Second, Void, Second,
    ]);

    pub fn for_motion(x: XDirection, y: YDirection) -> Self {
        match (x, y) {
            (XDirection::None, YDirection::Up | YDirection::Down) => Self::VERTICAL,
            (XDirection::Left | XDirection::Right, YDirection::None) => Self::HORIZONTAL,
            _ => Self::DIAGONAL,
        }
    }

    /// `cell_x`, `cell_y` in `0..3`; anything else is void.
    pub fn cell(&self, cell_x: i64, cell_y: i64) -> Source {
        if !(0..3).contains(&cell_x) || !(0..3).contains(&cell_y) {
            return Void;
        }

        self.0[(cell_y * 3 + cell_x) as usize]
    }

    /// Samples the virtual plane where the primary tile at the origin holds
    /// `first` and its neighbours hold whatever this template says.
    pub fn sample(&self, first: &Grid, second: &Grid, x: i64, y: i64, size: Size) -> bool {
        if size.is_empty() {
            return false;
        }

        let (w, h) = (size.width as i64, size.height as i64);
        let px = x.rem_euclid(w) as usize;
        let py = y.rem_euclid(h) as usize;

        match self.cell(x.div_euclid(w) + 1, y.div_euclid(h) + 1) {
            Void => false,
            First => first.get(px, py),
            Second => second.get(px, py),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Scrolls the first grid out and the second in.
///
/// Slot 1 ("Start Edge") and slot 2 ("End Edge") give the scroll progress at
/// the two ends of the perpendicular axis; slot 3 ("Edge Mapping") blends
/// between them, so rows (or columns) can travel at different speeds.
pub fn scroll(frame: &Frame<'_>, _: &mut dyn RngCore) -> Grid {
    let size = frame.size;

    if size.is_empty() {
        return Grid::new(size);
    }

    let [start, end, edge] = &frame.options.curves;
    let start = start.apply(frame.phase);
    let end = end.apply(frame.phase);

    let (xd, yd) = frame.options.direction.decompose();
    let neighborhood = Neighborhood::for_motion(xd, yd);
    let (width, height) = (size.width as f64, size.height as f64);

    let column_shift: Vec<i64> = (0..size.width)
        .map(|x| {
            let x_phase = lerp(start, end, edge.apply(x as f64 / width));
            (x_phase * height).floor() as i64
        })
        .collect();

    let rows = (0..size.height)
        .map(|y| {
            let y_phase = lerp(start, end, edge.apply(y as f64 / height));
            let row_shift = (y_phase * width).floor() as i64;

            (0..size.width)
                .map(|x| {
                    let (x, y) = (x as i64, y as i64);

                    let sx = match xd {
                        XDirection::Left => x + row_shift,
                        XDirection::Right => x - row_shift,
                        XDirection::None => x,
                    };
                    let sy = match yd {
                        YDirection::Up => y + column_shift[x as usize],
                        YDirection::Down => y - column_shift[x as usize],
                        YDirection::None => y,
                    };

                    neighborhood.sample(frame.first, frame.second, sx, sy, size)
                })
                .collect()
        })
        .collect();

    Grid::from_rows(rows)
}
