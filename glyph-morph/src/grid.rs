use std::fmt;

/// Width and height of a grid, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Rectangular boolean pixel matrix, indexed `[row][col]` from the top-left.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    rows: Vec<Vec<bool>>,
}

impl Grid {
    pub fn new(size: Size) -> Self {
        Self {
            rows: vec![vec![false; size.width]; size.height],
        }
    }

    /// Ragged input is padded on the right with `false` up to the widest row.
    pub fn from_rows(mut rows: Vec<Vec<bool>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        for row in &mut rows {
            row.resize(width, false);
        }

        Self { rows }
    }

    /// `#` is a lit pixel, anything else is unlit. Lines are rows.
    pub fn parse(text: &str) -> Self {
        Self::from_rows(
            text.lines()
                .map(|line| line.chars().map(|c| c == '#').collect())
                .collect(),
        )
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.rows.first().map_or(0, Vec::len),
            height: self.rows.len(),
        }
    }

    pub fn width(&self) -> usize {
        self.size().width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Out-of-range reads are unlit.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    pub fn lit_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&c| c).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }

            for &cell in row {
                f.write_str(if cell { "#" } else { "." })?;
            }
        }

        Ok(())
    }
}

pub fn max_size(a: Size, b: Size) -> Size {
    Size {
        width: a.width.max(b.width),
        height: a.height.max(b.height),
    }
}

/// Truncates or pads with `false` on the right and bottom to exactly `target`.
pub fn resize(grid: &Grid, target: Size) -> Grid {
    let rows = (0..target.height)
        .map(|y| match grid.rows.get(y) {
            Some(row) => {
                let mut row: Vec<bool> = row.iter().copied().take(target.width).collect();
                row.resize(target.width, false);
                row
            }
            None => vec![false; target.width],
        })
        .collect();

    Grid { rows }
}

/// Brings both grids to their common (elementwise max) size.
pub fn reconcile(a: &Grid, b: &Grid) -> (Grid, Grid, Size) {
    let size = max_size(a.size(), b.size());

    (resize(a, size), resize(b, size), size)
}

/// Grids must have the same size; reconcile first.
pub fn combine(a: &Grid, b: &Grid, mut op: impl FnMut(bool, bool, usize, usize) -> bool) -> Grid {
    debug_assert_eq!(a.size(), b.size(), "grids must have the same size");

    let rows = a
        .rows
        .iter()
        .zip(&b.rows)
        .enumerate()
        .map(|(y, (ra, rb))| {
            ra.iter()
                .zip(rb)
                .enumerate()
                .map(|(x, (&ca, &cb))| op(ca, cb, x, y))
                .collect()
        })
        .collect();

    Grid { rows }
}

/// Drops leading and trailing all-`false` rows. Interior blank rows stay.
pub fn trim_empty_rows(grid: &Grid) -> Grid {
    let lit = |row: &Vec<bool>| row.iter().any(|&c| c);

    let Some(first) = grid.rows.iter().position(|row| lit(row)) else {
        return Grid::default();
    };
    let last = grid.rows.iter().rposition(|row| lit(row)).unwrap_or(first);

    Grid {
        rows: grid.rows[first..=last].to_vec(),
    }
}

pub fn pad_rows(grid: &Grid, n: usize) -> Grid {
    let width = grid.width();
    let mut rows = grid.rows.clone();
    rows.extend(std::iter::repeat_n(vec![false; width], n));

    Grid { rows }
}
