use std::collections::HashMap;

use crate::error::{MorphError, MorphResult};
use crate::grid::Grid;

/// Turns text into a pixel grid.
pub trait Rasterize {
    fn render(&self, text: &str) -> MorphResult<Grid>;
}

/// One glyph bitmap with its BDF-style placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub rows: Vec<Vec<bool>>,
    pub x_offset: i64,
    pub y_offset: i64,
    pub advance: usize,
}

impl Glyph {
    fn height(&self) -> i64 {
        self.rows.len() as i64
    }
}

/// Fixed-height bitmap font. Glyphs sit on a shared baseline.
#[derive(Debug, Clone, Default)]
pub struct BitmapFont {
    height: usize,
    origin_x: i64,
    origin_y: i64,
    glyphs: HashMap<char, Glyph>,
}

const BUILTIN_WIDTH: usize = 5;

#[rustfmt::skip]
const BUILTIN: &[(char, [u8; 7])] = &[
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    (' ', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    (':', [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    ('+', [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100]),
    ('/', [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000]),
];

impl BitmapFont {
    /// 5×7 digits plus a handful of separators, one blank column between glyphs.
    pub fn builtin() -> Self {
        let glyphs = BUILTIN
            .iter()
            .map(|&(c, bits)| {
                let rows = bits
                    .iter()
                    .map(|&row| {
                        (0..BUILTIN_WIDTH)
                            .map(|x| row & (1 << (BUILTIN_WIDTH - 1 - x)) != 0)
                            .collect()
                    })
                    .collect();

                let glyph = Glyph {
                    rows,
                    x_offset: 0,
                    y_offset: 0,
                    advance: BUILTIN_WIDTH + 1,
                };

                (c, glyph)
            })
            .collect();

        Self {
            height: 7,
            origin_x: 0,
            origin_y: 0,
            glyphs,
        }
    }

    /// Reads the subset of BDF needed for rendering.
    pub fn parse_bdf(source: &str) -> MorphResult<Self> {
        let mut bounding_box: Option<[i64; 4]> = None;
        let mut glyphs = HashMap::new();
        let mut pending: Option<PendingGlyph> = None;
        let mut in_bitmap = false;

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let mut words = raw.split_whitespace();
            let Some(keyword) = words.next() else {
                continue;
            };

            if in_bitmap && keyword != "ENDCHAR" {
                let glyph = pending
                    .as_mut()
                    .ok_or_else(|| MorphError::font(line, "bitmap outside STARTCHAR"))?;
                let row = parse_hex_row(keyword, glyph.width, line)?;
                glyph.rows.push(row);
                continue;
            }

            match keyword {
                "FONTBOUNDINGBOX" => bounding_box = Some(numbers(words, line)?),
                "STARTCHAR" => pending = Some(PendingGlyph::default()),
                "ENCODING" | "DWIDTH" | "BBX" | "BITMAP" => {
                    let glyph = pending.as_mut().ok_or_else(|| {
                        MorphError::font(line, format!("{keyword} outside STARTCHAR"))
                    })?;

                    match keyword {
                        "ENCODING" => glyph.encoding = Some(numbers::<1>(words, line)?[0]),
                        "DWIDTH" => {
                            let [advance] = numbers(words, line)?;
                            glyph.advance = Some(non_negative(advance, line)?);
                        }
                        "BBX" => {
                            let [w, h, x, y] = numbers(words, line)?;
                            glyph.width = non_negative(w, line)?;
                            glyph.height = non_negative(h, line)?;
                            glyph.x_offset = x;
                            glyph.y_offset = y;
                        }
                        _ => in_bitmap = true,
                    }
                }
                "ENDCHAR" => {
                    in_bitmap = false;
                    let glyph = pending
                        .take()
                        .ok_or_else(|| MorphError::font(line, "ENDCHAR without STARTCHAR"))?;

                    if let Some((c, glyph)) = glyph.finish(line)? {
                        glyphs.insert(c, glyph);
                    }
                }
                _ => {}
            }
        }

        let [_, height, origin_x, origin_y] =
            bounding_box.ok_or_else(|| MorphError::font(0, "missing FONTBOUNDINGBOX"))?;

        tracing::debug!(glyphs = glyphs.len(), height, "parsed BDF font");

        Ok(Self {
            height: non_negative(height, 0)?,
            origin_x,
            origin_y,
            glyphs,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }
}

impl Rasterize for BitmapFont {
    fn render(&self, text: &str) -> MorphResult<Grid> {
        let glyphs = text
            .chars()
            .map(|c| self.glyph(c).ok_or(MorphError::GlyphNotFound(c)))
            .collect::<MorphResult<Vec<_>>>()?;

        let width: usize = glyphs.iter().map(|g| g.advance).sum();
        let mut rows = vec![vec![false; width]; self.height];

        // Canvas row 0 is the top of the font bounding box.
        let top = self.height as i64 + self.origin_y;
        let mut pen = 0i64;

        for glyph in glyphs {
            let first_row = top - glyph.y_offset - glyph.height();
            let first_col = pen + glyph.x_offset - self.origin_x;

            for (gy, bits) in glyph.rows.iter().enumerate() {
                let Some(row) = usize::try_from(first_row + gy as i64)
                    .ok()
                    .and_then(|y| rows.get_mut(y))
                else {
                    continue;
                };

                for (gx, &lit) in bits.iter().enumerate() {
                    let x = first_col + gx as i64;

                    if lit && (0..width as i64).contains(&x) {
                        row[x as usize] = true;
                    }
                }
            }

            pen += glyph.advance as i64;
        }

        Ok(Grid::from_rows(rows))
    }
}

#[derive(Default)]
struct PendingGlyph {
    encoding: Option<i64>,
    advance: Option<usize>,
    width: usize,
    height: usize,
    x_offset: i64,
    y_offset: i64,
    rows: Vec<Vec<bool>>,
}

impl PendingGlyph {
    /// Glyphs with no Unicode mapping (`ENCODING -1`) are dropped.
    fn finish(self, line: usize) -> MorphResult<Option<(char, Glyph)>> {
        let encoding = self
            .encoding
            .ok_or_else(|| MorphError::font(line, "glyph without ENCODING"))?;

        let Some(c) = u32::try_from(encoding).ok().and_then(char::from_u32) else {
            return Ok(None);
        };

        if self.rows.len() != self.height {
            return Err(MorphError::font(
                line,
                format!(
                    "glyph {c:?} has {} bitmap rows, BBX says {}",
                    self.rows.len(),
                    self.height
                ),
            ));
        }

        let glyph = Glyph {
            rows: self.rows,
            x_offset: self.x_offset,
            y_offset: self.y_offset,
            advance: self.advance.unwrap_or(self.width),
        };

        Ok(Some((c, glyph)))
    }
}

fn numbers<'a, const N: usize>(
    mut words: impl Iterator<Item = &'a str>,
    line: usize,
) -> MorphResult<[i64; N]> {
    let mut out = [0i64; N];

    for slot in &mut out {
        let word = words
            .next()
            .ok_or_else(|| MorphError::font(line, format!("expected {N} numbers")))?;
        *slot = word
            .parse()
            .map_err(|_| MorphError::font(line, format!("not a number: {word}")))?;
    }

    Ok(out)
}

fn non_negative(value: i64, line: usize) -> MorphResult<usize> {
    usize::try_from(value).map_err(|_| MorphError::font(line, format!("negative size {value}")))
}

/// MSB-first hex row, truncated to `width` pixels.
fn parse_hex_row(hex: &str, width: usize, line: usize) -> MorphResult<Vec<bool>> {
    let mut bits = Vec::with_capacity(hex.len() * 4);

    for digit in hex.chars() {
        let nibble = digit
            .to_digit(16)
            .ok_or_else(|| MorphError::font(line, format!("bad hex digit {digit:?}")))?;

        bits.extend((0..4).rev().map(|shift| nibble & (1 << shift) != 0));
    }

    bits.resize(width, false);

    Ok(bits)
}
