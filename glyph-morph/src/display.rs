use std::str::FromStr;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::grid::Grid;

const UPPER: &str = "▀";
const LOWER: &str = "▄";
const FULL: &str = "█";

/// Draws a grid two pixel rows per terminal row.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    grid: &'a Grid,
    color: Color,
}

impl<'a> GridView<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            color: Color::Reset,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Terminal cells needed to show the whole grid.
    pub fn cell_size(&self) -> (u16, u16) {
        let width = self.grid.width().min(u16::MAX as usize) as u16;
        let height = self.grid.height().div_ceil(2).min(u16::MAX as usize) as u16;
        (width, height)
    }
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.cell_size();
        let style = Style::new().fg(self.color);

        for cy in 0..height.min(area.height) {
            for cx in 0..width.min(area.width) {
                let (x, y) = (cx as usize, cy as usize * 2);

                let Some(symbol) = half_block(self.grid.get(x, y), self.grid.get(x, y + 1)) else {
                    continue;
                };

                let cell = &mut buf[(area.x + cx, area.y + cy)];
                cell.set_symbol(symbol);
                cell.set_style(style);
            }
        }
    }
}

fn half_block(top: bool, bottom: bool) -> Option<&'static str> {
    match (top, bottom) {
        (true, true) => Some(FULL),
        (true, false) => Some(UPPER),
        (false, true) => Some(LOWER),
        (false, false) => None,
    }
}

/// Plain-text rendering with the same half-block packing as [`GridView`].
pub fn to_half_blocks(grid: &Grid) -> String {
    (0..grid.height().div_ceil(2))
        .map(|cy| {
            (0..grid.width())
                .map(|x| half_block(grid.get(x, cy * 2), grid.get(x, cy * 2 + 1)).unwrap_or(" "))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accepts anything ratatui understands (`#rrggbb`, names, indices).
pub fn parse_color(hint: &str) -> Color {
    Color::from_str(hint).unwrap_or_else(|_| {
        tracing::warn!(color = hint, "unrecognised color, using terminal default");
        Color::Reset
    })
}
