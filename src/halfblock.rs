//! Half-block encoding of a framebuffer for the terminal.
//!
//! Each cell covers two vertically stacked pixels: the upper half block
//! `▀` takes the top pixel as foreground and the bottom pixel as background.

use crate::color::Rgb;
use crate::graphics::Framebuffer;
use crossterm::style::{Print, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue};
use std::io::{self, Write};

pub const UPPER_HALF: char = '▀';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

/// Converts the framebuffer into rows of cells; an odd trailing pixel row
/// is paired with itself
pub fn encode(fb: &Framebuffer) -> Vec<Vec<Cell>> {
    let rows = fb.height.div_ceil(2);
    (0..rows)
        .map(|row| {
            (0..fb.width)
                .map(|x| {
                    let top = fb.pixel(x, row * 2).unwrap_or(Rgb::BLACK);
                    let bottom = fb.pixel(x, row * 2 + 1).unwrap_or(top);
                    if top == bottom {
                        Cell { ch: ' ', fg: top, bg: bottom }
                    } else {
                        Cell { ch: UPPER_HALF, fg: top, bg: bottom }
                    }
                })
                .collect()
        })
        .collect()
}

/// Queues the encoded cells at (`col`, `row`), emitting colour changes only
/// when they differ from the previous cell
pub fn queue_cells<W: Write>(out: &mut W, cells: &[Vec<Cell>], col: u16, row: u16) -> io::Result<()> {
    for (dy, line) in cells.iter().enumerate() {
        queue!(out, cursor::MoveTo(col, row + dy as u16))?;
        let mut last: Option<(Rgb, Rgb)> = None;
        for cell in line {
            if last.map(|(fg, _)| fg != cell.fg).unwrap_or(true) {
                queue!(out, SetForegroundColor(cell.fg.into()))?;
            }
            if last.map(|(_, bg)| bg != cell.bg).unwrap_or(true) {
                queue!(out, SetBackgroundColor(cell.bg.into()))?;
            }
            queue!(out, Print(cell.ch))?;
            last = Some((cell.fg, cell.bg));
        }
    }
    Ok(())
}
