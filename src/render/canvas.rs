// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

pub const BOX_HORIZONTAL: char = '─';
pub const BOX_VERTICAL: char = '│';
pub const BOX_TOP_LEFT: char = '┌';
pub const BOX_TOP_RIGHT: char = '┐';
pub const BOX_BOTTOM_LEFT: char = '└';
pub const BOX_BOTTOM_RIGHT: char = '┘';
pub const BOX_TEE_RIGHT: char = '├';
pub const BOX_TEE_LEFT: char = '┤';
pub const BOX_TEE_DOWN: char = '┬';
pub const BOX_TEE_UP: char = '┴';
pub const BOX_CROSS: char = '┼';

/// Which of the four neighbours a box-drawing cell reaches towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Arms(u8);

impl Arms {
    const LEFT: Self = Self(1);
    const RIGHT: Self = Self(1 << 1);
    const UP: Self = Self(1 << 2);
    const DOWN: Self = Self(1 << 3);
    const HORIZONTAL: Self = Self(Self::LEFT.0 | Self::RIGHT.0);
    const VERTICAL: Self = Self(Self::UP.0 | Self::DOWN.0);

    fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn has(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    fn from_char(ch: char) -> Option<Self> {
        let arms = match ch {
            BOX_HORIZONTAL => Self::HORIZONTAL,
            BOX_VERTICAL => Self::VERTICAL,
            BOX_TOP_LEFT => Self::RIGHT.with(Self::DOWN),
            BOX_TOP_RIGHT => Self::LEFT.with(Self::DOWN),
            BOX_BOTTOM_LEFT => Self::RIGHT.with(Self::UP),
            BOX_BOTTOM_RIGHT => Self::LEFT.with(Self::UP),
            BOX_TEE_RIGHT => Self::VERTICAL.with(Self::RIGHT),
            BOX_TEE_LEFT => Self::VERTICAL.with(Self::LEFT),
            BOX_TEE_DOWN => Self::HORIZONTAL.with(Self::DOWN),
            BOX_TEE_UP => Self::HORIZONTAL.with(Self::UP),
            BOX_CROSS => Self::HORIZONTAL.with(Self::VERTICAL),
            _ => return None,
        };
        Some(arms)
    }

    fn to_char(self) -> char {
        let left = self.has(Self::LEFT);
        let right = self.has(Self::RIGHT);
        let up = self.has(Self::UP);
        let down = self.has(Self::DOWN);
        match (left, right, up, down) {
            (false, false, false, false) => ' ',
            (_, _, false, false) => BOX_HORIZONTAL,
            (false, false, _, _) => BOX_VERTICAL,
            (false, true, false, true) => BOX_TOP_LEFT,
            (true, false, false, true) => BOX_TOP_RIGHT,
            (false, true, true, false) => BOX_BOTTOM_LEFT,
            (true, false, true, false) => BOX_BOTTOM_RIGHT,
            (false, true, true, true) => BOX_TEE_RIGHT,
            (true, false, true, true) => BOX_TEE_LEFT,
            (true, true, false, true) => BOX_TEE_DOWN,
            (true, true, true, false) => BOX_TEE_UP,
            (true, true, true, true) => BOX_CROSS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    arms: Arms,
}

/// A bounds-checked character grid.
///
/// Plain characters overwrite whatever was in the cell. Box-drawing characters accumulate their
/// arms, so crossing lines and lines meeting a box border render as junctions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("canvas area overflow: {width}*{height}")]
    AreaOverflow { width: usize, height: usize },
    #[error("out of bounds: ({x},{y}) for {width}x{height} canvas")]
    OutOfBounds { x: usize, y: usize, width: usize, height: usize },
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let len =
            width.checked_mul(height).ok_or(CanvasError::AreaOverflow { width, height })?;
        Ok(Self { width, height, cells: vec![Cell { ch: ' ', arms: Arms::default() }; len] })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> CanvasError {
        CanvasError::OutOfBounds { x, y, width: self.width, height: self.height }
    }

    fn check(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(self.out_of_bounds(x, y))
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.check(x, y)?;
        Ok(self.glyph(x, y, idx))
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.check(x, y)?;
        let cell = &mut self.cells[idx];
        match Arms::from_char(ch) {
            Some(arms) => cell.arms = cell.arms.with(arms),
            None => *cell = Cell { ch, arms: Arms::default() },
        }
        Ok(())
    }

    /// Writes `text` starting at `(x, y)`, clipping at the right edge.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        if y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        for (offset, ch) in text.chars().enumerate() {
            let cx = x + offset;
            if cx >= self.width {
                break;
            }
            self.set(cx, y, ch)?;
        }
        Ok(())
    }

    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize) -> Result<(), CanvasError> {
        let (from, to) = (x0.min(x1), x0.max(x1));
        self.check(from, y)?;
        self.check(to, y)?;
        for x in from..=to {
            self.set(x, y, BOX_HORIZONTAL)?;
        }
        Ok(())
    }

    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) -> Result<(), CanvasError> {
        let (from, to) = (y0.min(y1), y0.max(y1));
        self.check(x, from)?;
        self.check(x, to)?;
        for y in from..=to {
            self.set(x, y, BOX_VERTICAL)?;
        }
        Ok(())
    }

    /// Draws a single-line box with opposite corners at `(x0, y0)` and `(x1, y1)`.
    ///
    /// Nothing is drawn when any part of the box would fall outside the canvas.
    pub fn draw_box(
        &mut self,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Result<(), CanvasError> {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        self.check(left, top)?;
        self.check(right, bottom)?;

        if left == right || top == bottom {
            self.draw_hline(left, right, top)?;
            return self.draw_vline(left, top, bottom);
        }

        for x in left + 1..right {
            self.set(x, top, BOX_HORIZONTAL)?;
            self.set(x, bottom, BOX_HORIZONTAL)?;
        }
        for y in top + 1..bottom {
            self.set(left, y, BOX_VERTICAL)?;
            self.set(right, y, BOX_VERTICAL)?;
        }
        self.set(left, top, BOX_TOP_LEFT)?;
        self.set(right, top, BOX_TOP_RIGHT)?;
        self.set(left, bottom, BOX_BOTTOM_LEFT)?;
        self.set(right, bottom, BOX_BOTTOM_RIGHT)
    }

    fn arms_at(&self, x: usize, y: usize) -> Arms {
        self.cells[y * self.width + x].arms
    }

    /// Box cells only keep the arms that meet an arm of the neighbouring cell, so a line ending
    /// next to a border does not sprout a stub.
    fn glyph(&self, x: usize, y: usize, idx: usize) -> char {
        let cell = self.cells[idx];
        if cell.arms.is_empty() {
            return cell.ch;
        }

        let mut joined = Arms::default();
        if cell.arms.has(Arms::LEFT) && x > 0 && self.arms_at(x - 1, y).has(Arms::RIGHT) {
            joined = joined.with(Arms::LEFT);
        }
        if cell.arms.has(Arms::RIGHT)
            && x + 1 < self.width
            && self.arms_at(x + 1, y).has(Arms::LEFT)
        {
            joined = joined.with(Arms::RIGHT);
        }
        if cell.arms.has(Arms::UP) && y > 0 && self.arms_at(x, y - 1).has(Arms::DOWN) {
            joined = joined.with(Arms::UP);
        }
        if cell.arms.has(Arms::DOWN)
            && y + 1 < self.height
            && self.arms_at(x, y + 1).has(Arms::UP)
        {
            joined = joined.with(Arms::DOWN);
        }

        if joined.is_empty() {
            cell.arms.to_char()
        } else {
            joined.to_char()
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(move |y| {
            (0..self.width).map(|x| self.glyph(x, y, y * self.width + x)).collect::<String>()
        })
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, line) in self.lines().enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&line)?;
        }
        Ok(())
    }
}
