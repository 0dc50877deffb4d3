use tracing::{error, trace};

use crate::error::EncodeError;
use crate::format::{Color, Coordinate, Direction, Instruction};

use super::Encoder;

/// A maximal straight run of undrawn target pixels, from `start` to `end`
/// inclusive. Horizontal and vertical lines run left-to-right and
/// top-to-bottom; a point has `start == end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Line {
    pub start: Coordinate,
    pub end: Coordinate,
    pub axis: Axis,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Axis {
    Horizontal,
    Vertical,
    Point,
}

impl Line {
    pub fn len(&self) -> u64 {
        (self.end.x - self.start.x + self.end.y - self.start.y) as u64 + 1
    }

    /// Cells from which a single straight run reaches into the line.
    pub fn approaches(&self) -> Vec<Coordinate> {
        match self.axis {
            Axis::Horizontal => vec![
                self.start.step(Direction::Left),
                self.end.step(Direction::Right),
            ],
            Axis::Vertical => vec![
                self.start.step(Direction::Up),
                self.end.step(Direction::Down),
            ],
            Axis::Point => Direction::ALL.iter().map(|&d| self.start.step(d)).collect(),
        }
    }
}

/// Number of non-painting moves needed to get from `from` to `to`.
fn relocation_cost(from: Coordinate, to: Coordinate) -> u8 {
    u8::from(from.x != to.x) + u8::from(from.y != to.y)
}

impl Encoder<'_> {
    /// Undrawn `target` pixels grouped into lines: horizontal runs row by row,
    /// then vertical runs column by column, then every pixel in neither.
    pub(super) fn lines(&self, target: Color) -> Vec<Line> {
        let height = self.raster.height() as i64;
        let width = self.raster.width() as i64;
        let pending = |x: i64, y: i64| {
            let at = Coordinate::new(x, y);
            self.raster.at(at) == Some(target) && !self.drawn.contains(&at)
        };

        let mut lines = Vec::new();
        let mut covered = vec![false; (height * width) as usize];

        for y in 0..height {
            let mut x = 0;
            while x < width {
                let start = x;
                while x < width && pending(x, y) {
                    x += 1;
                }
                if x - start >= 2 {
                    for cx in start..x {
                        covered[(y * width + cx) as usize] = true;
                    }
                    lines.push(Line {
                        start: Coordinate::new(start, y),
                        end: Coordinate::new(x - 1, y),
                        axis: Axis::Horizontal,
                    });
                }
                x += 1;
            }
        }

        for x in 0..width {
            let mut y = 0;
            while y < height {
                let start = y;
                while y < height && pending(x, y) {
                    y += 1;
                }
                if y - start >= 2 {
                    for cy in start..y {
                        covered[(cy * width + x) as usize] = true;
                    }
                    lines.push(Line {
                        start: Coordinate::new(x, start),
                        end: Coordinate::new(x, y - 1),
                        axis: Axis::Vertical,
                    });
                }
                y += 1;
            }
        }

        for y in 0..height {
            for x in 0..width {
                if pending(x, y) && !covered[(y * width + x) as usize] {
                    let at = Coordinate::new(x, y);
                    lines.push(Line {
                        start: at,
                        end: at,
                        axis: Axis::Point,
                    });
                }
            }
        }

        lines
    }

    /// Move the cursor, without painting, next to the cheapest line to reach.
    /// Equal costs go to the longer line, then to the first found.
    pub(super) fn relocate(&mut self, target: Color) -> Result<(), EncodeError> {
        let mut best: Option<(u8, u64, Coordinate)> = None;
        for line in self.lines(target) {
            for approach in line.approaches() {
                let cost = relocation_cost(self.cursor, approach);
                let better = match best {
                    None => true,
                    Some((c, len, _)) => cost < c || (cost == c && line.len() > len),
                };
                if better {
                    best = Some((cost, line.len(), approach));
                }
            }
        }

        let Some((cost, _, to)) = best else {
            error!(
                %target,
                x = self.cursor.x,
                y = self.cursor.y,
                "stuck with no relocation candidate"
            );
            return Err(EncodeError::StuckWithNoCandidate {
                color: target,
                x: self.cursor.x,
                y: self.cursor.y,
            });
        };

        trace!(from = ?self.cursor, ?to, cost, "relocating");
        let from = self.cursor;
        if to.x != from.x {
            let direction = if to.x > from.x {
                Direction::Right
            } else {
                Direction::Left
            };
            self.emit(Instruction::travel(direction, span(from.x, to.x)));
        }
        if to.y != from.y {
            let direction = if to.y > from.y {
                Direction::Down
            } else {
                Direction::Up
            };
            self.emit(Instruction::travel(direction, span(from.y, to.y)));
        }
        Ok(())
    }
}

fn span(a: i64, b: i64) -> u32 {
    u32::try_from(a.abs_diff(b)).unwrap_or(u32::MAX)
}
