use std::fmt;
use std::str::FromStr;

use crate::error::{FormatError, RasterError};
use crate::format::{Color, Coordinate};

/// A rectangular image where every pixel is one of 16 colours, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    height: usize,
    width: usize,
    pixels: Vec<Color>,
}

impl Raster {
    /// A solid image of the given dimensions.
    pub fn filled(height: usize, width: usize, color: Color) -> Result<Self, RasterError> {
        if height == 0 || width == 0 {
            return Err(RasterError::Empty { height, width });
        }
        Ok(Self {
            height,
            width,
            pixels: vec![color; height * width],
        })
    }

    pub fn from_rows(rows: Vec<Vec<Color>>) -> Result<Self, RasterError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(RasterError::Empty { height, width });
        }
        let mut pixels = Vec::with_capacity(height * width);
        for (row, line) in rows.into_iter().enumerate() {
            if line.len() != width {
                return Err(RasterError::Ragged {
                    row,
                    expected: width,
                    found: line.len(),
                });
            }
            pixels.extend(line);
        }
        Ok(Self {
            height,
            width,
            pixels,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, x: i64, y: i64) -> Result<Color, RasterError> {
        let i = self.index(x, y)?;
        Ok(self.pixels[i])
    }

    pub fn set(&mut self, x: i64, y: i64, color: Color) -> Result<(), RasterError> {
        let i = self.index(x, y)?;
        self.pixels[i] = color;
        Ok(())
    }

    /// Colour at `at`, or `None` off the canvas.
    pub fn at(&self, at: Coordinate) -> Option<Color> {
        self.index(at.x, at.y).ok().map(|i| self.pixels[i])
    }

    pub fn contains(&self, at: Coordinate) -> bool {
        self.index(at.x, at.y).is_ok()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.pixels.chunks(self.width)
    }

    /// Every pixel with its coordinate, in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (Coordinate, Color)> + '_ {
        self.pixels.iter().enumerate().map(move |(i, &color)| {
            let x = (i % self.width) as i64;
            let y = (i / self.width) as i64;
            (Coordinate::new(x, y), color)
        })
    }

    /// Pixel count per colour index.
    pub fn histogram(&self) -> [usize; Color::COUNT] {
        let mut counts = [0usize; Color::COUNT];
        for color in &self.pixels {
            counts[color.index()] += 1;
        }
        counts
    }

    fn index(&self, x: i64, y: i64) -> Result<usize, RasterError> {
        let out_of_bounds = || RasterError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        };
        let col = usize::try_from(x).map_err(|_| out_of_bounds())?;
        let row = usize::try_from(y).map_err(|_| out_of_bounds())?;
        if col >= self.width || row >= self.height {
            return Err(out_of_bounds());
        }
        Ok(row * self.width + col)
    }
}

impl fmt::Display for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for color in row {
                write!(f, "{color}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Raster {
    type Err = FormatError;

    /// One line per row, one hex digit per pixel, all lines the same length.
    fn from_str(s: &str) -> Result<Self, FormatError> {
        let mut rows: Vec<Vec<Color>> = Vec::new();
        for (i, line) in s.lines().enumerate() {
            let row = line
                .chars()
                .enumerate()
                .map(|(column, c)| {
                    Color::from_hex(c).ok_or(FormatError::Pixel {
                        line: i + 1,
                        column: column + 1,
                        found: c,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(FormatError::Ragged {
                        line: i + 1,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(FormatError::EmptyImage);
        }
        Ok(Self::from_rows(rows)?)
    }
}
