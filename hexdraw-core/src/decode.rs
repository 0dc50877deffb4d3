use crate::error::DecodeError;
use crate::format::{Coordinate, Drawing, Instruction};
use crate::raster::Raster;

/// Replay state: the canvas being painted and the cursor.
///
/// The cursor may wander off the canvas; only painting there is an error.
#[derive(Clone, Debug)]
pub struct Canvas {
    raster: Raster,
    cursor: Coordinate,
}

impl Canvas {
    /// A background-filled canvas for `drawing` with the cursor at (0,0).
    pub fn new(drawing: &Drawing) -> Result<Self, DecodeError> {
        let raster = Raster::filled(drawing.height, drawing.width, drawing.background)?;
        Ok(Self {
            raster,
            cursor: Coordinate::ORIGIN,
        })
    }

    /// Execute one instruction. `index` is only used for error reporting.
    pub fn apply(&mut self, index: usize, instruction: &Instruction) -> Result<(), DecodeError> {
        if let Some(color) = instruction.paint {
            for at in instruction.stroke(self.cursor) {
                self.raster
                    .set(at.x, at.y, color)
                    .map_err(|_| DecodeError::BoundsViolation {
                        index,
                        x: at.x,
                        y: at.y,
                    })?;
            }
        }
        self.cursor = instruction.destination(self.cursor);
        Ok(())
    }

    pub fn cursor(&self) -> Coordinate {
        self.cursor
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn into_raster(self) -> Raster {
        self.raster
    }
}

/// Execute every instruction of `drawing` in order and return the image.
pub fn decode(drawing: &Drawing) -> Result<Raster, DecodeError> {
    let mut canvas = Canvas::new(drawing)?;
    for (index, instruction) in drawing.instructions.iter().enumerate() {
        canvas.apply(index, instruction)?;
    }
    Ok(canvas.into_raster())
}
