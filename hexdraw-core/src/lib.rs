pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod palette;
pub mod raster;

pub use decode::{decode, Canvas};
pub use encode::{encode, Encoder};
pub use error::{DecodeError, EncodeError, FormatError, RasterError};
pub use format::{Color, Coordinate, Direction, Drawing, Instruction};
pub use raster::Raster;
