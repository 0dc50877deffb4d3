//! Greedy raster-to-drawing encoder.
//!
//! Colours are painted one layer at a time, most frequent first, over a
//! background of the most frequent colour. Within a layer the encoder keeps
//! extending straight runs from the cursor ([`scorer`]) and, when no run is
//! available, hops to the start of the next promising line ([`pathfind`]).
//! A run never covers the background or a colour whose layer is already
//! done, so replaying the result reproduces the raster exactly.

mod layers;
mod pathfind;
mod scorer;

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::EncodeError;
use crate::format::{Color, Coordinate, Drawing, Instruction};
use crate::raster::Raster;

pub use layers::Layers;

/// Steps allowed per pixel before encoding is abandoned.
pub const ITERATIONS_PER_PIXEL: usize = 4;

/// Encode `raster` with the default iteration ceiling.
pub fn encode(raster: &Raster) -> Result<Drawing, EncodeError> {
    Encoder::new(raster).encode()
}

/// State for one encoding pass. Build a fresh one per raster.
#[derive(Debug)]
pub struct Encoder<'a> {
    raster: &'a Raster,
    layers: Layers,
    drawing: Drawing,
    cursor: Coordinate,
    drawn: HashSet<Coordinate>,
    iteration_limit: usize,
    iterations: usize,
}

impl<'a> Encoder<'a> {
    pub fn new(raster: &'a Raster) -> Self {
        let layers = Layers::plan(raster);
        let drawing = Drawing::new(raster.height(), raster.width(), layers.background());
        let pixels = raster.height() * raster.width();
        Self {
            raster,
            layers,
            drawing,
            cursor: Coordinate::ORIGIN,
            drawn: HashSet::new(),
            iteration_limit: pixels.saturating_mul(ITERATIONS_PER_PIXEL).max(1),
            iterations: 0,
        }
    }

    /// Override the ceiling on scheduler steps (runs plus relocations).
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = limit;
        self
    }

    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    pub fn encode(mut self) -> Result<Drawing, EncodeError> {
        let order = self.layers.order().to_vec();
        for (layer, &color) in order.iter().enumerate() {
            self.paint_layer(layer, color)?;
            self.settle(layer);
        }
        info!(
            height = self.raster.height(),
            width = self.raster.width(),
            background = %self.layers.background(),
            layers = order.len(),
            instructions = self.drawing.len(),
            steps = self.iterations,
            "encoded raster"
        );
        Ok(self.drawing)
    }

    fn paint_layer(&mut self, layer: usize, color: Color) -> Result<(), EncodeError> {
        let mut remaining = self
            .raster
            .pixels()
            .filter(|(at, c)| *c == color && !self.drawn.contains(at))
            .count();
        debug!(layer, %color, pixels = remaining, "painting layer");

        while remaining > 0 {
            self.tick()?;
            match self.best_run(layer, color) {
                Some(run) => remaining -= self.paint_run(run, color),
                None => self.relocate(color)?,
            }
        }

        debug!(layer, %color, instructions = self.drawing.len(), "layer done");
        Ok(())
    }

    /// Forget coordinates painted for colours that have not had their own
    /// layer yet; their layer must still paint them.
    fn settle(&mut self, layer: usize) {
        let raster = self.raster;
        let layers = &self.layers;
        self.drawn.retain(|at| {
            raster
                .at(*at)
                .is_some_and(|color| layers.is_settled(color, layer))
        });
    }

    fn tick(&mut self) -> Result<(), EncodeError> {
        self.iterations += 1;
        if self.iterations > self.iteration_limit {
            return Err(EncodeError::IterationLimit {
                limit: self.iteration_limit,
            });
        }
        Ok(())
    }

    fn emit(&mut self, instruction: Instruction) {
        self.cursor = instruction.destination(self.cursor);
        self.drawing.push(instruction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::format::Direction;

    fn color(v: u8) -> Color {
        Color::new(v).unwrap()
    }

    #[test]
    fn single_pixel_needs_no_instructions() {
        for v in [0u8, 7, 15] {
            let raster = Raster::filled(1, 1, color(v)).unwrap();
            let drawing = encode(&raster).unwrap();
            assert_eq!(drawing.height, 1);
            assert_eq!(drawing.width, 1);
            assert_eq!(drawing.background, color(v));
            assert!(drawing.is_empty());
            assert_eq!(decode(&drawing).unwrap(), raster);
        }
    }

    #[test]
    fn encodes_the_four_by_two_example() {
        let raster: Raster = "09\n10\n12\n00\n".parse().unwrap();
        let drawing = encode(&raster).unwrap();
        assert_eq!(drawing.height, 4);
        assert_eq!(drawing.width, 2);
        assert_eq!(drawing.background, color(0));
        assert_eq!(decode(&drawing).unwrap(), raster);
    }

    #[test]
    fn start_cell_is_picked_up_on_the_way_back() {
        let raster: Raster = "1111\n0000\n0000\n".parse().unwrap();
        let drawing = encode(&raster).unwrap();
        // the cursor's own cell cannot be painted from where it stands; the
        // return run crosses cells already drawn in this colour to reach it
        assert_eq!(
            drawing.instructions,
            vec![
                Instruction::paint(Direction::Right, 3, color(1)),
                Instruction::paint(Direction::Left, 3, color(1)),
            ]
        );
        assert_eq!(decode(&drawing).unwrap(), raster);
    }

    #[test]
    fn later_colours_are_painted_over_earlier_runs() {
        // the second run of 1 crosses the 2, which its own layer repaints
        let raster: Raster = "00000\n11211\n00000\n00000\n".parse().unwrap();
        let drawing = encode(&raster).unwrap();
        assert_eq!(
            drawing.instructions,
            vec![
                Instruction::paint(Direction::Down, 1, color(1)),
                Instruction::paint(Direction::Right, 4, color(1)),
                Instruction::travel(Direction::Left, 3),
                Instruction::paint(Direction::Right, 1, color(2)),
            ]
        );
        assert_eq!(decode(&drawing).unwrap(), raster);
    }

    #[test]
    fn settle_drops_unfinished_colours() {
        let raster: Raster = "0000\n1211\n".parse().unwrap();
        let mut encoder = Encoder::new(&raster);
        encoder.drawn.insert(Coordinate::new(0, 1));
        encoder.drawn.insert(Coordinate::new(1, 1));
        encoder.settle(0);
        assert!(encoder.drawn.contains(&Coordinate::new(0, 1)));
        assert!(!encoder.drawn.contains(&Coordinate::new(1, 1)));
    }

    #[test]
    fn iteration_limit_is_enforced() {
        let raster: Raster = "1010\n0101\n1010\n0101\n".parse().unwrap();
        let err = Encoder::new(&raster)
            .with_iteration_limit(3)
            .encode()
            .unwrap_err();
        assert_eq!(err, EncodeError::IterationLimit { limit: 3 });
    }

    #[test]
    fn same_raster_gives_same_text() {
        let raster: Raster = "0123\n4567\n89ab\ncdef\n0f0f\n".parse().unwrap();
        let first = encode(&raster).unwrap().to_string();
        let second = encode(&raster).unwrap().to_string();
        assert_eq!(first, second);
    }
}
