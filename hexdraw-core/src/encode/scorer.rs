use crate::format::{Color, Direction, Instruction};

use super::Encoder;

/// A straight paint run from the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Run {
    pub direction: Direction,
    pub length: u32,
}

impl Encoder<'_> {
    /// Longest worthwhile run from the cursor, or `None` when stuck.
    ///
    /// Ties go to the first direction in [`Direction::ALL`].
    pub(super) fn best_run(&self, layer: usize, target: Color) -> Option<Run> {
        let mut best: Option<Run> = None;
        for direction in Direction::ALL {
            let length = self.reach(direction, layer, target);
            if length > 0 && best.map_or(true, |b| length > b.length) {
                best = Some(Run { direction, length });
            }
        }
        best
    }

    /// How far a run in `direction` should go: up to the last undrawn pixel of
    /// `target` before the edge, the background, or a finished layer.
    fn reach(&self, direction: Direction, layer: usize, target: Color) -> u32 {
        let mut at = self.cursor;
        let mut steps = 0u32;
        let mut reach = 0u32;
        loop {
            at = at.step(direction);
            match self.raster.at(at) {
                Some(color) if self.layers.is_open(color, layer) => {
                    steps += 1;
                    if color == target && !self.drawn.contains(&at) {
                        reach = steps;
                    }
                }
                _ => return reach,
            }
        }
    }

    /// Emit the run and mark what it covers. Returns the number of target
    /// pixels painted for the first time.
    pub(super) fn paint_run(&mut self, run: Run, target: Color) -> usize {
        let instruction = Instruction::paint(run.direction, run.length, target);
        let mut fresh = 0;
        for at in instruction.stroke(self.cursor) {
            if self.drawn.insert(at) && self.raster.at(at) == Some(target) {
                fresh += 1;
            }
        }
        self.emit(instruction);
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Coordinate;
    use crate::raster::Raster;

    fn color(v: u8) -> Color {
        Color::new(v).unwrap()
    }

    #[test]
    fn ties_prefer_up_down_left_right() {
        let raster: Raster = "010\n100\n000\n".parse().unwrap();
        let encoder = Encoder::new(&raster);
        assert_eq!(
            encoder.best_run(0, color(1)),
            Some(Run {
                direction: Direction::Down,
                length: 1
            })
        );
    }

    #[test]
    fn longest_run_wins() {
        let raster: Raster = "01111\n10000\n10000\n10000\n".parse().unwrap();
        let encoder = Encoder::new(&raster);
        assert_eq!(
            encoder.best_run(0, color(1)),
            Some(Run {
                direction: Direction::Right,
                length: 4
            })
        );
    }

    #[test]
    fn runs_stop_at_background_and_trim_to_new_work() {
        // cursor at (0,1); 2 is a later layer so the run may cross it, but the
        // trailing 2 is no new work for colour 1
        let raster: Raster = "00000\n01212\n00000\n00000\n".parse().unwrap();
        let mut encoder = Encoder::new(&raster);
        assert_eq!(encoder.layers.order(), &[color(1), color(2)]);
        encoder.cursor = Coordinate::new(0, 1);
        assert_eq!(
            encoder.best_run(0, color(1)),
            Some(Run {
                direction: Direction::Right,
                length: 3
            })
        );
    }

    #[test]
    fn finished_layers_block_runs() {
        let raster: Raster = "0000\n1211\n0000\n".parse().unwrap();
        let mut encoder = Encoder::new(&raster);
        encoder.cursor = Coordinate::new(0, 1);
        // during the colour 2 layer, the 1s to the right are finished
        assert_eq!(
            encoder.best_run(1, color(2)),
            Some(Run {
                direction: Direction::Right,
                length: 1
            })
        );
        encoder.cursor = Coordinate::new(3, 1);
        assert_eq!(encoder.best_run(1, color(2)), None);
    }

    #[test]
    fn already_drawn_pixels_are_not_new_work() {
        let raster: Raster = "0110\n0000\n".parse().unwrap();
        let mut encoder = Encoder::new(&raster);
        encoder.drawn.insert(Coordinate::new(1, 0));
        encoder.drawn.insert(Coordinate::new(2, 0));
        assert_eq!(encoder.best_run(0, color(1)), None);
    }

    #[test]
    fn paint_run_marks_cells_and_moves_cursor() {
        let raster: Raster = "0110\n0000\n".parse().unwrap();
        let mut encoder = Encoder::new(&raster);
        let run = encoder.best_run(0, color(1)).unwrap();
        assert_eq!(encoder.paint_run(run, color(1)), 2);
        assert_eq!(encoder.cursor, Coordinate::new(2, 0));
        assert!(encoder.drawn.contains(&Coordinate::new(1, 0)));
        assert!(!encoder.drawn.contains(&Coordinate::ORIGIN));
        assert_eq!(
            encoder.drawing.instructions,
            vec![Instruction::paint(Direction::Right, 2, color(1))]
        );
    }
}
