use crate::format::Color;
use crate::raster::Raster;

/// Painting order for a raster: the background plus one layer per other colour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layers {
    background: Color,
    order: Vec<Color>,
    /// Layer number per colour index; `None` for the background and absent colours.
    rank: [Option<usize>; Color::COUNT],
}

impl Layers {
    /// Most frequent colour becomes the background, the rest follow by
    /// descending frequency. Equal counts go to the lowest index.
    pub fn plan(raster: &Raster) -> Self {
        let counts = raster.histogram();

        let mut by_frequency: Vec<Color> = Color::all().filter(|c| counts[c.index()] > 0).collect();
        // stable sort keeps ascending index order among equal counts
        by_frequency.sort_by(|a, b| counts[b.index()].cmp(&counts[a.index()]));

        let background = by_frequency[0];
        let order = by_frequency[1..].to_vec();

        let mut rank = [None; Color::COUNT];
        for (layer, color) in order.iter().enumerate() {
            rank[color.index()] = Some(layer);
        }

        Self {
            background,
            order,
            rank,
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn order(&self) -> &[Color] {
        &self.order
    }

    /// True when a run painted during `layer` may cover a pixel of `color`:
    /// the pixel belongs to this layer or one scheduled after it.
    pub fn is_open(&self, color: Color, layer: usize) -> bool {
        matches!(self.rank[color.index()], Some(r) if r >= layer)
    }

    /// True once `color` has had its layer painted (the background always has).
    pub fn is_settled(&self, color: Color, layer: usize) -> bool {
        match self.rank[color.index()] {
            None => true,
            Some(r) => r <= layer,
        }
    }
}
