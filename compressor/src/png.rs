use std::path::Path;

use anyhow::Context;
use hexdraw_core::Raster;
use image::{Rgb, RgbImage};

/// Paint `raster` with the EGA palette, one image pixel per raster pixel.
pub fn to_image(raster: &Raster) -> anyhow::Result<RgbImage> {
    let width = u32::try_from(raster.width()).context("image too wide for PNG")?;
    let height = u32::try_from(raster.height()).context("image too tall for PNG")?;
    let mut img = RgbImage::new(width, height);
    for (y, row) in raster.rows().enumerate() {
        for (x, color) in row.iter().enumerate() {
            img.put_pixel(x as u32, y as u32, Rgb(color.rgb()));
        }
    }
    Ok(img)
}

pub fn write_png(raster: &Raster, path: &Path) -> anyhow::Result<()> {
    to_image(raster)?
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))
}
