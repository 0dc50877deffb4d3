use hexdraw_core::{Color, Coordinate, Raster};

const LOWER_HALF: &str = "▄";
const UPPER_HALF: &str = "▀";

/// Render the whole raster to an ANSI byte buffer, two pixel rows per
/// terminal row: the upper pixel as background, the lower as foreground.
/// Skips colour escapes that repeat the previous cell's.
pub fn render_raster(raster: &Raster, buf: &mut Vec<u8>) {
    buf.clear();

    let rows: Vec<&[Color]> = raster.rows().collect();
    let mut prev: Option<([u8; 3], Option<[u8; 3]>)> = None;

    for (term_row, pair) in rows.chunks(2).enumerate() {
        if term_row > 0 {
            buf.extend_from_slice(b"\x1b[0m\r\n");
            prev = None;
        }
        for col in 0..raster.width() {
            let top = pair[0][col].rgb();
            let bottom = pair.get(1).map(|row| row[col].rgb());
            if prev != Some((top, bottom)) {
                write_cell_colors(buf, top, bottom);
                prev = Some((top, bottom));
            }
            buf.extend_from_slice(glyph(bottom).as_bytes());
        }
    }

    // Reset colors
    buf.extend_from_slice(b"\x1b[0m");
}

/// Repaint only the terminal cells holding `pixels`, for a canvas drawn with
/// its top-left corner at the terminal's top-left.
pub fn render_pixels(raster: &Raster, pixels: impl IntoIterator<Item = Coordinate>, buf: &mut Vec<u8>) {
    buf.clear();

    let mut last_cell = None;
    for at in pixels {
        if !raster.contains(at) {
            continue;
        }
        let cell = (at.x, at.y / 2);
        if last_cell == Some(cell) {
            continue;
        }
        last_cell = Some(cell);

        let (col, term_row) = cell;
        let Some(top) = raster.at(Coordinate::new(col, term_row * 2)) else {
            continue;
        };
        let bottom = raster.at(Coordinate::new(col, term_row * 2 + 1));

        // Move cursor to position (1-indexed)
        write_cursor_pos(buf, term_row as u32 + 1, col as u32 + 1);
        write_cell_colors(buf, top.rgb(), bottom.map(|c| c.rgb()));
        buf.extend_from_slice(glyph(bottom.map(|c| c.rgb())).as_bytes());
    }

    buf.extend_from_slice(b"\x1b[0m");
}

fn glyph(bottom: Option<[u8; 3]>) -> &'static str {
    match bottom {
        Some(_) => LOWER_HALF,
        None => UPPER_HALF,
    }
}

/// A cell with no lower pixel draws the upper half in the foreground colour
/// over the terminal's default background.
fn write_cell_colors(buf: &mut Vec<u8>, top: [u8; 3], bottom: Option<[u8; 3]>) {
    match bottom {
        Some(bottom) => {
            write_bg(buf, top);
            write_fg(buf, bottom);
        }
        None => {
            buf.extend_from_slice(b"\x1b[49m");
            write_fg(buf, top);
        }
    }
}

fn write_bg(buf: &mut Vec<u8>, [r, g, b]: [u8; 3]) {
    buf.extend_from_slice(b"\x1b[48;2;");
    write_rgb(buf, r, g, b);
}

fn write_fg(buf: &mut Vec<u8>, [r, g, b]: [u8; 3]) {
    buf.extend_from_slice(b"\x1b[38;2;");
    write_rgb(buf, r, g, b);
}

fn write_rgb(buf: &mut Vec<u8>, r: u8, g: u8, b: u8) {
    write_num(buf, u32::from(r));
    buf.push(b';');
    write_num(buf, u32::from(g));
    buf.push(b';');
    write_num(buf, u32::from(b));
    buf.push(b'm');
}

fn write_cursor_pos(buf: &mut Vec<u8>, row: u32, col: u32) {
    buf.extend_from_slice(b"\x1b[");
    write_num(buf, row);
    buf.push(b';');
    write_num(buf, col);
    buf.push(b'H');
}

/// Integer-to-ASCII without allocating.
fn write_num(buf: &mut Vec<u8>, mut v: u32) {
    let mut digits = [0u8; 10];
    let mut n = 0;
    loop {
        digits[n] = b'0' + (v % 10) as u8;
        n += 1;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    buf.extend(digits[..n].iter().rev());
}
