use std::fmt;
use std::str::{FromStr, Lines};

use crate::error::FormatError;
use crate::palette::EGA;

/// One of the 16 palette indices. Only constructible in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(u8);

impl Color {
    pub const COUNT: usize = 16;

    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT as u8 {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Parse a single hex digit, either case.
    pub fn from_hex(c: char) -> Option<Self> {
        c.to_digit(16).map(|d| Self(d as u8))
    }

    pub fn to_hex(self) -> char {
        char::from_digit(u32::from(self.0), 16).unwrap_or('0')
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 24-bit colour from the EGA palette.
    pub fn rgb(self) -> [u8; 3] {
        EGA[self.index()]
    }

    pub fn all() -> impl Iterator<Item = Color> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed priority order; earlier wins ties.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(()),
        }
    }
}

/// Column `x`, row `y`, (0,0) top-left. Signed: the cursor may leave the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, direction: Direction, distance: u64) -> Self {
        let d = i64::try_from(distance).unwrap_or(i64::MAX);
        match direction {
            Direction::Up => Self::new(self.x, self.y.saturating_sub(d)),
            Direction::Down => Self::new(self.x, self.y.saturating_add(d)),
            Direction::Left => Self::new(self.x.saturating_sub(d), self.y),
            Direction::Right => Self::new(self.x.saturating_add(d), self.y),
        }
    }

    pub fn step(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }
}

/// A single drawing command: move `distance` cells in `direction`, painting
/// every cell entered if `paint` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub direction: Direction,
    pub distance: u32,
    pub paint: Option<Color>,
}

impl Instruction {
    pub fn paint(direction: Direction, distance: u32, color: Color) -> Self {
        Self {
            direction,
            distance,
            paint: Some(color),
        }
    }

    pub fn travel(direction: Direction, distance: u32) -> Self {
        Self {
            direction,
            distance,
            paint: None,
        }
    }

    pub fn destination(&self, from: Coordinate) -> Coordinate {
        from.offset(self.direction, u64::from(self.distance))
    }

    /// The cells this instruction paints when executed from `from`, in order.
    ///
    /// Empty for a plain move. A zero-distance paint covers `from` itself;
    /// otherwise the start cell is excluded and the destination included.
    pub fn stroke(&self, from: Coordinate) -> Stroke {
        let (next, last) = match (self.paint, self.distance) {
            (None, _) => (1, 0),
            (Some(_), 0) => (0, 0),
            (Some(_), d) => (1, u64::from(d)),
        };
        Stroke {
            from,
            direction: self.direction,
            next,
            last,
        }
    }

    /// Parse one command line; `line` is only used for error reporting.
    pub fn parse_line(text: &str, line: usize) -> Result<Self, FormatError> {
        let malformed = |reason| FormatError::MalformedInstruction {
            line,
            text: text.to_string(),
            reason,
        };

        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 2 && fields.len() != 3 {
            return Err(malformed("should have 2 or 3 parts"));
        }

        let direction = fields[0]
            .parse::<Direction>()
            .map_err(|()| malformed("direction should be up, down, left, or right"))?;

        let distance_token = fields[1];
        if !distance_token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("distance should be a non-negative number"));
        }
        let distance = distance_token
            .parse::<u32>()
            .map_err(|_| malformed("distance is out of range"))?;

        let paint = match fields.get(2) {
            None => None,
            Some(token) => {
                let mut chars = token.chars();
                match (chars.next().and_then(Color::from_hex), chars.next()) {
                    (Some(color), None) => Some(color),
                    _ => return Err(malformed("colour should be a hex digit between 0 and f")),
                }
            }
        };

        Ok(Self {
            direction,
            distance,
            paint,
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.direction, self.distance)?;
        if let Some(color) = self.paint {
            write!(f, " {color}")?;
        }
        Ok(())
    }
}

impl FromStr for Instruction {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, FormatError> {
        Self::parse_line(s, 1)
    }
}

/// Iterator over the cells painted by one [`Instruction`].
#[derive(Clone, Debug)]
pub struct Stroke {
    from: Coordinate,
    direction: Direction,
    next: u64,
    last: u64,
}

impl Iterator for Stroke {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        if self.next > self.last {
            return None;
        }
        let at = self.from.offset(self.direction, self.next);
        self.next += 1;
        Some(at)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.last + 1).saturating_sub(self.next) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Stroke {}

/// A picture as its dimensions, initial background colour, and the commands
/// that paint it. Execution starts with the cursor at (0,0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Drawing {
    pub height: usize,
    pub width: usize,
    pub background: Color,
    pub instructions: Vec<Instruction>,
}

impl Drawing {
    pub fn new(height: usize, width: usize, background: Color) -> Self {
        Self {
            height,
            width,
            background,
            instructions: Vec::new(),
        }
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for Drawing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.height)?;
        writeln!(f, "{}", self.width)?;
        writeln!(f, "{}", self.background)?;
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

impl FromStr for Drawing {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, FormatError> {
        let mut lines = s.lines();

        let (text, err) = header_line(&mut lines, 1, "height");
        let height = text.parse::<usize>().map_err(|_| err)?;
        let (text, err) = header_line(&mut lines, 2, "width");
        let width = text.parse::<usize>().map_err(|_| err)?;
        let (text, err) = header_line(&mut lines, 3, "background colour");
        let mut chars = text.chars();
        let background = match (chars.next().and_then(Color::from_hex), chars.next()) {
            (Some(color), None) => color,
            _ => return Err(err),
        };

        let instructions = lines
            .enumerate()
            .map(|(i, text)| Instruction::parse_line(text, i + 4))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            height,
            width,
            background,
            instructions,
        })
    }
}

fn header_line<'a>(
    lines: &mut Lines<'a>,
    line: usize,
    field: &'static str,
) -> (&'a str, FormatError) {
    let text = lines.next().unwrap_or("");
    let err = FormatError::Header {
        line,
        field,
        found: text.to_string(),
    };
    (text.trim(), err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(v: u8) -> Color {
        Color::new(v).unwrap()
    }

    #[test]
    fn color_range_and_hex() {
        assert!(Color::new(15).is_some());
        assert!(Color::new(16).is_none());
        assert_eq!(Color::from_hex('a'), Some(color(10)));
        assert_eq!(Color::from_hex('F'), Some(color(15)));
        assert_eq!(Color::from_hex('g'), None);
        assert_eq!(color(11).to_hex(), 'b');
        assert_eq!(Color::all().count(), 16);
    }

    #[test]
    fn parses_valid_instructions() {
        assert_eq!(
            "down 2 1".parse::<Instruction>().unwrap(),
            Instruction::paint(Direction::Down, 2, color(1))
        );
        assert_eq!(
            "up 1".parse::<Instruction>().unwrap(),
            Instruction::travel(Direction::Up, 1)
        );
        assert_eq!(
            "left  10\tc".parse::<Instruction>().unwrap(),
            Instruction::paint(Direction::Left, 10, color(12))
        );
    }

    #[test]
    fn rejects_malformed_instructions() {
        for bad in [
            "right -1 3",
            "right 1 g",
            "up",
            "",
            "Up 1",
            "left 1 2 3",
            "down x",
            "down +1",
            "down 1 10",
            "right 99999999999 1",
        ] {
            let err = bad.parse::<Instruction>().unwrap_err();
            assert!(
                matches!(err, FormatError::MalformedInstruction { .. }),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn instruction_text_has_no_trailing_space() {
        assert_eq!(Instruction::travel(Direction::Left, 3).to_string(), "left 3");
        assert_eq!(
            Instruction::paint(Direction::Right, 0, color(14)).to_string(),
            "right 0 e"
        );
    }

    #[test]
    fn stroke_excludes_start_and_includes_end() {
        let from = Coordinate::new(1, 1);
        let cells: Vec<_> = Instruction::paint(Direction::Right, 3, color(2))
            .stroke(from)
            .collect();
        assert_eq!(
            cells,
            vec![
                Coordinate::new(2, 1),
                Coordinate::new(3, 1),
                Coordinate::new(4, 1)
            ]
        );

        let zero: Vec<_> = Instruction::paint(Direction::Up, 0, color(2))
            .stroke(from)
            .collect();
        assert_eq!(zero, vec![from]);

        assert_eq!(Instruction::travel(Direction::Up, 5).stroke(from).len(), 0);
    }

    #[test]
    fn destination_can_leave_the_canvas() {
        let to = Instruction::travel(Direction::Left, 3).destination(Coordinate::ORIGIN);
        assert_eq!(to, Coordinate::new(-3, 0));
    }

    #[test]
    fn drawing_text_roundtrip() {
        let text = "4\n2\n0\ndown 2 1\nright 1 2\nup 1\nup 1 9\n";
        let drawing: Drawing = text.parse().unwrap();
        assert_eq!(drawing.height, 4);
        assert_eq!(drawing.width, 2);
        assert_eq!(drawing.background, color(0));
        assert_eq!(drawing.len(), 4);
        assert_eq!(drawing.to_string(), text);
    }

    #[test]
    fn drawing_header_errors_name_the_field() {
        let err = "x\n2\n0\n".parse::<Drawing>().unwrap_err();
        assert!(matches!(err, FormatError::Header { line: 1, field: "height", .. }));

        let err = "4\n2\n".parse::<Drawing>().unwrap_err();
        assert!(matches!(err, FormatError::Header { line: 3, .. }));

        let err = "4\n2\n0\nup 1\nsideways 2\n".parse::<Drawing>().unwrap_err();
        assert!(matches!(err, FormatError::MalformedInstruction { line: 5, .. }));
    }
}
