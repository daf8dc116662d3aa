// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::ToPrimitive;
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};

// TableIndex is a trait for all types that can serve as an index into a table.
// It is common to use these types as indices into tables, so this trait allows
// any type implementing ToPrimitive to be used as table indices.
pub trait TableIndex {
    fn as_index(self) -> usize;
}

impl<T> TableIndex for T
where
    T: ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_u32().unwrap() as usize
    }
}

/// A square on the board, addressed by row and column. Row 0 is the far (black) side of the
/// board and row 7 is the near (white) side; column 0 is the a-file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Constructs a square. Panics if either coordinate is off the board.
    pub fn new(row: usize, col: usize) -> Square {
        assert!(row < 8 && col < 8, "square ({}, {}) is off the board", row, col);
        Square {
            row: row as u8,
            col: col as u8,
        }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Steps from this square by the given row and column deltas, returning None if the result
    /// falls off the board.
    pub fn offset(self, drow: i8, dcol: i8) -> Option<Square> {
        let row = self.row as i8 + drow;
        let col = self.col as i8 + dcol;
        if row < 0 || row >= 8 || col < 0 || col >= 8 {
            return None;
        }

        Some(Square::new(row as usize, col as usize))
    }

    pub fn towards(self, dir: Direction) -> Option<Square> {
        self.offset(dir.row, dir.col)
    }

    /// Parses a square in file+rank form, e.g. "e2".
    pub fn from_notation(text: &str) -> Option<Square> {
        let mut chars = text.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() || file < 'a' || file > 'h' || rank < '1' || rank > '8' {
            return None;
        }

        let col = file as usize - 'a' as usize;
        let row = '8' as usize - rank as usize;
        Some(Square::new(row, col))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'a' + self.col) as char)?;
        f.write_char((b'8' - self.row) as char)
    }
}

/// Iterates every square on the board, row-major from the black side.
pub fn squares() -> impl Iterator<Item = Square> {
    (0..64).map(|idx| Square::new(idx / 8, idx % 8))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The row delta of a single pawn advance for this color.
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_start_row(self) -> usize {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn promotion_row(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

pub static COLORS: [Color; 2] = [Color::White, Color::Black];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Whether a pawn may promote to this kind of piece.
    pub fn is_promotion_target(self) -> bool {
        match self {
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => true,
            PieceKind::Pawn | PieceKind::King => false,
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        f.write_char(chr)
    }
}

impl TryFrom<char> for PieceKind {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let res = match value {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(()),
        };
        Ok(res)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }
}

impl TryFrom<char> for Piece {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        let kind = PieceKind::try_from(c.to_ascii_lowercase())?;
        Ok(Piece::new(kind, color))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        match self.color {
            Color::White => f.write_char(chr.to_ascii_uppercase()),
            Color::Black => f.write_char(chr),
        }
    }
}

/// A step vector on the board, in rows and columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Direction {
    pub row: i8,
    pub col: i8,
}

impl Direction {
    pub const fn new(row: i8, col: i8) -> Direction {
        Direction { row, col }
    }

    pub fn reverse(self) -> Direction {
        Direction::new(-self.row, -self.col)
    }

    pub fn is_orthogonal(self) -> bool {
        (self.row == 0) != (self.col == 0)
    }

    pub fn is_diagonal(self) -> bool {
        self.row != 0 && self.row.abs() == self.col.abs()
    }

    /// Whether a piece pinned along this direction may travel along `dir`.
    pub fn is_axis_of(self, dir: Direction) -> bool {
        self == dir || self == dir.reverse()
    }
}

pub static ORTHOGONAL: [Direction; 4] = [
    Direction::new(-1, 0),
    Direction::new(0, -1),
    Direction::new(1, 0),
    Direction::new(0, 1),
];

pub static DIAGONAL: [Direction; 4] = [
    Direction::new(-1, -1),
    Direction::new(-1, 1),
    Direction::new(1, -1),
    Direction::new(1, 1),
];

pub static KNIGHT_JUMPS: [Direction; 8] = [
    Direction::new(-2, -1),
    Direction::new(-2, 1),
    Direction::new(-1, -2),
    Direction::new(-1, 2),
    Direction::new(1, -2),
    Direction::new(1, 2),
    Direction::new(2, -1),
    Direction::new(2, 1),
];

pub static KING_STEPS: [Direction; 8] = [
    Direction::new(-1, -1),
    Direction::new(-1, 0),
    Direction::new(-1, 1),
    Direction::new(0, -1),
    Direction::new(0, 1),
    Direction::new(1, -1),
    Direction::new(1, 0),
    Direction::new(1, 1),
];

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::{Color, Direction, Piece, PieceKind, Square};

    #[test]
    fn square_notation() {
        assert_eq!("e2", Square::new(6, 4).to_string());
        assert_eq!("a8", Square::new(0, 0).to_string());
        assert_eq!("h1", Square::new(7, 7).to_string());
        assert_eq!(Some(Square::new(4, 4)), Square::from_notation("e4"));
        assert_eq!(None, Square::from_notation("i4"));
        assert_eq!(None, Square::from_notation("e9"));
        assert_eq!(None, Square::from_notation("e44"));
    }

    #[test]
    #[should_panic]
    fn square_off_board() {
        Square::new(8, 0);
    }

    #[test]
    fn square_offset_bounds() {
        let corner = Square::new(0, 0);
        assert_eq!(None, corner.offset(-1, 0));
        assert_eq!(None, corner.offset(0, -1));
        assert_eq!(Some(Square::new(1, 1)), corner.offset(1, 1));
    }

    #[test]
    fn piece_chars() {
        let white_queen = Piece::try_from('Q').unwrap();
        assert_eq!(Piece::new(PieceKind::Queen, Color::White), white_queen);
        assert_eq!("Q", white_queen.to_string());

        let black_knight = Piece::try_from('n').unwrap();
        assert_eq!(Piece::new(PieceKind::Knight, Color::Black), black_knight);
        assert_eq!("n", black_knight.to_string());

        assert!(Piece::try_from('x').is_err());
    }

    #[test]
    fn direction_axes() {
        let up = Direction::new(-1, 0);
        assert!(up.is_orthogonal());
        assert!(!up.is_diagonal());
        assert!(up.is_axis_of(Direction::new(1, 0)));
        assert!(!up.is_axis_of(Direction::new(0, 1)));
        assert!(Direction::new(1, -1).is_diagonal());
    }
}
