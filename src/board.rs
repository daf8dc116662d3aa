// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::types::{Color, Piece, PieceKind, Square};

static BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8x8 mailbox of pieces. Row 0 is black's back rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    pub fn start_position() -> Board {
        let mut board = Board::empty();
        for col in 0..8 {
            board.set(Square::new(0, col), Some(Piece::new(BACK_RANK[col], Color::Black)));
            board.set(Square::new(1, col), Some(Piece::new(PieceKind::Pawn, Color::Black)));
            board.set(Square::new(6, col), Some(Piece::new(PieceKind::Pawn, Color::White)));
            board.set(Square::new(7, col), Some(Piece::new(BACK_RANK[col], Color::White)));
        }

        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.row()][square.col()]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.row()][square.col()] = piece;
    }

    /// Iterates over every occupied square and the piece on it.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        crate::types::squares().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..8 {
            for col in 0..8 {
                if let Some(piece) = self.piece_at(Square::new(row, col)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", 8 - row)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in "abcdefgh".chars() {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}
