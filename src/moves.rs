// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `moves` module contains the definition of a single ply.
//!
//! A `Move` snapshots the pieces involved at the time it was constructed: the piece on the
//! source square and whatever sat on the destination square. It never refers back into the
//! board, so moves can be copied freely and stay valid after the board changes. This is also
//! what makes undo possible, since the move log holds everything needed to restore the board.
//!
//! Two moves compare equal if they share a source and destination square. The remaining fields
//! are derived from the board and take no part in equality.
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::board::Board;
use crate::types::{Piece, PieceKind, Square};

bitflags! {
    pub struct MoveFlags: u8 {
        const NONE = 0;
        const EN_PASSANT = 0b0000_0001;
        const PROMOTION = 0b0000_0010;
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Move {
    start: Square,
    end: Square,
    piece_moved: Piece,
    piece_captured: Option<Piece>,
    promotion: PieceKind,
    flags: MoveFlags,
}

impl Move {
    /// Constructs a move by reading the pieces on the start and end squares of the given board.
    /// Pawn moves onto the last row are flagged as promotions, promoting to a queen.
    ///
    /// Panics if there is no piece on the start square.
    pub fn new(start: Square, end: Square, board: &Board) -> Move {
        let piece_moved = board
            .piece_at(start)
            .expect("invalid move: no piece at start square");
        let mut flags = MoveFlags::NONE;
        if piece_moved.kind == PieceKind::Pawn && end.row() == piece_moved.color.promotion_row() {
            flags |= MoveFlags::PROMOTION;
        }

        Move {
            start,
            end,
            piece_moved,
            piece_captured: board.piece_at(end),
            promotion: PieceKind::Queen,
            flags,
        }
    }

    /// Constructs an en-passant capture. The destination square is empty, so the captured piece
    /// is synthesized as a pawn of the opposing color.
    pub fn en_passant(start: Square, end: Square, board: &Board) -> Move {
        let mut mov = Move::new(start, end, board);
        assert!(
            mov.piece_moved.kind == PieceKind::Pawn,
            "invalid move: en-passant by a non-pawn"
        );
        mov.piece_captured = Some(Piece::new(PieceKind::Pawn, mov.piece_moved.color.toggle()));
        mov.flags |= MoveFlags::EN_PASSANT;
        mov
    }

    /// Returns a copy of this promotion that promotes to the given piece instead of a queen.
    ///
    /// Panics if this move is not a promotion, or if the piece kind is not one a pawn can
    /// promote to.
    pub fn with_promotion(self, kind: PieceKind) -> Move {
        assert!(self.is_promotion(), "invalid move: {} is not a promotion", self);
        assert!(
            kind.is_promotion_target(),
            "invalid move: cannot promote to {:?}",
            kind
        );
        Move {
            promotion: kind,
            ..self
        }
    }

    pub fn start(&self) -> Square {
        self.start
    }

    pub fn end(&self) -> Square {
        self.end
    }

    pub fn piece_moved(&self) -> Piece {
        self.piece_moved
    }

    pub fn piece_captured(&self) -> Option<Piece> {
        self.piece_captured
    }

    pub fn flags(&self) -> MoveFlags {
        self.flags
    }

    pub fn is_capture(&self) -> bool {
        self.piece_captured.is_some()
    }

    pub fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    pub fn is_promotion(&self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION)
    }

    /// The piece kind a promotion produces. Only meaningful if `is_promotion` is true.
    pub fn promotion_piece(&self) -> PieceKind {
        self.promotion
    }

    pub fn is_double_pawn_push(&self) -> bool {
        self.piece_moved.kind == PieceKind::Pawn
            && (self.start.row() as i8 - self.end.row() as i8).abs() == 2
    }

    /// The square holding the piece this move captures. For en-passant this is the square
    /// beside the start square, not the destination.
    pub fn capture_square(&self) -> Square {
        if self.is_en_passant() {
            Square::new(self.start.row(), self.end.col())
        } else {
            self.end
        }
    }

    /// Renders the move as its start and end squares in file+rank form, e.g. "e2e4".
    pub fn notation(&self) -> String {
        format!("{}{}", self.start, self.end)
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Move) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::board::Board;
    use crate::types::{Color, Piece, PieceKind, Square};

    #[test]
    fn notation_e2e4() {
        let board = Board::start_position();
        let mov = Move::new(Square::new(6, 4), Square::new(4, 4), &board);
        assert_eq!("e2e4", mov.notation());
        assert_eq!("e2e4", mov.to_string());
        assert!(mov.is_double_pawn_push());
        assert!(!mov.is_capture());
    }

    #[test]
    fn equality_ignores_metadata() {
        let mut board = Board::empty();
        board.set(Square::new(3, 4), Some(Piece::new(PieceKind::Pawn, Color::White)));
        board.set(Square::new(3, 5), Some(Piece::new(PieceKind::Pawn, Color::Black)));
        let plain = Move::new(Square::new(3, 4), Square::new(2, 5), &board);
        let ep = Move::en_passant(Square::new(3, 4), Square::new(2, 5), &board);
        assert_eq!(plain, ep);
        assert!(!plain.is_en_passant());
        assert!(ep.is_en_passant());
        assert_eq!(None, plain.piece_captured());
        assert_eq!(
            Some(Piece::new(PieceKind::Pawn, Color::Black)),
            ep.piece_captured()
        );
        assert_eq!(Square::new(3, 5), ep.capture_square());
    }

    #[test]
    fn snapshot_survives_board_changes() {
        let mut board = Board::start_position();
        let mov = Move::new(Square::new(7, 1), Square::new(5, 2), &board);
        board.set(Square::new(7, 1), None);
        assert_eq!(
            Piece::new(PieceKind::Knight, Color::White),
            mov.piece_moved()
        );
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut board = Board::empty();
        board.set(Square::new(1, 0), Some(Piece::new(PieceKind::Pawn, Color::White)));
        let mov = Move::new(Square::new(1, 0), Square::new(0, 0), &board);
        assert!(mov.is_promotion());
        assert_eq!(PieceKind::Queen, mov.promotion_piece());

        let under = mov.with_promotion(PieceKind::Knight);
        assert_eq!(PieceKind::Knight, under.promotion_piece());
        assert_eq!(mov, under);
    }

    #[test]
    #[should_panic]
    fn promotion_to_king_panics() {
        let mut board = Board::empty();
        board.set(Square::new(6, 0), Some(Piece::new(PieceKind::Pawn, Color::Black)));
        let mov = Move::new(Square::new(6, 0), Square::new(7, 0), &board);
        mov.with_promotion(PieceKind::King);
    }

    #[test]
    #[should_panic]
    fn move_from_empty_square_panics() {
        let board = Board::empty();
        Move::new(Square::new(4, 4), Square::new(3, 4), &board);
    }
}
