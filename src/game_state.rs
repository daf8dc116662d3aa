// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt::{self, Write};
use std::ops::{Deref, DerefMut};

use crate::analysis::{CheckList, PinList};
use crate::board::Board;
use crate::moves::Move;
use crate::types::TableIndex;
use crate::types::{Color, Piece, PieceKind, Square, COLORS};

/// Possible errors that can arise when parsing a FEN string into a `GameState`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    InvalidHalfmove,
    InvalidFullmove,
    MissingKing(Color),
    TooManyKings(Color),
}

/// Where a game stands after the most recent legal move generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
}

/// The complete state of a game: the board, whose turn it is, and the move log needed to take
/// moves back.
///
/// Moves are made and unmade in place. Every `apply_move` must be paired with an `undo_move`
/// in LIFO order; `make_move` returns a guard that does this automatically.
#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) king_squares: [Square; 2],
    pub(crate) en_passant_square: Option<Square>,
    pub(crate) pins: PinList,
    pub(crate) checks: CheckList,
    pub(crate) status: GameStatus,
    move_log: Vec<Move>,
    en_passant_log: Vec<Option<Square>>,
    halfmove_clock: u32,
    halfmove_log: Vec<u32>,
    fullmove_base: u32,
}

//
// Game state getters
//

impl GameState {
    /// A new game from the standard starting position, white to move.
    pub fn new() -> GameState {
        GameState {
            board: Board::start_position(),
            side_to_move: Color::White,
            king_squares: [Square::new(7, 4), Square::new(0, 4)],
            en_passant_square: None,
            pins: PinList::new(),
            checks: CheckList::new(),
            status: GameStatus::Ongoing,
            move_log: vec![],
            en_passant_log: vec![],
            halfmove_clock: 0,
            halfmove_log: vec![],
            fullmove_base: 1,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.as_index()]
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    /// Pins found by the most recent legal move generation.
    pub fn pins(&self) -> &PinList {
        &self.pins
    }

    /// Checks found by the most recent legal move generation.
    pub fn checks(&self) -> &CheckList {
        &self.checks
    }

    /// Status as of the most recent legal move generation. Applying or undoing a move resets
    /// this to `Ongoing` until moves are generated again.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_checkmate(&self) -> bool {
        self.status == GameStatus::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.status == GameStatus::Stalemate
    }
}

//
// Move application and reversal
//

impl GameState {
    /// Applies a move, promoting to a queen if it is a promotion. No legality check is done
    /// here; the move must come from `legal_moves`.
    pub fn apply_move(&mut self, mov: Move) {
        self.apply_move_promoting(mov, None)
    }

    /// Applies a move, optionally choosing the piece a promoting pawn becomes. The choice is
    /// ignored for moves that are not promotions.
    pub fn apply_move_promoting(&mut self, mov: Move, promotion: Option<PieceKind>) {
        let mov = match promotion {
            Some(kind) if mov.is_promotion() => mov.with_promotion(kind),
            _ => mov,
        };

        let moved = mov.piece_moved();
        self.board.set(mov.start(), None);
        let landing = if mov.is_promotion() {
            Piece::new(mov.promotion_piece(), moved.color)
        } else {
            moved
        };
        self.board.set(mov.end(), Some(landing));
        if mov.is_en_passant() {
            self.board.set(mov.capture_square(), None);
        }

        if moved.kind == PieceKind::King {
            self.king_squares[moved.color.as_index()] = mov.end();
        }

        self.en_passant_log.push(self.en_passant_square);
        self.halfmove_log.push(self.halfmove_clock);
        self.halfmove_clock = if moved.kind == PieceKind::Pawn || mov.is_capture() {
            0
        } else {
            self.halfmove_clock + 1
        };

        self.en_passant_square = if mov.is_double_pawn_push() {
            // the square jumped over.
            Some(Square::new(
                (mov.start().row() + mov.end().row()) / 2,
                mov.start().col(),
            ))
        } else {
            None
        };

        self.move_log.push(mov);
        self.side_to_move = self.side_to_move.toggle();
        self.status = GameStatus::Ongoing;
    }

    /// Takes back the most recent move. Does nothing if no moves have been made.
    pub fn undo_move(&mut self) {
        let mov = match self.move_log.pop() {
            Some(mov) => mov,
            None => {
                debug!("undo requested with an empty move log");
                return;
            }
        };

        let prior_en_passant = self
            .en_passant_log
            .pop()
            .expect("en-passant log out of sync with move log");
        self.halfmove_clock = self
            .halfmove_log
            .pop()
            .expect("halfmove log out of sync with move log");

        self.board.set(mov.start(), Some(mov.piece_moved()));
        self.board.set(mov.end(), mov.piece_captured());
        self.side_to_move = self.side_to_move.toggle();
        if mov.piece_moved().kind == PieceKind::King {
            self.king_squares[mov.piece_moved().color.as_index()] = mov.start();
        }

        // The generic restore above put the captured pawn on the destination square. For
        // en-passant it belongs beside the start square instead.
        if mov.is_en_passant() {
            self.board.set(mov.end(), None);
            self.board.set(mov.capture_square(), mov.piece_captured());
        }

        // Equal to the destination square after an en-passant capture, and to whatever the
        // previous ply left behind after a double pawn push.
        self.en_passant_square = prior_en_passant;
        self.status = GameStatus::Ongoing;
    }

    /// Applies a move and returns a guard that undoes it when dropped. The guard dereferences to
    /// the game state, so it can be searched or modified further while it lives.
    pub fn make_move(&mut self, mov: Move) -> MoveGuard<'_> {
        self.apply_move(mov);
        MoveGuard { state: self }
    }

    /// Runs `func` with the given move applied, then undoes it.
    pub fn with_move<F, R>(&mut self, mov: Move, func: F) -> R
    where
        F: FnOnce(&mut GameState) -> R,
    {
        let mut guard = self.make_move(mov);
        func(&mut guard)
    }
}

/// A move applied to a `GameState` that is undone when the guard goes out of scope.
pub struct MoveGuard<'a> {
    state: &'a mut GameState,
}

impl<'a> Deref for MoveGuard<'a> {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        self.state
    }
}

impl<'a> DerefMut for MoveGuard<'a> {
    fn deref_mut(&mut self) -> &mut GameState {
        self.state
    }
}

impl<'a> Drop for MoveGuard<'a> {
    fn drop(&mut self) {
        self.state.undo_move();
    }
}

//
// FEN and notation parsing and generation.
//
// FEN describes a position as text. Castling rights are accepted and ignored, since this engine
// does not castle, and the two move clocks are optional.
//

impl GameState {
    /// Constructs a game state from a FEN representation of a board position.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<GameState, FenParseError> {
        let mut fields = fen.as_ref().split_whitespace();
        let placement = fields.next().ok_or(FenParseError::UnexpectedEnd)?;

        let mut board = Board::empty();
        let mut rows = placement.split('/');
        for row in 0..8 {
            let text = rows.next().ok_or(FenParseError::UnexpectedEnd)?;
            let mut col = 0;
            for c in text.chars() {
                if c.is_digit(10) {
                    if c < '1' || c > '8' {
                        return Err(FenParseError::InvalidDigit);
                    }

                    col += c as usize - '0' as usize;
                } else {
                    let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece)?;
                    if col >= 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    board.set(Square::new(row, col), Some(piece));
                    col += 1;
                }

                if col > 8 {
                    return Err(FenParseError::FileDoesNotSumToEight);
                }
            }

            if col != 8 {
                return Err(FenParseError::FileDoesNotSumToEight);
            }
        }

        if let Some(extra) = rows.next() {
            let c = extra.chars().next().unwrap_or('/');
            return Err(FenParseError::UnexpectedChar(c));
        }

        let side_to_move = match fields.next().ok_or(FenParseError::UnexpectedEnd)? {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenParseError::InvalidSideToMove),
        };

        let castle = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        if castle != "-" && !castle.chars().all(|c| "KQkq".contains(c)) {
            return Err(FenParseError::InvalidCastle);
        }

        let en_passant_square = match fields.next().ok_or(FenParseError::UnexpectedEnd)? {
            "-" => None,
            text => {
                let target = Square::from_notation(text).ok_or(FenParseError::InvalidEnPassant)?;
                if !en_passant_matches_board(&board, side_to_move, target) {
                    return Err(FenParseError::InvalidEnPassant);
                }

                Some(target)
            }
        };

        let halfmove_clock = match fields.next() {
            Some(halfmove) => halfmove
                .parse::<u32>()
                .map_err(|_| FenParseError::InvalidHalfmove)?,
            None => 0,
        };

        let fullmove_base = match fields.next() {
            Some(fullmove) => fullmove
                .parse::<u32>()
                .map_err(|_| FenParseError::InvalidFullmove)?,
            None => 1,
        };

        let mut king_squares = [None, None];
        for (square, piece) in board.pieces() {
            if piece.kind != PieceKind::King {
                continue;
            }

            let slot = &mut king_squares[piece.color.as_index()];
            if slot.is_some() {
                return Err(FenParseError::TooManyKings(piece.color));
            }

            *slot = Some(square);
        }

        let white_king = king_squares[0].ok_or(FenParseError::MissingKing(Color::White))?;
        let black_king = king_squares[1].ok_or(FenParseError::MissingKing(Color::Black))?;
        Ok(GameState {
            board,
            side_to_move,
            king_squares: [white_king, black_king],
            en_passant_square,
            pins: PinList::new(),
            checks: CheckList::new(),
            status: GameStatus::Ongoing,
            move_log: vec![],
            en_passant_log: vec![],
            halfmove_clock,
            halfmove_log: vec![],
            fullmove_base,
        })
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for row in 0..8 {
            let mut empty_squares = 0;
            for col in 0..8 {
                if let Some(piece) = self.board.piece_at(Square::new(row, col)) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if row != 7 {
                buf.push('/');
            }
        }

        buf.push(' ');
        write!(&mut buf, "{}", self.side_to_move).unwrap();
        buf.push_str(" - ");
        if let Some(ep_square) = self.en_passant_square {
            write!(&mut buf, "{}", ep_square).unwrap();
        } else {
            buf.push('-');
        }

        write!(
            &mut buf,
            " {} {}",
            self.halfmove_clock,
            self.fullmove_number()
        )
        .unwrap();
        buf
    }

    /// Plies since the last pawn move or capture.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// The FEN fullmove number: starts at the loaded value and increments after black moves.
    pub fn fullmove_number(&self) -> u32 {
        let plies = self.move_log.len() as u32;
        let black_moved_first = match self.move_log.first() {
            Some(mov) => mov.piece_moved().color == Color::Black,
            None => false,
        };

        if black_moved_first {
            self.fullmove_base + (plies + 1) / 2
        } else {
            self.fullmove_base + plies / 2
        }
    }

    /// Resolves a move written as start and end squares, e.g. "e2e4", to the matching legal
    /// move. An optional fifth character picks the promotion piece ("e7e8n").
    pub fn move_from_notation(&mut self, text: &str) -> Option<Move> {
        if text.len() < 4 || text.len() > 5 || !text.is_ascii() {
            return None;
        }

        let start = Square::from_notation(&text[0..2])?;
        let end = Square::from_notation(&text[2..4])?;
        let promotion = match text[4..].chars().next() {
            Some(c) => Some(PieceKind::try_from(c).ok()?),
            None => None,
        };

        let mov = self
            .legal_moves()
            .into_iter()
            .find(|m| m.start() == start && m.end() == end)?;
        match promotion {
            Some(kind) if mov.is_promotion() && kind.is_promotion_target() => {
                Some(mov.with_promotion(kind))
            }
            Some(_) => None,
            None => Some(mov),
        }
    }
}

/// An en-passant target only makes sense directly behind a pawn of the side that just moved,
/// on the square that pawn skipped.
fn en_passant_matches_board(board: &Board, side_to_move: Color, target: Square) -> bool {
    let mover = side_to_move.toggle();
    let skipped_row = match side_to_move {
        Color::White => 2,
        Color::Black => 5,
    };

    if target.row() != skipped_row || !board.is_empty(target) {
        return false;
    }

    match target.offset(mover.pawn_direction(), 0) {
        Some(pawn_square) => {
            board.piece_at(pawn_square) == Some(Piece::new(PieceKind::Pawn, mover))
        }
        None => false,
    }
}

//
// Trait implementations
//

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(f, "side to move: {}", self.side_to_move)?;
        for &color in &COLORS {
            writeln!(f, "{} king: {}", color, self.king_square(color))?;
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}
