// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Legal move generation.
//!
//! Generation runs in two phases. A pin and check scan from the king comes first (see the
//! `analysis` module), then each piece generates its moves while honoring any pin on it. When in
//! check, the result is filtered down to moves that capture or block the single checker, or to
//! king moves alone under double check.
use arrayvec::ArrayVec;

use crate::analysis::{self, Check, PinList};
use crate::game_state::{GameState, GameStatus};
use crate::moves::Move;
use crate::types::TableIndex;
use crate::types::{squares, Color, Direction, PieceKind, Square};
use crate::types::{DIAGONAL, KING_STEPS, KNIGHT_JUMPS, ORTHOGONAL};

/// Removes and returns the pin on `square`, if any. Each piece consumes its own pin exactly once.
fn take_pin(pins: &mut PinList, square: Square) -> Option<Direction> {
    let direction = pins.iter().find(|p| p.square == square)?.direction;
    pins.retain(|p| p.square != square);
    Some(direction)
}

impl GameState {
    /// Generates every legal move for the side to move and updates the pin, check and status
    /// bookkeeping to match. The list is built fresh on every call.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let scan = self.check_for_pins_and_checks();
        self.pins = scan.pins.clone();
        self.checks = scan.checks.clone();

        let king = self.king_square(self.side_to_move);
        let mut moves = Vec::with_capacity(48);
        match self.checks.len() {
            0 => {
                let mut pins = scan.pins;
                self.generate_pseudo_legal_moves(&mut pins, &mut moves);
            }
            1 => {
                let mut pins = scan.pins;
                self.generate_pseudo_legal_moves(&mut pins, &mut moves);
                let check = self.checks[0];
                let valid_squares = self.check_evasion_squares(king, check);
                moves.retain(|mov| {
                    mov.piece_moved().kind == PieceKind::King
                        || valid_squares.contains(&mov.end())
                        || (mov.is_en_passant() && mov.capture_square() == check.square)
                });
            }
            _ => self.generate_king_moves(king, &mut moves),
        }

        self.status = match (moves.is_empty(), self.checks.is_empty()) {
            (false, _) => GameStatus::Ongoing,
            (true, false) => GameStatus::Checkmate,
            (true, true) => GameStatus::Stalemate,
        };

        trace!(
            "{} legal moves for {} ({:?})",
            moves.len(),
            self.side_to_move,
            self.status
        );
        moves
    }

    /// Squares a non-king piece can move to in order to resolve a single check: the checker's
    /// own square and, for sliding checkers, every square between it and the king.
    fn check_evasion_squares(&self, king: Square, check: Check) -> ArrayVec<[Square; 8]> {
        let mut squares = ArrayVec::new();
        let checker = self
            .board
            .piece_at(check.square)
            .expect("check recorded on an empty square");
        if checker.kind == PieceKind::Knight {
            squares.push(check.square);
            return squares;
        }

        let mut current = king;
        while let Some(next) = current.towards(check.direction) {
            squares.push(next);
            if next == check.square {
                break;
            }

            current = next;
        }

        squares
    }

    /// Generates moves for every piece of the side to move without regard to check. Pinned
    /// pieces are restricted to their pin axis.
    fn generate_pseudo_legal_moves(&mut self, pins: &mut PinList, moves: &mut Vec<Move>) {
        let side = self.side_to_move;
        for square in squares() {
            let piece = match self.board.piece_at(square) {
                Some(piece) if piece.color == side => piece,
                _ => continue,
            };

            match piece.kind {
                PieceKind::Pawn => {
                    let pin = take_pin(pins, square);
                    self.generate_pawn_moves(square, pin, moves);
                }
                PieceKind::Knight => {
                    // A pinned knight can never stay on its pin axis.
                    if take_pin(pins, square).is_none() {
                        self.generate_knight_moves(square, moves);
                    }
                }
                PieceKind::Bishop => {
                    let pin = take_pin(pins, square);
                    self.generate_sliding_moves(square, &DIAGONAL, pin, moves);
                }
                PieceKind::Rook => {
                    let pin = take_pin(pins, square);
                    self.generate_sliding_moves(square, &ORTHOGONAL, pin, moves);
                }
                PieceKind::Queen => {
                    let pin = take_pin(pins, square);
                    self.generate_sliding_moves(square, &ORTHOGONAL, pin, moves);
                    self.generate_sliding_moves(square, &DIAGONAL, pin, moves);
                }
                PieceKind::King => self.generate_king_moves(square, moves),
            }
        }
    }

    fn generate_pawn_moves(&self, square: Square, pin: Option<Direction>, moves: &mut Vec<Move>) {
        let side = self.side_to_move;
        let forward = side.pawn_direction();
        let allowed = |dir: Direction| pin.map_or(true, |p| p.is_axis_of(dir));

        if let Some(one) = square.offset(forward, 0) {
            if self.board.is_empty(one) && allowed(Direction::new(forward, 0)) {
                moves.push(Move::new(square, one, &self.board));
                if square.row() == side.pawn_start_row() {
                    if let Some(two) = square.offset(2 * forward, 0) {
                        if self.board.is_empty(two) {
                            moves.push(Move::new(square, two, &self.board));
                        }
                    }
                }
            }
        }

        for &dcol in &[-1, 1] {
            let dir = Direction::new(forward, dcol);
            let target = match square.towards(dir) {
                Some(target) => target,
                None => continue,
            };

            if !allowed(dir) {
                continue;
            }

            match self.board.piece_at(target) {
                Some(piece) if piece.color != side => {
                    moves.push(Move::new(square, target, &self.board));
                }
                None if Some(target) == self.en_passant_square => {
                    let mov = Move::en_passant(square, target, &self.board);
                    if self.en_passant_keeps_king_safe(mov) {
                        moves.push(mov);
                    }
                }
                _ => {}
            }
        }
    }

    /// En-passant removes two pieces from the same row at once, which can expose the king along
    /// that row in a way the pin scan cannot see. Try it on a scratch board and rescan.
    fn en_passant_keeps_king_safe(&self, mov: Move) -> bool {
        let mut board = self.board;
        board.set(mov.start(), None);
        board.set(mov.capture_square(), None);
        board.set(mov.end(), Some(mov.piece_moved()));
        let side = self.side_to_move;
        !analysis::scan(&board, self.king_square(side), side).in_check()
    }

    fn generate_knight_moves(&self, square: Square, moves: &mut Vec<Move>) {
        let side = self.side_to_move;
        for &jump in KNIGHT_JUMPS.iter() {
            if let Some(target) = square.towards(jump) {
                match self.board.piece_at(target) {
                    Some(piece) if piece.color == side => {}
                    _ => moves.push(Move::new(square, target, &self.board)),
                }
            }
        }
    }

    fn generate_sliding_moves(
        &self,
        square: Square,
        directions: &[Direction],
        pin: Option<Direction>,
        moves: &mut Vec<Move>,
    ) {
        let side = self.side_to_move;
        for &dir in directions {
            if let Some(pin) = pin {
                if !pin.is_axis_of(dir) {
                    continue;
                }
            }

            let mut current = square;
            while let Some(target) = current.towards(dir) {
                match self.board.piece_at(target) {
                    None => moves.push(Move::new(square, target, &self.board)),
                    Some(piece) => {
                        if piece.color != side {
                            moves.push(Move::new(square, target, &self.board));
                        }

                        break;
                    }
                }

                current = target;
            }
        }
    }

    /// King moves are tested by relocating the king tracker to the candidate square and
    /// rescanning for checks. The tracker is always put back afterwards.
    fn generate_king_moves(&mut self, square: Square, moves: &mut Vec<Move>) {
        let side = self.side_to_move;
        for &step in KING_STEPS.iter() {
            let target = match square.towards(step) {
                Some(target) => target,
                None => continue,
            };

            if let Some(piece) = self.board.piece_at(target) {
                if piece.color == side {
                    continue;
                }
            }

            let idx = side.as_index();
            self.king_squares[idx] = target;
            let in_check = self.check_for_pins_and_checks().in_check();
            self.king_squares[idx] = square;
            if !in_check {
                moves.push(Move::new(square, target, &self.board));
            }
        }
    }

    /// Whether the side not to move attacks `square`.
    pub fn square_under_attack(&mut self, square: Square) -> bool {
        let attacker = self.side_to_move.toggle();
        self.square_attacked_by(attacker, square)
    }

    /// Whether any move `attacker` could make, ignoring check and pins, lands on `square`.
    /// The side to move is switched to `attacker` for the duration and then restored.
    pub fn square_attacked_by(&mut self, attacker: Color, square: Square) -> bool {
        let saved = self.side_to_move;
        self.side_to_move = attacker;
        let mut moves = Vec::with_capacity(48);
        self.generate_pseudo_legal_moves(&mut PinList::new(), &mut moves);
        self.side_to_move = saved;
        moves.iter().any(|mov| mov.end() == square)
    }
}
