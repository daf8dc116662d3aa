// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pin and check detection.
//!
//! Rather than testing every candidate move by making it and looking for attacks on the king,
//! the move generator asks this module which of the moving side's pieces are pinned and which
//! enemy pieces are giving check. Both are found by casting rays outward from the king.
use arrayvec::ArrayVec;

use crate::board::Board;
use crate::game_state::GameState;
use crate::types::{Color, Direction, PieceKind, Square};
use crate::types::{DIAGONAL, KNIGHT_JUMPS, ORTHOGONAL};

/// An allied piece that may only move along `direction`, the ray from its king through it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    pub direction: Direction,
}

/// An enemy piece on `square` attacking the king. `direction` is the ray from the king to the
/// checker, or the knight jump that reaches it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub square: Square,
    pub direction: Direction,
}

// At most one pin per ray. Checks can come from every ray and every knight jump.
pub type PinList = ArrayVec<[Pin; 8]>;
pub type CheckList = ArrayVec<[Check; 16]>;

#[derive(Clone, Debug, Default)]
pub struct PinsAndChecks {
    pub pins: PinList,
    pub checks: CheckList,
}

impl PinsAndChecks {
    pub fn in_check(&self) -> bool {
        !self.checks.is_empty()
    }
}

/// Scans outward from `king` for pins against and checks on the `ally` side.
///
/// Allied kings are transparent to the scan. This matters when the king's square is
/// hypothetical: the real king is still on the board and must not block a ray through it.
pub fn scan(board: &Board, king: Square, ally: Color) -> PinsAndChecks {
    let mut result = PinsAndChecks::default();
    let enemy = ally.toggle();
    for &dir in ORTHOGONAL.iter().chain(DIAGONAL.iter()) {
        let mut possible_pin = None;
        let mut current = king;
        for distance in 1..8 {
            current = match current.towards(dir) {
                Some(sq) => sq,
                None => break,
            };

            let piece = match board.piece_at(current) {
                Some(piece) => piece,
                None => continue,
            };

            if piece.color == ally {
                if piece.kind == PieceKind::King {
                    continue;
                }

                if possible_pin.is_some() {
                    // Two allied pieces on this ray, nothing gets through.
                    break;
                }

                possible_pin = Some(Pin {
                    square: current,
                    direction: dir,
                });
                continue;
            }

            if attacks_along(piece.kind, enemy, dir, distance) {
                match possible_pin {
                    None => result.checks.push(Check {
                        square: current,
                        direction: dir,
                    }),
                    Some(pin) => result.pins.push(pin),
                }
            }

            break;
        }
    }

    for &jump in KNIGHT_JUMPS.iter() {
        if let Some(sq) = king.towards(jump) {
            if let Some(piece) = board.piece_at(sq) {
                if piece.color == enemy && piece.kind == PieceKind::Knight {
                    result.checks.push(Check {
                        square: sq,
                        direction: jump,
                    });
                }
            }
        }
    }

    result
}

/// Whether an enemy piece of `kind`, found `distance` squares from the king along `dir`, attacks
/// back down that ray.
fn attacks_along(kind: PieceKind, enemy: Color, dir: Direction, distance: usize) -> bool {
    match kind {
        PieceKind::Rook => dir.is_orthogonal(),
        PieceKind::Bishop => dir.is_diagonal(),
        PieceKind::Queen => true,
        PieceKind::King => distance == 1,
        // A pawn attacks the king from one row "behind" it, relative to the pawn's own forward
        // direction.
        PieceKind::Pawn => {
            distance == 1 && dir.is_diagonal() && dir.row == -enemy.pawn_direction()
        }
        PieceKind::Knight => false,
    }
}

impl GameState {
    /// Scans for pins and checks against the side to move, from its tracked king square.
    pub fn check_for_pins_and_checks(&self) -> PinsAndChecks {
        let side = self.side_to_move();
        scan(self.board(), self.king_square(side), side)
    }

    /// Whether the side to move is currently in check.
    pub fn is_in_check(&self) -> bool {
        self.check_for_pins_and_checks().in_check()
    }
}
