// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::eval::{BoardEvaluator, Score};
use crate::game_state::{GameState, GameStatus};
use crate::types::{Color, TableIndex};

// Indexed by PieceKind: pawn, knight, bishop, rook, queen, king.
const PIECE_WEIGHTS: [i32; 6] = [1, 3, 3, 5, 10, 0];

/// Static evaluator that counts material and recognizes checkmate and stalemate. It does no
/// lookahead and has no positional terms.
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    pub fn new() -> MaterialEvaluator {
        MaterialEvaluator
    }
}

impl Default for MaterialEvaluator {
    fn default() -> MaterialEvaluator {
        MaterialEvaluator
    }
}

impl BoardEvaluator for MaterialEvaluator {
    fn evaluate(&self, state: &GameState) -> Score {
        match state.status() {
            // The side to move is the one that got mated.
            GameStatus::Checkmate => return (-Score::MATE).relative_to(state.side_to_move()),
            GameStatus::Stalemate => return Score::DRAW,
            GameStatus::Ongoing => {}
        }

        let material = state
            .board()
            .pieces()
            .map(|(_, piece)| {
                let weight = PIECE_WEIGHTS[piece.kind.as_index()];
                match piece.color {
                    Color::White => weight,
                    Color::Black => -weight,
                }
            })
            .sum();

        Score::new(material)
    }
}
