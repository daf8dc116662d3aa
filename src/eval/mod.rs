// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::game_state::GameState;

mod material_evaluator;
mod score;

pub use material_evaluator::MaterialEvaluator;
pub use score::Score;

/// Scores a position from white's point of view. Evaluators read the game status left behind by
/// the most recent `legal_moves` call to recognize checkmate and stalemate.
pub trait BoardEvaluator: Default {
    fn evaluate(&self, state: &GameState) -> Score;
}
