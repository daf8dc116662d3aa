// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::game_state::GameState;

/// Counts the leaves of the legal move tree rooted at `state`, `depth` plies deep.
///
/// Root moves are counted in parallel. Every worker gets its own copy of the state, since
/// make/unmake leaves a state inconsistent between the two halves.
pub fn perft(state: &GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut root = state.clone();
    let moves = root.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .par_iter()
        .map(|&mov| {
            let mut worker = root.clone();
            worker.apply_move(mov);
            perft_sequential(&mut worker, depth - 1)
        })
        .sum()
}

fn perft_sequential(state: &mut GameState, depth: u32) -> u64 {
    let moves = state.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mov| {
            let mut child = state.make_move(mov);
            perft_sequential(&mut child, depth - 1)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::perft;
    use crate::game_state::GameState;

    fn perft_test(fen: &'static str, depth: u32, count: u64) {
        let state = GameState::from_fen(fen).unwrap();
        assert_eq!(count, perft(&state, depth));
    }

    macro_rules! perft_tests {
        () => {};
        ($name:ident ($depth:expr): $fen:expr => $count:expr; $($tail:tt)*) => {
            #[test]
            fn $name() {
                perft_test($fen, $depth, $count)
            }

            perft_tests!($($tail)*);
        };

        (skip $name:ident ($depth:expr): $fen:expr => $count:expr; $($tail:tt)*) => {
            #[test]
            #[ignore]
            fn $name() {
                perft_test($fen, $depth, $count)
            }

            perft_tests!($($tail)*);
        };

    }

    #[test]
    fn depth_zero_is_one() {
        assert_eq!(1, perft(&GameState::new(), 0));
    }

    // Castling never comes up within these depths, so the counts match the usual tables.
    perft_tests! {
        start_1 (1): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" => 20;
        start_2 (2): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" => 400;
        start_3 (3): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" => 8902;
        skip start_4 (4): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" => 197281;

        position_3_1 (1): "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1" => 14;
        position_3_2 (2): "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1" => 191;
        position_3_3 (3): "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1" => 2812;
        skip position_3_4 (4): "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1" => 43238;
    }
}
