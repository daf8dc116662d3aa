// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::eval::{BoardEvaluator, MaterialEvaluator, Score};
use crate::game_state::GameState;
use crate::moves::Move;
use crate::search::{DataRecorder, NullDataRecorder, Record};

/// Knobs for a fixed-depth search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    /// Plies to look ahead. A depth of zero is searched as one.
    pub depth: u32,
    /// Use the alpha-beta window. Changes the node count, never the result.
    pub pruning: bool,
    /// Shuffle the root moves before searching them, so that equally good moves are picked at
    /// random.
    pub shuffle: bool,
    /// Seed for the shuffle. Drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for SearchOptions {
    fn default() -> SearchOptions {
        SearchOptions {
            depth: 2,
            pruning: true,
            shuffle: true,
            seed: None,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SearchResult {
    /// `None` only when there were no moves to choose from.
    pub best_move: Option<Move>,
    /// Score of the best move, from the point of view of the side to move.
    pub score: Score,
    pub nodes_searched: u64,
    pub cutoffs: u64,
}

/// A fixed-depth negamax searcher, with or without alpha-beta pruning.
///
/// The searcher walks the tree by making and unmaking moves on the `GameState` it is given, so
/// the state is borrowed mutably for the duration of a search and comes back unchanged.
pub struct Searcher<E> {
    evaluator: E,
    options: SearchOptions,
    rng: StdRng,
}

impl<E: BoardEvaluator> Searcher<E> {
    pub fn new(options: SearchOptions) -> Searcher<E> {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Searcher {
            evaluator: Default::default(),
            options,
            rng,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Picks one of `moves` uniformly at random.
    pub fn random_move(&mut self, moves: &[Move]) -> Option<Move> {
        moves.choose(&mut self.rng).cloned()
    }

    /// Searches `moves`, the legal moves of `state`, and returns the best of them.
    pub fn search(&mut self, state: &mut GameState, moves: &[Move]) -> SearchResult {
        self.search_with_recorder(state, moves, &NullDataRecorder)
    }

    pub fn search_with_recorder<R: DataRecorder + ?Sized>(
        &mut self,
        state: &mut GameState,
        moves: &[Move],
        recorder: &R,
    ) -> SearchResult {
        let depth = cmp::max(1, self.options.depth);
        let mut ordered = moves.to_vec();
        if self.options.shuffle {
            ordered.shuffle(&mut self.rng);
        }

        let mut ctx = SearchContext {
            evaluator: &self.evaluator,
            nodes_searched: 0,
            cutoffs: 0,
        };

        let (best_move, score) = ctx.root(state, &ordered, depth, self.options.pruning);
        let result = SearchResult {
            best_move,
            score,
            nodes_searched: ctx.nodes_searched,
            cutoffs: ctx.cutoffs,
        };

        info!(
            "depth {} search of {} moves: best {}, score {}, {} nodes, {} cutoffs",
            depth,
            moves.len(),
            result
                .best_move
                .map(|m| m.notation())
                .unwrap_or_else(|| "none".to_owned()),
            result.score,
            result.nodes_searched,
            result.cutoffs
        );

        recorder.record(
            state,
            &Record {
                fen: String::new(),
                depth,
                nodes: result.nodes_searched,
                cutoffs: result.cutoffs,
                best_move: result.best_move.map(|m| m.notation()).unwrap_or_default(),
                score: result.score.value(),
                pruning: self.options.pruning,
            },
        );

        result
    }
}

/// Per-search bookkeeping, threaded by reference through the recursion.
struct SearchContext<'a, E> {
    evaluator: &'a E,
    nodes_searched: u64,
    cutoffs: u64,
}

impl<'a, E: BoardEvaluator> SearchContext<'a, E> {
    /// Searches the root moves in order. A move replaces the best one so far only if it scores
    /// strictly higher, so the first of several equal moves wins.
    fn root(
        &mut self,
        state: &mut GameState,
        moves: &[Move],
        depth: u32,
        pruning: bool,
    ) -> (Option<Move>, Score) {
        self.nodes_searched += 1;
        if moves.is_empty() {
            return (None, self.leaf(state));
        }

        let mut best_move = None;
        let mut best_score = Score::NEG_INFINITY;
        let mut alpha = Score::NEG_INFINITY;
        let beta = Score::INFINITY;
        for &mov in moves {
            let score = {
                let mut child = state.make_move(mov);
                let replies = child.legal_moves();
                if pruning {
                    -self.negamax_alpha_beta(&mut child, &replies, depth - 1, -beta, -alpha)
                } else {
                    -self.negamax(&mut child, &replies, depth - 1)
                }
            };

            trace!("root move {} scored {}", mov, score);
            if score > best_score {
                best_score = score;
                best_move = Some(mov);
            }

            if score > alpha {
                alpha = score;
            }
        }

        (best_move, best_score)
    }

    fn negamax(&mut self, state: &mut GameState, moves: &[Move], depth: u32) -> Score {
        self.nodes_searched += 1;
        if depth == 0 || moves.is_empty() {
            return self.leaf(state);
        }

        let mut best = Score::NEG_INFINITY;
        for &mov in moves {
            let mut child = state.make_move(mov);
            let replies = child.legal_moves();
            let score = -self.negamax(&mut child, &replies, depth - 1);
            best = cmp::max(best, score);
        }

        best
    }

    fn negamax_alpha_beta(
        &mut self,
        state: &mut GameState,
        moves: &[Move],
        depth: u32,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        self.nodes_searched += 1;
        if depth == 0 || moves.is_empty() {
            return self.leaf(state);
        }

        let mut best = Score::NEG_INFINITY;
        for &mov in moves {
            let score = {
                let mut child = state.make_move(mov);
                let replies = child.legal_moves();
                -self.negamax_alpha_beta(&mut child, &replies, depth - 1, -beta, -alpha)
            };

            best = cmp::max(best, score);
            alpha = cmp::max(alpha, score);
            if alpha >= beta {
                self.cutoffs += 1;
                break;
            }
        }

        best
    }

    /// Scores a position from the point of view of its side to move. The status used to spot
    /// mate and stalemate comes from the `legal_moves` call that produced this node's moves.
    fn leaf(&self, state: &GameState) -> Score {
        self.evaluator
            .evaluate(state)
            .relative_to(state.side_to_move())
    }
}

/// Picks one of `moves` uniformly at random, or `None` if there are none.
pub fn find_random_move(moves: &[Move]) -> Option<Move> {
    moves.choose(&mut rand::thread_rng()).cloned()
}

/// Runs a pruned, shuffled material search of `moves` to the given depth and returns the best
/// move. Returns `None` only if `moves` is empty.
pub fn find_best_move(state: &mut GameState, moves: &[Move], depth: u32) -> Option<Move> {
    let options = SearchOptions {
        depth,
        ..Default::default()
    };

    Searcher::<MaterialEvaluator>::new(options)
        .search(state, moves)
        .best_move
}
