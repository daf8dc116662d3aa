// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A chess rules engine on an 8x8 mailbox board, with a fixed-depth negamax search.
//!
//! `GameState` owns the position. Ask it for `legal_moves`, apply one with `apply_move` (or
//! scope it with `make_move`) and ask again. Castling is not part of the rules implemented here.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod analysis;
mod board;
pub mod eval;
mod game_state;
mod move_generator;
mod moves;
mod perft;
pub mod search;
mod types;

pub use analysis::{Check, Pin, PinsAndChecks};
pub use board::Board;
pub use game_state::{FenParseError, GameState, GameStatus, MoveGuard};
pub use moves::{Move, MoveFlags};
pub use perft::perft;
pub use types::{squares, Color, Direction, Piece, PieceKind, Square};
