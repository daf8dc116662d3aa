// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::i32;
use std::ops::Neg;

use crate::types::Color;

/// Score is the output of a board evaluation function, in pawns. Positive scores favor the
/// maximizing player.
///
/// Checkmate is represented by `Score::MATE`, which is larger than any material total can be.
/// Scores are plain integers so that comparisons are exact and negation is symmetric.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(i32);

impl Score {
    /// The score of a checkmate, in favor of the side delivering it.
    pub const MATE: Score = Score(1000);

    /// The score of a stalemate.
    pub const DRAW: Score = Score(0);

    /// Bounds of the search window. Strictly beyond the mate score in both directions, and
    /// negations of each other.
    pub const INFINITY: Score = Score(i32::MAX);
    pub const NEG_INFINITY: Score = Score(-i32::MAX);

    pub fn new(value: i32) -> Score {
        Score(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_mate(self) -> bool {
        self.0.abs() == Score::MATE.0
    }

    /// Converts a white-relative score into one relative to `color`.
    pub fn relative_to(self, color: Color) -> Score {
        match color {
            Color::White => self,
            Color::Black => -self,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if *self == Score::MATE {
            write!(f, "#")
        } else if *self == -Score::MATE {
            write!(f, "#-")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        Score(-self.0)
    }
}
