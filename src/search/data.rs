// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io::Write;
use std::sync::Mutex;

use csv::Writer;

use crate::game_state::GameState;

/// Statistics for one completed search, one CSV row per search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Record {
    pub fen: String,
    pub depth: u32,
    pub nodes: u64,
    pub cutoffs: u64,
    pub best_move: String,
    pub score: i32,
    pub pruning: bool,
}

pub trait DataRecorder {
    fn record(&self, state: &GameState, rec: &Record);
}

pub struct NullDataRecorder;
impl DataRecorder for NullDataRecorder {
    fn record(&self, _state: &GameState, _rec: &Record) {}
}

/// Writes records as CSV. Write failures are logged and otherwise ignored, so a full disk never
/// interrupts a game.
pub struct CsvDataRecorder<W: Write> {
    writer: Mutex<Writer<W>>,
}

impl<W: Write> CsvDataRecorder<W> {
    pub fn new(writer: W) -> CsvDataRecorder<W> {
        CsvDataRecorder {
            writer: Mutex::new(Writer::from_writer(writer)),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Option<W> {
        let writer = match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };

        writer.into_inner().ok()
    }
}

impl<W: Write> DataRecorder for CsvDataRecorder<W> {
    fn record(&self, state: &GameState, rec: &Record) {
        let mut copy = rec.clone();
        copy.fen = state.as_fen();
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };

        let result = writer
            .serialize(&copy)
            .and_then(|_| writer.flush().map_err(csv::Error::from));
        if let Err(err) = result {
            warn!("failed to record search data: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CsvDataRecorder, DataRecorder, Record};
    use crate::game_state::GameState;

    #[test]
    fn csv_row_per_record() {
        let recorder = CsvDataRecorder::new(vec![]);
        let state = GameState::new();
        let rec = Record {
            depth: 2,
            nodes: 421,
            best_move: "e2e4".to_owned(),
            pruning: true,
            ..Default::default()
        };

        recorder.record(&state, &rec);
        recorder.record(&state, &rec);
        let bytes = recorder.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(3, lines.len());
        assert_eq!("fen,depth,nodes,cutoffs,best_move,score,pruning", lines[0]);
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1,2,421,0,e2e4,0,true",
            lines[1]
        );
    }
}
