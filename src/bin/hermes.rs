// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::fs::File;
use std::process;
use std::time::Instant;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use hermes::eval::MaterialEvaluator;
use hermes::search::{CsvDataRecorder, DataRecorder, NullDataRecorder, SearchOptions, Searcher};
use hermes::{perft, GameState, GameStatus};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

fn fen_arg() -> Arg<'static, 'static> {
    Arg::with_name("FEN")
        .help("FEN string for a board position")
        .default_value(START_FEN)
        .index(1)
}

fn depth_arg(default: &'static str) -> Arg<'static, 'static> {
    Arg::with_name("depth")
        .help("Depth of move tree to search")
        .value_name("DEPTH")
        .short("d")
        .long("depth")
        .default_value(default)
        .takes_value(true)
}

fn search_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name("no-pruning")
            .help("Search the full tree without alpha-beta pruning")
            .long("no-pruning"),
        Arg::with_name("seed")
            .help("Seed for move shuffling")
            .value_name("SEED")
            .long("seed")
            .takes_value(true),
        Arg::with_name("record")
            .help("Write search statistics to a CSV file")
            .value_name("FILE")
            .long("record")
            .takes_value(true),
    ]
}

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(fen_arg())
                .arg(depth_arg("3")),
        )
        .subcommand(
            SubCommand::with_name("search")
                .about("Search a board position for the best move")
                .arg(fen_arg())
                .arg(depth_arg("2"))
                .args(&search_args()),
        )
        .subcommand(
            SubCommand::with_name("selfplay")
                .about("Play the engine against itself from a board position")
                .arg(fen_arg())
                .arg(depth_arg("2"))
                .args(&search_args())
                .arg(
                    Arg::with_name("max-plies")
                        .help("Stop the game after this many plies")
                        .value_name("PLIES")
                        .long("max-plies")
                        .default_value("200")
                        .takes_value(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("search", Some(matches)) => with_recorder(matches, run_search),
        ("selfplay", Some(matches)) => with_recorder(matches, run_selfplay),
        _ => unreachable!(),
    }

    process::exit(0);
}

fn load_fen(matches: &ArgMatches) -> GameState {
    let fen = matches.value_of("FEN").unwrap();
    match GameState::from_fen(fen) {
        Ok(state) => state,
        Err(err) => {
            println!("invalid fen: {:?}", err);
            process::exit(1);
        }
    }
}

fn search_options(matches: &ArgMatches) -> SearchOptions {
    let seed = if matches.is_present("seed") {
        Some(value_t_or_exit!(matches, "seed", u64))
    } else {
        None
    };

    SearchOptions {
        depth: value_t_or_exit!(matches, "depth", u32),
        pruning: !matches.is_present("no-pruning"),
        shuffle: true,
        seed,
    }
}

fn with_recorder<F>(matches: &ArgMatches, run: F)
where
    F: Fn(&ArgMatches, &dyn DataRecorder),
{
    match matches.value_of("record") {
        Some(path) => match File::create(path) {
            Ok(file) => run(matches, &CsvDataRecorder::new(file)),
            Err(err) => {
                println!("failed to open {}: {}", path, err);
                process::exit(1);
            }
        },
        None => run(matches, &NullDataRecorder),
    }
}

fn run_perft(matches: &ArgMatches) {
    let depth = value_t_or_exit!(matches, "depth", u32);
    let state = load_fen(matches);
    println!("fen:   {}", state.as_fen());
    println!("depth: {}", depth);
    println!();
    println!("{}", state);
    println!();
    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&state, i);
        let duration = Instant::now() - start;
        let nanos = duration.subsec_nanos() as u64;
        let ms = (1000 * 1000 * 1000 * duration.as_secs() + nanos) / (1000 * 1000);
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }
}

fn run_search(matches: &ArgMatches, recorder: &dyn DataRecorder) {
    let options = search_options(matches);
    let mut state = load_fen(matches);
    println!("fen:   {}", state.as_fen());
    println!("depth: {}", options.depth);
    println!();
    println!("{}", state);
    println!();

    let moves = state.legal_moves();
    let mut searcher: Searcher<MaterialEvaluator> = Searcher::new(options);
    let result = searcher.search_with_recorder(&mut state, &moves, recorder);
    match result.best_move {
        Some(mov) => println!("best move: {}", mov),
        None => println!("best move: none ({:?})", state.status()),
    }
    println!("    score: {}", result.score);
    println!("    nodes: {}", result.nodes_searched);
    println!("  cutoffs: {}", result.cutoffs);
}

fn run_selfplay(matches: &ArgMatches, recorder: &dyn DataRecorder) {
    let options = search_options(matches);
    let max_plies = value_t_or_exit!(matches, "max-plies", u32);
    let mut state = load_fen(matches);
    let mut searcher: Searcher<MaterialEvaluator> = Searcher::new(options);
    println!("{}", state);
    for ply in 0..max_plies {
        let moves = state.legal_moves();
        let result = searcher.search_with_recorder(&mut state, &moves, recorder);
        let mov = match result.best_move {
            Some(mov) => mov,
            None => break,
        };

        println!("{:>3}. {:?} {} ({})", ply / 2 + 1, state.side_to_move(), mov, result.score);
        state.apply_move(mov);
    }

    println!();
    println!("{}", state);
    match state.status() {
        GameStatus::Checkmate => println!("checkmate, {:?} wins", state.side_to_move().toggle()),
        GameStatus::Stalemate => println!("stalemate"),
        GameStatus::Ongoing => println!("stopped after {} plies", state.move_log().len()),
    }
    println!("fen: {}", state.as_fen());
}
