// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use hermes::{Board, Color, GameState, Piece, PieceKind, Square};

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w - - 0 1",
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b - - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w - - 1 8",
    // pins on a file and a rank, under a bishop check
    "4r2k/8/1b6/8/4R3/r2PK3/3N4/8 w - - 0 1",
    // double check
    "4k3/8/8/8/8/5n2/8/r3K2R w - - 0 1",
    // en passant available, and one that would expose the king along the rank
    "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
    "4k3/8/8/r2pP2K/8/8/8/8 w - d6 0 1",
    "8/8/8/4k3/3Pp3/8/8/4K3 b - d3 0 1",
    // promotions, with and without captures
    "1n2k3/P1P5/8/8/8/8/5p1p/3K2N1 w - - 0 1",
    "1n2k3/P1P5/8/8/8/8/5p1p/3K2N1 b - - 0 1",
];

fn sq(text: &str) -> Square {
    Square::from_notation(text).unwrap()
}

#[derive(Debug, PartialEq)]
struct Snapshot {
    board: Board,
    side_to_move: Color,
    white_king: Square,
    black_king: Square,
    en_passant: Option<Square>,
    fen: String,
}

fn snapshot(state: &GameState) -> Snapshot {
    Snapshot {
        board: *state.board(),
        side_to_move: state.side_to_move(),
        white_king: state.king_square(Color::White),
        black_king: state.king_square(Color::Black),
        en_passant: state.en_passant_square(),
        fen: state.as_fen(),
    }
}

fn play(state: &mut GameState, moves: &[&str]) {
    for text in moves {
        let mov = state
            .move_from_notation(text)
            .unwrap_or_else(|| panic!("{} is not legal in {}", text, state.as_fen()));
        state.apply_move(mov);
    }
}

/// Applies and undoes every legal move, down to `depth` plies, checking that each undo puts
/// everything back.
fn check_reversible(state: &mut GameState, depth: u32) {
    if depth == 0 {
        return;
    }

    let before = snapshot(state);
    for mov in state.legal_moves() {
        state.apply_move(mov);
        check_reversible(state, depth - 1);
        state.undo_move();
        assert_eq!(before, snapshot(state), "undo of {} did not restore", mov);
    }
}

/// Checks every legal move against an independent attack test: after the move, no enemy
/// move may land on the mover's king.
fn check_sound(state: &mut GameState) {
    for mov in state.legal_moves() {
        let mover = state.side_to_move();
        state.apply_move(mov);
        let king = state.king_square(mover);
        let attacked = state.square_attacked_by(mover.toggle(), king);
        state.undo_move();
        assert!(
            !attacked,
            "{} leaves the king on {} attacked in {}",
            mov,
            king,
            state.as_fen()
        );
    }
}

#[test]
fn start_position_has_twenty_moves() {
    let mut state = GameState::new();
    assert_eq!(20, state.legal_moves().len());
    assert!(!state.is_checkmate());
    assert!(!state.is_stalemate());
}

#[test]
fn open_game_moves() {
    let mut state = GameState::new();
    play(&mut state, &["e2e4", "e7e5"]);
    assert_eq!(29, state.legal_moves().len());
}

#[test]
fn fools_mate() {
    let mut state = GameState::new();
    play(&mut state, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert!(state.legal_moves().is_empty());
    assert!(state.is_checkmate());
    assert!(!state.is_stalemate());
    assert!(state.is_in_check());
}

#[test]
fn stalemate() {
    let mut state = GameState::from_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(state.legal_moves().is_empty());
    assert!(state.is_stalemate());
    assert!(!state.is_checkmate());
}

#[test]
fn double_check_only_king_moves() {
    let mut state = GameState::from_fen("4k3/8/8/8/8/5n2/8/r3K2R w - - 0 1").unwrap();
    let moves = state.legal_moves();
    assert!(!moves.is_empty());
    assert!(moves
        .iter()
        .all(|m| m.piece_moved().kind == PieceKind::King));
}

#[test]
fn en_passant_round_trip() {
    let mut state = GameState::new();
    play(&mut state, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert_eq!(Some(sq("d6")), state.en_passant_square());

    let before = snapshot(&state);
    let capture = state.move_from_notation("e5d6").unwrap();
    assert!(capture.is_en_passant());
    state.apply_move(capture);
    assert_eq!(None, state.piece_at(sq("d5")));
    assert_eq!(None, state.piece_at(sq("e5")));
    assert_eq!(
        Some(Piece::new(PieceKind::Pawn, Color::White)),
        state.piece_at(sq("d6"))
    );
    assert_eq!(None, state.en_passant_square());

    state.undo_move();
    assert_eq!(before, snapshot(&state));
    assert_eq!(
        Some(Piece::new(PieceKind::Pawn, Color::Black)),
        state.piece_at(sq("d5"))
    );
    assert_eq!(
        Some(Piece::new(PieceKind::Pawn, Color::White)),
        state.piece_at(sq("e5"))
    );
    assert_eq!(None, state.piece_at(sq("d6")));
}

#[test]
fn en_passant_expires() {
    let mut state = GameState::new();
    play(&mut state, &["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"]);
    assert_eq!(None, state.en_passant_square());
    assert!(state.move_from_notation("e5d6").is_none());

    // undoing the quiet moves brings the opportunity back.
    state.undo_move();
    state.undo_move();
    assert_eq!(Some(sq("d6")), state.en_passant_square());
    assert!(state.move_from_notation("e5d6").unwrap().is_en_passant());
}

#[test]
fn promotion_round_trip() {
    let mut state = GameState::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    let before = snapshot(&state);
    let promote = state.move_from_notation("e7e8").unwrap();
    assert!(promote.is_promotion());

    state.apply_move(promote);
    assert_eq!(
        Some(Piece::new(PieceKind::Queen, Color::White)),
        state.piece_at(sq("e8"))
    );
    state.undo_move();
    assert_eq!(before, snapshot(&state));

    let knight = state.move_from_notation("e7e8n").unwrap();
    state.apply_move(knight);
    assert_eq!(
        Some(Piece::new(PieceKind::Knight, Color::White)),
        state.piece_at(sq("e8"))
    );
    state.undo_move();

    state.apply_move_promoting(promote, Some(PieceKind::Rook));
    assert_eq!(
        Some(Piece::new(PieceKind::Rook, Color::White)),
        state.piece_at(sq("e8"))
    );
    state.undo_move();
    assert_eq!(before, snapshot(&state));
}

#[test]
fn capture_promotion_round_trip() {
    let mut state = GameState::from_fen("1n2k3/P1P5/8/8/8/8/5p1p/3K2N1 w - - 0 1").unwrap();
    let before = snapshot(&state);
    let capture = state.move_from_notation("a7b8").unwrap();
    assert!(capture.is_promotion());
    assert!(capture.is_capture());
    state.apply_move(capture);
    assert_eq!(
        Some(Piece::new(PieceKind::Queen, Color::White)),
        state.piece_at(sq("b8"))
    );
    state.undo_move();
    assert_eq!(before, snapshot(&state));
}

#[test]
fn every_move_is_reversible() {
    for fen in POSITIONS {
        let mut state = GameState::from_fen(fen).unwrap();
        check_reversible(&mut state, 2);
    }
}

#[test]
fn no_move_leaves_king_in_check() {
    for fen in POSITIONS {
        let mut state = GameState::from_fen(fen).unwrap();
        check_sound(&mut state);
        for mov in state.legal_moves() {
            let mut child = state.make_move(mov);
            check_sound(&mut child);
        }
    }
}

#[test]
fn random_games_stay_consistent() {
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = GameState::new();
        let mut history = vec![snapshot(&state)];
        for _ in 0..80 {
            check_sound(&mut state);
            let moves = state.legal_moves();
            let mov = match moves.choose(&mut rng) {
                Some(&mov) => mov,
                None => break,
            };

            state.apply_move(mov);
            history.push(snapshot(&state));
        }

        // unwind the whole game.
        while let Some(expected) = history.pop() {
            assert_eq!(expected, snapshot(&state));
            state.undo_move();
        }

        assert!(state.move_log().is_empty());
    }
}

#[test]
fn undo_on_fresh_game_is_noop() {
    let mut state = GameState::new();
    let before = snapshot(&state);
    state.undo_move();
    assert_eq!(before, snapshot(&state));
}
