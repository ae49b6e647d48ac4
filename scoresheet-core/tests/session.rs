//! Game Session
//!
//! Recording, taking back and editing moves, and checking that the recorded notation
//! and the current position never disagree.

use rand::prelude::*;

use scoresheet_core::coretypes::Color::*;
use scoresheet_core::san;
use scoresheet_core::*;

fn play(session: &mut GameSession, sans: &[&str]) {
    for san in sans {
        let color = session.side_to_move();
        session.propose_move(san, color).unwrap();
    }
}

/// Position reached by replaying the scoresheet from the start.
fn replayed_position(session: &GameSession) -> Position {
    let mut position = *session.initial_position();
    let halves = session
        .move_records()
        .iter()
        .flat_map(|record| std::iter::once(record.white()).chain(record.black()))
        .chain(session.pending_white_san());

    for written in halves {
        let move_ = san::parse(written, &position).unwrap();
        position = position.apply_move(move_);
    }
    position
}

fn assert_consistent(session: &GameSession) {
    assert_eq!(&replayed_position(session), session.position());
    let plies = session.position_history().len() - 1;
    let written = session.move_records().iter().map(|r| 1 + r.is_complete() as usize).sum::<usize>()
        + session.has_pending_white_move() as usize;
    assert_eq!(plies, written);
}

#[test]
fn e4_e5_completes_a_record() {
    let mut session = GameSession::new();
    session.propose_move("e4", White).unwrap();
    session.propose_move("e5", Black).unwrap();
    assert_eq!(session.move_records(), &[MoveRecord::new("e4", Some("e5"))]);
    assert_eq!(session.current_status(), GameStatus::Normal);
    assert_eq!(session.current_status().to_string(), "");
}

#[test]
fn scholars_mate_is_checkmate() {
    let mut session = GameSession::new();
    play(&mut session, &["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7"]);
    assert_eq!(session.current_status(), GameStatus::Checkmate);
    assert!(session.is_game_over());
}

#[test]
fn blocked_pawn_is_illegal_and_changes_nothing() {
    let mut session = GameSession::new();
    session.propose_move("e4", White).unwrap();
    let before = session.clone();
    assert_eq!(session.propose_move("e4", Black), Err(MoveError::IllegalMove));
    assert_eq!(session, before);
}

#[test]
fn undo_of_pending_white_restores_start() {
    let mut session = GameSession::new();
    session.propose_move("e4", White).unwrap();
    assert!(session.undo_half_move());
    assert_eq!(session.pending_white_san(), None);
    assert_eq!(session.position(), session.initial_position());
}

#[test]
fn edit_white_move_and_reject_malformed_edit() {
    let mut session = GameSession::new();
    play(&mut session, &["e4", "e5", "Nf3", "Nc6"]);
    session.edit_move(2, White, "d4").unwrap();
    assert_eq!(session.move_records()[1], MoveRecord::new("d4", Some("Nc6")));
    assert_consistent(&session);

    let before = session.clone();
    assert!(matches!(
        session.edit_move(1, White, "e9"),
        Err(MoveError::MalformedNotation(_))
    ));
    assert_eq!(session, before);
}

#[test]
fn lowercase_piece_names_correction() {
    let mut session = GameSession::new();
    match session.propose_move("nf3", White) {
        Err(MoveError::MalformedNotation(message)) => assert!(message.contains("Nf3"), "{message}"),
        other => panic!("expected malformed notation, got {other:?}"),
    }
    assert!(session.move_records().is_empty());
    assert_eq!(session.pending_white_san(), None);
}

#[test]
fn every_error_leaves_session_unchanged() {
    let mut session = GameSession::new();
    play(&mut session, &["e4", "e5", "Nf3"]);
    let before = session.clone();

    let errors = [
        session.propose_move("", Black),
        session.propose_move("Nc3", White),
        session.propose_move("Ke6", Black),
        session.propose_move("Nd4", Black),
        session.propose_move("Q", Black),
        session.edit_move(5, White, "d4"),
        session.edit_move(2, Black, "Nc6"),
        session.edit_move(1, Black, "e4"),
    ];
    assert_eq!(
        errors,
        [
            Err(MoveError::EmptyInput),
            Err(MoveError::WrongTurn { expected: Black }),
            Err(MoveError::IllegalMove),
            Err(MoveError::IllegalMove),
            errors[4].clone(),
            Err(MoveError::InvalidIndex { number: 5 }),
            Err(MoveError::NoBlackMoveToEdit),
            Err(MoveError::IllegalMove),
        ]
    );
    assert!(matches!(errors[4], Err(MoveError::MalformedNotation(_))));
    assert_eq!(session, before);
}

#[test]
fn edit_that_breaks_a_later_move_is_rejected() {
    let mut session = GameSession::new();
    play(&mut session, &["e4", "d5", "exd5", "Qxd5"]);
    let before = session.clone();

    // Without the exchange on d5, the queen cannot capture there.
    assert_eq!(
        session.edit_move(2, White, "Nc3"),
        Err(MoveError::InvalidatesLaterMove {
            number: 2,
            color: Black,
            reason: san::NotationError::IllegalMove,
        })
    );
    assert_eq!(session, before);
}

#[test]
fn finalize_then_undo() {
    let mut session = GameSession::new();
    play(&mut session, &["e4", "e5", "Qh5"]);
    session.finalize_pending();
    assert_eq!(session.move_count(), 2);
    assert_eq!(session.move_records()[1], MoveRecord::new("Qh5", None));
    assert_eq!(session.pending_white_san(), None);
    assert_consistent(&session);

    session.finalize_pending();
    assert_eq!(session.move_count(), 2);

    assert!(session.undo_half_move());
    assert_eq!(session.move_count(), 1);
    assert_consistent(&session);
}

#[test]
fn set_result_any_time() {
    let mut session = GameSession::new();
    session.propose_move("f3", White).unwrap();
    session.set_result(GameResult::BlackWins);
    assert_eq!(session.state(), SessionState::Finished(GameResult::BlackWins));
    assert_eq!(session.result().to_string(), "0-1");
    session.set_result(GameResult::Unknown);
    assert_eq!(session.state(), SessionState::InProgress);
}

/// Random sequences of moves, take backs and edits keep the session consistent,
/// and a move followed by its take back restores the session.
#[test]
fn random_walk_stays_consistent() {
    let mut rng = StdRng::seed_from_u64(0x5c0e);

    for _game in 0..8 {
        let mut session = GameSession::new();
        for _step in 0..60 {
            let roll: u8 = rng.gen_range(0..10);
            if roll < 7 {
                let legal = session.legal_moves_san();
                let Some(chosen) = legal.choose(&mut rng) else {
                    break;
                };
                let color = session.side_to_move();
                let before = session.clone();
                session.propose_move(chosen, color).unwrap();

                let mut undone = session.clone();
                assert!(undone.undo_half_move());
                assert_eq!(undone.move_records(), before.move_records());
                assert_eq!(undone.pending_white_san(), before.pending_white_san());
                assert_eq!(undone.position(), before.position());
                assert_eq!(undone.repetition_count(), before.repetition_count());
            } else if roll < 8 {
                session.undo_half_move();
            } else {
                edit_random_move(&mut session, &mut rng);
            }
            assert_consistent(&session);
        }
    }
}

/// Replaces a random half-move with a random legal alternative for its position.
fn edit_random_move(session: &mut GameSession, rng: &mut StdRng) {
    let plies = session.position_history().len() - 1;
    if plies == 0 {
        return;
    }
    let ply = rng.gen_range(0..plies);
    let number = ply / 2 + 1;
    let color = if ply % 2 == 0 { White } else { Black };
    let position = session.position_history()[ply];
    let alternatives = position.legal_moves();
    let Some(&replacement) = alternatives.choose(rng) else {
        return;
    };
    let written = san::encode(replacement, &position);

    let before = session.clone();
    match session.edit_move(number, color, &written) {
        Ok(()) => {
            let edited = match (session.move_records().get(number - 1), color) {
                (Some(record), White) => record.white().to_string(),
                (Some(record), Black) => record.black().unwrap_or_default().to_string(),
                (None, _) => session.pending_white_san().unwrap_or_default().to_string(),
            };
            assert_eq!(edited, written);
        }
        Err(MoveError::InvalidatesLaterMove { number: later, .. }) => {
            assert!(later >= number);
            assert_eq!(*session, before);
        }
        Err(other) => panic!("edit to a legal move failed with {other:?}"),
    }
}
