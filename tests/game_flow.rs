use std::collections::HashSet;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use quizwheel::bank::QuestionBank;
use quizwheel::engine::wheel::{QUESTION_SEGMENTS, rotation_for_segment, segment_at};
use quizwheel::error::QuizError;
use quizwheel::presenter::{Cue, PresenterEvent, RecordingPresenter};
use quizwheel::session::{GameSession, Outcome, Phase, PhasePayload, SessionSettings};

fn session(seed: u64) -> GameSession<RecordingPresenter> {
    let bank = QuestionBank::bundled().expect("bundled bank loads");
    GameSession::with_rng(
        bank,
        SessionSettings::default(),
        RecordingPresenter::default(),
        SmallRng::seed_from_u64(seed),
    )
}

fn full_spin(settings: &SessionSettings) -> Duration {
    settings.spin_duration + settings.settle_delay + settings.reveal_delay
}

#[test]
fn fire_safety_question_five_scores_fifty() {
    let mut game = session(1);
    game.load_question("Fire Safety", 5).unwrap();

    match game.presenter().last_payload() {
        Some(PhasePayload::Question {
            category,
            question_number,
            points,
            ..
        }) => {
            assert_eq!(category, "Fire Safety");
            assert_eq!(*question_number, 5);
            assert_eq!(*points, 50);
        }
        other => panic!("expected question payload, got {other:?}"),
    }

    let correct = game.current_question().unwrap().correct;
    let outcome = game.submit_answer(correct).unwrap();
    assert!(outcome.is_correct());
    assert_eq!(game.score(), 50);
    assert!(
        game.presenter()
            .events
            .contains(&PresenterEvent::Score(50))
    );
    assert!(game.presenter().cues().contains(&Cue::Correct));
}

#[test]
fn wheels_pick_matches_loaded_question() {
    for seed in 0..20 {
        let mut game = session(seed);
        let settings = *game.settings();
        assert!(game.begin_selection());
        game.advance(full_spin(&settings));

        assert_eq!(game.phase(), Phase::QuestionActive, "seed {seed}");
        let category_rotation = game.spinner().category.rotation;
        let question_rotation = game.spinner().question.rotation;
        let expected_category = game
            .bank()
            .category_at(segment_at(category_rotation, game.bank().category_count()))
            .unwrap()
            .to_string();
        let expected_number = segment_at(question_rotation, QUESTION_SEGMENTS) as u32 + 1;

        assert_eq!(game.current_category(), Some(expected_category.as_str()));
        assert_eq!(game.current_points(), expected_number * 10);
    }
}

#[test]
fn a_full_round_of_ten_spins() {
    let mut game = session(77);
    let settings = *game.settings();
    let mut expected_score = 0;

    for round in 0..10 {
        assert!(game.begin_selection(), "round {round}");
        game.advance(full_spin(&settings));
        let points = game.current_points();
        let correct = game.current_question().unwrap().correct;

        if round % 3 == 2 {
            // Let the clock run out.
            game.advance(Duration::from_secs(settings.timer.duration_secs as u64));
            assert!(matches!(
                game.phase(),
                Phase::Answered(Outcome::Timeout { .. })
            ));
        } else {
            game.submit_answer(correct).unwrap();
            expected_score += points;
        }
        game.advance(settings.celebration_delay);
        assert!(game.next_question());
    }

    assert_eq!(game.score(), expected_score);
    // Rounds 0,1 / 3,4 / 6,7 are pairs of correct answers.
    assert_eq!(game.presenter().celebrations(), 3);
}

#[test]
fn categories_do_not_repeat_until_exhausted() {
    let mut game = session(5);
    let count = game.bank().question_count("First Aid");
    let mut seen = HashSet::new();
    for _ in 0..count {
        game.load_question("First Aid", 1).unwrap();
        seen.insert(game.current_question().unwrap().id.clone());
        game.submit_answer(0);
        game.next_question();
    }
    assert_eq!(seen.len(), count);
    assert_eq!(game.bank().used_count("First Aid"), count);

    game.load_question("First Aid", 1).unwrap();
    assert_eq!(game.bank().used_count("First Aid"), 1);
}

#[test]
fn reset_mid_spin_discards_the_spin() {
    let mut game = session(3);
    let settings = *game.settings();
    game.load_question("Road Safety", 10).unwrap();
    let correct = game.current_question().unwrap().correct;
    game.submit_answer(correct).unwrap();
    game.next_question();

    game.begin_selection();
    game.advance(settings.spin_duration / 2);
    game.reset_game();
    game.presenter_mut().clear();

    game.advance(full_spin(&settings) * 3);
    assert_eq!(game.phase(), Phase::Idle);
    assert_eq!(game.score(), 0);
    assert!(game.presenter().events.is_empty());

    // A fresh spin still works after the reset.
    assert!(game.begin_selection());
    game.advance(full_spin(&settings));
    assert_eq!(game.phase(), Phase::QuestionActive);
}

#[test]
fn invalid_requests_are_rejected_without_state_change() {
    let mut game = session(8);
    assert_eq!(
        game.load_question("Fire Safety", 11),
        Err(QuizError::InvalidQuestionNumber(11))
    );
    assert_eq!(
        game.load_question("Astronomy", 1),
        Err(QuizError::UnknownCategory("Astronomy".to_string()))
    );
    assert!(game.submit_answer(0).is_none());
    assert!(!game.on_timeout());
    assert!(!game.next_question());
    assert_eq!(game.phase(), Phase::Idle);
}

#[test]
fn reference_angles_resolve_consistently() {
    assert_eq!(segment_at(0.0, 10), 0);
    assert_eq!(segment_at(36.0, 10), 9);
    for index in 0..10 {
        assert_eq!(segment_at(rotation_for_segment(index, 10) + 1800.0, 10), index);
    }
}
