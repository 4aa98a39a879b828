//! Scenario tests for the clock state machine: turn flow, expiry,
//! elimination, reordering, and undo.

use seatclock_core::{
    ClockConfig, ClockPolicy, ClockStateMachine, GameState, Notice, PlayerId, PlayerStatus,
};

// =========================================================================
// Helpers
// =========================================================================

fn machine(seats: usize, secs: u32, increment: u32) -> ClockStateMachine {
    ClockStateMachine::new(
        ClockConfig::new(seats, secs, increment),
        ClockPolicy::default(),
    )
}

fn pid(id: u32) -> PlayerId {
    PlayerId(id)
}

fn time_of(m: &ClockStateMachine, id: u32) -> u32 {
    m.state().player(pid(id)).map(|p| p.time_left).unwrap()
}

fn status_of(m: &ClockStateMachine, id: u32) -> PlayerStatus {
    m.state().player(pid(id)).map(|p| p.status).unwrap()
}

fn assert_round_trip(m: &mut ClockStateMachine, op: impl FnOnce(&mut ClockStateMachine)) {
    let before: GameState = m.state().clone();
    op(m);
    assert_ne!(m.state(), &before, "operation should change the state");
    m.undo();
    assert_eq!(m.state(), &before, "undo should restore the prior state");
}

// =========================================================================
// Tick expiry
// =========================================================================

#[test]
fn test_tick_exhaustion_hands_turn_on() {
    let mut m = machine(2, 1, 0);
    m.toggle_running();

    let outcome = m.tick();

    assert_eq!(outcome.notice, Some(Notice::OutOfTime(pid(0))));
    assert_eq!(time_of(&m, 0), 0);
    assert_eq!(status_of(&m, 0), PlayerStatus::OutOfTime);
    assert_eq!(m.state().current_player_index, 1);
    assert!(!m.is_running());
}

#[test]
fn test_tick_exhaustion_of_last_seat_keeps_index() {
    let mut m = machine(2, 1, 0);
    m.toggle_running();
    m.tick();
    m.toggle_running();
    m.tick();

    assert_eq!(status_of(&m, 1), PlayerStatus::OutOfTime);
    assert_eq!(m.state().current_player_index, 1);
    assert!(!m.is_running());
    assert!(!m.state().has_eligible());
}

#[test]
fn test_ticks_after_expiry_do_nothing() {
    let mut m = machine(1, 2, 0);
    m.toggle_running();
    m.tick();
    m.tick();
    let frozen = m.state().clone();
    assert!(!m.tick().changed);
    assert_eq!(m.state(), &frozen);
}

// =========================================================================
// Increment
// =========================================================================

#[test]
fn test_increment_applied_once_per_advance() {
    let mut m = machine(2, 10, 5);
    m.toggle_running();
    m.tick();
    m.advance_turn(0);

    assert_eq!(time_of(&m, 0), 14);
    assert_eq!(m.state().current_player_index, 1);

    m.advance_turn(1);
    assert_eq!(time_of(&m, 1), 15);
    assert_eq!(time_of(&m, 0), 14);
}

#[test]
fn test_increment_not_applied_on_expiry() {
    let mut m = machine(2, 2, 30);
    m.toggle_running();
    m.tick();
    m.tick();

    assert_eq!(time_of(&m, 0), 0);
    assert_eq!(status_of(&m, 0), PlayerStatus::OutOfTime);
}

#[test]
fn test_advance_skips_out_of_time_seats() {
    let mut m = machine(3, 60, 0);
    m.add_time(pid(1), -60);
    m.toggle_running();
    m.advance_turn(0);
    assert_eq!(m.state().current_player_index, 2);
    m.advance_turn(2);
    assert_eq!(m.state().current_player_index, 0);
}

// =========================================================================
// Manual time adjustment
// =========================================================================

#[test]
fn test_add_time_out_of_time_round_trip() {
    let mut m = machine(2, 45, 0);

    m.add_time(pid(1), -45);
    assert_eq!(time_of(&m, 1), 0);
    assert_eq!(status_of(&m, 1), PlayerStatus::OutOfTime);

    m.add_time(pid(1), 1);
    assert_eq!(time_of(&m, 1), 1);
    assert_eq!(status_of(&m, 1), PlayerStatus::Active);
}

#[test]
fn test_add_time_follows_id_after_reorder() {
    let mut m = machine(3, 60, 0);
    m.reorder(0, 2);
    m.add_time(pid(0), 30);
    assert_eq!(m.state().players[2].id, pid(0));
    assert_eq!(m.state().players[2].time_left, 90);
}

// =========================================================================
// Elimination
// =========================================================================

#[test]
fn test_eliminating_running_current_seat_pauses_and_passes() {
    let mut m = machine(3, 60, 0);
    m.toggle_running();

    let outcome = m.toggle_elimination(pid(0));

    assert_eq!(outcome.notice, None);
    assert!(!m.is_running());
    assert_eq!(m.state().current_player_index, 1);
    assert_eq!(status_of(&m, 0), PlayerStatus::Eliminated);
}

#[test]
fn test_elimination_with_no_survivors() {
    let mut m = machine(2, 60, 0);
    m.toggle_running();
    m.toggle_elimination(pid(0));
    assert_eq!(m.state().current_player_index, 1);

    m.toggle_running();
    let outcome = m.toggle_elimination(pid(1));

    assert_eq!(outcome.notice, Some(Notice::NoActivePlayersLeft));
    assert!(!m.is_running());
    assert_eq!(m.state().current_player_index, 1);
    assert!(m.state().check_invariants().is_ok());
}

#[test]
fn test_elimination_keeps_time() {
    let mut m = machine(2, 60, 0);
    m.add_time(pid(1), -20);
    m.toggle_elimination(pid(1));
    m.toggle_elimination(pid(1));
    assert_eq!(time_of(&m, 1), 40);
    assert_eq!(status_of(&m, 1), PlayerStatus::Active);
}

// =========================================================================
// Reorder
// =========================================================================

#[test]
fn test_reorder_forward_remaps_current() {
    let mut m = machine(3, 60, 0);
    m.toggle_running();
    m.advance_turn(0);
    assert_eq!(m.state().current_player_index, 1);

    m.reorder(0, 2);
    assert_eq!(m.state().current_player_index, 0);
    assert_eq!(m.state().current_player().map(|p| p.id), Some(pid(1)));
}

#[test]
fn test_reorder_backward_remaps_current() {
    let mut m = machine(3, 60, 0);
    m.toggle_running();
    m.advance_turn(0);

    m.reorder(2, 0);
    assert_eq!(m.state().current_player_index, 2);
    assert_eq!(m.state().current_player().map(|p| p.id), Some(pid(1)));
}

#[test]
fn test_reorder_leaves_index_on_destination_seat() {
    let mut m = machine(3, 60, 0);
    m.toggle_running();
    m.advance_turn(0);
    m.advance_turn(1);
    assert_eq!(m.state().current_player_index, 2);

    m.reorder(0, 2);
    assert_eq!(m.state().current_player_index, 2);
    assert_eq!(m.state().current_player().map(|p| p.id), Some(pid(0)));

    let mut m = machine(3, 60, 0);
    m.reorder(2, 0);
    assert_eq!(m.state().current_player_index, 0);
    assert_eq!(m.state().current_player().map(|p| p.id), Some(pid(2)));
}

#[test]
fn test_reorder_moving_current_seat() {
    let mut m = machine(4, 60, 0);
    m.reorder(0, 3);
    assert_eq!(m.state().current_player_index, 3);
    assert_eq!(m.state().current_player().map(|p| p.id), Some(pid(0)));
}

// =========================================================================
// Undo round trips
// =========================================================================

#[test]
fn test_undo_toggle_running() {
    let mut m = machine(2, 60, 0);
    assert_round_trip(&mut m, |m| {
        m.toggle_running();
    });
}

#[test]
fn test_undo_advance_turn() {
    let mut m = machine(3, 60, 7);
    m.toggle_running();
    m.tick();
    assert_round_trip(&mut m, |m| {
        m.advance_turn(0);
    });
}

#[test]
fn test_undo_resume_from_pause() {
    let mut m = machine(2, 60, 0);
    assert_round_trip(&mut m, |m| {
        m.resume_from_pause(0);
    });
}

#[test]
fn test_undo_add_time() {
    let mut m = machine(2, 60, 0);
    m.toggle_running();
    assert_round_trip(&mut m, |m| {
        m.add_time(pid(0), -60);
    });
}

#[test]
fn test_undo_toggle_elimination() {
    let mut m = machine(3, 60, 0);
    m.toggle_running();
    assert_round_trip(&mut m, |m| {
        m.toggle_elimination(pid(0));
    });
    m.toggle_elimination(pid(2));
    assert_round_trip(&mut m, |m| {
        m.toggle_elimination(pid(2));
    });
}

#[test]
fn test_undo_reorder() {
    let mut m = machine(4, 60, 0);
    m.toggle_running();
    m.advance_turn(0);
    assert_round_trip(&mut m, |m| {
        m.reorder(3, 0);
    });
}

#[test]
fn test_undo_rename_all() {
    let mut m = machine(2, 60, 0);
    let mut draft = m.rename_draft();
    draft.set(pid(1), "Lin");
    assert_round_trip(&mut m, |m| {
        m.rename_all(&draft);
    });
}

#[test]
fn test_undo_after_tick_restores_pre_operation_time() {
    let mut m = machine(2, 60, 0);
    m.toggle_running();
    m.tick();
    m.tick();
    m.undo();
    assert_eq!(time_of(&m, 0), 60);
    assert!(!m.is_running());
}

#[test]
fn test_new_game_clears_undo() {
    let mut m = machine(2, 60, 0);
    m.toggle_running();
    m.tick();
    m.new_game(true);
    assert_eq!(m.history_len(), 0);
    assert!(!m.undo().changed);
    assert_eq!(time_of(&m, 0), 60);
}
