//! Seat arithmetic: who plays next, and where the turn marker goes when
//! seats move.

use crate::Player;

/// Finds the next seat that can take the turn.
///
/// Scans cyclically starting at `(current + 1) % len` for up to `len`
/// seats, so the last seat looked at is `current` itself. Returns the
/// first eligible seat, or `None` when nobody can play.
pub fn next_active(players: &[Player], current: usize) -> Option<usize> {
    let len = players.len();
    if len == 0 {
        return None;
    }
    (1..=len)
        .map(|step| (current + step) % len)
        .find(|&seat| players[seat].is_eligible())
}

/// Where the turn marker ends up after the seat at `from` is moved to
/// `to` (remove, then insert).
///
/// - a marker on the moved seat lands on `to`;
/// - moving forward, a marker strictly between `from` and `to` slides
///   back one;
/// - moving backward, a marker strictly between `to` and `from` slides
///   forward one;
/// - everything else, including a marker sitting on `to`, stays put.
pub fn remap_after_move(current: usize, from: usize, to: usize) -> usize {
    if current == from {
        to
    } else if from < to && current > from && current < to {
        current - 1
    } else if to < from && current > to && current < from {
        current + 1
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlayerId, PlayerStatus};

    fn table(eligible: &[bool]) -> Vec<Player> {
        eligible
            .iter()
            .enumerate()
            .map(|(seat, &ok)| {
                let mut p = Player::new(PlayerId(seat as u32), 60);
                if !ok {
                    p.status = PlayerStatus::Eliminated;
                }
                p
            })
            .collect()
    }

    #[test]
    fn test_next_active_picks_following_seat() {
        let players = table(&[true, true, true]);
        assert_eq!(next_active(&players, 0), Some(1));
        assert_eq!(next_active(&players, 2), Some(0));
    }

    #[test]
    fn test_next_active_skips_ineligible() {
        let players = table(&[true, false, false, true]);
        assert_eq!(next_active(&players, 0), Some(3));
        assert_eq!(next_active(&players, 3), Some(0));
    }

    #[test]
    fn test_next_active_comes_back_to_current_last() {
        let players = table(&[false, true, false]);
        assert_eq!(next_active(&players, 1), Some(1));
    }

    #[test]
    fn test_next_active_none_when_nobody_eligible() {
        let players = table(&[false, false]);
        assert_eq!(next_active(&players, 0), None);
        assert_eq!(next_active(&[], 0), None);
    }

    #[test]
    fn test_next_active_skips_zero_time() {
        let mut players = table(&[true, true, true]);
        players[1].time_left = 0;
        players[1].status = PlayerStatus::OutOfTime;
        assert_eq!(next_active(&players, 0), Some(2));
    }

    #[test]
    fn test_remap_moving_seat_forward() {
        // 3 seats, turn on seat 1, move seat 0 to seat 2.
        assert_eq!(remap_after_move(1, 0, 2), 0);
        assert_eq!(remap_after_move(0, 0, 2), 2);
    }

    #[test]
    fn test_remap_moving_seat_backward() {
        // 3 seats, turn on seat 1, move seat 2 to seat 0.
        assert_eq!(remap_after_move(1, 2, 0), 2);
        assert_eq!(remap_after_move(2, 2, 0), 0);
    }

    #[test]
    fn test_remap_marker_on_destination_stays() {
        assert_eq!(remap_after_move(2, 0, 2), 2);
        assert_eq!(remap_after_move(0, 2, 0), 0);
        assert_eq!(remap_after_move(3, 1, 3), 3);
        assert_eq!(remap_after_move(1, 3, 1), 1);
    }

    #[test]
    fn test_remap_outside_range_unchanged() {
        assert_eq!(remap_after_move(0, 1, 3), 0);
        assert_eq!(remap_after_move(4, 1, 3), 4);
        assert_eq!(remap_after_move(4, 3, 1), 4);
    }

    #[test]
    fn test_remap_follows_player_strictly_inside_move() {
        for from in 0..5usize {
            for to in 0..5usize {
                for current in 0..5usize {
                    if current != from && current == to {
                        continue;
                    }
                    let mut seats: Vec<usize> = (0..5).collect();
                    let marked = seats[current];
                    let moved = seats.remove(from);
                    seats.insert(to, moved);
                    let remapped = remap_after_move(current, from, to);
                    assert_eq!(seats[remapped], marked, "from {from} to {to} current {current}");
                }
            }
        }
    }
}
