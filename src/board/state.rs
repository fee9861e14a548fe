//! Finite states of the board.

use serde::{Deserialize, Serialize};

/// Which kinds of move are legal right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardState {
    /// Free placement, no turn discipline.
    Puzzle,
    /// Turn-bound play, nothing staged yet.
    Play,
    /// A move is staged; `Done` commits it.
    Confirm,
    /// The mover has offered resignation; `Done` ends the game.
    Resign,
    GameOver,
    /// The position repeated too often; `Done` accepts the draw.
    DrawPending,
}

impl BoardState {
    /// Stable number mixed into the digest. Never reorder.
    #[must_use]
    pub const fn ordinal(self) -> u64 {
        match self {
            BoardState::Puzzle => 1,
            BoardState::Play => 2,
            BoardState::Confirm => 3,
            BoardState::Resign => 4,
            BoardState::GameOver => 5,
            BoardState::DrawPending => 6,
        }
    }

    /// States in which `Done` is the expected next move.
    #[must_use]
    pub const fn is_done_state(self) -> bool {
        matches!(
            self,
            BoardState::Confirm | BoardState::Resign | BoardState::DrawPending
        )
    }

    /// States in which chips may be picked up.
    #[must_use]
    pub const fn allows_pick(self) -> bool {
        matches!(
            self,
            BoardState::Puzzle | BoardState::Play | BoardState::Confirm | BoardState::DrawPending
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_distinct() {
        let all = [
            BoardState::Puzzle,
            BoardState::Play,
            BoardState::Confirm,
            BoardState::Resign,
            BoardState::GameOver,
            BoardState::DrawPending,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.ordinal(), b.ordinal());
            }
        }
    }

    #[test]
    fn test_done_states() {
        assert!(BoardState::Confirm.is_done_state());
        assert!(BoardState::DrawPending.is_done_state());
        assert!(!BoardState::Play.is_done_state());
        assert!(!BoardState::GameOver.allows_pick());
    }
}
