//! Optimistic vote prediction.
//!
//! Mirrors what the vote endpoint does with a vote so the widget can show the
//! outcome before the round trip completes. Pure: no DOM, no network.

use shared_types::{ActiveSide, VoteIntent, VoteWidgetState};

/// Predicts the state after `intent` is applied to `current`.
///
/// Every decrement saturates at zero independently.
pub fn predict(current: VoteWidgetState, intent: VoteIntent) -> VoteWidgetState {
    let VoteWidgetState {
        mut like_count,
        mut dislike_count,
        active_side,
    } = current;

    match (intent, active_side) {
        (VoteIntent::LikeOn, ActiveSide::Like)
        | (VoteIntent::DislikeOn, ActiveSide::Dislike)
        | (VoteIntent::RemoveVote, ActiveSide::None) => current,

        (VoteIntent::LikeOn, previous) => {
            if previous == ActiveSide::Dislike {
                dislike_count = dislike_count.saturating_sub(1);
            }
            VoteWidgetState::new(like_count.saturating_add(1), dislike_count, ActiveSide::Like)
        }
        (VoteIntent::DislikeOn, previous) => {
            if previous == ActiveSide::Like {
                like_count = like_count.saturating_sub(1);
            }
            VoteWidgetState::new(
                like_count,
                dislike_count.saturating_add(1),
                ActiveSide::Dislike,
            )
        }

        (VoteIntent::RemoveVote, ActiveSide::Like) => {
            VoteWidgetState::new(like_count.saturating_sub(1), dislike_count, ActiveSide::None)
        }
        (VoteIntent::RemoveVote, ActiveSide::Dislike) => {
            VoteWidgetState::new(like_count, dislike_count.saturating_sub(1), ActiveSide::None)
        }
    }
}
