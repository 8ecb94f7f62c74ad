//! Shared types between the vote widget and the vote endpoint
//!
//! These types are used by both:
//! - The page widget (WASM)
//! - Any server speaking the `/like/{post_id}/` protocol (native Rust)
//!
//! Serializable with serde for form/JSON over HTTP

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// ============================================================================
// Identifiers
// ============================================================================

/// Post identifier, taken verbatim from a control's `data-post-id`.
/// Unique per like/dislike pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[ts(export, export_to = "../../vote-ui/src/types/generated.ts")]
pub struct PostId(pub String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ============================================================================
// Vote Model
// ============================================================================

/// Which of the two controls of a pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../../vote-ui/src/types/generated.ts")]
#[serde(rename_all = "snake_case")]
pub enum VoteSide {
    Like,
    Dislike,
}

/// The side the current user has active, if any.
/// A tri-state, so both sides can never be active at once.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../../vote-ui/src/types/generated.ts")]
#[serde(rename_all = "snake_case")]
pub enum ActiveSide {
    #[default]
    None,
    Like,
    Dislike,
}

impl ActiveSide {
    /// Maps the wire tri-state (`true` like, `false` dislike, `null` none).
    pub fn from_user_vote(user_vote: Option<bool>) -> Self {
        match user_vote {
            Some(true) => Self::Like,
            Some(false) => Self::Dislike,
            None => Self::None,
        }
    }

    pub fn to_user_vote(self) -> Option<bool> {
        match self {
            Self::Like => Some(true),
            Self::Dislike => Some(false),
            Self::None => None,
        }
    }

    /// Parses the pre-rendered `data-user-vote` hint. Anything other than
    /// `"true"`/`"false"` means no prior vote.
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint.map(str::trim) {
            Some("true") => Self::Like,
            Some("false") => Self::Dislike,
            _ => Self::None,
        }
    }

    pub fn is(self, side: VoteSide) -> bool {
        matches!(
            (self, side),
            (Self::Like, VoteSide::Like) | (Self::Dislike, VoteSide::Dislike)
        )
    }
}

impl From<VoteSide> for ActiveSide {
    fn from(side: VoteSide) -> Self {
        match side {
            VoteSide::Like => Self::Like,
            VoteSide::Dislike => Self::Dislike,
        }
    }
}

/// Per-post vote pair state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../../vote-ui/src/types/generated.ts")]
pub struct VoteWidgetState {
    pub like_count: u32,
    pub dislike_count: u32,
    pub active_side: ActiveSide,
}

impl VoteWidgetState {
    pub fn new(like_count: u32, dislike_count: u32, active_side: ActiveSide) -> Self {
        Self {
            like_count,
            dislike_count,
            active_side,
        }
    }
}

/// Normalized action derived from a click
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../../vote-ui/src/types/generated.ts")]
#[serde(rename_all = "snake_case")]
pub enum VoteIntent {
    LikeOn,
    DislikeOn,
    RemoveVote,
}

impl VoteIntent {
    /// Clicking the already-active side removes the vote; clicking the
    /// other side turns it on (implicitly dropping the previous side).
    pub fn from_click(clicked: VoteSide, active: ActiveSide) -> Self {
        if active.is(clicked) {
            return Self::RemoveVote;
        }
        match clicked {
            VoteSide::Like => Self::LikeOn,
            VoteSide::Dislike => Self::DislikeOn,
        }
    }

    /// Value of the `is_like` form field.
    pub fn form_value(self) -> &'static str {
        match self {
            Self::LikeOn => "true",
            Self::DislikeOn => "false",
            Self::RemoveVote => "",
        }
    }
}

// ============================================================================
// Wire Protocol
// ============================================================================

/// What the server did with the vote, echoed for diagnostics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../../vote-ui/src/types/generated.ts")]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    Added,
    Updated,
    Removed,
}

/// JSON body returned by `POST /like/{post_id}/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../../vote-ui/src/types/generated.ts")]
pub struct VoteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<VoteAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dislike_count: Option<u32>,
    /// `true` like, `false` dislike, `null` no vote
    #[serde(default)]
    pub user_vote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
