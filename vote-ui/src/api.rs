use async_trait::async_trait;
use gloo_net::http::Request;
use shared_types::{ActiveSide, PostId, VoteAction, VoteIntent, VoteResponse, VoteWidgetState};

use crate::config::WidgetConfig;

const GENERIC_FAILURE: &str = "Failed to process your vote. Please try again.";
const GENERIC_REJECTION: &str = "An error occurred";

/// Everything that can go wrong with a vote.
///
/// Apart from `MissingToken`, which aborts before anything is sent, every
/// variant is handled the same way: a notice plus a reload.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum VoteError {
    #[error("Anti-forgery token not found")]
    MissingToken,

    #[error("Request failed: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Vote rejected: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),
}

impl VoteError {
    pub fn is_precondition(&self) -> bool {
        matches!(self, VoteError::MissingToken)
    }

    /// Text shown to the user. Server-provided rejection messages pass through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            VoteError::MissingToken => "Error: CSRF token not found".to_string(),
            VoteError::Rejected(Some(message)) if !message.is_empty() => message.clone(),
            VoteError::Rejected(_) => GENERIC_REJECTION.to_string(),
            VoteError::Network(_) | VoteError::Http(_) | VoteError::Malformed(_) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}

/// Server-confirmed outcome of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedVote {
    pub like_count: u32,
    pub dislike_count: u32,
    pub user_vote: Option<bool>,
    pub action: Option<VoteAction>,
}

impl ConfirmedVote {
    pub fn state(&self) -> VoteWidgetState {
        VoteWidgetState::new(
            self.like_count,
            self.dislike_count,
            ActiveSide::from_user_vote(self.user_vote),
        )
    }
}

/// Sends a vote and returns the server's view of the post.
#[async_trait(?Send)]
pub trait VoteTransport {
    async fn submit(
        &self,
        post_id: &PostId,
        intent: VoteIntent,
        token: &str,
    ) -> Result<ConfirmedVote, VoteError>;
}

/// `POST /like/{post_id}/` over fetch.
pub struct HttpVoteClient {
    config: WidgetConfig,
}

impl HttpVoteClient {
    pub fn new(config: WidgetConfig) -> Self {
        Self { config }
    }
}

#[async_trait(?Send)]
impl VoteTransport for HttpVoteClient {
    async fn submit(
        &self,
        post_id: &PostId,
        intent: VoteIntent,
        token: &str,
    ) -> Result<ConfirmedVote, VoteError> {
        let url = self.config.vote_url(post_id);

        let response = Request::post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header(&self.config.token_header, token)
            .header("X-Requested-With", "XMLHttpRequest")
            .body(form_body(intent))
            .map_err(|e| VoteError::Network(format!("Failed to build request: {e}")))?
            .send()
            .await
            .map_err(|e| VoteError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(VoteError::Http(response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| VoteError::Network(format!("Failed to read body: {e}")))?;

        parse_vote_response(&body)
    }
}

/// Form-encoded request body. The flag values need no escaping.
pub fn form_body(intent: VoteIntent) -> String {
    format!("is_like={}", intent.form_value())
}

pub fn parse_vote_response(body: &str) -> Result<ConfirmedVote, VoteError> {
    let data: VoteResponse =
        serde_json::from_str(body).map_err(|e| VoteError::Malformed(e.to_string()))?;

    if !data.success {
        return Err(VoteError::Rejected(data.error));
    }

    match (data.like_count, data.dislike_count) {
        (Some(like_count), Some(dislike_count)) => Ok(ConfirmedVote {
            like_count,
            dislike_count,
            user_vote: data.user_vote,
            action: data.action,
        }),
        _ => Err(VoteError::Malformed(
            "success response without like/dislike counts".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_body_carries_tri_state_flag() {
        assert_eq!(form_body(VoteIntent::LikeOn), "is_like=true");
        assert_eq!(form_body(VoteIntent::DislikeOn), "is_like=false");
        assert_eq!(form_body(VoteIntent::RemoveVote), "is_like=");
    }

    #[test]
    fn parses_confirmed_vote() {
        let confirmed = parse_vote_response(
            r#"{"success":true,"action":"updated","like_count":2,"dislike_count":2,"user_vote":false}"#,
        )
        .unwrap();

        assert_eq!(confirmed.action, Some(VoteAction::Updated));
        assert_eq!(
            confirmed.state(),
            VoteWidgetState::new(2, 2, ActiveSide::Dislike)
        );
    }

    #[test]
    fn removed_vote_maps_to_no_active_side() {
        let confirmed = parse_vote_response(
            r#"{"success":true,"like_count":3,"dislike_count":1,"user_vote":null}"#,
        )
        .unwrap();
        assert_eq!(confirmed.state().active_side, ActiveSide::None);
    }

    #[test]
    fn application_failure_keeps_server_message() {
        let err = parse_vote_response(r#"{"success":false,"error":"already voted"}"#).unwrap_err();
        assert_eq!(err, VoteError::Rejected(Some("already voted".to_string())));
        assert_eq!(err.user_message(), "already voted");
    }

    #[test]
    fn application_failure_without_message() {
        let err = parse_vote_response(r#"{"success":false}"#).unwrap_err();
        assert_eq!(err.user_message(), "An error occurred");
        assert_eq!(
            VoteError::Rejected(Some(String::new())).user_message(),
            "An error occurred"
        );
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_vote_response("<html>Server Error</html>").unwrap_err();
        assert!(matches!(err, VoteError::Malformed(_)));
        assert_eq!(
            err.user_message(),
            "Failed to process your vote. Please try again."
        );
    }

    #[test]
    fn success_without_counts_is_malformed() {
        let err = parse_vote_response(r#"{"success":true,"user_vote":true}"#).unwrap_err();
        assert!(matches!(err, VoteError::Malformed(_)));
    }

    #[test]
    fn only_missing_token_is_a_precondition() {
        assert!(VoteError::MissingToken.is_precondition());
        assert!(!VoteError::Http(500).is_precondition());
        assert!(!VoteError::Network("offline".into()).is_precondition());
        assert!(!VoteError::Rejected(None).is_precondition());
        assert_eq!(
            VoteError::MissingToken.user_message(),
            "Error: CSRF token not found"
        );
    }
}
