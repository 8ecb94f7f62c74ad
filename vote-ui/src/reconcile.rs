//! Optimistic vote reconciliation.
//!
//! Per post the controller cycles `Idle -> Locked -> Idle`. A click while
//! locked is dropped, never queued. The in-memory `VoteWidgetState` is the
//! canonical model; the DOM is only rendered to.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use dioxus_logger::tracing::{debug, info, warn};
use shared_types::{PostId, VoteIntent, VoteSide, VoteWidgetState};

use crate::api::{VoteError, VoteTransport};
use crate::buttons::VoteRenderer;
use crate::engine::predict;
use crate::interop::PageReloader;
use crate::notify::{confirmation_notice, Notifier, Severity};
use crate::token::TokenSource;

/// What happened to a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A vote for this post is already in flight, or the post is unknown.
    Ignored,
    /// Aborted before any request was sent.
    Rejected(VoteError),
    /// The server accepted the vote. `corrected` is set when its state
    /// differed from the prediction and was re-rendered.
    Confirmed {
        state: VoteWidgetState,
        corrected: bool,
    },
    /// The request failed; a reload has been scheduled.
    Failed(VoteError),
}

pub struct ReconciliationController {
    renderer: Box<dyn VoteRenderer>,
    transport: Box<dyn VoteTransport>,
    tokens: Box<dyn TokenSource>,
    notifier: Box<dyn Notifier>,
    reloader: Box<dyn PageReloader>,
    reload_delay_ms: u32,
    states: RefCell<HashMap<PostId, VoteWidgetState>>,
    locks: RefCell<HashSet<PostId>>,
}

/// Held for the duration of a vote; dropping it unlocks and re-enables the post.
struct PostLock<'a> {
    controller: &'a ReconciliationController,
    post_id: PostId,
}

impl Drop for PostLock<'_> {
    fn drop(&mut self) {
        self.controller.locks.borrow_mut().remove(&self.post_id);
        self.controller.renderer.set_enabled(&self.post_id, true);
    }
}

impl ReconciliationController {
    pub fn new(
        renderer: Box<dyn VoteRenderer>,
        transport: Box<dyn VoteTransport>,
        tokens: Box<dyn TokenSource>,
        notifier: Box<dyn Notifier>,
        reloader: Box<dyn PageReloader>,
        reload_delay_ms: u32,
    ) -> Self {
        Self {
            renderer,
            transport,
            tokens,
            notifier,
            reloader,
            reload_delay_ms,
            states: RefCell::new(HashMap::new()),
            locks: RefCell::new(HashSet::new()),
        }
    }

    /// Builds the post's initial state from the server-rendered page and renders it.
    pub fn register_post(&self, post_id: PostId) -> VoteWidgetState {
        let (like_count, dislike_count) = self.renderer.read_counts(&post_id);
        let active_side = self.renderer.read_user_prior_vote(&post_id);
        let state = VoteWidgetState::new(like_count, dislike_count, active_side);

        debug!(%post_id, ?state, "Registered vote widget");
        self.commit(&post_id, state);
        state
    }

    pub fn state(&self, post_id: &PostId) -> Option<VoteWidgetState> {
        self.states.borrow().get(post_id).copied()
    }

    pub fn is_locked(&self, post_id: &PostId) -> bool {
        self.locks.borrow().contains(post_id)
    }

    pub async fn handle_click(&self, post_id: &PostId, clicked: VoteSide) -> ClickOutcome {
        if self.is_locked(post_id) {
            debug!(%post_id, "Vote in flight, ignoring click");
            return ClickOutcome::Ignored;
        }

        let Some(current) = self.state(post_id) else {
            warn!(%post_id, "Click on unregistered post");
            return ClickOutcome::Ignored;
        };

        let intent = VoteIntent::from_click(clicked, current.active_side);

        let Some(token) = self.tokens.token() else {
            let err = VoteError::MissingToken;
            self.report_failure(post_id, &err);
            return ClickOutcome::Rejected(err);
        };

        let _lock = self.lock(post_id);

        let predicted = predict(current, intent);
        debug!(%post_id, ?intent, ?current, ?predicted, "Optimistic update");
        self.commit(post_id, predicted);

        match self.transport.submit(post_id, intent, &token).await {
            Ok(confirmed) => {
                let authoritative = confirmed.state();
                let corrected = authoritative != predicted;
                if corrected {
                    info!(
                        %post_id,
                        ?predicted,
                        ?authoritative,
                        action = ?confirmed.action,
                        "Server state differs from prediction, re-rendering"
                    );
                    self.commit(post_id, authoritative);
                }

                let (message, severity) = confirmation_notice(authoritative.active_side);
                self.notifier.notify(&message, severity);

                ClickOutcome::Confirmed {
                    state: authoritative,
                    corrected,
                }
            }
            Err(err) => {
                self.report_failure(post_id, &err);
                ClickOutcome::Failed(err)
            }
        }
    }

    /// Notifies the user. Failures after the request was sent also reload the
    /// page, since only the server knows what was committed.
    fn report_failure(&self, post_id: &PostId, err: &VoteError) {
        self.notifier.notify(&err.user_message(), Severity::Danger);

        if err.is_precondition() {
            warn!(%post_id, error = %err, "Vote not sent");
            return;
        }

        warn!(
            %post_id,
            error = %err,
            delay_ms = self.reload_delay_ms,
            "Vote failed, reloading page"
        );
        self.reloader.schedule_reload(self.reload_delay_ms);
    }

    fn lock(&self, post_id: &PostId) -> PostLock<'_> {
        self.locks.borrow_mut().insert(post_id.clone());
        self.renderer.set_enabled(post_id, false);
        PostLock {
            controller: self,
            post_id: post_id.clone(),
        }
    }

    fn commit(&self, post_id: &PostId, state: VoteWidgetState) {
        self.states.borrow_mut().insert(post_id.clone(), state);
        self.renderer.render(post_id, &state);
    }
}
