use std::collections::BTreeSet;
use std::rc::Rc;

use dioxus_logger::tracing::info;
use shared_types::PostId;

use crate::api::HttpVoteClient;
use crate::buttons::DomButtons;
use crate::config::WidgetConfig;
use crate::interop::{bind_vote_button, control_identity, vote_controls, LocationReloader};
use crate::notify::ToastNotifier;
use crate::reconcile::ReconciliationController;
use crate::token::DomTokenSource;

/// Wires every vote pair on the page to a shared controller.
pub fn mount(config: WidgetConfig) -> Rc<ReconciliationController> {
    let controller = Rc::new(ReconciliationController::new(
        Box::new(DomButtons::new()),
        Box::new(HttpVoteClient::new(config.clone())),
        Box::new(DomTokenSource::new(
            config.token_field.clone(),
            config.token_cookie.clone(),
        )),
        Box::new(ToastNotifier::new(
            config.notice_lifetime_ms,
            config.notice_fade_ms,
        )),
        Box::new(LocationReloader),
        config.reload_delay_ms,
    ));

    let controls: Vec<_> = vote_controls()
        .into_iter()
        .filter_map(|control| control_identity(&control).map(|identity| (control, identity)))
        .collect();

    let posts: BTreeSet<PostId> = controls
        .iter()
        .map(|(_, (post_id, _))| post_id.clone())
        .collect();
    for post_id in &posts {
        controller.register_post(post_id.clone());
    }

    for (control, (post_id, side)) in controls {
        bind_vote_button(&control, post_id, side, controller.clone());
    }

    info!(posts = posts.len(), "Vote widgets mounted");
    controller
}
