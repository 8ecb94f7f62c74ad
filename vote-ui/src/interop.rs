use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use shared_types::{PostId, VoteSide};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event, MouseEvent};

use crate::buttons::{DISLIKE_BUTTON, LIKE_BUTTON};
use crate::reconcile::ReconciliationController;

/// Full page reload, the recovery path after a failed vote.
pub trait PageReloader {
    fn schedule_reload(&self, delay_ms: u32);
}

pub struct LocationReloader;

impl PageReloader for LocationReloader {
    fn schedule_reload(&self, delay_ms: u32) {
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(delay_ms).await;
            if let Some(window) = window() {
                if let Err(e) = window.location().reload() {
                    log::error!("Page reload failed: {:?}", e);
                }
            }
        });
    }
}

/// Runs `f` once the DOM is parsed, immediately if it already is.
pub fn on_dom_ready<F>(f: F)
where
    F: FnOnce() + 'static,
{
    let Some(document) = window().and_then(|w| w.document()) else {
        log::error!("No document, vote widgets not mounted");
        return;
    };

    if document.ready_state() != "loading" {
        f();
        return;
    }

    let on_ready = Closure::once(move |_e: Event| f());
    if let Err(e) = document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
    {
        log::error!("Failed to add DOMContentLoaded listener: {:?}", e);
        return;
    }
    on_ready.forget();
}

/// All vote controls currently on the page
pub fn vote_controls() -> Vec<Element> {
    let Some(document) = window().and_then(|w| w.document()) else {
        return Vec::new();
    };
    let selector = format!(".{LIKE_BUTTON}, .{DISLIKE_BUTTON}");
    let Ok(nodes) = document.query_selector_all(&selector) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Post id and side of a control, `None` if it lacks `data-post-id`.
pub fn control_identity(control: &Element) -> Option<(PostId, VoteSide)> {
    let post_id = control
        .get_attribute("data-post-id")
        .filter(|id| !id.trim().is_empty())?;
    let side = if control.class_list().contains(LIKE_BUTTON) {
        VoteSide::Like
    } else {
        VoteSide::Dislike
    };
    Some((PostId::new(post_id), side))
}

/// Routes clicks on `control` into the controller.
pub fn bind_vote_button(
    control: &Element,
    post_id: PostId,
    side: VoteSide,
    controller: Rc<ReconciliationController>,
) {
    let on_click = Closure::wrap(Box::new(move |e: MouseEvent| {
        e.prevent_default();
        let controller = controller.clone();
        let post_id = post_id.clone();
        wasm_bindgen_futures::spawn_local(async move {
            controller.handle_click(&post_id, side).await;
        });
    }) as Box<dyn FnMut(MouseEvent)>);

    if let Err(e) =
        control.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
    {
        log::error!("Failed to add click listener: {:?}", e);
        return;
    }

    // Leak the closure to keep it alive (cleaned up when the page unloads)
    on_click.forget();
}
