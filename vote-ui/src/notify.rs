//! Transient notices.
//!
//! The widget only needs `notify(message, severity)`. `ToastNotifier` is the
//! page implementation: a stack of self-expiring, dismissible toasts.

use gloo_timers::future::TimeoutFuture;
use shared_types::ActiveSide;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent};

const CONTAINER_ID: &str = "toast-container";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Danger,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Danger => "danger",
        }
    }
}

pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// Notice for a confirmed vote, keyed on the server's view of the user's vote.
pub fn confirmation_notice(active: ActiveSide) -> (String, Severity) {
    match active {
        ActiveSide::None => ("Your vote has been removed".to_string(), Severity::Info),
        ActiveSide::Like => ("Post liked successfully!".to_string(), Severity::Success),
        ActiveSide::Dislike => ("Post disliked successfully!".to_string(), Severity::Success),
    }
}

pub struct ToastNotifier {
    lifetime_ms: u32,
    fade_ms: u32,
}

impl ToastNotifier {
    pub fn new(lifetime_ms: u32, fade_ms: u32) -> Self {
        Self {
            lifetime_ms,
            fade_ms,
        }
    }

    fn container(document: &Document) -> Option<Element> {
        if let Some(existing) = document.get_element_by_id(CONTAINER_ID) {
            return Some(existing);
        }

        let container = document.create_element("div").ok()?;
        container.set_id(CONTAINER_ID);
        container
            .set_attribute(
                "style",
                "position: fixed; top: 20px; right: 20px; z-index: 9999;",
            )
            .ok()?;
        document.body()?.append_child(&container).ok()?;
        Some(container)
    }

    fn build_toast(document: &Document, message: &str, severity: Severity) -> Option<Element> {
        let toast = document.create_element("div").ok()?;
        toast.set_class_name(&format!(
            "toast show align-items-center text-white bg-{} border-0",
            severity.as_str()
        ));
        toast.set_attribute("role", "alert").ok()?;
        toast.set_attribute("aria-live", "assertive").ok()?;
        toast.set_attribute("aria-atomic", "true").ok()?;

        let row = document.create_element("div").ok()?;
        row.set_class_name("d-flex");

        let body = document.create_element("div").ok()?;
        body.set_class_name("toast-body");
        body.set_text_content(Some(message));

        let close = document.create_element("button").ok()?;
        close.set_attribute("type", "button").ok()?;
        close.set_class_name("btn-close btn-close-white me-2 m-auto");
        close.set_attribute("aria-label", "Close").ok()?;

        row.append_child(&body).ok()?;
        row.append_child(&close).ok()?;
        toast.append_child(&row).ok()?;
        Some(toast)
    }

    fn show(&self, message: &str, severity: Severity) -> Option<()> {
        let document = web_sys::window()?.document()?;
        let container = Self::container(&document)?;
        let toast = Self::build_toast(&document, message, severity)?;
        container.append_child(&toast).ok()?;

        let fade_ms = self.fade_ms;
        if let Some(close) = toast.query_selector(".btn-close").ok().flatten() {
            let toast_for_close = toast.clone();
            let on_close = Closure::wrap(Box::new(move |_e: MouseEvent| {
                dismiss(toast_for_close.clone(), fade_ms);
            }) as Box<dyn FnMut(MouseEvent)>);
            close
                .add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref())
                .ok()?;
            // Lives as long as the toast element.
            on_close.forget();
        }

        let lifetime_ms = self.lifetime_ms;
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(lifetime_ms).await;
            dismiss(toast, fade_ms);
        });

        Some(())
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        if self.show(message, severity).is_none() {
            log::error!("Failed to display notice: {message}");
        }
    }
}

/// Fades the toast out, then removes it. Safe to call twice.
fn dismiss(toast: Element, fade_ms: u32) {
    let _ = toast.class_list().remove_1("show");
    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(fade_ms).await;
        toast.remove();
    });
}
