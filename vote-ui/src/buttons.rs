use shared_types::{ActiveSide, PostId, VoteSide, VoteWidgetState};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement};

pub const LIKE_BUTTON: &str = "like-btn";
pub const DISLIKE_BUTTON: &str = "dislike-btn";

const ACTIVE_LIKE: &str = "active-like";
const ACTIVE_DISLIKE: &str = "active-dislike";
const INACTIVE: &str = "inactive";

/// Every class a control can carry for its vote state. Cleared before each render.
const STATE_CLASSES: [&str; 7] = [
    ACTIVE_LIKE,
    ACTIVE_DISLIKE,
    INACTIVE,
    "btn-success",
    "btn-outline-success",
    "btn-danger",
    "btn-outline-danger",
];

/// The render target for a post's vote pair.
pub trait VoteRenderer {
    /// Writes counts and active/inactive classes to every control of the post.
    fn render(&self, post_id: &PostId, state: &VoteWidgetState);

    /// Disables or re-enables both controls while a vote is in flight.
    fn set_enabled(&self, post_id: &PostId, enabled: bool);

    /// The prior-session vote baked into the page.
    fn read_user_prior_vote(&self, post_id: &PostId) -> ActiveSide;

    /// Server-rendered (like, dislike) counts.
    fn read_counts(&self, post_id: &PostId) -> (u32, u32);
}

/// Classes for one control: the visual state class and the theme button class.
pub fn control_classes(side: VoteSide, active: ActiveSide) -> [&'static str; 2] {
    match (side, active.is(side)) {
        (VoteSide::Like, true) => [ACTIVE_LIKE, "btn-success"],
        (VoteSide::Like, false) => [INACTIVE, "btn-outline-success"],
        (VoteSide::Dislike, true) => [ACTIVE_DISLIKE, "btn-danger"],
        (VoteSide::Dislike, false) => [INACTIVE, "btn-outline-danger"],
    }
}

pub fn button_class(side: VoteSide) -> &'static str {
    match side {
        VoteSide::Like => LIKE_BUTTON,
        VoteSide::Dislike => DISLIKE_BUTTON,
    }
}

fn counter_class(side: VoteSide) -> &'static str {
    match side {
        VoteSide::Like => "like-count",
        VoteSide::Dislike => "dislike-count",
    }
}

/// Quotes `value` as a CSS string for use in attribute selectors.
pub fn css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            // Newlines can't appear raw in a CSS string; use the hex escape.
            '\n' => quoted.push_str("\\a "),
            '\r' => quoted.push_str("\\d "),
            '\0' => quoted.push('\u{FFFD}'),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Lenient count parse: rendered text that is not a number counts as zero.
pub fn parse_count(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

/// Renders onto the server-rendered `.like-btn` / `.dislike-btn` controls.
#[derive(Default)]
pub struct DomButtons;

impl DomButtons {
    pub fn new() -> Self {
        Self
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn controls(post_id: &PostId, side: VoteSide) -> Vec<Element> {
        let Some(document) = Self::document() else {
            return Vec::new();
        };
        let selector = format!(
            ".{}[data-post-id={}]",
            button_class(side),
            css_string(post_id.as_str())
        );
        let Ok(nodes) = document.query_selector_all(&selector) else {
            log::warn!("Invalid selector for post {post_id}");
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn all_controls(post_id: &PostId) -> impl Iterator<Item = Element> {
        Self::controls(post_id, VoteSide::Like)
            .into_iter()
            .chain(Self::controls(post_id, VoteSide::Dislike))
    }

    fn render_side(post_id: &PostId, side: VoteSide, count: u32, active: ActiveSide) {
        let classes = control_classes(side, active);
        let count = count.to_string();

        for control in Self::controls(post_id, side) {
            let class_list = control.class_list();
            for class in STATE_CLASSES {
                let _ = class_list.remove_1(class);
            }
            for class in classes {
                let _ = class_list.add_1(class);
            }

            if let Ok(Some(counter)) = control.query_selector(&format!(".{}", counter_class(side))) {
                counter.set_text_content(Some(&count));
            }
        }
    }
}

impl VoteRenderer for DomButtons {
    fn render(&self, post_id: &PostId, state: &VoteWidgetState) {
        Self::render_side(post_id, VoteSide::Like, state.like_count, state.active_side);
        Self::render_side(
            post_id,
            VoteSide::Dislike,
            state.dislike_count,
            state.active_side,
        );
    }

    fn set_enabled(&self, post_id: &PostId, enabled: bool) {
        for control in Self::all_controls(post_id) {
            if let Some(button) = control.dyn_ref::<HtmlButtonElement>() {
                button.set_disabled(!enabled);
            } else if enabled {
                let _ = control.remove_attribute("disabled");
            } else {
                let _ = control.set_attribute("disabled", "");
            }
        }
    }

    fn read_user_prior_vote(&self, post_id: &PostId) -> ActiveSide {
        Self::all_controls(post_id)
            .map(|control| ActiveSide::from_hint(control.get_attribute("data-user-vote").as_deref()))
            .find(|side| *side != ActiveSide::None)
            .unwrap_or_default()
    }

    fn read_counts(&self, post_id: &PostId) -> (u32, u32) {
        let read = |side: VoteSide| {
            Self::controls(post_id, side)
                .first()
                .and_then(|control| {
                    control
                        .query_selector(&format!(".{}", counter_class(side)))
                        .ok()
                        .flatten()
                })
                .and_then(|counter| counter.text_content())
                .map(|text| parse_count(&text))
                .unwrap_or(0)
        };
        (read(VoteSide::Like), read(VoteSide::Dislike))
    }
}
