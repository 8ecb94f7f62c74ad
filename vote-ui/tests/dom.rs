//! Browser tests for the DOM render target, token lookup, notices and mounting.
//!
//! Run with: wasm-pack test --headless --firefox vote-ui

#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use shared_types::{ActiveSide, PostId, VoteWidgetState};
use vote_ui::{
    control_identity, mount, vote_controls, DomButtons, DomTokenSource, Notifier, Severity,
    ToastNotifier, TokenSource, VoteRenderer, WidgetConfig,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlDocument, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

const POST_MARKUP: &str = r#"
<div class="post">
  <button class="btn like-btn btn-outline-success" data-post-id="9" data-user-vote="false">
    <span class="like-count">3</span>
  </button>
  <button class="btn dislike-btn btn-outline-danger" data-post-id="9" data-user-vote="false">
    <span class="dislike-count">1</span>
  </button>
</div>
"#;

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount_fixture(markup: &str) -> Element {
    let document = document();
    let root = document.create_element("div").unwrap();
    root.set_inner_html(markup);
    document.body().unwrap().append_child(&root).unwrap();
    root
}

fn set_cookie(cookie: &str) {
    document()
        .dyn_into::<HtmlDocument>()
        .unwrap()
        .set_cookie(cookie)
        .unwrap();
}

fn clear_token_cookie() {
    set_cookie("csrftoken=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/");
}

fn classes(root: &Element, selector: &str) -> String {
    root.query_selector(selector).unwrap().unwrap().class_name()
}

fn text(root: &Element, selector: &str) -> String {
    root.query_selector(selector)
        .unwrap()
        .unwrap()
        .text_content()
        .unwrap_or_default()
}

#[wasm_bindgen_test]
fn reads_server_rendered_state() {
    let root = mount_fixture(POST_MARKUP);
    let buttons = DomButtons::new();
    let post = PostId::from("9");

    assert_eq!(buttons.read_counts(&post), (3, 1));
    assert_eq!(buttons.read_user_prior_vote(&post), ActiveSide::Dislike);

    let identities: Vec<_> = vote_controls()
        .iter()
        .filter_map(control_identity)
        .filter(|(id, _)| *id == post)
        .collect();
    assert_eq!(identities.len(), 2);

    root.remove();
}

#[wasm_bindgen_test]
fn render_switches_active_side() {
    let root = mount_fixture(POST_MARKUP);
    let buttons = DomButtons::new();
    let post = PostId::from("9");

    buttons.render(&post, &VoteWidgetState::new(4, 0, ActiveSide::Like));

    let like = classes(&root, ".like-btn");
    let dislike = classes(&root, ".dislike-btn");
    assert!(like.contains("active-like") && like.contains("btn-success"));
    assert!(!like.contains("btn-outline-success"));
    assert!(dislike.contains("inactive") && dislike.contains("btn-outline-danger"));
    assert!(!dislike.contains("active-dislike"));
    assert_eq!(text(&root, ".like-count"), "4");
    assert_eq!(text(&root, ".dislike-count"), "0");

    buttons.render(&post, &VoteWidgetState::new(3, 0, ActiveSide::None));
    assert!(classes(&root, ".like-btn").contains("inactive"));
    assert!(!classes(&root, ".like-btn").contains("active-like"));

    root.remove();
}

#[wasm_bindgen_test]
fn disabling_covers_both_controls() {
    let root = mount_fixture(POST_MARKUP);
    let buttons = DomButtons::new();
    let post = PostId::from("9");

    buttons.set_enabled(&post, false);
    assert!(root.query_selector(".like-btn[disabled]").unwrap().is_some());
    assert!(root.query_selector(".dislike-btn[disabled]").unwrap().is_some());

    buttons.set_enabled(&post, true);
    assert!(root.query_selector("[disabled]").unwrap().is_none());

    root.remove();
}

#[wasm_bindgen_test]
fn token_prefers_hidden_field() {
    let root = mount_fixture(
        r#"<input type="hidden" name="csrfmiddlewaretoken" value="from-field">"#,
    );
    let tokens = DomTokenSource::new("csrfmiddlewaretoken", "csrftoken");

    assert_eq!(tokens.token().as_deref(), Some("from-field"));

    root.remove();
}

#[wasm_bindgen_test]
fn notices_stack_and_render_as_text() {
    let notifier = ToastNotifier::new(60_000, 0);

    notifier.notify("<b>already voted</b>", Severity::Danger);
    notifier.notify("Post liked successfully!", Severity::Success);

    let container = document().get_element_by_id("toast-container").unwrap();
    assert!(container.child_element_count() >= 2);
    let first = container.query_selector(".bg-danger .toast-body").unwrap().unwrap();
    assert_eq!(first.text_content().as_deref(), Some("<b>already voted</b>"));
    assert!(container.query_selector(".bg-success").unwrap().is_some());
}

#[wasm_bindgen_test]
fn token_falls_back_to_cookie() {
    set_cookie("csrftoken=from-cookie; path=/");
    let tokens = DomTokenSource::new("csrfmiddlewaretoken", "csrftoken");

    assert_eq!(tokens.token().as_deref(), Some("from-cookie"));

    clear_token_cookie();
}

#[wasm_bindgen_test]
fn no_field_and_no_cookie_means_no_token() {
    clear_token_cookie();
    let tokens = DomTokenSource::new("csrfmiddlewaretoken", "csrftoken");

    assert_eq!(tokens.token(), None);
}

#[wasm_bindgen_test]
fn field_name_with_selector_characters() {
    let root = mount_fixture(
        r#"<input type="hidden" name="form.csrf [token]" value="odd-name">"#,
    );
    let tokens = DomTokenSource::new("form.csrf [token]", "csrftoken");

    assert_eq!(tokens.token().as_deref(), Some("odd-name"));

    root.remove();
}

#[wasm_bindgen_test]
fn post_id_with_backslash_and_quote() {
    let root = mount_fixture(
        r#"<button class="like-btn" data-post-id="a\b&quot;c"><span class="like-count">6</span></button>
           <button class="dislike-btn" data-post-id="a\b&quot;c"><span class="dislike-count">2</span></button>"#,
    );
    let buttons = DomButtons::new();

    assert_eq!(buttons.read_counts(&PostId::from(r#"a\b"c"#)), (6, 2));

    root.remove();
}

#[wasm_bindgen_test]
fn mount_registers_duplicated_post_once() {
    let root = mount_fixture(
        r#"
<div class="feed">
  <button class="like-btn" data-post-id="21" data-user-vote="true"><span class="like-count">5</span></button>
  <button class="dislike-btn" data-post-id="21" data-user-vote="true"><span class="dislike-count">2</span></button>
</div>
<div class="sidebar">
  <button class="like-btn" data-post-id="21" data-user-vote="true"><span class="like-count">5</span></button>
  <button class="dislike-btn" data-post-id="21" data-user-vote="true"><span class="dislike-count">2</span></button>
</div>
"#,
    );

    let controller = mount(WidgetConfig::default());
    let post = PostId::from("21");

    assert_eq!(
        controller.state(&post),
        Some(VoteWidgetState::new(5, 2, ActiveSide::Like))
    );
    let likes = root.query_selector_all(".like-btn.active-like").unwrap();
    let dislikes = root.query_selector_all(".dislike-btn.inactive").unwrap();
    assert_eq!(likes.length(), 2);
    assert_eq!(dislikes.length(), 2);

    root.remove();
}

#[wasm_bindgen_test]
async fn click_on_bound_control_reaches_controller() {
    clear_token_cookie();
    let root = mount_fixture(
        r#"
<button class="like-btn" data-post-id="31"><span class="like-count">3</span></button>
<button class="dislike-btn" data-post-id="31"><span class="dislike-count">1</span></button>
"#,
    );
    let controller = mount(WidgetConfig::default());
    let post = PostId::from("31");

    root.query_selector(".like-btn")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();
    TimeoutFuture::new(20).await;

    // No token on the page: the click is refused before any request or render.
    assert_eq!(
        controller.state(&post),
        Some(VoteWidgetState::new(3, 1, ActiveSide::None))
    );
    assert!(!controller.is_locked(&post));
    let container = document().get_element_by_id("toast-container").unwrap();
    let texts: Vec<String> = {
        let bodies = container.query_selector_all(".toast-body").unwrap();
        (0..bodies.length())
            .filter_map(|i| bodies.item(i))
            .filter_map(|node| node.text_content())
            .collect()
    };
    assert!(texts.iter().any(|t| t == "Error: CSRF token not found"));

    root.remove();
}
