use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlInputElement};

use crate::buttons::css_string;

/// Where the anti-forgery token comes from.
pub trait TokenSource {
    /// `None` when no token is available; votes must not be sent then.
    fn token(&self) -> Option<String>;
}

/// Reads the token from the page: the hidden form field first, then the cookie.
pub struct DomTokenSource {
    field_name: String,
    cookie_name: String,
}

impl DomTokenSource {
    pub fn new(field_name: impl Into<String>, cookie_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            cookie_name: cookie_name.into(),
        }
    }

    fn from_field(&self) -> Option<String> {
        let document = web_sys::window()?.document()?;
        let selector = format!("[name={}]", css_string(&self.field_name));
        let input = document
            .query_selector(&selector)
            .ok()??
            .dyn_into::<HtmlInputElement>()
            .ok()?;
        non_empty(input.value())
    }

    fn from_cookie(&self) -> Option<String> {
        let document = web_sys::window()?
            .document()?
            .dyn_into::<HtmlDocument>()
            .ok()?;
        let cookies = document.cookie().ok()?;
        cookie_value(&cookies, &self.cookie_name)
    }
}

impl TokenSource for DomTokenSource {
    fn token(&self) -> Option<String> {
        self.from_field().or_else(|| self.from_cookie())
    }
}

/// Extracts `name`'s value from a `document.cookie` string.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| non_empty(value.to_string()))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
