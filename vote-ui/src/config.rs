use std::str::FromStr;

use shared_types::PostId;

const ATTR_PREFIX: &str = "data-vote-";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse {attr}={value}: {reason}")]
    InvalidValue {
        attr: String,
        value: String,
        reason: String,
    },

    #[error("Endpoint template '{0}' must contain {{post_id}}")]
    MissingPostIdPlaceholder(String),

    #[error("No document available")]
    NoDocument,
}

/// Page-level settings for the vote widgets.
///
/// Defaults match the server-rendered blog templates; any field can be
/// overridden with a `data-vote-*` attribute on `<body>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Prefix for the vote endpoint. Empty means same origin.
    pub api_base: String,
    /// Endpoint path, `{post_id}` is substituted.
    pub endpoint_template: String,
    /// Hidden form field carrying the anti-forgery token
    pub token_field: String,
    /// Cookie carrying the anti-forgery token when the field is absent
    pub token_cookie: String,
    /// Request header the token travels in
    pub token_header: String,
    /// Delay before the rollback reload after a failed vote
    pub reload_delay_ms: u32,
    /// How long a notice stays up before auto-dismissing
    pub notice_lifetime_ms: u32,
    /// Fade-out interval before a dismissed notice is removed
    pub notice_fade_ms: u32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            endpoint_template: "/like/{post_id}/".to_string(),
            token_field: "csrfmiddlewaretoken".to_string(),
            token_cookie: "csrftoken".to_string(),
            token_header: "X-CSRFToken".to_string(),
            reload_delay_ms: 1000,
            notice_lifetime_ms: 3000,
            notice_fade_ms: 300,
        }
    }
}

impl WidgetConfig {
    /// Reads overrides from the `<body>` element's `data-vote-*` attributes.
    pub fn from_document() -> Result<Self, ConfigError> {
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .ok_or(ConfigError::NoDocument)?;

        Self::from_lookup(|key| body.get_attribute(&format!("{ATTR_PREFIX}{key}")))
    }

    /// Builds a config from a key lookup (`api-base`, `reload-delay-ms`, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let endpoint_template = attr_str(&lookup, "endpoint", &defaults.endpoint_template);
        if !endpoint_template.contains("{post_id}") {
            return Err(ConfigError::MissingPostIdPlaceholder(endpoint_template));
        }

        Ok(Self {
            api_base: attr_str(&lookup, "api-base", &defaults.api_base)
                .trim_end_matches('/')
                .to_string(),
            endpoint_template,
            token_field: attr_str(&lookup, "token-field", &defaults.token_field),
            token_cookie: attr_str(&lookup, "token-cookie", &defaults.token_cookie),
            token_header: attr_str(&lookup, "token-header", &defaults.token_header),
            reload_delay_ms: attr_parse(&lookup, "reload-delay-ms", defaults.reload_delay_ms)?,
            notice_lifetime_ms: attr_parse(&lookup, "notice-ms", defaults.notice_lifetime_ms)?,
            notice_fade_ms: attr_parse(&lookup, "notice-fade-ms", defaults.notice_fade_ms)?,
        })
    }

    pub fn vote_url(&self, post_id: &PostId) -> String {
        format!(
            "{}{}",
            self.api_base,
            self.endpoint_template.replace("{post_id}", post_id.as_str())
        )
    }
}

fn attr_str<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn attr_parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue {
                attr: format!("{ATTR_PREFIX}{key}"),
                value,
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}
