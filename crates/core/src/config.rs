use std::fmt;

use figment::{Figment, providers::Serialized};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_AGENT_ID: &str = "null";
pub const DEFAULT_WIDGET_DOMAIN: &str = "/textwidget";
pub const DEFAULT_IFRAME_DOMAIN: &str = "iframe_domain_not_defined";
pub const DEFAULT_ICON_FILE_NAME: &str = "live-chat.png";

/// Screen edge the floating button is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    #[default]
    Right,
}

impl Position {
    /// CSS property name used for the horizontal offset.
    pub fn as_css_edge(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_css_edge())
    }
}

/// Host-supplied widget configuration, immutable once the widget is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default = "default_agent_id")]
    pub agent_id: String,
    /// Base URL hosting the chat application loaded into the iframe.
    #[serde(default = "default_widget_domain")]
    pub widget_domain: String,
    /// Base URL for static icon assets.
    #[serde(default = "default_iframe_domain")]
    pub iframe_domain: String,
    #[serde(default)]
    pub position: Position,
    /// Open the chat frame immediately (knowledge-base demo pages).
    #[serde(default)]
    pub start_expanded: bool,
    /// Fetch agent colors and logo after the button is rendered.
    #[serde(default)]
    pub enable_branding: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            agent_id: default_agent_id(),
            widget_domain: default_widget_domain(),
            iframe_domain: default_iframe_domain(),
            position: Position::default(),
            start_expanded: false,
            enable_branding: false,
        }
    }
}

impl WidgetConfig {
    /// Layers a host config object (as JSON text) over the defaults.
    ///
    /// Missing, `null` and empty-string fields keep their default. Scalars given
    /// for string fields are stringified. An override that still cannot be
    /// extracted falls back to its own default without affecting the others.
    pub fn from_host_json(raw: &str) -> Self {
        let overrides = match host_overrides(raw) {
            Ok(overrides) => overrides,
            Err(error) => {
                tracing::warn!("ignoring widget config that is not a JSON object: {error}");
                return Self::default();
            }
        };

        let mut accepted = Map::new();
        for (key, value) in overrides {
            let value = coerce_string_field(&key, value);
            let single = Map::from_iter([(key.clone(), value.clone())]);
            match layered(single).extract::<Self>() {
                Ok(_) => {
                    accepted.insert(key, value);
                }
                Err(error) => {
                    tracing::warn!("ignoring widget config field '{key}': {error}");
                }
            }
        }

        match layered(accepted).extract::<Self>() {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!("failed to extract widget config: {error}. using defaults");
                Self::default()
            }
        }
    }

    /// `src` of the chat iframe.
    pub fn iframe_src(&self) -> String {
        format!("{}/?agentId={}", self.widget_domain, self.agent_id)
    }

    /// Chat glyph shown on the button until branding replaces it.
    pub fn default_icon_url(&self) -> String {
        format!("{}/{}", self.iframe_domain, DEFAULT_ICON_FILE_NAME)
    }

    /// Branding endpoint for the configured agent.
    pub fn agent_content_url(&self) -> String {
        format!("{}/api/agent_content/{}", self.widget_domain, self.agent_id)
    }
}

const STRING_FIELDS: [&str; 3] = ["agentId", "widgetDomain", "iframeDomain"];

fn layered(overrides: Map<String, Value>) -> Figment {
    Figment::from(Serialized::defaults(WidgetConfig::default()))
        .merge(Serialized::defaults(overrides))
}

// Template literals stringify whatever the host passed.
fn coerce_string_field(key: &str, value: Value) -> Value {
    if !STRING_FIELDS.contains(&key) {
        return value;
    }
    match value {
        Value::Number(number) => Value::String(number.to_string()),
        Value::Bool(flag) => Value::String(flag.to_string()),
        other => other,
    }
}

fn host_overrides(raw: &str) -> Result<Map<String, Value>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(fields)) => Ok(fields
            .into_iter()
            .filter(|(_, value)| !is_omitted(value))
            .collect()),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(format!("unexpected config value {other}")),
        Err(error) => Err(error.to_string()),
    }
}

// Falsy host values fall back to defaults, matching `config.x || default`.
fn is_omitted(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

fn default_agent_id() -> String {
    DEFAULT_AGENT_ID.to_string()
}

fn default_widget_domain() -> String {
    DEFAULT_WIDGET_DOMAIN.to_string()
}

fn default_iframe_domain() -> String {
    DEFAULT_IFRAME_DOMAIN.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = WidgetConfig::from_host_json("{}");
        assert_eq!(config.agent_id, "null");
        assert_eq!(config.widget_domain, "/textwidget");
        assert_eq!(config.iframe_domain, "iframe_domain_not_defined");
        assert_eq!(config.position, Position::Right);
        assert!(!config.start_expanded);
        assert!(!config.enable_branding);
        assert_eq!(config.iframe_src(), "/textwidget/?agentId=null");
    }

    #[test]
    fn host_fields_override_defaults() {
        let config = WidgetConfig::from_host_json(
            r#"{"agentId":"a-42","widgetDomain":"https://chat.example.com","position":"left","enableBranding":true}"#,
        );
        assert_eq!(config.agent_id, "a-42");
        assert_eq!(config.position, Position::Left);
        assert!(config.enable_branding);
        assert_eq!(config.iframe_domain, DEFAULT_IFRAME_DOMAIN);
        assert_eq!(
            config.iframe_src(),
            "https://chat.example.com/?agentId=a-42"
        );
        assert_eq!(
            config.agent_content_url(),
            "https://chat.example.com/api/agent_content/a-42"
        );
    }

    #[test]
    fn null_and_empty_fields_keep_defaults() {
        let config =
            WidgetConfig::from_host_json(r#"{"agentId":"","iframeDomain":null,"position":null}"#);
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn unknown_position_falls_back_alone() {
        let config = WidgetConfig::from_host_json(r#"{"agentId":"a-1","position":"top"}"#);
        assert_eq!(config.agent_id, "a-1");
        assert_eq!(config.position, Position::Right);
    }

    #[test]
    fn mistyped_field_keeps_neighbouring_overrides() {
        let config = WidgetConfig::from_host_json(
            r#"{"agentId":42,"widgetDomain":"https://chat.example.com","position":"left","startExpanded":"soon"}"#,
        );
        assert_eq!(config.agent_id, "42");
        assert_eq!(config.widget_domain, "https://chat.example.com");
        assert_eq!(config.position, Position::Left);
        assert!(!config.start_expanded);
        assert_eq!(config.iframe_src(), "https://chat.example.com/?agentId=42");
    }

    #[test]
    fn nested_value_for_string_field_is_dropped() {
        let config = WidgetConfig::from_host_json(
            r#"{"agentId":{"id":1},"iframeDomain":"https://cdn.example.com"}"#,
        );
        assert_eq!(config.agent_id, DEFAULT_AGENT_ID);
        assert_eq!(config.iframe_domain, "https://cdn.example.com");
    }

    #[test]
    fn non_object_payloads_fall_back_to_defaults() {
        assert_eq!(WidgetConfig::from_host_json(""), WidgetConfig::default());
        assert_eq!(WidgetConfig::from_host_json("null"), WidgetConfig::default());
        assert_eq!(WidgetConfig::from_host_json("[1,2]"), WidgetConfig::default());
        assert_eq!(WidgetConfig::from_host_json("{oops"), WidgetConfig::default());
    }

    #[test]
    fn default_icon_lives_under_iframe_domain() {
        let config =
            WidgetConfig::from_host_json(r#"{"iframeDomain":"https://cdn.example.com"}"#);
        assert_eq!(
            config.default_icon_url(),
            "https://cdn.example.com/live-chat.png"
        );
    }
}
