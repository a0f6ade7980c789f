use serde::Deserialize;
use snafu::{OptionExt, ResultExt};

use crate::error::{AgentContentParseSnafu, EmptyAgentContentSnafu, WidgetResult};
use crate::markup::chat_icon_html;

pub const DEFAULT_PRIMARY_COLOR: &str = "#000000";
pub const DEFAULT_SECONDARY_COLOR: &str = "#ffffff";

/// Agent-specific colors and logo for the floating button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentBranding {
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_url: Option<String>,
}

impl Default for AgentBranding {
    fn default() -> Self {
        Self {
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            logo_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AgentContentEnvelope {
    #[serde(default)]
    data: Vec<AgentContent>,
}

#[derive(Debug, Deserialize)]
struct AgentContent {
    #[serde(default)]
    chat_ui: Option<ChatUi>,
    #[serde(default)]
    agent_logo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatUi {
    #[serde(default)]
    primary_color: Option<String>,
    #[serde(default)]
    secondary_color: Option<String>,
}

/// Parses the `agent_content` response body into branding.
///
/// Only the first entry is used. Absent or blank fields keep their defaults.
pub fn parse_agent_content(body: &str) -> WidgetResult<AgentBranding> {
    let envelope: AgentContentEnvelope = serde_json::from_str(body).context(AgentContentParseSnafu {
        stage: "parse-agent-content",
    })?;
    let content = envelope.data.into_iter().next().context(EmptyAgentContentSnafu {
        stage: "select-agent-content",
    })?;

    let defaults = AgentBranding::default();
    let chat_ui = content.chat_ui.unwrap_or_default();

    Ok(AgentBranding {
        primary_color: non_blank(chat_ui.primary_color).unwrap_or(defaults.primary_color),
        secondary_color: non_blank(chat_ui.secondary_color).unwrap_or(defaults.secondary_color),
        logo_url: non_blank(content.agent_logo),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// The floating button as seen by branding.
pub trait ButtonSurface {
    fn set_button_colors(&mut self, background: &str, foreground: &str);
    fn set_chat_icon_html(&mut self, html: &str);
}

/// Patches the rendered button. Applying the same branding again is a no-op in effect.
pub fn apply_branding<S: ButtonSurface + ?Sized>(
    branding: &AgentBranding,
    default_icon_url: &str,
    surface: &mut S,
) {
    surface.set_button_colors(&branding.primary_color, &branding.secondary_color);
    let icon_src = branding.logo_url.as_deref().unwrap_or(default_icon_url);
    surface.set_chat_icon_html(&chat_icon_html(icon_src));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WidgetError;

    #[derive(Default)]
    struct FakeButton {
        background: String,
        foreground: String,
        icon_html: String,
    }

    impl ButtonSurface for FakeButton {
        fn set_button_colors(&mut self, background: &str, foreground: &str) {
            self.background = background.to_string();
            self.foreground = foreground.to_string();
        }

        fn set_chat_icon_html(&mut self, html: &str) {
            self.icon_html = html.to_string();
        }
    }

    #[test]
    fn fetched_branding_patches_button() {
        let body = r##"{"data":[{"chat_ui":{"primaryColor":"#112233","secondaryColor":"#445566"},"agent_logo":"https://x/y.png"}]}"##;
        let branding = match parse_agent_content(body) {
            Ok(branding) => branding,
            Err(error) => panic!("payload should parse: {error}"),
        };

        let mut button = FakeButton::default();
        apply_branding(&branding, "cdn/live-chat.png", &mut button);

        assert_eq!(button.background, "#112233");
        assert_eq!(button.foreground, "#445566");
        assert!(button.icon_html.starts_with("<img"));
        assert!(button.icon_html.contains(r#"src="https://x/y.png""#));
    }

    #[test]
    fn missing_logo_falls_back_to_default_icon() {
        let body = r##"{"data":[{"chat_ui":{"primaryColor":"#ff0000"},"agent_logo":null}]}"##;
        let branding = parse_agent_content(body).unwrap_or_default();
        assert_eq!(branding.primary_color, "#ff0000");
        assert_eq!(branding.secondary_color, DEFAULT_SECONDARY_COLOR);
        assert_eq!(branding.logo_url, None);

        let mut button = FakeButton::default();
        apply_branding(&branding, "cdn/live-chat.png", &mut button);
        assert!(button.icon_html.contains(r#"src="cdn/live-chat.png""#));
    }

    #[test]
    fn empty_data_is_an_error() {
        let result = parse_agent_content(r#"{"data":[]}"#);
        assert!(matches!(result, Err(WidgetError::EmptyAgentContent { .. })));

        let result = parse_agent_content(r#"{}"#);
        assert!(matches!(result, Err(WidgetError::EmptyAgentContent { .. })));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let result = parse_agent_content("<html>502</html>");
        assert!(matches!(result, Err(WidgetError::AgentContentParse { .. })));
    }

    #[test]
    fn missing_chat_ui_keeps_default_colors() {
        let branding = parse_agent_content(r#"{"data":[{"agent_logo":"  "}]}"#).unwrap_or_else(
            |error| panic!("payload should parse: {error}"),
        );
        assert_eq!(branding, AgentBranding::default());
    }
}
