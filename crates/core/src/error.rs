use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum WidgetError {
    #[snafu(display("browser global '{name}' is unavailable"))]
    MissingGlobal {
        stage: &'static str,
        name: &'static str,
    },
    #[snafu(display("dom operation failed at {stage}: {details}"))]
    Dom {
        stage: &'static str,
        details: String,
    },
    #[snafu(display("style injection into chat frame was blocked: {details}"))]
    InjectionBlocked {
        stage: &'static str,
        details: String,
    },
    #[snafu(display("failed to post message to chat frame: {details}"))]
    PostMessage {
        stage: &'static str,
        details: String,
    },
    #[snafu(display("agent content request to '{url}' failed: {details}"))]
    FetchAgentContent {
        stage: &'static str,
        url: String,
        details: String,
    },
    #[snafu(display("agent content request to '{url}' returned status {status}"))]
    AgentContentStatus {
        stage: &'static str,
        url: String,
        status: u16,
    },
    #[snafu(display("failed to parse agent content payload"))]
    AgentContentParse {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("agent content payload has no entries"))]
    EmptyAgentContent { stage: &'static str },
}

impl WidgetError {
    /// Builds a DOM error from any displayable browser failure.
    pub fn dom(stage: &'static str, details: impl Into<String>) -> Self {
        Self::Dom {
            stage,
            details: details.into(),
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::MissingGlobal { stage, .. }
            | Self::Dom { stage, .. }
            | Self::InjectionBlocked { stage, .. }
            | Self::PostMessage { stage, .. }
            | Self::FetchAgentContent { stage, .. }
            | Self::AgentContentStatus { stage, .. }
            | Self::AgentContentParse { stage, .. }
            | Self::EmptyAgentContent { stage } => *stage,
        }
    }
}

pub type WidgetResult<T> = Result<T, WidgetError>;
