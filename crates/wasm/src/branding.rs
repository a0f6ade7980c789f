use chatwidget_core::error::{AgentContentStatusSnafu, MissingGlobalSnafu};
use chatwidget_core::{AgentBranding, WidgetError, WidgetResult, parse_agent_content};
use snafu::{OptionExt, ensure};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::utils::describe_js_value;

/// Fetches and parses branding from the agent content endpoint.
pub(crate) async fn fetch_agent_branding(url: &str) -> WidgetResult<AgentBranding> {
    let window = web_sys::window().context(MissingGlobalSnafu {
        stage: "fetch-agent-content",
        name: "window",
    })?;

    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|error| fetch_failed(url, "send-agent-content-request", &error))?;
    let response: Response = response.dyn_into().map_err(|value| {
        fetch_failed(url, "cast-agent-content-response", &value)
    })?;

    ensure!(
        response.ok(),
        AgentContentStatusSnafu {
            stage: "agent-content-status",
            url,
            status: response.status(),
        }
    );

    let text = response
        .text()
        .map_err(|error| fetch_failed(url, "read-agent-content", &error))?;
    let body = JsFuture::from(text)
        .await
        .map_err(|error| fetch_failed(url, "read-agent-content", &error))?;

    parse_agent_content(&body.as_string().unwrap_or_default())
}

fn fetch_failed(url: &str, stage: &'static str, error: &wasm_bindgen::JsValue) -> WidgetError {
    WidgetError::FetchAgentContent {
        stage,
        url: url.to_string(),
        details: describe_js_value(error),
    }
}
