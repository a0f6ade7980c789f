use chatwidget_core::styles::FRAME_STYLE_ELEMENT_ID;
use chatwidget_core::{FrameMessage, FrameTarget, WidgetError, WidgetResult};
use serde::Serialize;
use wasm_bindgen::JsValue;
use web_sys::HtmlIFrameElement;

use crate::utils::describe_js_value;

const ANY_TARGET_ORIGIN: &str = "*";

/// Chat iframe adapter for the style bridge.
pub(crate) struct IframeTarget<'a> {
    iframe: &'a HtmlIFrameElement,
}

impl<'a> IframeTarget<'a> {
    pub(crate) fn new(iframe: &'a HtmlIFrameElement) -> Self {
        Self { iframe }
    }
}

impl FrameTarget for IframeTarget<'_> {
    fn inject_style(&self, css: &str) -> WidgetResult<()> {
        // Cross-origin frames expose no document at all.
        let document = self
            .iframe
            .content_document()
            .ok_or_else(|| blocked("frame document is not accessible"))?;
        let head = document
            .head()
            .ok_or_else(|| blocked("frame document has no head"))?;

        if let Some(existing) = document.get_element_by_id(FRAME_STYLE_ELEMENT_ID) {
            existing.set_text_content(Some(css));
            return Ok(());
        }

        let style = document
            .create_element("style")
            .map_err(|error| blocked(describe_js_value(&error)))?;
        style.set_id(FRAME_STYLE_ELEMENT_ID);
        style.set_text_content(Some(css));
        head.append_child(&style)
            .map_err(|error| blocked(describe_js_value(&error)))?;
        Ok(())
    }

    fn post_message(&self, message: &FrameMessage) -> WidgetResult<()> {
        let window = self
            .iframe
            .content_window()
            .ok_or_else(|| post_failed("frame window is unavailable"))?;
        let payload = encode_message(message)?;
        window
            .post_message(&payload, ANY_TARGET_ORIGIN)
            .map_err(|error| post_failed(describe_js_value(&error)))
    }
}

/// Reads a window `message` payload; anything that is not ours yields `None`.
pub(crate) fn decode_message(data: JsValue) -> Option<FrameMessage> {
    if !data.is_object() {
        return None;
    }
    serde_wasm_bindgen::from_value(data).ok()
}

fn encode_message(message: &FrameMessage) -> WidgetResult<JsValue> {
    message
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|error| post_failed(error.to_string()))
}

fn blocked(details: impl Into<String>) -> WidgetError {
    WidgetError::InjectionBlocked {
        stage: "inject-frame-style",
        details: details.into(),
    }
}

fn post_failed(details: impl Into<String>) -> WidgetError {
    WidgetError::PostMessage {
        stage: "post-frame-styles",
        details: details.into(),
    }
}
