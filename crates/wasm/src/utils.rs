use chatwidget_core::WidgetError;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::JsValue;

/// Best-effort text for a thrown JS value.
pub(crate) fn describe_js_value(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

pub(crate) fn js_error(error: WidgetError) -> JsValue {
    tracing::error!(stage = error.stage(), "chat widget error: {error}");
    js_sys::Error::new(&error.to_string()).into()
}

/// Serializes the host config object to JSON text; `undefined`/`null` become empty.
pub(crate) fn host_config_json(config: &JsValue) -> String {
    if config.is_undefined() || config.is_null() {
        return String::new();
    }

    js_sys::JSON::stringify(config)
        .ok()
        .and_then(|json| json.as_string())
        .unwrap_or_default()
}
