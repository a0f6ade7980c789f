//! Browser binding for the embeddable chat widget.
//!
//! Host pages either import [`TextChatWidget`] from the generated module or,
//! after the module has initialized, call `new window.TextChatWidget({...})`
//! from a plain inline script.

use wasm_bindgen::prelude::*;

mod branding;
mod dom;
mod frame;
mod listeners;
mod utils;
mod widget;

pub use widget::TextChatWidget;

const GLOBAL_CONSTRUCTOR_NAME: &str = "TextChatWidget";

#[wasm_bindgen(inline_js = "
export function wrap_mount(mount) {
    return function TextChatWidget(config) {
        return mount(config);
    };
}
")]
extern "C" {
    fn wrap_mount(
        mount: &Closure<dyn FnMut(JsValue) -> Result<JsValue, JsValue>>,
    ) -> js_sys::Function;
}

/// Initialize WASM module
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    if let Err(error) = install_global_constructor() {
        log::warn!("window.{GLOBAL_CONSTRUCTOR_NAME} was not installed: {error:?}");
    }
    log::info!("chat widget module initialized");
}

/// Exposes `window.TextChatWidget` for hosts that are not module-aware.
///
/// Leaves an existing global untouched.
pub fn install_global_constructor() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is unavailable"))?;
    let key = JsValue::from_str(GLOBAL_CONSTRUCTOR_NAME);

    if js_sys::Reflect::has(&window, &key)? {
        return Ok(());
    }

    // A plain `function` so `new` works; it returns the wrapper object.
    let mount = Closure::<dyn FnMut(JsValue) -> Result<JsValue, JsValue>>::new(|config| {
        TextChatWidget::new(config).map(JsValue::from)
    });
    let constructor = wrap_mount(&mount);
    js_sys::Reflect::set(&window, &key, &constructor)?;

    // The global lives for the whole page.
    mount.forget();
    Ok(())
}
