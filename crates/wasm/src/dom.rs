use chatwidget_core::markup::{
    ARROW_ICON_SVG, BUTTON_LABEL, CLOSE_GLYPH, CLOSE_LABEL, IFRAME_ALLOW, IFRAME_SANDBOX,
    IFRAME_TITLE, chat_icon_html,
};
use chatwidget_core::styles::{
    ARROW_ICON_CLASS, BUTTON_CLASS, CHAT_FRAME_CLASS, CHAT_ICON_CLASS, CLOSE_BUTTON_CLASS,
    CONTAINER_CLASS,
};
use chatwidget_core::{
    ButtonSurface, VisibilityState, WidgetConfig, WidgetError, WidgetResult, WidgetSurface,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlIFrameElement, Window};

use crate::utils::describe_js_value;

/// Elements owned by one mounted widget.
pub(crate) struct WidgetDom {
    pub(crate) stylesheet: Element,
    pub(crate) container: HtmlElement,
    pub(crate) iframe: HtmlIFrameElement,
    pub(crate) button: HtmlElement,
    pub(crate) chat_icon: HtmlElement,
    pub(crate) close_button: HtmlElement,
}

impl WidgetDom {
    /// Detaches everything this widget added to the host page.
    pub(crate) fn remove(&self) {
        self.container.remove();
        self.stylesheet.remove();
    }
}

/// Appends the widget stylesheet to `<head>`.
pub(crate) fn inject_stylesheet(document: &Document, css: &str) -> WidgetResult<Element> {
    let head = document.head().ok_or(WidgetError::MissingGlobal {
        stage: "inject-stylesheet",
        name: "document.head",
    })?;
    let style = create_element(document, "style", "create-stylesheet")?;
    style.set_text_content(Some(css));
    append(&head, &style, "append-stylesheet")?;
    Ok(style)
}

/// Builds the container, chat frame and floating button and appends them to `body`.
pub(crate) fn build_widget_dom(
    document: &Document,
    body: &HtmlElement,
    stylesheet: Element,
    config: &WidgetConfig,
) -> WidgetResult<WidgetDom> {
    let container = create_html(document, "div", CONTAINER_CLASS)?;

    let chat_frame = create_html(document, "div", CHAT_FRAME_CLASS)?;
    let close_button = create_html(document, "button", CLOSE_BUTTON_CLASS)?;
    set_attribute(&close_button, "type", "button")?;
    set_attribute(&close_button, "aria-label", CLOSE_LABEL)?;
    close_button.set_inner_html(CLOSE_GLYPH);

    let iframe = create_element(document, "iframe", "create-iframe")?
        .dyn_into::<HtmlIFrameElement>()
        .map_err(|_| WidgetError::dom("cast-iframe", "created element is not an iframe"))?;
    iframe.set_src(&config.iframe_src());
    set_attribute(&iframe, "allow", IFRAME_ALLOW)?;
    set_attribute(&iframe, "sandbox", IFRAME_SANDBOX)?;
    set_attribute(&iframe, "title", IFRAME_TITLE)?;

    append(&chat_frame, &close_button, "append-close-button")?;
    append(&chat_frame, &iframe, "append-iframe")?;

    let button = create_html(document, "button", BUTTON_CLASS)?;
    set_attribute(&button, "type", "button")?;
    set_attribute(&button, "aria-label", BUTTON_LABEL)?;

    let chat_icon = create_html(document, "span", CHAT_ICON_CLASS)?;
    chat_icon.set_inner_html(&chat_icon_html(&config.default_icon_url()));
    let arrow_icon = create_html(document, "span", ARROW_ICON_CLASS)?;
    arrow_icon.set_inner_html(ARROW_ICON_SVG);

    append(&button, &chat_icon, "append-chat-icon")?;
    append(&button, &arrow_icon, "append-arrow-icon")?;

    append(&container, &chat_frame, "append-chat-frame")?;
    append(&container, &button, "append-button")?;
    append(body, &container, "append-container")?;

    Ok(WidgetDom {
        stylesheet,
        container,
        iframe,
        button,
        chat_icon,
        close_button,
    })
}

fn create_element(document: &Document, tag: &str, stage: &'static str) -> WidgetResult<Element> {
    document
        .create_element(tag)
        .map_err(|error| WidgetError::dom(stage, describe_js_value(&error)))
}

fn create_html(document: &Document, tag: &str, class_name: &str) -> WidgetResult<HtmlElement> {
    let element = create_element(document, tag, "create-widget-element")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| {
            WidgetError::dom("cast-widget-element", format!("<{tag}> is not an HTMLElement"))
        })?;
    element.set_class_name(class_name);
    Ok(element)
}

fn set_attribute(element: &Element, name: &str, value: &str) -> WidgetResult<()> {
    element
        .set_attribute(name, value)
        .map_err(|error| WidgetError::dom("set-attribute", describe_js_value(&error)))
}

fn append(parent: &Element, child: &Element, stage: &'static str) -> WidgetResult<()> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|error| WidgetError::dom(stage, describe_js_value(&error)))
}

/// Container classes plus body/window scroll effects for the state machine.
pub(crate) struct DomSurface<'a> {
    window: &'a Window,
    body: &'a HtmlElement,
    container: &'a HtmlElement,
}

impl<'a> DomSurface<'a> {
    pub(crate) fn new(
        window: &'a Window,
        body: &'a HtmlElement,
        container: &'a HtmlElement,
    ) -> Self {
        Self {
            window,
            body,
            container,
        }
    }
}

impl WidgetSurface for DomSurface<'_> {
    fn apply_state_class(&mut self, state: VisibilityState) {
        let classes = self.container.class_list();
        let result = classes
            .remove_1(state.toggled().class_name())
            .and_then(|_| classes.add_1(state.class_name()));
        if let Err(error) = result {
            tracing::warn!("failed to update widget state class: {}", describe_js_value(&error));
        }
    }

    fn page_y_offset(&self) -> f64 {
        self.window.page_y_offset().unwrap_or_default()
    }

    fn set_body_style(&mut self, property: &'static str, value: &str) {
        if let Err(error) = self.body.style().set_property(property, value) {
            tracing::warn!("failed to set body {property}: {}", describe_js_value(&error));
        }
    }

    fn clear_body_style(&mut self, property: &'static str) {
        if let Err(error) = self.body.style().remove_property(property) {
            tracing::warn!("failed to clear body {property}: {}", describe_js_value(&error));
        }
    }

    fn scroll_to(&mut self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }
}

/// The floating button's paintable parts.
pub(crate) struct ButtonDom<'a> {
    button: &'a HtmlElement,
    chat_icon: &'a HtmlElement,
}

impl<'a> ButtonDom<'a> {
    pub(crate) fn new(dom: &'a WidgetDom) -> Self {
        Self {
            button: &dom.button,
            chat_icon: &dom.chat_icon,
        }
    }
}

impl ButtonSurface for ButtonDom<'_> {
    fn set_button_colors(&mut self, background: &str, foreground: &str) {
        let style = self.button.style();
        let result = style
            .set_property("background-color", background)
            .and_then(|_| style.set_property("color", foreground));
        if let Err(error) = result {
            tracing::warn!("failed to apply branding colors: {}", describe_js_value(&error));
        }
    }

    fn set_chat_icon_html(&mut self, html: &str) {
        self.chat_icon.set_inner_html(html);
    }
}
