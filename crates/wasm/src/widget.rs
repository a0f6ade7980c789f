use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chatwidget_core::error::MissingGlobalSnafu;
use chatwidget_core::{
    AgentBranding, DeviceProbe, StyleBridge, VisibilityMachine, VisibilityState, WidgetConfig,
    WidgetResult, apply_branding, widget_stylesheet,
};
use snafu::OptionExt;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, HtmlElement, MessageEvent, Window};

use crate::branding::fetch_agent_branding;
use crate::dom::{ButtonDom, DomSurface, WidgetDom, build_widget_dom, inject_stylesheet};
use crate::frame::{IframeTarget, decode_message};
use crate::listeners::EventListener;
use crate::utils::{host_config_json, js_error};

type SharedWidget = Rc<RefCell<WidgetState>>;

thread_local! {
    // Keeps mounted widgets alive even if the host drops its handle.
    static MOUNTED: RefCell<Vec<SharedWidget>> = const { RefCell::new(Vec::new()) };
}

struct WidgetState {
    config: WidgetConfig,
    window: Window,
    body: HtmlElement,
    dom: WidgetDom,
    device: DeviceProbe,
    visibility: VisibilityMachine,
    bridge: StyleBridge,
    branding: Option<AgentBranding>,
    listeners: Vec<EventListener>,
    disposed: bool,
}

impl WidgetState {
    fn toggle(&mut self) -> VisibilityState {
        let is_mobile = self.device.is_mobile();
        let mut surface = DomSurface::new(&self.window, &self.body, &self.dom.container);
        self.visibility.toggle(is_mobile, &mut surface)
    }

    fn refresh_device(&mut self) {
        let was_mobile = self.device.is_mobile();
        let is_mobile = self.device.refresh(viewport_width(&self.window));
        if was_mobile != is_mobile {
            tracing::debug!(is_mobile, "chat widget device class changed");
        }
    }

    fn frame_loaded(&mut self) {
        let outcome = self.bridge.on_frame_load(&IframeTarget::new(&self.dom.iframe));
        tracing::debug!(?outcome, "chat frame loaded");
    }

    fn window_message(&mut self, event: &MessageEvent) {
        let Some(message) = decode_message(event.data()) else {
            return;
        };
        if let Some(outcome) = self
            .bridge
            .on_message(&message, &IframeTarget::new(&self.dom.iframe))
        {
            tracing::debug!(?outcome, "chat frame requested styles");
        }
    }

    fn apply_branding(&mut self, branding: AgentBranding) {
        if self.disposed || !self.dom.container.is_connected() {
            tracing::debug!("dropping agent branding for an unmounted widget");
            return;
        }
        if self.branding.as_ref() == Some(&branding) {
            return;
        }

        apply_branding(
            &branding,
            &self.config.default_icon_url(),
            &mut ButtonDom::new(&self.dom),
        );
        self.branding = Some(branding);
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        for listener in self.listeners.drain(..) {
            tracing::trace!(event = listener.event_type(), "removing widget listener");
        }

        let mut surface = DomSurface::new(&self.window, &self.body, &self.dom.container);
        self.visibility.release(&mut surface);
        self.dom.remove();
        tracing::info!(agent_id = %self.config.agent_id, "chat widget disposed");
    }
}

/// Floating chat button plus iframe-hosted chat, mounted into the host page.
#[wasm_bindgen(js_name = TextChatWidget)]
pub struct TextChatWidget {
    state: SharedWidget,
}

#[wasm_bindgen(js_class = TextChatWidget)]
impl TextChatWidget {
    /// Builds and mounts a widget from a (possibly partial) config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TextChatWidget, JsValue> {
        let config = WidgetConfig::from_host_json(&host_config_json(&config));
        Self::mount(config).map_err(js_error)
    }

    /// Flips between collapsed and expanded; returns whether it is now expanded.
    #[wasm_bindgen(js_name = toggleWidget)]
    pub fn toggle_widget(&self) -> bool {
        match self.state.try_borrow_mut() {
            Ok(mut state) if !state.disposed => state.toggle().is_expanded(),
            Ok(state) => state.visibility.is_expanded(),
            Err(_) => {
                tracing::warn!("toggleWidget called re-entrantly, ignoring");
                self.is_expanded()
            }
        }
    }

    #[wasm_bindgen(js_name = isExpanded)]
    pub fn is_expanded(&self) -> bool {
        self.state
            .try_borrow()
            .map(|state| state.visibility.is_expanded())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = isMobile)]
    pub fn is_mobile(&self) -> bool {
        self.state
            .try_borrow()
            .map(|state| state.device.is_mobile())
            .unwrap_or_default()
    }

    /// Number of style deliveries attempted into the chat frame.
    #[wasm_bindgen(js_name = injectionAttempts)]
    pub fn injection_attempts(&self) -> u32 {
        self.state
            .try_borrow()
            .map(|state| state.bridge.attempts())
            .unwrap_or_default()
    }

    /// Re-fetches agent branding for the configured agent.
    #[wasm_bindgen(js_name = refreshBranding)]
    pub fn refresh_branding(&self) {
        spawn_branding_fetch(&self.state);
    }

    /// Removes listeners, releases a held scroll lock and detaches the widget.
    pub fn dispose(&self) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.dispose(),
            Err(_) => {
                tracing::warn!("dispose called re-entrantly, ignoring");
                return;
            }
        }

        MOUNTED.with(|mounted| {
            mounted
                .borrow_mut()
                .retain(|widget| !Rc::ptr_eq(widget, &self.state));
        });
    }
}

impl TextChatWidget {
    fn mount(config: WidgetConfig) -> WidgetResult<Self> {
        let window = web_sys::window().context(MissingGlobalSnafu {
            stage: "mount-widget",
            name: "window",
        })?;
        let document = window.document().context(MissingGlobalSnafu {
            stage: "mount-widget",
            name: "document",
        })?;
        let body = document.body().context(MissingGlobalSnafu {
            stage: "mount-widget",
            name: "document.body",
        })?;

        let stylesheet = inject_stylesheet(&document, &widget_stylesheet(&config))?;
        let dom = build_widget_dom(&document, &body, stylesheet, &config)?;

        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let device = DeviceProbe::new(user_agent, viewport_width(&window));

        let mut visibility =
            VisibilityMachine::new(VisibilityState::from_expanded(config.start_expanded));
        visibility.mount(
            device.is_mobile(),
            &mut DomSurface::new(&window, &body, &dom.container),
        );

        let enable_branding = config.enable_branding;
        tracing::info!(
            agent_id = %config.agent_id,
            position = %config.position,
            is_mobile = device.is_mobile(),
            "chat widget mounted"
        );

        let state = Rc::new(RefCell::new(WidgetState {
            config,
            window,
            body,
            dom,
            device,
            visibility,
            bridge: StyleBridge::default(),
            branding: None,
            listeners: Vec::new(),
            disposed: false,
        }));

        let listeners = match bind_listeners(&state) {
            Ok(listeners) => listeners,
            Err(error) => {
                state.borrow().dom.remove();
                return Err(error);
            }
        };
        state.borrow_mut().listeners = listeners;

        if enable_branding {
            spawn_branding_fetch(&state);
        }

        MOUNTED.with(|mounted| mounted.borrow_mut().push(Rc::clone(&state)));
        Ok(Self { state })
    }
}

fn bind_listeners(state: &SharedWidget) -> WidgetResult<Vec<EventListener>> {
    let (window, button, close_button, iframe) = {
        let state = state.borrow();
        (
            state.window.clone(),
            state.dom.button.clone(),
            state.dom.close_button.clone(),
            state.dom.iframe.clone(),
        )
    };

    let weak = Rc::downgrade(state);
    let mut listeners = Vec::with_capacity(6);

    listeners.push(EventListener::new(&button, "click", {
        let weak = weak.clone();
        move |_event: Event| {
            with_state(&weak, |state| {
                state.toggle();
            });
        }
    })?);

    listeners.push(EventListener::new(&close_button, "click", {
        let weak = weak.clone();
        move |event: Event| {
            event.stop_propagation();
            with_state(&weak, |state| {
                state.toggle();
            });
        }
    })?);

    listeners.push(EventListener::new(&window, "resize", {
        let weak = weak.clone();
        move |_event: Event| with_state(&weak, WidgetState::refresh_device)
    })?);

    listeners.push(EventListener::new(&iframe, "load", {
        let weak = weak.clone();
        move |_event: Event| with_state(&weak, WidgetState::frame_loaded)
    })?);

    listeners.push(EventListener::new(&iframe, "error", |_event: Event| {
        tracing::warn!("chat frame failed to load");
    })?);

    listeners.push(EventListener::new(&window, "message", {
        let weak = weak.clone();
        move |event: Event| {
            let Some(event) = event.dyn_ref::<MessageEvent>() else {
                return;
            };
            with_state(&weak, |state| state.window_message(event));
        }
    })?);

    Ok(listeners)
}

fn spawn_branding_fetch(state: &SharedWidget) {
    let url = match state.try_borrow() {
        Ok(state) if !state.disposed => state.config.agent_content_url(),
        _ => return,
    };
    let weak = Rc::downgrade(state);

    spawn_local(async move {
        match fetch_agent_branding(&url).await {
            Ok(branding) => with_state(&weak, |state| state.apply_branding(branding)),
            Err(error) => {
                tracing::warn!("failed to load agent branding, keeping defaults: {error}");
            }
        }
    });
}

fn with_state(weak: &Weak<RefCell<WidgetState>>, update: impl FnOnce(&mut WidgetState)) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    let Ok(mut state) = state.try_borrow_mut() else {
        tracing::debug!("widget busy, dropping event");
        return;
    };
    if state.disposed {
        return;
    }
    update(&mut state);
}

fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .unwrap_or(f64::MAX)
}
