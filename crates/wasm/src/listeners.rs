use chatwidget_core::{WidgetError, WidgetResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget};

use crate::utils::describe_js_value;

/// A DOM event listener that unregisters itself when dropped.
pub(crate) struct EventListener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub(crate) fn new<F>(
        target: &EventTarget,
        event_type: &'static str,
        handler: F,
    ) -> WidgetResult<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
            .map_err(|error| WidgetError::dom("add-event-listener", describe_js_value(&error)))?;

        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }

    pub(crate) fn event_type(&self) -> &'static str {
        self.event_type
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let callback = self.callback.as_ref().unchecked_ref();
        if let Err(error) = self
            .target
            .remove_event_listener_with_callback(self.event_type, callback)
        {
            tracing::warn!(
                "failed to remove '{}' listener: {}",
                self.event_type,
                describe_js_value(&error)
            );
        }
    }
}
