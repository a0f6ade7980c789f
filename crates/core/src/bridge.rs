use serde::{Deserialize, Serialize};

use crate::error::WidgetResult;
use crate::styles::frame_content_styles;

/// `postMessage` payloads exchanged with the chat frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameMessage {
    /// Outbound: styles for the frame to apply itself.
    InjectStyles { styles: String },
    /// Inbound: the frame finished booting and wants styles (again).
    ReadyForStyles,
}

/// The iframe as seen by the bridge.
pub trait FrameTarget {
    /// Writes a `<style>` into the frame document. Fails with
    /// `WidgetError::InjectionBlocked` when the document is cross-origin.
    fn inject_style(&self, css: &str) -> WidgetResult<()>;
    /// Posts to the frame window with a wildcard target origin.
    fn post_message(&self, message: &FrameMessage) -> WidgetResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionOutcome {
    Direct,
    Posted,
    Failed,
}

/// Best-effort style delivery into the chat frame.
///
/// Attempts are driven by the iframe `load` event and by `READY_FOR_STYLES`
/// messages, in whichever order they arrive. Every attempt is safe to repeat.
#[derive(Debug, Clone)]
pub struct StyleBridge {
    styles: String,
    iframe_loaded: bool,
    attempts: u32,
}

impl Default for StyleBridge {
    fn default() -> Self {
        Self::new(frame_content_styles())
    }
}

impl StyleBridge {
    pub fn new(styles: impl Into<String>) -> Self {
        Self {
            styles: styles.into(),
            iframe_loaded: false,
            attempts: 0,
        }
    }

    pub fn iframe_loaded(&self) -> bool {
        self.iframe_loaded
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn styles(&self) -> &str {
        &self.styles
    }

    pub fn on_frame_load<T: FrameTarget + ?Sized>(&mut self, target: &T) -> InjectionOutcome {
        self.iframe_loaded = true;
        self.attempt(target)
    }

    /// Handles a window message; returns `None` when it triggers nothing.
    pub fn on_message<T: FrameTarget + ?Sized>(
        &mut self,
        message: &FrameMessage,
        target: &T,
    ) -> Option<InjectionOutcome> {
        match message {
            FrameMessage::ReadyForStyles if self.iframe_loaded => Some(self.attempt(target)),
            FrameMessage::ReadyForStyles => {
                tracing::debug!("chat frame asked for styles before load, waiting for load event");
                None
            }
            FrameMessage::InjectStyles { .. } => None,
        }
    }

    fn attempt<T: FrameTarget + ?Sized>(&mut self, target: &T) -> InjectionOutcome {
        self.attempts += 1;

        match target.inject_style(&self.styles) {
            Ok(()) => InjectionOutcome::Direct,
            Err(blocked) => {
                // Cross-origin frames are the normal deployment.
                tracing::debug!("direct frame styling unavailable ({blocked}), posting styles");
                let message = FrameMessage::InjectStyles {
                    styles: self.styles.clone(),
                };
                match target.post_message(&message) {
                    Ok(()) => InjectionOutcome::Posted,
                    Err(error) => {
                        tracing::warn!("failed to deliver styles to chat frame: {error}");
                        InjectionOutcome::Failed
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::error::WidgetError;

    #[derive(Default)]
    struct FakeFrame {
        cross_origin: bool,
        injected: RefCell<Vec<String>>,
        posted: RefCell<Vec<FrameMessage>>,
    }

    impl FrameTarget for FakeFrame {
        fn inject_style(&self, css: &str) -> WidgetResult<()> {
            if self.cross_origin {
                return Err(WidgetError::InjectionBlocked {
                    stage: "fake-inject",
                    details: "SecurityError".to_string(),
                });
            }
            self.injected.borrow_mut().push(css.to_string());
            Ok(())
        }

        fn post_message(&self, message: &FrameMessage) -> WidgetResult<()> {
            self.posted.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    #[test]
    fn wire_format_matches_frame_protocol() {
        let outbound = FrameMessage::InjectStyles {
            styles: "body{}".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&outbound).ok(),
            Some(json!({"type": "INJECT_STYLES", "styles": "body{}"}))
        );

        let inbound: Result<FrameMessage, _> =
            serde_json::from_value(json!({"type": "READY_FOR_STYLES", "extra": 1}));
        assert_eq!(inbound.ok(), Some(FrameMessage::ReadyForStyles));

        let unrelated: Result<FrameMessage, _> =
            serde_json::from_value(json!({"type": "SOMETHING_ELSE"}));
        assert!(unrelated.is_err());
    }

    #[test]
    fn same_origin_frame_is_styled_directly() {
        let frame = FakeFrame::default();
        let mut bridge = StyleBridge::new("html{}");

        assert_eq!(bridge.on_frame_load(&frame), InjectionOutcome::Direct);
        assert!(bridge.iframe_loaded());
        assert_eq!(frame.injected.borrow().as_slice(), ["html{}".to_string()]);
        assert!(frame.posted.borrow().is_empty());
    }

    #[test]
    fn cross_origin_frame_gets_exactly_one_message() {
        let frame = FakeFrame {
            cross_origin: true,
            ..FakeFrame::default()
        };
        let mut bridge = StyleBridge::new("html{}");

        assert_eq!(bridge.on_frame_load(&frame), InjectionOutcome::Posted);
        assert_eq!(
            frame.posted.borrow().as_slice(),
            [FrameMessage::InjectStyles {
                styles: "html{}".to_string()
            }]
        );
    }

    #[test]
    fn ready_before_load_is_ignored() {
        let frame = FakeFrame::default();
        let mut bridge = StyleBridge::default();

        assert_eq!(bridge.on_message(&FrameMessage::ReadyForStyles, &frame), None);
        assert_eq!(bridge.attempts(), 0);
        assert!(frame.injected.borrow().is_empty());
    }

    #[test]
    fn ready_after_load_reinjects() {
        let frame = FakeFrame {
            cross_origin: true,
            ..FakeFrame::default()
        };
        let mut bridge = StyleBridge::default();

        bridge.on_frame_load(&frame);
        assert_eq!(
            bridge.on_message(&FrameMessage::ReadyForStyles, &frame),
            Some(InjectionOutcome::Posted)
        );
        assert_eq!(bridge.attempts(), 2);
        assert_eq!(frame.posted.borrow().len(), 2);
    }

    #[test]
    fn echoed_inject_message_does_not_loop() {
        let frame = FakeFrame::default();
        let mut bridge = StyleBridge::default();
        bridge.on_frame_load(&frame);

        let echoed = FrameMessage::InjectStyles {
            styles: bridge.styles().to_string(),
        };
        assert_eq!(bridge.on_message(&echoed, &frame), None);
        assert_eq!(bridge.attempts(), 1);
    }
}
