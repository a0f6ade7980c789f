#![deny(unsafe_code)]

//! Platform-independent pieces of the embeddable chat widget.
//!
//! Everything that touches the browser goes through the [`WidgetSurface`],
//! [`ButtonSurface`] and [`FrameTarget`] traits; `chatwidget-wasm` implements
//! them over web-sys.

pub mod branding;
/// Cross-frame style delivery protocol.
pub mod bridge;
pub mod config;
pub mod device;
pub mod error;
pub mod markup;
/// Host-page and frame stylesheets.
pub mod styles;
/// Expand/collapse state machine and mobile scroll locking.
pub mod visibility;

pub use branding::{AgentBranding, ButtonSurface, apply_branding, parse_agent_content};
pub use bridge::{FrameMessage, FrameTarget, InjectionOutcome, StyleBridge};
pub use config::{Position, WidgetConfig};
pub use device::{DeviceProbe, MOBILE_BREAKPOINT_PX, detect_mobile, is_mobile_user_agent};
pub use error::{WidgetError, WidgetResult};
pub use styles::{frame_content_styles, widget_stylesheet};
pub use visibility::{
    SCROLL_LOCK_PROPERTIES, ScrollLockSnapshot, VisibilityMachine, VisibilityState, WidgetSurface,
};
