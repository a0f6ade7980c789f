/// Viewports at or below this width are treated as mobile.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

const MOBILE_USER_AGENT_MARKERS: [&str; 4] = ["iphone", "ipad", "ipod", "android"];

/// Returns true when the user agent names a handheld platform.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let user_agent = user_agent.to_ascii_lowercase();
    MOBILE_USER_AGENT_MARKERS
        .iter()
        .any(|marker| user_agent.contains(marker))
}

/// Combined user-agent OR viewport-width heuristic.
pub fn detect_mobile(user_agent: &str, inner_width: f64) -> bool {
    is_mobile_user_agent(user_agent) || inner_width <= MOBILE_BREAKPOINT_PX
}

/// Device class flag owned by one widget.
///
/// The flag is recomputed on every resize and read lazily by whoever needs it;
/// nothing is notified when it flips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProbe {
    user_agent: String,
    is_mobile: bool,
}

impl DeviceProbe {
    pub fn new(user_agent: impl Into<String>, inner_width: f64) -> Self {
        let user_agent = user_agent.into();
        let is_mobile = detect_mobile(&user_agent, inner_width);
        Self {
            user_agent,
            is_mobile,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    /// Re-evaluates the heuristic for a new viewport width, returning the updated flag.
    pub fn refresh(&mut self, inner_width: f64) -> bool {
        self.is_mobile = detect_mobile(&self.user_agent, inner_width);
        self.is_mobile
    }
}
