/// Body style properties pinned while the chat frame covers a mobile viewport.
pub const SCROLL_LOCK_PROPERTIES: [&str; 5] = ["overflow", "position", "width", "height", "top"];

/// Expand/collapse state of one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisibilityState {
    #[default]
    Collapsed,
    Expanded,
}

impl VisibilityState {
    pub fn from_expanded(expanded: bool) -> Self {
        if expanded {
            Self::Expanded
        } else {
            Self::Collapsed
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }

    /// Container class present in this state.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Collapsed => "collapsed",
            Self::Expanded => "expanded",
        }
    }
}

/// Page scroll offset captured when the body gets pinned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollLockSnapshot {
    pub scroll_position: f64,
}

/// Host effects the state machine drives.
pub trait WidgetSurface {
    /// Leaves exactly `state.class_name()` of the two state classes on the container.
    fn apply_state_class(&mut self, state: VisibilityState);
    fn page_y_offset(&self) -> f64;
    fn set_body_style(&mut self, property: &'static str, value: &str);
    /// Resets an inline body style property to the empty string.
    fn clear_body_style(&mut self, property: &'static str);
    fn scroll_to(&mut self, y: f64);
}

/// Collapsed ⇄ Expanded toggle with mobile scroll locking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisibilityMachine {
    state: VisibilityState,
    scroll_lock: Option<ScrollLockSnapshot>,
}

impl VisibilityMachine {
    pub fn new(initial: VisibilityState) -> Self {
        Self {
            state: initial,
            scroll_lock: None,
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state.is_expanded()
    }

    pub fn scroll_lock(&self) -> Option<ScrollLockSnapshot> {
        self.scroll_lock
    }

    /// Applies the initial state to a freshly built surface.
    pub fn mount<S: WidgetSurface>(&mut self, is_mobile: bool, surface: &mut S) {
        surface.apply_state_class(self.state);
        if self.state.is_expanded() && is_mobile {
            self.lock_scroll(surface);
        }
    }

    /// Flips the state and performs the matching side effects.
    ///
    /// `is_mobile` is read at call time. Collapsing always releases a held
    /// lock, even if the viewport stopped being mobile while expanded.
    pub fn toggle<S: WidgetSurface>(
        &mut self,
        is_mobile: bool,
        surface: &mut S,
    ) -> VisibilityState {
        self.state = self.state.toggled();
        surface.apply_state_class(self.state);

        match self.state {
            VisibilityState::Expanded if is_mobile => self.lock_scroll(surface),
            VisibilityState::Expanded => {}
            VisibilityState::Collapsed => self.release(surface),
        }

        tracing::debug!(state = ?self.state, is_mobile, "chat widget toggled");
        self.state
    }

    /// Undoes a held scroll lock, restoring the captured offset.
    pub fn release<S: WidgetSurface>(&mut self, surface: &mut S) {
        let Some(snapshot) = self.scroll_lock.take() else {
            return;
        };

        for property in SCROLL_LOCK_PROPERTIES {
            surface.clear_body_style(property);
        }
        surface.scroll_to(snapshot.scroll_position);
    }

    fn lock_scroll<S: WidgetSurface>(&mut self, surface: &mut S) {
        // Re-locking would capture the pinned offset (0) instead of the real one.
        if self.scroll_lock.is_some() {
            return;
        }

        let scroll_position = surface.page_y_offset();
        surface.set_body_style("overflow", "hidden");
        surface.set_body_style("position", "fixed");
        surface.set_body_style("width", "100%");
        surface.set_body_style("height", "100%");
        surface.set_body_style("top", &format!("-{scroll_position}px"));
        self.scroll_lock = Some(ScrollLockSnapshot { scroll_position });
    }
}
