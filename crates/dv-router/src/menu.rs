//! Mobile sidebar visibility.
//!
//! Independent of routing: a boolean toggled by the menu control and
//! collapsed by a handful of viewport and click events.

/// Open/closed state of the sidebar drawer on narrow viewports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
    breakpoint: u32,
}

impl MobileMenu {
    /// Closed menu collapsing at `breakpoint` px.
    #[must_use]
    pub fn new(breakpoint: u32) -> Self {
        Self {
            open: false,
            breakpoint,
        }
    }

    /// Whether the drawer is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether `width` counts as a narrow viewport.
    #[must_use]
    pub fn is_narrow(&self, width: u32) -> bool {
        width <= self.breakpoint
    }

    /// Menu control pressed. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// A navigation link was activated.
    ///
    /// Collapses the drawer on narrow viewports only.
    pub fn link_activated(&mut self, viewport_width: u32) {
        if self.is_narrow(viewport_width) {
            self.open = false;
        }
    }

    /// The viewport was resized; widening past the breakpoint collapses it.
    pub fn viewport_resized(&mut self, viewport_width: u32) {
        if !self.is_narrow(viewport_width) {
            self.open = false;
        }
    }

    /// A click landed outside the sidebar and the menu control.
    pub fn clicked_outside(&mut self) {
        self.open = false;
    }
}
