//! Mobile navigation toggle.
//!
//! The menu is a single open/closed flag. The glue mirrors it onto the page as
//! the body class [`BODY_CLASS`] plus `aria-expanded` and `aria-label` on the
//! toggle button. Every event except the toggle itself can only close the
//! menu, so repeating a close is harmless.

pub const BODY_CLASS: &str = "nav-open";
pub const OPEN_LABEL: &str = "Open menu";
pub const CLOSE_LABEL: &str = "Close menu";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEvent {
    /// The hamburger button was clicked.
    ToggleClicked,
    /// A link inside the panel was followed.
    LinkClicked,
    /// Escape was pressed anywhere.
    Escape,
    /// A click landed outside the site header.
    OutsideClick,
    /// The viewport was resized to this width (CSS px).
    Resized(f64),
}

#[derive(Debug, Clone)]
pub struct NavToggle {
    open: bool,
    breakpoint: f64,
}

impl NavToggle {
    pub fn new(breakpoint: f64) -> Self {
        Self {
            open: false,
            breakpoint,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Apply an event and return the resulting open state.
    pub fn apply(&mut self, event: NavEvent) -> bool {
        self.open = match event {
            NavEvent::ToggleClicked => !self.open,
            NavEvent::LinkClicked | NavEvent::Escape => false,
            NavEvent::OutsideClick => false,
            NavEvent::Resized(width) if width > self.breakpoint => false,
            NavEvent::Resized(_) => self.open,
        };
        self.open
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.open { "true" } else { "false" }
    }

    pub fn aria_label(&self) -> &'static str {
        if self.open { CLOSE_LABEL } else { OPEN_LABEL }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed_with_open_label() {
        let nav = NavToggle::new(640.0);
        assert!(!nav.is_open());
        assert_eq!(nav.aria_expanded(), "false");
        assert_eq!(nav.aria_label(), "Open menu");
    }

    #[test]
    fn toggle_flips() {
        let mut nav = NavToggle::new(640.0);
        assert!(nav.apply(NavEvent::ToggleClicked));
        assert_eq!(nav.aria_expanded(), "true");
        assert_eq!(nav.aria_label(), "Close menu");
        assert!(!nav.apply(NavEvent::ToggleClicked));
    }

    #[test]
    fn dismissals_close() {
        for event in [NavEvent::LinkClicked, NavEvent::Escape, NavEvent::OutsideClick] {
            let mut nav = NavToggle::new(640.0);
            nav.apply(NavEvent::ToggleClicked);
            assert!(!nav.apply(event), "{event:?} should close");
        }
    }

    #[test]
    fn dismissals_are_idempotent_when_closed() {
        let mut nav = NavToggle::new(640.0);
        assert!(!nav.apply(NavEvent::Escape));
        assert!(!nav.apply(NavEvent::Escape));
        assert!(!nav.apply(NavEvent::Resized(1024.0)));
    }

    #[test]
    fn resize_above_breakpoint_closes() {
        let mut nav = NavToggle::new(640.0);
        nav.apply(NavEvent::ToggleClicked);
        assert!(!nav.apply(NavEvent::Resized(641.0)));
    }

    #[test]
    fn resize_at_or_below_breakpoint_keeps_state() {
        let mut nav = NavToggle::new(640.0);
        nav.apply(NavEvent::ToggleClicked);
        assert!(nav.apply(NavEvent::Resized(640.0)));
        assert!(nav.apply(NavEvent::Resized(320.0)));
    }
}
