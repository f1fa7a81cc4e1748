//! Cosmetic page behavior: scroll reveal, hover feedback, click-to-copy.

pub const REVEAL_SELECTOR: &str = ".card, .stats-card, .track-card";
pub const REVEAL_CLASS: &str = "animate-in";
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

pub const PULSE_SELECTOR: &str = ".stats-card";
pub const PULSE_CLASS: &str = "pulse";

pub const LIFT_SELECTOR: &str = ".track-card";
pub const LIFT_ON: &str = "translateY(-5px) scale(1.02)";
pub const LIFT_OFF: &str = "translateY(0) scale(1)";

/// Card feedback while the pointer is over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverEffect {
    /// `.stats-card` pulses.
    Pulse,
    /// `.track-card` lifts.
    Lift,
}

/// What to do to the hovered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    AddClass(&'static str),
    RemoveClass(&'static str),
    Transform(&'static str),
}

impl HoverEffect {
    pub const ALL: [HoverEffect; 2] = [HoverEffect::Pulse, HoverEffect::Lift];

    pub fn selector(self) -> &'static str {
        match self {
            HoverEffect::Pulse => PULSE_SELECTOR,
            HoverEffect::Lift => LIFT_SELECTOR,
        }
    }

    pub fn change(self, entering: bool) -> HoverChange {
        match (self, entering) {
            (HoverEffect::Pulse, true) => HoverChange::AddClass(PULSE_CLASS),
            (HoverEffect::Pulse, false) => HoverChange::RemoveClass(PULSE_CLASS),
            (HoverEffect::Lift, true) => HoverChange::Transform(LIFT_ON),
            (HoverEffect::Lift, false) => HoverChange::Transform(LIFT_OFF),
        }
    }
}

pub const COPY_ATTRIBUTE: &str = "data-copy";
pub const COPY_MESSAGE: &str = "Copied to clipboard!";

pub const STYLE_ELEMENT_ID: &str = "sonify-keyframes";

pub const KEYFRAMES_CSS: &str = r#"
@keyframes slideIn {
    from { opacity: 0; transform: translateY(20px); }
    to { opacity: 1; transform: translateY(0); }
}
@keyframes slideInRight {
    from { opacity: 0; transform: translateX(100%); }
    to { opacity: 1; transform: translateX(0); }
}
@keyframes slideOutRight {
    from { opacity: 1; transform: translateX(0); }
    to { opacity: 0; transform: translateX(100%); }
}
.animate-in { animation: slideIn 0.6s ease forwards; }
.card, .stats-card, .track-card { opacity: 0; transform: translateY(20px); }
.card.animate-in, .stats-card.animate-in, .track-card.animate-in { opacity: 1; transform: translateY(0); }
.quick-action-item:hover { background-color: var(--bg-secondary); transform: translateX(5px); }
"#;

pub const MENU_CSS: &str = "position: fixed; bottom: 5rem; right: 2rem; background: var(--card-bg); \
border-radius: 15px; box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2); padding: 1rem; z-index: 999; \
min-width: 200px; border: 1px solid var(--border-color); animation: slideIn 0.3s ease;";

pub const MENU_ITEM_CSS: &str = "display: flex; align-items: center; padding: 0.75rem; cursor: pointer; \
border-radius: 8px; transition: all 0.2s ease; color: var(--text-primary); margin-bottom: 0.5rem;";

pub const TOAST_CSS: &str = "position: fixed; top: 2rem; right: 2rem; background: var(--card-bg); \
color: var(--text-primary); padding: 1rem 1.5rem; border-radius: 10px; \
box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2); z-index: 10000; \
border-left: 4px solid var(--spotify-green); animation: slideInRight 0.3s ease;";

/// Exit animation declaration for a toast leaving over `exit_ms`.
pub fn toast_exit_animation(exit_ms: u32) -> String {
    format!("slideOutRight {:.1}s ease", f64::from(exit_ms) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_animation_matches_timing() {
        assert_eq!(toast_exit_animation(300), "slideOutRight 0.3s ease");
        assert!(KEYFRAMES_CSS.contains("@keyframes slideOutRight"));
    }

    #[test]
    fn hover_enter_and_leave_undo_each_other() {
        assert_eq!(HoverEffect::Pulse.change(true), HoverChange::AddClass("pulse"));
        assert_eq!(HoverEffect::Pulse.change(false), HoverChange::RemoveClass("pulse"));
        assert_eq!(
            HoverEffect::Lift.change(true),
            HoverChange::Transform("translateY(-5px) scale(1.02)")
        );
        assert_eq!(HoverEffect::Lift.change(false), HoverChange::Transform(LIFT_OFF));
    }
}
