use crate::events::SubscriptionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Export,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    Navigate(&'static str),
    Command(MenuCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub icon: &'static str,
    pub text: &'static str,
    pub target: ActionTarget,
}

pub const QUICK_ACTIONS: [QuickAction; 5] = [
    QuickAction {
        icon: "fas fa-chart-bar",
        text: "View Charts",
        target: ActionTarget::Navigate("/visualizations"),
    },
    QuickAction {
        icon: "fas fa-brain",
        text: "Mood Analysis",
        target: ActionTarget::Navigate("/mood-analysis"),
    },
    QuickAction {
        icon: "fas fa-chart-pie",
        text: "Music Insights",
        target: ActionTarget::Navigate("/insights"),
    },
    QuickAction {
        icon: "fas fa-download",
        text: "Export Data",
        target: ActionTarget::Command(MenuCommand::Export),
    },
    QuickAction {
        icon: "fas fa-sync",
        text: "Refresh Data",
        target: ActionTarget::Command(MenuCommand::Refresh),
    },
];

/// Where a click on the page landed relative to the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickHit {
    pub inside_menu: bool,
    pub inside_trigger: bool,
    /// Row index when the click hit a menu row.
    pub row: Option<usize>,
}

impl ClickHit {
    pub fn outside() -> Self {
        Self::default()
    }

    pub fn row(index: usize) -> Self {
        Self {
            inside_menu: true,
            inside_trigger: false,
            row: Some(index),
        }
    }

    pub fn trigger() -> Self {
        Self {
            inside_trigger: true,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
struct OpenMenu {
    generation: u64,
    rows: Option<SubscriptionId>,
    dismiss: Option<SubscriptionId>,
}

/// Open/closed state of the quick-actions menu and the subscriptions that
/// live exactly as long as it does.
#[derive(Debug, Default)]
pub struct QuickMenu {
    open: Option<OpenMenu>,
    generation: u64,
}

impl QuickMenu {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub(crate) fn opened(&mut self, rows: Option<SubscriptionId>) -> u64 {
        self.generation += 1;
        self.open = Some(OpenMenu {
            generation: self.generation,
            rows,
            dismiss: None,
        });
        self.generation
    }

    /// True when `generation` is open and its outside-click listener is not
    /// armed yet.
    pub(crate) fn awaiting_dismiss(&self, generation: u64) -> bool {
        matches!(&self.open, Some(m) if m.generation == generation && m.dismiss.is_none())
    }

    pub(crate) fn armed(&mut self, id: SubscriptionId) {
        if let Some(menu) = self.open.as_mut() {
            menu.dismiss = Some(id);
        }
    }

    /// Close the menu, returning the subscriptions to release.
    pub(crate) fn closed(&mut self) -> Option<Vec<SubscriptionId>> {
        self.open
            .take()
            .map(|m| m.rows.into_iter().chain(m.dismiss).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_action_list() {
        let urls: Vec<_> = QUICK_ACTIONS
            .iter()
            .filter_map(|a| match a.target {
                ActionTarget::Navigate(url) => Some(url),
                ActionTarget::Command(_) => None,
            })
            .collect();
        assert_eq!(urls, vec!["/visualizations", "/mood-analysis", "/insights"]);
        assert_eq!(
            QUICK_ACTIONS[3].target,
            ActionTarget::Command(MenuCommand::Export)
        );
    }

    #[test]
    fn close_returns_menu_subscriptions() {
        let mut menu = QuickMenu::default();
        let gen = menu.opened(Some(SubscriptionId(4)));
        assert!(menu.awaiting_dismiss(gen));
        menu.armed(SubscriptionId(9));
        assert!(!menu.awaiting_dismiss(gen));
        assert_eq!(
            menu.closed(),
            Some(vec![SubscriptionId(4), SubscriptionId(9)])
        );
        assert!(!menu.is_open());
        assert_eq!(menu.closed(), None);
    }

    #[test]
    fn stale_generation_never_arms() {
        let mut menu = QuickMenu::default();
        let first = menu.opened(None);
        menu.closed();
        let second = menu.opened(None);
        assert!(!menu.awaiting_dismiss(first));
        assert!(menu.awaiting_dismiss(second));
    }
}
