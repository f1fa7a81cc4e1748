use std::collections::HashMap;

use crate::effects::HoverEffect;
use crate::error::{PageError, Result};

/// What a target can report: clicks, pointer hover, key presses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub clickable: bool,
    pub hoverable: bool,
    pub keyable: bool,
}

impl Capabilities {
    pub const CLICK_HOVER: Self = Self {
        clickable: true,
        hoverable: true,
        keyable: false,
    };
    pub const CLICK_KEY: Self = Self {
        clickable: true,
        hoverable: false,
        keyable: true,
    };

    pub fn supports(self, kind: EventKind) -> bool {
        match kind {
            EventKind::Click => self.clickable,
            EventKind::PointerEnter | EventKind::PointerLeave => self.hoverable,
            EventKind::KeyDown => self.keyable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    PointerEnter,
    PointerLeave,
    KeyDown,
}

impl EventKind {
    /// DOM event name.
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::PointerEnter => "mouseenter",
            EventKind::PointerLeave => "mouseleave",
            EventKind::KeyDown => "keydown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Document,
    Element(String),
    /// Every element matching a CSS selector when the subscription is made.
    Selector(String),
    /// The currently open quick-actions menu.
    Menu,
}

impl Target {
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Target::Document => Capabilities::CLICK_KEY,
            Target::Element(_) | Target::Selector(_) | Target::Menu => Capabilities::CLICK_HOVER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub target: Target,
    pub kind: EventKind,
}

impl Binding {
    pub fn new(target: Target, kind: EventKind) -> Self {
        Self { target, kind }
    }
}

/// Why the controller asked for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    ThemeToggle,
    MenuTrigger,
    MenuRows,
    MenuDismiss,
    Shortcuts,
    Hover(HoverEffect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub binding: Binding,
    pub purpose: Purpose,
}

#[derive(Debug, Default)]
pub struct Subscriptions {
    next_id: u64,
    active: HashMap<SubscriptionId, Subscription>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, binding: Binding, purpose: Purpose) -> Result<SubscriptionId> {
        if !binding.target.capabilities().supports(binding.kind) {
            return Err(PageError::Unsupported {
                target: binding.target,
                kind: binding.kind,
            });
        }
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.active.insert(id, Subscription { binding, purpose });
        Ok(id)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<Subscription> {
        self.active.remove(&id)
    }

    pub fn get(&self, id: SubscriptionId) -> Option<&Subscription> {
        self.active.get(&id)
    }

    pub fn active_ids(&self) -> Vec<SubscriptionId> {
        let mut ids: Vec<_> = self.active.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Remove everything, returning the ids so the host can detach them.
    pub fn drain(&mut self) -> Vec<SubscriptionId> {
        let mut ids: Vec<_> = self.active.drain().map(|(id, _)| id).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_gate() {
        let mut subs = Subscriptions::new();
        let err = subs
            .subscribe(
                Binding::new(Target::Element("fab".into()), EventKind::KeyDown),
                Purpose::Shortcuts,
            )
            .unwrap_err();
        assert!(matches!(err, PageError::Unsupported { kind: EventKind::KeyDown, .. }));
        assert!(subs
            .subscribe(
                Binding::new(Target::Document, EventKind::PointerEnter),
                Purpose::MenuDismiss
            )
            .is_err());
        assert!(subs.is_empty());

        let cards = Binding::new(Target::Selector(".track-card".into()), EventKind::PointerLeave);
        assert!(subs.subscribe(cards, Purpose::Hover(HoverEffect::Lift)).is_ok());
    }

    #[test]
    fn subscribe_unsubscribe_pair() {
        let mut subs = Subscriptions::new();
        let a = subs
            .subscribe(Binding::new(Target::Document, EventKind::KeyDown), Purpose::Shortcuts)
            .unwrap();
        let b = subs
            .subscribe(Binding::new(Target::Menu, EventKind::Click), Purpose::MenuRows)
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(subs.get(b).unwrap().purpose, Purpose::MenuRows);
        assert!(subs.unsubscribe(b).is_some());
        assert!(subs.unsubscribe(b).is_none());
        assert_eq!(subs.drain(), vec![a]);
        assert!(subs.is_empty());
    }
}
