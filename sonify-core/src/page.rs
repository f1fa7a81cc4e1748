use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::charts::{ChartBackend, ChartRegistry, ChartSource, DiscoveryReport};
use crate::config::PageConfig;
use crate::effects::{HoverChange, HoverEffect};
use crate::error::{PageError, Result};
use crate::events::{Binding, EventKind, Purpose, SubscriptionId, Subscriptions, Target};
use crate::export::{ExportBundle, ExportFile, ExportOutcome};
use crate::keys::{self, KeyChord, Shortcut};
use crate::menu::{ActionTarget, ClickHit, MenuCommand, QuickAction, QuickMenu, QUICK_ACTIONS};
use crate::notify::{Severity, Toast};
use crate::theme::{PreferenceStore, ThemePreference, ThemeStore};

/// Side effects the controller asks of the page it runs in.
pub trait PageHost {
    fn now(&self) -> DateTime<Utc>;
    /// Set the document theme attribute and the toggle icon.
    fn apply_theme(&mut self, theme: ThemePreference, icon_class: &str);
    fn notify(&mut self, toast: &Toast);
    fn download(&mut self, file: &ExportFile) -> Result<()>;
    fn navigate(&mut self, url: &str);
    fn reload(&mut self);
    /// Click an element as the user would, running its own handlers.
    fn click_element(&mut self, id: &str) -> bool;
    fn render_menu(&mut self, actions: &[QuickAction]) -> Result<()>;
    fn remove_menu(&mut self) -> bool;
    /// Deliver `binding` events back through `PageController::dispatch` under `id`.
    fn listen(&mut self, id: SubscriptionId, binding: &Binding) -> Result<()>;
    fn release(&mut self, id: SubscriptionId);
    /// Call `PageController::on_timer` with `timer` after `delay_ms`.
    fn schedule(&mut self, delay_ms: u32, timer: PageTimer);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Click(ClickHit),
    PointerEnter,
    PointerLeave,
    Key(KeyChord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTimer {
    ArmMenuDismissal(u64),
}

/// What the listener should do to the DOM event after dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub prevent_default: bool,
    /// Applied to the element the listener sits on.
    pub hover: Option<HoverChange>,
}

/// How the document is going away when `pagehide` fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageExit {
    /// Kept in the back/forward cache; it comes back with its listeners.
    Cached,
    Unloaded,
}

impl PageExit {
    pub fn from_persisted(persisted: bool) -> Self {
        if persisted {
            PageExit::Cached
        } else {
            PageExit::Unloaded
        }
    }

    pub fn tears_down(self) -> bool {
        self == PageExit::Unloaded
    }
}

/// All page state, owned in one place and mounted/unmounted explicitly.
pub struct PageController<S, B> {
    config: PageConfig,
    theme: ThemeStore<S>,
    charts: ChartRegistry,
    backend: B,
    menu: QuickMenu,
    subscriptions: Subscriptions,
    mounted: bool,
}

impl<S: PreferenceStore, B: ChartBackend> PageController<S, B> {
    pub fn new(config: PageConfig, store: S, backend: B) -> Self {
        let theme = ThemeStore::new(store, config.theme_key.clone());
        Self {
            config,
            theme,
            charts: ChartRegistry::new(),
            backend,
            menu: QuickMenu::default(),
            subscriptions: Subscriptions::new(),
            mounted: false,
        }
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    pub fn menu(&self) -> &QuickMenu {
        &self.menu
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount<H: PageHost>(
        &mut self,
        sources: impl IntoIterator<Item = ChartSource>,
        host: &mut H,
    ) -> Result<DiscoveryReport> {
        if self.mounted {
            return Err(PageError::AlreadyMounted);
        }
        let report = self.charts.discover(sources, &mut self.backend, &self.config);
        log::info!(
            "mounted {} charts ({} failed)",
            report.registered.len(),
            report.failed.len()
        );
        let theme = self.theme.preference();
        self.apply_theme(theme, host);

        let toggle = Target::Element(self.config.theme_toggle_id.clone());
        let fab = Target::Element(self.config.fab_id.clone());
        let mut bindings = vec![
            (Binding::new(toggle, EventKind::Click), Purpose::ThemeToggle),
            (Binding::new(fab, EventKind::Click), Purpose::MenuTrigger),
            (Binding::new(Target::Document, EventKind::KeyDown), Purpose::Shortcuts),
        ];
        for effect in HoverEffect::ALL {
            let cards = Target::Selector(effect.selector().to_string());
            for kind in [EventKind::PointerEnter, EventKind::PointerLeave] {
                bindings.push((Binding::new(cards.clone(), kind), Purpose::Hover(effect)));
            }
        }
        for (binding, purpose) in bindings {
            // Pages without a toggle, FAB or cards still get the rest.
            if let Err(err) = self.subscribe(binding, purpose, host) {
                log::debug!("{purpose:?} not bound: {err}");
            }
        }
        self.mounted = true;
        Ok(report)
    }

    pub fn unmount<H: PageHost>(&mut self, host: &mut H) {
        self.close_menu(host);
        for id in self.subscriptions.drain() {
            host.release(id);
        }
        self.charts.clear();
        self.mounted = false;
    }

    fn subscribe<H: PageHost>(
        &mut self,
        binding: Binding,
        purpose: Purpose,
        host: &mut H,
    ) -> Result<SubscriptionId> {
        let id = self.subscriptions.subscribe(binding.clone(), purpose)?;
        if let Err(err) = host.listen(id, &binding) {
            self.subscriptions.unsubscribe(id);
            return Err(err);
        }
        Ok(id)
    }

    fn unsubscribe<H: PageHost>(&mut self, id: SubscriptionId, host: &mut H) {
        if self.subscriptions.unsubscribe(id).is_some() {
            host.release(id);
        }
    }

    // ---------- Theme -------------------------------------------------------

    pub fn theme(&self) -> ThemePreference {
        self.theme.preference()
    }

    pub fn apply_theme<H: PageHost>(&mut self, theme: ThemePreference, host: &mut H) {
        host.apply_theme(theme, theme.icon_class());
        self.charts.update_all_theme(&mut self.backend, theme);
    }

    pub fn set_theme<H: PageHost>(&mut self, theme: ThemePreference, host: &mut H) {
        self.theme.set_preference(theme);
        self.apply_theme(theme, host);
    }

    pub fn toggle_theme<H: PageHost>(&mut self, host: &mut H) -> ThemePreference {
        let next = self.theme.toggle();
        self.apply_theme(next, host);
        next
    }

    // ---------- Charts, notifications, export -------------------------------

    pub fn create_custom_chart(
        &mut self,
        id: &str,
        data: Vec<Value>,
        options: Map<String, Value>,
    ) -> bool {
        let theme = self.theme.preference();
        self.charts
            .create_custom(&mut self.backend, id, data, options, theme)
    }

    pub fn notify<H: PageHost>(&self, host: &mut H, message: &str, severity: Severity) {
        host.notify(&Toast::new(message, severity));
    }

    pub fn export_all<H: PageHost>(&mut self, host: &mut H) -> ExportOutcome {
        let outcome = match ExportBundle::collect(&self.charts, self.theme.preference(), host.now())
        {
            None => ExportOutcome::Empty,
            Some(bundle) => {
                let result = bundle
                    .to_file(&self.config.export_prefix)
                    .and_then(|file| host.download(&file).map(|()| file.file_name));
                match result {
                    Ok(file_name) => ExportOutcome::Exported {
                        file_name,
                        charts: bundle.charts.len(),
                    },
                    Err(err) => {
                        log::error!("chart export failed: {err}");
                        ExportOutcome::Failed
                    }
                }
            }
        };
        host.notify(&outcome.toast());
        outcome
    }

    // ---------- Quick actions menu ------------------------------------------

    /// Replace any open menu with a fresh one.
    pub fn open_menu<H: PageHost>(&mut self, host: &mut H) -> Result<u64> {
        self.close_menu(host);
        host.render_menu(&QUICK_ACTIONS)?;
        let rows = self
            .subscribe(Binding::new(Target::Menu, EventKind::Click), Purpose::MenuRows, host)
            .map_err(|err| log::warn!("menu rows not clickable: {err}"))
            .ok();
        let generation = self.menu.opened(rows);
        // Arm the outside-click listener late so the opening click is not seen.
        host.schedule(
            self.config.dismiss_arm_delay_ms,
            PageTimer::ArmMenuDismissal(generation),
        );
        Ok(generation)
    }

    pub fn close_menu<H: PageHost>(&mut self, host: &mut H) -> bool {
        let Some(ids) = self.menu.closed() else {
            return false;
        };
        for id in ids {
            self.unsubscribe(id, host);
        }
        host.remove_menu();
        true
    }

    pub fn select_action<H: PageHost>(&mut self, index: usize, host: &mut H) {
        let Some(action) = QUICK_ACTIONS.get(index) else {
            return;
        };
        self.close_menu(host);
        match action.target {
            ActionTarget::Navigate(url) => host.navigate(url),
            ActionTarget::Command(MenuCommand::Export) => {
                self.export_all(host);
            }
            ActionTarget::Command(MenuCommand::Refresh) => host.reload(),
        }
    }

    pub fn on_timer<H: PageHost>(&mut self, timer: PageTimer, host: &mut H) {
        match timer {
            PageTimer::ArmMenuDismissal(generation) => {
                if !self.menu.awaiting_dismiss(generation) {
                    return;
                }
                match self.subscribe(
                    Binding::new(Target::Document, EventKind::Click),
                    Purpose::MenuDismiss,
                    host,
                ) {
                    Ok(id) => self.menu.armed(id),
                    Err(err) => log::warn!("menu dismissal not armed: {err}"),
                }
            }
        }
    }

    // ---------- Event dispatch ----------------------------------------------

    pub fn dispatch<H: PageHost>(
        &mut self,
        id: SubscriptionId,
        event: PageEvent,
        host: &mut H,
    ) -> Dispatch {
        let Some(purpose) = self.subscriptions.get(id).map(|s| s.purpose) else {
            // Listener released while the event was in flight.
            return Dispatch::default();
        };
        match (purpose, event) {
            (Purpose::ThemeToggle, PageEvent::Click(_)) => {
                self.toggle_theme(host);
            }
            (Purpose::MenuTrigger, PageEvent::Click(_)) => {
                if let Err(err) = self.open_menu(host) {
                    log::error!("quick actions menu failed: {err}");
                }
            }
            (Purpose::MenuRows, PageEvent::Click(hit)) => {
                if let Some(row) = hit.row {
                    self.select_action(row, host);
                }
            }
            (Purpose::MenuDismiss, PageEvent::Click(hit)) => {
                if !hit.inside_menu && !hit.inside_trigger {
                    self.close_menu(host);
                }
            }
            (Purpose::Shortcuts, PageEvent::Key(chord)) => {
                if let Some(shortcut) = keys::route(&chord) {
                    self.run_shortcut(shortcut, host);
                    return Dispatch {
                        prevent_default: shortcut.prevents_default(),
                        ..Dispatch::default()
                    };
                }
            }
            (Purpose::Hover(effect), PageEvent::PointerEnter) => {
                return Dispatch {
                    hover: Some(effect.change(true)),
                    ..Dispatch::default()
                };
            }
            (Purpose::Hover(effect), PageEvent::PointerLeave) => {
                return Dispatch {
                    hover: Some(effect.change(false)),
                    ..Dispatch::default()
                };
            }
            (purpose, event) => log::debug!("{purpose:?} ignores {event:?}"),
        }
        Dispatch::default()
    }

    fn run_shortcut<H: PageHost>(&mut self, shortcut: Shortcut, host: &mut H) {
        match shortcut {
            Shortcut::ToggleTheme => {
                let toggle = self.config.theme_toggle_id.clone();
                if !host.click_element(&toggle) {
                    log::debug!("no `{toggle}` element to click");
                }
            }
            Shortcut::Export => {
                self.export_all(host);
            }
            Shortcut::DismissMenu => {
                self.close_menu(host);
            }
        }
    }
}
