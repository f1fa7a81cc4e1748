//! Recording doubles for the browser and the charting library.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::charts::{ChartBackend, PlotConfig};
use crate::error::{PageError, Result};
use crate::events::{Binding, SubscriptionId, Target};
use crate::export::ExportFile;
use crate::menu::QuickAction;
use crate::notify::Toast;
use crate::page::{PageHost, PageTimer};
use crate::theme::{PreferenceStore, ThemePreference};

/// Storage that refuses every read and write, like a browser with
/// `localStorage` disabled.
#[derive(Debug, Default)]
pub struct BrokenStore;

impl PreferenceStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(PageError::Storage("quota".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(PageError::Storage("quota".into()))
    }
}

#[derive(Debug, Clone)]
pub struct Plot {
    pub data: Vec<Value>,
    pub layout: Value,
    pub config: PlotConfig,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub plots: HashMap<String, Plot>,
    pub relayouts: Vec<(String, Value)>,
    failing: Vec<String>,
}

impl RecordingBackend {
    pub fn failing_on(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl ChartBackend for RecordingBackend {
    fn new_plot(
        &mut self,
        id: &str,
        data: &[Value],
        layout: &Value,
        config: &PlotConfig,
    ) -> Result<()> {
        if self.failing.iter().any(|f| f == id) {
            return Err(PageError::Render {
                id: id.to_string(),
                message: "Plotly is not defined".into(),
            });
        }
        self.plots.insert(
            id.to_string(),
            Plot {
                data: data.to_vec(),
                layout: layout.clone(),
                config: config.clone(),
            },
        );
        Ok(())
    }

    fn relayout(&mut self, id: &str, update: &Value) -> Result<()> {
        self.relayouts.push((id.to_string(), update.clone()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub themes: Vec<(ThemePreference, String)>,
    pub toasts: Vec<Toast>,
    pub downloads: Vec<ExportFile>,
    pub navigations: Vec<String>,
    pub reloads: usize,
    pub clicked: Vec<String>,
    /// Menus currently in the document.
    pub menus: usize,
    pub listening: HashMap<SubscriptionId, Binding>,
    pub released: Vec<SubscriptionId>,
    pub scheduled: Vec<(u32, PageTimer)>,
    /// Element ids the page does not contain.
    pub missing: Vec<String>,
    pub fail_downloads: bool,
}

impl PageHost for RecordingHost {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 15, 0).unwrap()
    }

    fn apply_theme(&mut self, theme: ThemePreference, icon_class: &str) {
        self.themes.push((theme, icon_class.to_string()));
    }

    fn notify(&mut self, toast: &Toast) {
        self.toasts.push(toast.clone());
    }

    fn download(&mut self, file: &ExportFile) -> Result<()> {
        if self.fail_downloads {
            return Err(PageError::Dom("blob URL refused".into()));
        }
        self.downloads.push(file.clone());
        Ok(())
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }

    fn click_element(&mut self, id: &str) -> bool {
        if self.missing.iter().any(|m| m == id) {
            return false;
        }
        self.clicked.push(id.to_string());
        true
    }

    fn render_menu(&mut self, _actions: &[QuickAction]) -> Result<()> {
        self.menus += 1;
        Ok(())
    }

    fn remove_menu(&mut self) -> bool {
        let had = self.menus > 0;
        self.menus = self.menus.saturating_sub(1);
        had
    }

    fn listen(&mut self, id: SubscriptionId, binding: &Binding) -> Result<()> {
        if let Target::Element(el) = &binding.target {
            if self.missing.contains(el) {
                return Err(PageError::MissingElement(el.clone()));
            }
        }
        self.listening.insert(id, binding.clone());
        Ok(())
    }

    fn release(&mut self, id: SubscriptionId) {
        self.listening.remove(&id);
        self.released.push(id);
    }

    fn schedule(&mut self, delay_ms: u32, timer: PageTimer) {
        self.scheduled.push((delay_ms, timer));
    }
}
