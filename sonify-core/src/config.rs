use serde::{Deserialize, Serialize};

use crate::error::{PageError, Result};
use crate::notify::ToastTimeline;

/// Element ids, storage keys and timings the page controller relies on.
///
/// Every field has a default matching the stock dashboard templates, so a host
/// only needs to override what its markup changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub theme_key: String,
    pub theme_attribute: String,
    pub theme_toggle_id: String,
    pub theme_icon_id: String,
    pub chart_suffix: String,
    pub chart_data_attribute: String,
    pub fab_id: String,
    pub menu_class: String,
    pub export_prefix: String,
    pub toast_display_ms: u32,
    pub toast_exit_ms: u32,
    pub dismiss_arm_delay_ms: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            theme_key: "theme".to_string(),
            theme_attribute: "data-theme".to_string(),
            theme_toggle_id: "theme-toggle".to_string(),
            theme_icon_id: "theme-icon".to_string(),
            chart_suffix: "-chart".to_string(),
            chart_data_attribute: "data-chart-data".to_string(),
            fab_id: "fab".to_string(),
            menu_class: "quick-actions-menu".to_string(),
            export_prefix: "sonify_charts".to_string(),
            toast_display_ms: 3000,
            toast_exit_ms: 300,
            dismiss_arm_delay_ms: 100,
        }
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PageError::Config(e.to_string()))
    }

    pub fn toast_timeline(&self) -> ToastTimeline {
        ToastTimeline {
            display_ms: self.toast_display_ms,
            exit_ms: self.toast_exit_ms,
        }
    }

    /// True when `id` names a chart container, as `[id$="-chart"]` would.
    pub fn is_chart_container(&self, id: &str) -> bool {
        id.ends_with(&self.chart_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = PageConfig::from_json(r#"{"fab_id":"quick-fab","toast_display_ms":1500}"#)
            .unwrap();
        assert_eq!(cfg.fab_id, "quick-fab");
        assert_eq!(cfg.toast_display_ms, 1500);
        assert_eq!(cfg.theme_key, "theme");
        assert_eq!(cfg.toast_exit_ms, 300);
    }

    #[test]
    fn toasts_leave_after_display_and_exit() {
        let timeline = PageConfig::default().toast_timeline();
        assert_eq!(timeline.display_ms, 3000);
        assert_eq!(timeline.removed_after_ms(), 3300);

        let quick = PageConfig::from_json(r#"{"toast_display_ms":1000,"toast_exit_ms":200}"#)
            .unwrap()
            .toast_timeline();
        assert_eq!(quick.removed_after_ms(), 1200);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = PageConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, PageError::Config(_)));
    }

    #[test]
    fn chart_suffix_match() {
        let cfg = PageConfig::default();
        assert!(cfg.is_chart_container("heatmap-chart"));
        assert!(cfg.is_chart_container("-chart"));
        assert!(!cfg.is_chart_container("chart-heatmap"));
    }
}
