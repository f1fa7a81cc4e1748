use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::charts::ChartRegistry;
use crate::error::Result;
use crate::notify::{Severity, Toast};
use crate::theme::ThemePreference;

pub const EXPORT_MIME: &str = "application/json";

pub const EXPORT_OK: &str = "Charts exported successfully!";
pub const EXPORT_EMPTY: &str = "No charts available to export";
pub const EXPORT_FAILED: &str = "Export failed";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedChart {
    pub id: String,
    pub data: Vec<Value>,
    pub layout: Value,
}

/// Snapshot of every rendered chart, written out as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub charts: Vec<ExportedChart>,
    #[serde(serialize_with = "iso_millis")]
    pub export_date: DateTime<Utc>,
    pub theme: ThemePreference,
}

fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// A file ready to hand to the browser's download machinery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime: &'static str,
    pub contents: String,
}

impl ExportBundle {
    /// `None` when there is nothing to export.
    pub fn collect(
        registry: &ChartRegistry,
        theme: ThemePreference,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        if registry.is_empty() {
            return None;
        }
        let charts = registry
            .handles()
            .into_iter()
            .map(|h| ExportedChart {
                id: h.id.clone(),
                data: h.data.clone(),
                layout: h.layout.clone(),
            })
            .collect();
        Some(Self {
            charts,
            export_date: now,
            theme,
        })
    }

    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}_{}.json", prefix, self.export_date.format("%Y-%m-%d"))
    }

    pub fn to_file(&self, prefix: &str) -> Result<ExportFile> {
        Ok(ExportFile {
            file_name: self.file_name(prefix),
            mime: EXPORT_MIME,
            contents: serde_json::to_string_pretty(self)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported { file_name: String, charts: usize },
    Empty,
    Failed,
}

impl ExportOutcome {
    /// The toast telling the user how the export went.
    pub fn toast(&self) -> Toast {
        match self {
            ExportOutcome::Exported { .. } => Toast::new(EXPORT_OK, Severity::Success),
            ExportOutcome::Empty => Toast::new(EXPORT_EMPTY, Severity::Warning),
            ExportOutcome::Failed => Toast::new(EXPORT_FAILED, Severity::Warning),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartHandle;
    use chrono::TimeZone;
    use serde_json::json;

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 30, 5).unwrap()
    }

    #[test]
    fn empty_registry_has_no_bundle() {
        assert!(ExportBundle::collect(&ChartRegistry::new(), ThemePreference::Light, at_noon())
            .is_none());
    }

    #[test]
    fn bundle_document_shape() {
        let mut registry = ChartRegistry::new();
        registry.insert(ChartHandle {
            id: "top-tracks-chart".into(),
            data: vec![json!({"type": "bar"})],
            layout: json!({"title": "Top tracks"}),
        });
        let bundle = ExportBundle::collect(&registry, ThemePreference::Dark, at_noon()).unwrap();
        let file = bundle.to_file("sonify_charts").unwrap();
        assert_eq!(file.file_name, "sonify_charts_2026-10-19.json");
        assert_eq!(file.mime, "application/json");

        let doc: Value = serde_json::from_str(&file.contents).unwrap();
        assert_eq!(doc["theme"], "dark");
        assert_eq!(doc["charts"].as_array().unwrap().len(), 1);
        assert_eq!(doc["charts"][0]["id"], "top-tracks-chart");
        assert_eq!(doc["charts"][0]["layout"]["title"], "Top tracks");
        let stamp = doc["exportDate"].as_str().unwrap();
        assert_eq!(stamp, "2026-10-19T12:30:05.000Z");
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
        assert!(file.contents.contains("\n  \"charts\""));
    }

    #[test]
    fn nothing_to_export_still_warns() {
        assert_eq!(ExportOutcome::Empty.toast(), Toast::new(EXPORT_EMPTY, Severity::Warning));
        assert_eq!(ExportOutcome::Failed.toast().severity, Severity::Warning);
        let done = ExportOutcome::Exported {
            file_name: "sonify_charts_2026-10-19.json".into(),
            charts: 2,
        };
        assert_eq!(done.toast().message, EXPORT_OK);
    }
}
