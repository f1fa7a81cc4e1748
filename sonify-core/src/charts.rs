use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::PageConfig;
use crate::error::{PageError, Result};
use crate::theme::ThemePreference;

/// Option keys that belong to the plot config rather than the layout.
const CONFIG_KEYS: &[&str] = &[
    "responsive",
    "displayModeBar",
    "staticPlot",
    "scrollZoom",
    "editable",
];

/// Embedded `{data, layout}` payload carried by a chart container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub data: Vec<Value>,
    #[serde(default = "empty_object")]
    pub layout: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl ChartSpec {
    pub fn parse(id: &str, payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|source| PageError::InvalidChartPayload {
            id: id.to_string(),
            source,
        })
    }
}

/// Plot config handed to the charting library alongside data and layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotConfig(pub Map<String, Value>);

impl Default for PlotConfig {
    fn default() -> Self {
        let mut map = Map::new();
        map.insert("responsive".into(), Value::Bool(true));
        map.insert("displayModeBar".into(), Value::Bool(false));
        PlotConfig(map)
    }
}

impl PlotConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// The charting library as seen from the page (Plotly in the browser).
pub trait ChartBackend {
    fn new_plot(&mut self, id: &str, data: &[Value], layout: &Value, config: &PlotConfig)
        -> Result<()>;
    fn relayout(&mut self, id: &str, update: &Value) -> Result<()>;
}

/// A container found on the page. `payload` is the raw embedded JSON, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSource {
    pub id: String,
    pub payload: Option<String>,
}

impl ChartSource {
    pub fn new(id: impl Into<String>, payload: Option<impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            payload: payload.map(Into::into),
        }
    }
}

/// A rendered chart and the last data/layout it was drawn with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartHandle {
    pub id: String,
    pub data: Vec<Value>,
    pub layout: Value,
}

#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub registered: Vec<String>,
    pub failed: Vec<(String, PageError)>,
}

#[derive(Debug, Default)]
pub struct ChartRegistry {
    handles: HashMap<String, ChartHandle>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate every chart container that carries a payload.
    ///
    /// A bad payload or a render failure only loses that one chart.
    pub fn discover<B: ChartBackend>(
        &mut self,
        sources: impl IntoIterator<Item = ChartSource>,
        backend: &mut B,
        config: &PageConfig,
    ) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();
        for source in sources {
            if !config.is_chart_container(&source.id) {
                continue;
            }
            let Some(payload) = source.payload else {
                continue;
            };
            match self.instantiate(&source.id, &payload, backend) {
                Ok(()) => report.registered.push(source.id),
                Err(err) => {
                    log::error!("error initializing chart: {err}");
                    report.failed.push((source.id, err));
                }
            }
        }
        report
    }

    fn instantiate<B: ChartBackend>(&mut self, id: &str, payload: &str, backend: &mut B) -> Result<()> {
        let spec = ChartSpec::parse(id, payload)?;
        backend.new_plot(id, &spec.data, &spec.layout, &PlotConfig::default())?;
        self.insert(ChartHandle {
            id: id.to_string(),
            data: spec.data,
            layout: spec.layout,
        });
        Ok(())
    }

    /// Re-template every tracked chart.
    pub fn update_all_theme<B: ChartBackend>(&mut self, backend: &mut B, theme: ThemePreference) {
        let template = theme.chart_template();
        let update = json!({ "template": template });
        for handle in self.handles.values_mut() {
            if let Err(err) = backend.relayout(&handle.id, &update) {
                log::warn!("chart `{}` kept its old template: {err}", handle.id);
                continue;
            }
            if let Value::Object(layout) = &mut handle.layout {
                layout.insert("template".into(), Value::String(template.into()));
            }
        }
    }

    /// Draw a chart from caller-supplied data. Caller options win over the
    /// defaults; plot-config keys go to the config, the rest to the layout.
    pub fn create_custom<B: ChartBackend>(
        &mut self,
        backend: &mut B,
        id: &str,
        data: Vec<Value>,
        options: Map<String, Value>,
        theme: ThemePreference,
    ) -> bool {
        let mut merged = PlotConfig::default().0;
        merged.insert("template".into(), Value::String(theme.chart_template().into()));
        merged.extend(options);

        let (config, layout): (Map<_, _>, Map<_, _>) = merged
            .into_iter()
            .partition(|(key, _)| CONFIG_KEYS.contains(&key.as_str()));
        let layout = Value::Object(layout);

        match backend.new_plot(id, &data, &layout, &PlotConfig(config)) {
            Ok(()) => {
                self.insert(ChartHandle {
                    id: id.to_string(),
                    data,
                    layout,
                });
                true
            }
            Err(err) => {
                log::error!("error creating chart: {err}");
                false
            }
        }
    }

    pub fn insert(&mut self, handle: ChartHandle) {
        self.handles.insert(handle.id.clone(), handle);
    }

    pub fn get(&self, id: &str) -> Option<&ChartHandle> {
        self.handles.get(id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handles ordered by id.
    pub fn handles(&self) -> Vec<&ChartHandle> {
        let mut handles: Vec<_> = self.handles.values().collect();
        handles.sort_by(|a, b| a.id.cmp(&b.id));
        handles
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::RecordingBackend;

    fn source(id: &str, payload: Option<&str>) -> ChartSource {
        ChartSource::new(id, payload)
    }

    const GOOD: &str = r#"{"data":[{"type":"bar","x":[1,2],"y":[3,4]}],"layout":{"title":"Top"}}"#;

    #[test]
    fn discover_skips_malformed_payloads() {
        let mut backend = RecordingBackend::default();
        let mut registry = ChartRegistry::new();
        let report = registry.discover(
            vec![
                source("top-tracks-chart", Some(GOOD)),
                source("heatmap-chart", Some("{\"data\": [")),
                source("mood-radar-chart", Some(r#"{"data":[]}"#)),
                source("top-artists-chart", Some(r#"{"layout":{}}"#)),
            ],
            &mut backend,
            &PageConfig::default(),
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(report.registered.len(), 2);
        assert_eq!(report.failed.len(), 2);
        assert!(report
            .failed
            .iter()
            .all(|(_, e)| matches!(e, PageError::InvalidChartPayload { .. })));
        assert_eq!(registry.get("mood-radar-chart").unwrap().layout, json!({}));
        let plotted = &backend.plots["top-tracks-chart"];
        assert_eq!(plotted.config.get("displayModeBar"), Some(&Value::Bool(false)));
        assert_eq!(plotted.config.get("responsive"), Some(&Value::Bool(true)));
    }

    #[test]
    fn discover_ignores_non_chart_ids_and_missing_payloads() {
        let mut backend = RecordingBackend::default();
        let mut registry = ChartRegistry::new();
        let report = registry.discover(
            vec![source("sidebar", Some(GOOD)), source("empty-chart", None)],
            &mut backend,
            &PageConfig::default(),
        );
        assert!(registry.is_empty());
        assert!(report.failed.is_empty());
        assert!(backend.plots.is_empty());
    }

    #[test]
    fn render_failure_is_isolated() {
        let mut backend = RecordingBackend::failing_on(&["heatmap-chart"]);
        let mut registry = ChartRegistry::new();
        let report = registry.discover(
            vec![source("heatmap-chart", Some(GOOD)), source("top-tracks-chart", Some(GOOD))],
            &mut backend,
            &PageConfig::default(),
        );
        assert_eq!(report.registered, vec!["top-tracks-chart".to_string()]);
        assert!(matches!(report.failed[0].1, PageError::Render { .. }));
    }

    #[test]
    fn theme_update_relayouts_registered_charts() {
        let mut backend = RecordingBackend::default();
        let mut registry = ChartRegistry::new();
        registry.discover(
            vec![source("a-chart", Some(GOOD)), source("b-chart", Some(GOOD))],
            &mut backend,
            &PageConfig::default(),
        );
        registry.update_all_theme(&mut backend, ThemePreference::Dark);
        assert_eq!(backend.relayouts.len(), 2);
        assert!(backend
            .relayouts
            .iter()
            .all(|(_, update)| update == &json!({"template": "plotly_dark"})));
        assert_eq!(registry.get("a-chart").unwrap().layout["template"], "plotly_dark");
        assert_eq!(registry.get("a-chart").unwrap().layout["title"], "Top");
    }

    #[test]
    fn custom_chart_merges_options() {
        let mut backend = RecordingBackend::default();
        let mut registry = ChartRegistry::new();
        let mut options = Map::new();
        options.insert("displayModeBar".into(), Value::Bool(true));
        options.insert("title".into(), Value::String("Listening hours".into()));
        let ok = registry.create_custom(
            &mut backend,
            "hours",
            vec![json!({"type": "scatter"})],
            options,
            ThemePreference::Dark,
        );
        assert!(ok);
        let plot = &backend.plots["hours"];
        assert_eq!(plot.config.get("displayModeBar"), Some(&Value::Bool(true)));
        assert_eq!(plot.layout["template"], "plotly_dark");
        assert_eq!(plot.layout["title"], "Listening hours");
        assert!(plot.layout.get("responsive").is_none());
        assert!(registry.get("hours").is_some());
    }

    #[test]
    fn custom_chart_failure_returns_false() {
        let mut backend = RecordingBackend::failing_on(&["broken"]);
        let mut registry = ChartRegistry::new();
        assert!(!registry.create_custom(
            &mut backend,
            "broken",
            Vec::new(),
            Map::new(),
            ThemePreference::Light
        ));
        assert!(registry.is_empty());
    }
}
