//! Browser bindings for the Sonify dashboard page.
//!
//! `start` mounts a [`sonify_core::PageController`] over the live document,
//! backed by `localStorage`, the global `Plotly` object and DOM listeners, and
//! publishes `window.Sonify` for inline scripts.

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod effects;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod page;
#[cfg(target_arch = "wasm32")]
mod plotly;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod toast;

pub use sonify_core::{format_duration, format_number, PageConfig};

#[cfg(target_arch = "wasm32")]
use js_sys::{Object, Reflect, JSON};
#[cfg(target_arch = "wasm32")]
use serde_json::{Map, Value};
#[cfg(target_arch = "wasm32")]
use sonify_core::{ExportOutcome, Severity, Toast};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
const CONFIG_GLOBAL: &str = "SONIFY_CONFIG";

#[cfg(target_arch = "wasm32")]
fn read_global(key: &str) -> Option<String> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}

#[cfg(target_arch = "wasm32")]
fn page_config(json: Option<String>) -> PageConfig {
    match json.or_else(|| read_global(CONFIG_GLOBAL)) {
        Some(raw) => PageConfig::from_json(&raw).unwrap_or_else(|err| {
            log::warn!("using default page config: {err}");
            PageConfig::default()
        }),
        None => PageConfig::default(),
    }
}

#[cfg(target_arch = "wasm32")]
fn mount_logged(config: PageConfig) {
    if let Err(err) = page::mount(config) {
        log::error!("page mount failed: {err}");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    logging::init(log::LevelFilter::Info);
    install_global_api()?;
    page::watch_page_exit().map_err(dom::to_js)?;
    let config = page_config(None);
    let document = dom::document().map_err(dom::to_js)?;
    if document.ready_state() == "loading" {
        let ready = Closure::once_into_js(move || mount_logged(config));
        document.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())?;
    } else {
        mount_logged(config);
    }
    Ok(())
}

/// Mount by hand, e.g. after swapping page content. `config_json` overrides
/// the `SONIFY_CONFIG` global.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = mountPage)]
pub fn mount_page(config_json: Option<String>) -> Result<(), JsValue> {
    page::mount(page_config(config_json)).map_err(dom::to_js)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = unmountPage)]
pub fn unmount_page() {
    page::unmount();
}

/// Download every rendered chart; true when a file was produced.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = exportAllCharts)]
pub fn export_all_charts() -> bool {
    let outcome = page::with_page(|page| page.controller.export_all(&mut page.host))
        .unwrap_or_else(|| {
            // No mounted page means no registered charts.
            let outcome = ExportOutcome::Empty;
            if let Err(err) = page::notify(&outcome.toast()) {
                log::warn!("notification dropped: {err}");
            }
            outcome
        });
    matches!(outcome, ExportOutcome::Exported { .. })
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification(message: String, severity: Option<String>) {
    let severity = severity.as_deref().map(Severity::parse).unwrap_or_default();
    if let Err(err) = page::notify(&Toast::new(message, severity)) {
        log::warn!("notification dropped: {err}");
    }
}

#[cfg(target_arch = "wasm32")]
fn from_js<T: serde::de::DeserializeOwned + Default>(value: &JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    let text: String = JSON::stringify(value)?.into();
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn chart_args(data: &JsValue, options: &JsValue) -> Result<(Vec<Value>, Map<String, Value>), JsValue> {
    Ok((from_js(data)?, from_js(options)?))
}

/// Plot `data` into `container_id` with the current theme; false on failure.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = createCustomChart)]
pub fn create_custom_chart(container_id: String, data: JsValue, options: JsValue) -> bool {
    let (data, options) = match chart_args(&data, &options) {
        Ok(args) => args,
        Err(err) => {
            log::error!("error creating chart: {}", dom::describe(&err));
            return false;
        }
    };
    page::with_page(|page| {
        page.controller
            .create_custom_chart(&container_id, data, options)
    })
    .unwrap_or_else(|| {
        log::warn!("createCustomChart called before the page was mounted");
        false
    })
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = formatDuration)]
pub fn format_duration_js(ms: f64) -> String {
    format_duration(ms.max(0.0) as u64)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = formatNumber)]
pub fn format_number_js(n: f64) -> String {
    format_number(n)
}

/// `window.Sonify`, for templates that call into the page from inline markup.
#[cfg(target_arch = "wasm32")]
fn install_global_api() -> Result<(), JsValue> {
    let api = Object::new();
    let set = |name: &str, f: JsValue| Reflect::set(&api, &JsValue::from_str(name), &f);
    set(
        "exportAllCharts",
        Closure::<dyn Fn() -> bool>::wrap(Box::new(export_all_charts)).into_js_value(),
    )?;
    set(
        "showNotification",
        Closure::<dyn Fn(String, Option<String>)>::wrap(Box::new(show_notification))
            .into_js_value(),
    )?;
    set(
        "createCustomChart",
        Closure::<dyn Fn(String, JsValue, JsValue) -> bool>::wrap(Box::new(create_custom_chart))
            .into_js_value(),
    )?;
    set(
        "formatDuration",
        Closure::<dyn Fn(f64) -> String>::wrap(Box::new(format_duration_js)).into_js_value(),
    )?;
    set(
        "formatNumber",
        Closure::<dyn Fn(f64) -> String>::wrap(Box::new(format_number_js)).into_js_value(),
    )?;
    Reflect::set(&js_sys::global(), &JsValue::from_str("Sonify"), &api)?;
    Ok(())
}
