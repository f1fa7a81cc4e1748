use js_sys::{Array, Function, Reflect, JSON};
use serde_json::Value;
use sonify_core::{ChartBackend, PageError, PlotConfig, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::dom::describe;

/// The global `Plotly` object loaded by the page.
pub(crate) struct PlotlyBackend;

fn to_js(value: &Value) -> Result<JsValue> {
    let text = serde_json::to_string(value)?;
    JSON::parse(&text).map_err(|e| PageError::Dom(describe(&e)))
}

fn call(method: &str, args: &Array) -> std::result::Result<JsValue, JsValue> {
    let plotly = Reflect::get(&js_sys::global(), &JsValue::from_str("Plotly"))?;
    if plotly.is_undefined() {
        return Err(JsValue::from_str("Plotly is not loaded"));
    }
    let func = Reflect::get(&plotly, &JsValue::from_str(method))?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("Plotly.{method} is not a function")))?;
    func.apply(&plotly, args)
}

fn render_err(id: &str, err: JsValue) -> PageError {
    PageError::Render {
        id: id.to_string(),
        message: describe(&err),
    }
}

impl ChartBackend for PlotlyBackend {
    fn new_plot(
        &mut self,
        id: &str,
        data: &[Value],
        layout: &Value,
        config: &PlotConfig,
    ) -> Result<()> {
        let args = Array::of4(
            &JsValue::from_str(id),
            &to_js(&Value::Array(data.to_vec()))?,
            &to_js(layout)?,
            &to_js(&config.to_value())?,
        );
        call("newPlot", &args).map_err(|e| render_err(id, e))?;
        Ok(())
    }

    fn relayout(&mut self, id: &str, update: &Value) -> Result<()> {
        let args = Array::of2(&JsValue::from_str(id), &to_js(update)?);
        call("relayout", &args).map_err(|e| render_err(id, e))?;
        Ok(())
    }
}
