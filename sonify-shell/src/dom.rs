use sonify_core::{PageError, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlElement};

pub(crate) fn document() -> Result<Document> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| PageError::Dom("no document".into()))
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}

pub(crate) fn dom_err(value: JsValue) -> PageError {
    PageError::Dom(describe(&value))
}

/// For DOM calls with nothing to recover: note the failure and move on.
pub(crate) fn log_dom_failure(what: &str, result: std::result::Result<(), JsValue>) {
    if let Err(err) = result {
        log::debug!("{what} failed: {}", dom_err(err));
    }
}

pub(crate) fn to_js(err: PageError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub(crate) fn create_html(document: &Document, tag: &str) -> Result<HtmlElement> {
    document
        .create_element(tag)
        .map_err(dom_err)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| PageError::Dom(format!("<{tag}> is not an HtmlElement")))
}

pub(crate) fn body(document: &Document) -> Result<HtmlElement> {
    document
        .body()
        .ok_or_else(|| PageError::MissingElement("body".into()))
}

pub(crate) fn select_all(document: &Document, selector: &str) -> Result<Vec<Element>> {
    let nodes = document.query_selector_all(selector).map_err(dom_err)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}
