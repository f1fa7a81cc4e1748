use js_sys::{Array, Function, Promise, Reflect};
use sonify_core::effects::{
    COPY_ATTRIBUTE, COPY_MESSAGE, KEYFRAMES_CSS, REVEAL_CLASS, REVEAL_ROOT_MARGIN,
    REVEAL_SELECTOR, REVEAL_THRESHOLD, STYLE_ELEMENT_ID,
};
use sonify_core::{PageConfig, PageError, Result, Severity, Toast};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MouseEvent,
};

use crate::dom::{describe, dom_err, log_dom_failure, select_all};
use crate::toast;

/// Wire the cosmetic behaviors that need no page state. Card hover runs
/// through the controller's subscriptions instead.
pub(crate) fn install(document: &Document, config: &PageConfig) -> Result<()> {
    inject_keyframes(document)?;
    if let Err(err) = observe_reveal(document) {
        // Old browsers without IntersectionObserver just show everything.
        log::warn!("scroll reveal disabled: {err}");
        for el in select_all(document, REVEAL_SELECTOR)? {
            log_dom_failure("reveal", el.class_list().add_1(REVEAL_CLASS));
        }
    }
    for el in select_all(document, &format!("[{COPY_ATTRIBUTE}]"))? {
        copy_on_click(document, &el, config)?;
    }
    Ok(())
}

fn inject_keyframes(document: &Document) -> Result<()> {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return Ok(());
    }
    let style = document.create_element("style").map_err(dom_err)?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(KEYFRAMES_CSS));
    let head = document
        .head()
        .ok_or_else(|| PageError::MissingElement("head".into()))?;
    head.append_child(&style).map_err(dom_err)?;
    Ok(())
}

fn observe_reveal(document: &Document) -> Result<()> {
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::wrap(Box::new(
        |entries: Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if entry.is_intersecting() {
                    log_dom_failure("reveal", entry.target().class_list().add_1(REVEAL_CLASS));
                }
            }
        },
    ));
    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
    options.set_root_margin(REVEAL_ROOT_MARGIN);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(dom_err)?;
    callback.forget();
    for el in select_all(document, REVEAL_SELECTOR)? {
        observer.observe(&el);
    }
    Ok(())
}

async fn write_clipboard(text: &str) -> std::result::Result<(), JsValue> {
    let navigator = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .navigator();
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    let write = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?.dyn_into::<Function>()?;
    let promise = write.call1(&clipboard, &JsValue::from_str(text))?.dyn_into::<Promise>()?;
    JsFuture::from(promise).await?;
    Ok(())
}

fn copy_on_click(document: &Document, el: &Element, config: &PageConfig) -> Result<()> {
    let source = el.clone();
    let document = document.clone();
    let timeline = config.toast_timeline();
    let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_: MouseEvent| {
        let Some(text) = source.get_attribute(COPY_ATTRIBUTE) else {
            return;
        };
        let document = document.clone();
        spawn_local(async move {
            match write_clipboard(&text).await {
                Ok(()) => {
                    let toast = Toast::new(COPY_MESSAGE, Severity::Success);
                    if let Err(err) = toast::show(&document, &toast, timeline) {
                        log::warn!("notification dropped: {err}");
                    }
                }
                Err(err) => log::warn!("clipboard write refused: {}", describe(&err)),
            }
        });
    }));
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(dom_err)?;
    closure.forget();
    Ok(())
}
