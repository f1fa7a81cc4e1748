use gloo_timers::future::TimeoutFuture;
use sonify_core::effects::{toast_exit_animation, TOAST_CSS};
use sonify_core::{Result, Toast, ToastTimeline};
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use crate::dom::{body, create_html, dom_err, log_dom_failure};

/// Put a toast on screen and let it remove itself. Each toast owns its timers.
pub(crate) fn show(document: &Document, toast: &Toast, timeline: ToastTimeline) -> Result<()> {
    let el = create_html(document, "div")?;
    el.set_class_name(&toast.class_name());
    el.style().set_css_text(TOAST_CSS);

    let row = create_html(document, "div")?;
    row.set_class_name("d-flex align-items-center");
    let icon = document.create_element("i").map_err(dom_err)?;
    icon.set_class_name(&toast.icon_class());
    let text = document.create_element("span").map_err(dom_err)?;
    text.set_text_content(Some(&toast.message));
    row.append_child(&icon).map_err(dom_err)?;
    row.append_child(&text).map_err(dom_err)?;
    el.append_child(&row).map_err(dom_err)?;
    body(document)?.append_child(&el).map_err(dom_err)?;

    spawn_local(async move {
        TimeoutFuture::new(timeline.display_ms).await;
        log_dom_failure(
            "toast exit animation",
            el.style()
                .set_property("animation", &toast_exit_animation(timeline.exit_ms)),
        );
        TimeoutFuture::new(timeline.exit_ms).await;
        el.remove();
    });
    Ok(())
}
