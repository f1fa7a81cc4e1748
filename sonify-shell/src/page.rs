use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sonify_core::{
    ChartSource, Dispatch, PageConfig, PageController, PageError, PageEvent, PageExit, PageHost,
    PageTimer, Result, SubscriptionId,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, PageTransitionEvent};

use crate::dom::{document, dom_err, select_all};
use crate::effects;
use crate::host::DomHost;
use crate::plotly::PlotlyBackend;
use crate::storage::LocalStore;

pub(crate) struct Page {
    pub(crate) controller: PageController<LocalStore, PlotlyBackend>,
    pub(crate) host: DomHost,
}

thread_local! {
    static PAGE: RefCell<Option<Rc<RefCell<Page>>>> = const { RefCell::new(None) };
}

fn chart_sources(document: &Document, config: &PageConfig) -> Result<Vec<ChartSource>> {
    let selector = format!("[id$=\"{}\"]", config.chart_suffix);
    Ok(select_all(document, &selector)?
        .into_iter()
        .map(|el| ChartSource::new(el.id(), el.get_attribute(&config.chart_data_attribute)))
        .collect())
}

pub(crate) fn mount(config: PageConfig) -> Result<()> {
    if PAGE.with(|p| p.borrow().is_some()) {
        return Err(PageError::AlreadyMounted);
    }
    let document = document()?;
    effects::install(&document, &config)?;
    let sources = chart_sources(&document, &config)?;

    let page = Rc::new_cyclic(|weak: &Weak<RefCell<Page>>| {
        RefCell::new(Page {
            controller: PageController::new(config.clone(), LocalStore::open(), PlotlyBackend),
            host: DomHost::new(weak.clone(), document.clone(), config),
        })
    });
    {
        let mut guard = page.borrow_mut();
        let Page { controller, host } = &mut *guard;
        controller.mount(sources, host)?;
    }
    PAGE.with(|p| *p.borrow_mut() = Some(page));
    Ok(())
}

/// Unmount when the document is really going away. A page parked in the
/// back/forward cache keeps its listeners for when it is shown again.
pub(crate) fn watch_page_exit() -> Result<()> {
    let on_hide = Closure::<dyn FnMut(PageTransitionEvent)>::wrap(Box::new(
        |event: PageTransitionEvent| {
            let exit = PageExit::from_persisted(event.persisted());
            log::debug!("pagehide: {exit:?}");
            if exit.tears_down() {
                unmount();
            }
        },
    ));
    web_sys::window()
        .ok_or_else(|| PageError::Dom("no window".into()))?
        .add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref())
        .map_err(dom_err)?;
    on_hide.forget();
    Ok(())
}

pub(crate) fn unmount() {
    let Some(page) = PAGE.with(|p| p.borrow_mut().take()) else {
        return;
    };
    let mut guard = page.borrow_mut();
    let Page { controller, host } = &mut *guard;
    controller.unmount(host);
}

/// Run `f` against the mounted page, unless there is none or it is busy.
pub(crate) fn with_page<T>(f: impl FnOnce(&mut Page) -> T) -> Option<T> {
    let page = PAGE.with(|p| p.borrow().clone())?;
    let mut guard = page.try_borrow_mut().ok()?;
    Some(f(&mut *guard))
}

pub(crate) fn dispatch(page: &Weak<RefCell<Page>>, id: SubscriptionId, event: PageEvent) -> Dispatch {
    let Some(page) = page.upgrade() else {
        return Dispatch::default();
    };
    // Synthetic events (the export anchor's click) arrive while the page is
    // still handling the event that caused them.
    let Ok(mut guard) = page.try_borrow_mut() else {
        log::debug!("skipping re-entrant {event:?}");
        return Dispatch::default();
    };
    let Page { controller, host } = &mut *guard;
    controller.dispatch(id, event, host)
}

pub(crate) fn fire(page: &Weak<RefCell<Page>>, timer: PageTimer) {
    let Some(page) = page.upgrade() else {
        return;
    };
    let Ok(mut guard) = page.try_borrow_mut() else {
        log::warn!("{timer:?} fired while the page was busy");
        return;
    };
    let Page { controller, host } = &mut *guard;
    controller.on_timer(timer, host);
}

/// Show a toast whether or not the page controller is mounted.
pub(crate) fn notify(toast: &sonify_core::Toast) -> Result<()> {
    if with_page(|page| page.host.notify(toast)).is_some() {
        return Ok(());
    }
    crate::toast::show(&document()?, toast, PageConfig::default().toast_timeline())
}
