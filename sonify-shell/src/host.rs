use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;

use chrono::{DateTime, Utc};
use gloo_timers::future::TimeoutFuture;
use js_sys::Array;
use sonify_core::events::{Binding, EventKind, SubscriptionId, Target};
use sonify_core::{
    ClickHit, ExportFile, HoverChange, KeyChord, PageConfig, PageError, PageEvent, PageHost,
    PageTimer, QuickAction, Result, ThemePreference, Toast,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Blob, BlobPropertyBag, Document, Element, Event, EventTarget, HtmlAnchorElement, HtmlElement,
    KeyboardEvent, Node, Url,
};

use sonify_core::effects::{MENU_CSS, MENU_ITEM_CSS};

use crate::dom::{body, create_html, dom_err, log_dom_failure, select_all};
use crate::page::{self, Page};
use crate::toast;

const ROW_CLASS: &str = "quick-action-item";
const ROW_INDEX_ATTR: &str = "data-action-index";

struct Listener {
    targets: Vec<EventTarget>,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn detach(&self, targets: &[EventTarget]) {
        for target in targets {
            log_dom_failure(
                "removing listener",
                target.remove_event_listener_with_callback(
                    self.event,
                    self.callback.as_ref().unchecked_ref(),
                ),
            );
        }
    }
}

/// What a click handler needs to locate the click relative to the menu.
#[derive(Clone)]
struct HitContext {
    document: Document,
    fab_id: String,
    menu_selector: String,
}

impl HitContext {
    fn hit(&self, event: &Event) -> ClickHit {
        let Some(node) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
            return ClickHit::outside();
        };
        let element = node
            .dyn_ref::<Element>()
            .cloned()
            .or_else(|| node.parent_element());
        let closest = |selector: &str| {
            element
                .as_ref()
                .and_then(|el| el.closest(selector).ok().flatten())
        };
        let row = closest(&format!(".{ROW_CLASS}"))
            .and_then(|row| row.get_attribute(ROW_INDEX_ATTR))
            .and_then(|index| index.parse().ok());
        ClickHit {
            inside_menu: closest(&self.menu_selector).is_some(),
            inside_trigger: self
                .document
                .get_element_by_id(&self.fab_id)
                .map(|fab| fab.contains(Some(&node)))
                .unwrap_or(false),
            row,
        }
    }
}

fn apply_hover(event: &Event, change: HoverChange) {
    let Some(el) = event
        .current_target()
        .and_then(|t| t.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let result = match change {
        HoverChange::AddClass(class) => el.class_list().add_1(class),
        HoverChange::RemoveClass(class) => el.class_list().remove_1(class),
        HoverChange::Transform(value) => el.style().set_property("transform", value),
    };
    log_dom_failure("hover effect", result);
}

fn translate(kind: EventKind, event: &Event, ctx: &HitContext) -> Option<PageEvent> {
    match kind {
        EventKind::Click => Some(PageEvent::Click(ctx.hit(event))),
        EventKind::PointerEnter => Some(PageEvent::PointerEnter),
        EventKind::PointerLeave => Some(PageEvent::PointerLeave),
        EventKind::KeyDown => event.dyn_ref::<KeyboardEvent>().map(|key| {
            PageEvent::Key(KeyChord {
                key: key.key(),
                ctrl: key.ctrl_key(),
                meta: key.meta_key(),
                alt: key.alt_key(),
                shift: key.shift_key(),
            })
        }),
    }
}

/// The browser side of `PageHost`: DOM writes, listeners and timers.
pub(crate) struct DomHost {
    page: Weak<RefCell<Page>>,
    document: Document,
    config: PageConfig,
    menu: Option<HtmlElement>,
    listeners: HashMap<SubscriptionId, Listener>,
}

impl DomHost {
    pub(crate) fn new(page: Weak<RefCell<Page>>, document: Document, config: PageConfig) -> Self {
        Self {
            page,
            document,
            config,
            menu: None,
            listeners: HashMap::new(),
        }
    }

    fn event_targets(&self, target: &Target) -> Result<Vec<EventTarget>> {
        match target {
            Target::Document => Ok(vec![self.document.clone().into()]),
            Target::Element(id) => self
                .document
                .get_element_by_id(id)
                .map(|el| vec![el.into()])
                .ok_or_else(|| PageError::MissingElement(id.clone())),
            Target::Selector(selector) => {
                let found = select_all(&self.document, selector)?;
                if found.is_empty() {
                    return Err(PageError::MissingElement(selector.clone()));
                }
                Ok(found.into_iter().map(Into::into).collect())
            }
            Target::Menu => self
                .menu
                .clone()
                .map(|menu| vec![menu.into()])
                .ok_or_else(|| PageError::MissingElement(self.config.menu_class.clone())),
        }
    }

    fn menu_row(&self, index: usize, action: &QuickAction) -> Result<HtmlElement> {
        let item = create_html(&self.document, "div")?;
        item.set_class_name(ROW_CLASS);
        item.set_attribute(ROW_INDEX_ATTR, &index.to_string())
            .map_err(dom_err)?;
        item.style().set_css_text(MENU_ITEM_CSS);

        let icon = self.document.create_element("i").map_err(dom_err)?;
        icon.set_class_name(&format!("{} me-3", action.icon));
        icon.set_attribute("style", "width: 20px; text-align: center;")
            .map_err(dom_err)?;
        let label = self.document.create_element("span").map_err(dom_err)?;
        label.set_text_content(Some(action.text));

        item.append_child(&icon).map_err(dom_err)?;
        item.append_child(&label).map_err(dom_err)?;
        Ok(item)
    }
}

impl PageHost for DomHost {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn apply_theme(&mut self, theme: ThemePreference, icon_class: &str) {
        if let Some(root) = self.document.document_element() {
            if let Err(err) = root.set_attribute(&self.config.theme_attribute, theme.as_str()) {
                log::warn!("theme attribute not set: {}", dom_err(err));
            }
        }
        if let Some(icon) = self.document.get_element_by_id(&self.config.theme_icon_id) {
            icon.set_class_name(icon_class);
        }
    }

    fn notify(&mut self, toast: &Toast) {
        if let Err(err) = toast::show(&self.document, toast, self.config.toast_timeline()) {
            log::warn!("notification dropped: {err}");
        }
    }

    fn download(&mut self, file: &ExportFile) -> Result<()> {
        let parts = Array::of1(&JsValue::from_str(&file.contents));
        let options = BlobPropertyBag::new();
        options.set_type(file.mime);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(dom_err)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(dom_err)?;

        let anchor = self
            .document
            .create_element("a")
            .map_err(dom_err)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| PageError::Dom("<a> is not an anchor".into()))?;
        anchor.set_href(&url);
        anchor.set_download(&file.file_name);
        body(&self.document)?.append_child(&anchor).map_err(dom_err)?;
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).map_err(dom_err)
    }

    fn navigate(&mut self, url: &str) {
        if let Some(Err(err)) = self.document.location().map(|l| l.set_href(url)) {
            log::error!("navigation to {url} failed: {}", dom_err(err));
        }
    }

    fn reload(&mut self) {
        if let Some(Err(err)) = self.document.location().map(|l| l.reload()) {
            log::error!("reload failed: {}", dom_err(err));
        }
    }

    fn click_element(&mut self, id: &str) -> bool {
        let Some(el) = self
            .document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return false;
        };
        // The click re-enters the page through the element's own listener,
        // so it has to run after the current dispatch returns.
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            el.click();
        });
        true
    }

    fn render_menu(&mut self, actions: &[QuickAction]) -> Result<()> {
        let menu = create_html(&self.document, "div")?;
        menu.set_class_name(&self.config.menu_class);
        menu.style().set_css_text(MENU_CSS);
        for (index, action) in actions.iter().enumerate() {
            let row = self.menu_row(index, action)?;
            menu.append_child(&row).map_err(dom_err)?;
        }
        body(&self.document)?.append_child(&menu).map_err(dom_err)?;
        self.menu = Some(menu);
        Ok(())
    }

    fn remove_menu(&mut self) -> bool {
        let removed = self.menu.take().map(|menu| menu.remove()).is_some();
        // Menus left behind by other scripts count against the single-menu rule too.
        let selector = format!(".{}", self.config.menu_class);
        let strays = select_all(&self.document, &selector).unwrap_or_default();
        for stray in &strays {
            stray.remove();
        }
        removed || !strays.is_empty()
    }

    fn listen(&mut self, id: SubscriptionId, binding: &Binding) -> Result<()> {
        let targets = self.event_targets(&binding.target)?;
        let kind = binding.kind;
        let page = self.page.clone();
        let ctx = HitContext {
            document: self.document.clone(),
            fab_id: self.config.fab_id.clone(),
            menu_selector: format!(".{}", self.config.menu_class),
        };
        let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
            let Some(page_event) = translate(kind, &event, &ctx) else {
                return;
            };
            let out = page::dispatch(&page, id, page_event);
            if out.prevent_default {
                event.prevent_default();
            }
            if let Some(change) = out.hover {
                apply_hover(&event, change);
            }
        }));
        let listener = Listener {
            targets,
            event: kind.dom_name(),
            callback,
        };
        for (attached, target) in listener.targets.iter().enumerate() {
            let added = target.add_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
            if let Err(err) = added {
                // Nothing may keep calling the closure once it is dropped.
                listener.detach(&listener.targets[..attached]);
                return Err(dom_err(err));
            }
        }
        self.listeners.insert(id, listener);
        Ok(())
    }

    fn release(&mut self, id: SubscriptionId) {
        let Some(listener) = self.listeners.remove(&id) else {
            return;
        };
        listener.detach(&listener.targets);
        // The callback may be the one on the stack right now; drop it later.
        spawn_local(async move {
            drop(listener);
        });
    }

    fn schedule(&mut self, delay_ms: u32, timer: PageTimer) {
        let page = self.page.clone();
        spawn_local(async move {
            TimeoutFuture::new(delay_ms).await;
            page::fire(&page, timer);
        });
    }
}
