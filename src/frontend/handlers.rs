use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use js_sys::{Function, Promise, Reflect};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    KeyboardEvent, ScrollBehavior, ScrollToOptions,
};

use super::dom::{self, Guards};
use super::error::{InteractionError, Result};
use super::overlay::OverlayHandle;
use crate::config::{InteractionConfig, PageProfile};
use crate::contact::{self, EmailCopyOutcome, SubmitButtonState};
use crate::contract;
use crate::scroll;
use crate::shortcuts::{self, KeyChord, ShortcutAction};
use crate::telemetry::Logger;

#[derive(Clone)]
pub struct MenuHandle {
    open: Rc<Cell<bool>>,
    links: HtmlElement,
    toggle: HtmlElement,
}

impl MenuHandle {
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn set_open(&self, open: bool) {
        self.open.set(open);
        dom::set_class(&self.links, contract::CLASS_ACTIVE, open);
        dom::set_class(&self.toggle, contract::CLASS_ACTIVE, open);

        if let Some(body) = dom::browser_document().ok().and_then(|d| d.body()) {
            dom::set_style(&body, "overflow", if open { "hidden" } else { "" });
        }
    }
}

pub fn install_menu(document: &Document) -> Result<(MenuHandle, Guards)> {
    let menu = MenuHandle {
        open: Rc::new(Cell::new(false)),
        links: dom::select_one(document, contract::NAV_LINKS)?,
        toggle: dom::select_one(document, contract::MENU_TOGGLE)?,
    };

    let mut guards = Guards::default();
    {
        let menu = menu.clone();
        let toggle = menu.toggle.clone();
        guards.listen(EventListener::new(&toggle, "click", move |_| {
            menu.set_open(!menu.is_open());
        }));
    }

    for link in dom::select_all(document, contract::NAV_LINK_ANCHORS) {
        let menu = menu.clone();
        guards.listen(EventListener::new(&link, "click", move |_| {
            menu.set_open(false);
        }));
    }

    Ok((menu, guards))
}

fn nav_height(document: &Document) -> f64 {
    dom::select_one(document, contract::MAIN_NAV)
        .map(|nav| f64::from(nav.offset_height()))
        .unwrap_or(0.0)
}

fn scroll_to_section(id: &str, gap: f64) -> bool {
    let Ok(document) = dom::browser_document() else {
        return false;
    };
    let Some(target) = document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return false;
    };
    let Ok(window) = dom::browser_window() else {
        return false;
    };

    let top = scroll::anchor_scroll_target(
        f64::from(target.offset_top()),
        nav_height(&document),
        gap,
    );
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
    true
}

fn navigate(href: &str) {
    if let Ok(window) = dom::browser_window() {
        let _ = window.location().set_href(href);
    }
}

pub fn install_smooth_scroll(document: &Document, config: &InteractionConfig) -> Result<Guards> {
    let gap = config.anchor_gap_px;
    let mut guards = Guards::default();

    for anchor in dom::select_all(document, contract::IN_PAGE_ANCHORS) {
        let target = anchor.clone();
        guards.listen(EventListener::new_with_options(
            &anchor,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let href = target.get_attribute("href").unwrap_or_default();
                let id = href.trim_start_matches('#');
                if !id.is_empty() && scroll_to_section(id, gap) {
                    event.prevent_default();
                }
            },
        ));
    }

    Ok(guards)
}

fn clipboard_write_text() -> Option<(JsValue, Function)> {
    let navigator = dom::browser_window().ok()?.navigator();
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard")).ok()?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return None;
    }
    let write_text = Reflect::get(&clipboard, &JsValue::from_str("writeText")).ok()?;
    let write_text = write_text.dyn_into::<Function>().ok()?;
    Some((clipboard, write_text))
}

async fn copy_to_clipboard(text: &str) -> std::result::Result<(), JsValue> {
    let (clipboard, write_text) =
        clipboard_write_text().ok_or_else(|| JsValue::from_str("clipboard unavailable"))?;
    let promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))?
        .dyn_into::<Promise>()?;
    JsFuture::from(promise).await.map(|_| ())
}

pub fn install_email_copy(
    document: &Document,
    overlay: OverlayHandle,
    logger: Logger,
) -> Result<Guards> {
    let links = dom::select_all(document, contract::MAILTO_LINKS);
    if links.is_empty() {
        return Err(InteractionError::MissingElement(contract::MAILTO_LINKS));
    }

    let mut guards = Guards::default();
    for link in links {
        let target = link.clone();
        let overlay = overlay.clone();
        guards.listen(EventListener::new_with_options(
            &link,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let href = target.get_attribute("href").unwrap_or_default();
                let Some(address) =
                    contact::should_intercept(&href, clipboard_write_text().is_some())
                else {
                    return;
                };
                event.prevent_default();

                let overlay = overlay.clone();
                spawn_local(async move {
                    let result = copy_to_clipboard(&address).await;
                    if let Err(error) = result.as_ref() {
                        logger.warn(
                            "clipboard_write_failed",
                            serde_json::json!({ "error": format!("{error:?}") }),
                        );
                    }
                    match contact::after_clipboard_write(result, &href) {
                        EmailCopyOutcome::Notify(message) => overlay.notify(message),
                        EmailCopyOutcome::Navigate(href) => navigate(&href),
                    }
                });
            },
        ));
    }

    Ok(guards)
}

fn field_value(field: &Element) -> Option<(String, bool)> {
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        return Some((input.value(), input.check_validity()));
    }
    field
        .dyn_ref::<HtmlTextAreaElement>()
        .map(|area| (area.value(), area.check_validity()))
}

pub fn install_contact_form(document: &Document, config: &InteractionConfig) -> Result<Guards> {
    let form = dom::select_one(document, contract::CONTACT_FORM)?;
    let mut guards = Guards::default();

    for field in dom::select_all_in(&form, contract::FORM_FIELDS) {
        if let Some(parent) = field.parent_element() {
            let focus_parent = parent.clone();
            guards.listen(EventListener::new(&field, "focus", move |_| {
                dom::set_class(&focus_parent, contract::CLASS_FOCUSED, true);
            }));

            let blur_field = field.clone();
            guards.listen(EventListener::new(&field, "blur", move |_| {
                let empty = field_value(&blur_field).map_or(true, |(value, _)| value.is_empty());
                if empty {
                    dom::set_class(&parent, contract::CLASS_FOCUSED, false);
                }
            }));
        }

        let input_field = field.clone();
        guards.listen(EventListener::new(&field, "input", move |_| {
            let Some((_, valid)) = field_value(&input_field) else {
                return;
            };
            if let Some(field) = input_field.dyn_ref::<HtmlElement>() {
                let color = if valid {
                    "var(--color-olive)"
                } else {
                    "var(--color-border)"
                };
                dom::set_style(field, "border-color", color);
            }
        }));
    }

    let Some(button) = form
        .query_selector(contract::SUBMIT_BUTTON)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok())
    else {
        return Ok(guards);
    };
    let label = button
        .query_selector(contract::SUBMIT_LABEL)
        .ok()
        .flatten()
        .unwrap_or_else(|| button.clone().into());
    let state = Rc::new(RefCell::new(SubmitButtonState::new(
        label.text_content().unwrap_or_default(),
    )));
    let reset_ms = config.form_reset_ms;

    guards.listen(EventListener::new(&form, "submit", move |_| {
        if !state.borrow_mut().begin() {
            return;
        }
        label.set_text_content(Some(state.borrow().label()));
        button.set_disabled(true);

        let state = state.clone();
        let label = label.clone();
        let button = button.clone();
        Timeout::new(reset_ms, move || {
            state.borrow_mut().reset();
            label.set_text_content(Some(state.borrow().label()));
            button.set_disabled(false);
        })
        .forget();
    }));

    Ok(guards)
}

fn focus_is_editable(document: &Document) -> bool {
    document.active_element().is_some_and(|element| {
        let content_editable = element
            .dyn_ref::<HtmlElement>()
            .is_some_and(HtmlElement::is_content_editable);
        shortcuts::is_editable_target(&element.tag_name(), content_editable)
    })
}

pub fn install_keyboard(
    document: &Document,
    config: &InteractionConfig,
    menu: Option<MenuHandle>,
    logger: Logger,
) -> Result<Guards> {
    let style = config.page.shortcut_style();
    let gap = config.anchor_gap_px;
    let page = config.page;
    let key_document = document.clone();

    let mut guards = Guards::default();
    guards.listen(EventListener::new_with_options(
        document,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let chord = KeyChord {
                key: event.key(),
                code: event.code(),
                alt: event.alt_key(),
                ctrl: event.ctrl_key(),
                meta: event.meta_key(),
            };
            let menu_open = menu.as_ref().is_some_and(MenuHandle::is_open);

            let Some(action) =
                shortcuts::resolve(style, &chord, focus_is_editable(&key_document), menu_open)
            else {
                return;
            };

            logger.debug(
                "shortcut",
                serde_json::json!({ "key": chord.key, "page": page }),
            );
            match action {
                ShortcutAction::CloseMenu => {
                    if let Some(menu) = menu.as_ref() {
                        menu.set_open(false);
                    }
                }
                ShortcutAction::ScrollTo(id) => {
                    if scroll_to_section(id, gap) {
                        event.prevent_default();
                    }
                }
                ShortcutAction::Navigate(href) => {
                    event.prevent_default();
                    navigate(href);
                }
            }
        },
    ));

    if page == PageProfile::NotFound {
        logger.info(
            "shortcuts_available",
            serde_json::json!({ "keys": ["H: home", "W: work", "C: contact"] }),
        );
    }

    Ok(guards)
}

pub fn install_project_link_log(document: &Document, logger: Logger) -> Result<Guards> {
    let mut guards = Guards::default();

    for link in dom::select_all(document, contract::PROJECT_LINK) {
        let target = link.clone();
        guards.listen(EventListener::new(&link, "click", move |_| {
            let project = target
                .closest(contract::PROJECT_CARD)
                .ok()
                .flatten()
                .and_then(|card| card.query_selector(contract::PROJECT_TITLE).ok().flatten())
                .and_then(|title| title.text_content())
                .unwrap_or_default();
            let link_type = target.text_content().unwrap_or_default();

            logger.debug(
                "project_link_clicked",
                serde_json::json!({
                    "project": project.trim(),
                    "link": link_type.trim(),
                }),
            );
        }));
    }

    Ok(guards)
}
