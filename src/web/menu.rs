//! Mobile menu glue: the nav toggle, link clicks and the dismissal events.

use super::dom;
use crate::config::NavConfig;
use crate::nav::{BODY_CLASS, NavEvent, NavToggle};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, Window};

struct Menu {
    state: RefCell<NavToggle>,
    toggle: Element,
    body: HtmlElement,
}

impl Menu {
    fn apply(&self, event: NavEvent) {
        let mut state = self.state.borrow_mut();
        let open = state.apply(event);
        let rendered = self
            .body
            .class_list()
            .toggle_with_force(BODY_CLASS, open)
            .and_then(|_| self.toggle.set_attribute("aria-expanded", state.aria_expanded()))
            .and_then(|_| self.toggle.set_attribute("aria-label", state.aria_label()));
        if let Err(e) = rendered {
            log::error!("nav: {}", dom::js_error_message(&e));
        }
    }

    fn is_open(&self) -> bool {
        self.state.borrow().is_open()
    }
}

pub(crate) fn init(window: &Window, document: &Document, config: &NavConfig) -> Result<(), JsValue> {
    let (Some(toggle), Some(panel), Some(body)) = (
        document.query_selector(".nav-toggle")?,
        document.get_element_by_id("primary-nav"),
        document.body(),
    ) else {
        return Ok(());
    };

    let menu = Rc::new(Menu {
        state: RefCell::new(NavToggle::new(config.breakpoint)),
        toggle: toggle.clone(),
        body,
    });

    let on_toggle = Rc::clone(&menu);
    dom::listen(&toggle, "click", move |_: Event| on_toggle.apply(NavEvent::ToggleClicked))?;

    let on_link = Rc::clone(&menu);
    dom::listen(&panel, "click", move |event: Event| {
        if dom::closest(&event, "a").is_some() {
            on_link.apply(NavEvent::LinkClicked);
        }
    })?;

    let on_key = Rc::clone(&menu);
    dom::listen(window, "keydown", move |event: KeyboardEvent| {
        if event.key() == "Escape" {
            on_key.apply(NavEvent::Escape);
        }
    })?;

    let on_outside = Rc::clone(&menu);
    dom::listen(document, "click", move |event: Event| {
        if on_outside.is_open() && dom::closest(&event, ".site-header").is_none() {
            on_outside.apply(NavEvent::OutsideClick);
        }
    })?;

    let on_resize = Rc::clone(&menu);
    let viewport = window.clone();
    dom::listen(window, "resize", move |_: Event| {
        if let Some(width) = viewport.inner_width().ok().and_then(|w| w.as_f64()) {
            on_resize.apply(NavEvent::Resized(width));
        }
    })?;

    Ok(())
}
