//! Lightbox wiring for `[data-gallery]` pages.

use super::dom;
use crate::config::GalleryConfig;
use crate::lightbox::{GalleryItem, Lightbox, LightboxChange};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, HtmlImageElement, KeyboardEvent, Window};

const OPEN_CLASS: &str = "is-open";

/// The modal's DOM nodes.
struct LightboxView {
    root: Element,
    image: HtmlImageElement,
    meta: Element,
    body: HtmlElement,
}

impl LightboxView {
    fn render(&self, change: &LightboxChange) -> Result<(), JsValue> {
        match change {
            LightboxChange::Show(slide) => {
                self.image.set_src(&slide.src);
                self.image.set_alt(&slide.alt);
                self.meta.set_text_content(Some(&slide.caption));
                self.root.class_list().add_1(OPEN_CLASS)?;
                self.root.set_attribute("aria-hidden", "false")?;
                self.body.style().set_property("overflow", "hidden")?;
            }
            LightboxChange::Closed => {
                self.root.class_list().remove_1(OPEN_CLASS)?;
                self.root.set_attribute("aria-hidden", "true")?;
                self.image.set_src("");
                self.body.style().remove_property("overflow")?;
            }
        }
        Ok(())
    }
}

struct GalleryController {
    cards: Vec<Element>,
    lightbox: RefCell<Lightbox>,
    view: LightboxView,
}

impl GalleryController {
    fn apply(&self, change: impl FnOnce(&mut Lightbox) -> Option<LightboxChange>) {
        let Some(change) = change(&mut *self.lightbox.borrow_mut()) else {
            return;
        };
        if let Err(e) = self.view.render(&change) {
            log::error!("lightbox: {}", dom::js_error_message(&e));
        }
    }
}

pub(crate) fn init(window: &Window, document: &Document, config: &GalleryConfig) -> Result<(), JsValue> {
    let selector = format!("[data-gallery=\"{}\"]", config.name);
    let Some(gallery) = document.query_selector(&selector)? else {
        return Ok(());
    };

    let cards = dom::elements(gallery.query_selector_all(".photo-card")?);
    let items = cards
        .iter()
        .map(|card| {
            let alt = card
                .query_selector("img")
                .ok()
                .flatten()
                .and_then(|img| img.get_attribute("alt"));
            GalleryItem::new(card.get_attribute("data-full"), alt)
        })
        .collect();
    let Some(lightbox) = Lightbox::new(items) else {
        log::debug!("gallery {} has no cards", config.name);
        return Ok(());
    };

    let (Some(root), Some(image), Some(meta), Some(body)) = (
        document.get_element_by_id("lightbox"),
        document.get_element_by_id("lightboxImg"),
        document.get_element_by_id("lightboxMeta"),
        document.body(),
    ) else {
        log::debug!("gallery present but lightbox markup missing");
        return Ok(());
    };
    let image: HtmlImageElement = image.dyn_into()?;

    let controller = Rc::new(GalleryController {
        cards,
        lightbox: RefCell::new(lightbox),
        view: LightboxView {
            root: root.clone(),
            image,
            meta,
            body,
        },
    });

    // Delegated: clicks on a card's image or caption resolve to the card.
    let on_card = Rc::clone(&controller);
    dom::listen(&gallery, "click", move |event: Event| {
        let Some(card) = dom::closest(&event, ".photo-card") else {
            return;
        };
        if let Some(i) = on_card.cards.iter().position(|c| *c == card) {
            on_card.apply(|lb| Some(LightboxChange::Show(lb.show(i as isize))));
        }
    })?;

    let on_close = Rc::clone(&controller);
    dom::listen(&root, "click", move |event: Event| {
        if dom::closest(&event, "[data-lb-close]").is_some() {
            on_close.apply(|lb| {
                lb.close();
                Some(LightboxChange::Closed)
            });
        }
    })?;

    if let Some(next) = root.query_selector("[data-lb-next]")? {
        let on_next = Rc::clone(&controller);
        dom::listen(&next, "click", move |_: Event| {
            on_next.apply(|lb| Some(LightboxChange::Show(lb.next())));
        })?;
    }
    if let Some(prev) = root.query_selector("[data-lb-prev]")? {
        let on_prev = Rc::clone(&controller);
        dom::listen(&prev, "click", move |_: Event| {
            on_prev.apply(|lb| Some(LightboxChange::Show(lb.prev())));
        })?;
    }

    let on_key = Rc::clone(&controller);
    dom::listen(window, "keydown", move |event: KeyboardEvent| {
        let key = event.key();
        on_key.apply(|lb| lb.on_key(&key));
    })?;

    log::debug!("lightbox ready with {} photos", controller.cards.len());
    Ok(())
}
