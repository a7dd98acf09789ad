//! Scroll reveal glue: one intersection observer over every `[data-reveal]`.

use super::dom;
use crate::config::RevealConfig;
use crate::reveal::RevealTracker;
use wasm_bindgen::prelude::*;
use web_sys::Document;

pub(crate) fn init(document: &Document, config: &RevealConfig) -> Result<(), JsValue> {
    let elements = dom::elements(document.query_selector_all("[data-reveal]")?);
    if elements.is_empty() {
        return Ok(());
    }

    let mut tracker = RevealTracker::new(config.threshold);
    for _ in &elements {
        tracker.observe();
    }
    let watched = elements.clone();
    let class = config.class.clone();

    let observer = dom::intersection_observer(config.threshold, move |entry, observer| {
        let target = entry.target();
        let Some(index) = watched.iter().position(|el| *el == target) else {
            return;
        };
        if tracker.on_intersection(index, entry.intersection_ratio(), entry.is_intersecting()) {
            if let Err(e) = target.class_list().add_1(&class) {
                log::error!("reveal: {}", dom::js_error_message(&e));
            }
            observer.unobserve(&target);
        }
    })?;

    for el in &elements {
        observer.observe(el);
    }
    log::debug!("scroll reveal watching {} elements", elements.len());
    Ok(())
}
