//! Counters and the replay trigger on `#impact-stats`.

use super::dom;
use crate::config::CountersConfig;
use crate::counter::{self, Clock, Counter, CounterGate, FrameScheduler, Motion, TextSink};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, KeyboardEvent, Performance, Window};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

struct ElementText(Element);

impl TextSink for ElementText {
    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }
}

struct PerformanceClock(Performance);

impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        self.0.now()
    }
}

struct AnimationFrames(Window);

impl FrameScheduler for AnimationFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        let js = Closure::once_into_js(move |now: f64| callback(now));
        if let Err(e) = self.0.request_animation_frame(js.unchecked_ref()) {
            log::error!("requestAnimationFrame: {}", dom::js_error_message(&e));
        }
    }
}

struct Stats {
    window: Window,
    counters: Vec<Rc<Counter<ElementText>>>,
    clock: PerformanceClock,
    frames: Rc<AnimationFrames>,
    duration_ms: f64,
}

impl Stats {
    /// Read the motion preference at start time, so toggling the OS setting
    /// applies to the next count-up without a reload.
    fn motion(&self) -> Motion {
        let reduced = self
            .window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|mql| mql.matches());
        Motion {
            duration_ms: self.duration_ms,
            reduced,
        }
    }

    fn start(&self, index: usize) {
        if let Some(counter) = self.counters.get(index) {
            counter.start(self.motion(), &self.clock, &self.frames);
        }
    }

    fn replay(&self) {
        counter::replay(&self.counters, self.motion(), &self.clock, &self.frames);
    }
}

pub(crate) fn init(window: &Window, document: &Document, config: &CountersConfig) -> Result<(), JsValue> {
    let elements = dom::elements(document.query_selector_all("[data-count]")?);
    if elements.is_empty() {
        return Ok(());
    }

    let performance = window
        .performance()
        .ok_or_else(|| JsValue::from_str("window.performance unavailable"))?;
    let stats = Rc::new(Stats {
        window: window.clone(),
        counters: elements
            .iter()
            .map(|el| {
                let raw = el.get_attribute("data-count");
                Rc::new(Counter::new(ElementText(el.clone()), raw.as_deref()))
            })
            .collect(),
        clock: PerformanceClock(performance),
        frames: Rc::new(AnimationFrames(window.clone())),
        duration_ms: f64::from(config.duration_ms),
    });

    let mut gate = CounterGate::new(config.threshold);
    for _ in &elements {
        gate.observe();
    }
    let watched = elements.clone();
    let on_view = Rc::clone(&stats);
    let observer = dom::intersection_observer(config.threshold, move |entry, observer| {
        let target = entry.target();
        let Some(index) = watched.iter().position(|el| *el == target) else {
            return;
        };
        if gate.on_intersection(index, entry.intersection_ratio(), entry.is_intersecting()) {
            on_view.start(index);
            observer.unobserve(&target);
        }
    })?;
    for el in &elements {
        observer.observe(el);
    }

    if let Some(impact) = document.get_element_by_id("impact-stats") {
        let on_click = Rc::clone(&stats);
        dom::listen(&impact, "click", move |_: Event| on_click.replay())?;
        let on_key = Rc::clone(&stats);
        dom::listen(&impact, "keydown", move |event: KeyboardEvent| {
            if counter::is_activation_key(&event.key()) {
                event.prevent_default();
                on_key.replay();
            }
        })?;
    }

    log::debug!("{} counters armed", elements.len());
    Ok(())
}
