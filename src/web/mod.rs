//! Browser entry point.
//!
//! [`start`] runs when the wasm module is instantiated. It loads the page
//! config, waits for the header/footer fragments (the nav markup lives in the
//! header, so nothing else can bind before it exists), then initializes each
//! controller independently: a controller whose markup is missing is a no-op,
//! and an error in one never stops the others.

mod dom;
mod fragments;
mod gallery;
mod menu;
mod reveal;
mod stats;

use crate::config::{self, PageConfig, PartialErrorPolicy};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // Ignore "already initialized" when the module is instantiated twice.
    let _ = console_log::init_with_level(level);
    log::info!("site-interact {}", bundle_version());

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = boot().await {
            log::error!("startup failed: {}", dom::js_error_message(&e));
        }
    });
}

fn bundle_version() -> String {
    let hash = env!("BUNDLE_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        format!("{}@{hash}", env!("CARGO_PKG_VERSION"))
    }
}

fn read_page_config(document: &Document) -> Option<String> {
    document
        .query_selector("script[data-page-config]")
        .ok()
        .flatten()
        .and_then(|el| el.text_content())
}

async fn boot() -> Result<(), JsValue> {
    let window = dom::window()?;
    let document = dom::document(&window)?;
    let config = config::load_config(read_page_config(&document).as_deref());

    match fragments::load(&window, &document, &config.partials).await {
        Ok(loaded) => log::debug!("loaded {loaded} partials"),
        Err(e) => {
            log::error!("{e}");
            if config.boot.on_partial_error == PartialErrorPolicy::Abort {
                return Ok(());
            }
        }
    }

    init_controllers(&window, &document, &config);
    mark_loaded(&window, &document)
}

fn init_controllers(window: &Window, document: &Document, config: &PageConfig) {
    let results = [
        (
            "current link",
            fragments::highlight_current_link(window, document, &config.partials),
        ),
        ("scroll reveal", reveal::init(document, &config.reveal)),
        ("mobile nav", menu::init(window, document, &config.nav)),
        ("counters", stats::init(window, document, &config.counters)),
        ("gallery", gallery::init(window, document, &config.gallery)),
    ];
    for (name, result) in results {
        if let Err(e) = result {
            log::error!("{name}: {}", dom::js_error_message(&e));
        }
    }
}

/// Add `is-loaded` to the body on the next frame so hero transitions start
/// from their initial state.
fn mark_loaded(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(body) = document.body() else {
        return Ok(());
    };
    let callback = Closure::once_into_js(move || {
        if let Err(e) = body.class_list().add_1("is-loaded") {
            log::error!("hero: {}", dom::js_error_message(&e));
        }
    });
    window.request_animation_frame(callback.unchecked_ref())?;
    Ok(())
}
