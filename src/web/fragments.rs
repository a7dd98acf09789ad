//! Browser side of the partial loader: `fetch()` and element mounts.

use super::dom;
use crate::config::PartialsConfig;
use crate::partials::{self, FetchError, Fetcher, Mount, Partial, PartialLoader};
use std::future::Future;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlAnchorElement, Request, RequestCache, RequestInit, Response, Url, Window};

/// Fetches fragments relative to the document base URI.
struct WindowFetcher {
    window: Window,
    base_uri: String,
    no_store: bool,
}

impl WindowFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let network = |e: JsValue| FetchError::Network {
            path: path.to_string(),
            message: dom::js_error_message(&e),
        };

        let url = Url::new_with_base(path, &self.base_uri).map_err(network)?.href();
        let init = RequestInit::new();
        init.set_method("GET");
        if self.no_store {
            init.set_cache(RequestCache::NoStore);
        }
        let request = Request::new_with_str_and_init(&url, &init).map_err(network)?;
        let response: Response = JsFuture::from(self.window.fetch_with_request(&request))
            .await
            .and_then(|r| r.dyn_into())
            .map_err(network)?;
        if !response.ok() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: response.status(),
            });
        }
        let promise = response.text().map_err(network)?;
        let text = JsFuture::from(promise).await.map_err(network)?;
        Ok(text.as_string().unwrap_or_default())
    }
}

impl Fetcher for WindowFetcher {
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> {
        let path = path.to_string();
        async move { self.fetch(&path).await }
    }
}

struct ElementMount(Element);

impl Mount for ElementMount {
    fn set_html(&self, html: &str) {
        self.0.set_inner_html(html);
    }
}

/// Fill every `[data-include]` mount present on the page.
pub(crate) async fn load(window: &Window, document: &Document, config: &PartialsConfig) -> Result<usize, FetchError> {
    let mounts: Vec<(Partial, ElementMount)> = Partial::ALL
        .into_iter()
        .filter_map(|partial| {
            let selector = format!("[data-include='{}']", partial.name());
            let element = document.query_selector(&selector).ok().flatten()?;
            Some((partial, ElementMount(element)))
        })
        .collect();

    if mounts.is_empty() {
        log::debug!("no partial mounts on this page");
        return Ok(0);
    }

    let fetcher = WindowFetcher {
        window: window.clone(),
        base_uri: document
            .base_uri()
            .ok()
            .flatten()
            .unwrap_or_else(|| window.location().href().unwrap_or_default()),
        no_store: config.no_store,
    };
    PartialLoader::new(config).load(&fetcher, mounts).await
}

/// Color every nav link that points at the current page.
pub(crate) fn highlight_current_link(window: &Window, document: &Document, config: &PartialsConfig) -> Result<(), JsValue> {
    let links: Vec<HtmlAnchorElement> = dom::elements(document.query_selector_all(&config.nav_links)?)
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlAnchorElement>().ok())
        // In-page anchors resolve to the current path; they are not "the current page" link.
        .filter(|a| !a.get_attribute("href").unwrap_or_default().starts_with('#'))
        .collect();
    if links.is_empty() {
        return Ok(());
    }

    let location = window.location();
    let page_origin = location.origin()?;
    let page_path = location.pathname()?;
    let targets: Vec<(String, String)> = links.iter().map(|a| (a.origin(), a.pathname())).collect();
    for i in partials::current_link_indices((page_origin.as_str(), page_path.as_str()), &targets) {
        links[i].style().set_property("color", &config.current_link_color)?;
        log::debug!("current nav link: {}", targets[i].1);
    }
    Ok(())
}
