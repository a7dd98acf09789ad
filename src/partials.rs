//! Shared header/footer fragments.
//!
//! Pages carry empty mount points (`<div data-include="header"></div>`) that
//! are filled at startup from `partials/header.html` and `partials/footer.html`.
//! The loader itself is DOM-agnostic: it talks to a [`Fetcher`] and writes into
//! [`Mount`]s, so the browser glue and the tests supply their own.
//!
//! ## Join Semantics
//!
//! All fetches run concurrently and every one of them is driven to completion,
//! so a failed header never prevents a successful footer from being injected.
//! The caller sees the first failure in completion order; later failures are
//! only logged.
//!
//! ## Current Link
//!
//! Once the header is in place the nav link pointing at the current page is
//! highlighted. Paths are compared after [`normalize_path`], so `/about` and
//! `/about/` are the same page. Links to another origin never match, even when
//! their path does (`https://example.org/` is not the home page).

use crate::config::PartialsConfig;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("Fetch failed {path}: {status}")]
    Status { path: String, status: u16 },
    /// The request never produced a response (offline, CORS, aborted).
    #[error("Fetch failed {path}: {message}")]
    Network { path: String, message: String },
}

/// A fragment the page can include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partial {
    Header,
    Footer,
}

impl Partial {
    pub const ALL: [Partial; 2] = [Partial::Header, Partial::Footer];

    /// Value of the mount's `data-include` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Partial::Header => "header",
            Partial::Footer => "footer",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Partial::Header => "header.html",
            Partial::Footer => "footer.html",
        }
    }
}

/// Retrieves fragment text by path.
pub trait Fetcher {
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// A location that receives injected markup.
pub trait Mount {
    fn set_html(&self, html: &str);
}

pub struct PartialLoader {
    base: String,
}

impl PartialLoader {
    pub fn new(config: &PartialsConfig) -> Self {
        let base = if config.base.ends_with('/') {
            config.base.clone()
        } else {
            format!("{}/", config.base)
        };
        Self { base }
    }

    /// Path requested for `partial`, e.g. `partials/header.html`.
    pub fn path_for(&self, partial: Partial) -> String {
        format!("{}{}", self.base, partial.file_name())
    }

    /// Fetch every mounted partial concurrently and inject the results.
    ///
    /// Returns the number of mounts filled. Partials without a mount are never
    /// requested.
    pub async fn load<F, M>(&self, fetcher: &F, mounts: Vec<(Partial, M)>) -> Result<usize, FetchError>
    where
        F: Fetcher,
        M: Mount,
    {
        let mut pending: FuturesUnordered<_> = mounts
            .into_iter()
            .map(|(partial, mount)| {
                let path = self.path_for(partial);
                async move {
                    let html = fetcher.fetch_text(&path).await?;
                    mount.set_html(&html);
                    log::debug!("injected {} ({} bytes)", path, html.len());
                    Ok::<_, FetchError>(())
                }
            })
            .collect();

        let mut loaded = 0;
        let mut first_error = None;
        while let Some(result) = pending.next().await {
            match result {
                Ok(()) => loaded += 1,
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => log::warn!("{e}"),
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(loaded),
        }
    }
}

/// Normalize a URL path to end with exactly one trailing slash.
///
/// - `"/about"` → `"/about/"`
/// - `"/about/"` → `"/about/"`
/// - `""` → `"/"`
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    format!("{trimmed}/")
}

/// Indices of the links that point at the current page.
///
/// `page` and each link are `(origin, path)` pairs. Links are given in document
/// order; every match is returned so duplicated links (desktop and mobile
/// menus) are all highlighted.
pub fn current_link_indices<S: AsRef<str>>(page: (&str, &str), links: &[(S, S)]) -> Vec<usize> {
    let (origin, path) = page;
    let current = normalize_path(path);
    links
        .iter()
        .enumerate()
        .filter(|(_, (link_origin, link_path))| {
            link_origin.as_ref() == origin && normalize_path(link_path.as_ref()) == current
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::ready;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeFetcher {
        responses: HashMap<String, Result<String, FetchError>>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn ok(mut self, path: &str, body: &str) -> Self {
            self.responses.insert(path.to_string(), Ok(body.to_string()));
            self
        }

        fn status(mut self, path: &str, status: u16) -> Self {
            self.responses.insert(
                path.to_string(),
                Err(FetchError::Status {
                    path: path.to_string(),
                    status,
                }),
            );
            self
        }
    }

    impl Fetcher for FakeFetcher {
        fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> {
            self.requested.borrow_mut().push(path.to_string());
            ready(self.responses.get(path).cloned().unwrap_or_else(|| {
                Err(FetchError::Status {
                    path: path.to_string(),
                    status: 404,
                })
            }))
        }
    }

    #[derive(Clone, Default)]
    struct FakeMount(Rc<RefCell<String>>);

    impl Mount for FakeMount {
        fn set_html(&self, html: &str) {
            *self.0.borrow_mut() = html.to_string();
        }
    }

    fn loader() -> PartialLoader {
        PartialLoader::new(&PartialsConfig::default())
    }

    #[test]
    fn partial_names_and_files() {
        assert_eq!(Partial::Header.name(), "header");
        assert_eq!(Partial::Footer.file_name(), "footer.html");
    }

    #[test]
    fn path_for_default_base() {
        assert_eq!(loader().path_for(Partial::Header), "partials/header.html");
        assert_eq!(loader().path_for(Partial::Footer), "partials/footer.html");
    }

    #[test]
    fn path_for_root_absolute_base_without_slash() {
        let config = PartialsConfig {
            base: "/partials".to_string(),
            ..PartialsConfig::default()
        };
        assert_eq!(
            PartialLoader::new(&config).path_for(Partial::Header),
            "/partials/header.html"
        );
    }

    #[test]
    fn load_injects_both_partials() {
        let fetcher = FakeFetcher::default()
            .ok("partials/header.html", "<nav>h</nav>")
            .ok("partials/footer.html", "<p>f</p>");
        let header = FakeMount::default();
        let footer = FakeMount::default();

        let loaded = block_on(loader().load(
            &fetcher,
            vec![(Partial::Header, header.clone()), (Partial::Footer, footer.clone())],
        ))
        .unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(*header.0.borrow(), "<nav>h</nav>");
        assert_eq!(*footer.0.borrow(), "<p>f</p>");
    }

    #[test]
    fn load_with_no_mounts_fetches_nothing() {
        let fetcher = FakeFetcher::default();
        let loaded = block_on(loader().load(&fetcher, Vec::<(Partial, FakeMount)>::new())).unwrap();
        assert_eq!(loaded, 0);
        assert!(fetcher.requested.borrow().is_empty());
    }

    #[test]
    fn failed_header_still_injects_footer() {
        let fetcher = FakeFetcher::default()
            .status("partials/header.html", 500)
            .ok("partials/footer.html", "<p>f</p>");
        let header = FakeMount::default();
        let footer = FakeMount::default();

        let err = block_on(loader().load(
            &fetcher,
            vec![(Partial::Header, header.clone()), (Partial::Footer, footer.clone())],
        ))
        .unwrap_err();

        assert_eq!(
            err,
            FetchError::Status {
                path: "partials/header.html".to_string(),
                status: 500
            }
        );
        assert!(header.0.borrow().is_empty());
        assert_eq!(*footer.0.borrow(), "<p>f</p>");
    }

    #[test]
    fn first_failure_is_reported_when_both_fail() {
        let fetcher = FakeFetcher::default()
            .status("partials/header.html", 404)
            .status("partials/footer.html", 503);

        let err = block_on(loader().load(
            &fetcher,
            vec![
                (Partial::Header, FakeMount::default()),
                (Partial::Footer, FakeMount::default()),
            ],
        ))
        .unwrap_err();

        // Exactly one error surfaces; both requests were still issued.
        assert!(matches!(err, FetchError::Status { .. }), "got: {err}");
        assert_eq!(fetcher.requested.borrow().len(), 2);
    }

    #[test]
    fn network_error_message_names_path() {
        let err = FetchError::Network {
            path: "partials/footer.html".to_string(),
            message: "TypeError: Failed to fetch".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Fetch failed partials/footer.html: TypeError: Failed to fetch"
        );
    }

    #[test]
    fn normalize_path_adds_single_trailing_slash() {
        assert_eq!(normalize_path("/about"), "/about/");
        assert_eq!(normalize_path("/about/"), "/about/");
        assert_eq!(normalize_path("/about//"), "/about/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    const SITE: &str = "https://kah.example";

    fn local(paths: &[&'static str]) -> Vec<(&'static str, &'static str)> {
        paths.iter().map(|p| (SITE, *p)).collect()
    }

    #[test]
    fn current_link_matches_with_or_without_slash() {
        let links = local(&["/", "/about/", "/work", "/contact/"]);
        assert_eq!(current_link_indices((SITE, "/about"), &links), vec![1]);
        assert_eq!(current_link_indices((SITE, "/work/"), &links), vec![2]);
        assert_eq!(current_link_indices((SITE, "/"), &links), vec![0]);
    }

    #[test]
    fn current_link_returns_every_duplicate() {
        let links = local(&["/work/", "/about/", "/work"]);
        assert_eq!(current_link_indices((SITE, "/work"), &links), vec![0, 2]);
    }

    #[test]
    fn current_link_none_for_unknown_page() {
        let links = local(&["/", "/about/"]);
        assert!(current_link_indices((SITE, "/blog/post"), &links).is_empty());
    }

    #[test]
    fn external_link_with_same_path_is_not_current() {
        let links = [
            (SITE, "/"),
            (SITE, "/about/"),
            ("https://facebook.com", "/"),
            ("https://other.org", "/about/"),
        ];
        assert_eq!(current_link_indices((SITE, "/"), &links), vec![0]);
        assert_eq!(current_link_indices((SITE, "/about"), &links), vec![1]);
    }
}
