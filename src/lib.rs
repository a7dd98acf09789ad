//! # Site Interact
//!
//! Client-side behavior for a static marketing site, compiled to WebAssembly
//! and loaded as the page's module script. The HTML works without it; this
//! crate adds the shared header/footer, scroll reveals, counting statistics,
//! a photo lightbox and the mobile menu.
//!
//! # Architecture: Pure Controllers, Thin Glue
//!
//! Each behavior is split in two:
//!
//! ```text
//! 1. Controller   plain Rust state machine    (no DOM, tested on the host)
//! 2. Glue         web-sys bindings in `web`   (listeners, observers, frames)
//! ```
//!
//! The glue translates browser events into controller calls and renders what
//! the controller returns. Time and animation frames are injected through
//! small traits ([`counter::Clock`], [`counter::FrameScheduler`]) and network
//! access through [`partials::Fetcher`], so every transition, including the
//! count-up animation and the concurrent fragment join, runs under
//! `cargo test` without a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `PageConfig`: defaults, sparse TOML overrides embedded in the page, validation |
//! | [`partials`] | Header/footer fetch-and-inject, current nav link matching |
//! | [`reveal`] | One-shot scroll reveal tracking |
//! | [`counter`] | Eased count-up, grouping, `parseInt`-style parsing, replay |
//! | [`lightbox`] | Gallery modal state machine with wrap-around navigation |
//! | [`nav`] | Mobile menu open/closed state and its dismissal events |
//! | `web` | wasm32-only bindings and the `start` entry point |
//!
//! # Startup Order
//!
//! Fragments load first and are awaited: the nav toggle and links live in the
//! header partial, so binding anything earlier would find nothing. The other
//! controllers then initialize independently. When a fragment fails to load,
//! `boot.on_partial_error` decides whether they still run (`continue`, the
//! default) or startup stops (`abort`).
//!
//! # Markup Contract
//!
//! | Hook | Used by |
//! |------|---------|
//! | `[data-include="header"\|"footer"]` | partial mounts |
//! | `[data-reveal]` | scroll reveal |
//! | `[data-count="1234"]`, `#impact-stats` | counters and replay |
//! | `[data-gallery="kah"] .photo-card[data-full]`, `#lightbox`, `#lightboxImg`, `#lightboxMeta`, `[data-lb-close]`, `[data-lb-next]`, `[data-lb-prev]` | lightbox |
//! | `.nav-toggle`, `#primary-nav`, `.site-header` | mobile nav |
//! | `script[data-page-config]` | config overrides |

pub mod config;
pub mod counter;
pub mod lightbox;
pub mod nav;
pub mod partials;
pub mod reveal;

#[cfg(target_arch = "wasm32")]
mod web;
