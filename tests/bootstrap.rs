//! End-to-end scenarios for the page controllers, driven without a browser.
//!
//! Each test wires controllers the way the wasm glue does (config → loader →
//! gate → animation) but with in-memory fetchers, mounts, clocks and frames.

use futures::executor::block_on;
use site_interact::config::{self, PageConfig};
use site_interact::counter::{Clock, Counter, CounterGate, FrameScheduler, Motion, TextSink};
use site_interact::lightbox::{GalleryItem, Lightbox, LightboxChange};
use site_interact::nav::{NavEvent, NavToggle};
use site_interact::partials::{FetchError, Fetcher, Mount, Partial, PartialLoader};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

// ===========================================================================
// Fakes
// ===========================================================================

#[derive(Default)]
struct Server {
    files: HashMap<&'static str, &'static str>,
    requests: RefCell<Vec<String>>,
}

impl Fetcher for Server {
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> {
        self.requests.borrow_mut().push(path.to_string());
        let result = match self.files.get(path) {
            Some(body) => Ok(body.to_string()),
            None => Err(FetchError::Status {
                path: path.to_string(),
                status: 404,
            }),
        };
        async move { result }
    }
}

#[derive(Clone, Default)]
struct Slot(Rc<RefCell<String>>);

impl Mount for Slot {
    fn set_html(&self, html: &str) {
        *self.0.borrow_mut() = html.to_string();
    }
}

impl TextSink for Slot {
    fn set_text(&self, text: &str) {
        *self.0.borrow_mut() = text.to_string();
    }
}

struct Clock0(Cell<f64>);

impl Clock for Clock0 {
    fn now(&self) -> f64 {
        self.0.get()
    }
}

#[derive(Default)]
struct Frames(RefCell<Vec<Box<dyn FnOnce(f64)>>>);

impl Frames {
    fn run_until_idle(&self, mut now: f64, step: f64) {
        loop {
            let queued: Vec<_> = self.0.borrow_mut().drain(..).collect();
            if queued.is_empty() {
                break;
            }
            for cb in queued {
                cb(now);
            }
            now += step;
        }
    }
}

impl FrameScheduler for Frames {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        self.0.borrow_mut().push(callback);
    }
}

fn motion(config: &PageConfig, reduced: bool) -> Motion {
    Motion {
        duration_ms: f64::from(config.counters.duration_ms),
        reduced,
    }
}

// ===========================================================================
// Partials
// ===========================================================================

#[test]
fn header_only_page_fetches_only_the_header() {
    let config = PageConfig::default();
    let server = Server {
        files: HashMap::from([("partials/header.html", "<header class=\"site-header\"></header>")]),
        ..Server::default()
    };
    let header = Slot::default();

    let loaded = block_on(PartialLoader::new(&config.partials).load(&server, vec![(Partial::Header, header.clone())]))
        .unwrap();

    assert_eq!(loaded, 1);
    assert_eq!(*server.requests.borrow(), vec!["partials/header.html".to_string()]);
    assert!(header.0.borrow().contains("site-header"));
}

#[test]
fn header_404_rejects_and_leaves_mount_empty() {
    let config = PageConfig::default();
    let server = Server::default();
    let header = Slot::default();

    let err = block_on(PartialLoader::new(&config.partials).load(&server, vec![(Partial::Header, header.clone())]))
        .unwrap_err();

    assert!(err.to_string().contains("404"), "got: {err}");
    assert!(err.to_string().contains("partials/header.html"));
    assert!(header.0.borrow().is_empty());
}

#[test]
fn root_absolute_base_from_page_config() {
    let config = config::parse_config("[partials]\nbase = \"/partials/\"\n").unwrap();
    let server = Server {
        files: HashMap::from([
            ("/partials/header.html", "<nav></nav>"),
            ("/partials/footer.html", "<footer></footer>"),
        ]),
        ..Server::default()
    };

    let loaded = block_on(PartialLoader::new(&config.partials).load(
        &server,
        vec![(Partial::Header, Slot::default()), (Partial::Footer, Slot::default())],
    ))
    .unwrap();

    assert_eq!(loaded, 2);
    assert!(server.requests.borrow().iter().all(|p| p.starts_with("/partials/")));
}

// ===========================================================================
// Counters
// ===========================================================================

#[test]
fn counter_counts_to_grouped_target_after_entering_view() {
    let config = PageConfig::default();
    let clock = Clock0(Cell::new(1000.0));
    let frames = Rc::new(Frames::default());
    let slot = Slot::default();
    let counter = Rc::new(Counter::new(slot.clone(), Some("1234")));

    let mut gate = CounterGate::new(config.counters.threshold);
    let i = gate.observe();
    // Peeking in below the threshold does nothing
    assert!(!gate.on_intersection(i, 0.1, true));
    assert!(gate.on_intersection(i, 0.6, true));
    counter.start(motion(&config, false), &clock, &frames);

    frames.run_until_idle(1000.0, 16.0);
    assert_eq!(*slot.0.borrow(), "1,234");
}

#[test]
fn counter_under_reduced_motion_is_immediate() {
    let config = PageConfig::default();
    let clock = Clock0(Cell::new(0.0));
    let frames = Rc::new(Frames::default());
    let slot = Slot::default();
    let counter = Rc::new(Counter::new(slot.clone(), Some("1234")));

    counter.start(motion(&config, true), &clock, &frames);
    assert_eq!(*slot.0.borrow(), "1,234");
}

#[test]
fn replay_restarts_from_zero() {
    let config = PageConfig::default();
    let clock = Clock0(Cell::new(0.0));
    let frames = Rc::new(Frames::default());
    let slots = [Slot::default(), Slot::default()];
    let counters: Vec<_> = [("250", &slots[0]), ("12000", &slots[1])]
        .into_iter()
        .map(|(raw, slot)| Rc::new(Counter::new(slot.clone(), Some(raw))))
        .collect();

    site_interact::counter::replay(&counters, motion(&config, false), &clock, &frames);
    assert_eq!(*slots[0].0.borrow(), "0");
    assert_eq!(*slots[1].0.borrow(), "0");

    frames.run_until_idle(0.0, 100.0);
    assert_eq!(*slots[0].0.borrow(), "250");
    assert_eq!(*slots[1].0.borrow(), "12,000");
}

// ===========================================================================
// Lightbox and nav
// ===========================================================================

#[test]
fn arrow_left_from_first_photo_shows_last() {
    let items = ["a", "b", "c"]
        .iter()
        .map(|n| GalleryItem::new(Some(format!("/img/{n}-full.jpg")), Some(format!("Photo {n}"))))
        .collect();
    let mut lightbox = Lightbox::new(items).unwrap();

    lightbox.show(0);
    let Some(LightboxChange::Show(slide)) = lightbox.on_key("ArrowLeft") else {
        panic!("ArrowLeft should navigate while open");
    };

    assert_eq!(slide.caption, "3 / 3");
    assert_eq!(slide.src, "/img/c-full.jpg");
}

#[test]
fn widening_the_viewport_closes_open_menu() {
    let config = PageConfig::default();
    let mut nav = NavToggle::new(config.nav.breakpoint);

    nav.apply(NavEvent::ToggleClicked);
    assert!(nav.is_open());
    nav.apply(NavEvent::Resized(1280.0));
    assert!(!nav.is_open());
    assert_eq!(nav.aria_label(), "Open menu");
}
