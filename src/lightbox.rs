//! Gallery lightbox state machine.
//!
//! ```text
//!              card activated (i)
//!   Closed ─────────────────────────▶ Open(i)
//!     ▲                                │  next / ArrowRight → Open((i + 1) mod n)
//!     │ close / backdrop / Escape      │  prev / ArrowLeft  → Open((i − 1) mod n)
//!     └────────────────────────────────┘
//! ```
//!
//! The item list is captured once, in document order, when the gallery is
//! initialized. Navigation never re-reads the page, so the index stays valid
//! no matter what the DOM does afterwards. A gallery with no items has no
//! lightbox at all ([`Lightbox::new`] returns `None`), which is what makes the
//! modular arithmetic total.

/// Label used when a card's image has no alt text.
pub const FALLBACK_ALT: &str = "Photo";

/// One gallery card: full-resolution image and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub full: String,
    pub alt: String,
}

impl GalleryItem {
    /// Build an item from the card's `data-full` and its image's `alt`.
    ///
    /// A missing or blank alt becomes [`FALLBACK_ALT`]; a missing `data-full`
    /// becomes an empty source.
    pub fn new(full: Option<String>, alt: Option<String>) -> Self {
        let alt = alt
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| FALLBACK_ALT.to_string());
        Self {
            full: full.unwrap_or_default(),
            alt,
        }
    }
}

/// What the modal should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub src: String,
    pub alt: String,
    /// `"<position> / <total>"`, 1-indexed.
    pub caption: String,
}

/// Result of a transition, for the glue to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightboxChange {
    Show(Slide),
    Closed,
}

#[derive(Debug, Clone)]
pub struct Lightbox {
    items: Vec<GalleryItem>,
    index: usize,
    open: bool,
}

impl Lightbox {
    pub fn new(items: Vec<GalleryItem>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            index: 0,
            open: false,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &GalleryItem {
        &self.items[self.index]
    }

    pub fn caption(&self) -> String {
        format!("{} / {}", self.index + 1, self.items.len())
    }

    /// Open (or move) to item `i`, wrapping in both directions.
    pub fn show(&mut self, i: isize) -> Slide {
        let n = self.items.len() as isize;
        self.index = i.rem_euclid(n) as usize;
        self.open = true;
        let item = self.current();
        Slide {
            src: item.full.clone(),
            alt: item.alt.clone(),
            caption: self.caption(),
        }
    }

    pub fn next(&mut self) -> Slide {
        self.show(self.index as isize + 1)
    }

    pub fn prev(&mut self) -> Slide {
        self.show(self.index as isize - 1)
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Handle a `keydown` key value. Keys are ignored while closed.
    pub fn on_key(&mut self, key: &str) -> Option<LightboxChange> {
        if !self.open {
            return None;
        }
        match key {
            "Escape" => {
                self.close();
                Some(LightboxChange::Closed)
            }
            "ArrowRight" => Some(LightboxChange::Show(self.next())),
            "ArrowLeft" => Some(LightboxChange::Show(self.prev())),
            _ => None,
        }
    }
}
