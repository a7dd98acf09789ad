//! Scroll-reveal bookkeeping.
//!
//! Elements marked `data-reveal` start hidden (by CSS) and receive the reveal
//! class the first time enough of them is on screen. Revealing is one-way: the
//! element is unobserved afterwards and never loses the class.
//!
//! [`RevealTracker`] holds the per-element state; the browser glue feeds it
//! intersection entries and applies the class when it says so.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Observed,
    Revealed,
}

/// One-shot visibility gate over an ordered set of elements.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    threshold: f64,
    states: Vec<RevealState>,
}

impl RevealTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            states: Vec::new(),
        }
    }

    /// Start watching a new element; returns its index.
    pub fn observe(&mut self) -> usize {
        self.states.push(RevealState::Observed);
        self.states.len() - 1
    }

    /// Record an intersection entry for element `index`.
    ///
    /// Returns `true` exactly once per element: on the first entry that is
    /// intersecting with a ratio at or above the threshold. The caller should
    /// apply the reveal and stop observing the element.
    pub fn on_intersection(&mut self, index: usize, ratio: f64, intersecting: bool) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        if *state == RevealState::Revealed {
            return false;
        }
        if !intersecting || ratio < self.threshold {
            return false;
        }
        *state = RevealState::Revealed;
        log::trace!("revealed element {index} at ratio {ratio:.3}");
        true
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.states.get(index) == Some(&RevealState::Revealed)
    }

    /// Number of elements still waiting to be revealed.
    pub fn pending(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s == RevealState::Observed)
            .count()
    }
}
