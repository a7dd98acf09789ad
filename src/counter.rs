//! Count-up animation for statistics.
//!
//! Elements carrying `data-count="1234"` count from 0 to their target when
//! they first scroll into view, and again whenever the stats block is
//! activated (replay).
//!
//! ## Curve
//!
//! ```text
//! p         = clamp(elapsed / duration, 0, 1)
//! displayed = floor(target · (1 − (1 − p)³))
//! ```
//!
//! The cubic ease-out is monotone on `[0, 1]`, so the displayed number never
//! goes backwards, and reaches the target exactly at `p = 1`. Values are shown
//! with `,` thousands separators.
//!
//! ## Time
//!
//! Nothing here reads the real clock or schedules real frames. A [`Clock`]
//! supplies the start timestamp and a [`FrameScheduler`] delivers per-frame
//! timestamps, which keeps the whole animation testable on the host.

use crate::reveal::RevealTracker;
use std::cell::Cell;
use std::rc::Rc;

/// Millisecond timestamps, same time base as the frame scheduler.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Runs a callback once, on the next frame, with that frame's timestamp.
pub trait FrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>);
}

/// Where the counter writes its text.
pub trait TextSink {
    fn set_text(&self, text: &str);
}

pub fn ease_out_cubic(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(3)
}

/// Fraction of the animation elapsed, clamped to `[0, 1]`.
///
/// The first frame's timestamp can precede the recorded start by a fraction of
/// a millisecond; clamping at 0 keeps that frame from showing `-1`.
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

pub fn displayed_value(target: i64, p: f64) -> i64 {
    (target as f64 * ease_out_cubic(p)).floor() as i64
}

/// Format an integer with `,` thousands separators (`1234567` → `1,234,567`).
pub fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parse a `data-count` value the way `parseInt(value, 10)` reads it.
///
/// Leading whitespace and a single sign are accepted, then the longest run of
/// ASCII digits; anything after the digits is ignored (`"120+"` → 120).
/// Returns `None` when no digits are present or the number does not fit.
pub fn parse_target(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Enter and Space activate the stats block like a button.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

/// One rendered frame of a count-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub value: i64,
    pub text: String,
    pub done: bool,
}

/// A count-up from 0 to `target` that started at `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    target: i64,
    start: f64,
    duration: f64,
}

impl CounterAnimation {
    pub fn new(target: i64, start: f64, duration: f64) -> Self {
        Self {
            target,
            start,
            duration,
        }
    }

    pub fn sample(&self, now: f64) -> Frame {
        let p = progress(now - self.start, self.duration);
        let value = displayed_value(self.target, p);
        Frame {
            value,
            text: format_grouped(value),
            done: p >= 1.0,
        }
    }
}

/// How a count-up should run right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub duration_ms: f64,
    /// The user asked for reduced motion: jump straight to the final value.
    pub reduced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPhase {
    Armed,
    Animating,
    Settled,
}

/// A single stat element and its animation state.
pub struct Counter<T> {
    sink: T,
    target: Option<i64>,
    phase: Cell<CounterPhase>,
    // Bumped on every start; frames from an older run stop themselves.
    generation: Cell<u64>,
}

impl<T: TextSink + 'static> Counter<T> {
    pub fn new(sink: T, raw_target: Option<&str>) -> Self {
        Self {
            sink,
            target: raw_target.and_then(parse_target),
            phase: Cell::new(CounterPhase::Armed),
            generation: Cell::new(0),
        }
    }

    pub fn phase(&self) -> CounterPhase {
        self.phase.get()
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    /// Start counting up. Returns `false` (and leaves the element alone) when
    /// the target did not parse.
    pub fn start<C, S>(self: &Rc<Self>, motion: Motion, clock: &C, scheduler: &Rc<S>) -> bool
    where
        C: Clock,
        S: FrameScheduler + 'static,
    {
        let Some(target) = self.target else {
            return false;
        };
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        if motion.reduced {
            self.sink.set_text(&format_grouped(target));
            self.phase.set(CounterPhase::Settled);
            return true;
        }

        self.phase.set(CounterPhase::Animating);
        let animation = CounterAnimation::new(target, clock.now(), motion.duration_ms);
        schedule_step(Rc::clone(self), animation, generation, Rc::clone(scheduler));
        true
    }

    /// Reset the text to `0` and count up again, whatever the current phase.
    pub fn replay<C, S>(self: &Rc<Self>, motion: Motion, clock: &C, scheduler: &Rc<S>) -> bool
    where
        C: Clock,
        S: FrameScheduler + 'static,
    {
        if self.target.is_none() {
            return false;
        }
        self.sink.set_text("0");
        self.start(motion, clock, scheduler)
    }
}

fn schedule_step<T, S>(counter: Rc<Counter<T>>, animation: CounterAnimation, generation: u64, scheduler: Rc<S>)
where
    T: TextSink + 'static,
    S: FrameScheduler + 'static,
{
    let next = Rc::clone(&scheduler);
    scheduler.request_frame(Box::new(move |now| {
        if counter.generation.get() != generation {
            return;
        }
        let frame = animation.sample(now);
        counter.sink.set_text(&frame.text);
        if frame.done {
            counter.phase.set(CounterPhase::Settled);
        } else {
            schedule_step(counter, animation, generation, next);
        }
    }));
}

/// Replay every counter on the page. Returns how many restarted.
pub fn replay<T, C, S>(counters: &[Rc<Counter<T>>], motion: Motion, clock: &C, scheduler: &Rc<S>) -> usize
where
    T: TextSink + 'static,
    C: Clock,
    S: FrameScheduler + 'static,
{
    let restarted = counters
        .iter()
        .filter(|c| c.replay(motion, clock, scheduler))
        .count();
    log::debug!("replayed {restarted} counters");
    restarted
}

/// One-shot intersection gate for counters: each element starts at most once
/// from scrolling. Replay bypasses it.
#[derive(Debug, Clone)]
pub struct CounterGate {
    tracker: RevealTracker,
}

impl CounterGate {
    pub fn new(threshold: f64) -> Self {
        Self {
            tracker: RevealTracker::new(threshold),
        }
    }

    pub fn observe(&mut self) -> usize {
        self.tracker.observe()
    }

    /// `true` when element `index` should start now and be unobserved.
    pub fn on_intersection(&mut self, index: usize, ratio: f64, intersecting: bool) -> bool {
        self.tracker.on_intersection(index, ratio, intersecting)
    }
}
