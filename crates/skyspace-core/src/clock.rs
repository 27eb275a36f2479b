#![forbid(unsafe_code)]

//! Frame clocks.
//!
//! Two drivers advance field animation once per frame:
//!
//! - [`PeriodicClock`]: an unbounded scalar phase incremented by a fixed rate
//!   each frame. Fields feed it through `sin`, so only its value mod 2π matters.
//! - [`FloodClock`]: a hold/transition state machine over a cyclic sequence.
//!
//! Both take absolute frame timestamps in milliseconds (as delivered by a
//! display loop). A timestamp is admitted at most once: repeated, decreasing,
//! or non-finite timestamps are "no advance", so reading the clock twice in one
//! frame never double-steps it.

use std::time::Duration;

/// Length of one flood transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(6000);

#[inline]
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Admits strictly increasing, finite timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct FrameGate {
    last_ms: Option<f64>,
}

impl FrameGate {
    fn admit(&mut self, now_ms: f64) -> bool {
        if !now_ms.is_finite() {
            return false;
        }
        match self.last_ms {
            Some(last) if now_ms <= last => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    fn reset(&mut self) {
        self.last_ms = None;
    }
}

// ---------------------------------------------------------------------------
// PeriodicClock
// ---------------------------------------------------------------------------

/// Unbounded phase advanced by `rate` once per admitted frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicClock {
    time: f64,
    rate: f64,
    gate: FrameGate,
}

impl PeriodicClock {
    /// Create a clock at phase 0. A non-finite rate is treated as 0.
    pub fn new(rate: f64) -> Self {
        Self {
            time: 0.0,
            rate: if rate.is_finite() { rate } else { 0.0 },
            gate: FrameGate::default(),
        }
    }

    /// Current phase (radians, unbounded).
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Phase increment per frame.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Change the per-frame increment. Non-finite rates are ignored.
    pub fn set_rate(&mut self, rate: f64) {
        if rate.is_finite() {
            self.rate = rate;
        } else {
            tracing::warn!(rate, "ignoring non-finite clock rate");
        }
    }

    /// Step once, unconditionally.
    #[inline]
    pub fn advance(&mut self) {
        self.time += self.rate;
    }

    /// Step once for the frame at `now_ms`. Returns `false` when the timestamp
    /// was not admitted (duplicate, decreasing, or non-finite).
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if !self.gate.admit(now_ms) {
            return false;
        }
        self.advance();
        true
    }

    /// Back to phase 0; the next timestamp is admitted unconditionally.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.gate.reset();
    }
}

impl Default for PeriodicClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

// ---------------------------------------------------------------------------
// FloodClock
// ---------------------------------------------------------------------------

/// Phase of the flood state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FloodPhase {
    /// Waiting on `sequence[current]` for its hold duration.
    #[default]
    Holding,
    /// Flooding from `sequence[current]` to `sequence[next]`.
    Transitioning,
}

/// What a flood field should draw this frame: a transition between two
/// sequence entries at a given progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodFrame {
    pub from_index: usize,
    pub to_index: usize,
    /// Transition progress in `[0, 1]`.
    pub progress: f64,
}

/// Hold/transition state machine over a cyclic sequence of hold durations.
///
/// The clock starts in `Holding(0)` with `0 -> 1` as the pending pair and
/// anchors its first hold to the first admitted timestamp.
///
/// Phase boundaries are scheduled, not observed: a transition starts exactly
/// `hold[i]` after its hold began and the next hold starts exactly
/// [`TRANSITION_DURATION`] later, whatever the frame cadence. A late frame
/// replays every boundary it skipped, in order, so no index is skipped or
/// repeated. Gaps longer than a whole cycle are first reduced modulo the cycle.
///
/// While holding, [`FloodClock::frame`] keeps reporting the last transition
/// frame (`progress = 1`), or `0 -> 1` at `progress = 0` before the first
/// transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodClock {
    current: usize,
    phase: FloodPhase,
    phase_start_ms: Option<f64>,
    progress: f64,
    frame: FloodFrame,
    gate: FrameGate,
}

impl FloodClock {
    pub fn new() -> Self {
        Self {
            current: 0,
            phase: FloodPhase::Holding,
            phase_start_ms: None,
            progress: 0.0,
            frame: FloodFrame {
                from_index: 0,
                to_index: 1,
                progress: 0.0,
            },
            gate: FrameGate::default(),
        }
    }

    /// A clock whose first hold began at `start_ms`.
    pub fn starting_at(start_ms: f64) -> Self {
        let mut clock = Self::new();
        if start_ms.is_finite() {
            clock.phase_start_ms = Some(start_ms);
        }
        clock
    }

    /// Index the machine is holding on, or transitioning from.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Index that follows `current_index` in a sequence of `len` entries.
    #[inline]
    pub fn next_index(&self, len: usize) -> usize {
        if len == 0 { 0 } else { (self.current + 1) % len }
    }

    #[inline]
    pub fn phase(&self) -> FloodPhase {
        self.phase
    }

    /// Progress of the active transition (0 while holding).
    #[inline]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Timestamp at which the current phase began, once anchored.
    #[inline]
    pub fn phase_start_ms(&self) -> Option<f64> {
        self.phase_start_ms
    }

    /// Transition frame to draw.
    #[inline]
    pub fn frame(&self) -> FloodFrame {
        self.frame
    }

    /// Back to `Holding(0)`, re-anchored on the next admitted timestamp.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance to the frame at `now_ms` given the sequence's hold durations.
    ///
    /// Returns `false` (and changes nothing) when the timestamp is not admitted
    /// or `holds` is empty.
    pub fn tick(&mut self, now_ms: f64, holds: &[Duration]) -> bool {
        let len = holds.len();
        if len == 0 || !self.gate.admit(now_ms) {
            return false;
        }
        if self.current >= len {
            tracing::warn!(
                index = self.current,
                len,
                "flood sequence shrank under the clock; restarting at 0"
            );
            *self = Self {
                gate: self.gate,
                ..Self::new()
            };
        }
        if self.frame.to_index >= len || self.frame.from_index >= len {
            self.frame.from_index = self.current;
            self.frame.to_index = self.next_index(len);
        }

        let transition_ms = duration_ms(TRANSITION_DURATION);
        let mut start = *self.phase_start_ms.get_or_insert(now_ms);

        let cycle_ms: f64 = holds.iter().map(|h| duration_ms(*h)).sum::<f64>()
            + transition_ms * len as f64;
        if cycle_ms > 0.0 && now_ms - start >= cycle_ms {
            let cycles = ((now_ms - start) / cycle_ms).floor();
            start += cycles * cycle_ms;
        }

        loop {
            match self.phase {
                FloodPhase::Holding => {
                    let hold_ms = duration_ms(holds[self.current]);
                    if now_ms - start < hold_ms {
                        self.progress = 0.0;
                        break;
                    }
                    start += hold_ms;
                    self.phase = FloodPhase::Transitioning;
                    self.progress = 0.0;
                    self.frame = FloodFrame {
                        from_index: self.current,
                        to_index: self.next_index(len),
                        progress: 0.0,
                    };
                    tracing::debug!(
                        from = self.frame.from_index,
                        to = self.frame.to_index,
                        start_ms = start,
                        "flood transition started"
                    );
                }
                FloodPhase::Transitioning => {
                    let progress = ((now_ms - start) / transition_ms).clamp(0.0, 1.0);
                    self.frame.progress = progress;
                    if progress < 1.0 {
                        self.progress = progress;
                        break;
                    }
                    start += transition_ms;
                    self.current = self.next_index(len);
                    self.phase = FloodPhase::Holding;
                    self.progress = 0.0;
                    tracing::debug!(index = self.current, start_ms = start, "flood hold started");
                }
            }
        }

        self.phase_start_ms = Some(start);
        true
    }
}

impl Default for FloodClock {
    fn default() -> Self {
        Self::new()
    }
}
