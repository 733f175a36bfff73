use std::time::{Duration, Instant};

use log::info;

/// Records how long each named phase of a job takes. Marking the same phase again adds to
/// its total, so phases can interleave.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    last: Instant,
    phases: Vec<(&'static str, Duration)>,
}

impl Timer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            phases: Vec::new(),
        }
    }

    /// Charge the time since the previous mark to `phase`.
    pub fn mark(&mut self, phase: &'static str) {
        let now = Instant::now();
        let spent = now - self.last;
        self.last = now;
        match self.phases.iter_mut().find(|(name, _)| *name == phase) {
            Some((_, total)) => *total += spent,
            None => self.phases.push((phase, spent)),
        }
    }

    /// Time spent in `phase` so far.
    pub fn phase(&self, phase: &str) -> Option<Duration> {
        self.phases
            .iter()
            .find(|(name, _)| *name == phase)
            .map(|(_, total)| *total)
    }

    /// Phase names in the order they were first marked.
    pub fn phases(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.phases.iter().map(|(name, _)| *name)
    }

    /// Time since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// One line with every phase and the total, e.g. "read: 16µs / encode: 83µs / total: 99µs".
    pub fn summary(&self) -> String {
        self.phases
            .iter()
            .map(|(name, total)| format!("{}: {:?}", name, total))
            .chain(std::iter::once(format!("total: {:?}", self.elapsed())))
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Log the phase summary at info level.
    pub fn report(&self) {
        info!("{}", self.summary());
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Share of the original size saved by compression: (original - compressed) / original.
/// Negative when the output is larger than the input. Zero for an empty original.
pub fn compression_ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - compressed as f64) / original as f64
}
