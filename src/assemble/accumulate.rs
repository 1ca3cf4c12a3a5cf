use crate::{
    clip::handle::{ClipHandle, release_all},
    foundation::error::ReelResult,
};

/// Why an entry did not make it into the reel.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// Processing the entry failed.
    Failed(String),
    /// Adding the clip would have exceeded the duration budget.
    OverBudget {
        /// Duration of the rejected clip.
        clip_duration: f64,
        /// Accumulated duration when the clip was offered.
        total: f64,
    },
}

/// An entry left out of the reel.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedEntry {
    /// Timeline key.
    pub name: String,
    /// Why it was left out.
    pub reason: SkipReason,
}

/// What [`Accumulator::offer`] did with an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offer {
    /// Clip appended.
    Accepted,
    /// Entry failed.
    Failed,
    /// Clip rejected for the budget and released.
    OverBudget,
}

/// Ordered, duration-budgeted clip list.
///
/// Entries are offered in timeline order and never reordered; an over-budget clip is dropped
/// but later, shorter clips may still fit.
#[derive(Debug)]
pub struct Accumulator {
    max_duration: f64,
    total: f64,
    clips: Vec<ClipHandle>,
    skipped: Vec<SkippedEntry>,
}

impl Accumulator {
    /// Empty accumulator with a budget of `max_duration` seconds.
    pub fn new(max_duration: f64) -> Self {
        Self {
            max_duration,
            total: 0.0,
            clips: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Fold one entry's processing result into the list.
    pub fn offer(&mut self, name: &str, result: ReelResult<ClipHandle>) -> Offer {
        let clip = match result {
            Ok(clip) => clip,
            Err(e) => {
                tracing::warn!(entry = %name, error = %e, "skipping entry after error");
                self.skipped.push(SkippedEntry {
                    name: name.to_string(),
                    reason: SkipReason::Failed(e.to_string()),
                });
                return Offer::Failed;
            }
        };

        let clip_duration = clip.duration();
        if self.total + clip_duration > self.max_duration {
            tracing::info!(
                entry = %name,
                clip_duration,
                total = self.total,
                max = self.max_duration,
                "skipping entry: reel duration budget exceeded"
            );
            self.skipped.push(SkippedEntry {
                name: name.to_string(),
                reason: SkipReason::OverBudget {
                    clip_duration,
                    total: self.total,
                },
            });
            release_all([clip]);
            return Offer::OverBudget;
        }

        tracing::debug!(entry = %name, clip_duration, "appended clip");
        self.total += clip_duration;
        self.clips.push(clip);
        Offer::Accepted
    }

    /// Accumulated duration.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Accepted clips in order.
    pub fn clips(&self) -> &[ClipHandle] {
        &self.clips
    }

    /// Entries skipped so far.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Split into accepted clips and skipped entries.
    pub fn finish(self) -> (Vec<ClipHandle>, Vec<SkippedEntry>) {
        (self.clips, self.skipped)
    }
}
