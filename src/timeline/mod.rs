//! Timeline algebra: ordered phenomena over a validity interval.

use itertools::Itertools;
use log::debug;

use crate::prelude::{Duration, Epoch};

/// A phenomenon code. Detectors and the access planner tag every
/// [Phenomenon] they produce with one of these.
pub type Code = &'static str;

/// A single date at which a phenomenon starts or ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodedEvent {
    /// Date of occurrence.
    pub date: Epoch,
    /// Phenomenon code this event belongs to.
    pub code: Code,
    /// True if this event marks the start of the phenomenon, false if its end.
    pub is_start: bool,
}

impl CodedEvent {
    pub fn start_of(date: Epoch, code: Code) -> Self {
        Self {
            date,
            code,
            is_start: true,
        }
    }
    pub fn end_of(date: Epoch, code: Code) -> Self {
        Self {
            date,
            code,
            is_start: false,
        }
    }
}

/// A time interval during which a phenomenon holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phenomenon {
    pub code: Code,
    pub start_event: CodedEvent,
    pub end_event: CodedEvent,
}

impl Phenomenon {
    pub fn new(code: Code, start: Epoch, end: Epoch) -> Self {
        Self {
            code,
            start_event: CodedEvent::start_of(start, code),
            end_event: CodedEvent::end_of(end, code),
        }
    }

    pub fn start(&self) -> Epoch {
        self.start_event.date
    }

    pub fn end(&self) -> Epoch {
        self.end_event.date
    }

    pub fn duration(&self) -> Duration {
        self.end() - self.start()
    }

    /// Overlap test against another phenomenon, regardless of code.
    pub fn overlaps(&self, other: &Phenomenon) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }

    /// Intersection of two phenomena's timespans, if any.
    fn intersection(&self, other: &Phenomenon) -> Option<(Epoch, Epoch)> {
        let start = self.start().max(other.start());
        let end = self.end().min(other.end());
        if start < end {
            Some((start, end))
        } else {
            None
        }
    }
}

/// An ordered set of [Phenomenon], valid over a fixed interval.
#[derive(Debug, Clone)]
pub struct Timeline {
    validity_start: Epoch,
    validity_end: Epoch,
    phenomena: Vec<Phenomenon>,
}

impl Timeline {
    /// Builds a new, empty [Timeline] valid over `[start, end]`.
    pub fn new(start: Epoch, end: Epoch) -> Self {
        Self {
            validity_start: start,
            validity_end: end,
            phenomena: Vec::new(),
        }
    }

    pub fn validity(&self) -> (Epoch, Epoch) {
        (self.validity_start, self.validity_end)
    }

    /// Appends a phenomenon. Does not deduplicate, does not re-sort eagerly:
    /// ordering is only enforced when phenomena of a given code are queried.
    pub fn add_phenomenon(&mut self, p: Phenomenon) {
        debug_assert!(
            p.start() >= self.validity_start && p.end() <= self.validity_end,
            "phenomenon timespan escapes timeline validity interval"
        );
        self.phenomena.push(p);
    }

    /// All phenomena, regardless of code.
    pub fn phenomena(&self) -> &[Phenomenon] {
        &self.phenomena
    }

    /// Phenomena of a given code, in chronological order of start.
    pub fn by_code(&self, code: Code) -> Vec<&Phenomenon> {
        self.phenomena
            .iter()
            .filter(|p| p.code == code)
            .sorted_by_key(|p| p.start())
            .collect()
    }

    /// For every maximal interval where at least one phenomenon tagged `code_a`
    /// overlaps at least one tagged `code_b`, inserts a new phenomenon tagged
    /// `code_out` spanning the intersection. Commutative in `code_a`/`code_b`.
    /// Input phenomena are preserved.
    pub fn apply_and(&mut self, code_a: Code, code_b: Code, code_out: Code) {
        let a = self.by_code(code_a);
        let b = self.by_code(code_b);

        let mut produced = Vec::new();
        for pa in &a {
            for pb in &b {
                if let Some((start, end)) = pa.intersection(pb) {
                    produced.push(Phenomenon::new(code_out, start, end));
                }
            }
        }
        produced = produced.into_iter().sorted_by_key(|p| p.start()).collect();

        debug!(
            "AND({}, {}) -> {} : {} phenomena",
            code_a,
            code_b,
            code_out,
            produced.len()
        );

        self.phenomena.extend(produced);
    }

    /// Removes all phenomena whose code does (`keep = false`) or does not
    /// (`keep = true`) match `code`.
    pub fn filter_by_code(&mut self, code: Code, keep: bool) {
        self.phenomena
            .retain(|p| (p.code == code) == keep);
    }

    /// Removes phenomena of the given code whose duration is below `min`
    /// (strict: `< min`; non-strict: `<= min`).
    pub fn filter_by_min_duration(&mut self, code: Code, min: Duration, strict: bool) {
        self.phenomena.retain(|p| {
            if p.code != code {
                return true;
            }
            if strict {
                p.duration() > min
            } else {
                p.duration() >= min
            }
        });
    }

    /// Union of this timeline's phenomena with another's (used to merge the
    /// three raw per-detector timelines into one before combination).
    pub fn merge(&mut self, other: &Timeline) {
        self.phenomena.extend(other.phenomena.iter().copied());
    }
}
