//! Span-to-run mapper
//!
//! A paragraph's text is the concatenation of its runs, but detectors report
//! offsets into the flattened text. `map_runs` walks both sequences with two
//! cursors and decides, per run, whether it has to be redacted. Redaction is
//! run-granular: a run touched by any span is redacted whole (outward rounding).
//!
//! Every step advances exactly one cursor, so the sweep finishes in at most
//! `run_lengths.len() + spans.len()` steps whatever the span order.

use serde::{Deserialize, Serialize};

use crate::Span;

/// What to do with one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunAction {
    /// No span touches the run
    None,
    /// Spans cover every char of the run
    FullyRedact,
    /// Spans cover part of the run; escalated to a whole-run redaction
    PartiallyRedact,
}

impl RunAction {
    pub fn is_redact(self) -> bool {
        !matches!(self, RunAction::None)
    }
}

/// Decision for the run at `run_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionDecision {
    pub run_index: usize,
    pub action: RunAction,
    /// Chars of the run intersected by spans
    pub covered: usize,
}

impl RedactionDecision {
    fn untouched(run_index: usize) -> Self {
        Self {
            run_index,
            action: RunAction::None,
            covered: 0,
        }
    }

    pub fn is_redact(&self) -> bool {
        self.action.is_redact()
    }
}

/// Map paragraph-relative spans onto runs.
///
/// `run_lengths[i]` is the char length of run `i`; the start offset of run `i`
/// is the sum of the lengths before it. Returns exactly one decision per run,
/// in run order.
///
/// Spans are expected sorted by `start` and non-overlapping. Unsorted or
/// overlapping input is not corrected (runs may be under- or double-marked)
/// but always terminates. Spans with `start >= end` are skipped.
pub fn map_runs(run_lengths: &[usize], spans: &[Span]) -> Vec<RedactionDecision> {
    let mut decisions: Vec<RedactionDecision> = (0..run_lengths.len())
        .map(RedactionDecision::untouched)
        .collect();

    let mut run_cursor = 0;
    let mut span_cursor = 0;
    let mut offset = 0;

    while run_cursor < run_lengths.len() && span_cursor < spans.len() {
        let len = run_lengths[run_cursor];
        let run_start = offset;
        let run_end = offset + len;
        let span = &spans[span_cursor];

        if span.is_empty() {
            span_cursor += 1;
            continue;
        }

        let overlap = span.intersection(run_start, run_end);
        if overlap > 0 {
            decisions[run_cursor].covered += overlap;
        }

        if span.end <= run_end {
            // Finished inside (or before) this run. Stay: the next span may
            // touch the same run.
            span_cursor += 1;
        } else {
            offset = run_end;
            run_cursor += 1;
        }
    }

    for (decision, &len) in decisions.iter_mut().zip(run_lengths) {
        decision.covered = decision.covered.min(len);
        decision.action = match decision.covered {
            0 => RunAction::None,
            covered if covered >= len => RunAction::FullyRedact,
            _ => RunAction::PartiallyRedact,
        };
    }

    decisions
}
