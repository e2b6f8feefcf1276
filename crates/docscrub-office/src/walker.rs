//! Document walker: detection and run redaction over every paragraph

use docscrub_core::{RedactionStats, map_runs};
use docscrub_detect::DetectorAdapter;
use tracing::{debug, warn};

use crate::container::{DocumentContainer, ParagraphAccess};

/// Redact every paragraph of `container` in place.
///
/// Detection or run failures never abort the walk: the paragraph is left as
/// it is (or partially redacted, for a run failure) and counted in
/// `skipped_paragraphs`. Paragraph text is never logged.
pub fn redact_container(
    container: &mut dyn DocumentContainer,
    adapter: &DetectorAdapter,
) -> RedactionStats {
    let mut stats = RedactionStats::default();
    container.for_each_paragraph(&mut |paragraph| {
        redact_paragraph(paragraph, adapter, &mut stats);
    });

    debug!(
        format = %container.format(),
        scanned = stats.paragraphs_scanned,
        redacted_runs = stats.redacted_runs,
        skipped = stats.skipped_paragraphs,
        "Walked document"
    );
    stats
}

fn redact_paragraph(
    paragraph: &mut dyn ParagraphAccess,
    adapter: &DetectorAdapter,
    stats: &mut RedactionStats,
) {
    let runs = paragraph.run_texts();
    let text = runs.concat();
    if text.trim().is_empty() {
        return;
    }
    stats.paragraphs_scanned += 1;

    let spans = match adapter.analyze(&text) {
        Ok(spans) => spans,
        Err(e) => {
            warn!(
                location = %paragraph.location(),
                detector = adapter.detector_name(),
                error = %e,
                "Detection failed, paragraph left unredacted"
            );
            stats.skipped_paragraphs += 1;
            return;
        }
    };
    if spans.is_empty() {
        return;
    }
    stats.record_spans(&spans);

    // Decisions come from the original run lengths, before any run changes
    let lengths: Vec<usize> = runs.iter().map(|run| run.chars().count()).collect();
    let decisions = map_runs(&lengths, &spans);

    let mut redacted = 0;
    for decision in decisions.iter().filter(|d| d.is_redact()) {
        if let Err(e) = paragraph.redact_run(decision.run_index) {
            warn!(
                location = %paragraph.location(),
                run = decision.run_index,
                error = %e,
                "Run redaction failed, paragraph skipped"
            );
            stats.redacted_runs += redacted;
            stats.skipped_paragraphs += 1;
            return;
        }
        debug!(
            location = %paragraph.location(),
            run = decision.run_index,
            covered = decision.covered,
            action = ?decision.action,
            "Redacted run"
        );
        redacted += 1;
    }

    stats.redacted_runs += redacted;
    if redacted > 0 {
        stats.paragraphs_redacted += 1;
    }
}
