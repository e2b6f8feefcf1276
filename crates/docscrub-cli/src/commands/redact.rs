use anyhow::{Context, Result};
use docscrub_config::Config;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::build_redactor;

pub async fn handle(config: Config, input: PathBuf, output: Option<PathBuf>, json: bool) -> Result<()> {
    let redactor = build_redactor(&config).await?;

    let result = match redactor.redact_file(&input).await {
        Ok(result) => result,
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&e.failure())?);
            }
            return Err(e).with_context(|| format!("Failed to redact {}", input.display()));
        }
    };

    let output = output.unwrap_or_else(|| default_output(&input, &result.filename));
    let bytes = result.bytes;
    let target = output.clone();
    tokio::task::spawn_blocking(move || write_atomic(&target, &bytes))
        .await?
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::debug!(output = %output.display(), "Wrote redacted document");

    let report = &result.report;
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("✓ Redacted {} -> {}", input.display(), output.display());
    println!("  Paragraphs scanned: {}", report.stats.paragraphs_scanned);
    println!("  Paragraphs redacted: {}", report.stats.paragraphs_redacted);
    println!("  Runs redacted: {}", report.stats.redacted_runs);
    if !report.stats.categories.is_empty() {
        println!("  Findings:");
        for (category, count) in &report.stats.categories {
            println!("    {}: {}", category, count);
        }
    }
    if report.stats.skipped_paragraphs > 0 {
        println!(
            "  ⚠ {} paragraph(s) could not be analyzed and were left as is",
            report.stats.skipped_paragraphs
        );
    }
    println!("  Output hash: {}", report.output_hash);

    Ok(())
}

/// The suggested file name, next to the input
fn default_output(input: &Path, filename: &str) -> PathBuf {
    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(filename),
        _ => PathBuf::from(filename),
    }
}

/// Write through a temp file in the target directory so a failure never
/// leaves a partial output behind
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
