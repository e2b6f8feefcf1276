use anyhow::Result;
use docscrub_config::Config;
use docscrub_core::{Error, Span};
use serde::Serialize;

use super::build_redactor;

#[derive(Serialize)]
struct Finding<'a> {
    #[serde(flatten)]
    span: &'a Span,
    text: String,
}

pub async fn handle(config: Config, text: String, json: bool) -> Result<()> {
    let redactor = build_redactor(&config).await?;

    let input = text.clone();
    let analyzed = tokio::task::spawn_blocking(move || {
        redactor
            .adapter()
            .analyze(&input)
            .map_err(|e| Error::Detection(e.to_string()))
    })
    .await?;

    let spans = match analyzed {
        Ok(spans) => spans,
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&e.failure())?);
            }
            return Err(e.into());
        }
    };

    let chars: Vec<char> = text.chars().collect();
    let findings: Vec<Finding> = spans
        .iter()
        .map(|span| Finding {
            span,
            text: chars[span.start..span.end].iter().collect(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&findings)?);
        return Ok(());
    }

    if findings.is_empty() {
        println!("No sensitive data found.");
        return Ok(());
    }

    println!("Findings ({}):", findings.len());
    for finding in &findings {
        println!(
            "  {:<16} {:>4}..{:<4} {}",
            finding.span.category, finding.span.start, finding.span.end, finding.text
        );
    }

    Ok(())
}
