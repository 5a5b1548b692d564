//! Report and suggestion command handlers.

use std::fmt::Write as _;

use appsent_sentiment::{ReviewPipeline, SentimentReport};

/// Characters of review text shown per table row.
const REVIEW_COLUMN_CHARS: usize = 60;

/// Build and print a sentiment report for `app_name`.
///
/// # Errors
///
/// Returns an error if the pipeline fails or the report cannot be serialized.
pub(crate) async fn run_report(
    pipeline: &ReviewPipeline,
    app_name: &str,
    json: bool,
) -> anyhow::Result<()> {
    let report = pipeline.build_report(app_name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report_table(app_name, &report));
    }
    Ok(())
}

/// Print up to the configured number of app titles matching `query`.
///
/// # Errors
///
/// Returns an error if the query is empty or the store search fails.
pub(crate) async fn run_suggest(pipeline: &ReviewPipeline, query: &str) -> anyhow::Result<()> {
    let suggestions = pipeline.suggest(query).await?;
    if suggestions.is_empty() {
        println!("no apps match '{query}'");
        return Ok(());
    }
    for title in suggestions {
        println!("{title}");
    }
    Ok(())
}

pub(crate) fn format_report_table(app_name: &str, report: &SentimentReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sentiment report for '{app_name}'");
    let _ = writeln!(
        out,
        "average: {:.4}  scored: {}/{}",
        report.average_sentiment,
        report.scored_count(),
        report.review_count
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<6}{:<10}REVIEW", "#", "SCORE");

    for (idx, (review, score)) in report
        .reviews
        .iter()
        .zip(&report.sentiment_scores)
        .enumerate()
    {
        let score = score.map_or_else(|| "-".to_string(), |s| format!("{s:.2}"));
        let _ = writeln!(
            out,
            "{:<6}{:<10}{}",
            idx + 1,
            score,
            one_line(review, REVIEW_COLUMN_CHARS)
        );
    }
    out
}

/// Collapse whitespace and cut to `max` characters, marking the cut with `...`.
fn one_line(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
