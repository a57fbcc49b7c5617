use anyhow::Result;
use clap::ValueEnum;
use form_matcher::{Decision, MatchCandidate, MatchReason};
use serde::Serialize;
use soulfill_core_types::{FillResult, FillSummary, Route};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputFormat::Human)
    }
}

/// Prints `value` as JSON or YAML. Returns `false` for human output so the caller renders it.
pub fn emit<T: Serialize>(format: OutputFormat, value: &T) -> Result<bool> {
    match format {
        OutputFormat::Human => Ok(false),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
            Ok(true)
        }
    }
}

pub fn print_summary(summary: &FillSummary) {
    println!("{}", summary.message());
    for result in &summary.per_field {
        println!("  {}", result_line(result));
    }
}

fn result_line(result: &FillResult) -> String {
    match &result.error {
        None => format!("ok    {}", result.selector),
        Some(err) => format!("fail  {}  ({err})", result.selector),
    }
}

pub fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Candidate row without template values.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub selector: String,
    pub caption: String,
    pub template_key: Option<String>,
    pub matched: bool,
    pub reason: MatchReason,
}

impl From<&MatchCandidate> for CandidateView {
    fn from(candidate: &MatchCandidate) -> Self {
        Self {
            selector: candidate.field.selector.clone(),
            caption: candidate.field.caption().to_string(),
            template_key: candidate.template_field.as_ref().map(|tf| tf.key.clone()),
            matched: candidate.matched,
            reason: candidate.reason,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionView {
    pub route: Route,
    pub match_count: usize,
    pub total: usize,
    pub confidence: f64,
    pub candidates: Vec<CandidateView>,
}

impl From<&Decision> for DecisionView {
    fn from(decision: &Decision) -> Self {
        Self {
            route: decision.route,
            match_count: decision.match_count,
            total: decision.total,
            confidence: decision.confidence,
            candidates: decision.candidates.iter().map(CandidateView::from).collect(),
        }
    }
}

pub fn print_decision(decision: &DecisionView) {
    println!(
        "Route: {} ({}/{} fields, {})",
        decision.route,
        decision.match_count,
        decision.total,
        percent(decision.confidence)
    );
    for candidate in &decision.candidates {
        let mark = if candidate.matched { "+" } else { "-" };
        let target = candidate.template_key.as_deref().unwrap_or("-");
        println!(
            "  {mark} {:<40} {:<24} {:<20} {}",
            candidate.selector,
            candidate.caption,
            target,
            candidate.reason.label()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_lines_show_errors() {
        let ok = FillResult::ok("#a");
        let bad = FillResult::failed("#b", "Option not found");
        assert_eq!(result_line(&ok), "ok    #a");
        assert_eq!(result_line(&bad), "fail  #b  (Option not found)");
        assert_eq!(percent(2.0 / 3.0), "67%");
    }
}
