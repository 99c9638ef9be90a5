// src/extraction/post_process.rs
//! Deterministic cleanup of AI-returned candidate data, kept separate from
//! the generation step so it stays independently testable.

use super::CandidateFields;
use std::collections::HashMap;

/// Fields weighted more heavily when computing the overall confidence.
const CRITICAL_FIELDS: [&str; 5] = [
    "name",
    "current_job_title",
    "current_company",
    "industries",
    "total_years_experience",
];

const DEFAULT_CONFIDENCE: i64 = 75;

/// Clean and validate extracted candidate data. Returns a new value; the
/// input is left untouched. Idempotent.
pub fn post_process(raw: &CandidateFields) -> CandidateFields {
    let mut processed = raw.clone();

    // List fields: drop blank entries, dedupe case-insensitively keeping the
    // first occurrence.
    for field in [
        &mut processed.industries,
        &mut processed.seniority_levels_placed,
        &mut processed.market_focus,
        &mut processed.recruitment_tools,
        &mut processed.sourcing_methods,
        &mut processed.strengths,
        &mut processed.red_flags,
        &mut processed.push_factors,
        &mut processed.pull_factors,
        &mut processed.stay_factors,
        &mut processed.languages,
    ] {
        if let Some(values) = field.take() {
            *field = Some(clean_list(values));
        }
    }

    if let Some(score) = processed.likelihood_score {
        processed.likelihood_score = Some(clamp_score(score));
    }

    for field in [
        &mut processed.name,
        &mut processed.email,
        &mut processed.phone,
        &mut processed.location,
        &mut processed.current_job_title,
        &mut processed.current_company,
        &mut processed.ai_summary,
    ] {
        if let Some(value) = field.take() {
            *field = Some(value.trim().to_string());
        }
    }

    processed
}

/// Clamp a score into [0, 100].
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for value in values {
        if value.trim().is_empty() {
            continue;
        }
        let key = value.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(value);
    }
    out
}

/// Collapse per-field confidence scores into one 0-100 number, weighting the
/// critical fields at 70% and the full set at 30%.
///
/// Inputs are assumed to already be in [0, 100]; the result is deliberately
/// not re-clamped so an out-of-range upstream score stays visible.
pub fn overall_confidence(confidence_scores: &HashMap<String, f64>) -> i64 {
    if confidence_scores.is_empty() {
        return DEFAULT_CONFIDENCE;
    }

    let all: Vec<f64> = confidence_scores.values().copied().collect();
    let critical: Vec<f64> = confidence_scores
        .iter()
        .filter(|(key, _)| CRITICAL_FIELDS.contains(&key.as_str()))
        .map(|(_, score)| *score)
        .collect();

    let overall_avg = mean(&all);
    if critical.is_empty() {
        overall_avg.round() as i64
    } else {
        let critical_avg = mean(&critical);
        (critical_avg * 0.7 + overall_avg * 0.3).round() as i64
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_list_fields_deduped_case_insensitive() {
        let raw = CandidateFields {
            industries: Some(vec![
                "Tech".to_string(),
                "tech".to_string(),
                "".to_string(),
                "FinTech".to_string(),
            ]),
            ..Default::default()
        };
        let processed = post_process(&raw);
        assert_eq!(
            processed.industries,
            Some(vec!["Tech".to_string(), "FinTech".to_string()])
        );
    }

    #[test]
    fn test_blank_entries_removed() {
        let raw = CandidateFields {
            strengths: Some(vec!["  ".to_string(), "Headhunting".to_string()]),
            ..Default::default()
        };
        let processed = post_process(&raw);
        assert_eq!(processed.strengths, Some(vec!["Headhunting".to_string()]));
    }

    #[test]
    fn test_absent_lists_left_untouched() {
        let raw = CandidateFields::default();
        let processed = post_process(&raw);
        assert_eq!(processed.industries, None);
        assert_eq!(processed.languages, None);
    }

    #[test]
    fn test_likelihood_score_clamped() {
        let raw = CandidateFields {
            likelihood_score: Some(140.0),
            ..Default::default()
        };
        assert_eq!(post_process(&raw).likelihood_score, Some(100.0));

        let raw = CandidateFields {
            likelihood_score: Some(-5.0),
            ..Default::default()
        };
        assert_eq!(post_process(&raw).likelihood_score, Some(0.0));
    }

    #[test]
    fn test_clamp_score_bounds_and_idempotence() {
        for n in [-50.0, 0.0, 42.5, 100.0, 250.0] {
            let clamped = clamp_score(n);
            assert!((0.0..=100.0).contains(&clamped));
            assert_eq!(clamp_score(clamped), clamped);
        }
    }

    #[test]
    fn test_text_fields_trimmed() {
        let raw = CandidateFields {
            name: Some("  Jane Doe  ".to_string()),
            current_company: Some("Acme \n".to_string()),
            ..Default::default()
        };
        let processed = post_process(&raw);
        assert_eq!(processed.name.as_deref(), Some("Jane Doe"));
        assert_eq!(processed.current_company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_post_process_does_not_mutate_input() {
        let raw = CandidateFields {
            name: Some("  Jane  ".to_string()),
            likelihood_score: Some(140.0),
            ..Default::default()
        };
        let _ = post_process(&raw);
        assert_eq!(raw.name.as_deref(), Some("  Jane  "));
        assert_eq!(raw.likelihood_score, Some(140.0));
    }

    #[test]
    fn test_post_process_idempotent() {
        let raw = CandidateFields {
            name: Some("  Jane Doe ".to_string()),
            industries: Some(vec![
                "Tech".to_string(),
                "TECH".to_string(),
                " ".to_string(),
                "Pharma".to_string(),
            ]),
            likelihood_score: Some(250.0),
            ..Default::default()
        };
        let once = post_process(&raw);
        let twice = post_process(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_end_to_end_cleanup_scenario() {
        let raw = CandidateFields {
            name: Some("Jane Doe".to_string()),
            industries: Some(vec![
                "Tech".to_string(),
                "tech".to_string(),
                "".to_string(),
                "FinTech".to_string(),
            ]),
            likelihood_score: Some(140.0),
            ..Default::default()
        };
        let processed = post_process(&raw);
        assert_eq!(processed.name.as_deref(), Some("Jane Doe"));
        assert_eq!(
            processed.industries,
            Some(vec!["Tech".to_string(), "FinTech".to_string()])
        );
        assert_eq!(processed.likelihood_score, Some(100.0));
    }

    #[test]
    fn test_overall_confidence_empty_map_defaults() {
        assert_eq!(overall_confidence(&HashMap::new()), 75);
    }

    #[test]
    fn test_overall_confidence_weights_critical_fields() {
        // critical = {name: 90, industries: 80}, mean 85
        // all mean = 73.33; round(0.7 * 85 + 0.3 * 73.33) = round(81.5) = 82
        let s = scores(&[("name", 90.0), ("industries", 80.0), ("email", 50.0)]);
        assert_eq!(overall_confidence(&s), 82);
    }

    #[test]
    fn test_overall_confidence_without_critical_fields() {
        let s = scores(&[("email", 60.0), ("phone", 70.0)]);
        assert_eq!(overall_confidence(&s), 65);
    }

    #[test]
    fn test_overall_confidence_single_critical_score() {
        let s = scores(&[("current_company", 80.0)]);
        assert_eq!(overall_confidence(&s), 80);
    }
}
