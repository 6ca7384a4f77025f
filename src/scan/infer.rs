use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// Calendar-shaped substrings are removed before candidate search so shipment
// dates can never be mistaken for folio codes.
const DATE_PATTERN: &str = r"\d{1,2}/\d{1,2}/\d{2,4}";
// Folio codes print as word-bounded runs of 10 to 14 digits.
const CANDIDATE_PATTERN: &str = r"\b\d{10,14}\b";

const PREFIX_SAMPLE_LEN: usize = 4;
const SUFFIX_SAMPLE_LEN: usize = 2;

fn date_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern compiles"))
}

fn candidate_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(CANDIDATE_PATTERN).expect("candidate pattern compiles"))
}

/// Result of pattern inference over noisy manifest text. All fields empty /
/// zero when no candidates were found (a soft outcome, not an error).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InferredPattern {
    pub pattern: String,
    pub candidate_count: usize,
    pub prefix: String,
    pub suffix: String,
}

impl InferredPattern {
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

/// Operator-reviewable scan profile: the inferred (then possibly hand-edited)
/// container ID and extraction rule, round-tripped through YAML.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanProfile {
    #[serde(default)]
    pub container: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub candidate_count: usize,
}

impl ScanProfile {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|error| format!("invalid scan profile yaml: {error}"))
    }

    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml::to_string(self)
            .map_err(|error| format!("failed rendering scan profile yaml: {error}"))
    }
}

/// Infer an extraction rule from noisy manifest text.
///
/// Dates are removed, 10-14 digit runs become candidates, and the modal
/// 4-character prefix and 2-character suffix are folded into the rule
/// `(<prefix>[\d\s]+?<suffix>)\b`. The non-greedy body plus the trailing
/// boundary make the rule select the longest run ending in the suffix, not
/// the first internal occurrence of the suffix digits.
pub fn infer_pattern(text: &str) -> InferredPattern {
    if text.is_empty() {
        return InferredPattern::default();
    }

    let without_dates = date_regex().replace_all(text, "");
    let candidates: Vec<&str> = candidate_regex()
        .find_iter(&without_dates)
        .map(|found| found.as_str())
        .collect();
    if candidates.is_empty() {
        return InferredPattern::default();
    }

    let prefix_samples: Vec<&str> = candidates
        .iter()
        .map(|candidate| &candidate[..PREFIX_SAMPLE_LEN])
        .collect();
    let suffix_samples: Vec<&str> = candidates
        .iter()
        .map(|candidate| &candidate[candidate.len() - SUFFIX_SAMPLE_LEN..])
        .collect();

    let prefix = dominant_sample(&prefix_samples);
    let suffix = dominant_sample(&suffix_samples);
    let pattern = format!(r"({prefix}[\d\s]+?{suffix})\b");

    InferredPattern {
        pattern,
        candidate_count: candidates.len(),
        prefix,
        suffix,
    }
}

/// Mode over samples; ties are broken by first-encountered order, so the
/// result is deterministic on noisy input instead of depending on map
/// iteration order.
fn dominant_sample(samples: &[&str]) -> String {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for sample in samples {
        match tally.iter_mut().find(|(value, _)| value == sample) {
            Some((_, count)) => *count += 1,
            None => tally.push((sample, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in &tally {
        if best.is_none_or(|(_, best_count)| *count > best_count) {
            best = Some((value, *count));
        }
    }

    best.map(|(value, _)| value.to_owned()).unwrap_or_default()
}
