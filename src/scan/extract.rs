use regex::Regex;
use std::collections::BTreeMap;

/// A compiled extraction rule. `pattern` decides how raw matches are found;
/// `prefix`/`suffix` decide how they are trimmed. The two halves are
/// independent so an operator can correct one without touching the other.
pub struct ExtractionRule {
    pattern_src: String,
    regex: Regex,
    prefix: String,
    suffix: String,
}

/// Sack-count extraction result: the deduplicated key set, the key→count
/// map, and every key whose count was silently overwritten by a later
/// occurrence (surfaced so the operator can see the data loss).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SackExtraction {
    pub keys: Vec<u64>,
    pub counts: BTreeMap<u64, u64>,
    pub overwritten: Vec<u64>,
}

impl ExtractionRule {
    pub fn compile(pattern: &str, prefix: &str, suffix: &str) -> Result<Self, String> {
        let regex = Regex::new(pattern)
            .map_err(|error| format!("invalid extraction pattern '{pattern}': {error}"))?;
        Ok(Self {
            pattern_src: pattern.to_owned(),
            regex,
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
        })
    }

    /// Apply the rule to manifest text and derive the canonical folio keys:
    /// every match, whitespace-stripped, prefix/suffix-trimmed, digit-checked,
    /// deduplicated and sorted ascending. Matches failing any step are
    /// dropped silently; that is filtering, not an error.
    pub fn folio_keys(&self, text: &str) -> Vec<u64> {
        let mut keys: Vec<u64> = self
            .regex
            .captures_iter(text)
            .filter_map(|captures| {
                let matched = captures.get(1).or_else(|| captures.get(0))?;
                self.key_from_match(matched.as_str())
            })
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Sacks variant: re-derive the rule without its trailing boundary and
    /// with a second capture for the digit run after the code. Duplicate
    /// folios keep the last count seen.
    pub fn folio_keys_with_sacks(&self, text: &str) -> Result<SackExtraction, String> {
        let counting = self.counting_regex()?;
        let count_group = counting.captures_len() - 1;

        let mut extraction = SackExtraction::default();
        for captures in counting.captures_iter(text) {
            let Some(code) = captures.get(1) else {
                continue;
            };
            let Some(key) = self.key_from_match(code.as_str()) else {
                continue;
            };
            let Some(count_text) = captures.get(count_group) else {
                continue;
            };
            let Ok(count) = count_text.as_str().parse::<u64>() else {
                continue;
            };

            if extraction.counts.insert(key, count).is_some() {
                extraction.overwritten.push(key);
            }
            extraction.keys.push(key);
        }

        extraction.keys.sort_unstable();
        extraction.keys.dedup();
        Ok(extraction)
    }

    fn key_from_match(&self, raw: &str) -> Option<u64> {
        let cleaned: String = raw
            .chars()
            .filter(|character| !character.is_whitespace())
            .collect();
        trim_to_key(&cleaned, self.prefix.len(), self.suffix.len())
    }

    fn counting_regex(&self) -> Result<Regex, String> {
        let base = self
            .pattern_src
            .strip_suffix(r"\b")
            .unwrap_or(&self.pattern_src);
        let pattern = if base.contains('(') {
            format!(r"{base}\s+(\d+)")
        } else {
            format!(r"({base})\s+(\d+)")
        };
        Regex::new(&pattern)
            .map_err(|error| format!("invalid sack-count pattern '{pattern}': {error}"))
    }
}

/// Trim a cleaned raw match down to its folio key. The match must be
/// strictly longer than prefix + suffix, and the trimmed remainder must be
/// all digits.
pub fn trim_to_key(cleaned: &str, prefix_len: usize, suffix_len: usize) -> Option<u64> {
    if !cleaned.is_ascii() || cleaned.len() <= prefix_len + suffix_len {
        return None;
    }
    let inner = if suffix_len > 0 {
        &cleaned[prefix_len..cleaned.len() - suffix_len]
    } else {
        &cleaned[prefix_len..]
    };
    if inner.is_empty() || !inner.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    inner.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{ExtractionRule, trim_to_key};

    fn rule() -> ExtractionRule {
        ExtractionRule::compile(r"(0302[\d\s]+?26)\b", "0302", "26").expect("compile rule")
    }

    #[test]
    fn captures_the_full_run_past_internal_suffix_digits() {
        // Without the trailing boundary the non-greedy body would stop at
        // the internal "26" and truncate the run to 030240526.
        let keys = rule().folio_keys("código 03024052626 listo");
        assert_eq!(keys, vec![40526]);
    }

    #[test]
    fn strips_interior_whitespace_before_trimming() {
        let keys = rule().folio_keys("folio 0302\n4052626 registrado");
        assert_eq!(keys, vec![40526]);
    }

    #[test]
    fn output_is_deduplicated_and_ascending() {
        let text = "03024052726 03024052626 03024052626 03024052726";
        assert_eq!(rule().folio_keys(text), vec![40526, 40527]);
    }

    #[test]
    fn compile_rejects_bad_pattern() {
        assert!(ExtractionRule::compile("(0302[", "0302", "26").is_err());
    }

    #[test]
    fn trim_round_trip_matches_positional_slice() {
        assert_eq!(trim_to_key("03024052626", 4, 2), Some(40526));
    }

    #[test]
    fn trim_drops_short_and_non_numeric_matches() {
        assert_eq!(trim_to_key("030226", 4, 2), None);
        assert_eq!(trim_to_key("0302ABC26", 4, 2), None);
        assert_eq!(trim_to_key("0302999", 4, 0), Some(999));
        assert_eq!(trim_to_key("", 4, 2), None);
    }

    #[test]
    fn sack_counts_follow_each_code() {
        let text = "03024052626 12\n03024052726 8\n";
        let extraction = rule().folio_keys_with_sacks(text).expect("extract sacks");

        assert_eq!(extraction.keys, vec![40526, 40527]);
        assert_eq!(extraction.counts.get(&40526), Some(&12));
        assert_eq!(extraction.counts.get(&40527), Some(&8));
        assert!(extraction.overwritten.is_empty());
    }

    #[test]
    fn duplicate_folio_keeps_last_count_and_reports_overwrite() {
        let text = "03024052626 5 luego 03024052626 9";
        let extraction = rule().folio_keys_with_sacks(text).expect("extract sacks");

        assert_eq!(extraction.keys, vec![40526]);
        assert_eq!(extraction.counts.get(&40526), Some(&9));
        assert_eq!(extraction.overwritten, vec![40526]);
    }

    #[test]
    fn counting_rule_wraps_group_free_patterns() {
        let rule = ExtractionRule::compile(r"0302\d+26", "0302", "26").expect("compile rule");
        let extraction = rule
            .folio_keys_with_sacks("03024052626 7")
            .expect("extract sacks");

        assert_eq!(extraction.keys, vec![40526]);
        assert_eq!(extraction.counts.get(&40526), Some(&7));
    }

    #[test]
    fn code_without_trailing_count_is_skipped_in_sack_mode() {
        let extraction = rule()
            .folio_keys_with_sacks("03024052626 sin cantidad")
            .expect("extract sacks");
        assert!(extraction.keys.is_empty());
        assert!(extraction.counts.is_empty());
    }
}
