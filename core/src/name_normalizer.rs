//! Candidate name cleaning and identifier derivation.
//!
//! Scraped names sometimes carry the party label glued onto the end
//! ("Jane Doe Democratic"). Cleaning strips those labels; the identifier is
//! then derived from the cleaned name by an ordered list of character rules.
//!
//! ORDER MATTERS: party labels are removed case-sensitively, so cleaning
//! must run on the original-cased text before lowercasing.
//!
//! Identifiers are NOT injective: two distinct names can normalize to the
//! same id. Collisions are reported by the reconciliation layer, never
//! disambiguated here.

use crate::types::CandidateId;
use serde::{Deserialize, Serialize};

/// Party labels removed from raw names by default.
pub const DEFAULT_PARTY_LABELS: &[&str] = &["Democratic", "Republican"];

/// A single character substitution applied while deriving an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CharRule {
    Replace { from: char, to: char },
    Remove { ch: char },
}

impl CharRule {
    fn apply(&self, s: &str) -> String {
        match *self {
            CharRule::Replace { from, to } => s.replace(from, &to.to_string()),
            CharRule::Remove { ch } => s.chars().filter(|c| *c != ch).collect(),
        }
    }
}

/// The rule list driving [`NameNormalizer`]. Rules are data so new party
/// labels or punctuation can be added without touching control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRules {
    /// Exact, case-sensitive substrings removed anywhere in the name.
    pub party_labels: Vec<String>,
    /// Applied in order to the lowercased, cleaned name.
    pub char_rules:   Vec<CharRule>,
}

impl Default for NormalizationRules {
    fn default() -> Self {
        Self {
            party_labels: DEFAULT_PARTY_LABELS.iter().map(|s| s.to_string()).collect(),
            char_rules: vec![
                CharRule::Replace { from: ' ', to: '_' },
                CharRule::Remove { ch: '.' },
                CharRule::Remove { ch: '\'' },
                CharRule::Replace { from: '-', to: '_' },
            ],
        }
    }
}

/// Cleaned display name plus the identifier derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateIdentity {
    pub cleaned_name: String,
    pub candidate_id: CandidateId,
}

#[derive(Debug, Clone, Default)]
pub struct NameNormalizer {
    rules: NormalizationRules,
}

impl NameNormalizer {
    pub fn new(rules: NormalizationRules) -> Self {
        Self { rules }
    }

    /// Remove every party label, then trim surrounding whitespace.
    pub fn clean(&self, name: &str) -> String {
        let mut out = name.to_string();
        for label in &self.rules.party_labels {
            if !label.is_empty() {
                out = out.replace(label.as_str(), "");
            }
        }
        out.trim().to_string()
    }

    /// Clean, lowercase, apply each character rule in order, then trim.
    pub fn derive_id(&self, name: &str) -> CandidateId {
        let cleaned = self.clean(name);
        self.id_from_cleaned(&cleaned)
    }

    pub fn identify(&self, name: &str) -> CandidateIdentity {
        let cleaned_name = self.clean(name);
        let candidate_id = self.id_from_cleaned(&cleaned_name);
        CandidateIdentity { cleaned_name, candidate_id }
    }

    /// Trims again after the rules: removing `.` or `'` can expose
    /// whitespace that the first trim could not reach.
    fn id_from_cleaned(&self, cleaned: &str) -> CandidateId {
        self.rules
            .char_rules
            .iter()
            .fold(cleaned.to_lowercase(), |acc, rule| rule.apply(&acc))
            .trim()
            .to_string()
    }
}

/// [`NameNormalizer::clean`] with the default rules.
pub fn clean(name: &str) -> String {
    NameNormalizer::default().clean(name)
}

/// [`NameNormalizer::derive_id`] with the default rules.
pub fn derive_id(name: &str) -> CandidateId {
    NameNormalizer::default().derive_id(name)
}
