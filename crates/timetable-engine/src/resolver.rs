//! Resolve free-form class codes to dataset keys.
//!
//! Students type their class group the way they remember it: `"4bi3"`,
//! `"4 ERP BI 3"`, `"4erp-bi3"`. Dataset keys are written inconsistently too
//! (`"4ERP-BI3"`, `"3A12"`). Resolution tries, in order:
//!
//! 1. direct match on the accent-folded, uppercased text;
//! 2. a digit guard: a code without any numeral never resolves further;
//! 3. exact match on the alphanumeric-only forms;
//! 4. a flexible partial match: same leading digits, same trailing digits, and
//!    the input's middle letters found contiguously in the key's middle.

use serde::{Deserialize, Serialize};

use crate::text::{alphanumeric_key, fold_upper};

/// How to pick between several keys that satisfy the partial match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// The first candidate in dataset order.
    First,
    /// The candidate with the shortest normalized key; dataset order breaks ties.
    #[default]
    Shortest,
    /// Several candidates resolve to nothing.
    Reject,
}

/// Which resolution step produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Direct,
    Exact,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub key: &'a str,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    /// The input contains no digit.
    NoDigit,
    NotFound,
    /// Several partial candidates under [`AmbiguityPolicy::Reject`].
    Ambiguous(Vec<String>),
}

/// A normalized code split into leading digits, middle, and trailing digits.
#[derive(Debug, PartialEq, Eq)]
struct Segments<'a> {
    leading: &'a str,
    middle: &'a str,
    trailing: &'a str,
}

impl<'a> Segments<'a> {
    fn split(normalized: &'a str) -> Self {
        let lead_len = normalized
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(normalized.len());
        let (leading, rest) = normalized.split_at(lead_len);
        let middle_len = rest
            .rfind(|c: char| !c.is_ascii_digit())
            .map(|i| i + 1)
            .unwrap_or(0);
        let (middle, trailing) = rest.split_at(middle_len);
        Self {
            leading,
            middle,
            trailing,
        }
    }

    fn admits(&self, key: &Segments<'_>) -> bool {
        !self.middle.is_empty()
            && self.leading == key.leading
            && self.trailing == key.trailing
            && key.middle.contains(self.middle)
    }
}

/// Resolve `input` against `keys`, taken in dataset order.
pub fn resolve_class_code<'a, I>(
    input: &str,
    keys: I,
    policy: AmbiguityPolicy,
) -> Result<Resolved<'a>, Unresolved>
where
    I: IntoIterator<Item = &'a str>,
{
    let keys: Vec<&'a str> = keys.into_iter().collect();

    let direct = fold_upper(input);
    if let Some(key) = keys.iter().find(|key| fold_upper(key) == direct) {
        return Ok(Resolved {
            key: *key,
            kind: MatchKind::Direct,
        });
    }

    if !direct.chars().any(|c| c.is_ascii_digit()) {
        return Err(Unresolved::NoDigit);
    }

    let normalized = alphanumeric_key(input);
    let normalized_keys: Vec<(&'a str, String)> =
        keys.iter().map(|key| (*key, alphanumeric_key(key))).collect();

    if let Some((key, _)) = normalized_keys.iter().find(|(_, nk)| *nk == normalized) {
        return Ok(Resolved {
            key: *key,
            kind: MatchKind::Exact,
        });
    }

    let wanted = Segments::split(&normalized);
    let candidates: Vec<&(&'a str, String)> = normalized_keys
        .iter()
        .filter(|(_, nk)| wanted.admits(&Segments::split(nk)))
        .collect();

    let chosen = match (candidates.len(), policy) {
        (0, _) => return Err(Unresolved::NotFound),
        (1, _) | (_, AmbiguityPolicy::First) => candidates[0],
        (_, AmbiguityPolicy::Shortest) => candidates
            .iter()
            .copied()
            .min_by_key(|(_, nk)| nk.len())
            .unwrap_or(candidates[0]),
        (_, AmbiguityPolicy::Reject) => {
            return Err(Unresolved::Ambiguous(
                candidates.iter().map(|(key, _)| key.to_string()).collect(),
            ))
        }
    };

    if candidates.len() > 1 {
        tracing::debug!(
            input,
            chosen = chosen.0,
            candidates = candidates.len(),
            ?policy,
            "ambiguous class code"
        );
    }

    Ok(Resolved {
        key: chosen.0,
        kind: MatchKind::Partial,
    })
}
