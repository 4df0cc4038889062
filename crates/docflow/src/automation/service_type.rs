use serde::Serialize;
use std::fmt;

/// Canonical tag identifying one business service offering, e.g.
/// `GST_REGISTRATION` or `NDA_NON_DISCLOSURE`.
///
/// The catalog front-end and the automation engine agree on this format:
/// uppercase ASCII letters/digits with `_` separators. Raw human or catalog
/// labels are accepted anywhere on entry and canonicalized by
/// [`ServiceType::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ServiceType(String);

impl ServiceType {
    /// Canonicalize a raw label: whitespace runs collapse to `_`, letters are
    /// uppercased, everything outside `[A-Z0-9_]` is dropped.
    ///
    /// Total and idempotent. Empty input yields the empty tag, which no
    /// strategy can ever be registered under.
    pub fn normalize(raw: &str) -> Self {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join("_");
        let canonical = collapsed
            .to_ascii_uppercase()
            .chars()
            .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_')
            .collect();
        Self(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
