//! Categorical column encoding
//!
//! Each categorical feature gets a `ColumnEncoder` mapping its string
//! categories to integer codes. Codes follow the order in which categories
//! are first seen in the training column. Values that were never seen map to
//! the sentinel category [`UNKNOWN_CATEGORY`], which is appended to the
//! vocabulary the first time it is needed.

use std::collections::HashMap;

use serde::Serialize;

/// Sentinel category for values not seen during training
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// String category to integer code mapping for one column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnEncoder {
    /// Column this encoder belongs to
    column: String,
    /// Categories in code order
    classes: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, u32>,
    /// Number of lookups that fell back to the sentinel
    unknown_hits: u64,
}

impl ColumnEncoder {
    /// Build an encoder from the observed values of a training column.
    ///
    /// Missing cells (which only survive imputation in an entirely empty
    /// column) are recorded as the sentinel.
    pub fn fit<'a, I>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        Self::fit_transform(column, values).0
    }

    /// Build an encoder and return the codes of the training values.
    pub fn fit_transform<'a, I>(column: &str, values: I) -> (Self, Vec<u32>)
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut encoder = Self {
            column: column.to_string(),
            classes: Vec::new(),
            index: HashMap::new(),
            unknown_hits: 0,
        };

        let codes = values
            .into_iter()
            .map(|value| encoder.push_class(value.unwrap_or(UNKNOWN_CATEGORY)))
            .collect();

        (encoder, codes)
    }

    /// Encode a value seen during training.
    pub fn code(&self, value: &str) -> Option<u32> {
        self.index.get(value).copied()
    }

    /// Code an inference value would get, without touching the vocabulary.
    ///
    /// Returns `(code, is_fallback)`. For an unseen value the code is the one
    /// the sentinel has, or would get once added.
    pub fn peek_lenient(&self, value: Option<&str>) -> (u32, bool) {
        match value.and_then(|v| self.code(v)) {
            Some(code) => (code, false),
            None => (
                self.code(UNKNOWN_CATEGORY).unwrap_or(self.classes.len() as u32),
                true,
            ),
        }
    }

    /// Encode an inference value, mapping anything unknown to the sentinel.
    ///
    /// Adds the sentinel to the vocabulary on first use.
    pub fn encode_lenient(&mut self, value: Option<&str>) -> u32 {
        if let Some(code) = value.and_then(|v| self.code(v)) {
            return code;
        }

        self.unknown_hits += 1;
        tracing::warn!(
            column = %self.column,
            value = value.unwrap_or("null"),
            "Unseen category mapped to '{}'",
            UNKNOWN_CATEGORY
        );
        self.push_class(UNKNOWN_CATEGORY)
    }

    /// Whether the sentinel is already part of the vocabulary
    pub fn has_unknown(&self) -> bool {
        self.index.contains_key(UNKNOWN_CATEGORY)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn unknown_hits(&self) -> u64 {
        self.unknown_hits
    }

    fn push_class(&mut self, value: &str) -> u32 {
        if let Some(code) = self.index.get(value) {
            return *code;
        }
        let code = self.classes.len() as u32;
        self.classes.push(value.to_string());
        self.index.insert(value.to_string(), code);
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department_encoder() -> ColumnEncoder {
        ColumnEncoder::fit(
            "Department",
            [Some("Sales"), Some("R&D"), Some("Sales"), Some("HR"), Some("R&D")],
        )
    }

    #[test]
    fn test_codes_follow_first_appearance() {
        let encoder = department_encoder();
        assert_eq!(encoder.classes(), &["Sales", "R&D", "HR"]);
        assert_eq!(encoder.code("Sales"), Some(0));
        assert_eq!(encoder.code("R&D"), Some(1));
        assert_eq!(encoder.code("HR"), Some(2));
    }

    #[test]
    fn test_fit_transform_codes() {
        let (encoder, codes) =
            ColumnEncoder::fit_transform("OverTime", [Some("No"), Some("Yes"), Some("No")]);
        assert_eq!(codes, vec![0, 1, 0]);
        assert_eq!(encoder.len(), 2);
    }

    #[test]
    fn test_fit_records_nulls_as_sentinel() {
        let encoder = ColumnEncoder::fit("c", [None, Some("a"), None, Some("b")]);
        assert_eq!(encoder.classes(), &["Unknown", "a", "b"]);
        assert_eq!(encoder.unknown_hits(), 0);
    }

    #[test]
    fn test_unknown_added_once() {
        let mut encoder = department_encoder();
        assert!(!encoder.has_unknown());

        let first = encoder.encode_lenient(Some("Marketing"));
        assert_eq!(first, 3);
        assert!(encoder.has_unknown());
        assert_eq!(encoder.len(), 4);

        let second = encoder.encode_lenient(Some("Legal"));
        assert_eq!(second, first);
        assert_eq!(encoder.len(), 4, "Sentinel must only be added once");
        assert_eq!(encoder.unknown_hits(), 2);
    }

    #[test]
    fn test_known_values_unaffected_by_sentinel() {
        let mut encoder = department_encoder();
        encoder.encode_lenient(Some("Marketing"));
        assert_eq!(encoder.encode_lenient(Some("HR")), 2);
        assert_eq!(encoder.unknown_hits(), 1);
    }

    #[test]
    fn test_null_maps_to_sentinel() {
        let mut encoder = department_encoder();
        let code = encoder.encode_lenient(None);
        assert_eq!(encoder.classes()[code as usize], UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_peek_matches_lenient_without_mutation() {
        let mut encoder = department_encoder();

        assert_eq!(encoder.peek_lenient(Some("HR")), (2, false));
        assert_eq!(encoder.peek_lenient(Some("Marketing")), (3, true));
        assert_eq!(encoder.len(), 3);
        assert_eq!(encoder.unknown_hits(), 0);

        assert_eq!(encoder.encode_lenient(Some("Marketing")), 3);
        assert_eq!(encoder.peek_lenient(None), (3, true));
        assert_eq!(encoder.len(), 4);
    }

    #[test]
    fn test_unknown_seen_in_training_is_reused() {
        let mut encoder = ColumnEncoder::fit("c", [Some("Unknown"), Some("x")]);
        assert!(encoder.has_unknown());
        assert_eq!(encoder.encode_lenient(Some("y")), 0);
        assert_eq!(encoder.len(), 2);
    }
}
