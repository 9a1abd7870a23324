//! Canned-response parser for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, UnitSheetError};

use super::parser::{CandidateUnit, UnitParser};

/// Parser returning fixed candidates for exact input text.
///
/// Unknown text yields no candidates. Texts registered with
/// [`MockParser::with_failure`] return a parser error.
#[derive(Debug, Default)]
pub struct MockParser {
    responses: HashMap<String, Vec<CandidateUnit>>,
    failures: HashSet<String>,
    calls: AtomicUsize,
}

impl MockParser {
    /// Create a parser with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `text` with `candidates`.
    pub fn with_response(mut self, text: impl Into<String>, candidates: Vec<CandidateUnit>) -> Self {
        self.responses.insert(text.into(), candidates);
        self
    }

    /// Fail on `text`.
    pub fn with_failure(mut self, text: impl Into<String>) -> Self {
        self.failures.insert(text.into());
        self
    }

    /// Number of `parse` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UnitParser for MockParser {
    fn parse(&self, text: &str) -> Result<Vec<CandidateUnit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.contains(text) {
            return Err(UnitSheetError::Parser(format!("mock failure for '{}'", text)));
        }
        Ok(self.responses.get(text).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::CandidatePart;

    #[test]
    fn test_mock_responses() {
        let parser = MockParser::new()
            .with_response("kg", vec![CandidateUnit::new(vec![CandidatePart::new("u#Kilogram")], "M")])
            .with_failure("boom");

        assert_eq!(parser.parse("kg").unwrap().len(), 1);
        assert!(parser.parse("nothing").unwrap().is_empty());
        assert!(parser.parse("boom").is_err());
        assert_eq!(parser.call_count(), 3);
    }
}
