//! Content validator collaborator boundary
//!
//! The rule-based style/complexity validator lives outside this crate; the
//! generation engine only knows this contract. Rule definitions are the
//! collaborator's business.

use serde::{Deserialize, Serialize};

/// One rule violation reported by the external validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub rule: String,
    pub message: String,
    pub line: Option<usize>,
}

/// Validation outcome for one piece of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub quality_score: f32,
}

impl ValidationReport {
    pub fn clean() -> Self {
        Self { violations: Vec::new(), quality_score: 100.0 }
    }

    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Contract the generation engine calls out through
pub trait ContentValidator: Send + Sync {
    fn validate_content(&self, code: &str) -> ValidationReport;
}

/// Default collaborator: accepts everything
///
/// Stands in when no external validator is wired up, so generation still
/// produces a report-shaped result.
pub struct PermissiveValidator;

impl ContentValidator for PermissiveValidator {
    fn validate_content(&self, _code: &str) -> ValidationReport {
        ValidationReport::clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_validator() {
        let report = PermissiveValidator.validate_content("def f():\n    return 1");
        assert!(report.passed());
        assert_eq!(report.quality_score, 100.0);
    }

    #[test]
    fn test_report_serializes() {
        let report = ValidationReport {
            violations: vec![Violation {
                rule: "line-length".to_string(),
                message: "line too long".to_string(),
                line: Some(3),
            }],
            quality_score: 80.0,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("line-length"));
    }
}
