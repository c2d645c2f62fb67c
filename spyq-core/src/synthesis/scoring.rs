//! Quality scoring policy
//!
//! The score is a heuristic signal for callers, not a correctness contract.
//! The exact point values are tunables behind a trait so hosts can swap in
//! their own policy.

/// Replaceable scoring policy
pub trait ScoringPolicy: Send + Sync {
    /// Score final code on a 0..=100 scale given the issues accumulated
    /// while producing it
    fn score(&self, code: &str, issues: &[String]) -> f32;
}

/// Default heuristic: reward structure signals, penalize recorded issues
pub struct HeuristicScoring {
    pub base: f32,
    pub issue_penalty: f32,
}

impl Default for HeuristicScoring {
    fn default() -> Self {
        Self { base: 50.0, issue_penalty: 5.0 }
    }
}

impl ScoringPolicy for HeuristicScoring {
    fn score(&self, code: &str, issues: &[String]) -> f32 {
        let mut score = self.base;

        if code.contains("\"\"\"") || code.contains("'''") {
            score += 10.0;
        }
        if code.contains("try:") && code.contains("except") {
            score += 10.0;
        }
        if code.lines().any(|l| l.starts_with("import ") || l.starts_with("from ")) {
            score += 5.0;
        }
        if code.contains("->") || code.contains(": int") || code.contains(": str") {
            score += 10.0;
        }
        if code.contains("if __name__") {
            score += 5.0;
        }

        score -= self.issue_penalty * issues.len() as f32;
        score.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_richer_code_scores_higher() {
        let scoring = HeuristicScoring::default();

        let bare = "def f():\n    return 1";
        let rich = "import os\n\ndef f() -> int:\n    \"\"\"Docs.\"\"\"\n    try:\n        return 1\n    except ValueError:\n        return 0";
        assert!(scoring.score(rich, &[]) > scoring.score(bare, &[]));
    }

    #[test]
    fn test_issues_lower_the_score() {
        let scoring = HeuristicScoring::default();
        let code = "def f():\n    return 1";
        let issues = vec!["Syntax error: something".to_string()];
        assert!(scoring.score(code, &issues) < scoring.score(code, &[]));
    }

    #[test]
    fn test_score_stays_in_range() {
        let scoring = HeuristicScoring::default();
        let many_issues: Vec<String> = (0..50).map(|i| format!("issue {i}")).collect();
        let score = scoring.score("x = 1", &many_issues);
        assert!((0.0..=100.0).contains(&score));
    }
}
