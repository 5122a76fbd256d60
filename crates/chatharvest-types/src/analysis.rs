//! Analysis selection for the message extractor.
//!
//! `main_topics` keeps the full time-filtered set; `specific_messages`
//! additionally restricts to bodies containing a literal substring
//! (case-sensitive, no normalization).

use crate::error::AnalysisError;

/// What subset of the time-filtered messages to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    /// Keep the whole time-filtered set.
    MainTopics,
    /// Keep only messages whose body contains `criteria` as a substring.
    SpecificMessages { criteria: String },
}

impl Analysis {
    /// Build an analysis from the positional CLI arguments.
    ///
    /// `criteria` is required for `specific_messages` and ignored for
    /// `main_topics` even when supplied.
    pub fn from_args(kind: &str, criteria: Option<String>) -> Result<Self, AnalysisError> {
        match kind {
            "main_topics" => Ok(Analysis::MainTopics),
            "specific_messages" => match criteria {
                Some(criteria) => Ok(Analysis::SpecificMessages { criteria }),
                None => Err(AnalysisError::MissingCriteria),
            },
            other => Err(AnalysisError::UnknownKind(other.to_string())),
        }
    }

    /// Whether a message body passes this analysis.
    pub fn matches(&self, body: &str) -> bool {
        match self {
            Analysis::MainTopics => true,
            Analysis::SpecificMessages { criteria } => body.contains(criteria.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args_main_topics() {
        let analysis = Analysis::from_args("main_topics", None).unwrap();
        assert_eq!(analysis, Analysis::MainTopics);
    }

    #[test]
    fn test_from_args_main_topics_ignores_criteria() {
        // Criteria supplied alongside main_topics is accepted and ignored.
        let analysis = Analysis::from_args("main_topics", Some("hello".to_string())).unwrap();
        assert_eq!(analysis, Analysis::MainTopics);
        assert!(analysis.matches("anything at all"));
    }

    #[test]
    fn test_from_args_specific_messages_requires_criteria() {
        assert_eq!(
            Analysis::from_args("specific_messages", None),
            Err(AnalysisError::MissingCriteria)
        );
    }

    #[test]
    fn test_from_args_unknown_kind() {
        assert_eq!(
            Analysis::from_args("topics", None),
            Err(AnalysisError::UnknownKind("topics".to_string()))
        );
    }

    #[test]
    fn test_matches_is_case_sensitive_substring() {
        let analysis = Analysis::from_args("specific_messages", Some("hello".to_string())).unwrap();
        assert!(analysis.matches("well hello there"));
        assert!(!analysis.matches("Hello there"));
        assert!(!analysis.matches("hell o"));
    }
}
