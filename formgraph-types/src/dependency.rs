use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{OptionId, QuestionId, SectionId};

/// How a dependency condition gates its owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    /// The owner is shown only while the condition holds.
    #[default]
    Visibility,

    /// The condition ties visibility to specific option values being selected.
    Options,
}

impl DependencyType {
    /// Get the wire name of this dependency type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visibility => "visibility",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive numeric range a numeric answer must fall into.
///
/// Either bound may be absent, in which case that side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ValueRange {
    /// Create a range with both bounds.
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Create a range with only a lower bound.
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Create a range with only an upper bound.
    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Check whether `value` lies within the range, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// A range is well-formed when its lower bound does not exceed its upper bound.
    pub fn is_well_formed(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

/// An edge of the dependency graph: "show my owner when question X was answered Y".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCondition {
    /// The question whose answer is tested.
    pub question_id: QuestionId,

    /// The section holding the tested question, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,

    /// Compared by exact string equality against the respondent's answer.
    pub expected_answer: String,

    #[serde(default)]
    pub dependency_type: DependencyType,

    /// For `options` conditions: the option values this condition reveals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_options: Vec<String>,

    /// For `options` conditions: the option of the tested question that must be chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_option_id: Option<OptionId>,

    /// Optional numeric gate on the tested answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
}

impl DependencyCondition {
    /// Create a visibility condition.
    pub fn visibility(question_id: QuestionId, expected_answer: impl Into<String>) -> Self {
        Self {
            question_id,
            section_id: None,
            expected_answer: expected_answer.into(),
            dependency_type: DependencyType::Visibility,
            target_options: Vec::new(),
            trigger_option_id: None,
            range: None,
        }
    }

    /// Create an options condition revealing the given option values.
    pub fn options<I, S>(question_id: QuestionId, expected_answer: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question_id,
            section_id: None,
            expected_answer: expected_answer.into(),
            dependency_type: DependencyType::Options,
            target_options: targets.into_iter().map(Into::into).collect(),
            trigger_option_id: None,
            range: None,
        }
    }

    /// Record the section holding the tested question.
    pub fn in_section(mut self, section_id: SectionId) -> Self {
        self.section_id = Some(section_id);
        self
    }

    /// Record the option of the tested question that triggers this condition.
    pub fn triggered_by(mut self, option_id: OptionId) -> Self {
        self.trigger_option_id = Some(option_id);
        self
    }

    /// Gate the condition on a numeric range.
    pub fn with_range(mut self, range: ValueRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn is_visibility(&self) -> bool {
        self.dependency_type == DependencyType::Visibility
    }

    pub fn is_options(&self) -> bool {
        self.dependency_type == DependencyType::Options
    }

    /// Check whether this condition names `value` among its target options.
    pub fn targets(&self, value: &str) -> bool {
        self.target_options.iter().any(|target| target == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        let range = ValueRange::between(1.0, 5.0);
        assert!(range.contains(1.0));
        assert!(range.contains(5.0));
        assert!(!range.contains(5.5));
        assert!(!range.contains(0.0));
    }

    #[test]
    fn open_ranges() {
        assert!(ValueRange::at_least(3.0).contains(1e9));
        assert!(!ValueRange::at_least(3.0).contains(2.9));
        assert!(ValueRange::at_most(3.0).contains(-1e9));
        assert!(ValueRange::default().contains(42.0));
    }

    #[test]
    fn inverted_range_is_malformed() {
        assert!(!ValueRange::between(5.0, 1.0).is_well_formed());
        assert!(ValueRange::at_most(1.0).is_well_formed());
    }

    #[test]
    fn wire_shape() {
        let question = QuestionId::generate();
        let condition = DependencyCondition::options(question, "Yes", ["Red", "Blue"]);
        let json = serde_json::to_value(&condition).unwrap();

        assert_eq!(json["dependencyType"], "options");
        assert_eq!(json["expectedAnswer"], "Yes");
        assert_eq!(json["targetOptions"][1], "Blue");
        assert!(json.get("range").is_none());
        assert!(json.get("sectionId").is_none());
    }

    #[test]
    fn missing_dependency_type_defaults_to_visibility() {
        let question = QuestionId::generate();
        let json = format!(r#"{{"questionId":"{question}","expectedAnswer":"No"}}"#);
        let condition: DependencyCondition = serde_json::from_str(&json).unwrap();
        assert!(condition.is_visibility());
        assert!(condition.target_options.is_empty());
    }
}
