use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DependencyCondition, FormOption, InvalidScaleRange, OptionId, QuestionId, SectionId};

/// A single prompt in a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: QuestionId,

    /// The section this question belongs to.
    pub section_id: SectionId,

    /// The prompt text shown to the respondent.
    pub question_text: String,

    /// The kind of answer collected (determines whether options exist).
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    #[serde(default)]
    pub is_required: bool,

    /// Position within the owning section, zero-based.
    #[serde(default)]
    pub order: u32,

    /// Choices for option-bearing types. Empty for scalar types.
    #[serde(default)]
    pub options: Vec<FormOption>,

    /// Number of points, only for linear-scale questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_range: Option<ScaleRange>,

    /// Start/end captions, only for linear-scale questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_labels: Option<ScaleLabels>,

    /// Conditions controlling this question's own visibility.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyCondition>,

    /// Set when this question was created as a dependent child of another question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_on: Option<QuestionId>,
}

impl Question {
    /// Create a single-select question with no options and a fresh id.
    pub fn new(section_id: SectionId, text: impl Into<String>, order: u32) -> Self {
        Self {
            question_id: QuestionId::generate(),
            section_id,
            question_text: text.into(),
            question_type: QuestionType::SingleSelect,
            is_required: false,
            order,
            options: Vec::new(),
            scale_range: None,
            scale_labels: None,
            dependencies: Vec::new(),
            dependent_on: None,
        }
    }

    /// Get an option by id.
    pub fn option(&self, option_id: &OptionId) -> Option<&FormOption> {
        self.options.iter().find(|o| &o.option_id == option_id)
    }

    /// Get a mutable option by id.
    pub fn option_mut(&mut self, option_id: &OptionId) -> Option<&mut FormOption> {
        self.options.iter_mut().find(|o| &o.option_id == option_id)
    }

    /// Get the first normal option carrying `value`.
    pub fn option_by_value(&self, value: &str) -> Option<&FormOption> {
        self.options
            .iter()
            .find(|o| !o.is_table() && o.value == value)
    }

    /// Check whether this question was created as a dependent child.
    pub fn is_dependent(&self) -> bool {
        self.dependent_on.is_some()
    }

    /// Iterate over the conditions on this question and on all of its options.
    pub fn conditions(&self) -> impl Iterator<Item = &DependencyCondition> {
        self.dependencies
            .iter()
            .chain(self.options.iter().flat_map(|o| o.dependencies.iter()))
    }

    /// Mutable variant of [`Question::conditions`].
    pub fn conditions_mut(&mut self) -> impl Iterator<Item = &mut DependencyCondition> {
        let Self {
            dependencies,
            options,
            ..
        } = self;
        dependencies
            .iter_mut()
            .chain(options.iter_mut().flat_map(|o| o.dependencies.iter_mut()))
    }
}

/// The kind of answer a question collects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    /// Pick exactly one option.
    #[default]
    SingleSelect,

    /// Pick any number of options.
    MultiSelect,

    /// Whole-number input.
    Integer,

    /// Decimal input.
    Number,

    /// Free text.
    Text,

    /// Likert rating over auto-generated points.
    LinearScale,

    /// Table payload options.
    Table,
}

impl QuestionType {
    pub const ALL: [QuestionType; 7] = [
        Self::SingleSelect,
        Self::MultiSelect,
        Self::Integer,
        Self::Number,
        Self::Text,
        Self::LinearScale,
        Self::Table,
    ];

    /// Check whether questions of this type carry options.
    pub fn is_option_bearing(&self) -> bool {
        matches!(
            self,
            Self::SingleSelect | Self::MultiSelect | Self::LinearScale | Self::Table
        )
    }

    /// Check whether this type collects a single scalar value without options.
    pub fn is_scalar(&self) -> bool {
        !self.is_option_bearing()
    }

    /// Check whether options of this type are entered by hand.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::SingleSelect | Self::MultiSelect)
    }

    /// Check whether answers of this type are numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Number | Self::LinearScale)
    }

    /// Get the wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleSelect => "single-select",
            Self::MultiSelect => "multi-select",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Text => "text",
            Self::LinearScale => "linear-scale",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of points on a linear scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ScaleRange {
    #[default]
    Five,
    Ten,
}

impl ScaleRange {
    /// Get the number of points.
    pub fn points(&self) -> u8 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
        }
    }
}

impl TryFrom<u8> for ScaleRange {
    type Error = InvalidScaleRange;

    fn try_from(points: u8) -> Result<Self, Self::Error> {
        match points {
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            other => Err(InvalidScaleRange(other)),
        }
    }
}

impl From<ScaleRange> for u8 {
    fn from(range: ScaleRange) -> Self {
        range.points()
    }
}

/// Captions shown at both ends of a linear scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleLabels {
    pub start: String,
    pub end: String,
}

impl ScaleLabels {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_question_defaults() {
        let question = Question::new(SectionId::generate(), "How are you?", 3);
        assert_eq!(question.question_type, QuestionType::SingleSelect);
        assert_eq!(question.order, 3);
        assert!(question.options.is_empty());
        assert!(!question.is_required);
        assert!(!question.is_dependent());
    }

    #[test]
    fn type_wire_names() {
        for ty in QuestionType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn scalar_and_option_bearing_partition_the_types() {
        let scalars: Vec<_> = QuestionType::ALL.iter().filter(|t| t.is_scalar()).collect();
        assert_eq!(
            scalars,
            vec![&QuestionType::Integer, &QuestionType::Number, &QuestionType::Text]
        );
    }

    #[test]
    fn scale_range_only_accepts_five_or_ten() {
        assert_eq!(ScaleRange::try_from(5).unwrap(), ScaleRange::Five);
        assert_eq!(ScaleRange::try_from(10).unwrap(), ScaleRange::Ten);
        assert!(ScaleRange::try_from(7).is_err());

        let parsed: Result<ScaleRange, _> = serde_json::from_str("7");
        assert!(parsed.is_err());
        assert_eq!(serde_json::to_string(&ScaleRange::Ten).unwrap(), "10");
    }

    #[test]
    fn conditions_cover_question_and_options() {
        let mut question = Question::new(SectionId::generate(), "Pick", 0);
        let parent = QuestionId::generate();
        question
            .dependencies
            .push(DependencyCondition::visibility(parent, "Yes"));
        let mut option = FormOption::normal(question.question_id, "A");
        option
            .dependencies
            .push(DependencyCondition::options(parent, "Yes", ["A"]));
        question.options.push(option);

        assert_eq!(question.conditions().count(), 2);

        for condition in question.conditions_mut() {
            condition.expected_answer = "No".into();
        }
        assert!(question.conditions().all(|c| c.expected_answer == "No"));
    }
}
