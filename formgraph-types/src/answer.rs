use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::QuestionType;

/// A respondent's answer to a single question.
///
/// Each variant corresponds to the question types that can produce it, so a
/// stored answer can be checked against its question before any dependency
/// condition is compared with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Answer {
    /// Free text (from text questions).
    Text(String),

    /// The value of the chosen option (from single-select questions).
    Choice(String),

    /// The values of all chosen options (from multi-select questions).
    Choices(Vec<String>),

    /// A whole number (from integer questions).
    Integer(i64),

    /// A decimal number (from number questions).
    Number(f64),

    /// The selected point (from linear-scale questions).
    Scale(u8),

    /// Cell entries keyed by column or row name (from table questions).
    Table(BTreeMap<String, String>),
}

impl Answer {
    /// Create a single-select answer.
    pub fn choice(value: impl Into<String>) -> Self {
        Self::Choice(value.into())
    }

    /// Create a multi-select answer.
    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    /// Check whether this answer kind can be given to a question of `question_type`.
    pub fn accepts(&self, question_type: QuestionType) -> bool {
        matches!(
            (self, question_type),
            (Self::Text(_), QuestionType::Text)
                | (Self::Choice(_), QuestionType::SingleSelect)
                | (Self::Choices(_), QuestionType::MultiSelect)
                | (Self::Integer(_), QuestionType::Integer)
                | (Self::Number(_), QuestionType::Number)
                | (Self::Scale(_), QuestionType::LinearScale)
                | (Self::Table(_), QuestionType::Table)
        )
    }

    /// Compare this answer against a condition's expected answer.
    ///
    /// Scalar answers match by exact string equality of their literal form;
    /// multi-select answers match when any chosen value is equal, and table
    /// answers when any filled row or column name, or any entry, is equal.
    pub fn matches_expected(&self, expected: &str) -> bool {
        match self {
            Self::Text(s) | Self::Choice(s) => s == expected,
            Self::Choices(values) => values.iter().any(|v| v == expected),
            Self::Integer(i) => i.to_string() == expected,
            Self::Number(n) => n.to_string() == expected,
            Self::Scale(point) => point.to_string() == expected,
            Self::Table(cells) => cells.iter().any(|(k, v)| k == expected || v == expected),
        }
    }

    /// Get the numeric value of a numeric answer.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Number(n) => Some(*n),
            Self::Scale(point) => Some(f64::from(*point)),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the selected values of a multi-select answer.
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(values) => Some(values),
            _ => None,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Choice(_) => "Choice",
            Self::Choices(_) => "Choices",
            Self::Integer(_) => "Integer",
            Self::Number(_) => "Number",
            Self::Scale(_) => "Scale",
            Self::Table(_) => "Table",
        }
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Answer {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Answer {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Answer {
    fn from(f: f64) -> Self {
        Self::Number(f)
    }
}

impl From<Vec<String>> for Answer {
    fn from(values: Vec<String>) -> Self {
        Self::Choices(values)
    }
}
