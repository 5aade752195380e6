use std::fmt;

use crate::{DependencyType, FormOption, OptionId, Question, QuestionId, Section, SectionId};

/// Result alias for operations on a form document.
pub type FormResult<T> = Result<T, FormError>;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Form,
    Section,
    Question,
    Option,
    Dependency,
    Column,
    Attribute,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Form => "form",
            Self::Section => "section",
            Self::Question => "question",
            Self::Option => "option",
            Self::Dependency => "dependency",
            Self::Column => "column",
            Self::Attribute => "attribute",
        })
    }
}

/// A question or option that still depends on the target of a blocked edit.
///
/// Carries enough context to render a remediation message without looking
/// anything up again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentRef {
    pub section_id: SectionId,
    pub section_title: String,
    pub question_id: QuestionId,
    pub question_text: String,

    /// Set when the dependency hangs off an option rather than the question itself.
    pub option_id: Option<OptionId>,
    pub option_value: Option<String>,

    pub dependency_type: DependencyType,
}

impl DependentRef {
    pub fn new(
        section: &Section,
        question: &Question,
        option: Option<&FormOption>,
        dependency_type: DependencyType,
    ) -> Self {
        Self {
            section_id: section.section_id,
            section_title: section.section_title.clone(),
            question_id: question.question_id,
            question_text: question.question_text.clone(),
            option_id: option.map(|o| o.option_id),
            option_value: option.map(|o| o.value.clone()),
            dependency_type,
        }
    }
}

impl fmt::Display for DependentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "section '{}', question '{}'",
            self.section_title, self.question_text
        )?;
        if let Some(value) = &self.option_value {
            write!(f, ", option '{value}'")?;
        }
        write!(f, " ({} dependency)", self.dependency_type)
    }
}

/// Error type for form document operations.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A referenced section, question or option does not exist.
    #[error("{kind} '{id}' not found in {container}")]
    NotFound {
        kind: EntityKind,
        id: String,
        container: String,
    },

    /// The edit would leave other entities pointing at something that no longer exists.
    #[error("cannot change {target}: {}", list_dependents(.dependents))]
    IntegrityViolation {
        target: String,
        dependents: Vec<DependentRef>,
    },

    /// The request itself is malformed.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl FormError {
    /// Create a not-found error.
    pub fn not_found(
        kind: EntityKind,
        id: impl fmt::Display,
        container: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
            container: container.into(),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an integrity violation listing every dependent.
    pub fn integrity(target: impl Into<String>, dependents: Vec<DependentRef>) -> Self {
        Self::IntegrityViolation {
            target: target.into(),
            dependents,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::IntegrityViolation { .. })
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Get the dependents blocking the edit, if this is an integrity violation.
    pub fn dependents(&self) -> &[DependentRef] {
        match self {
            Self::IntegrityViolation { dependents, .. } => dependents,
            _ => &[],
        }
    }
}

fn list_dependents(dependents: &[DependentRef]) -> String {
    let items: Vec<String> = dependents.iter().map(ToString::to_string).collect();
    format!("still referenced by {}", items.join("; "))
}

/// A linear scale was given a point count other than 5 or 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scale range must be 5 or 10, got {0}")]
pub struct InvalidScaleRange(pub u8);
