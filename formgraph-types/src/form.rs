use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DependencyCondition, FormId, FormOption, OptionId, Question, QuestionId, SectionId};

/// Title marking the section that is always shown without gating.
pub const INTRODUCTION_TITLE: &str = "Introduction";

/// The top-level survey document.
///
/// A form is a passive value: every edit produces a new `Form`. The order of
/// `sections` is significant and drives evaluation order for dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub form_id: FormId,
    pub form_title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Display order among the owner's forms.
    #[serde(default)]
    pub order: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Form {
    /// Create an empty form.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            form_id: FormId::generate(),
            form_title: title.into(),
            description: None,
            order: 0,
            created_at: now,
            updated_at: now,
            sections: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Refresh `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Get a section by id.
    pub fn section(&self, section_id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.section_id == section_id)
    }

    /// Get a mutable section by id.
    pub fn section_mut(&mut self, section_id: &SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| &s.section_id == section_id)
    }

    /// Get the section titled "Introduction" (case-insensitive), if any.
    pub fn introduction(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.is_introduction())
    }

    /// Iterate over every question in document order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    /// Get a question anywhere in the form.
    pub fn question(&self, question_id: &QuestionId) -> Option<&Question> {
        self.locate_question(question_id).map(|(_, q)| q)
    }

    /// Get a question together with its section.
    pub fn locate_question(&self, question_id: &QuestionId) -> Option<(&Section, &Question)> {
        self.sections.iter().find_map(|section| {
            section
                .question(question_id)
                .map(|question| (section, question))
        })
    }

    /// Get an option anywhere in the form together with its section and question.
    pub fn locate_option(
        &self,
        option_id: &OptionId,
    ) -> Option<(&Section, &Question, &FormOption)> {
        self.sections.iter().find_map(|section| {
            section.questions.iter().find_map(|question| {
                question
                    .option(option_id)
                    .map(|option| (section, question, option))
            })
        })
    }

    /// Evaluation position of a question: `(section order, question order)`.
    ///
    /// Dependencies may only point at positions strictly before their owner.
    pub fn question_position(&self, question_id: &QuestionId) -> Option<(u32, u32)> {
        self.locate_question(question_id)
            .map(|(section, question)| (section.order, question.order))
    }

    /// Iterate mutably over every dependency condition in the form.
    pub fn conditions_mut(&mut self) -> impl Iterator<Item = &mut DependencyCondition> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.questions.iter_mut())
            .flat_map(|q| q.conditions_mut())
    }

    /// Rewrite every section's `order` to match its index.
    pub fn reindex_sections(&mut self) {
        for (index, section) in self.sections.iter_mut().enumerate() {
            section.order = index as u32;
        }
    }

    /// Check if the form has any sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Get the number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

/// A named grouping of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_id: SectionId,

    /// The form this section belongs to.
    pub form_id: FormId,

    pub section_title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub questions: Vec<Question>,

    /// Zero-based position within the form, unique.
    pub order: u32,

    pub created_at: DateTime<Utc>,
}

impl Section {
    /// Create an empty section with a fresh id.
    pub fn new(form_id: FormId, title: impl Into<String>, order: u32) -> Self {
        Self {
            section_id: SectionId::generate(),
            form_id,
            section_title: title.into(),
            description: None,
            questions: Vec::new(),
            order,
            created_at: Utc::now(),
        }
    }

    /// Get a question by id.
    pub fn question(&self, question_id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.question_id == question_id)
    }

    /// Get a mutable question by id.
    pub fn question_mut(&mut self, question_id: &QuestionId) -> Option<&mut Question> {
        self.questions
            .iter_mut()
            .find(|q| &q.question_id == question_id)
    }

    /// Check whether this is the ungated introduction section.
    pub fn is_introduction(&self) -> bool {
        self.section_title.trim().eq_ignore_ascii_case(INTRODUCTION_TITLE)
    }

    /// Rewrite every question's `order` to match its index.
    pub fn reindex_questions(&mut self) {
        for (index, question) in self.questions.iter_mut().enumerate() {
            question.order = index as u32;
        }
    }

    /// Check if the section has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }
}
