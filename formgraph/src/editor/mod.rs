//! Copy-on-write mutators for form documents.
//!
//! Every operation takes the current [`Form`] by reference and returns a new
//! one; the input is never touched. A successful mutation refreshes
//! `updated_at`. A failed one returns an error and produces no document.

mod dependencies;
mod options;
mod questions;
mod sections;
mod tables;

use tracing::debug;

use crate::{
    EditorConfig, EntityKind, Form, FormError, FormOption, FormResult, OptionId, Question,
    QuestionId, Section, SectionId,
};

/// Applies structural edits to forms.
///
/// The editor holds no document state of its own, only the defaults used
/// for new entities, so one editor can serve any number of forms.
#[derive(Debug, Clone, Default)]
pub struct FormEditor {
    config: EditorConfig,
}

impl FormEditor {
    /// Create an editor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor with a custom configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    fn commit(&self, mut form: Form, operation: &'static str) -> Form {
        form.touch();
        debug!(form_id = %form.form_id, operation, "form updated");
        form
    }
}

fn find_section<'a>(form: &'a Form, section_id: &SectionId) -> FormResult<&'a Section> {
    form.section(section_id).ok_or_else(|| {
        FormError::not_found(
            EntityKind::Section,
            section_id,
            format!("form '{}'", form.form_title),
        )
    })
}

fn section_index(form: &Form, section_id: &SectionId) -> FormResult<usize> {
    form.sections
        .iter()
        .position(|s| &s.section_id == section_id)
        .ok_or_else(|| {
            FormError::not_found(
                EntityKind::Section,
                section_id,
                format!("form '{}'", form.form_title),
            )
        })
}

fn find_section_mut<'a>(form: &'a mut Form, section_id: &SectionId) -> FormResult<&'a mut Section> {
    let container = format!("form '{}'", form.form_title);
    form.section_mut(section_id)
        .ok_or_else(|| FormError::not_found(EntityKind::Section, section_id, container))
}

fn find_question<'a>(
    form: &'a Form,
    section_id: &SectionId,
    question_id: &QuestionId,
) -> FormResult<(&'a Section, &'a Question)> {
    let section = find_section(form, section_id)?;
    let question = section.question(question_id).ok_or_else(|| {
        FormError::not_found(
            EntityKind::Question,
            question_id,
            format!("section '{}'", section.section_title),
        )
    })?;
    Ok((section, question))
}

fn find_question_mut<'a>(
    form: &'a mut Form,
    section_id: &SectionId,
    question_id: &QuestionId,
) -> FormResult<&'a mut Question> {
    let section = find_section_mut(form, section_id)?;
    let container = format!("section '{}'", section.section_title);
    section
        .question_mut(question_id)
        .ok_or_else(|| FormError::not_found(EntityKind::Question, question_id, container))
}

fn find_option_mut<'a>(
    form: &'a mut Form,
    section_id: &SectionId,
    question_id: &QuestionId,
    option_id: &OptionId,
) -> FormResult<&'a mut FormOption> {
    let question = find_question_mut(form, section_id, question_id)?;
    let container = format!("question '{}'", question.question_text);
    question
        .option_mut(option_id)
        .ok_or_else(|| FormError::not_found(EntityKind::Option, option_id, container))
}

fn find_option<'a>(
    form: &'a Form,
    section_id: &SectionId,
    question_id: &QuestionId,
    option_id: &OptionId,
) -> FormResult<(&'a Section, &'a Question, &'a FormOption)> {
    let (section, question) = find_question(form, section_id, question_id)?;
    let option = question.option(option_id).ok_or_else(|| {
        FormError::not_found(
            EntityKind::Option,
            option_id,
            format!("question '{}'", question.question_text),
        )
    })?;
    Ok((section, question, option))
}
