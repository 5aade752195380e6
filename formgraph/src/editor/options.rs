use tracing::debug;

use super::{FormEditor, find_option, find_option_mut, find_question, find_question_mut};
use crate::{
    Form, FormError, FormOption, FormResult, OptionId, QuestionId, QuestionType, SectionId, guard,
};

fn required_value(value: Option<&str>) -> FormResult<&str> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(FormError::invalid_input("option value must not be empty")),
    }
}

impl FormEditor {
    /// Append a hand-entered option to a single- or multi-select question.
    ///
    /// The value is trimmed. Blank values and duplicates of an existing
    /// option are rejected, since conditions address options by value.
    pub fn add_option(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        value: Option<&str>,
    ) -> FormResult<Form> {
        let value = required_value(value)?;
        let (_, question) = find_question(form, section_id, question_id)?;
        if !question.question_type.is_choice() {
            return Err(FormError::invalid_input(format!(
                "question '{}' is {}; options can only be added to select questions",
                question.question_text, question.question_type
            )));
        }
        if question.option_by_value(value).is_some() {
            return Err(FormError::invalid_input(format!(
                "question '{}' already has an option '{value}'",
                question.question_text
            )));
        }

        let option = FormOption::normal(*question_id, value);
        debug!(option_id = %option.option_id, %question_id, "adding option");
        let mut next = form.clone();
        find_question_mut(&mut next, section_id, question_id)?
            .options
            .push(option);
        Ok(self.commit(next, "add_option"))
    }

    /// Rename an option and carry the new value through every condition that
    /// used the old one.
    ///
    /// Rewritten are: `target_options` entries equal to the old value
    /// anywhere in the form, the expected answer of conditions triggered by
    /// this option, and the expected answer of conditions testing this
    /// question for the old value.
    pub fn update_option_value(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
        new_value: &str,
    ) -> FormResult<Form> {
        let new_value = required_value(Some(new_value))?;
        let (_, question, option) = find_option(form, section_id, question_id, option_id)?;
        if option.is_table() {
            return Err(FormError::invalid_input(
                "table options are edited through their columns and rows",
            ));
        }
        if option.value == new_value {
            return Ok(self.commit(form.clone(), "update_option_value"));
        }
        if question.option_by_value(new_value).is_some() {
            return Err(FormError::invalid_input(format!(
                "question '{}' already has an option '{new_value}'",
                question.question_text
            )));
        }
        let old_value = option.value.clone();

        let mut next = form.clone();
        find_option_mut(&mut next, section_id, question_id, option_id)?.value =
            new_value.to_string();

        let mut rewritten = 0usize;
        for condition in next.conditions_mut() {
            for target in condition
                .target_options
                .iter_mut()
                .filter(|t| **t == old_value)
            {
                *target = new_value.to_string();
                rewritten += 1;
            }
            let tests_old_value = condition.trigger_option_id.as_ref() == Some(option_id)
                || (&condition.question_id == question_id && condition.expected_answer == old_value);
            if tests_old_value {
                condition.expected_answer = new_value.to_string();
                rewritten += 1;
            }
        }

        debug!(%option_id, %old_value, %new_value, rewritten, "renamed option");
        Ok(self.commit(next, "update_option_value"))
    }

    /// Remove an option.
    ///
    /// Blocked while any condition targets the option by value, names it as
    /// its trigger, or expects its value as the answer to this question.
    /// Points of a linear scale cannot be removed one by one.
    pub fn delete_option(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
    ) -> FormResult<Form> {
        let (_, question, _) = find_option(form, section_id, question_id, option_id)?;
        if question.question_type == QuestionType::LinearScale {
            return Err(FormError::invalid_input(format!(
                "question '{}' is a linear scale; change its range instead",
                question.question_text
            )));
        }
        guard::check_option_delete(form, option_id)?;

        let mut next = form.clone();
        find_question_mut(&mut next, section_id, question_id)?
            .options
            .retain(|o| &o.option_id != option_id);
        Ok(self.commit(next, "delete_option"))
    }
}
