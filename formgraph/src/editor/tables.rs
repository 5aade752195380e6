use std::collections::HashSet;

use tracing::debug;

use super::{FormEditor, find_option, find_option_mut, find_question, find_question_mut};
use crate::{
    Attribute, AttributeId, CellValue, EntityKind, Form, FormError, FormOption, FormResult,
    OptionId, QuestionId, QuestionType, SectionId, TableData, guard,
};

/// Check that columns and row names are non-blank and unique, and that
/// every cell sits in a known column.
fn validate_table(data: &TableData) -> FormResult<()> {
    let mut seen = HashSet::new();
    for column in &data.columns {
        if column.trim().is_empty() {
            return Err(FormError::invalid_input("table column names must not be empty"));
        }
        if !seen.insert(column.as_str()) {
            return Err(FormError::invalid_input(format!("duplicate table column '{column}'")));
        }
    }
    let mut seen = HashSet::new();
    for row in &data.rows {
        validate_row(data, row)?;
        if !seen.insert(row.attribute_name.as_str()) {
            return Err(FormError::invalid_input(format!(
                "duplicate table row '{}'",
                row.attribute_name
            )));
        }
    }
    Ok(())
}

fn validate_row(data: &TableData, row: &Attribute) -> FormResult<()> {
    if row.attribute_name.trim().is_empty() {
        return Err(FormError::invalid_input("table row names must not be empty"));
    }
    if let Some(column) = row.values.keys().find(|c| !data.has_column(c)) {
        return Err(FormError::invalid_input(format!(
            "row '{}' has a value for unknown column '{column}'",
            row.attribute_name
        )));
    }
    Ok(())
}

fn require_table_question(
    form: &Form,
    section_id: &SectionId,
    question_id: &QuestionId,
) -> FormResult<()> {
    let (_, question) = find_question(form, section_id, question_id)?;
    if question.question_type != QuestionType::Table {
        return Err(FormError::invalid_input(format!(
            "question '{}' is {}, not table",
            question.question_text, question.question_type
        )));
    }
    Ok(())
}

/// The table payload of an option, or an error for normal options.
fn table_of<'a>(
    form: &'a Form,
    section_id: &SectionId,
    question_id: &QuestionId,
    option_id: &OptionId,
) -> FormResult<&'a TableData> {
    let (_, _, option) = find_option(form, section_id, question_id, option_id)?;
    option
        .table_data
        .as_ref()
        .filter(|_| option.is_table())
        .ok_or_else(|| FormError::invalid_input(format!("option {option_id} is not a table option")))
}

fn table_of_mut<'a>(
    form: &'a mut Form,
    section_id: &SectionId,
    question_id: &QuestionId,
    option_id: &OptionId,
) -> FormResult<&'a mut TableData> {
    let option = find_option_mut(form, section_id, question_id, option_id)?;
    if !option.is_table() {
        return Err(FormError::invalid_input(format!(
            "option {option_id} is not a table option"
        )));
    }
    Ok(option.table_data.get_or_insert_with(TableData::default))
}

impl FormEditor {
    /// Append a table option to a table question.
    pub fn add_table_option(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        data: TableData,
    ) -> FormResult<Form> {
        require_table_question(form, section_id, question_id)?;
        validate_table(&data)?;

        let option = FormOption::table(*question_id, data);
        debug!(option_id = %option.option_id, %question_id, "adding table option");
        let mut next = form.clone();
        find_question_mut(&mut next, section_id, question_id)?
            .options
            .push(option);
        Ok(self.commit(next, "add_table_option"))
    }

    /// Replace the payload of a table option.
    ///
    /// Blocked when a column or row that disappears is still named by a
    /// condition testing this question.
    pub fn update_table_option(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
        data: TableData,
    ) -> FormResult<Form> {
        let current = table_of(form, section_id, question_id, option_id)?;
        validate_table(&data)?;

        let kept: HashSet<&str> = data
            .columns
            .iter()
            .map(String::as_str)
            .chain(data.rows.iter().map(|r| r.attribute_name.as_str()))
            .collect();
        let dropped = current
            .columns
            .iter()
            .map(String::as_str)
            .chain(current.rows.iter().map(|r| r.attribute_name.as_str()))
            .filter(|label| !kept.contains(label));
        for label in dropped {
            guard::check_table_label(form, question_id, label)?;
        }

        let mut next = form.clone();
        *table_of_mut(&mut next, section_id, question_id, option_id)? = data;
        Ok(self.commit(next, "update_table_option"))
    }

    /// Remove a table option, guarded like any other option.
    pub fn delete_table_option(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
    ) -> FormResult<Form> {
        table_of(form, section_id, question_id, option_id)?;
        guard::check_option_delete(form, option_id)?;

        let mut next = form.clone();
        find_question_mut(&mut next, section_id, question_id)?
            .options
            .retain(|o| &o.option_id != option_id);
        Ok(self.commit(next, "delete_table_option"))
    }

    pub fn add_table_column(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
        column: &str,
    ) -> FormResult<Form> {
        let column = column.trim();
        let table = table_of(form, section_id, question_id, option_id)?;
        if column.is_empty() {
            return Err(FormError::invalid_input("table column names must not be empty"));
        }
        if table.has_column(column) {
            return Err(FormError::invalid_input(format!("duplicate table column '{column}'")));
        }

        let mut next = form.clone();
        table_of_mut(&mut next, section_id, question_id, option_id)?
            .columns
            .push(column.to_string());
        Ok(self.commit(next, "add_table_column"))
    }

    /// Remove a column together with its cells in every row.
    pub fn delete_table_column(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
        column: &str,
    ) -> FormResult<Form> {
        let table = table_of(form, section_id, question_id, option_id)?;
        if !table.has_column(column) {
            return Err(FormError::not_found(
                EntityKind::Column,
                column,
                format!("table option {option_id}"),
            ));
        }
        guard::check_table_label(form, question_id, column)?;

        let mut next = form.clone();
        let table = table_of_mut(&mut next, section_id, question_id, option_id)?;
        table.columns.retain(|c| c != column);
        for row in &mut table.rows {
            row.values.remove(column);
        }
        Ok(self.commit(next, "delete_table_column"))
    }

    pub fn add_table_row(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
        row: Attribute,
    ) -> FormResult<Form> {
        let table = table_of(form, section_id, question_id, option_id)?;
        validate_row(table, &row)?;
        if table.rows.iter().any(|r| r.attribute_name == row.attribute_name) {
            return Err(FormError::invalid_input(format!(
                "duplicate table row '{}'",
                row.attribute_name
            )));
        }

        let mut next = form.clone();
        table_of_mut(&mut next, section_id, question_id, option_id)?
            .rows
            .push(row);
        Ok(self.commit(next, "add_table_row"))
    }

    /// Remove a row. Blocked while a condition names the row.
    pub fn delete_table_row(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
        attribute_id: &AttributeId,
    ) -> FormResult<Form> {
        let table = table_of(form, section_id, question_id, option_id)?;
        let row = table.row(attribute_id).ok_or_else(|| {
            FormError::not_found(
                EntityKind::Attribute,
                attribute_id,
                format!("table option {option_id}"),
            )
        })?;
        guard::check_table_label(form, question_id, &row.attribute_name)?;

        let mut next = form.clone();
        table_of_mut(&mut next, section_id, question_id, option_id)?
            .rows
            .retain(|r| &r.attribute_id != attribute_id);
        Ok(self.commit(next, "delete_table_row"))
    }

    /// Set one cell of a row. The column must already exist.
    #[allow(clippy::too_many_arguments)]
    pub fn update_table_cell(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
        attribute_id: &AttributeId,
        column: &str,
        value: impl Into<CellValue>,
    ) -> FormResult<Form> {
        let table = table_of(form, section_id, question_id, option_id)?;
        if !table.has_column(column) {
            return Err(FormError::not_found(
                EntityKind::Column,
                column,
                format!("table option {option_id}"),
            ));
        }

        let mut next = form.clone();
        let row = table_of_mut(&mut next, section_id, question_id, option_id)?
            .row_mut(attribute_id)
            .ok_or_else(|| {
                FormError::not_found(
                    EntityKind::Attribute,
                    attribute_id,
                    format!("table option {option_id}"),
                )
            })?;
        row.values.insert(column.to_string(), value.into());
        Ok(self.commit(next, "update_table_cell"))
    }
}
