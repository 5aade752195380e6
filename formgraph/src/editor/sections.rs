use tracing::debug;

use super::{FormEditor, find_section_mut, section_index};
use crate::{Form, FormError, FormResult, QuestionId, Section, SectionId, guard};

impl FormEditor {
    /// Append an empty section titled with the configured default.
    pub fn add_section(&self, form: &Form) -> Form {
        let mut next = form.clone();
        let order = next.sections.len() as u32;
        let section = Section::new(next.form_id, &self.config.default_section_title, order);
        debug!(section_id = %section.section_id, order, "adding section");
        next.sections.push(section);
        self.commit(next, "add_section")
    }

    /// Remove a section and everything in it.
    ///
    /// Blocked while a question outside the section tests a question inside
    /// it. References from within the section disappear with it, and any
    /// remaining references to its questions are stripped.
    pub fn delete_section(&self, form: &Form, section_id: &SectionId) -> FormResult<Form> {
        guard::check_section_delete(form, section_id)?;

        let index = section_index(form, section_id)?;
        let mut next = form.clone();
        let removed = next.sections.remove(index);
        next.reindex_sections();

        let removed_ids: Vec<QuestionId> =
            removed.questions.iter().map(|q| q.question_id).collect();
        for question_id in &removed_ids {
            guard::strip_references(&mut next, question_id);
        }
        Ok(self.commit(next, "delete_section"))
    }

    /// Rename a section.
    pub fn update_section_title(
        &self,
        form: &Form,
        section_id: &SectionId,
        title: impl Into<String>,
    ) -> FormResult<Form> {
        let mut next = form.clone();
        find_section_mut(&mut next, section_id)?.section_title = title.into();
        Ok(self.commit(next, "update_section_title"))
    }

    /// Set or clear a section's description.
    pub fn update_section_description(
        &self,
        form: &Form,
        section_id: &SectionId,
        description: Option<String>,
    ) -> FormResult<Form> {
        let mut next = form.clone();
        find_section_mut(&mut next, section_id)?.description =
            description.filter(|d| !d.trim().is_empty());
        Ok(self.commit(next, "update_section_description"))
    }

    /// Move a section to `new_index` (clamped to the last position).
    ///
    /// Rejected when the move would make a condition test a question that
    /// now comes after its owner. Forward references the document already
    /// had are left for [`guard::audit`] to report.
    pub fn move_section(
        &self,
        form: &Form,
        section_id: &SectionId,
        new_index: usize,
    ) -> FormResult<Form> {
        let index = section_index(form, section_id)?;
        let title = form.sections[index].section_title.clone();

        let mut next = form.clone();
        let moved = next.sections.remove(index);
        let target = new_index.min(next.sections.len());
        next.sections.insert(target, moved);
        next.reindex_sections();

        let dependents = guard::introduced_forward_references(form, &next);
        if !dependents.is_empty() {
            return Err(FormError::integrity(format!("order of section '{title}'"), dependents));
        }
        Ok(self.commit(next, "move_section"))
    }
}
