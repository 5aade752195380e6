use formgraph::{
    DependencyCondition, Form, FormEditor, QuestionId, QuestionType, ScaleLabels, SectionId,
};

use crate::{ask, option_id, with_options};

/// A café feedback form with follow-up questions that only appear for some answers.
///
/// - *Introduction*: the respondent's name (never gated).
/// - *Visit*: how they heard of us, whether they bought anything, what they
///   bought (only after "Yes") and a 5-point rating of it.
/// - *Follow-up*: whether we may contact them, an email field (only after
///   "Yes"), and a contact channel whose "Newsletter" option is only offered
///   to people who found us through search.
pub struct CustomerFeedback {
    pub form: Form,
    pub introduction: SectionId,
    pub visit: SectionId,
    pub follow_up: SectionId,
    pub name: QuestionId,
    pub heard_from: QuestionId,
    pub bought: QuestionId,
    pub purchases: QuestionId,
    pub rating: QuestionId,
    pub contact: QuestionId,
    pub email: QuestionId,
    pub channel: QuestionId,
}

pub fn customer_feedback(editor: &FormEditor) -> anyhow::Result<CustomerFeedback> {
    let form = Form::new("Café feedback").with_description("Tell us about your last visit.");

    let form = editor.add_section(&form);
    let introduction = form.sections[0].section_id;
    let form = editor.update_section_title(&form, &introduction, "Introduction")?;
    let (form, name) = ask(editor, &form, &introduction, "What is your name?", None)?;
    let form = editor.update_answer_type(&form, &introduction, &name, QuestionType::Text)?;

    let form = editor.add_section(&form);
    let visit = form.sections[1].section_id;
    let form = editor.update_section_title(&form, &visit, "Your visit")?;
    let (form, heard_from) = ask(editor, &form, &visit, "How did you hear about us?", None)?;
    let form = with_options(editor, form, &visit, &heard_from, &["Friend", "Advert", "Search"])?;
    let (form, bought) = ask(editor, &form, &visit, "Did you buy anything?", None)?;
    let form = with_options(editor, form, &visit, &bought, &["Yes", "No"])?;
    let form = editor.update_question_required(&form, &visit, &bought, true)?;

    let (form, purchases) = ask(
        editor,
        &form,
        &visit,
        "What did you buy?",
        Some(DependencyCondition::visibility(bought, "Yes")),
    )?;
    let form = editor.update_answer_type(&form, &visit, &purchases, QuestionType::MultiSelect)?;
    let form = with_options(editor, form, &visit, &purchases, &["Coffee", "Cake", "Sandwich"])?;

    let (form, rating) = ask(
        editor,
        &form,
        &visit,
        "How would you rate it?",
        Some(DependencyCondition::visibility(bought, "Yes")),
    )?;
    let form = editor.update_answer_type(&form, &visit, &rating, QuestionType::LinearScale)?;
    let form = editor.update_scale_labels(
        &form,
        &visit,
        &rating,
        ScaleLabels::new("Awful", "Wonderful"),
    )?;

    let form = editor.add_section(&form);
    let follow_up = form.sections[2].section_id;
    let form = editor.update_section_title(&form, &follow_up, "Follow-up")?;
    let (form, contact) = ask(editor, &form, &follow_up, "May we contact you?", None)?;
    let form = with_options(editor, form, &follow_up, &contact, &["Yes", "No"])?;
    let (form, email) = ask(
        editor,
        &form,
        &follow_up,
        "Your email address",
        Some(DependencyCondition::visibility(contact, "Yes")),
    )?;
    let form = editor.update_answer_type(&form, &follow_up, &email, QuestionType::Text)?;

    let (form, channel) = ask(editor, &form, &follow_up, "How should we reach you?", None)?;
    let form = with_options(editor, form, &follow_up, &channel, &["Email", "Newsletter"])?;
    let newsletter = option_id(&form, &channel, "Newsletter")?;
    let form = editor.add_option_dependency(
        &form,
        &follow_up,
        &channel,
        &newsletter,
        DependencyCondition::options(heard_from, "Search", ["Newsletter"]),
    )?;

    Ok(CustomerFeedback {
        form,
        introduction,
        visit,
        follow_up,
        name,
        heard_from,
        bought,
        purchases,
        rating,
        contact,
        email,
        channel,
    })
}
