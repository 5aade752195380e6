use formgraph::{
    Attribute, DependencyCondition, Form, FormEditor, FunctionDependency, OptionId, QuestionId,
    QuestionType, ScaleRange, SectionId, TableData, ValueRange,
};

use crate::{ask, with_options};

/// An end-of-term course evaluation.
///
/// The *Workload* section asks for weekly hours (a number), a 10-point
/// difficulty scale and whether the lab was used. The *Lab* section is only
/// relevant to lab users: it offers a table of lab packages, and a question
/// about extra support that appears once someone reports ten or more hours.
pub struct CourseEvaluation {
    pub form: Form,
    pub workload: SectionId,
    pub lab: SectionId,
    pub hours: QuestionId,
    pub difficulty: QuestionId,
    pub used_lab: QuestionId,
    pub package: QuestionId,
    pub packages: OptionId,
    pub support: QuestionId,
}

pub fn course_evaluation(editor: &FormEditor) -> anyhow::Result<CourseEvaluation> {
    let form = editor.add_section(&Form::new("Course evaluation"));
    let workload = form.sections[0].section_id;
    let form = editor.update_section_title(&form, &workload, "Workload")?;

    let (form, hours) = ask(editor, &form, &workload, "Hours per week spent on the course", None)?;
    let form = editor.update_answer_type(&form, &workload, &hours, QuestionType::Number)?;
    let form = editor.update_question_required(&form, &workload, &hours, true)?;

    let (form, difficulty) = ask(editor, &form, &workload, "How difficult was the course?", None)?;
    let form =
        editor.update_answer_type(&form, &workload, &difficulty, QuestionType::LinearScale)?;
    let form = editor.update_scale_range(&form, &workload, &difficulty, ScaleRange::Ten)?;

    let (form, used_lab) = ask(editor, &form, &workload, "Did you use the lab?", None)?;
    let form = with_options(editor, form, &workload, &used_lab, &["Yes", "No"])?;

    let form = editor.add_section(&form);
    let lab = form.sections[1].section_id;
    let form = editor.update_section_title(&form, &lab, "Lab")?;
    let form = editor.update_section_description(
        &form,
        &lab,
        Some("Only for students who used the lab.".to_string()),
    )?;

    let (form, package) = ask(
        editor,
        &form,
        &lab,
        "Which lab package did you book?",
        Some(DependencyCondition::visibility(used_lab, "Yes")),
    )?;
    let form = editor.update_answer_type(&form, &lab, &package, QuestionType::Table)?;
    let table = TableData::with_columns(["Hours", "Price"])
        .with_row(
            Attribute::new("Basic")
                .with_value("Hours", "10")
                .with_value("Price", "50"),
        )
        .with_row(
            Attribute::new("Extended")
                .with_value("Hours", "{input}")
                .with_value("Price", FunctionDependency::new("{input} * 4.5")),
        );
    let form = editor.add_table_option(&form, &lab, &package, table)?;
    let packages = form
        .question(&package)
        .and_then(|q| q.options.first())
        .map(|o| o.option_id)
        .ok_or_else(|| anyhow::anyhow!("table option was not added"))?;

    let (form, support) = ask(
        editor,
        &form,
        &lab,
        "Would extra tutoring have helped?",
        Some(DependencyCondition::visibility(hours, "").with_range(ValueRange::at_least(10.0))),
    )?;
    let form = with_options(editor, form, &lab, &support, &["Yes", "No", "Not sure"])?;

    Ok(CourseEvaluation {
        form,
        workload,
        lab,
        hours,
        difficulty,
        used_lab,
        package,
        packages,
        support,
    })
}
