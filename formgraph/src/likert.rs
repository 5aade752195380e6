//! Likert captions and generated options for linear-scale questions.

use crate::{FormOption, QuestionId, ScaleLabels, ScaleRange};

/// Captions of the 5-point scale, from the first point to the last.
pub const FIVE_POINT: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];

/// Captions of the 10-point scale, tapering towards the middle.
pub const TEN_POINT: [&str; 10] = [
    "Extremely Disagree",
    "Strongly Disagree",
    "Disagree",
    "Somewhat Disagree",
    "Slightly Disagree",
    "Slightly Agree",
    "Somewhat Agree",
    "Agree",
    "Strongly Agree",
    "Extremely Agree",
];

/// Get all captions for a scale.
pub fn captions(range: ScaleRange) -> &'static [&'static str] {
    match range {
        ScaleRange::Five => &FIVE_POINT,
        ScaleRange::Ten => &TEN_POINT,
    }
}

/// Get the caption of a one-based point on a scale.
pub fn caption(range: ScaleRange, point: u8) -> Option<&'static str> {
    let index = usize::from(point).checked_sub(1)?;
    captions(range).get(index).copied()
}

/// The start and end captions for a scale.
pub fn default_labels(range: ScaleRange) -> ScaleLabels {
    let captions = captions(range);
    ScaleLabels::new(captions[0], captions[captions.len() - 1])
}

/// Fresh options valued `"1"` up to the number of points.
pub fn scale_options(question_id: QuestionId, range: ScaleRange) -> Vec<FormOption> {
    (1..=range.points())
        .map(|point| FormOption::normal(question_id, point.to_string()))
        .collect()
}
