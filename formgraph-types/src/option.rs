use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AttributeId, DependencyCondition, OptionId, QuestionId};

/// Whether an option is a plain selectable choice or carries a table payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    #[default]
    Normal,
    Table,
}

/// One selectable choice (or table payload) within a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOption {
    pub option_id: OptionId,

    /// The question this option belongs to.
    pub question_id: QuestionId,

    #[serde(rename = "type", default)]
    pub kind: OptionKind,

    /// The displayed value of a normal option. Empty for table options.
    #[serde(default)]
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_data: Option<TableData>,

    /// Conditions controlling whether this option is offered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyCondition>,
}

impl FormOption {
    /// Create a normal option with a fresh id.
    pub fn normal(question_id: QuestionId, value: impl Into<String>) -> Self {
        Self {
            option_id: OptionId::generate(),
            question_id,
            kind: OptionKind::Normal,
            value: value.into(),
            table_data: None,
            dependencies: Vec::new(),
        }
    }

    /// Create a table option with a fresh id.
    pub fn table(question_id: QuestionId, data: TableData) -> Self {
        Self {
            option_id: OptionId::generate(),
            question_id,
            kind: OptionKind::Table,
            value: String::new(),
            table_data: Some(data),
            dependencies: Vec::new(),
        }
    }

    pub fn is_table(&self) -> bool {
        self.kind == OptionKind::Table
    }

    /// Check whether any dependency condition is attached to this option.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// The strings other conditions may use to refer to this option.
    ///
    /// A normal option is known by its value; a table option by its
    /// column names and row (attribute) names.
    pub fn labels(&self) -> Vec<&str> {
        match (&self.kind, &self.table_data) {
            (OptionKind::Normal, _) => vec![self.value.as_str()],
            (OptionKind::Table, Some(data)) => data
                .columns
                .iter()
                .map(String::as_str)
                .chain(data.rows.iter().map(|row| row.attribute_name.as_str()))
                .collect(),
            (OptionKind::Table, None) => Vec::new(),
        }
    }
}

/// The payload of a table option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub rows: Vec<Attribute>,
}

impl TableData {
    /// Create a table with the given columns and no rows.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, returning the table for chaining.
    pub fn with_row(mut self, row: Attribute) -> Self {
        self.rows.push(row);
        self
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn row(&self, attribute_id: &AttributeId) -> Option<&Attribute> {
        self.rows.iter().find(|row| &row.attribute_id == attribute_id)
    }

    pub fn row_mut(&mut self, attribute_id: &AttributeId) -> Option<&mut Attribute> {
        self.rows.iter_mut().find(|row| &row.attribute_id == attribute_id)
    }
}

/// A row of a table option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub attribute_id: AttributeId,
    pub attribute_name: String,

    /// Cell values keyed by column name.
    #[serde(default)]
    pub values: BTreeMap<String, CellValue>,
}

impl Attribute {
    /// Create an empty row with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            attribute_id: AttributeId::generate(),
            attribute_name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Set a cell, returning the row for chaining.
    pub fn with_value(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }
}

/// A table cell: either a literal or an expression computed at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Literal(String),
    Function(FunctionDependency),
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl From<FunctionDependency> for CellValue {
    fn from(f: FunctionDependency) -> Self {
        Self::Function(f)
    }
}

/// An opaque expression evaluated by the renderer, e.g. `"{input} * 1.2"`.
///
/// The core only stores the text. Evaluation happens in the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDependency {
    pub expression: String,
}

impl FunctionDependency {
    /// Placeholder replaced by the respondent's input before evaluation.
    pub const INPUT_PLACEHOLDER: &'static str = "{input}";

    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    /// Check whether the expression consumes the respondent's input.
    pub fn takes_input(&self) -> bool {
        self.expression.contains(Self::INPUT_PLACEHOLDER)
    }

    /// Substitute `input` for every placeholder, yielding the text to evaluate.
    pub fn substitute(&self, input: &str) -> String {
        self.expression.replace(Self::INPUT_PLACEHOLDER, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_option_is_known_by_value() {
        let option = FormOption::normal(QuestionId::generate(), "Yes");
        assert_eq!(option.labels(), vec!["Yes"]);
        assert!(!option.is_table());
    }

    #[test]
    fn table_option_is_known_by_columns_and_rows() {
        let data = TableData::with_columns(["Price", "Weight"])
            .with_row(Attribute::new("Apple").with_value("Price", "1.20"));
        let option = FormOption::table(QuestionId::generate(), data);
        assert_eq!(option.labels(), vec!["Price", "Weight", "Apple"]);
    }

    #[test]
    fn function_substitution() {
        let f = FunctionDependency::new("{input} * 2 + {input}");
        assert!(f.takes_input());
        assert_eq!(f.substitute("3"), "3 * 2 + 3");
        assert!(!FunctionDependency::new("40 + 2").takes_input());
    }

    #[test]
    fn cells_deserialize_untagged() {
        let json = r#"{"a": "plain", "b": {"expression": "{input} + 1"}}"#;
        let cells: BTreeMap<String, CellValue> = serde_json::from_str(json).unwrap();
        assert_eq!(cells["a"], CellValue::Literal("plain".into()));
        assert_eq!(
            cells["b"],
            CellValue::Function(FunctionDependency::new("{input} + 1"))
        );
    }

    #[test]
    fn option_kind_serializes_as_type() {
        let option = FormOption::normal(QuestionId::generate(), "No");
        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["type"], "normal");
        assert_eq!(json["value"], "No");
        assert!(json.get("dependencies").is_none());
    }
}
