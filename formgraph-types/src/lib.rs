//! Core types for the formgraph crate.
//!
//! This crate provides the form document model and its vocabulary:
//! - `Form`, `Section`, `Question`, `FormOption` - The nested document
//! - `DependencyCondition` - Edges gating visibility on earlier answers
//! - `Answer` and `Responses` - Typed respondent answers keyed by question
//! - `FormError` - Failures shared by every editing operation
//! - `FormStore` - The persistence collaborator

mod ids;
pub use ids::{AttributeId, FormId, OptionId, QuestionId, SectionId};

mod dependency;
pub use dependency::{DependencyCondition, DependencyType, ValueRange};

mod option;
pub use option::{Attribute, CellValue, FormOption, FunctionDependency, OptionKind, TableData};

mod question;
pub use question::{Question, QuestionType, ScaleLabels, ScaleRange};

mod form;
pub use form::{Form, INTRODUCTION_TITLE, Section};

mod answer;
pub use answer::Answer;

mod responses;
pub use responses::{ResponseError, Responses};

mod error;
pub use error::{DependentRef, EntityKind, FormError, FormResult, InvalidScaleRange};

mod store;
pub use store::FormStore;
