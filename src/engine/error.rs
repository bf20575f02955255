use thiserror::Error;

/// Everything that can abort an extraction call. Extraction is all-or-nothing:
/// no partial tree is returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("template has no groups")]
    EmptyTemplate,

    #[error("template group {group} has no placeholders")]
    InvalidTemplate { group: usize },

    #[error("template requires {required} columns but the data has {available}")]
    TemplateMismatch { required: usize, available: usize },

    #[error("row {row} has {found} columns, expected {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Failure to read the textual template form, e.g. `[[_,_],[_]]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid template at offset {offset}: {message}")]
pub struct TemplateParseError {
    pub offset: usize,
    pub message: String,
}
