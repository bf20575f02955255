use log::debug;

use crate::data::model::{Cell, Sheet};
use crate::data::nulls::NullTokens;

use super::error::ExtractError;
use super::fill::forward_fill;
use super::group::{group, ResultNode};
use super::template::Template;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Normalize, fill and fold `sheet` according to `template`.
///
/// Fails before touching any row when the template needs more columns than
/// the sheet declares, and fails on the first row whose width differs from
/// the header width. A sheet with neither rows nor columns (an empty file)
/// yields an empty tree.
pub fn extract(
    sheet: &Sheet,
    template: &Template,
    tokens: &NullTokens,
) -> Result<ResultNode, ExtractError> {
    let width = sheet.width();
    if sheet.is_empty() && width == 0 {
        debug!("sheet has no rows and no columns; nothing to extract");
        return Ok(group(&[], template));
    }
    if template.width() > width {
        return Err(ExtractError::TemplateMismatch {
            required: template.width(),
            available: width,
        });
    }
    if let Some((row, found)) = sheet
        .rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != width)
    {
        return Err(ExtractError::ShapeMismatch {
            row,
            expected: width,
            found,
        });
    }

    debug!(
        "extracting {} rows x {} columns with template {template}, {} null tokens",
        sheet.len(),
        width,
        tokens.len()
    );
    if tokens.is_empty() {
        debug!("no null tokens configured; only blank cells are null");
    }

    let normalized: Vec<Vec<Option<Cell>>> = sheet
        .rows
        .iter()
        .map(|row| row.iter().map(|c| tokens.classify(c)).collect())
        .collect();
    let filled = forward_fill(normalized, &template.significant_columns());
    let tree = group(&filled, template);

    debug!("extracted {} top-level entries", tree.len());
    Ok(tree)
}

// ---------------------------------------------------------------------------
// Configured extractor
// ---------------------------------------------------------------------------

/// An [`extract`] call bundled with its configuration, reusable across sheets.
#[derive(Debug, Clone)]
pub struct Extractor {
    template: Template,
    tokens: NullTokens,
    drop_empty_leaves: bool,
}

impl Extractor {
    pub fn new(template: Template) -> Self {
        Extractor {
            template,
            tokens: NullTokens::default(),
            drop_empty_leaves: false,
        }
    }

    pub fn with_null_tokens(mut self, tokens: NullTokens) -> Self {
        self.tokens = tokens;
        self
    }

    /// Drop leaf items whose values are all null, and the branches this empties.
    pub fn drop_empty_leaves(mut self, drop: bool) -> Self {
        self.drop_empty_leaves = drop;
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn run(&self, sheet: &Sheet) -> Result<ResultNode, ExtractError> {
        let tree = extract(sheet, &self.template, &self.tokens)?;
        Ok(if self.drop_empty_leaves {
            tree.prune_empty_leaves()
        } else {
            tree
        })
    }
}
