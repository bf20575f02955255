//! Extraction settings read from a JSON file.
//!
//! ```json
//! {
//!   "template": "[[_],[_],[_,_],[_]]",
//!   "skip_rows": 2,
//!   "extra_null_tokens": ["--"],
//!   "drop_empty_leaves": false
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::LoadOptions;
use crate::data::nulls::NullTokens;
use crate::engine::{Extractor, Template};

/// Template as written in a config file: the bracket form or a list of group widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateSpec {
    Text(String),
    Widths(Vec<usize>),
}

impl TemplateSpec {
    pub fn to_template(&self) -> Result<Template> {
        match self {
            TemplateSpec::Text(src) => src
                .parse::<Template>()
                .with_context(|| format!("parsing template {src:?}")),
            TemplateSpec::Widths(widths) => {
                Template::new(widths.clone()).context("building template from group widths")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    pub template: Option<TemplateSpec>,
    /// Replaces the default null spellings when present.
    pub null_tokens: Option<Vec<String>>,
    /// Added to the default (or replaced) null spellings.
    pub extra_null_tokens: Vec<String>,
    pub skip_rows: usize,
    pub has_header: bool,
    pub sheet: Option<String>,
    pub drop_empty_leaves: bool,
}

impl ExtractConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn null_tokens(&self) -> NullTokens {
        match &self.null_tokens {
            Some(tokens) => NullTokens::new(tokens.iter().chain(&self.extra_null_tokens)),
            None => NullTokens::with_extra(&self.extra_null_tokens),
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            skip_rows: self.skip_rows,
            has_header: self.has_header,
            sheet: self.sheet.clone(),
        }
    }

    /// Build the extractor; fails when no template is configured.
    pub fn extractor(&self) -> Result<Extractor> {
        let template = self
            .template
            .as_ref()
            .context("no template configured")?
            .to_template()?;
        Ok(Extractor::new(template)
            .with_null_tokens(self.null_tokens())
            .drop_empty_leaves(self.drop_empty_leaves))
    }
}
