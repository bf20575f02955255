//! Column templates.
//!
//! A template lists, left to right, how many columns each hierarchy level
//! consumes. `[[_],[_],[_,_]]` reads one key column, a second key column, and
//! then a two-column leaf record.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use super::error::{ExtractError, TemplateParseError};

/// Ordered, non-empty list of group widths. The last group produces leaf
/// content; every earlier group produces one nesting level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    groups: Vec<usize>,
}

impl Template {
    /// Build a template from group widths.
    pub fn new(groups: Vec<usize>) -> Result<Self, ExtractError> {
        if groups.is_empty() {
            return Err(ExtractError::EmptyTemplate);
        }
        if let Some(group) = groups.iter().position(|&n| n == 0) {
            return Err(ExtractError::InvalidTemplate { group });
        }
        Ok(Template { groups })
    }

    pub fn groups(&self) -> &[usize] {
        &self.groups
    }

    /// Total placeholder count: the number of leading columns consumed.
    pub fn width(&self) -> usize {
        self.groups.iter().sum()
    }

    /// Width of the last (leaf) group.
    pub fn leaf_width(&self) -> usize {
        // `new` guarantees at least one group.
        self.groups.last().copied().unwrap_or(0)
    }

    /// Column span of every group, in order.
    pub fn spans(&self) -> Vec<Range<usize>> {
        let mut start = 0;
        self.groups
            .iter()
            .map(|&n| {
                let span = start..start + n;
                start += n;
                span
            })
            .collect()
    }

    /// Key columns (all groups but the last), most significant first.
    pub fn significant_columns(&self) -> Vec<usize> {
        let key_width = self.width() - self.leaf_width();
        (0..key_width).collect()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, &n) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str("[")?;
            f.write_str(&vec!["_"; n].join(","))?;
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}

impl FromStr for Template {
    type Err = TemplateParseError;

    /// Parse `[[_,_],[_]]`. Placeholders may be written `_` or `None`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { src: s, pos: 0 };
        let groups = parser.template()?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(parser.error("trailing characters after template"));
        }
        Ok(Template { groups })
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn template(&mut self) -> Result<Vec<usize>, TemplateParseError> {
        self.expect('[')?;
        let mut groups = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(']') && groups.is_empty() {
                return Err(self.error("template has no groups"));
            }
            groups.push(self.group()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(groups),
                _ => return Err(self.error("expected ',' or ']' after group")),
            }
        }
    }

    fn group(&mut self) -> Result<usize, TemplateParseError> {
        self.expect('[')?;
        let mut width = 0;
        loop {
            self.skip_ws();
            if self.src[self.pos..].starts_with('_') {
                self.pos += 1;
            } else if self.src[self.pos..].starts_with("None") {
                self.pos += 4;
            } else {
                return Err(self.error("expected placeholder '_'"));
            }
            width += 1;
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(width),
                _ => return Err(self.error("expected ',' or ']' after placeholder")),
            }
        }
    }

    fn expect(&mut self, want: char) -> Result<(), TemplateParseError> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == want => Ok(()),
            _ => Err(self.error(&format!("expected '{want}'"))),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: &str) -> TemplateParseError {
        TemplateParseError {
            offset: self.pos,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("[[_]]", vec![1])]
    #[case("[[_,_],[_]]", vec![2, 1])]
    #[case(" [ [_], [ _ , _ ] ] ", vec![1, 2])]
    #[case("[[None, None], [None]]", vec![2, 1])]
    #[case("[[_],[_],[_],[_,_],[_]]", vec![1, 1, 1, 2, 1])]
    fn parses_templates(#[case] src: &str, #[case] groups: Vec<usize>) {
        let template: Template = src.parse().unwrap();
        assert_eq!(template.groups(), groups.as_slice());
    }

    #[rstest]
    #[case("")]
    #[case("[]")]
    #[case("[[]]")]
    #[case("[[_],]")]
    #[case("[[x]]")]
    #[case("[[_]] extra")]
    fn rejects_malformed(#[case] src: &str) {
        assert!(src.parse::<Template>().is_err(), "{src:?}");
    }

    #[test]
    fn display_round_trips() {
        let template = Template::new(vec![2, 1]).unwrap();
        assert_eq!(template.to_string(), "[[_,_],[_]]");
    }

    #[test]
    fn new_validates_groups() {
        assert_eq!(Template::new(vec![]), Err(ExtractError::EmptyTemplate));
        assert_eq!(
            Template::new(vec![1, 0]),
            Err(ExtractError::InvalidTemplate { group: 1 })
        );
    }

    #[test]
    fn significant_columns_exclude_leaf_group() {
        let template = Template::new(vec![1, 2, 2]).unwrap();
        assert_eq!(template.significant_columns(), vec![0, 1, 2]);
        assert_eq!(template.spans(), vec![0..1, 1..3, 3..5]);
        assert_eq!(template.width(), 5);
    }
}
