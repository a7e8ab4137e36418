//! Accessibility selectors.
//!
//! Three forms are understood:
//!
//! - `button`: matches elements whose resolved role is `button` or a role
//!   inheriting from it,
//! - `:expanded`: matches elements whose `expanded` attribute is truthy,
//! - `[level="2"]`: matches elements whose `level` attribute has the string
//!   form `2`.

use super::attribute::read_attribute;
use super::role::resolve_role;
use super::tables::Tables;
use crate::element::Element;
use crate::error::{Error, Result};

/// A parsed accessibility selector, borrowing from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AriaSelector<'s> {
    Role(&'s str),
    State(&'s str),
    Equals { name: &'s str, value: &'s str },
}

impl<'s> AriaSelector<'s> {
    pub fn parse(selector: &'s str) -> Result<Self> {
        if selector.is_empty() {
            return Err(Error::InvalidSelector(selector.to_string()));
        }

        if let Some(key) = selector.strip_prefix(':') {
            return Ok(Self::State(key));
        }

        if selector.starts_with('[') {
            return parse_equals(selector)
                .ok_or_else(|| Error::InvalidSelector(selector.to_string()));
        }

        Ok(Self::Role(selector))
    }
}

/// `[name="value"]`: lowercase ASCII name, value taken verbatim.
fn parse_equals(selector: &str) -> Option<AriaSelector<'_>> {
    let inner = selector.strip_prefix('[')?.strip_suffix("\"]")?;
    let (name, value) = inner.split_once("=\"")?;
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_lowercase()) {
        return None;
    }
    Some(AriaSelector::Equals { name, value })
}

/// A selector prepared for repeated matching against many elements.
#[derive(Debug)]
pub(crate) struct CompiledSelector<'t> {
    tables: &'t Tables,
    kind: Compiled<'t>,
}

#[derive(Debug)]
enum Compiled<'t> {
    Roles(Vec<&'t str>),
    State(&'t str),
    Equals { name: &'t str, value: &'t str },
}

impl<'t> CompiledSelector<'t> {
    pub(crate) fn new(tables: &'t Tables, selector: AriaSelector<'t>) -> Self {
        let kind = match selector {
            AriaSelector::Role(role) => Compiled::Roles(tables.sub_roles(role)),
            AriaSelector::State(key) => Compiled::State(key),
            AriaSelector::Equals { name, value } => Compiled::Equals { name, value },
        };
        Self { tables, kind }
    }

    /// Whether matching reads the typed attribute `key`.
    pub(crate) fn reads_key(&self, key: &str) -> bool {
        match &self.kind {
            Compiled::Roles(_) => false,
            Compiled::State(state) => *state == key,
            Compiled::Equals { name, .. } => *name == key,
        }
    }

    pub(crate) fn matches<E: Element>(&self, el: &E) -> Result<bool> {
        match &self.kind {
            Compiled::Roles(candidates) => {
                let role = resolve_role(self.tables, el)?;
                Ok(role.is_some_and(|role| candidates.iter().any(|c| *c == role)))
            }
            Compiled::State(key) => Ok(read_attribute(self.tables, el, key).is_truthy()),
            Compiled::Equals { name, value } => {
                let actual = read_attribute(self.tables, el, name);
                Ok(actual.to_js_string().is_some_and(|s| s == *value))
            }
        }
    }
}
