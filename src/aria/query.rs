//! Tree queries over accessibility selectors.

use super::attribute::{AttrValue, read_attribute};
use super::role::resolve_role;
use super::selector::{AriaSelector, CompiledSelector};
use super::tables::Tables;
use crate::element::{Display, Element, TreeNode, Visibility, Walk, walk};
use crate::error::Result;

/// Accessibility queries bound to a set of [`Tables`].
///
/// By default, queries skip content that is not rendered: an element with
/// the native `hidden` flag, `aria-hidden="true"`, or `display: none` is
/// skipped together with its subtree, and an element with
/// `visibility: hidden` is skipped itself while its descendants are still
/// visited. [`Query::include_hidden`] turns the filtering off.
///
/// Selectors that read the `hidden` attribute (`:hidden`, `[hidden="..."]`)
/// always walk the whole tree, so they can find the content the filter
/// would skip.
#[derive(Debug, Clone, Copy)]
pub struct Query<'t> {
    tables: &'t Tables,
    include_hidden: bool,
}

impl Default for Query<'static> {
    fn default() -> Self {
        Self::new(Tables::builtin())
    }
}

impl<'t> Query<'t> {
    pub fn new(tables: &'t Tables) -> Self {
        Self {
            tables,
            include_hidden: false,
        }
    }

    /// Also return elements that are not rendered.
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn tables(&self) -> &'t Tables {
        self.tables
    }

    /// Effective role of `el`, if any.
    pub fn get_role<E: Element>(&self, el: &E) -> Result<Option<String>> {
        resolve_role(self.tables, el)
    }

    /// Typed value of the `aria-{key}` attribute of `el`.
    pub fn get_attribute<E: Element>(&self, el: &E, key: &str) -> AttrValue {
        read_attribute(self.tables, el, key)
    }

    /// Test a single element against an accessibility selector.
    pub fn matches<E: Element>(&self, el: &E, selector: &str) -> Result<bool> {
        let parsed = AriaSelector::parse(selector)?;
        CompiledSelector::new(self.tables, parsed).matches(el)
    }

    /// First element under `root` (inclusive, document order) matching
    /// `selector`.
    pub fn query_selector<N: TreeNode>(
        &self,
        root: N,
        selector: &str,
    ) -> Result<Option<N::Element>> {
        let mut found = self.collect(root, selector, Some(1))?;
        Ok(found.pop())
    }

    /// Every element under `root` (inclusive, document order) matching
    /// `selector`.
    pub fn query_selector_all<N: TreeNode>(
        &self,
        root: N,
        selector: &str,
    ) -> Result<Vec<N::Element>> {
        self.collect(root, selector, None)
    }

    fn collect<N: TreeNode>(
        &self,
        root: N,
        selector: &str,
        limit: Option<usize>,
    ) -> Result<Vec<N::Element>> {
        let compiled = CompiledSelector::new(self.tables, AriaSelector::parse(selector)?);
        let filter_hidden = !self.include_hidden && !compiled.reads_key("hidden");
        let mut results = Vec::new();
        let mut failure = None;

        let _ = walk(root, |node| {
            let Some(el) = node.as_element() else {
                return Walk::Continue;
            };

            let mut next = Walk::Continue;
            if filter_hidden {
                match rendering(&el) {
                    Rendering::Subtree => return Walk::SkipChildren,
                    Rendering::Descendants => return Walk::Continue,
                    Rendering::Rendered => {}
                }
            }

            match compiled.matches(&el) {
                Ok(true) => {
                    results.push(el);
                    if limit.is_some_and(|limit| results.len() >= limit) {
                        next = Walk::Stop;
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    failure = Some(e);
                    next = Walk::Stop;
                }
            }
            next
        });

        if let Some(e) = failure {
            return Err(e);
        }
        tracing::debug!(selector, matches = results.len(), "query complete");
        Ok(results)
    }
}

/// How much of an element's subtree is rendered.
enum Rendering {
    Rendered,
    /// The element is invisible but its descendants may be visible.
    Descendants,
    /// Neither the element nor its descendants are rendered.
    Subtree,
}

fn rendering<E: Element>(el: &E) -> Rendering {
    if el.hidden() || el.attribute("aria-hidden") == Some("true") {
        return Rendering::Subtree;
    }

    let style = el.computed_style();
    if style.display == Display::None {
        Rendering::Subtree
    } else if matches!(style.visibility, Visibility::Hidden | Visibility::Collapse) {
        Rendering::Descendants
    } else {
        Rendering::Rendered
    }
}
