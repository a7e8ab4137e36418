//! ARIA role resolution, typed attributes and accessibility selectors.
//!
//! The free functions in this module use the built-in [`Tables`]; use
//! [`Query`] to run the same operations against custom tables or to include
//! hidden content in tree queries.

mod attribute;
mod hierarchy;
mod query;
mod role;
mod selector;
mod tables;

pub use attribute::{AttrType, AttrValue};
pub use query::Query;
pub use selector::AriaSelector;
#[cfg(feature = "serde")]
pub use tables::{ExtraSelectorsConfig, TablesConfig};
pub use tables::{Tables, TablesBuilder};

use crate::element::{Element, TreeNode};
use crate::error::Result;

/// Effective role of `el`: explicit `role` attribute, implied role, or the
/// page-level `banner`/`contentinfo` landmark.
pub fn get_role<E: Element>(el: &E) -> Result<Option<String>> {
    Query::default().get_role(el)
}

/// Typed value of the `aria-{key}` attribute, with native fallbacks.
pub fn get_attribute<E: Element>(el: &E, key: &str) -> AttrValue {
    Query::default().get_attribute(el, key)
}

/// Test `el` against an accessibility selector (`role`, `:state`, or
/// `[name="value"]`).
pub fn matches<E: Element>(el: &E, selector: &str) -> Result<bool> {
    Query::default().matches(el, selector)
}

/// First rendered element under `root` matching `selector`.
pub fn query_selector<N: TreeNode>(root: N, selector: &str) -> Result<Option<N::Element>> {
    Query::default().query_selector(root, selector)
}

/// All rendered elements under `root` matching `selector`, in document order.
pub fn query_selector_all<N: TreeNode>(root: N, selector: &str) -> Result<Vec<N::Element>> {
    Query::default().query_selector_all(root, selector)
}
