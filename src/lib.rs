//! # axquery
//!
//! ARIA role resolution and accessibility-tree queries over HTML documents.
//!
//! ## Features
//!
//! - Resolve the effective role of an element from its `role` attribute,
//!   HTML semantics, and page landmarks
//! - Read `aria-*` attributes as typed values, falling back to native
//!   properties (`disabled`, `required`, heading level, validity)
//! - Query a tree with accessibility selectors: roles (including sub-roles),
//!   `:state` flags and `[attribute="value"]` equality
//! - Bring your own tree by implementing [`Element`] and [`TreeNode`], or use
//!   the bundled html5ever-backed [`Document`]
//!
//! ## Quick Start
//!
//! ```
//! use axquery::{Document, get_role, query_selector_all};
//!
//! let doc = Document::parse(r#"
//!     <header>Site</header>
//!     <nav><a href="/">Home</a> <a href="/about">About</a></nav>
//!     <button aria-expanded="true">Menu</button>
//! "#);
//!
//! let links = query_selector_all(doc.root(), "link").unwrap();
//! assert_eq!(links.len(), 2);
//!
//! let header = doc.find_by_tag("header").unwrap();
//! assert_eq!(get_role(&header).unwrap().as_deref(), Some("banner"));
//!
//! // `command` covers button, link and menu items
//! let commands = query_selector_all(doc.root(), "command").unwrap();
//! assert_eq!(commands.len(), 3);
//! ```
//!
//! ## Custom tables
//!
//! ```
//! use axquery::{AttrType, Document, Query, TablesBuilder};
//!
//! let tables = TablesBuilder::from_builtin()
//!     .sub_roles("button", ["toggle"])
//!     .extra_selectors("toggle", ["[data-toggle]"])
//!     .attribute("toggled", AttrType::Bool)
//!     .build()
//!     .unwrap();
//!
//! let doc = Document::parse(r#"<div data-toggle aria-toggled="true">x</div>"#);
//! let query = Query::new(&tables);
//! assert_eq!(query.query_selector_all(doc.root(), "toggle").unwrap().len(), 1);
//! assert_eq!(query.query_selector_all(doc.root(), "button").unwrap().len(), 1);
//! assert_eq!(query.query_selector_all(doc.root(), ":toggled").unwrap().len(), 1);
//! ```

pub mod aria;
pub mod dom;
pub mod element;
mod error;

pub use aria::{
    AriaSelector, AttrType, AttrValue, Query, Tables, TablesBuilder, get_attribute, get_role,
    matches, query_selector, query_selector_all,
};
pub use dom::{Document, ElementRef, NodeRef};
pub use element::{ComputedStyle, Display, Element, TreeNode, Visibility, Walk, walk};
pub use error::{Error, Result};
