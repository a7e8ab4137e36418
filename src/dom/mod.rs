//! Parsed HTML documents that accessibility queries can run against.
//!
//! [`Document`] parses HTML with html5ever into an [`ArenaDom`] and hands out
//! [`ElementRef`] and [`NodeRef`] views implementing the traits in
//! [`crate::element`]. CSS selector matching goes through the `selectors`
//! crate; computed style comes from a small cascade over the document's
//! `<style>` elements and `style` attributes.

mod arena;
mod element_ref;
mod encoding;
mod forms;
mod style;
mod tree_sink;

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use selectors::parser::SelectorList;

pub use arena::{ArenaDom, Attribute, Children, Node, NodeData, NodeId};
pub use element_ref::{DomSelectors, ElementRef};
pub use encoding::decode_html;
pub use style::{Origin, Stylesheet};
pub use tree_sink::ArenaSink;

use crate::element::{ComputedStyle, Element, TreeNode};
use crate::error::Result;
use element_ref::{matches_list, parse_selector_list};

/// A parsed HTML document.
pub struct Document {
    dom: ArenaDom,
    user_agent: Stylesheet,
    author: Stylesheet,
    styles: OnceCell<Vec<ComputedStyle>>,
    selectors: RefCell<HashMap<String, SelectorList<DomSelectors>>>,
}

impl Document {
    /// Parse an HTML document.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(ArenaSink::new(), ParseOpts::default())
            .one(html)
            .into_dom();
        Self::from_dom(dom)
    }

    /// Decode and parse HTML bytes.
    pub fn parse_bytes(bytes: &[u8]) -> Self {
        Self::parse(&decode_html(bytes))
    }

    /// Read and parse an HTML file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::parse_bytes(&bytes))
    }

    /// Wrap an already-built tree.
    pub fn from_dom(dom: ArenaDom) -> Self {
        let mut author = Stylesheet::default();
        let style_elements: Vec<_> = dom
            .descendants(dom.document())
            .filter(|&id| dom.is_tag(id, "style"))
            .collect();
        for id in &style_elements {
            author.extend(Stylesheet::parse(&dom.text_content(*id)));
        }

        tracing::debug!(
            nodes = dom.len(),
            style_elements = style_elements.len(),
            author_rules = author.rules.len(),
            "parsed document"
        );

        Self {
            dom,
            user_agent: Stylesheet::parse(style::USER_AGENT_CSS),
            author,
            styles: OnceCell::new(),
            selectors: RefCell::new(HashMap::new()),
        }
    }

    pub fn dom(&self) -> &ArenaDom {
        &self.dom
    }

    /// The document node, the root of every tree query.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, self.dom.document())
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> Option<ElementRef<'_>> {
        self.dom
            .children(self.dom.document())
            .find(|&id| self.dom.is_element(id))
            .map(|id| ElementRef::new(self, id))
    }

    /// Element with the given `id` attribute; the first one wins.
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        self.dom.get_by_id(id).map(|id| ElementRef::new(self, id))
    }

    /// Every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.dom
            .descendants(self.dom.document())
            .filter(|&id| self.dom.is_element(id))
            .map(|id| ElementRef::new(self, id))
    }

    /// First element with the given local name.
    pub fn find_by_tag(&self, tag: &str) -> Option<ElementRef<'_>> {
        self.elements().find(|el| el.tag_name() == tag)
    }

    /// Elements matching a CSS selector list, in document order.
    pub fn select(&self, selectors: &str) -> Result<Vec<ElementRef<'_>>> {
        let list = self.selector_list(selectors)?;
        Ok(self.elements().filter(|el| matches_list(el, &list)).collect())
    }

    fn selector_list(&self, selectors: &str) -> Result<SelectorList<DomSelectors>> {
        if let Some(list) = self.selectors.borrow().get(selectors) {
            return Ok(list.clone());
        }
        let list = parse_selector_list(selectors)?;
        self.selectors
            .borrow_mut()
            .insert(selectors.to_string(), list.clone());
        Ok(list)
    }

    /// Computed style of `id`, cascading every element on first use.
    fn computed_style(&self, id: NodeId) -> ComputedStyle {
        let styles = self.styles.get_or_init(|| self.cascade());
        styles.get(id.index()).copied().unwrap_or_default()
    }

    fn cascade(&self) -> Vec<ComputedStyle> {
        let sheets = [
            (&self.user_agent, Origin::UserAgent),
            (&self.author, Origin::Author),
        ];
        let mut styles = vec![ComputedStyle::default(); self.dom.len()];

        // Document order visits parents before their children.
        for id in self.dom.descendants(self.dom.document()) {
            if !self.dom.is_element(id) {
                continue;
            }
            let parent = self
                .dom
                .parent(id)
                .filter(|&p| self.dom.is_element(p))
                .map(|p| styles[p.index()]);
            let inline = self
                .dom
                .attr(id, "style")
                .map(style::parse_declarations)
                .unwrap_or_default();
            styles[id.index()] = style::compute_style(
                &ElementRef::new(self, id),
                &sheets,
                &inline,
                parent.as_ref(),
            );
        }
        tracing::debug!(elements = styles.len(), "computed styles");
        styles
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.dom.len())
            .field("author_rules", &self.author.rules.len())
            .finish()
    }
}

impl<'a> ElementRef<'a> {
    /// Lowercase local name.
    pub fn tag_name(&self) -> &'a str {
        self.doc
            .dom()
            .element_name(self.id)
            .map(|name| name.as_ref())
            .unwrap_or_default()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.doc.dom().attr(self.id, name)
    }

    /// Value of the `id` attribute.
    pub fn element_id(&self) -> Option<&'a str> {
        self.attr("id")
    }

    /// Concatenated descendant text.
    pub fn text(&self) -> String {
        self.doc.dom().text_content(self.id)
    }

    /// This element as a tree node, for queries scoped to its subtree.
    pub fn as_node(&self) -> NodeRef<'a> {
        NodeRef::new(self.doc, self.id)
    }
}

impl Element for ElementRef<'_> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attr(name)
    }

    fn tag_name(&self) -> &str {
        ElementRef::tag_name(self)
    }

    fn matches_css(&self, selectors: &str) -> Result<bool> {
        let list = self.doc.selector_list(selectors)?;
        Ok(matches_list(self, &list))
    }

    fn disabled(&self) -> Option<bool> {
        self.doc.disabled_property(self.id)
    }

    fn placeholder(&self) -> Option<String> {
        self.doc.placeholder(self.id)
    }

    fn required(&self) -> Option<bool> {
        self.doc.required(self.id)
    }

    fn read_only(&self) -> Option<bool> {
        self.doc.read_only(self.id)
    }

    fn hidden(&self) -> bool {
        self.attr("hidden").is_some()
    }

    fn check_validity(&self) -> Option<bool> {
        self.doc.check_validity(self.id)
    }

    fn computed_style(&self) -> ComputedStyle {
        self.doc.computed_style(self.id)
    }
}

/// Any node of a [`Document`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    pub doc: &'a Document,
    pub id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    pub fn data(&self) -> Option<&'a NodeData> {
        self.doc.dom().get(self.id).map(|node| &node.data)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef").field("id", &self.id).finish()
    }
}

impl<'a> TreeNode for NodeRef<'a> {
    type Element = ElementRef<'a>;

    fn as_element(&self) -> Option<ElementRef<'a>> {
        self.doc
            .dom()
            .is_element(self.id)
            .then(|| ElementRef::new(self.doc, self.id))
    }

    fn children(&self) -> impl Iterator<Item = Self> {
        let doc = self.doc;
        doc.dom()
            .children(self.id)
            .map(move |id| NodeRef::new(doc, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Display, Visibility};

    fn style_of(doc: &Document, id: &str) -> ComputedStyle {
        doc.get_element_by_id(id)
            .expect("element with id")
            .computed_style()
    }

    #[test]
    fn test_lookup_helpers() {
        let doc = Document::parse(r#"<p id="a">One</p><p id="a">Two</p>"#);
        assert_eq!(doc.get_element_by_id("a").unwrap().text(), "One");
        assert_eq!(doc.document_element().unwrap().tag_name(), "html");
        let tags: Vec<_> = doc.elements().map(|el| el.tag_name()).collect();
        assert_eq!(tags, ["html", "head", "body", "p", "p"]);
    }

    #[test]
    fn test_select() {
        let doc = Document::parse(r#"<ul><li class="x">1</li><li>2</li><li class="x">3</li></ul>"#);
        let texts: Vec<_> = doc.select("li.x").unwrap().iter().map(|el| el.text()).collect();
        assert_eq!(texts, ["1", "3"]);
        assert!(doc.select("li[").is_err());
    }

    #[test]
    fn test_user_agent_display() {
        let doc = Document::parse(
            r#"<div id="d"><span id="s">x</span></div><p id="h" hidden>y</p><input id="i" type="HIDDEN">"#,
        );
        assert_eq!(style_of(&doc, "d").display, Display::Block);
        assert_eq!(style_of(&doc, "s").display, Display::Inline);
        assert_eq!(style_of(&doc, "h").display, Display::None);
        assert_eq!(style_of(&doc, "i").display, Display::None);
    }

    #[test]
    fn test_author_cascade() {
        let doc = Document::parse(
            r#"
            <style>
              .gone { display: none }
              #keep.gone { display: block }
              .ghost { visibility: hidden }
              .shown { visibility: visible }
              p { display: none !important }
            </style>
            <div id="a" class="gone"></div>
            <div id="keep" class="gone"></div>
            <div id="g" class="ghost"><span id="child">x</span><span id="back" class="shown">y</span></div>
            <p id="p" style="display: block">z</p>
            "#,
        );
        assert_eq!(style_of(&doc, "a").display, Display::None);
        assert_eq!(style_of(&doc, "keep").display, Display::Block);
        assert_eq!(style_of(&doc, "g").visibility, Visibility::Hidden);
        assert_eq!(style_of(&doc, "child").visibility, Visibility::Hidden);
        assert_eq!(style_of(&doc, "back").visibility, Visibility::Visible);
        assert_eq!(style_of(&doc, "p").display, Display::None);
    }

    #[test]
    fn test_inline_style_beats_selectors() {
        let doc = Document::parse(
            r#"<style>#x { visibility: hidden }</style><div id="x" style="visibility: visible"></div>"#,
        );
        assert_eq!(style_of(&doc, "x").visibility, Visibility::Visible);
    }

    #[test]
    fn test_parse_bytes_and_open() {
        let doc = Document::parse_bytes(b"<p id=\"x\">caf\xe9</p>");
        assert_eq!(doc.get_element_by_id("x").unwrap().text(), "café");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"<h1 id=\"t\">Title</h1>").unwrap();
        let doc = Document::open(file.path()).unwrap();
        assert_eq!(doc.get_element_by_id("t").unwrap().tag_name(), "h1");

        assert!(Document::open("/definitely/not/here.html").is_err());
    }
}
