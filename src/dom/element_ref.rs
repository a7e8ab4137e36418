//! selectors crate Element implementation for the parsed document.
//!
//! This enables CSS selector matching against the arena DOM.

use std::fmt;

use cssparser::{ParserInput, ToCss};
use html5ever::{LocalName, Namespace, ns};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::matching::{
    ElementSelectorFlags, MatchingForInvalidation, MatchingMode, NeedsSelectorFlags,
};
use selectors::parser::{ParseRelative, Selector, SelectorList, SelectorParseErrorKind};
use selectors::{OpaqueElement, SelectorImpl};

use super::Document;
use super::arena::{NodeData, NodeId};
use crate::error::{Error, Result};

/// Selector implementation for the selectors crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomSelectors;

/// Identifier string type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct IdentStr(pub String);

impl precomputed_hash::PrecomputedHash for IdentStr {
    fn precomputed_hash(&self) -> u32 {
        self.0
            .bytes()
            .fold(0u32, |h, byte| h.wrapping_mul(31).wrapping_add(byte as u32))
    }
}

impl AsRef<str> for IdentStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for IdentStr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'a> From<&'a str> for IdentStr {
    fn from(s: &'a str) -> Self {
        Self(s.to_string())
    }
}

impl ToCss for IdentStr {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

/// LocalName wrapper implementing ToCss.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CssLocalName(pub LocalName);

impl precomputed_hash::PrecomputedHash for CssLocalName {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl ToCss for CssLocalName {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.0)
    }
}

impl<'a> From<&'a str> for CssLocalName {
    fn from(s: &'a str) -> Self {
        Self(LocalName::from(s))
    }
}

/// Namespace wrapper implementing ToCss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CssNamespace(pub Namespace);

impl precomputed_hash::PrecomputedHash for CssNamespace {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl ToCss for CssNamespace {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.0)
    }
}

impl<'a> From<&'a str> for CssNamespace {
    fn from(s: &'a str) -> Self {
        Self(Namespace::from(s))
    }
}

/// Pseudo-elements never match a static document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoElement {}

impl ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = DomSelectors;
}

/// Pseudo-classes answerable from the document alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonTSPseudoClass {
    Link,
    AnyLink,
    Checked,
    Disabled,
    Enabled,
}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = DomSelectors;

    fn is_active_or_hover(&self) -> bool {
        false
    }

    fn is_user_action_state(&self) -> bool {
        false
    }
}

impl ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(match self {
            Self::Link => ":link",
            Self::AnyLink => ":any-link",
            Self::Checked => ":checked",
            Self::Disabled => ":disabled",
            Self::Enabled => ":enabled",
        })
    }
}

impl<'i> selectors::parser::Parser<'i> for DomSelectors {
    type Impl = DomSelectors;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_non_ts_pseudo_class(
        &self,
        location: cssparser::SourceLocation,
        name: cssparser::CowRcStr<'i>,
    ) -> std::result::Result<NonTSPseudoClass, cssparser::ParseError<'i, Self::Error>> {
        let pc = cssparser::match_ignore_ascii_case! { &name,
            "link" => NonTSPseudoClass::Link,
            "any-link" => NonTSPseudoClass::AnyLink,
            "checked" => NonTSPseudoClass::Checked,
            "disabled" => NonTSPseudoClass::Disabled,
            "enabled" => NonTSPseudoClass::Enabled,
            _ => return Err(location.new_custom_error(
                SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name),
            )),
        };
        Ok(pc)
    }
}

impl SelectorImpl for DomSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = IdentStr;
    type Identifier = IdentStr;
    type LocalName = CssLocalName;
    type NamespaceUrl = CssNamespace;
    type NamespacePrefix = IdentStr;
    type BorrowedLocalName = CssLocalName;
    type BorrowedNamespaceUrl = CssNamespace;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// Parse a comma-separated selector list.
pub(crate) fn parse_selector_list(selector: &str) -> Result<SelectorList<DomSelectors>> {
    let mut input = ParserInput::new(selector);
    let mut parser = cssparser::Parser::new(&mut input);
    SelectorList::parse(&DomSelectors, &mut parser, ParseRelative::No).map_err(|e| {
        Error::InvalidCss {
            selector: selector.to_string(),
            message: format!("{:?}", e.kind),
        }
    })
}

/// Match `elem` against any selector of `list`.
pub(crate) fn matches_list(elem: &ElementRef<'_>, list: &SelectorList<DomSelectors>) -> bool {
    list.slice()
        .iter()
        .any(|selector| matches_selector(elem, selector))
}

pub(crate) fn matches_selector(elem: &ElementRef<'_>, selector: &Selector<DomSelectors>) -> bool {
    let mut caches = SelectorCaches::default();
    let mut context = MatchingContext::new(
        MatchingMode::Normal,
        None,
        &mut caches,
        selectors::context::QuirksMode::NoQuirks,
        NeedsSelectorFlags::No,
        MatchingForInvalidation::No,
    );
    selectors::matching::matches_selector(selector, 0, None, elem, &mut context)
}

/// Reference to an element of a [`Document`].
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    pub doc: &'a Document,
    pub id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    fn element_at(&self, id: NodeId) -> Option<Self> {
        self.doc
            .dom()
            .is_element(id)
            .then(|| Self::new(self.doc, id))
    }

    fn is_tag(&self, tag: &str) -> bool {
        self.doc.dom().is_tag(self.id, tag)
    }

    fn is_link_element(&self) -> bool {
        (self.is_tag("a") || self.is_tag("area") || self.is_tag("link"))
            && self.doc.dom().attr(self.id, "href").is_some()
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.doc.dom().element_name(self.id))
            .finish()
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = DomSelectors;

    fn opaque(&self) -> OpaqueElement {
        match self.doc.dom().get(self.id) {
            Some(node) => OpaqueElement::new(node),
            None => OpaqueElement::new(self.doc),
        }
    }

    fn parent_element(&self) -> Option<Self> {
        let parent = self.doc.dom().parent(self.id)?;
        self.element_at(parent)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let dom = self.doc.dom();
        let mut current = dom.get(self.id)?.prev_sibling;
        while let Some(id) = current {
            if dom.is_element(id) {
                return Some(Self::new(self.doc, id));
            }
            current = dom.get(id)?.prev_sibling;
        }
        None
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let dom = self.doc.dom();
        let mut current = dom.get(self.id)?.next_sibling;
        while let Some(id) = current {
            if dom.is_element(id) {
                return Some(Self::new(self.doc, id));
            }
            current = dom.get(id)?.next_sibling;
        }
        None
    }

    fn first_element_child(&self) -> Option<Self> {
        let dom = self.doc.dom();
        dom.children(self.id)
            .find(|&child| dom.is_element(child))
            .map(|child| Self::new(self.doc, child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        self.doc
            .dom()
            .element_namespace(self.id)
            .is_some_and(|ns| *ns == ns!(html))
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.doc
            .dom()
            .element_name(self.id)
            .is_some_and(|n| *n == name.0)
    }

    fn has_namespace(&self, ns: &CssNamespace) -> bool {
        self.doc
            .dom()
            .element_namespace(self.id)
            .is_some_and(|n| *n == ns.0)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        let dom = self.doc.dom();
        dom.element_name(self.id) == other.doc.dom().element_name(other.id)
            && dom.element_namespace(self.id) == other.doc.dom().element_namespace(other.id)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssNamespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&IdentStr>,
    ) -> bool {
        self.doc.dom().attrs(self.id).iter().any(|attr| {
            let ns_match = match ns {
                NamespaceConstraint::Any => true,
                NamespaceConstraint::Specific(ns) => attr.name.ns == ns.0,
            };
            ns_match && attr.name.local == local_name.0 && operation.eval_str(&attr.value)
        })
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match pc {
            NonTSPseudoClass::Link | NonTSPseudoClass::AnyLink => self.is_link_element(),
            NonTSPseudoClass::Checked => self.doc.is_checked(self.id),
            NonTSPseudoClass::Disabled => self.doc.is_disabled(self.id),
            NonTSPseudoClass::Enabled => {
                self.doc.supports_disabled(self.id) && !self.doc.is_disabled(self.id)
            }
        }
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn is_link(&self) -> bool {
        self.is_link_element()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .dom()
            .attr(self.id, "id")
            .is_some_and(|own| case_sensitivity.eq(own.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .dom()
            .classes(self.id)
            .iter()
            .any(|c| case_sensitivity.eq(c.as_bytes(), name.0.as_bytes()))
    }

    fn imported_part(&self, _name: &IdentStr) -> Option<IdentStr> {
        None
    }

    fn is_part(&self, _name: &IdentStr) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        let dom = self.doc.dom();
        dom.children(self.id).all(|child| match dom.get(child).map(|n| &n.data) {
            Some(NodeData::Element { .. }) => false,
            Some(NodeData::Text(t)) => t.is_empty(),
            _ => true,
        })
    }

    fn is_root(&self) -> bool {
        let dom = self.doc.dom();
        dom.parent(self.id)
            .and_then(|parent| dom.get(parent))
            .is_some_and(|parent| matches!(parent.data, NodeData::Document))
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }

    fn has_custom_state(&self, _name: &IdentStr) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(doc: &'a Document, tag: &str) -> ElementRef<'a> {
        doc.find_by_tag(tag).expect("element present")
    }

    fn check(elem: &ElementRef<'_>, selector: &str) -> bool {
        matches_list(elem, &parse_selector_list(selector).unwrap())
    }

    #[test]
    fn test_tag_selector() {
        let doc = Document::parse("<div><p>Hello</p></div>");
        let p = first(&doc, "p");
        assert!(check(&p, "p"));
        assert!(!check(&p, "div"));
    }

    #[test]
    fn test_class_selector() {
        let doc = Document::parse(r#"<p class="intro highlight">Hello</p>"#);
        let p = first(&doc, "p");
        assert!(check(&p, ".intro"));
        assert!(check(&p, "p.highlight"));
        assert!(!check(&p, ".missing"));
    }

    #[test]
    fn test_id_selector() {
        let doc = Document::parse(r#"<p id="main">Hello</p>"#);
        let p = first(&doc, "p");
        assert!(check(&p, "#main"));
        assert!(!check(&p, "#other"));
    }

    #[test]
    fn test_combinators() {
        let doc = Document::parse("<div><span><p>Nested</p></span></div>");
        let p = first(&doc, "p");
        assert!(check(&p, "div p"));
        assert!(check(&p, "span > p"));
        assert!(!check(&p, "div > p"));
        assert!(check(&p, "ol > li, span > p"));
    }

    #[test]
    fn test_attribute_selectors() {
        let doc = Document::parse(r#"<input type="Checkbox" list="x"><img alt="">"#);
        let input = first(&doc, "input");
        assert!(check(&input, r#"input[type="checkbox"]"#));
        assert!(check(&input, "input[list]"));
        assert!(!check(&input, "input:not([type])"));

        let img = first(&doc, "img");
        assert!(!check(&img, r#"img:not([alt=""])"#));
    }

    #[test]
    fn test_state_pseudo_classes() {
        let doc = Document::parse(
            r#"<a href="/">x</a><input type="checkbox" checked disabled><button>b</button>"#,
        );
        assert!(check(&first(&doc, "a"), ":link"));
        assert!(check(&first(&doc, "input"), ":checked:disabled"));
        assert!(check(&first(&doc, "button"), ":enabled"));
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let err = parse_selector_list("div >").unwrap_err();
        assert!(matches!(err, Error::InvalidCss { .. }));
        assert!(parse_selector_list("p:hover").is_err());
    }
}
