//! CSS parsing and cascade for `display` and `visibility`.

use std::cmp::Ordering;

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};
use selectors::parser::{ParseRelative, Selector, SelectorList};

use super::element_ref::{DomSelectors, ElementRef, matches_selector};
use crate::element::{ComputedStyle, Display, Visibility};

/// Rules every document starts from.
pub(crate) const USER_AGENT_CSS: &str = r#"
area, base, basefont, datalist, head, link, meta, noembed, noframes, param,
rp, script, style, template, title { display: none; }
[hidden] { display: none; }
address, article, aside, blockquote, body, center, dd, details, dialog, dir,
div, dl, dt, fieldset, figcaption, figure, footer, form, h1, h2, h3, h4, h5, h6,
header, hgroup, hr, html, legend, li, listing, main, menu, nav, ol, p, plaintext,
pre, search, section, summary, table, ul, xmp { display: block; }
input[type="hidden" i] { display: none; }
"#;

/// A parsed stylesheet, keeping only declarations that affect rendering.
#[derive(Debug, Default, Clone)]
pub struct Stylesheet {
    pub rules: Vec<CssRule>,
}

#[derive(Debug, Clone)]
pub struct CssRule {
    pub selectors: SelectorList<DomSelectors>,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Declaration {
    pub value: PropertyValue,
    pub important: bool,
}

/// Declared value of one of the computed properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    Display(Display),
    Visibility(Visibility),
    /// `inherit`, `initial` or `unset` for the named property.
    Keyword(Property, Keyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Display,
    Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Inherit,
    Initial,
    Unset,
}

/// CSS specificity for cascade ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity {
    pub ids: u16,
    pub classes: u16,
    pub elements: u16,
}

impl Specificity {
    pub fn from_selector(selector: &Selector<DomSelectors>) -> Self {
        let packed = selector.specificity();
        // (ids << 20) | (classes << 10) | elements
        Self {
            ids: ((packed >> 20) & 0x3FF) as u16,
            classes: ((packed >> 10) & 0x3FF) as u16,
            elements: (packed & 0x3FF) as u16,
        }
    }
}

/// Origin of a style sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Origin {
    UserAgent,
    Author,
}

/// A declaration that applies to an element, with its cascade position.
#[derive(Debug)]
struct Matched {
    declaration: Declaration,
    origin: Origin,
    style_attribute: bool,
    specificity: Specificity,
    order: usize,
}

impl Matched {
    /// Precedence band: normal UA, normal author, important author,
    /// important UA.
    fn band(&self) -> u8 {
        match (self.declaration.important, self.origin) {
            (false, Origin::UserAgent) => 0,
            (false, Origin::Author) => 1,
            (true, Origin::Author) => 2,
            (true, Origin::UserAgent) => 3,
        }
    }

    fn cascade_cmp(&self, other: &Self) -> Ordering {
        self.band()
            .cmp(&other.band())
            .then(self.style_attribute.cmp(&other.style_attribute))
            .then(self.specificity.cmp(&other.specificity))
            .then(self.order.cmp(&other.order))
    }
}

impl Stylesheet {
    /// Parse a stylesheet, skipping anything it does not understand.
    pub fn parse(css: &str) -> Self {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut rules = Vec::new();

        let mut rule_parser = TopLevelRuleParser { rules: &mut rules };
        for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
            if let Err((error, source)) = result {
                tracing::trace!(error = ?error.kind, source, "skipped css rule");
            }
        }

        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append the rules of `other` after this sheet's own rules.
    pub fn extend(&mut self, other: Stylesheet) {
        self.rules.extend(other.rules);
    }
}

/// Parse the declarations of a `style` attribute.
pub fn parse_declarations(css: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut declarations = Vec::new();
    let mut decl_parser = DeclarationListParser {
        declarations: &mut declarations,
    };
    for result in RuleBodyParser::new(&mut parser, &mut decl_parser) {
        let _ = result;
    }
    declarations
}

struct TopLevelRuleParser<'a> {
    rules: &'a mut Vec<CssRule>,
}

impl<'i> AtRuleParser<'i> for TopLevelRuleParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelRuleParser<'_> {
    type Prelude = SelectorList<DomSelectors>;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let location = input.current_source_location();
        SelectorList::parse(&DomSelectors, input, ParseRelative::No)
            .map_err(|_| location.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut declarations = Vec::new();
        let mut decl_parser = DeclarationListParser {
            declarations: &mut declarations,
        };
        for result in RuleBodyParser::new(input, &mut decl_parser) {
            let _ = result;
        }

        if !declarations.is_empty() {
            self.rules.push(CssRule {
                selectors: prelude,
                declarations,
            });
        }
        Ok(())
    }
}

struct DeclarationListParser<'a> {
    declarations: &'a mut Vec<Declaration>,
}

impl<'i> AtRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();
}

impl<'i> DeclarationParser<'i> for DeclarationListParser<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let property = match_property(&name).ok_or_else(|| input.new_custom_error(()))?;
        let ident = input.expect_ident_cloned()?;
        let value = parse_property_value(property, &ident).ok_or_else(|| input.new_custom_error(()))?;
        let important = input.try_parse(cssparser::parse_important).is_ok();
        input.expect_exhausted()?;

        self.declarations.push(Declaration { value, important });
        Ok(())
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for DeclarationListParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

fn match_property(name: &str) -> Option<Property> {
    cssparser::match_ignore_ascii_case! { name,
        "display" => Some(Property::Display),
        "visibility" => Some(Property::Visibility),
        _ => None,
    }
}

fn parse_property_value(property: Property, ident: &str) -> Option<PropertyValue> {
    let ident = ident.to_ascii_lowercase();
    let keyword = match ident.as_str() {
        "inherit" => Some(Keyword::Inherit),
        "initial" => Some(Keyword::Initial),
        "unset" | "revert" | "revert-layer" => Some(Keyword::Unset),
        _ => None,
    };
    if let Some(keyword) = keyword {
        return Some(PropertyValue::Keyword(property, keyword));
    }

    match property {
        Property::Display => parse_display(&ident).map(PropertyValue::Display),
        Property::Visibility => parse_visibility(&ident).map(PropertyValue::Visibility),
    }
}

fn parse_display(ident: &str) -> Option<Display> {
    let display = match ident {
        "none" => Display::None,
        "contents" => Display::Contents,
        "inline" | "inline-block" | "inline-flex" | "inline-grid" | "inline-table" | "ruby" => {
            Display::Inline
        }
        "block" | "flex" | "grid" | "flow-root" | "list-item" | "table" | "table-row"
        | "table-cell" | "table-caption" | "table-column" | "table-column-group"
        | "table-header-group" | "table-footer-group" | "table-row-group" => Display::Block,
        _ => return None,
    };
    Some(display)
}

fn parse_visibility(ident: &str) -> Option<Visibility> {
    match ident {
        "visible" => Some(Visibility::Visible),
        "hidden" => Some(Visibility::Hidden),
        "collapse" => Some(Visibility::Collapse),
        _ => None,
    }
}

/// Compute the style of `elem` from the user-agent and author sheets, its
/// inline declarations and the style of its parent element.
pub fn compute_style(
    elem: &ElementRef<'_>,
    stylesheets: &[(&Stylesheet, Origin)],
    inline: &[Declaration],
    parent: Option<&ComputedStyle>,
) -> ComputedStyle {
    let mut matched = Vec::new();
    let mut order = 0;

    for (sheet, origin) in stylesheets {
        for rule in &sheet.rules {
            let Some(specificity) = matching_specificity(elem, &rule.selectors) else {
                continue;
            };
            for declaration in &rule.declarations {
                matched.push(Matched {
                    declaration: *declaration,
                    origin: *origin,
                    style_attribute: false,
                    specificity,
                    order,
                });
                order += 1;
            }
        }
    }
    for declaration in inline {
        matched.push(Matched {
            declaration: *declaration,
            origin: Origin::Author,
            style_attribute: true,
            specificity: Specificity::default(),
            order,
        });
        order += 1;
    }

    matched.sort_by(Matched::cascade_cmp);

    let inherited = parent.copied().unwrap_or_default();
    let mut style = ComputedStyle {
        display: Display::default(),
        visibility: inherited.visibility,
    };
    for m in &matched {
        apply(&mut style, m.declaration.value, &inherited);
    }
    style
}

/// Highest specificity among the selectors of `list` that match `elem`.
fn matching_specificity(
    elem: &ElementRef<'_>,
    list: &SelectorList<DomSelectors>,
) -> Option<Specificity> {
    list.slice()
        .iter()
        .filter(|selector| matches_selector(elem, selector))
        .map(Specificity::from_selector)
        .max()
}

fn apply(style: &mut ComputedStyle, value: PropertyValue, inherited: &ComputedStyle) {
    match value {
        PropertyValue::Display(display) => style.display = display,
        PropertyValue::Visibility(visibility) => style.visibility = visibility,
        PropertyValue::Keyword(Property::Display, Keyword::Inherit) => {
            style.display = inherited.display;
        }
        PropertyValue::Keyword(Property::Display, Keyword::Initial | Keyword::Unset) => {
            style.display = Display::default();
        }
        PropertyValue::Keyword(Property::Visibility, Keyword::Inherit | Keyword::Unset) => {
            style.visibility = inherited.visibility;
        }
        PropertyValue::Keyword(Property::Visibility, Keyword::Initial) => {
            style.visibility = Visibility::default();
        }
    }
}
