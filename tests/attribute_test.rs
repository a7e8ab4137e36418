//! Typed ARIA attribute reading against parsed HTML.

use axquery::{AttrValue, Document, Element, get_attribute, get_role, matches};

fn attr(html: &str, id: &str, key: &str) -> AttrValue {
    let doc = Document::parse(html);
    let el = doc.get_element_by_id(id).expect("element with id");
    get_attribute(&el, key)
}

// ============================================================================
// Declared types
// ============================================================================

#[test]
fn test_bool() {
    let html = r#"
        <button id="open" aria-expanded="true"></button>
        <button id="closed" aria-expanded="false"></button>
        <button id="odd" aria-expanded="yes"></button>
        <button id="absent"></button>
    "#;
    assert_eq!(attr(html, "open", "expanded"), AttrValue::Bool(true));
    assert_eq!(attr(html, "closed", "expanded"), AttrValue::Bool(false));
    assert_eq!(attr(html, "odd", "expanded"), AttrValue::Bool(false));
    assert_eq!(attr(html, "absent", "expanded"), AttrValue::Bool(false));
}

#[test]
fn test_tristate() {
    let html = r#"
        <div id="on" aria-checked="true"></div>
        <div id="off" aria-checked="false"></div>
        <div id="mixed" aria-checked="mixed"></div>
        <div id="other" aria-checked="TRUE"></div>
        <div id="absent"></div>
    "#;
    assert_eq!(attr(html, "on", "checked"), AttrValue::Bool(true));
    assert_eq!(attr(html, "off", "checked"), AttrValue::Bool(false));
    assert_eq!(attr(html, "mixed", "checked"), AttrValue::Mixed);
    assert_eq!(attr(html, "other", "checked"), AttrValue::Mixed);
    assert_eq!(attr(html, "absent", "checked"), AttrValue::Bool(false));
    assert_eq!(attr(html, "mixed", "checked").to_string(), "mixed");
}

#[test]
fn test_bool_undefined() {
    let html = r#"
        <div id="grab" aria-grabbed="true"></div>
        <div id="junk" aria-grabbed="maybe"></div>
        <div id="absent"></div>
    "#;
    assert_eq!(attr(html, "grab", "grabbed"), AttrValue::Bool(true));
    assert_eq!(attr(html, "junk", "grabbed"), AttrValue::Undefined);
    assert_eq!(attr(html, "absent", "grabbed"), AttrValue::Undefined);
}

#[test]
fn test_id_list_and_token_list() {
    let html = r#"<div id="x" aria-labelledby="a b  c" aria-relevant=" additions text "></div>"#;
    assert_eq!(
        attr(html, "x", "labelledby"),
        AttrValue::List(vec!["a".into(), "b".into(), "c".into()])
    );
    assert_eq!(
        attr(html, "x", "relevant"),
        AttrValue::List(vec!["additions".into(), "text".into()])
    );
}

#[test]
fn test_integer_and_number() {
    let html = r#"
        <div id="a" aria-posinset="3rd" aria-valuenow="2.50kg"></div>
        <div id="b" aria-posinset="x" aria-valuenow="abc"></div>
        <div id="c" aria-setsize="  -4" aria-valuemax="1e3"></div>
    "#;
    assert_eq!(attr(html, "a", "posinset"), AttrValue::Integer(3));
    assert_eq!(attr(html, "a", "valuenow"), AttrValue::Number(2.5));
    assert!(matches!(attr(html, "b", "posinset"), AttrValue::Number(n) if n.is_nan()));
    assert!(matches!(attr(html, "b", "valuenow"), AttrValue::Number(n) if n.is_nan()));
    assert_eq!(attr(html, "c", "setsize"), AttrValue::Integer(-4));
    assert_eq!(attr(html, "c", "valuemax"), AttrValue::Number(1000.0));
    assert_eq!(attr(html, "c", "valuemax").to_string(), "1000");
}

#[test]
fn test_untyped_keys_return_raw_string() {
    let html = r#"<div id="x" aria-label="Close" aria-custom="anything"></div>"#;
    assert_eq!(attr(html, "x", "label"), AttrValue::String("Close".into()));
    assert_eq!(attr(html, "x", "custom"), AttrValue::String("anything".into()));
    assert_eq!(attr(html, "x", "missing"), AttrValue::Undefined);
}

#[test]
fn test_empty_attribute_counts_as_absent() {
    let html = r#"<h3 id="x" aria-level="">Title</h3>"#;
    assert_eq!(attr(html, "x", "level"), AttrValue::Integer(3));
}

// ============================================================================
// Native fallbacks
// ============================================================================

#[test]
fn test_heading_level() {
    let html = "<h1 id=a>A</h1><h6 id=b>B</h6><p id=c>C</p>";
    assert_eq!(attr(html, "a", "level"), AttrValue::Integer(1));
    assert_eq!(attr(html, "b", "level"), AttrValue::Integer(6));
    assert_eq!(attr(html, "c", "level"), AttrValue::Undefined);
}

#[test]
fn test_form_properties() {
    let html = r#"
        <input id="name" disabled required readonly placeholder="Your name">
        <textarea id="bio"></textarea>
        <div id="plain"></div>
    "#;
    assert_eq!(attr(html, "name", "disabled"), AttrValue::Bool(true));
    assert_eq!(attr(html, "name", "required"), AttrValue::Bool(true));
    assert_eq!(attr(html, "name", "readonly"), AttrValue::Bool(true));
    assert_eq!(
        attr(html, "name", "placeholder"),
        AttrValue::String("Your name".into())
    );

    assert_eq!(attr(html, "bio", "disabled"), AttrValue::Bool(false));
    assert_eq!(attr(html, "bio", "placeholder"), AttrValue::String(String::new()));

    // no native property: bool types degrade to false, others to undefined
    assert_eq!(attr(html, "plain", "disabled"), AttrValue::Bool(false));
    assert_eq!(attr(html, "plain", "placeholder"), AttrValue::Undefined);
}

#[test]
fn test_explicit_attribute_beats_native_property() {
    let html = r#"<button id="x" disabled aria-disabled="false">Go</button>"#;
    assert_eq!(attr(html, "x", "disabled"), AttrValue::Bool(false));
}

#[test]
fn test_hidden_fallback() {
    let html = r#"
        <style>.ghost { visibility: hidden }</style>
        <p id="flag" hidden>a</p>
        <p id="none" style="display:none">b</p>
        <p id="ghost" class="ghost">c</p>
        <p id="shown">d</p>
    "#;
    assert_eq!(attr(html, "flag", "hidden"), AttrValue::Bool(true));
    assert_eq!(attr(html, "none", "hidden"), AttrValue::Bool(true));
    assert_eq!(attr(html, "ghost", "hidden"), AttrValue::Bool(true));
    assert_eq!(attr(html, "shown", "hidden"), AttrValue::Bool(false));
}

#[test]
fn test_invalid_falls_back_to_check_validity() {
    let html = r#"
        <input id="missing" required>
        <input id="filled" required value="x">
        <input id="email" type="email" value="not-an-address">
        <input id="url" type="url" value="http://[::1">
        <div id="plain"></div>
        <input id="declared" aria-invalid="spelling">
    "#;
    // the native result is passed through unchanged: true means valid
    assert_eq!(attr(html, "missing", "invalid"), AttrValue::Bool(false));
    assert_eq!(attr(html, "filled", "invalid"), AttrValue::Bool(true));
    assert_eq!(attr(html, "email", "invalid"), AttrValue::Bool(false));
    assert_eq!(attr(html, "url", "invalid"), AttrValue::Bool(false));
    assert_eq!(attr(html, "plain", "invalid"), AttrValue::Undefined);
    assert_eq!(
        attr(html, "declared", "invalid"),
        AttrValue::String("spelling".into())
    );
}

#[test]
fn test_number_string_forms_in_equality() {
    let doc = Document::parse(
        r#"<div id="tiny" aria-valuenow="1e-7"></div><div id="huge" aria-valuenow="1e21"></div>"#,
    );
    let tiny = doc.get_element_by_id("tiny").unwrap();
    let huge = doc.get_element_by_id("huge").unwrap();
    assert!(matches(&tiny, r#"[valuenow="1e-7"]"#).unwrap());
    assert!(!matches(&tiny, r#"[valuenow="0.0000001"]"#).unwrap());
    assert!(matches(&huge, r#"[valuenow="1e+21"]"#).unwrap());
    assert_eq!(get_attribute(&huge, "valuenow").to_string(), "1e+21");
}

// ============================================================================
// Element trait on the bundled DOM
// ============================================================================

#[test]
fn test_element_trait_surface() {
    let doc = Document::parse(r#"<section id="s" aria-label="News"><h2>Today</h2></section>"#);
    let section = doc.get_element_by_id("s").unwrap();

    assert_eq!(Element::tag_name(&section), "section");
    assert!(section.has_attribute("aria-label"));
    assert!(section.matches_css("body > section[aria-label]").unwrap());
    assert!(section.matches_css("section >").is_err());
    assert_eq!(get_role(&section).unwrap().as_deref(), Some("region"));
}
