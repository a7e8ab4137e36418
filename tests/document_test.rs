//! Document loading tests: files, encodings and the tree views.

use std::io::Write;

use axquery::{Document, Error, TreeNode, Walk, query_selector_all, walk};
use tempfile::NamedTempFile;

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file
}

#[test]
fn test_open_utf8_file() {
    let file = write_temp("<h1 id=\"t\">Crème brûlée</h1>".as_bytes());
    let doc = Document::open(file.path()).unwrap();
    assert_eq!(doc.get_element_by_id("t").unwrap().text(), "Crème brûlée");
}

#[test]
fn test_open_with_declared_charset() {
    let mut bytes = br#"<html><head><meta charset="windows-1251"></head><body><p id="p">"#.to_vec();
    // "Привет" in windows-1251
    bytes.extend_from_slice(&[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]);
    bytes.extend_from_slice(b"</p></body></html>");

    let file = write_temp(&bytes);
    let doc = Document::open(file.path()).unwrap();
    assert_eq!(doc.get_element_by_id("p").unwrap().text(), "Привет");
}

#[test]
fn test_utf8_bom_is_stripped() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"<p id=\"p\">ok</p>");
    let doc = Document::parse_bytes(&bytes);
    assert_eq!(doc.get_element_by_id("p").unwrap().text(), "ok");
}

#[test]
fn test_open_missing_file() {
    let err = Document::open("/nonexistent/axquery/page.html").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_queries_on_loaded_file() {
    let file = write_temp(
        br#"<form id="f"><label>Name <input id="name"></label><button>Send</button></form>"#,
    );
    let doc = Document::open(file.path()).unwrap();

    let textboxes = query_selector_all(doc.root(), "textbox").unwrap();
    assert_eq!(textboxes.len(), 1);
    assert_eq!(textboxes[0].element_id(), Some("name"));

    let forms = query_selector_all(doc.root(), "form").unwrap();
    assert_eq!(forms[0].element_id(), Some("f"));
}

#[test]
fn test_walk_visits_text_and_elements() {
    let doc = Document::parse("<p>one<b>two</b></p><p>three</p>");
    let mut elements = Vec::new();
    let mut nodes = 0;
    let _ = walk(doc.root(), |node| {
        nodes += 1;
        if let Some(el) = node.as_element() {
            elements.push(el.tag_name());
            if el.tag_name() == "head" {
                return Walk::SkipChildren;
            }
        }
        Walk::Continue
    });
    assert_eq!(elements, ["html", "head", "body", "p", "b", "p"]);
    // document + 6 elements + 3 text nodes
    assert_eq!(nodes, 10);
}

#[test]
fn test_walk_stops_early() {
    let doc = Document::parse("<p id=a></p><p id=b></p><p id=c></p>");
    let mut seen = Vec::new();
    let flow = walk(doc.root(), |node| match node.as_element() {
        Some(el) if el.element_id() == Some("b") => Walk::Stop,
        Some(el) => {
            seen.push(el.tag_name());
            Walk::Continue
        }
        None => Walk::Continue,
    });
    assert!(flow.is_break());
    assert_eq!(seen, ["html", "head", "body", "p"]);
}
