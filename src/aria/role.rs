//! Effective role resolution.

use super::tables::Tables;
use crate::element::Element;
use crate::error::Result;

/// Ancestors that keep `header`/`footer` from being page landmarks.
const NOT_SCOPED: &str = "article *, aside *, main *, nav *, section *";

/// Resolve the effective role of `el`.
///
/// Priority: explicit `role` attribute (raw value), then the first
/// extra-selector entry the element matches, then the page-level
/// `header` → `banner` and `footer` → `contentinfo` landmarks.
pub fn resolve_role<E: Element>(tables: &Tables, el: &E) -> Result<Option<String>> {
    if let Some(role) = el.attribute("role") {
        tracing::trace!(tag = el.tag_name(), role, "explicit role");
        return Ok(Some(role.to_string()));
    }

    for (role, selectors) in tables.extra_selectors() {
        if el.matches_css(selectors)? {
            tracing::trace!(tag = el.tag_name(), role, "implicit role");
            return Ok(Some(role.to_string()));
        }
    }

    let landmark = match el.tag_name() {
        "header" => "banner",
        "footer" => "contentinfo",
        _ => return Ok(None),
    };
    if el.matches_css(NOT_SCOPED)? {
        return Ok(None);
    }
    tracing::trace!(tag = el.tag_name(), role = landmark, "landmark role");
    Ok(Some(landmark.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn role_of(html: &str, id: &str) -> Option<String> {
        let doc = Document::parse(html);
        let el = doc.get_element_by_id(id).expect("element with id");
        resolve_role(Tables::builtin(), &el).unwrap()
    }

    #[test]
    fn test_explicit_role_wins() {
        let html = r#"<a id="x" href="/" role="button">Go</a>"#;
        assert_eq!(role_of(html, "x").as_deref(), Some("button"));
    }

    #[test]
    fn test_explicit_role_is_raw() {
        let html = r#"<div id="x" role="button link">Go</div>"#;
        assert_eq!(role_of(html, "x").as_deref(), Some("button link"));
    }

    #[test]
    fn test_implicit_roles() {
        let html = r#"
            <a id="link" href="/">Home</a>
            <a id="anchor">No href</a>
            <input id="check" type="checkbox">
            <input id="text">
            <select id="combo"><option>A</option></select>
            <select id="list" multiple><option>A</option></select>
            <h3 id="heading">Title</h3>
            <img id="img" src="a.png" alt="A">
            <img id="decor" src="b.png" alt="">
            <ul><li id="item">One</li></ul>
        "#;
        assert_eq!(role_of(html, "link").as_deref(), Some("link"));
        assert_eq!(role_of(html, "anchor"), None);
        assert_eq!(role_of(html, "check").as_deref(), Some("checkbox"));
        assert_eq!(role_of(html, "text").as_deref(), Some("textbox"));
        assert_eq!(role_of(html, "combo").as_deref(), Some("combobox"));
        assert_eq!(role_of(html, "list").as_deref(), Some("listbox"));
        assert_eq!(role_of(html, "heading").as_deref(), Some("heading"));
        assert_eq!(role_of(html, "img").as_deref(), Some("img"));
        assert_eq!(role_of(html, "decor").as_deref(), Some("presentation"));
        assert_eq!(role_of(html, "item").as_deref(), Some("listitem"));
    }

    #[test]
    fn test_input_type_is_case_insensitive() {
        let html = r#"<input id="x" type="CHECKBOX">"#;
        assert_eq!(role_of(html, "x").as_deref(), Some("checkbox"));
    }

    #[test]
    fn test_top_level_header_is_banner() {
        let html = r#"<body><header id="h">Site</header><footer id="f">Fine print</footer></body>"#;
        assert_eq!(role_of(html, "h").as_deref(), Some("banner"));
        assert_eq!(role_of(html, "f").as_deref(), Some("contentinfo"));
    }

    #[test]
    fn test_scoped_header_has_no_role() {
        let html = r#"
            <main><header id="in-main">Intro</header></main>
            <article><div><footer id="in-article">Byline</footer></div></article>
        "#;
        assert_eq!(role_of(html, "in-main"), None);
        assert_eq!(role_of(html, "in-article"), None);
    }

    #[test]
    fn test_plain_div_has_no_role() {
        assert_eq!(role_of(r#"<div id="x">Text</div>"#, "x"), None);
    }
}
