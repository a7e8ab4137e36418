//! Reflected form properties and constraint validation.
//!
//! The document is static, so every control is validated against the
//! state its markup describes: the `value` attribute of an `<input>`, the
//! text of a `<textarea>`, and the `selected` options of a `<select>`.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::Document;
use super::arena::NodeId;

/// The HTML "valid email address" production.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

/// Elements with a reflected `disabled` property.
const DISABLEABLE: &[&str] = &[
    "button", "fieldset", "input", "optgroup", "option", "select", "textarea",
];

/// Elements with a validity API.
const VALIDATABLE: &[&str] = &[
    "button", "fieldset", "form", "input", "output", "select", "textarea",
];

/// Input types `required` does not apply to.
const REQUIRED_EXEMPT: &[&str] = &["button", "color", "hidden", "image", "range", "reset", "submit"];

/// Input types `readonly` applies to.
const READONLY_TYPES: &[&str] = &[
    "date", "datetime-local", "email", "month", "number", "password", "search", "tel", "text",
    "time", "url", "week",
];

/// Input types whose value can violate `minlength`, `maxlength` and `pattern`.
const TEXT_TYPES: &[&str] = &["email", "password", "search", "tel", "text", "url"];

impl Document {
    fn tag_in(&self, id: NodeId, tags: &[&str]) -> bool {
        self.dom()
            .element_name(id)
            .is_some_and(|name| tags.contains(&name.as_ref()))
    }

    fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.dom().attr(id, name).is_some()
    }

    /// `type` of an `<input>`, lowercased; unknown or missing types are
    /// `text`.
    pub(crate) fn input_type(&self, id: NodeId) -> String {
        let ty = self
            .dom()
            .attr(id, "type")
            .map(|t| t.trim().to_ascii_lowercase())
            .unwrap_or_default();
        match ty.as_str() {
            "button" | "checkbox" | "color" | "date" | "datetime-local" | "email" | "file"
            | "hidden" | "image" | "month" | "number" | "password" | "radio" | "range"
            | "reset" | "search" | "submit" | "tel" | "time" | "url" | "week" => ty,
            _ => "text".to_string(),
        }
    }

    pub(crate) fn supports_disabled(&self, id: NodeId) -> bool {
        self.tag_in(id, DISABLEABLE)
    }

    /// Reflected `disabled` property.
    pub(crate) fn disabled_property(&self, id: NodeId) -> Option<bool> {
        self.supports_disabled(id).then(|| self.has_attr(id, "disabled"))
    }

    /// Actual disabled state, inherited from a disabled `<fieldset>` or
    /// `<optgroup>`.
    pub(crate) fn is_disabled(&self, id: NodeId) -> bool {
        if !self.supports_disabled(id) {
            return false;
        }
        if self.has_attr(id, "disabled") {
            return true;
        }

        let dom = self.dom();
        if dom.is_tag(id, "option") {
            return dom
                .parent(id)
                .is_some_and(|p| dom.is_tag(p, "optgroup") && self.has_attr(p, "disabled"));
        }
        if dom.is_tag(id, "optgroup") {
            return false;
        }

        let mut child = id;
        for ancestor in dom.ancestors(id) {
            if dom.is_tag(ancestor, "fieldset") && self.has_attr(ancestor, "disabled") {
                let first_legend = dom.children(ancestor).find(|&c| dom.is_tag(c, "legend"));
                if first_legend != Some(child) {
                    return true;
                }
            }
            child = ancestor;
        }
        false
    }

    pub(crate) fn placeholder(&self, id: NodeId) -> Option<String> {
        self.tag_in(id, &["input", "textarea"])
            .then(|| self.dom().attr(id, "placeholder").unwrap_or_default().to_string())
    }

    pub(crate) fn required(&self, id: NodeId) -> Option<bool> {
        self.tag_in(id, &["input", "select", "textarea"])
            .then(|| self.has_attr(id, "required"))
    }

    pub(crate) fn read_only(&self, id: NodeId) -> Option<bool> {
        self.tag_in(id, &["input", "textarea"])
            .then(|| self.has_attr(id, "readonly"))
    }

    /// Checkedness of a checkbox, radio button or option.
    pub(crate) fn is_checked(&self, id: NodeId) -> bool {
        let dom = self.dom();
        if dom.is_tag(id, "input") {
            matches!(self.input_type(id).as_str(), "checkbox" | "radio") && self.has_attr(id, "checked")
        } else if dom.is_tag(id, "option") {
            self.is_selected(id)
        } else {
            false
        }
    }

    /// Result of `checkValidity()`, or `None` for elements without a
    /// validity API.
    pub(crate) fn check_validity(&self, id: NodeId) -> Option<bool> {
        if !self.tag_in(id, VALIDATABLE) {
            return None;
        }
        let dom = self.dom();
        let valid = if dom.is_tag(id, "fieldset") || dom.is_tag(id, "form") {
            dom.descendants(id)
                .filter(|&d| self.tag_in(d, &["input", "select", "textarea"]))
                .all(|d| self.control_is_valid(d))
        } else {
            self.control_is_valid(id)
        };
        Some(valid)
    }

    fn control_is_valid(&self, id: NodeId) -> bool {
        if self.barred_from_validation(id) {
            return true;
        }
        let dom = self.dom();
        if dom.is_tag(id, "input") {
            self.input_is_valid(id)
        } else if dom.is_tag(id, "textarea") {
            let value = dom.text_content(id);
            !(self.has_attr(id, "required") && value.is_empty()) && self.length_ok(id, &value)
        } else if dom.is_tag(id, "select") {
            !(self.has_attr(id, "required") && self.select_value_missing(id))
        } else {
            true
        }
    }

    fn barred_from_validation(&self, id: NodeId) -> bool {
        let dom = self.dom();
        if self.is_disabled(id) || dom.is_tag(id, "output") {
            return true;
        }
        if dom.is_tag(id, "button") {
            let ty = dom.attr(id, "type").map(str::to_ascii_lowercase);
            return matches!(ty.as_deref(), Some("button" | "reset"));
        }
        if dom.is_tag(id, "textarea") {
            return self.has_attr(id, "readonly");
        }
        if dom.is_tag(id, "input") {
            let ty = self.input_type(id);
            return matches!(ty.as_str(), "hidden" | "reset" | "button")
                || (self.has_attr(id, "readonly") && READONLY_TYPES.contains(&ty.as_str()));
        }
        false
    }

    fn input_is_valid(&self, id: NodeId) -> bool {
        let ty = self.input_type(id);
        let value = self.dom().attr(id, "value").unwrap_or_default();
        let required = self.has_attr(id, "required") && !REQUIRED_EXEMPT.contains(&ty.as_str());

        match ty.as_str() {
            "checkbox" => !(required && !self.has_attr(id, "checked")),
            "radio" => !(self.radio_group_required(id) && !self.radio_group_checked(id)),
            "file" => !required,
            // range values are clamped into [min, max]
            "range" => true,
            "number" => {
                let number = parse_number(value);
                if number.is_none() {
                    return !required;
                }
                self.in_range(id, number)
            }
            "email" => {
                if value.is_empty() {
                    return !required;
                }
                let valid = if self.has_attr(id, "multiple") {
                    value
                        .split(',')
                        .map(str::trim)
                        .all(|v| is_valid_email(v) && self.pattern_ok(id, v))
                } else {
                    let v = value.trim();
                    is_valid_email(v) && self.pattern_ok(id, v)
                };
                valid && self.length_ok(id, value)
            }
            "url" => {
                if value.is_empty() {
                    return !required;
                }
                let v = value.trim();
                is_valid_url(v) && self.pattern_ok(id, v) && self.length_ok(id, value)
            }
            _ => {
                if value.is_empty() {
                    return !required;
                }
                !TEXT_TYPES.contains(&ty.as_str())
                    || (self.length_ok(id, value) && self.pattern_ok(id, value))
            }
        }
    }

    fn in_range(&self, id: NodeId, number: Option<f64>) -> bool {
        let Some(number) = number else {
            return true;
        };
        let min = self.dom().attr(id, "min").and_then(parse_number);
        let max = self.dom().attr(id, "max").and_then(parse_number);
        !min.is_some_and(|min| number < min) && !max.is_some_and(|max| number > max)
    }

    fn length_ok(&self, id: NodeId, value: &str) -> bool {
        if value.is_empty() {
            return true;
        }
        let len = value.encode_utf16().count();
        let limit = |name| {
            self.dom()
                .attr(id, name)
                .and_then(|v| v.trim().parse::<usize>().ok())
        };
        !limit("minlength").is_some_and(|min| len < min)
            && !limit("maxlength").is_some_and(|max| len > max)
    }

    /// `value` must match the whole `pattern` attribute. A pattern that does
    /// not compile imposes no constraint.
    fn pattern_ok(&self, id: NodeId, value: &str) -> bool {
        let Some(pattern) = self.dom().attr(id, "pattern") else {
            return true;
        };
        match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(re) => re.is_match(value),
            Err(error) => {
                tracing::debug!(pattern, %error, "ignoring invalid pattern");
                true
            }
        }
    }

    /// Nearest `<form>` ancestor, or the document.
    fn form_owner(&self, id: NodeId) -> NodeId {
        let dom = self.dom();
        dom.ancestors(id)
            .find(|&a| dom.is_tag(a, "form"))
            .unwrap_or_else(|| dom.document())
    }

    /// Radio buttons sharing the `name` and form owner of `id`.
    fn radio_group(&self, id: NodeId) -> Vec<NodeId> {
        let dom = self.dom();
        let Some(name) = dom.attr(id, "name").filter(|n| !n.is_empty()) else {
            return vec![id];
        };
        let owner = self.form_owner(id);
        dom.descendants(owner)
            .filter(|&other| {
                dom.is_tag(other, "input")
                    && self.input_type(other) == "radio"
                    && dom.attr(other, "name") == Some(name)
                    && self.form_owner(other) == owner
            })
            .collect()
    }

    fn radio_group_required(&self, id: NodeId) -> bool {
        self.radio_group(id)
            .into_iter()
            .any(|r| self.has_attr(r, "required"))
    }

    fn radio_group_checked(&self, id: NodeId) -> bool {
        self.radio_group(id)
            .into_iter()
            .any(|r| self.has_attr(r, "checked"))
    }

    fn options(&self, select: NodeId) -> Vec<NodeId> {
        let dom = self.dom();
        dom.descendants(select)
            .filter(|&d| dom.is_tag(d, "option"))
            .collect()
    }

    fn is_single_select(&self, select: NodeId) -> bool {
        !self.has_attr(select, "multiple")
    }

    fn display_size(&self, select: NodeId) -> usize {
        self.dom()
            .attr(select, "size")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|&s| s > 0)
            .unwrap_or(if self.is_single_select(select) { 1 } else { 4 })
    }

    /// Selectedness of an option, including the implicit selection of a
    /// single-select drop-down.
    fn is_selected(&self, option: NodeId) -> bool {
        let dom = self.dom();
        let Some(select) = dom.ancestors(option).find(|&a| dom.is_tag(a, "select")) else {
            return self.has_attr(option, "selected");
        };
        self.selected_options(select).contains(&option)
    }

    fn selected_options(&self, select: NodeId) -> Vec<NodeId> {
        let options = self.options(select);
        let explicit: Vec<_> = options
            .iter()
            .copied()
            .filter(|&o| self.has_attr(o, "selected"))
            .collect();

        if !self.is_single_select(select) {
            return explicit;
        }
        if let Some(&last) = explicit.last() {
            return vec![last];
        }
        if self.display_size(select) == 1 {
            return options
                .into_iter()
                .find(|&o| !self.is_disabled(o))
                .into_iter()
                .collect();
        }
        Vec::new()
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.dom().attr(option, "value") {
            Some(value) => value.to_string(),
            None => self
                .dom()
                .text_content(option)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// A required select is missing its value when nothing is selected, or
    /// when only the placeholder label option is.
    fn select_value_missing(&self, select: NodeId) -> bool {
        let selected = self.selected_options(select);
        if selected.is_empty() {
            return true;
        }
        if !self.is_single_select(select) || self.display_size(select) != 1 {
            return false;
        }
        let dom = self.dom();
        let placeholder = self.options(select).first().copied().filter(|&first| {
            dom.parent(first) == Some(select) && self.option_value(first).is_empty()
        });
        placeholder.is_some() && selected == placeholder.into_iter().collect::<Vec<_>>()
    }
}

/// Parse a floating-point number the way HTML number inputs do.
fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() || value.starts_with('+') || value.ends_with('.') {
        return None;
    }
    if !value
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'.' | b'e' | b'E' | b'+'))
    {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}
