//! Static ARIA lookup tables.
//!
//! Three tables drive role resolution and attribute coercion:
//!
//! - the role hierarchy (parent role → direct child roles),
//! - the extra-selector table (role → CSS selectors that imply the role when
//!   no `role` attribute is present), checked in definition order,
//! - the attribute-type table (`aria-*` key → [`AttrType`]).
//!
//! The built-in tables follow the WAI-ARIA 1.1 taxonomy and the HTML-AAM
//! implicit role mappings. They are built once per process and shared by
//! reference; custom tables go through [`TablesBuilder`], which rejects a
//! cyclic hierarchy.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::attribute::AttrType;
use crate::error::Result;

// ============================================================================
// Built-in data
// ============================================================================

const SUB_ROLES: &[(&str, &[&str])] = &[
    ("roletype", &["structure", "widget", "window"]),
    (
        "structure",
        &[
            "application",
            "document",
            "presentation",
            "rowgroup",
            "section",
            "sectionhead",
            "separator",
        ],
    ),
    (
        "widget",
        &[
            "command",
            "composite",
            "gridcell",
            "input",
            "range",
            "row",
            "scrollbar",
            "separator",
            "tab",
        ],
    ),
    ("window", &["dialog"]),
    ("command", &["button", "link", "menuitem"]),
    ("composite", &["grid", "select", "spinbutton", "tablist"]),
    (
        "input",
        &["checkbox", "option", "radio", "slider", "spinbutton", "textbox"],
    ),
    ("range", &["progressbar", "scrollbar", "slider", "spinbutton"]),
    (
        "section",
        &[
            "alert",
            "cell",
            "definition",
            "figure",
            "group",
            "img",
            "landmark",
            "list",
            "listitem",
            "log",
            "marquee",
            "math",
            "note",
            "status",
            "table",
            "tabpanel",
            "term",
            "tooltip",
        ],
    ),
    ("sectionhead", &["columnheader", "heading", "rowheader", "tab"]),
    ("select", &["combobox", "listbox", "menu", "radiogroup", "tree"]),
    (
        "landmark",
        &[
            "banner",
            "complementary",
            "contentinfo",
            "form",
            "main",
            "navigation",
            "region",
            "search",
        ],
    ),
    ("document", &["article"]),
    ("alert", &["alertdialog"]),
    ("dialog", &["alertdialog"]),
    ("cell", &["columnheader", "gridcell", "rowheader"]),
    ("gridcell", &["columnheader", "rowheader"]),
    ("checkbox", &["menuitemcheckbox", "switch"]),
    ("menuitem", &["menuitemcheckbox"]),
    ("menuitemcheckbox", &["menuitemradio"]),
    ("radio", &["menuitemradio"]),
    ("option", &["treeitem"]),
    ("listitem", &["treeitem"]),
    ("group", &["row", "select", "toolbar"]),
    ("list", &["directory", "feed"]),
    ("table", &["grid"]),
    ("grid", &["treegrid"]),
    ("tree", &["treegrid"]),
    ("menu", &["menubar"]),
    ("status", &["timer"]),
    ("textbox", &["searchbox"]),
];

// More specific entries come first: the first matching role wins.
const EXTRA_SELECTORS: &[(&str, &[&str])] = &[
    ("link", &["a[href]", "area[href]"]),
    (
        "button",
        &[
            "button",
            "input[type=\"button\"]",
            "input[type=\"image\"]",
            "input[type=\"reset\"]",
            "input[type=\"submit\"]",
            "summary",
        ],
    ),
    ("checkbox", &["input[type=\"checkbox\"]"]),
    ("radio", &["input[type=\"radio\"]"]),
    ("slider", &["input[type=\"range\"]"]),
    ("spinbutton", &["input[type=\"number\"]"]),
    ("combobox", &["input[list]", "select:not([multiple]):not([size])"]),
    ("listbox", &["datalist", "select"]),
    ("searchbox", &["input[type=\"search\"]"]),
    (
        "textbox",
        &[
            "input:not([type])",
            "input[type=\"text\"]",
            "input[type=\"email\"]",
            "input[type=\"tel\"]",
            "input[type=\"url\"]",
            "textarea",
        ],
    ),
    ("option", &["option"]),
    ("group", &["details", "fieldset", "optgroup"]),
    ("progressbar", &["progress"]),
    ("status", &["output"]),
    ("heading", &["h1", "h2", "h3", "h4", "h5", "h6"]),
    ("img", &["img:not([alt=\"\"])"]),
    ("presentation", &["img[alt=\"\"]"]),
    ("figure", &["figure"]),
    ("list", &["ol", "ul", "menu"]),
    ("listitem", &["ol > li", "ul > li", "menu > li"]),
    ("term", &["dfn", "dt"]),
    ("definition", &["dd"]),
    ("table", &["table"]),
    ("rowgroup", &["thead", "tbody", "tfoot"]),
    ("row", &["tr"]),
    ("rowheader", &["th[scope=\"row\"]", "th[scope=\"rowgroup\"]"]),
    ("columnheader", &["th"]),
    ("cell", &["td"]),
    ("article", &["article"]),
    ("complementary", &["aside"]),
    ("navigation", &["nav"]),
    ("main", &["main"]),
    ("form", &["form"]),
    ("region", &["section[aria-label]", "section[aria-labelledby]"]),
    ("dialog", &["dialog"]),
    ("separator", &["hr"]),
    ("math", &["math"]),
];

const ATTRIBUTES: &[(&str, AttrType)] = &[
    ("activedescendant", AttrType::String),
    ("atomic", AttrType::Bool),
    ("autocomplete", AttrType::String),
    ("busy", AttrType::Bool),
    ("checked", AttrType::Tristate),
    ("colcount", AttrType::Integer),
    ("colindex", AttrType::Integer),
    ("colspan", AttrType::Integer),
    ("controls", AttrType::IdList),
    ("current", AttrType::String),
    ("describedby", AttrType::IdList),
    ("details", AttrType::String),
    ("disabled", AttrType::Bool),
    ("dropeffect", AttrType::TokenList),
    ("errormessage", AttrType::String),
    ("expanded", AttrType::Bool),
    ("flowto", AttrType::IdList),
    ("grabbed", AttrType::BoolUndefined),
    ("haspopup", AttrType::String),
    ("hidden", AttrType::BoolUndefined),
    ("invalid", AttrType::String),
    ("keyshortcuts", AttrType::String),
    ("label", AttrType::String),
    ("labelledby", AttrType::IdList),
    ("level", AttrType::Integer),
    ("live", AttrType::String),
    ("modal", AttrType::Bool),
    ("multiline", AttrType::Bool),
    ("multiselectable", AttrType::Bool),
    ("orientation", AttrType::String),
    ("owns", AttrType::IdList),
    ("placeholder", AttrType::String),
    ("posinset", AttrType::Integer),
    ("pressed", AttrType::Tristate),
    ("readonly", AttrType::Bool),
    ("relevant", AttrType::TokenList),
    ("required", AttrType::Bool),
    ("roledescription", AttrType::String),
    ("rowcount", AttrType::Integer),
    ("rowindex", AttrType::Integer),
    ("rowspan", AttrType::Integer),
    ("selected", AttrType::BoolUndefined),
    ("setsize", AttrType::Integer),
    ("sort", AttrType::String),
    ("valuemax", AttrType::Number),
    ("valuemin", AttrType::Number),
    ("valuenow", AttrType::Number),
    ("valuetext", AttrType::String),
];

// ============================================================================
// Tables
// ============================================================================

/// Selectors implying a role, with the comma-joined list pre-built.
#[derive(Debug, Clone)]
struct ExtraSelectors {
    role: String,
    selectors: Vec<String>,
    joined: String,
}

impl ExtraSelectors {
    fn new(role: String, selectors: Vec<String>) -> Self {
        let joined = selectors.join(",");
        Self {
            role,
            selectors,
            joined,
        }
    }
}

/// Immutable ARIA configuration shared by the resolver and the matcher.
#[derive(Debug, Clone)]
pub struct Tables {
    pub(super) hierarchy: HashMap<String, Vec<String>>,
    extra_selectors: Vec<ExtraSelectors>,
    attributes: HashMap<String, AttrType>,
}

static BUILTIN: LazyLock<Tables> = LazyLock::new(Tables::build_builtin);

impl Tables {
    /// The built-in WAI-ARIA tables (built on first use).
    pub fn builtin() -> &'static Tables {
        &BUILTIN
    }

    /// Start building custom tables from scratch.
    pub fn builder() -> TablesBuilder {
        TablesBuilder::default()
    }

    fn build_builtin() -> Self {
        let hierarchy = SUB_ROLES
            .iter()
            .map(|(parent, children)| {
                (
                    parent.to_string(),
                    children.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect();

        let extra_selectors = EXTRA_SELECTORS
            .iter()
            .map(|(role, selectors)| {
                ExtraSelectors::new(
                    role.to_string(),
                    selectors.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();

        let attributes = ATTRIBUTES
            .iter()
            .map(|(key, ty)| (key.to_string(), *ty))
            .collect();

        Self {
            hierarchy,
            extra_selectors,
            attributes,
        }
    }

    /// Direct child roles of `role` in the hierarchy.
    pub fn children(&self, role: &str) -> &[String] {
        self.hierarchy.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Roles implied by selectors, in match priority order, each with its
    /// comma-joined selector list.
    pub fn extra_selectors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extra_selectors
            .iter()
            .map(|e| (e.role.as_str(), e.joined.as_str()))
    }

    /// Declared type of the `aria-{key}` attribute. Unlisted keys are untyped.
    pub fn attribute_type(&self, key: &str) -> AttrType {
        self.attributes
            .get(key)
            .copied()
            .unwrap_or(AttrType::String)
    }

    /// Parse tables from a JSON configuration document.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TablesConfig = serde_json::from_str(json)?;
        config.into_tables()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for custom [`Tables`].
#[derive(Debug, Clone, Default)]
pub struct TablesBuilder {
    hierarchy: HashMap<String, Vec<String>>,
    extra_selectors: Vec<ExtraSelectors>,
    attributes: HashMap<String, AttrType>,
}

impl TablesBuilder {
    /// Start from a copy of the built-in tables.
    pub fn from_builtin() -> Self {
        let builtin = Tables::builtin();
        Self {
            hierarchy: builtin.hierarchy.clone(),
            extra_selectors: builtin.extra_selectors.clone(),
            attributes: builtin.attributes.clone(),
        }
    }

    /// Set the direct child roles of `parent`, replacing any previous entry.
    pub fn sub_roles<I, S>(mut self, parent: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hierarchy.insert(
            parent.into(),
            children.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Set the selectors implying `role`.
    ///
    /// An existing entry for the role keeps its priority position; a new
    /// role is checked after all existing ones.
    pub fn extra_selectors<I, S>(mut self, role: impl Into<String>, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let role = role.into();
        let entry = ExtraSelectors::new(
            role.clone(),
            selectors.into_iter().map(Into::into).collect(),
        );
        match self.extra_selectors.iter_mut().find(|e| e.role == role) {
            Some(existing) => *existing = entry,
            None => self.extra_selectors.push(entry),
        }
        self
    }

    /// Declare the type of the `aria-{key}` attribute.
    pub fn attribute(mut self, key: impl Into<String>, ty: AttrType) -> Self {
        self.attributes.insert(key.into(), ty);
        self
    }

    /// Validate and build the tables.
    pub fn build(self) -> Result<Tables> {
        let tables = Tables {
            hierarchy: self.hierarchy,
            extra_selectors: self
                .extra_selectors
                .into_iter()
                .filter(|e| !e.selectors.is_empty())
                .collect(),
            attributes: self.attributes,
        };
        tables.check_acyclic()?;
        tracing::debug!(
            hierarchy = tables.hierarchy.len(),
            selectors = tables.extra_selectors.len(),
            attributes = tables.attributes.len(),
            "built ARIA tables"
        );
        Ok(tables)
    }
}

// ============================================================================
// JSON configuration
// ============================================================================

/// JSON shape of a table configuration file.
///
/// ```json
/// {
///   "extend_builtin": true,
///   "sub_roles": { "button": ["togglebutton"] },
///   "extra_selectors": [{ "role": "togglebutton", "selectors": ["button[aria-pressed]"] }],
///   "attributes": { "pressed": "tristate" }
/// }
/// ```
#[cfg(feature = "serde")]
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TablesConfig {
    #[serde(default = "default_extend_builtin")]
    pub extend_builtin: bool,
    #[serde(default)]
    pub sub_roles: std::collections::BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub extra_selectors: Vec<ExtraSelectorsConfig>,
    #[serde(default)]
    pub attributes: std::collections::BTreeMap<String, AttrType>,
}

/// One entry of [`TablesConfig::extra_selectors`].
#[cfg(feature = "serde")]
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ExtraSelectorsConfig {
    pub role: String,
    pub selectors: Vec<String>,
}

#[cfg(feature = "serde")]
fn default_extend_builtin() -> bool {
    true
}

#[cfg(feature = "serde")]
impl TablesConfig {
    /// Build validated tables from this configuration.
    pub fn into_tables(self) -> Result<Tables> {
        let mut builder = if self.extend_builtin {
            TablesBuilder::from_builtin()
        } else {
            Tables::builder()
        };
        for (parent, children) in self.sub_roles {
            builder = builder.sub_roles(parent, children);
        }
        for entry in self.extra_selectors {
            builder = builder.extra_selectors(entry.role, entry.selectors);
        }
        for (key, ty) in self.attributes {
            builder = builder.attribute(key, ty);
        }
        builder.build()
    }
}
