//! Typed `aria-*` attribute values.

use std::fmt;

use super::tables::Tables;
use crate::element::{Display, Element, Visibility};

/// Declared type of an ARIA attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AttrType {
    Bool,
    Tristate,
    BoolUndefined,
    IdList,
    Integer,
    Number,
    TokenList,
    /// Untyped; the raw string is returned.
    String,
}

/// Value of an ARIA attribute after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Undefined,
    Bool(bool),
    /// The third state of a tristate attribute.
    Mixed,
    Integer(i64),
    /// May be NaN when the attribute text is not numeric.
    Number(f64),
    List(Vec<String>),
    String(String),
}

#[cfg(feature = "serde")]
impl serde::Serialize for AttrValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Mixed => serializer.serialize_str("mixed"),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Number(x) => serializer.serialize_f64(*x),
            Self::List(items) => serde::Serialize::serialize(items, serializer),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

impl AttrValue {
    /// JavaScript-style truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined => false,
            Self::Bool(b) => *b,
            Self::Mixed => true,
            Self::Integer(n) => *n != 0,
            Self::Number(x) => *x != 0.0 && !x.is_nan(),
            Self::List(_) => true,
            Self::String(s) => !s.is_empty(),
        }
    }

    /// String form used by equality selectors. `Undefined` has none.
    pub fn to_js_string(&self) -> Option<String> {
        match self {
            Self::Undefined => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Mixed => Some("mixed".to_string()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Number(x) => Some(format_number(*x)),
            Self::List(items) => Some(items.join(",")),
            Self::String(s) => Some(s.clone()),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_js_string() {
            Some(s) => f.write_str(&s),
            None => f.write_str("undefined"),
        }
    }
}

/// Read `aria-{key}` from `el`, coerced per the declared type, with native
/// property fallbacks when the attribute is absent or empty.
pub fn read_attribute<E: Element>(tables: &Tables, el: &E, key: &str) -> AttrValue {
    let ty = tables.attribute_type(key);
    let name = format!("aria-{key}");

    if let Some(raw) = el.attribute(&name).filter(|raw| !raw.is_empty()) {
        return coerce(ty, raw);
    }

    if let Some(value) = native_fallback(el, key) {
        return value;
    }

    match ty {
        AttrType::Bool | AttrType::Tristate => AttrValue::Bool(false),
        _ => AttrValue::Undefined,
    }
}

fn coerce(ty: AttrType, raw: &str) -> AttrValue {
    match ty {
        AttrType::Bool => AttrValue::Bool(raw == "true"),
        AttrType::Tristate => match raw {
            "true" => AttrValue::Bool(true),
            "false" => AttrValue::Bool(false),
            _ => AttrValue::Mixed,
        },
        AttrType::BoolUndefined => match raw {
            "true" => AttrValue::Bool(true),
            "false" => AttrValue::Bool(false),
            _ => AttrValue::Undefined,
        },
        AttrType::IdList | AttrType::TokenList => {
            AttrValue::List(raw.split_whitespace().map(str::to_string).collect())
        }
        AttrType::Integer => parse_int(raw),
        AttrType::Number => AttrValue::Number(parse_float(raw)),
        AttrType::String => AttrValue::String(raw.to_string()),
    }
}

fn native_fallback<E: Element>(el: &E, key: &str) -> Option<AttrValue> {
    match key {
        "level" => heading_level(el.tag_name()).map(AttrValue::Integer),
        "disabled" => el.disabled().map(AttrValue::Bool),
        "placeholder" => el.placeholder().map(AttrValue::String),
        "required" => el.required().map(AttrValue::Bool),
        "readonly" => el.read_only().map(AttrValue::Bool),
        "hidden" => {
            let style = el.computed_style();
            Some(AttrValue::Bool(
                el.hidden()
                    || style.display == Display::None
                    || style.visibility == Visibility::Hidden,
            ))
        }
        "invalid" => el.check_validity().map(AttrValue::Bool),
        _ => None,
    }
}

fn heading_level(tag: &str) -> Option<i64> {
    let digit = tag.strip_prefix(['h', 'H'])?;
    match digit {
        "1" | "2" | "3" | "4" | "5" | "6" => digit.parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Numeric coercion
// ============================================================================

// Whitespace skipped before a number, as in ECMAScript StrWhiteSpaceChar.
fn trim_js_start(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Integer coercion in the manner of `parseInt(raw)`.
fn parse_int(raw: &str) -> AttrValue {
    let s = trim_js_start(raw);
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, s) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let end = s
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(s.len());
    let digits = &s[..end];
    if digits.is_empty() {
        return AttrValue::Number(f64::NAN);
    }

    match i64::from_str_radix(digits, radix) {
        Ok(n) => AttrValue::Integer(if negative { -n } else { n }),
        Err(_) => {
            // Out of i64 range: keep the magnitude as a float.
            let magnitude = digits.chars().fold(0.0_f64, |acc, c| {
                acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
            });
            AttrValue::Number(if negative { -magnitude } else { magnitude })
        }
    }
}

/// Number coercion in the manner of `parseFloat(raw)`.
fn parse_float(raw: &str) -> f64 {
    let s = trim_js_start(raw);
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut has_digits = i > int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start || has_digits {
            has_digits |= j > frac_start;
            i = j;
        }
    }
    if !has_digits {
        return f64::NAN;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse().unwrap_or(f64::NAN)
}

/// `x` as JavaScript's `Number.prototype.toString` prints it.
fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }

    // Shortest round-trip digits and decimal exponent, e.g. "1.5e-10".
    let sci = format!("{:e}", x.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let n = exp.parse::<i32>().unwrap_or(0) + 1;

    let mut out = String::new();
    if x < 0.0 {
        out.push('-');
    }
    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', (n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-n) as usize));
        out.push_str(&digits);
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let e = n - 1;
        out.push('e');
        out.push(if e < 0 { '-' } else { '+' });
        out.push_str(&e.abs().to_string());
    }
    out
}
