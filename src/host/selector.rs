//! A small CSS selector subset: comma-separated compound selectors built
//! from a tag, `#id`, `.class`, `[attr]`, `[attr="v"]` and `[attr*="v"]`.
//! Combinators are not supported.

use crate::foundation::error::{CountUpError, CountUpResult};

/// Read-only view of an element for selector matching.
pub trait Matchable {
    /// Element name.
    fn tag(&self) -> &str;
    /// Attribute value, if set.
    fn attr(&self, name: &str) -> Option<&str>;
    /// Whether the class list contains `class`.
    fn has_class(&self, class: &str) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

/// Parsed selector list; matches when any of its compounds matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> CountUpResult<Self> {
        let compounds = split_list(input)
            .into_iter()
            .map(|part| parse_compound(part.trim()))
            .collect::<CountUpResult<Vec<_>>>()?;
        if compounds.is_empty() {
            return Err(CountUpError::config("empty selector"));
        }
        Ok(Self { compounds })
    }

    /// Whether any compound of the list matches `el`.
    pub fn matches(&self, el: &impl Matchable) -> bool {
        self.compounds.iter().any(|c| c.matches(el))
    }
}

impl Compound {
    fn matches(&self, el: &impl Matchable) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(el.tag())
        {
            return false;
        }
        if let Some(id) = &self.id
            && el.attr("id") != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|a| match (&a.op, el.attr(&a.name)) {
            (_, None) => false,
            (AttrOp::Exists, Some(_)) => true,
            (AttrOp::Equals(want), Some(have)) => want == have,
            (AttrOp::Contains(want), Some(have)) => !want.is_empty() && have.contains(want.as_str()),
        })
    }
}

// Split on commas that are not inside brackets or quotes.
fn split_list(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts.retain(|p| !p.trim().is_empty());
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(input: &str) -> CountUpResult<Compound> {
    let mut out = Compound::default();
    let mut rest = input;

    if let Some(stripped) = rest.strip_prefix('*') {
        rest = stripped;
    } else {
        let (tag, tail) = take_ident(rest);
        if !tag.is_empty() {
            out.tag = Some(tag.to_owned());
        }
        rest = tail;
    }

    while let Some(first) = rest.chars().next() {
        match first {
            '#' => {
                let (id, tail) = take_ident(&rest[1..]);
                if id.is_empty() {
                    return Err(CountUpError::config(format!("empty id in '{input}'")));
                }
                out.id = Some(id.to_owned());
                rest = tail;
            }
            '.' => {
                let (class, tail) = take_ident(&rest[1..]);
                if class.is_empty() {
                    return Err(CountUpError::config(format!("empty class in '{input}'")));
                }
                out.classes.push(class.to_owned());
                rest = tail;
            }
            '[' => {
                let close = find_attr_end(rest)
                    .ok_or_else(|| CountUpError::config(format!("unclosed '[' in '{input}'")))?;
                out.attrs.push(parse_attr(&rest[1..close], input)?);
                rest = &rest[close + 1..];
            }
            _ => {
                return Err(CountUpError::config(format!(
                    "unsupported selector syntax at '{rest}' in '{input}'"
                )));
            }
        }
    }

    Ok(out)
}

fn take_ident(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_ident_char(c)).unwrap_or(s.len());
    s.split_at(end)
}

fn find_attr_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, ch) in s.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_attr(body: &str, input: &str) -> CountUpResult<AttrMatch> {
    let body = body.trim();
    let (name, op) = if let Some((name, value)) = body.split_once("*=") {
        (name, AttrOp::Contains(unquote(value)))
    } else if let Some((name, value)) = body.split_once('=') {
        (name, AttrOp::Equals(unquote(value)))
    } else {
        (body, AttrOp::Exists)
    };

    let name = name.trim();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(CountUpError::config(format!(
            "bad attribute name '{name}' in '{input}'"
        )));
    }
    Ok(AttrMatch {
        name: name.to_owned(),
        op,
    })
}

fn unquote(value: &str) -> String {
    let v = value.trim();
    for q in ['"', '\''] {
        if let Some(inner) = v.strip_prefix(q).and_then(|s| s.strip_suffix(q)) {
            return inner.to_owned();
        }
    }
    v.to_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/host/selector.rs"]
mod tests;
