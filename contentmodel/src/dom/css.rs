//! Inline style declarations
//!
//! A [`Style`] is the ordered list of `property: value` pairs found in an
//! element's `style` attribute. Property names are lowercased; values are kept
//! verbatim apart from surrounding whitespace and a trailing `!important`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the text of a `style` attribute.
    ///
    /// Semicolons inside quotes or parentheses (e.g. `url(a;b)`) do not end a
    /// declaration. Declarations without a colon or with an empty name are
    /// skipped.
    pub fn parse(css: &str) -> Self {
        let mut style = Style::new();
        for declaration in split_declarations(css) {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let mut value = value.trim();
            if let Some(stripped) = value.strip_suffix("!important") {
                value = stripped.trim_end();
            }
            if name.is_empty() || value.is_empty() {
                continue;
            }
            style.set(&name, value);
        }
        style
    }

    /// Build a style from literal pairs, used by the static tag tables.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut style = Style::new();
        for (name, value) in pairs {
            style.set(name, *value);
        }
        style
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property, replacing any earlier declaration of it.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.remove(name);
        self.declarations.push((name.to_string(), value.into()));
    }

    pub fn remove(&mut self, name: &str) {
        self.declarations.retain(|(key, _)| key != name);
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Render back into `style` attribute text.
    pub fn to_css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_text())
    }
}

fn split_declarations(css: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;

    for (index, ch) in css.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&css[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&css[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_declarations() {
        let style = Style::parse("color: red; Font-Weight:bold;");
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("font-weight"), Some("bold"));
        assert_eq!(style.len(), 2);
    }

    #[test]
    fn test_later_declaration_wins() {
        let style = Style::parse("color: red; color: blue");
        assert_eq!(style.get("color"), Some("blue"));
        assert_eq!(style.len(), 1);
    }

    #[test]
    fn test_semicolons_inside_quotes_and_parens() {
        let style = Style::parse(
            "font-family: 'A;B', serif; background-image: url(data:x;base64,AA)",
        );
        assert_eq!(style.get("font-family"), Some("'A;B', serif"));
        assert_eq!(
            style.get("background-image"),
            Some("url(data:x;base64,AA)")
        );
    }

    #[test]
    fn test_important_and_garbage_are_handled() {
        let style = Style::parse("color: red !important; nonsense; : blue; width:");
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.len(), 1);
    }

    #[test]
    fn test_css_text_round_trip() {
        let mut style = Style::new();
        style.set("text-align", "center");
        style.set("direction", "rtl");
        assert_eq!(style.to_css_text(), "text-align: center; direction: rtl");
        assert_eq!(Style::parse(&style.to_css_text()), style);
    }

    #[test]
    fn test_remove() {
        let mut style = Style::parse("a: 1; b: 2");
        style.remove("a");
        assert_eq!(style.get("a"), None);
        assert_eq!(style.to_css_text(), "b: 2");
    }
}
