//! Playwright selector strings
//!
//! The automation CLI passes selectors straight to Playwright, so chaining
//! uses `>>`, parent lookup uses `xpath=..` and text matching uses the
//! `:has-text()` pseudo-class or the unquoted `text=` engine.

use std::fmt;

/// An element query understood by the automation CLI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector(String);

/// Quote `text` for use inside a selector, escaping `"` and `\`.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Escape regex metacharacters and the `/` delimiter.
fn regex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if "\\^$.|?*+()[]{}/".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl Selector {
    /// Raw CSS or Playwright selector
    pub fn css(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// `tag:has-text("text")`
    pub fn has_text(tag: &str, text: &str) -> Self {
        Self(format!("{}:has-text({})", tag, quote(text)))
    }

    /// Smallest element whose text contains `text`, ignoring case.
    ///
    /// Unquoted `text=` is Playwright's substring form. Text that would be
    /// read as a quoted or regex body is sent as a case-insensitive regex.
    pub fn text(text: &str) -> Self {
        let text = text.trim();
        if text.starts_with(['"', '\'', '/']) {
            return Self(format!("text=/{}/i", regex_escape(text)));
        }
        Self(format!("text={}", text))
    }

    /// Element by ARIA role and accessible name
    pub fn role(role: &str, name: &str) -> Self {
        Self(format!("role={}[name={}]", role, quote(name)))
    }

    /// Matches any of the alternatives (CSS selector list)
    pub fn any_of<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = Selector>,
    {
        let parts: Vec<String> = alternatives.into_iter().map(|s| s.0).collect();
        Self(parts.join(", "))
    }

    /// The parent element of each match
    pub fn parent(&self) -> Self {
        Self(format!("{} >> xpath=..", self.0))
    }

    /// `child` searched inside each match of `self`
    pub fn within(&self, child: &Selector) -> Self {
        Self(format!("{} >> {}", self.0, child.0))
    }

    /// Only the first match
    pub fn first(&self) -> Self {
        if self.0.ends_with(">> nth=0") {
            return self.clone();
        }
        Self(format!("{} >> nth=0", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Selector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_text() {
        assert_eq!(
            Selector::has_text("button", "Data Hub").as_str(),
            r#"button:has-text("Data Hub")"#
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(
            Selector::has_text("p", r#"say "hi" \o/"#).as_str(),
            r#"p:has-text("say \"hi\" \\o/")"#
        );
    }

    #[test]
    fn test_text_is_unquoted_substring_match() {
        assert_eq!(
            Selector::text("Data Pipeline Simulator").as_str(),
            "text=Data Pipeline Simulator"
        );
        assert_eq!(Selector::text("  IDMC CDI Settings ").as_str(), "text=IDMC CDI Settings");
    }

    #[test]
    fn test_text_with_leading_quote_becomes_regex() {
        assert_eq!(
            Selector::text(r#""Quoted" (v2)"#).as_str(),
            r#"text=/"Quoted" \(v2\)/i"#
        );
    }

    #[test]
    fn test_any_of_language_variants() {
        let sel = Selector::any_of([
            Selector::has_text("button", "Settings"),
            Selector::has_text("button", "設定"),
        ]);
        assert_eq!(
            sel.as_str(),
            r#"button:has-text("Settings"), button:has-text("設定")"#
        );
    }

    #[test]
    fn test_parent_within_first() {
        let container = Selector::has_text("h3", "Publications (Collection)").parent();
        let label = container.within(&Selector::has_text("label", "Topic")).first();
        assert_eq!(
            label.as_str(),
            r#"h3:has-text("Publications (Collection)") >> xpath=.. >> label:has-text("Topic") >> nth=0"#
        );
    }

    #[test]
    fn test_first_is_idempotent() {
        let sel = Selector::css("button").first();
        assert_eq!(sel.first(), sel);
    }

    #[test]
    fn test_role() {
        assert_eq!(
            Selector::role("heading", "Mapping Tasks (Execution)").as_str(),
            r#"role=heading[name="Mapping Tasks (Execution)"]"#
        );
    }
}
