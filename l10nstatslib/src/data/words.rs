//! Word counting for raw string values.
//!
//! Two counters exist:
//!
//! - the generic heuristic, used for every format but Fluent: line break
//!   tags become newlines, other SGML-like tags are removed, and what is
//!   left is split on whitespace
//! - the Fluent counter, which parses the value and only counts words in
//!   text elements, so variable names, message references and selector
//!   syntax don't inflate the count

use std::sync::LazyLock;

use fluent_syntax::ast;
use fluent_syntax::parser;
use regex::Regex;

use super::entry::Format;

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<br\s*/?>").unwrap());
static SGML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?\w+.*?>").unwrap());

/// Count words in a raw value, using the counter suited to `format`.
pub fn count_words(raw_value: &str, format: Format) -> u64 {
    match format {
        Format::Fluent => count_fluent_words(raw_value),
        _ => count_plain_words(raw_value),
    }
}

/// Strip markup from a raw value the way the generic counter sees it.
pub fn strip_markup(text: &str) -> String {
    let text = LINE_BREAK.replace_all(text, "\n");
    SGML_TAG.replace_all(&text, "").into_owned()
}

/// Generic word count: markup removed, then split on whitespace.
pub fn count_plain_words(text: &str) -> u64 {
    strip_markup(text).split_whitespace().count() as u64
}

/// Word count of a Fluent value, counting text elements only.
///
/// Falls back to the generic counter when the value doesn't parse.
pub fn count_fluent_words(raw_value: &str) -> u64 {
    let source = format!("temp = {raw_value}");
    let resource = match parser::parse(source.as_str()) {
        Ok(resource) => resource,
        Err(_) => return count_plain_words(raw_value),
    };

    resource
        .body
        .iter()
        .map(|entry| match entry {
            ast::Entry::Message(message) => message.value.as_ref().map_or(0, pattern_words),
            _ => 0,
        })
        .sum()
}

fn pattern_words(pattern: &ast::Pattern<&str>) -> u64 {
    pattern
        .elements
        .iter()
        .map(|element| match element {
            ast::PatternElement::TextElement { value } => value.split_whitespace().count() as u64,
            ast::PatternElement::Placeable { expression } => expression_words(expression),
        })
        .sum()
}

fn expression_words(expression: &ast::Expression<&str>) -> u64 {
    match expression {
        ast::Expression::Select { selector, variants } => {
            inline_words(selector) + variants.iter().map(|v| pattern_words(&v.value)).sum::<u64>()
        }
        ast::Expression::Inline(inline) => inline_words(inline),
    }
}

fn inline_words(inline: &ast::InlineExpression<&str>) -> u64 {
    match inline {
        ast::InlineExpression::Placeable { expression } => expression_words(expression),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words_strip_tags() {
        assert_eq!(count_plain_words("Hello <br> world <b>bold</b> text"), 4);
        assert_eq!(strip_markup("a<br/>b"), "a\nb");
        assert_eq!(strip_markup("a<br />b"), "a\nb");
    }

    #[test]
    fn test_plain_words_whitespace() {
        assert_eq!(count_plain_words(""), 0);
        assert_eq!(count_plain_words("   \n\t "), 0);
        assert_eq!(count_plain_words("  one\ttwo\nthree  "), 3);
    }

    #[test]
    fn test_plain_words_tags_with_attributes() {
        assert_eq!(
            count_plain_words("Read the <a href=\"https://example.com\">manual</a> now"),
            4
        );
        // A lone `<` is not a tag
        assert_eq!(count_plain_words("1 < 2"), 3);
    }

    #[test]
    fn test_fluent_words_ignore_placeables() {
        assert_eq!(count_fluent_words("Welcome back { $user }"), 2);
        assert_eq!(count_fluent_words("About { -brand-short-name }"), 1);
    }

    #[test]
    fn test_fluent_words_count_variants() {
        let raw = "{ $count ->\n        [one] One tab\n       *[other] { $count } open tabs\n    }";
        assert_eq!(count_fluent_words(raw), 4);
    }

    #[test]
    fn test_fluent_words_fallback() {
        assert_eq!(count_fluent_words("Broken { value"), count_plain_words("Broken { value"));
    }

    #[test]
    fn test_count_words_dispatch() {
        let raw = "Hi { $name } <b>there</b>";
        assert_eq!(count_words(raw, Format::Fluent), count_fluent_words(raw));
        assert_eq!(count_words(raw, Format::Properties), count_plain_words(raw));
        assert_eq!(count_words(raw, Format::Dtd), 5);
    }
}
