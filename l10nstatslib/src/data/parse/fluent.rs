//! Fluent (`.ftl`) files.
//!
//! The whole file goes through `fluent_syntax::parser::parse` once. Entry
//! boundaries come from the resulting resource: identifiers and junk are
//! slices of the source, so their byte offsets locate each message, term and
//! attribute. Raw values are then cut from the source between those offsets,
//! keeping placeables and markup exactly as written.

use fluent_syntax::ast;
use fluent_syntax::parser;

use crate::data::entry::{Attribute, Entry, ParsedItem, StructuredEntry};

pub(super) fn parse(source: &str) -> Vec<ParsedItem> {
    let resource = match parser::parse(source) {
        Ok(resource) => resource,
        Err((resource, _errors)) => resource,
    };

    // Start offset of every message, term and junk block, in file order
    let starts: Vec<usize> = resource
        .body
        .iter()
        .filter_map(|entry| entry_start(source, entry))
        .collect();

    let mut items = Vec::new();
    let mut next = starts.iter().skip(1);
    for entry in &resource.body {
        let Some(start) = entry_start(source, entry) else {
            continue;
        };
        let end = next.next().copied().unwrap_or(source.len());
        let region = trim_trailing_comments(&source[start..end]);
        let item = match entry {
            ast::Entry::Message(message) => {
                structured(source, start, region, &message.id, &message.attributes)
            }
            ast::Entry::Term(term) => structured(source, start, region, &term.id, &term.attributes),
            ast::Entry::Junk { content } => Some(ParsedItem::Junk(content.trim_end().to_string())),
            _ => None,
        };
        items.extend(item);
    }
    items
}

/// Byte offset of `part` inside `source`, if it is a slice of it.
fn offset_in(source: &str, part: &str) -> Option<usize> {
    let base = source.as_ptr() as usize;
    let at = part.as_ptr() as usize;
    (at >= base && at + part.len() <= base + source.len()).then(|| at - base)
}

/// Where a message, term or junk block begins. Comments have no start.
fn entry_start(source: &str, entry: &ast::Entry<&str>) -> Option<usize> {
    match entry {
        ast::Entry::Message(message) => offset_in(source, message.id.name),
        // The leading `-` comes right before the identifier
        ast::Entry::Term(term) => offset_in(source, term.id.name)?.checked_sub(1),
        ast::Entry::Junk { content } => offset_in(source, content),
        _ => None,
    }
}

/// Drop trailing blank and column-0 comment lines.
///
/// Comments between two entries belong to neither raw value.
fn trim_trailing_comments(region: &str) -> &str {
    let mut end = 0;
    let mut offset = 0;
    for line in region.split_inclusive('\n') {
        offset += line.len();
        if !line.trim().is_empty() && !line.starts_with('#') {
            end = offset;
        }
    }
    region[..end].trim_end()
}

/// Text after the `=` that follows an identifier ending at `after`.
fn assigned(region: &str, after: usize) -> Option<usize> {
    region[after..].find('=').map(|eq| after + eq + 1)
}

/// Cut the value and attributes of a message or term out of its region.
fn structured(
    source: &str,
    start: usize,
    region: &str,
    id: &ast::Identifier<&str>,
    attributes: &[ast::Attribute<&str>],
) -> Option<ParsedItem> {
    let id_end = offset_in(source, id.name)? - start + id.name.len();

    // Attribute `(name, start of ".name", end of the identifier)` in region
    let mut spans = Vec::with_capacity(attributes.len());
    for attribute in attributes {
        let at = offset_in(source, attribute.id.name)? - start;
        spans.push((attribute.id.name, at - 1, at + attribute.id.name.len()));
    }

    let value_end = spans.first().map_or(region.len(), |&(_, dot, _)| dot);
    let value_start = assigned(region, id_end)?;
    let raw_value = region[value_start..value_end].trim().to_string();

    let mut parsed = Vec::with_capacity(spans.len());
    for (index, &(name, _, name_end)) in spans.iter().enumerate() {
        let end = spans
            .get(index + 1)
            .map_or(region.len(), |&(_, dot, _)| dot);
        let value_start = assigned(region, name_end)?;
        parsed.push(Attribute {
            name: name.to_string(),
            raw_value: region[value_start..end].trim().to_string(),
        });
    }

    let name = &region[..id_end];
    Some(ParsedItem::Entry(Entry::Structured(StructuredEntry {
        name: name.to_string(),
        raw_value,
        attributes: parsed,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structured(items: &[ParsedItem], index: usize) -> &StructuredEntry {
        match &items[index] {
            ParsedItem::Entry(Entry::Structured(e)) => e,
            other => panic!("expected structured entry, got {other:?}"),
        }
    }

    #[test]
    fn test_messages_and_terms() {
        let source = "# Comment\n## Group\n\n-brand-short-name = Firefox\nabout = About { -brand-short-name }\n";
        let items = parse(source);

        assert_eq!(items.len(), 2);
        assert_eq!(structured(&items, 0).name, "-brand-short-name");
        assert_eq!(structured(&items, 0).raw_value, "Firefox");
        assert_eq!(structured(&items, 1).name, "about");
        assert_eq!(structured(&items, 1).raw_value, "About { -brand-short-name }");
    }

    #[test]
    fn test_attributes() {
        let source = "menu-open =\n    .label = Open File\n    .accesskey = O\nplain = Plain\n";
        let items = parse(source);

        let menu = structured(&items, 0);
        assert_eq!(menu.raw_value, "");
        assert_eq!(menu.attributes.len(), 2);
        assert_eq!(menu.attributes[0].name, "label");
        assert_eq!(menu.attributes[0].raw_value, "Open File");
        assert_eq!(menu.attributes[1].name, "accesskey");
        assert_eq!(menu.attributes[1].raw_value, "O");
        assert_eq!(structured(&items, 1).name, "plain");
    }

    #[test]
    fn test_multiline_value_with_blank_line() {
        let source = "intro =\n    First line\n\n    second paragraph\n    .title = Intro\n";
        let items = parse(source);

        let intro = structured(&items, 0);
        assert_eq!(intro.raw_value, "First line\n\n    second paragraph");
        assert_eq!(intro.attributes[0].raw_value, "Intro");
    }

    #[test]
    fn test_select_expression_value() {
        let source = "tabs = { $count ->\n        [one] One tab\n       *[other] { $count } tabs\n    }\n";
        let items = parse(source);

        assert_eq!(items.len(), 1);
        let tabs = structured(&items, 0);
        assert!(tabs.raw_value.starts_with("{ $count ->"));
        assert!(tabs.raw_value.ends_with('}'));
    }

    #[test]
    fn test_select_variants_at_column_zero() {
        let source = "tabs = { $n ->\n[one] One tab\n*[other] Many tabs\n}\nnext = Next\n";
        let items = parse(source);

        assert_eq!(items.len(), 2);
        let tabs = structured(&items, 0);
        assert_eq!(tabs.name, "tabs");
        assert_eq!(
            tabs.raw_value,
            "{ $n ->\n[one] One tab\n*[other] Many tabs\n}"
        );
        assert_eq!(structured(&items, 1).name, "next");
        assert_eq!(structured(&items, 1).raw_value, "Next");
    }

    #[test]
    fn test_comments_between_entries_are_dropped() {
        let source = "first = One\n\n# Attached to second\nsecond = Two\n    .title = Second\n## Group\n-term = Term\n";
        let items = parse(source);

        assert_eq!(items.len(), 3);
        assert_eq!(structured(&items, 0).raw_value, "One");
        let second = structured(&items, 1);
        assert_eq!(second.raw_value, "Two");
        assert_eq!(second.attributes[0].raw_value, "Second");
        assert_eq!(structured(&items, 2).name, "-term");
        assert_eq!(structured(&items, 2).raw_value, "Term");
    }

    #[test]
    fn test_invalid_entry_is_junk() {
        let source = "broken = { $var\nok = Fine\nwhat is this\n";
        let items = parse(source);

        assert!(matches!(items[0], ParsedItem::Junk(_)));
        assert_eq!(structured(&items, 1).name, "ok");
        assert_eq!(items[2], ParsedItem::Junk("what is this".to_string()));
    }

    #[test]
    fn test_message_without_value_or_attributes_is_junk() {
        let items = parse("empty =\nok = Fine\n");

        assert!(matches!(items[0], ParsedItem::Junk(_)));
        assert_eq!(structured(&items, 1).name, "ok");
    }
}
