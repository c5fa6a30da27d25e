//! Preprocessor define files (`.inc`): `#define NAME value`.

use crate::data::entry::{Entry, ParsedItem};

use super::flush_junk;

pub(super) fn parse(source: &str) -> Vec<ParsedItem> {
    let mut items = Vec::new();
    let mut junk = Vec::new();

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_comment(trimmed) || is_filter(trimmed) {
            flush_junk(&mut items, &mut junk);
            continue;
        }

        match parse_define(trimmed) {
            Some(entry) => {
                flush_junk(&mut items, &mut junk);
                items.push(ParsedItem::Entry(entry));
            }
            None => junk.push(line),
        }
    }
    flush_junk(&mut items, &mut junk);

    items
}

fn is_comment(line: &str) -> bool {
    line == "#" || line.starts_with("# ") || line.starts_with("#\t")
}

fn is_filter(line: &str) -> bool {
    let directive = line.split_whitespace().next().unwrap_or("");
    directive == "#filter" || directive == "#unfilter"
}

fn parse_define(line: &str) -> Option<Entry> {
    let rest = line.strip_prefix("#define")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let rest = rest.trim_start();
    let name_len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let (name, value) = rest.split_at(name_len);
    if !value.is_empty() && !value.starts_with([' ', '\t']) {
        return None;
    }
    Some(Entry::simple(name, value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defines() {
        let source = "#filter emptyLines\n\n# LOCALIZATION NOTE: keep it short\n#define MOZ_LANGPACK_CREATOR mozilla.org\n#define MOZ_LANGPACK_CONTRIBUTORS <em:contributor>Joe</em:contributor>\n#define EMPTY\n\n#unfilter emptyLines\n";
        assert_eq!(
            parse(source),
            vec![
                ParsedItem::Entry(Entry::simple("MOZ_LANGPACK_CREATOR", "mozilla.org")),
                ParsedItem::Entry(Entry::simple(
                    "MOZ_LANGPACK_CONTRIBUTORS",
                    "<em:contributor>Joe</em:contributor>"
                )),
                ParsedItem::Entry(Entry::simple("EMPTY", "")),
            ]
        );
    }

    #[test]
    fn test_unknown_lines_are_junk() {
        let items = parse("#define OK yes\nplain text\n#defineX nope\n");
        assert_eq!(
            items,
            vec![
                ParsedItem::Entry(Entry::simple("OK", "yes")),
                ParsedItem::Junk("plain text\n#defineX nope".to_string()),
            ]
        );
    }
}
