//! INI files: `[Section]` headers and `key=value` pairs.

use crate::data::entry::{Entry, ParsedItem};

use super::flush_junk;

pub(super) fn parse(source: &str) -> Vec<ParsedItem> {
    let mut items = Vec::new();
    let mut junk = Vec::new();

    for line in source.lines() {
        let trimmed = line.trim();
        let skip = trimmed.is_empty()
            || trimmed.starts_with(';')
            || trimmed.starts_with('#')
            || (trimmed.starts_with('[') && trimmed.ends_with(']'));
        if skip {
            flush_junk(&mut items, &mut junk);
            continue;
        }

        match trimmed.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                flush_junk(&mut items, &mut junk);
                items.push(ParsedItem::Entry(Entry::simple(key.trim(), value.trim())));
            }
            _ => junk.push(line),
        }
    }
    flush_junk(&mut items, &mut junk);

    items
}
