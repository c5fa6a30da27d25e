//! Java-style `.properties` files.
//!
//! Keys are separated from values by `=`, `:` or whitespace. A value ending
//! in an odd number of backslashes continues on the next line; the raw value
//! keeps the continuation as written.

use crate::data::entry::{Entry, ParsedItem};

use super::flush_junk;

pub(super) fn parse(source: &str) -> Vec<ParsedItem> {
    let mut items = Vec::new();
    let mut junk = Vec::new();
    let mut lines = source.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            flush_junk(&mut items, &mut junk);
            continue;
        }

        let Some((key, first)) = split_key(trimmed) else {
            junk.push(line);
            continue;
        };
        flush_junk(&mut items, &mut junk);

        let mut value = first.to_string();
        while continues(&value) {
            match lines.next() {
                Some(next) => {
                    value.push('\n');
                    value.push_str(next);
                }
                None => break,
            }
        }

        items.push(ParsedItem::Entry(Entry::simple(key, value.trim_end())));
    }
    flush_junk(&mut items, &mut junk);

    items
}

/// Split a logical line into key and value, honoring backslash escapes in
/// the key.
fn split_key(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    if key.is_empty() {
        return None;
    }

    let rest = line[key_end..].trim_start();
    let rest = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest);
    Some((key, rest.trim_start()))
}

fn continues(value: &str) -> bool {
    let trailing = value.chars().rev().take_while(|c| *c == '\\').count();
    trailing % 2 == 1
}
