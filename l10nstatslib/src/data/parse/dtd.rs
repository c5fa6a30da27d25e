//! DTD entity files: `<!ENTITY name "value">`.

use crate::data::entry::{Entry, ParsedItem};

pub(super) fn parse(source: &str) -> Vec<ParsedItem> {
    let mut items = Vec::new();
    let mut rest = source;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(after) = rest.strip_prefix("<!--") {
            match after.find("-->") {
                Some(end) => rest = &after[end + 3..],
                None => {
                    items.push(ParsedItem::Junk(rest.to_string()));
                    break;
                }
            }
            continue;
        }

        // Parameter entity references such as `%brandDTD;`
        if rest.starts_with('%') {
            if let Some(end) = rest.find(';') {
                if is_name(&rest[1..end]) {
                    rest = &rest[end + 1..];
                    continue;
                }
            }
        }

        if rest.starts_with("<!ENTITY") {
            if let Some((entity, consumed)) = parse_entity(rest) {
                if let Some(entry) = entity {
                    items.push(ParsedItem::Entry(entry));
                }
                rest = &rest[consumed..];
                continue;
            }
        }

        let end = rest.find('>').map_or(rest.len(), |i| i + 1);
        items.push(ParsedItem::Junk(rest[..end].to_string()));
        rest = &rest[end..];
    }

    items
}

/// Parse one `<!ENTITY ...>` declaration at the start of `input`.
///
/// Returns the entry (or `None` for a parameter entity declaration, which
/// carries no text) and the number of bytes consumed.
fn parse_entity(input: &str) -> Option<(Option<Entry>, usize)> {
    let body = &input["<!ENTITY".len()..];
    let after_kw = body.trim_start();
    if after_kw.len() == body.len() {
        return None;
    }

    if let Some(pe) = after_kw.strip_prefix('%') {
        let end = pe.find('>')?;
        let consumed = input.len() - pe.len() + end + 1;
        return Some((None, consumed));
    }

    let name_len = after_kw
        .find(|c: char| !is_name_char(c))
        .unwrap_or(after_kw.len());
    if name_len == 0 {
        return None;
    }
    let name = &after_kw[..name_len];

    let after_name = &after_kw[name_len..];
    let value_part = after_name.trim_start();
    if value_part.len() == after_name.len() {
        return None;
    }

    let quote = value_part.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value_body = &value_part[1..];
    let close = value_body.find(quote)?;
    let value = &value_body[..close];

    let tail = value_body[close + 1..].trim_start();
    let tail = tail.strip_prefix('>')?;
    let consumed = input.len() - tail.len();

    Some((Some(Entry::simple(name, value)), consumed))
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | ':')
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_name_char)
}
