//! Format parsers for localization files.
//!
//! Every parser turns the text of one file into an ordered list of
//! [`ParsedItem`]s. Content a parser can't understand becomes
//! [`ParsedItem::Junk`] instead of an error, so a single broken entry never
//! hides the rest of the file. Comments and directives are dropped.

mod defines;
mod dtd;
mod fluent;
mod ini;
mod properties;

use std::fs;
use std::path::Path;

use crate::error::L10nStatsError;
use crate::Result;

use super::entry::{Format, ParsedItem};

impl Format {
    /// Parse the text of a file in this format.
    pub fn parse(self, source: &str) -> Vec<ParsedItem> {
        match self {
            Format::Dtd => dtd::parse(source),
            Format::Fluent => fluent::parse(source),
            Format::Defines => defines::parse(source),
            Format::Ini => ini::parse(source),
            Format::Properties => properties::parse(source),
        }
    }
}

/// Read and parse a file, selecting the parser from its extension.
///
/// A leading byte-order mark is ignored. Files that aren't valid UTF-8 are
/// reported as read errors.
pub fn parse_file(path: impl AsRef<Path>) -> Result<(Format, Vec<ParsedItem>)> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| L10nStatsError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source = content.strip_prefix('\u{feff}').unwrap_or(&content);
    Ok((format, format.parse(source)))
}

/// Consume consecutive lines that can't be parsed into a single junk item.
fn flush_junk(items: &mut Vec<ParsedItem>, junk: &mut Vec<&str>) {
    if !junk.is_empty() {
        items.push(ParsedItem::Junk(junk.join("\n")));
        junk.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::entry::Entry;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_file_dispatches_on_extension() {
        let temp = tempdir().unwrap();
        let dtd = temp.path().join("menu.dtd");
        let props = temp.path().join("menu.properties");
        fs::write(&dtd, "<!ENTITY open.label \"Open\">\n").unwrap();
        fs::write(&props, "open.label = Open\n").unwrap();

        let (format, items) = parse_file(&dtd).unwrap();
        assert_eq!(format, Format::Dtd);
        assert_eq!(items, vec![ParsedItem::Entry(Entry::simple("open.label", "Open"))]);

        let (format, items) = parse_file(&props).unwrap();
        assert_eq!(format, Format::Properties);
        assert_eq!(items, vec![ParsedItem::Entry(Entry::simple("open.label", "Open"))]);
    }

    #[test]
    fn test_parse_file_strips_bom() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a.ini");
        fs::write(&path, "\u{feff}[Strings]\nTitle=Crash Reporter\n").unwrap();

        let (_, items) = parse_file(&path).unwrap();
        assert_eq!(
            items,
            vec![ParsedItem::Entry(Entry::simple("Title", "Crash Reporter"))]
        );
    }

    #[test]
    fn test_parse_file_invalid_utf8() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("broken.properties");
        fs::write(&path, [0x6b, 0x3d, 0xff, 0xfe, 0x0a]).unwrap();

        let result = parse_file(&path);
        assert!(matches!(result, Err(L10nStatsError::FileRead { .. })));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("/nonexistent/a.dtd");
        assert!(matches!(result, Err(L10nStatsError::FileRead { .. })));
    }
}
