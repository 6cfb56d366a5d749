//! FictionBook 2 (FB2) to plain text.

use super::error::{ReaderError, Result};
use super::text::TextBuilder;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Formatting elements that continue the surrounding paragraph.
const INLINE_ELEMENTS: &[&str] = &[
    "a", "code", "emphasis", "strikethrough", "strong", "style", "sub", "sup",
];

/// Person-name parts; adjacent parts are separated by a space.
const NAME_PARTS: &[&str] = &["first-name", "middle-name", "last-name", "nickname"];

/// Extract the text content of an FB2 document.
///
/// Every non-inline element starts a new paragraph. `<binary>` payloads
/// (base64 images) are skipped.
pub fn fb2_to_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut out = TextBuilder::new();

    loop {
        let event = reader.read_event().map_err(|err| ReaderError::Xml {
            position: reader.error_position() as u64,
            message: err.to_string(),
        })?;
        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "binary" {
                    reader.read_to_end(e.name()).map_err(|err| ReaderError::Xml {
                        position: reader.error_position() as u64,
                        message: err.to_string(),
                    })?;
                    continue;
                }
                start_element(&mut out, &name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                start_element(&mut out, &name);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if !INLINE_ELEMENTS.contains(&name.as_str()) && !NAME_PARTS.contains(&name.as_str())
                {
                    out.paragraph_break();
                }
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                out.push_text(&text);
            }
            Event::CData(c) => out.push_text(&String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out.finish())
}

fn start_element(out: &mut TextBuilder, name: &str) {
    if NAME_PARTS.contains(&name) {
        out.push_text(" ");
    } else if !INLINE_ELEMENTS.contains(&name) {
        out.paragraph_break();
    }
}
