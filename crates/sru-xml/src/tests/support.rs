//! Helpers shared by writer tests.

use quick_xml::Reader;
use quick_xml::events::Event;

/// Reduces a document to its element, attribute, and text structure.
///
/// Whitespace-only text nodes are dropped so indented and compact output
/// compare equal.
pub(super) fn structure(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut events = Vec::new();
    loop {
        let event = reader.read_event().expect("well-formed XML");
        let empty = matches!(event, Event::Empty(_));
        match event {
            Event::Start(element) | Event::Empty(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                events.push(format!("start {name}"));
                let mut attributes: Vec<String> = element
                    .attributes()
                    .map(|entry| {
                        let attribute = entry.expect("attribute");
                        format!(
                            "@{}={}",
                            String::from_utf8_lossy(attribute.key.as_ref()),
                            attribute.unescape_value().expect("attribute value")
                        )
                    })
                    .collect();
                attributes.sort();
                events.extend(attributes);
                if empty {
                    events.push(format!("end {name}"));
                }
            }
            Event::End(element) => {
                events.push(format!(
                    "end {}",
                    String::from_utf8_lossy(element.name().as_ref())
                ));
            }
            Event::Text(text) => {
                let decoded = text.unescape().expect("text");
                if !decoded.trim().is_empty() {
                    events.push(format!("text {decoded}"));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    events
}

/// Returns the decoded text content of the first element named `name`.
pub(super) fn text_of(xml: &str, name: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut inside = false;
    let mut text = String::new();
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(element) if element.name().as_ref() == name.as_bytes() => inside = true,
            Event::End(element) if inside && element.name().as_ref() == name.as_bytes() => {
                return Some(text);
            }
            Event::Text(chunk) if inside => text.push_str(&chunk.unescape().expect("text")),
            Event::Eof => return None,
            _ => {}
        }
    }
}
