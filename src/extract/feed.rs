//! Feed title extraction via streaming XML parsing.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::models::FeedFormat;

/// Collect `<title>` element text in document order, capped at `limit`.
///
/// Atom feeds only contribute titles bound to the Atom namespace; RSS has
/// no namespace discipline, so any `<title>` counts. Malformed XML yields
/// an empty list, discarding any titles collected before the parse error.
pub fn parse_feed_titles(xml: &str, format: FeedFormat, limit: usize) -> Vec<String> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut titles = Vec::new();
    let mut buf = Vec::new();
    let mut in_title = false;
    let mut current = String::new();

    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(e))) => {
                if e.local_name().as_ref() == b"title" && namespace_matches(format, &ns) {
                    in_title = true;
                    current.clear();
                }
            }
            Ok((_, Event::Text(e))) if in_title => {
                if let Ok(text) = e.unescape() {
                    current.push_str(&text);
                }
            }
            Ok((_, Event::CData(e))) if in_title => {
                current.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok((_, Event::End(e))) => {
                if in_title && e.local_name().as_ref() == b"title" {
                    let title = current.trim().to_string();
                    if !title.is_empty() {
                        titles.push(title);
                    }
                    in_title = false;
                    if titles.len() >= limit {
                        break;
                    }
                }
            }
            Ok((_, Event::Eof)) => break,
            Err(_) => return Vec::new(),
            Ok(_) => {}
        }
        buf.clear();
    }

    titles
}

fn namespace_matches(format: FeedFormat, ns: &ResolveResult<'_>) -> bool {
    match format {
        FeedFormat::Atom => matches!(
            ns,
            ResolveResult::Bound(Namespace(b"http://www.w3.org/2005/Atom"))
        ),
        FeedFormat::Rss => true,
    }
}
