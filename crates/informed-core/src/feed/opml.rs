use quick_xml::events::Event;
use quick_xml::Reader;

use super::models::FeedSource;
use crate::{Error, Result};

/// Parse an OPML document into feed sources.
///
/// Every `<outline>` carrying an `xmlUrl` becomes one source. The display name
/// comes from `title`, then `text`. A `category` attribute on the outline is
/// used as the category hint; otherwise the `text` of the enclosing folder
/// outline is.
pub fn parse_opml(content: &str) -> Result<Vec<FeedSource>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut sources = Vec::new();
    // Folder names for the currently open non-feed outlines
    let mut folders: Vec<Option<String>> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::FeedList(format!("Failed to parse OPML: {}", e)))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) if e.name().as_ref() == b"outline" => {
                let is_open = matches!(event, Event::Start(_));
                let mut xml_url = None;
                let mut title = None;
                let mut text = None;
                let mut category = None;

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"xmlUrl" => xml_url = Some(value),
                        b"title" => title = Some(value),
                        b"text" => text = Some(value),
                        b"category" => category = Some(value),
                        _ => {}
                    }
                }

                match xml_url {
                    Some(url) if !url.trim().is_empty() => {
                        let folder = folders.iter().rev().find_map(|f| f.clone());
                        sources.push(FeedSource {
                            url,
                            name: title.or(text),
                            category: category.or(folder),
                        });
                        if is_open {
                            folders.push(None);
                        }
                    }
                    _ => {
                        if is_open {
                            folders.push(title.or(text));
                        }
                    }
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"outline" => {
                folders.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(sources)
}
