use chrono::{DateTime, FixedOffset};

use crate::custom_date::parse_feed_date;
use crate::error::ParseError;

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// One hot entry as listed by the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub link: Option<String>,
    pub bookmark_count: u32,
    pub date: Option<DateTime<FixedOffset>>,
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    pub title: String,
    pub entries: Vec<Entry>,
}

/// Parses an RSS 1.0 (RDF) or RSS 2.0 document.
///
/// Elements are matched by local name, so `dc:date`, `dc:subject` and
/// `hatena:bookmarkcount` are found whatever prefix the feed binds. Items keep
/// document order.
pub fn parse_feed(raw: &[u8]) -> Result<Feed, ParseError> {
    let trimmed = raw.trim_ascii_start();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyPayload);
    }
    let text = std::str::from_utf8(trimmed)?;
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, options)?;

    let channel = doc
        .descendants()
        .find(|node| node.is_element() && node.tag_name().name() == "channel")
        .ok_or(ParseError::MissingChannel)?;
    let title = child_text(&channel, "title").unwrap_or_default();

    let entries = doc
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "item")
        .map(|node| entry_from_item(&node))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Feed { title, entries })
}

fn entry_from_item(node: &roxmltree::Node<'_, '_>) -> Result<Entry, ParseError> {
    let title = child_text(node, "title").unwrap_or_default();
    let link = child_text(node, "link").or_else(|| {
        node.attribute((RDF_NS, "about"))
            .map(str::trim)
            .filter(|about| !about.is_empty())
            .map(ToString::to_string)
    });

    let bookmark_count = match child_text(node, "bookmarkcount") {
        Some(count) => count
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidBookmarkCount(count))?,
        None => 0,
    };

    let date = child_text(node, "date")
        .or_else(|| child_text(node, "pubDate"))
        .map(|value| parse_feed_date(&value))
        .transpose()?;

    let subjects = node
        .children()
        .filter(|child| child.is_element() && child.tag_name().name() == "subject")
        .filter_map(|child| element_text(&child))
        .collect();

    Ok(Entry {
        title,
        link,
        bookmark_count,
        date,
        subjects,
    })
}

fn child_text(node: &roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
        .and_then(|child| element_text(&child))
}

/// All character data under `node`, so comments and CDATA sections do not cut it short.
fn element_text(node: &roxmltree::Node<'_, '_>) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(|descendant| descendant.is_text())
        .filter_map(|descendant| descendant.text())
        .collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rdf_fixture_in_document_order() {
        let xml = include_bytes!("../fixtures/hotentry.rss");
        let feed = parse_feed(xml).expect("fixture must parse");

        assert_eq!(feed.title, "Hot entries - technology");
        let counts: Vec<u32> = feed.entries.iter().map(|e| e.bookmark_count).collect();
        assert_eq!(counts, vec![812, 455, 1203, 98, 67]);

        let first = &feed.entries[0];
        assert_eq!(first.title, "Understanding async Rust from the ground up");
        assert_eq!(
            first.link.as_deref(),
            Some("https://example.com/rust-async")
        );
        assert_eq!(first.subjects, vec!["テクノロジー", "Rust"]);
        assert_eq!(
            first.date.map(|date| date.to_rfc3339()).as_deref(),
            Some("2018-04-01T10:15:00+09:00")
        );

        assert_eq!(feed.entries[2].title, "SQLite tips & tricks");
        assert!(feed.entries[2].subjects.is_empty());
    }

    #[test]
    fn channel_without_items_is_an_empty_feed() {
        let xml = include_bytes!("../fixtures/empty.rss");
        let feed = parse_feed(xml).expect("empty feed must parse");

        assert_eq!(feed.title, "Hot entries - fun");
        assert!(feed.entries.is_empty());
    }

    #[test]
    fn parses_rss2_items_inside_channel() {
        let xml = br#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Two</title>
  <item><title>b</title><link>https://b.example</link><pubDate>Sun, 01 Apr 2018 01:15:00 GMT</pubDate></item>
  <item><title>a</title></item>
</channel></rss>"#;
        let feed = parse_feed(xml).expect("rss2 must parse");

        let titles: Vec<&str> = feed.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
        assert_eq!(feed.entries[0].bookmark_count, 0);
        assert!(feed.entries[0].date.is_some());
        assert_eq!(feed.entries[1].date, None);
    }

    #[test]
    fn link_falls_back_to_rdf_about() {
        let xml = br#"<rdf:RDF xmlns="http://purl.org/rss/1.0/" xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
<channel rdf:about="x"><title>t</title></channel>
<item rdf:about="https://about.example/"><title>only about</title></item>
</rdf:RDF>"#;
        let feed = parse_feed(xml).expect("feed must parse");
        assert_eq!(
            feed.entries[0].link.as_deref(),
            Some("https://about.example/")
        );
    }

    #[test]
    fn text_split_by_comments_is_kept_whole() {
        let xml = br#"<rss><channel><title>t</title>
<item><title>A <!-- c --> B</title><subject>x<?pi?>y</subject></item></channel></rss>"#;
        let feed = parse_feed(xml).expect("feed must parse");

        assert_eq!(feed.entries[0].title, "A  B");
        assert_eq!(feed.entries[0].subjects, vec!["xy"]);
    }

    #[test]
    fn feeds_with_a_doctype_parse() {
        let xml = br#"<?xml version="1.0"?>
<!DOCTYPE rss PUBLIC "-//Netscape Communications//DTD RSS 0.91//EN"
  "http://my.netscape.com/publish/formats/rss-0.91.dtd">
<rss version="0.91"><channel><title>Old</title>
<item><title>Legacy item</title></item></channel></rss>"#;
        let feed = parse_feed(xml).expect("doctype feed must parse");

        assert_eq!(feed.title, "Old");
        assert_eq!(feed.entries[0].title, "Legacy item");
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(matches!(parse_feed(b"  \n"), Err(ParseError::EmptyPayload)));
        assert!(matches!(
            parse_feed(b"<rss><channel>"),
            Err(ParseError::Xml(_))
        ));
        assert!(matches!(
            parse_feed(b"<html><body>busy</body></html>"),
            Err(ParseError::MissingChannel)
        ));
        assert!(matches!(
            parse_feed(&[0xff, 0xfe, 0x3c]),
            Err(ParseError::Encoding(_))
        ));
    }

    #[test]
    fn rejects_bad_item_fields() {
        let bad_count = br#"<rss><channel><title>t</title>
<item><title>x</title><bookmarkcount>many</bookmarkcount></item></channel></rss>"#;
        assert!(matches!(
            parse_feed(bad_count),
            Err(ParseError::InvalidBookmarkCount(value)) if value == "many"
        ));

        let bad_date = br#"<rss><channel><title>t</title>
<item><title>x</title><date>someday</date></item></channel></rss>"#;
        assert!(matches!(
            parse_feed(bad_date),
            Err(ParseError::InvalidDate(_))
        ));
    }
}
