//! Support for creating the Atom feed from the blog's pages.

use crate::page::Page;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{FixedOffset, NaiveDateTime, ParseError, TimeZone, Utc};
use std::fmt;
use std::io::Write;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub id: String,
    pub author: Option<String>,
    pub home_page: String,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and the blog's
/// pages (ordered oldest-first, as the content source provides them; entries
/// are emitted newest-first) and writes the result to a [`std::io::Write`].
pub fn write_feed<W: Write>(config: FeedConfig, pages: &[Page], w: W) -> Result<()> {
    feed(config, pages)?.write_to(w)?;
    Ok(())
}

fn feed(config: FeedConfig, pages: &[Page]) -> Result<Feed> {
    use std::collections::BTreeMap;
    Ok(Feed {
        entries: feed_entries(&config, pages)?,
        title: config.title.into(),
        id: config.id,
        updated: FixedOffset::east(0).from_utc_datetime(&Utc::now().naive_utc()),
        authors: author_to_people(config.author.as_deref()),
        categories: Vec::new(),
        contributors: Vec::new(),
        generator: None,
        icon: None,
        logo: None,
        rights: None,
        subtitle: None,
        base: None,
        lang: None,
        extensions: BTreeMap::new(),
        namespaces: BTreeMap::new(),
        links: vec![Link {
            href: config.home_page,
            rel: "alternate".to_string(),
            title: None,
            hreflang: None,
            mime_type: None,
            length: None,
        }],
    })
}

fn feed_entries(config: &FeedConfig, pages: &[Page]) -> Result<Vec<Entry>> {
    use std::collections::BTreeMap;
    let mut entries: Vec<Entry> = Vec::with_capacity(pages.len());

    for page in pages.iter().rev() {
        let naive = NaiveDateTime::parse_from_str(&page.published_time, "%Y-%m-%d %H:%M:%S")?;
        let date = FixedOffset::east(0).from_utc_datetime(&naive);

        entries.push(Entry {
            id: page.url.clone(),
            title: page.title.clone().into(),
            updated: date,
            authors: author_to_people(config.author.as_deref()),
            links: vec![Link {
                href: page.url.clone(),
                rel: "alternate".to_owned(),
                title: None,
                mime_type: None,
                hreflang: None,
                length: None,
            }],
            rights: None,
            summary: match page.description.is_empty() {
                true => None,
                false => Some(page.description.clone().into()),
            },
            categories: Vec::new(),
            contributors: Vec::new(),
            published: Some(date),
            source: None,
            content: None,
            extensions: BTreeMap::new(),
        })
    }
    Ok(entries)
}

fn author_to_people(author: Option<&str>) -> Vec<Person> {
    match author {
        Some(name) => vec![Person {
            name: name.to_owned(),
            email: None,
            uri: None,
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, and
/// date-time parsing issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when there is an issue parsing a page's publication date.
    DateTimeParse(ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::DateTimeParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::DateTimeParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: ParseError) -> Error {
        Error::DateTimeParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dto::PageDto;

    fn page(id: u32, date: &str) -> Page {
        let mut dto = PageDto::default();
        dto.post.post_id = id;
        dto.post.title = format!("Post {}", id);
        dto.post.url = format!("https://example.org/blog/post-{}/", id);
        dto.post.date = date.to_owned();
        dto.post.excerpt = format!("Summary {}", id);
        Page::from_dto(&dto, "example.org").unwrap()
    }

    #[test]
    fn test_feed_lists_newest_entry_first() {
        let pages = vec![page(1, "2018-3-4 9:5:1"), page(2, "2019-11-30 8:0:0")];
        let mut buf = Vec::new();
        write_feed(
            FeedConfig {
                title: "example.org".to_owned(),
                id: "https://example.org/".to_owned(),
                author: Some("Jane Doe".to_owned()),
                home_page: "https://example.org/".to_owned(),
            },
            &pages,
            &mut buf,
        )
        .unwrap();

        let xml = String::from_utf8(buf).unwrap();
        assert!(xml.contains("<feed"));
        assert!(xml.contains("Post 1"));
        assert!(xml.contains("Post 2"));
        assert!(xml.contains("Jane Doe"));
        assert!(xml.find("Post 2").unwrap() < xml.find("Post 1").unwrap());
    }

    #[test]
    fn test_unparseable_date_is_an_error() {
        let pages = vec![page(1, "yesterday")];
        let mut buf = Vec::new();
        let result = write_feed(
            FeedConfig {
                title: "example.org".to_owned(),
                id: "https://example.org/".to_owned(),
                author: None,
                home_page: "https://example.org/".to_owned(),
            },
            &pages,
            &mut buf,
        );
        assert!(matches!(result, Err(Error::DateTimeParse(_))));
    }
}
