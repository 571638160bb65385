//! The in-memory model of a published page and the [`Location`] seam used by
//! the navigation tile renderer.

use crate::dto::PageDto;
use std::fmt;
use url::Url;

/// The slice of a page the navigation tiles need: where it lives and what to
/// show on its tile.
pub trait Location {
    fn url(&self) -> &str;
    fn title(&self) -> &str;
    fn thumbnail_url(&self) -> &str;
    fn image_url(&self) -> &str;
}

/// A published page (blog post, marginal page, or a generated navigation
/// page). Constructed once and never mutated; rendering and writing read it.
#[derive(Clone, Debug)]
pub struct Page {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub content: String,
    pub thumbnail_url: String,
    pub image_url: String,
    pub url: String,
    pub domain: String,
    pub published_time: String,
    pub disqus_id: String,

    /// Directory below the document root, with leading and trailing slash.
    pub fs_path: String,
    pub fs_filename: String,
}

impl Page {
    /// Builds a page from its DTO. The filesystem location is derived from
    /// the canonical URL: directory-style URLs map to an `index.html` inside
    /// that directory, file-style URLs keep their filename.
    pub fn from_dto(dto: &PageDto, domain: &str) -> Result<Page> {
        let parsed = Url::parse(&dto.post.url).map_err(|err| Error::InvalidUrl {
            url: dto.post.url.clone(),
            err,
        })?;
        let (fs_path, fs_filename) = split_doc_path(parsed.path());

        Ok(Page {
            id: dto.post.post_id,
            title: dto.post.title.clone(),
            description: dto.post.excerpt.clone(),
            content: dto.post.content.clone(),
            thumbnail_url: dto.thumb_img.clone(),
            image_url: dto.post_img.clone(),
            url: dto.post.url.clone(),
            domain: domain.to_owned(),
            published_time: dto.post.date.clone(),
            disqus_id: dto
                .post
                .custom_fields
                .dsq_thread_id
                .first()
                .cloned()
                .unwrap_or_default(),
            fs_path,
            fs_filename,
        })
    }
}

impl Location for Page {
    fn url(&self) -> &str {
        &self.url
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    fn image_url(&self) -> &str {
        &self.image_url
    }
}

fn split_doc_path(path: &str) -> (String, String) {
    if path.ends_with('/') {
        return (path.to_owned(), "index.html".to_owned());
    }
    // URL paths always carry a leading slash, so rfind cannot miss.
    let cut = path.rfind('/').unwrap_or(0);
    (path[..cut + 1].to_owned(), path[cut + 1..].to_owned())
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem constructing a page from its DTO.
#[derive(Debug)]
pub enum Error {
    /// Returned when the DTO's canonical URL does not parse.
    InvalidUrl { url: String, err: url::ParseError },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidUrl { url, err } => {
                write!(f, "invalid page url '{}': {}", url, err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidUrl { url: _, err } => Some(err),
        }
    }
}
