//! Pagination utilities for Pterodactyl API responses.
//!
//! Collections come back as a `data` array of `{"attributes": ...}` records
//! plus a `meta.pagination` block whose `links.next` points at the following
//! page. [`fetch_all_pages`] follows those links until the panel stops
//! sending one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::error::Result;
use crate::transport::{Request, Transport};

/// A record type that can appear in a paginated collection.
pub trait Record: DeserializeOwned + Send + 'static {
    /// Query parameter appended to every followed next link.
    ///
    /// The panel drops `include` parameters from the links it generates, so
    /// collections that need relationships on every page set this.
    const NEXT_LINK_QUERY: Option<&'static str> = None;
}

/// One page of a collection as sent by the panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The records on this page, in panel order.
    pub data: Vec<Wrapped<T>>,
    /// Pagination metadata. Absent for unpaginated collections.
    #[serde(default)]
    pub meta: Meta,
}

/// A record inside its `attributes` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wrapped<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    pub attributes: T,
}

/// The `meta` block of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Pagination,
}

/// Position of a page within its collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of records across all pages.
    #[serde(default)]
    pub total: u64,
    /// Number of records on this page.
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub per_page: u64,
    /// Current page number (1-indexed).
    #[serde(default)]
    pub current_page: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default, deserialize_with = "links_or_empty_list")]
    pub links: Links,
}

/// Links to neighbouring pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// Build a page from records and pagination metadata.
    pub fn new(records: Vec<T>, pagination: Pagination) -> Self {
        Self {
            data: records
                .into_iter()
                .map(|attributes| Wrapped {
                    object: None,
                    attributes,
                })
                .collect(),
            meta: Meta { pagination },
        }
    }

    /// Pagination metadata for this page.
    pub fn pagination(&self) -> &Pagination {
        &self.meta.pagination
    }

    /// The link to the following page, if there is one.
    pub fn next_link(&self) -> Option<&str> {
        self.meta
            .pagination
            .links
            .next
            .as_deref()
            .filter(|link| !link.is_empty())
    }

    /// Returns true if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of records on this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Iterate over the records on this page.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.data.iter().map(|w| &w.attributes)
    }

    /// Unwrap the records, keeping their order.
    pub fn into_records(self) -> Vec<T> {
        self.data.into_iter().map(|w| w.attributes).collect()
    }

    /// Map the records to a different type.
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Page<U> {
        Page {
            data: self
                .data
                .into_iter()
                .map(|w| Wrapped {
                    object: w.object,
                    attributes: f(w.attributes),
                })
                .collect(),
            meta: self.meta,
        }
    }
}

impl<T: Record> Page<T> {
    /// The URL to request for the following page, if there is one.
    pub fn next_url(&self) -> Option<String> {
        let link = self.next_link()?;
        Some(match T::NEXT_LINK_QUERY {
            Some(query) => {
                let separator = if link.contains('?') { '&' } else { '?' };
                format!("{link}{separator}{query}")
            }
            None => link.to_string(),
        })
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_records().into_iter()
    }
}

/// Fetch every page of a collection, starting from an already decoded one.
///
/// The first page is kept at index 0. Each following page is fetched from
/// the next link of the last page appended, without namespace prefixing.
/// Relative links are resolved against `base_url`. The loop ends when a page
/// carries no next link.
///
/// # Errors
///
/// Returns the first dispatch or decode error, or an error if a next link
/// cannot be resolved. Pages fetched before it are dropped; there is no
/// partial result.
pub async fn fetch_all_pages<T: Record>(
    transport: &dyn Transport,
    token: &str,
    base_url: &str,
    first: Page<T>,
) -> Result<Vec<Page<T>>> {
    let base = Url::parse(base_url)?;
    let mut pages = vec![first];

    while let Some(link) = pages.last().and_then(Page::next_url) {
        let url = base.join(&link)?;
        tracing::debug!(%url, fetched = pages.len(), "following next page");

        let bytes = transport.dispatch(token, Request::get(url)).await?;
        let page: Page<T> = serde_json::from_slice(&bytes)?;
        pages.push(page);
    }

    Ok(pages)
}

/// Some panel versions send `"links": []` instead of an object when there
/// are no neighbours.
fn links_or_empty_list<'de, D>(deserializer: D) -> core::result::Result<Links, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<serde_json::Value>),
        Object(Links),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Object(links) => links,
        Raw::List(_) | Raw::Null(()) => Links::default(),
    })
}
