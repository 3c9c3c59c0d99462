//! Credential scopes.
//!
//! A [`Scope`] binds a panel URL and a bearer token to one of the two API
//! namespaces. The namespace is a type parameter, so a [`ClientScope`] can
//! never be passed where an [`ApplicationScope`] is expected.

use std::env;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{PteroError, Result};
use crate::pagination::{fetch_all_pages, Page, Record};
use crate::transport::{HttpTransport, Request, Transport};

/// Environment variable holding the panel base URL.
pub const URL_ENV: &str = "PTERODACTYL_URL";

mod sealed {
    pub trait Sealed {}
}

/// One of the two API namespaces.
pub trait Namespace: sealed::Sealed + Send + Sync + 'static {
    /// Path segment after `/api/`.
    const PREFIX: &'static str;
    /// Environment variable holding this namespace's token.
    const TOKEN_ENV: &'static str;
}

/// End-user namespace, `/api/client`.
#[derive(Debug, Clone, Copy)]
pub enum Client {}

/// Administrator namespace, `/api/application`.
#[derive(Debug, Clone, Copy)]
pub enum Application {}

impl sealed::Sealed for Client {}
impl sealed::Sealed for Application {}

impl Namespace for Client {
    const PREFIX: &'static str = "client";
    const TOKEN_ENV: &'static str = "PTERODACTYL_CLIENT_KEY";
}

impl Namespace for Application {
    const PREFIX: &'static str = "application";
    const TOKEN_ENV: &'static str = "PTERODACTYL_APPLICATION_KEY";
}

/// Account-level credentials. Only sees the servers the account can access.
pub type ClientScope = Scope<Client>;

/// Administrator credentials. Manages servers, users, locations and nests.
pub type ApplicationScope = Scope<Application>;

/// A base URL and token bound to namespace `N`.
///
/// Cloning is cheap; clones share the same transport.
///
/// # Example
///
/// ```no_run
/// use pteroapi::{ApplicationScope, ClientScope};
///
/// # fn example() -> pteroapi::Result<()> {
/// let client = ClientScope::new("https://panel.example.com", "client-token")?;
/// let admin = ApplicationScope::from_env()?;
/// # Ok(())
/// # }
/// ```
pub struct Scope<N: Namespace> {
    base_url: Arc<str>,
    token: String,
    transport: Arc<dyn Transport>,
    namespace: PhantomData<N>,
}

impl<N: Namespace> Clone for Scope<N> {
    fn clone(&self) -> Self {
        Self {
            base_url: Arc::clone(&self.base_url),
            token: self.token.clone(),
            transport: Arc::clone(&self.transport),
            namespace: PhantomData,
        }
    }
}

impl<N: Namespace> fmt::Debug for Scope<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("namespace", &N::PREFIX)
            .field("base_url", &&*self.base_url)
            .finish_non_exhaustive()
    }
}

impl<N: Namespace> Scope<N> {
    /// Create a scope from environment variables.
    ///
    /// Reads `PTERODACTYL_URL` and either `PTERODACTYL_CLIENT_KEY` or
    /// `PTERODACTYL_APPLICATION_KEY` depending on the namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is not set.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var(URL_ENV).map_err(|_| {
            PteroError::ConfigMissing(format!("{URL_ENV} environment variable not set"))
        })?;
        let token = env::var(N::TOKEN_ENV).map_err(|_| {
            PteroError::ConfigMissing(format!("{} environment variable not set", N::TOKEN_ENV))
        })?;

        Self::new(&base_url, &token)
    }

    /// Create a scope that talks to the panel over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        Self::with_transport(base_url, token, Arc::new(HttpTransport::new()?))
    }

    /// Create a scope that sends every request through `transport`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_transport(
        base_url: &str,
        token: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        Url::parse(base_url)?;

        Ok(Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            token: token.to_string(),
            transport,
            namespace: PhantomData,
        })
    }

    /// The panel base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint inside this scope's namespace.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}/{}", self.base_url, N::PREFIX, endpoint)
    }

    /// Send a raw request to `endpoint` inside this scope's namespace.
    ///
    /// # Errors
    ///
    /// Returns whatever the transport reports.
    pub async fn query(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>> {
        let request = Request {
            url: self.endpoint_url(endpoint),
            method,
            body,
        };
        self.transport.dispatch(&self.token, request).await
    }

    /// GET `endpoint` and decode the response.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let bytes = self.query(endpoint, Method::GET, None).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send `body` as JSON and return the raw response.
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        method: Method,
        body: &B,
    ) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(body)?;
        self.query(endpoint, method, Some(body)).await
    }

    /// Send `body` as JSON and decode the response.
    pub(crate) async fn send_json_for<B, T>(
        &self,
        endpoint: &str,
        method: Method,
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.send_json(endpoint, method, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Follow the next links of `first` until the collection is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fails to download or decode. Pages
    /// fetched before the failure are discarded.
    pub async fn fetch_all_pages<T: Record>(&self, first: Page<T>) -> Result<Vec<Page<T>>> {
        fetch_all_pages(self.transport.as_ref(), &self.token, &self.base_url, first).await
    }

    /// GET a collection endpoint and return every record across all pages.
    pub(crate) async fn list_all<T: Record>(&self, endpoint: &str) -> Result<Vec<T>> {
        let first: Page<T> = self.get_json(endpoint).await?;
        let pages = self.fetch_all_pages(first).await?;
        Ok(pages.into_iter().flat_map(Page::into_records).collect())
    }
}
