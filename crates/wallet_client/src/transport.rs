use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{RecipientId, TransferToken},
    protocol::FormPayload,
};
use tracing::debug;
use url::{form_urlencoded, Url};

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn transfer(token: TransferToken) -> Self {
        Self::new(format!("/transfer-post/{}", token.as_path_segment()))
    }

    pub fn add_child() -> Self {
        Self::new("/manage-account/add-child")
    }

    pub fn add_parent() -> Self {
        Self::new("/manage-account/add-parent")
    }

    pub fn get_address(recipient: &RecipientId) -> Self {
        Self::new("/transfer-post/get-address").with_query("id", recipient.0.as_str())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

#[async_trait]
pub trait FormTransport: Send + Sync {
    /// Posts `payload` as a urlencoded form and returns the raw body of a 2xx response.
    async fn post_form(
        &self,
        endpoint: &Endpoint,
        payload: &FormPayload,
    ) -> Result<String, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    pub timeout: Option<Duration>,
}

/// reqwest-backed transport sharing one cookie jar for the signed-in session.
pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(server_url: &str) -> Result<Self, TransportError> {
        Self::with_options(server_url, TransportOptions::default())
    }

    pub fn with_options(
        server_url: &str,
        options: TransportOptions,
    ) -> Result<Self, TransportError> {
        let base_url = Url::parse(server_url.trim()).map_err(|source| {
            TransportError::InvalidServerUrl {
                url: server_url.to_string(),
                source,
            }
        })?;
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TransportError::Client)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Appends the endpoint path to the base url, keeping any base path prefix.
    pub(crate) fn resolve(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{}", endpoint.path()));
        url.set_query(None);
        if !endpoint.query().is_empty() {
            url.query_pairs_mut().extend_pairs(endpoint.query());
        }
        url
    }

    pub(crate) fn check_status(
        endpoint: &Endpoint,
        res: Response,
    ) -> Result<Response, TransportError> {
        let status = res.status();
        if status.is_success() {
            Ok(res)
        } else {
            Err(TransportError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl FormTransport for HttpTransport {
    async fn post_form(
        &self,
        endpoint: &Endpoint,
        payload: &FormPayload,
    ) -> Result<String, TransportError> {
        let url = self.resolve(endpoint);
        debug!(%url, fields = payload.len(), "posting form");
        let request_failed = |source| TransportError::Request {
            endpoint: endpoint.to_string(),
            source,
        };
        let res = self
            .http
            .post(url)
            .form(payload)
            .send()
            .await
            .map_err(request_failed)?;
        let res = Self::check_status(endpoint, res)?;
        res.text().await.map_err(request_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_lookup_encodes_recipient_in_query() {
        let transport = HttpTransport::new("http://127.0.0.1:5000").expect("transport");
        let url = transport.resolve(&Endpoint::get_address(&RecipientId::from("ana@example.com")));
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5000/transfer-post/get-address?id=ana%40example.com"
        );
    }

    #[test]
    fn displayed_endpoint_matches_sent_query() {
        let endpoint = Endpoint::get_address(&RecipientId::from("ana@example.com"));
        assert_eq!(
            endpoint.to_string(),
            "/transfer-post/get-address?id=ana%40example.com"
        );
        let transport = HttpTransport::new("http://127.0.0.1:5000").expect("transport");
        assert!(transport
            .resolve(&endpoint)
            .as_str()
            .ends_with(&endpoint.to_string()));
        assert_eq!(Endpoint::add_child().to_string(), "/manage-account/add-child");
    }

    #[test]
    fn keeps_base_path_prefix() {
        let transport = HttpTransport::new("https://bank.example/app/").expect("transport");
        let url = transport.resolve(&Endpoint::transfer(TransferToken::Bnb));
        assert_eq!(url.as_str(), "https://bank.example/app/transfer-post/BNB");
    }

    #[test]
    fn rejects_unparseable_server_url() {
        assert!(matches!(
            HttpTransport::new("not a url"),
            Err(TransportError::InvalidServerUrl { .. })
        ));
    }
}
