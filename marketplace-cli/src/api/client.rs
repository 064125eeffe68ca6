//! HTTP access to the storefront backend
//!
//! [`RemoteDataSource`] is the seam list managers and the mutation gateway
//! talk through; [`HttpDataSource`] is the reqwest implementation. Each call
//! is one attempt bounded by a caller-supplied deadline.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::error::{ApiError, TransportError};
use super::models::Credential;
use super::query::{RawResponse, RequestDescriptor, ResultPage};
use super::resilience::{ApiLogger, CORRELATION_HEADER, ClientConfig, OperationContext};

/// Longest error body kept on a [`TransportError`]
const MAX_ERROR_BODY: usize = 512;

/// A backend that serves collection reads and single-field updates
#[async_trait]
pub trait RemoteDataSource: Send + Sync {
    /// `GET {endpoint}?{request}` with a bearer credential
    async fn fetch_page(
        &self,
        endpoint: &str,
        request: &RequestDescriptor,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<ResultPage, ApiError>;

    /// `PUT {path}` with a JSON body
    async fn send_update(
        &self,
        path: &str,
        body: &Value,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<(), ApiError>;
}

/// reqwest-backed [`RemoteDataSource`]
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    http: reqwest::Client,
    base_url: String,
    logger: ApiLogger,
}

impl HttpDataSource {
    pub fn new(base_url: impl Into<String>, config: &ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("marketplace-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            logger: ApiLogger::new(config.monitoring.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn prepare(
        &self,
        request: reqwest::RequestBuilder,
        credential: &Credential,
        context: &OperationContext,
    ) -> reqwest::RequestBuilder {
        let request = request
            .bearer_auth(credential.token())
            .header(reqwest::header::ACCEPT, "application/json");
        match &context.correlation_id {
            Some(id) => request.header(CORRELATION_HEADER, id),
            None => request,
        }
    }

    /// Send a request and return the body of a 2xx response
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
        timeout: Duration,
        context: &OperationContext,
    ) -> Result<Vec<u8>, TransportError> {
        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| classify(endpoint, timeout, e))?;

            let status = response.status();
            if !status.is_success() {
                let mut body = response.text().await.unwrap_or_default();
                if body.len() > MAX_ERROR_BODY {
                    let mut cut = MAX_ERROR_BODY;
                    while !body.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    body.truncate(cut);
                }
                return Err(TransportError::http_status(endpoint, status.as_u16(), body));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| classify(endpoint, timeout, e))?;
            Ok::<_, TransportError>((status.as_u16(), bytes.to_vec()))
        };

        let outcome = match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::timeout(endpoint, timeout)),
        };

        match outcome {
            Ok((status, body)) => {
                self.logger.success(context, status);
                Ok(body)
            }
            Err(err) => {
                self.logger.failure(context, &err);
                Err(err)
            }
        }
    }
}

fn classify(endpoint: &str, timeout: Duration, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::timeout(endpoint, timeout)
    } else if let Some(status) = err.status() {
        TransportError::http_status(endpoint, status.as_u16(), err.to_string())
    } else {
        TransportError::network(endpoint, err.to_string())
    }
}

#[async_trait]
impl RemoteDataSource for HttpDataSource {
    async fn fetch_page(
        &self,
        endpoint: &str,
        request: &RequestDescriptor,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<ResultPage, ApiError> {
        // sent exactly as the manager logs it
        let url = format!("{}?{}", self.url(endpoint), request.to_query_string());
        let context = self.logger.start("GET", &url);
        let builder = self.prepare(self.http.get(&url), credential, &context);

        let body = self.send(builder, endpoint, timeout, &context).await?;
        let raw = RawResponse::from_slice(endpoint, &body)?;
        Ok(raw.into_page())
    }

    async fn send_update(
        &self,
        path: &str,
        body: &Value,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<(), ApiError> {
        let url = self.url(path);
        let context = self.logger.start("PUT", &url);
        let builder = self.prepare(self.http.put(&url).json(body), credential, &context);

        self.send(builder, path, timeout, &context).await?;
        Ok(())
    }
}
