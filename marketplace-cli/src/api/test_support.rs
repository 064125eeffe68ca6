//! Test doubles for backend calls

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::client::RemoteDataSource;
use super::error::{ApiError, TransportError};
use super::models::{Credential, Record, record_id};
use super::query::{RequestDescriptor, ResultPage};

/// Accept one HTTP connection, answer it after `delay`, and hand back the raw
/// request text through the join handle
pub async fn serve_once(
    status: &'static str,
    body: &'static str,
    delay: Duration,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        tokio::time::sleep(delay).await;
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
        request
    });

    (base_url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

/// A base URL nothing is listening on
pub async fn unused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn records(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

/// In-memory backend: pages its records, applies `PUT /{res}/{id}/{field}`,
/// and can be told to fail or to answer specific pages slowly
#[derive(Default)]
pub struct FakeSource {
    records: Mutex<Vec<Record>>,
    delays: Mutex<HashMap<u32, Duration>>,
    failure: Mutex<Option<ApiError>>,
    pub fetches: AtomicUsize,
    pub updates: AtomicUsize,
    pub last_credential: Mutex<Option<String>>,
}

impl FakeSource {
    pub fn with_records(values: Vec<Value>) -> Self {
        Self {
            records: Mutex::new(records(values)),
            ..Self::default()
        }
    }

    /// Orders 1..=n with alternating statuses
    pub fn orders(n: u64) -> Self {
        Self::with_records(
            (1..=n)
                .map(|i| {
                    json!({
                        "id": i,
                        "status": if i % 2 == 0 { "paid" } else { "pending" },
                        "total_amount": i * 10,
                    })
                })
                .collect(),
        )
    }

    pub fn failing() -> Self {
        let source = Self::default();
        source.set_failing(true);
        source
    }

    /// Fail every call with a refused connection, or stop failing
    pub fn set_failing(&self, failing: bool) {
        let failure: Option<ApiError> =
            failing.then(|| TransportError::network("fake", "connection refused").into());
        *self.failure.lock().unwrap() = failure;
    }

    /// Fail every call with `error`
    pub fn fail_with(&self, error: impl Into<ApiError>) {
        *self.failure.lock().unwrap() = Some(error.into());
    }

    /// Delay answers for one page number
    pub fn delay_page(&self, page: u32, delay: Duration) {
        self.delays.lock().unwrap().insert(page, delay);
    }

    fn check(&self) -> Result<(), ApiError> {
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteDataSource for FakeSource {
    async fn fetch_page(
        &self,
        endpoint: &str,
        request: &RequestDescriptor,
        credential: &Credential,
        _timeout: Duration,
    ) -> Result<ResultPage, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        *self.last_credential.lock().unwrap() = Some(credential.token().to_string());

        let page: u32 = request.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let page_size: u32 = request
            .get("page_size")
            .and_then(|p| p.parse().ok())
            .unwrap_or(10);

        let delay = self.delays.lock().unwrap().get(&page).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check()?;

        let matching: Vec<Record> = {
            let records = self.records.lock().unwrap();
            records
                .iter()
                .filter(|record| match request.get("status") {
                    Some(status) => record.get("status") == Some(&json!(status)),
                    None => true,
                })
                .cloned()
                .collect()
        };
        Ok(ResultPage::paginate(matching, page, page_size))
    }

    async fn send_update(
        &self,
        path: &str,
        body: &Value,
        _credential: &Credential,
        _timeout: Duration,
    ) -> Result<(), ApiError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let (id, field) = match segments.as_slice() {
            [_, id, field] => (*id, *field),
            _ => return Err(TransportError::http_status(path, 404, "no such route").into()),
        };

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|record| record_id(record).as_deref() == Some(id))
            .ok_or_else(|| TransportError::http_status(path, 404, "no such record"))?;
        if let Some(value) = body.get(field) {
            record.insert(field.to_string(), value.clone());
        }
        Ok(())
    }
}
