//! Retrieval of the raw sales CSV over HTTP or from disk.

mod basic;
mod client;
mod source;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use source::{CsvSource, DefaultSource};

use reqwest::StatusCode;
use reqwest::header::LAST_MODIFIED;

use crate::error::{FetchError, FetchResult};

/// A retrieved CSV document and the `Last-Modified` value reported with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedCsv {
    pub body: String,
    pub last_modified: Option<String>,
}

/// GETs `url` and returns its body as text.
///
/// # Errors
///
/// Fails on an unparseable URL, a transport error, a non-2xx status, or a
/// body that cannot be decoded as text.
pub async fn fetch_csv<C: HttpClient>(client: &C, url: &str) -> FetchResult<FetchedCsv> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| request_error(url, e))?;
    check_status(url, resp.status())?;

    let last_modified = resp
        .headers()
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = resp.text().await.map_err(|e| request_error(url, e))?;

    Ok(FetchedCsv {
        body,
        last_modified,
    })
}

fn check_status(url: &str, status: StatusCode) -> FetchResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

fn request_error(url: &str, err: reqwest::Error) -> FetchError {
    FetchError::Request {
        url: url.to_string(),
        message: err.to_string(),
    }
}
