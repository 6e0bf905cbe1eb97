mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, bail};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::debug;

/// Sends a GET request and decodes the JSON response body.
///
/// # Errors
///
/// Returns an error on transport failure, a non-2xx status (the body is
/// included in the message), or a body that is not JSON.
pub async fn get_json<C: HttpClient>(client: &C, url: Url) -> Result<Value> {
    let req = reqwest::Request::new(Method::GET, url);
    send_json(client, req).await
}

/// Sends `body` as a JSON POST and decodes the JSON response body.
///
/// # Errors
///
/// Same as [`get_json`].
pub async fn post_json<C: HttpClient, B: Serialize>(client: &C, url: Url, body: &B) -> Result<Value> {
    let mut req = reqwest::Request::new(Method::POST, url);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(serde_json::to_vec(body)?.into());
    send_json(client, req).await
}

async fn send_json<C: HttpClient>(client: &C, req: reqwest::Request) -> Result<Value> {
    let url = req.url().clone();
    let resp = client.execute(req).await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("{} returned status {}: {}", url.path(), status, body);
    }

    Ok(resp.json().await?)
}

/// Collects offset-paginated results.
///
/// `fetch_page` is called with the running offset, starting at 0, and the
/// offset advances by the length of each page. Paging stops only at the
/// first empty page: servers may cap a page below the requested size, so a
/// short page says nothing about whether more items follow.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut all = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch_page(offset).await?;
        let len = page.len();
        debug!(offset, items = len, "Page received");

        if len == 0 {
            break;
        }
        all.extend(page);
        offset += len;
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_collect_pages_continues_past_short_page() {
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let seen = offsets.clone();

        let items = collect_pages(move |offset| {
            seen.lock().unwrap().push(offset);
            async move {
                let page: Vec<usize> = match offset {
                    0 => vec![1, 2, 3],
                    3 => vec![4],
                    4 => vec![],
                    _ => panic!("unexpected offset {offset}"),
                };
                Ok(page)
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(*offsets.lock().unwrap(), vec![0, 3, 4]);
    }

    #[tokio::test]
    async fn test_collect_pages_with_server_capped_page_size() {
        // asked for 10 000 per page, served at most 1 000
        let total = 2_500;
        let items = collect_pages(move |offset| async move {
            Ok((offset..total).take(1_000).collect::<Vec<usize>>())
        })
        .await
        .unwrap();

        assert_eq!(items.len(), total);
        assert_eq!(items.last(), Some(&(total - 1)));
    }

    #[tokio::test]
    async fn test_collect_pages_empty_first_page() {
        let items: Vec<u8> = collect_pages(|_| async { Ok(Vec::new()) }).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_errors() {
        let result: Result<Vec<u8>> = collect_pages(|offset| async move {
            if offset == 0 {
                Ok(vec![0; 10])
            } else {
                bail!("page {offset} failed")
            }
        })
        .await;

        assert!(result.is_err());
    }
}
