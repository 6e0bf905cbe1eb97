use crate::fetch::client::HttpClient;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects a credential as an HTTP header.
///
/// The header is validated once at construction, so every request sent
/// through the wrapper carries the same, well-formed value.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Sends `key` verbatim in the header called `header_name`.
    pub fn header(inner: C, header_name: &str, key: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())?;
        let mut value = HeaderValue::from_str(key)?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name,
            value,
        })
    }

    /// Uses `Authorization: Bearer <token>`, as returned by the login endpoint.
    pub fn bearer(inner: C, token: &str) -> Result<Self> {
        Self::header(inner, AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    #[test]
    fn test_bearer_header() {
        let client = ApiKey::bearer(BasicClient::new(), "abc123").unwrap();

        assert_eq!(client.header_name, AUTHORIZATION);
        assert_eq!(client.value.to_str().unwrap(), "Bearer abc123");
        assert!(client.value.is_sensitive());
    }

    #[test]
    fn test_invalid_header_rejected() {
        assert!(ApiKey::header(BasicClient::new(), "bad header", "x").is_err());
        assert!(ApiKey::bearer(BasicClient::new(), "line\nbreak").is_err());
    }
}
