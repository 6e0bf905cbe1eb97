use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for every outbound request.
///
/// Wrappers such as [`ApiKey`](crate::fetch::auth::ApiKey) decorate a request
/// and delegate to an inner client, so authentication composes with the
/// plain [`BasicClient`](crate::fetch::BasicClient).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
