use reqwest::Client as HttpClient;

use crate::error::AppResult;

use super::AuthClient;

/// Session validation backed by the marketplace auth endpoint.
///
/// The caller's cookie is forwarded as-is; any upstream status other than
/// 200, and any transport failure, counts as an invalid session.
pub struct HttpAuthClient {
    http_client: HttpClient,
    auth_url: String,
}

impl HttpAuthClient {
    pub fn new(auth_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            auth_url,
        }
    }
}

#[async_trait::async_trait]
impl AuthClient for HttpAuthClient {
    async fn validate(&self, cookie: &str) -> AppResult<bool> {
        let response = self
            .http_client
            .get(&self.auth_url)
            .header("Cookie", cookie)
            .send()
            .await;

        match response {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::error!(error = %e, "Session validation request failed");
                Ok(false)
            }
        }
    }
}
