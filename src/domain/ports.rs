use crate::utils::error::{Result, StatusError};
use async_trait::async_trait;
use std::time::Duration;

/// 單次 HTTP 回應
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 共用同一組 cookie 的登入後連線。
///
/// 登入完成後只會被讀取，多個島嶼解析可同時透過 `&self` 使用。
#[async_trait]
pub trait SessionTransport: Send + Sync {
    async fn request(&self, url: &str) -> Result<TransportResponse>;

    /// GET 並要求 2xx，回傳 body
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.request(url).await?;
        if !response.is_success() {
            return Err(StatusError::HttpStatusError {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response.body)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn dashboard_path(&self) -> &str;
    fn session_path(&self) -> &str;
    fn login_path(&self) -> &str;
    fn username(&self) -> &str;
    fn password(&self) -> &str;
    fn poll_attempts(&self) -> u32;
    fn poll_delay(&self) -> Duration;

    fn dashboard_url(&self) -> String {
        format!("{}{}", self.base_url().trim_end_matches('/'), self.dashboard_path())
    }
}
