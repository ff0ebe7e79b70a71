use crate::domain::ports::{SessionTransport, TransportResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// reqwest 實作的登入連線，所有請求共用同一個 cookie store
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().cookie_store(true).timeout(timeout);
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

// 查詢字串可能帶有帳密，日誌只記錄路徑
fn log_target(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.to_string()
        }
        Err(_) => url.split('?').next().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl SessionTransport for HttpTransport {
    async fn request(&self, url: &str) -> Result<TransportResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        tracing::debug!("HTTP {} <- {}", status, log_target(url));

        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}
