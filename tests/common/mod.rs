#![allow(dead_code)]

use async_trait::async_trait;
use kaktus_status::core::islands::COMPONENT_IDS_PARAM;
use kaktus_status::core::{SessionTransport, TransportResponse};
use kaktus_status::{Result, TomlConfig};
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

pub fn test_config(base_url: &str, poll_attempts: u32) -> TomlConfig {
    TomlConfig::from_toml_str(&format!(
        r#"
[portal]
base_url = "{}"

[credentials]
username = "jan.novak"
password = "tajne-heslo"

[http]
timeout_seconds = 5

[islands]
poll_attempts = {}
poll_delay_ms = 0
"#,
        base_url, poll_attempts
    ))
    .unwrap()
}

/// 以固定回應模擬入口網站：島嶼請求以 `requestId.componentId` 為鍵，其餘以路徑為鍵
#[derive(Default)]
pub struct FixtureTransport {
    responses: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, body: &str) -> Self {
        self.responses.insert(key.to_string(), (200, body.to_string()));
        self
    }

    pub fn with_status(mut self, key: &str, status: u16) -> Self {
        self.responses.insert(key.to_string(), (status, String::new()));
        self
    }

    /// 收到的請求鍵，依順序
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn key(url: &str) -> String {
        let url = Url::parse(url).unwrap();
        url.query_pairs()
            .find(|(name, _)| name == COMPONENT_IDS_PARAM)
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| url.path().to_string())
    }
}

#[async_trait]
impl SessionTransport for FixtureTransport {
    async fn request(&self, url: &str) -> Result<TransportResponse> {
        let key = Self::key(url);
        self.requests.lock().unwrap().push(key.clone());

        let (status, body) = self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(TransportResponse { status, body })
    }
}

pub const SKELETON: &str = r#"<!DOCTYPE html>
<html>
<body>
    <header><h1>Můj Kaktus</h1></header>
    <div class="portlet-body">
        <h2>Můj kredit</h2>
        <div id="credit" data-lazy-loading='{"rk":"r-credit"}'></div>
        <h2>Balíček</h2>
        <div id="tariff" data-lazy-loading='{"rk":"r-tariff"}'></div>
    </div>
</body>
</html>"#;

pub const CREDIT_ISLAND: &str = r#"<div id="credit">
    <div class="credit-box">
        <span class="price">1 234 Kč</span>
        <p class="font-size-xs">Standardní kredit 1 234 Kč do 5.3.2024</p>
        <p class="font-size-xs">Bonusový kredit 0 Kč do 1.1.2024</p>
    </div>
</div>"#;

pub const TARIFF_PENDING: &str =
    r#"<div id="tariff" data-lazy-loading='{"rk":"r-tariff-2"}'></div>"#;

pub const TARIFF_ISLAND: &str = r#"<div id="tariff">
    <span class="badge">Samoobnovující</span>
    <p>Balíček: <strong>Test</strong></p>
    <div class="usage"><strong>3,5</strong><p>GB dat (data)</p></div>
    <div class="usage"><strong>120:30</strong><p>Minut</p></div>
    <div class="usage"><strong>50</strong><p>SMS</p></div>
    <p>Balíček se obnoví se <strong>1.4.2024</strong></p>
</div>"#;

/// 完整的入口網站：登入、骨架、兩個島嶼（資費島嶼需要第二次輪詢）
pub fn portal_fixture() -> FixtureTransport {
    FixtureTransport::new()
        .with("/moje-sluzby", SKELETON)
        .with("/delegate/recdef", "<html></html>")
        .with("/.gang/login", "<html>ok</html>")
        .with("r-credit.credit", CREDIT_ISLAND)
        .with("r-tariff.tariff", TARIFF_PENDING)
        .with("r-tariff-2.tariff", TARIFF_ISLAND)
}
