use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 骨架頁面中發現的佔位區塊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    /// 前一個兄弟元素的文字，沒有則為空字串
    pub title: String,
    /// `data-lazy-loading` JSON 中的 `rk`，無法解析時為 None
    pub request_id: Option<String>,
    pub component_id: String,
}

/// 已解析完成的島嶼：標題 + 不含佔位符的 HTML 片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIsland {
    pub title: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub amount: u64,
    pub expires: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    pub total: u64,
    pub standard: Balance,
    pub bonus: Balance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tariff {
    pub auto_subscription: bool,
    pub tariff_name: String,
    pub renewal_date: NaiveDate,
    pub gigs_left: f64,
    pub minutes_left: f64,
    pub seconds_left: f64,
    pub sms_left: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub credit: Credit,
    pub tariff: Tariff,
}
