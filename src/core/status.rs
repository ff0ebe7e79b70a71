use crate::adapters::session::bootstrap_session;
use crate::core::extract::{parse_selector, FieldQuery, ValueLocation};
use crate::core::islands::{discover_islands, parse_document, parse_fragment, IslandResolver};
use crate::core::normalize::{extract_leading_integer, parse_locale_date, parse_locale_decimal};
use crate::domain::model::{Balance, Credit, Island, ResolvedIsland, StatusRecord, Tariff};
use crate::domain::ports::{ConfigProvider, SessionTransport};
use crate::utils::error::{Result, StatusError};
use scraper::ElementRef;

/// 整個儀表板的根容器
pub const CONTAINER_SELECTOR: &str = ".portlet-body";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IslandRole {
    Credit,
    Tariff,
}

impl IslandRole {
    pub fn label(self) -> &'static str {
        match self {
            IslandRole::Credit => "kredit",
            IslandRole::Tariff => "balíč",
        }
    }

    pub fn matches(self, title: &str) -> bool {
        title.to_lowercase().contains(self.label())
    }
}

/// 欄位名稱 + 所在島嶼 + 擷取規則
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub role: IslandRole,
    pub query: FieldQuery,
}

impl FieldRule {
    const fn new(name: &'static str, role: IslandRole, query: FieldQuery) -> Self {
        Self { name, role, query }
    }

    fn text(&self, root: Option<ElementRef<'_>>) -> Result<String> {
        self.query
            .value_or_empty(root)
            .map_err(|e| e.in_field(self.name))
    }

    fn present(&self, root: Option<ElementRef<'_>>) -> Result<bool> {
        Ok(self
            .query
            .find(root)
            .map_err(|e| e.in_field(self.name))?
            .is_some())
    }
}

pub const CREDIT_TOTAL: FieldRule = FieldRule::new(
    "credit.total",
    IslandRole::Credit,
    FieldQuery::new(".price", "", ValueLocation::SelfText),
);
pub const CREDIT_STANDARD: FieldRule = FieldRule::new(
    "credit.standard",
    IslandRole::Credit,
    FieldQuery::new("p.font-size-xs", "standard", ValueLocation::SelfText),
);
pub const CREDIT_BONUS: FieldRule = FieldRule::new(
    "credit.bonus",
    IslandRole::Credit,
    FieldQuery::new("p.font-size-xs", "bonus", ValueLocation::SelfText),
);
pub const TARIFF_DATA: FieldRule = FieldRule::new(
    "tariff.gigsLeft",
    IslandRole::Tariff,
    FieldQuery::new("p", "data", ValueLocation::SiblingBefore),
);
pub const TARIFF_MINUTES: FieldRule = FieldRule::new(
    "tariff.minutesLeft",
    IslandRole::Tariff,
    FieldQuery::new("p", "minut", ValueLocation::SiblingBefore),
);
pub const TARIFF_SMS: FieldRule = FieldRule::new(
    "tariff.smsLeft",
    IslandRole::Tariff,
    FieldQuery::new("p", "sms", ValueLocation::SiblingBefore),
);
pub const TARIFF_NAME: FieldRule = FieldRule::new(
    "tariff.tariffName",
    IslandRole::Tariff,
    FieldQuery::new("p", "balíček:", ValueLocation::NestedDescendant("strong")),
);
pub const TARIFF_AUTO_RENEWAL: FieldRule = FieldRule::new(
    "tariff.autoSubscription",
    IslandRole::Tariff,
    FieldQuery::new("span.badge", "samoobnovující", ValueLocation::SelfText),
);
pub const TARIFF_RENEWAL: FieldRule = FieldRule::new(
    "tariff.renewalDate",
    IslandRole::Tariff,
    FieldQuery::new("p", "obnoví se", ValueLocation::NestedDescendant("strong")),
);

pub fn find_island(islands: &[ResolvedIsland], role: IslandRole) -> Result<&ResolvedIsland> {
    islands
        .iter()
        .find(|island| role.matches(&island.title))
        .ok_or_else(|| StatusError::IslandNotFoundError {
            label: role.label().to_string(),
        })
}

fn parse_field<T>(field: &str, text: &str, parse: impl FnOnce(&str) -> Result<T>) -> Result<T> {
    parse(text).map_err(|e| e.in_field(field))
}

fn non_negative(field: &str, text: &str, value: f64) -> Result<f64> {
    if value < 0.0 {
        return Err(StatusError::ValueParseError {
            kind: "non-negative number".to_string(),
            input: text.to_string(),
        }
        .in_field(field));
    }
    Ok(value)
}

fn decimal_field(field: &str, text: &str) -> Result<f64> {
    let value = parse_field(field, text, parse_locale_decimal)?;
    non_negative(field, text, value)
}

fn balance(rule: &FieldRule, root: Option<ElementRef<'_>>) -> Result<Balance> {
    let text = rule.text(root)?;
    Ok(Balance {
        amount: parse_field(&format!("{}.amount", rule.name), &text, extract_leading_integer)?,
        expires: parse_field(&format!("{}.expires", rule.name), &text, parse_locale_date)?,
    })
}

fn credit(root: Option<ElementRef<'_>>) -> Result<Credit> {
    let total = CREDIT_TOTAL.text(root)?;
    Ok(Credit {
        total: parse_field(CREDIT_TOTAL.name, &total, extract_leading_integer)?,
        standard: balance(&CREDIT_STANDARD, root)?,
        bonus: balance(&CREDIT_BONUS, root)?,
    })
}

fn tariff(root: Option<ElementRef<'_>>) -> Result<Tariff> {
    let data = TARIFF_DATA.text(root)?;
    let minutes = TARIFF_MINUTES.text(root)?;
    let sms = TARIFF_SMS.text(root)?;
    let renewal = TARIFF_RENEWAL.text(root)?;

    // "MM:SS"：冒號後面的部分另外當作秒數解析
    let (whole_minutes, seconds) = match minutes.split_once(':') {
        Some((whole, seconds)) => (whole, seconds),
        None => (minutes.as_str(), ""),
    };
    let seconds_left = decimal_field("tariff.secondsLeft", seconds)?;
    let minutes_left = decimal_field(TARIFF_MINUTES.name, whole_minutes)? + seconds_left / 60.0;

    Ok(Tariff {
        auto_subscription: TARIFF_AUTO_RENEWAL.present(root)?,
        tariff_name: TARIFF_NAME.text(root)?.trim().to_string(),
        renewal_date: parse_field(TARIFF_RENEWAL.name, &renewal, parse_locale_date)?,
        gigs_left: decimal_field(TARIFF_DATA.name, &data)?,
        minutes_left,
        seconds_left,
        sms_left: decimal_field(TARIFF_SMS.name, &sms)?,
    })
}

/// 從已解析的島嶼組出狀態紀錄，任何欄位失敗都會中止
pub fn assemble_status(islands: &[ResolvedIsland]) -> Result<StatusRecord> {
    let credit_island = find_island(islands, IslandRole::Credit)?;
    let tariff_island = find_island(islands, IslandRole::Tariff)?;

    let credit_html = parse_fragment(&credit_island.html, "credit island")?;
    let tariff_html = parse_fragment(&tariff_island.html, "tariff island")?;

    Ok(StatusRecord {
        credit: credit(Some(credit_html.root_element()))?,
        tariff: tariff(Some(tariff_html.root_element()))?,
    })
}

/// 在骨架頁面中找到根容器並列出其中的佔位島嶼
pub fn skeleton_islands(body: &str) -> Result<Vec<Island>> {
    let document = parse_document(body, "dashboard skeleton")?;
    let container_selector = parse_selector(CONTAINER_SELECTOR)?;
    let container = document.select(&container_selector).next().ok_or_else(|| {
        StatusError::ContainerNotFoundError {
            selector: CONTAINER_SELECTOR.to_string(),
        }
    })?;

    discover_islands(container)
}

pub struct StatusChecker<T: SessionTransport, C: ConfigProvider> {
    transport: T,
    config: C,
}

impl<T: SessionTransport, C: ConfigProvider> StatusChecker<T, C> {
    pub fn new(transport: T, config: C) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// 登入 → 取得骨架 → 解析島嶼 → 擷取欄位
    pub async fn check_status(&self) -> Result<StatusRecord> {
        bootstrap_session(&self.transport, &self.config).await?;

        let skeleton = self.transport.fetch(&self.config.dashboard_url()).await?;
        let islands = skeleton_islands(&skeleton)?;
        tracing::info!("📄 Dashboard skeleton has {} islands", islands.len());

        let resolved = IslandResolver::new(&self.transport, &self.config)
            .resolve_all(&islands)
            .await?;

        let record = assemble_status(&resolved)?;
        tracing::info!(
            "✅ Status check complete: {} Kč credit, tariff '{}'",
            record.credit.total,
            record.tariff.tariff_name
        );
        Ok(record)
    }
}
