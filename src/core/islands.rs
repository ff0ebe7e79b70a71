use crate::core::extract::{parse_selector, previous_element_sibling, text_content};
use crate::domain::model::{Island, ResolvedIsland};
use crate::domain::ports::{ConfigProvider, SessionTransport};
use crate::utils::error::{Result, StatusError};
use futures::future::try_join_all;
use scraper::{ElementRef, Html};
use url::Url;

pub const PLACEHOLDER_ATTRIBUTE: &str = "data-lazy-loading";
pub const PLACEHOLDER_SELECTOR: &str = "[data-lazy-loading]";
pub const COMPONENT_IDS_PARAM: &str = "_rkaktusvcc_WAR_vcc_componentIds";

const LAZY_LOADING_PARAMS: [(&str, &str); 8] = [
    ("p_p_id", "rkaktusvcc_WAR_vcc"),
    ("p_p_lifecycle", "0"),
    ("p_p_state", "exclusive"),
    ("p_p_mode", "view"),
    ("p_p_col_id", "column-1"),
    ("p_p_col_count", "1"),
    ("_rkaktusvcc_WAR_vcc_moduleCode", "dashboard"),
    ("_rkaktusvcc_WAR_vcc_lazyLoading", "true"),
];

/// 空白回應視為無法解析
fn ensure_markup(body: &str, context: &str) -> Result<()> {
    if body.trim().is_empty() {
        return Err(StatusError::HtmlParseError {
            context: context.to_string(),
            message: "empty response body".to_string(),
        });
    }
    Ok(())
}

pub fn parse_document(body: &str, context: &str) -> Result<Html> {
    ensure_markup(body, context)?;
    Ok(Html::parse_document(body))
}

pub fn parse_fragment(body: &str, context: &str) -> Result<Html> {
    ensure_markup(body, context)?;
    Ok(Html::parse_fragment(body))
}

fn parse_request_id(marker: Option<&str>) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(marker?).ok()?;
    let request_id = match value.get("rk")? {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(request_id).filter(|id| !id.is_empty())
}

/// 從佔位元素讀出標題、request id 與 component id。
///
/// 標記屬性的 JSON 壞掉時不會失敗，只會讓 request id 變成 None。
pub fn parse_island(el: ElementRef<'_>) -> Island {
    let title = previous_element_sibling(el)
        .map(|sibling| text_content(sibling).trim().to_string())
        .unwrap_or_default();
    let component_id = el.value().id().unwrap_or_default().to_string();
    let marker = el.value().attr(PLACEHOLDER_ATTRIBUTE);
    let request_id = parse_request_id(marker);

    if request_id.is_none() {
        tracing::warn!(
            "⚠️ Placeholder '{}' has no usable request id in {:?}",
            component_id,
            marker
        );
    }

    Island {
        title,
        request_id,
        component_id,
    }
}

pub fn discover_islands(container: ElementRef<'_>) -> Result<Vec<Island>> {
    let marker = parse_selector(PLACEHOLDER_SELECTOR)?;
    Ok(container.select(&marker).map(parse_island).collect())
}

/// 單一島嶼的定址字串 `requestId.componentId`
pub fn component_address(request_id: &str, component_id: &str) -> String {
    format!("{}.{}", request_id, component_id)
}

/// 多個島嶼可用 `|` 串在同一個請求中
pub fn batch_address<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(request_id, component_id)| component_address(request_id, component_id))
        .collect::<Vec<_>>()
        .join("|")
}

pub fn lazy_loading_url<C: ConfigProvider + ?Sized>(config: &C, address: &str) -> Result<String> {
    let dashboard = config.dashboard_url();
    let mut url = Url::parse(&dashboard).map_err(|e| StatusError::InvalidConfigValueError {
        field: "portal.base_url".to_string(),
        value: dashboard.clone(),
        reason: e.to_string(),
    })?;

    url.query_pairs_mut()
        .extend_pairs(LAZY_LOADING_PARAMS)
        .append_pair(COMPONENT_IDS_PARAM, address);

    Ok(url.to_string())
}

#[derive(Debug)]
enum PollOutcome {
    Pending(Island),
    Resolved(String),
}

/// 檢查一次輪詢的回應：仍是佔位符就回傳新的 id，否則取出原始 component id 的元素
fn inspect_response(body: &str, original_component_id: &str) -> Result<PollOutcome> {
    let fragment = parse_fragment(body, &format!("island {}", original_component_id))?;

    let marker = parse_selector(PLACEHOLDER_SELECTOR)?;
    if let Some(pending) = fragment.select(&marker).next() {
        return Ok(PollOutcome::Pending(parse_island(pending)));
    }

    let with_id = parse_selector("[id]")?;
    fragment
        .select(&with_id)
        .find(|el| el.value().id() == Some(original_component_id))
        .map(|el| PollOutcome::Resolved(el.html()))
        .ok_or_else(|| StatusError::ResolvedElementNotFoundError {
            component_id: original_component_id.to_string(),
        })
}

pub struct IslandResolver<'a, T: SessionTransport, C: ConfigProvider> {
    transport: &'a T,
    config: &'a C,
}

impl<'a, T: SessionTransport, C: ConfigProvider> IslandResolver<'a, T, C> {
    pub fn new(transport: &'a T, config: &'a C) -> Self {
        Self { transport, config }
    }

    /// 掃描容器並同時解析所有島嶼
    pub async fn resolve_islands(&self, container: ElementRef<'_>) -> Result<Vec<ResolvedIsland>> {
        let islands = discover_islands(container)?;
        self.resolve_all(&islands).await
    }

    /// 所有島嶼同時解析；任何一個失敗就中止整體（其餘未完成的請求被丟棄）
    pub async fn resolve_all(&self, islands: &[Island]) -> Result<Vec<ResolvedIsland>> {
        if islands.is_empty() {
            tracing::debug!("No lazy-loaded islands to resolve");
            return Ok(Vec::new());
        }

        tracing::info!("🏝️ Resolving {} lazy-loaded islands", islands.len());
        try_join_all(islands.iter().map(|island| self.resolve_island(island))).await
    }

    pub async fn resolve_island(&self, island: &Island) -> Result<ResolvedIsland> {
        self.poll(island)
            .await
            .map_err(|e| e.in_island(island.title.as_str(), island.component_id.as_str()))
    }

    async fn poll(&self, island: &Island) -> Result<ResolvedIsland> {
        let budget = self.config.poll_attempts();
        let delay = self.config.poll_delay();
        let mut remaining = budget;
        let mut request_id = island.request_id.clone();
        let mut component_id = island.component_id.clone();

        loop {
            if remaining == 0 {
                return Err(StatusError::PollBudgetExhaustedError {
                    component_id: island.component_id.clone(),
                    attempts: budget,
                });
            }

            let rid = request_id
                .as_deref()
                .ok_or_else(|| StatusError::MissingRequestIdError {
                    component_id: component_id.clone(),
                })?;
            let url = lazy_loading_url(self.config, &component_address(rid, &component_id))?;

            tracing::debug!(
                "📡 Polling island '{}' as {}.{} (attempt {}/{})",
                island.title,
                rid,
                component_id,
                budget - remaining + 1,
                budget
            );

            let body = self.transport.fetch(&url).await?;
            remaining -= 1;

            match inspect_response(&body, &island.component_id)? {
                PollOutcome::Resolved(html) => {
                    tracing::debug!(
                        "✅ Island '{}' resolved after {} attempt(s)",
                        island.title,
                        budget - remaining
                    );
                    return Ok(ResolvedIsland {
                        title: island.title.clone(),
                        html,
                    });
                }
                PollOutcome::Pending(next) => {
                    tracing::debug!(
                        "⏳ Island '{}' still rendering, next token {:?}.{}",
                        island.title,
                        next.request_id,
                        next.component_id
                    );
                    request_id = next.request_id;
                    component_id = next.component_id;

                    if remaining > 0 && !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct TestConfig;

    impl ConfigProvider for TestConfig {
        fn base_url(&self) -> &str {
            "https://www.mujkaktus.cz/"
        }
        fn dashboard_path(&self) -> &str {
            "/moje-sluzby"
        }
        fn session_path(&self) -> &str {
            "/delegate/recdef"
        }
        fn login_path(&self) -> &str {
            "/.gang/login"
        }
        fn username(&self) -> &str {
            "user"
        }
        fn password(&self) -> &str {
            "secret"
        }
        fn poll_attempts(&self) -> u32 {
            10
        }
        fn poll_delay(&self) -> Duration {
            Duration::ZERO
        }
    }

    #[test]
    fn test_discover_islands() {
        let html = Html::parse_document(
            r#"<div class="portlet-body">
                <h2>Můj kredit</h2>
                <div id="c1" data-lazy-loading='{"rk":"r1"}'></div>
                <div id="c2" data-lazy-loading='{"rk":42}'></div>
                <h2>Balíček</h2>
                <div id="c3" data-lazy-loading='not json'></div>
            </div>"#,
        );

        let islands = discover_islands(html.root_element()).unwrap();

        assert_eq!(islands.len(), 3);
        assert_eq!(
            islands[0],
            Island {
                title: "Můj kredit".to_string(),
                request_id: Some("r1".to_string()),
                component_id: "c1".to_string(),
            }
        );
        // 前一個兄弟元素是 c1 佔位符，標題為空
        assert_eq!(islands[1].title, "");
        assert_eq!(islands[1].request_id.as_deref(), Some("42"));
        assert_eq!(islands[2].title, "Balíček");
        assert_eq!(islands[2].request_id, None);
    }

    #[test]
    fn test_discover_islands_without_placeholders() {
        let html = Html::parse_document(r#"<div class="portlet-body"><p>Hotovo</p></div>"#);
        assert!(discover_islands(html.root_element()).unwrap().is_empty());
    }

    #[test]
    fn test_addresses() {
        assert_eq!(component_address("r1", "c1"), "r1.c1");
        assert_eq!(batch_address([("r1", "c1"), ("r2", "c2")]), "r1.c1|r2.c2");
    }

    #[test]
    fn test_lazy_loading_url() {
        let url = lazy_loading_url(&TestConfig, "r1.c1").unwrap();

        assert!(url.starts_with("https://www.mujkaktus.cz/moje-sluzby?p_p_id=rkaktusvcc_WAR_vcc"));
        assert!(url.contains("_rkaktusvcc_WAR_vcc_lazyLoading=true"));
        assert!(url.ends_with("_rkaktusvcc_WAR_vcc_componentIds=r1.c1"));
    }

    #[test]
    fn test_inspect_response_pending() {
        let outcome = inspect_response(
            r#"<div id="c9" data-lazy-loading='{"rk":"r2"}'></div>"#,
            "c1",
        )
        .unwrap();

        match outcome {
            PollOutcome::Pending(next) => {
                assert_eq!(next.request_id.as_deref(), Some("r2"));
                assert_eq!(next.component_id, "c9");
            }
            other => panic!("expected pending, got {:?}", other),
        }
    }

    #[test]
    fn test_inspect_response_resolves_original_id() {
        let outcome = inspect_response(
            r#"<div id="wrapper"><div id="c1"><span class="price">250 Kč</span></div></div>"#,
            "c1",
        )
        .unwrap();

        match outcome {
            PollOutcome::Resolved(html) => {
                assert!(html.starts_with(r#"<div id="c1">"#));
                assert!(html.contains("250 Kč"));
            }
            other => panic!("expected resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_inspect_response_errors() {
        assert!(matches!(
            inspect_response("   ", "c1"),
            Err(StatusError::HtmlParseError { .. })
        ));
        assert!(matches!(
            inspect_response(r#"<div id="c2">done</div>"#, "c1"),
            Err(StatusError::ResolvedElementNotFoundError { .. })
        ));
    }
}
