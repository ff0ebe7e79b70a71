use crate::domain::ports::{ConfigProvider, SessionTransport};
use crate::utils::error::{Result, StatusError};
use url::Url;

fn portal_url<C: ConfigProvider>(config: &C, path: &str) -> Result<Url> {
    let raw = format!("{}{}", config.base_url().trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|e| StatusError::InvalidConfigValueError {
        field: "portal.base_url".to_string(),
        value: raw.clone(),
        reason: e.to_string(),
    })
}

// 登入 URL 帶有密碼，錯誤訊息中不可出現
fn redact_credentials(error: StatusError, redacted: String) -> StatusError {
    match error {
        StatusError::HttpStatusError { status, .. } => StatusError::HttpStatusError {
            url: redacted,
            status,
        },
        StatusError::HttpError(e) => StatusError::HttpError(e.without_url()),
        other => other,
    }
}

/// 登入流程：先取得 session cookie，再帶帳密登入。
///
/// 每一步都必須回傳 2xx；cookie 由 transport 自行保存。
pub async fn bootstrap_session<T: SessionTransport, C: ConfigProvider>(
    transport: &T,
    config: &C,
) -> Result<()> {
    tracing::info!("🔐 Opening portal session as {}", config.username());

    transport.fetch(portal_url(config, config.dashboard_path())?.as_str()).await?;
    transport.fetch(portal_url(config, config.session_path())?.as_str()).await?;

    let mut login = portal_url(config, config.login_path())?;
    login
        .query_pairs_mut()
        .append_pair("username", config.username())
        .append_pair("password", config.password());
    let redacted = portal_url(config, config.login_path())?.to_string();
    transport
        .fetch(login.as_str())
        .await
        .map_err(|e| redact_credentials(e, redacted))?;

    tracing::debug!("Session established");
    Ok(())
}
