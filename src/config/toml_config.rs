use crate::core::ConfigProvider;
use crate::utils::error::{Result, StatusError};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_url, validate_url_path, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.mujkaktus.cz";
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;
pub const DEFAULT_POLL_DELAY_MS: u64 = 50;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub portal: PortalConfig,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub islands: IslandsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub dashboard_path: Option<String>,
    pub session_path: Option<String>,
    pub login_path: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            dashboard_path: None,
            session_path: None,
            login_path: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub username: String,
    pub password: String,
}

// 密碼不可出現在 debug 輸出中
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IslandsConfig {
    pub poll_attempts: Option<u32>,
    pub poll_delay_ms: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StatusError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StatusError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${KAKTUS_PASSWORD})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StatusError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.http.user_agent.as_deref()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("portal.base_url", &self.portal.base_url)?;
        validate_url_path("portal.dashboard_path", self.dashboard_path())?;
        validate_url_path("portal.session_path", self.session_path())?;
        validate_url_path("portal.login_path", self.login_path())?;

        validate_non_empty_string("credentials.username", &self.credentials.username)?;
        validate_non_empty_string("credentials.password", &self.credentials.password)?;
        // 未替換的 ${VAR} 代表環境變數沒有設定
        for (field, value) in [
            ("credentials.username", &self.credentials.username),
            ("credentials.password", &self.credentials.password),
        ] {
            if value.starts_with("${") {
                return Err(StatusError::MissingConfigError {
                    field: format!("{} ({})", field, value),
                });
            }
        }

        validate_range("islands.poll_attempts", self.poll_attempts(), 1, 100)?;
        validate_range("http.timeout_seconds", self.timeout().as_secs(), 1, 600)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.portal.base_url
    }

    fn dashboard_path(&self) -> &str {
        self.portal.dashboard_path.as_deref().unwrap_or("/moje-sluzby")
    }

    fn session_path(&self) -> &str {
        self.portal.session_path.as_deref().unwrap_or("/delegate/recdef")
    }

    fn login_path(&self) -> &str {
        self.portal.login_path.as_deref().unwrap_or("/.gang/login")
    }

    fn username(&self) -> &str {
        &self.credentials.username
    }

    fn password(&self) -> &str {
        &self.credentials.password
    }

    fn poll_attempts(&self) -> u32 {
        self.islands.poll_attempts.unwrap_or(DEFAULT_POLL_ATTEMPTS)
    }

    fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.islands.poll_delay_ms.unwrap_or(DEFAULT_POLL_DELAY_MS))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
