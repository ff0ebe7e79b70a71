use crate::config::toml_config::TomlConfig;
use crate::output::OutputFormat;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "kaktus-status")]
#[command(about = "Check prepaid credit and tariff status on the Kaktus customer portal")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "kaktus-config.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Output format of the status record
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Override credentials.username from the config file
    #[arg(long)]
    pub username: Option<String>,

    /// Override credentials.password from the config file
    #[arg(long, env = "KAKTUS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Validate configuration and exit without contacting the portal
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(username) = &self.username {
            config.credentials.username = username.clone();
            tracing::info!("🔧 Username overridden from command line");
        }
        if let Some(password) = &self.password {
            config.credentials.password = password.clone();
            tracing::info!("🔧 Password overridden from command line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_parse_args() {
        let args = CliArgs::parse_from(["kaktus-status", "-c", "my.toml", "--format", "json"]);

        assert_eq!(args.config, "my.toml");
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = TomlConfig::from_toml_str(
            "[credentials]\nusername = \"user\"\npassword = \"heslo\"\n",
        )
        .unwrap();
        let args = CliArgs::parse_from(["kaktus-status", "--username", "jiny"]);

        args.apply_overrides(&mut config);

        assert_eq!(config.username(), "jiny");
    }
}
