use crate::error::{AppError, AppResult, ConfigError, ErrorScope, NetworkError};
use crate::models::Rating;
use crate::services::correlation::TieBreak;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use url::Url;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "proforma.toml";

/// 网络错误处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkPolicy {
    /// 放弃当前条目，重新加载页面后继续
    #[default]
    SkipItem,
    /// 放弃当前表单，继续下一个表单
    AbortStage,
    /// 终止整个运行
    AbortRun,
}

impl NetworkPolicy {
    /// 结合策略得出错误的实际影响范围
    pub fn scope_for(&self, err: &AppError) -> ErrorScope {
        if !err.is_network() {
            return err.scope();
        }
        match self {
            NetworkPolicy::SkipItem => ErrorScope::Item,
            NetworkPolicy::AbortStage => ErrorScope::Stage,
            NetworkPolicy::AbortRun => ErrorScope::Run,
        }
    }
}

impl FromStr for NetworkPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip_item" => Ok(NetworkPolicy::SkipItem),
            "abort_stage" => Ok(NetworkPolicy::AbortStage),
            "abort_run" => Ok(NetworkPolicy::AbortRun),
            other => Err(format!("unknown network policy '{}'", other)),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 门户根地址
    pub base_url: String,
    /// 固定的 User-Agent
    pub user_agent: String,
    /// 请求超时（秒），为空时使用传输层默认值
    pub request_timeout_secs: Option<u64>,
    /// 登录表单中的校区
    pub campus: String,
    /// 登录表单中的用户类型
    pub user_type: String,
    /// 登录成功后页面中出现的标记（忽略大小写）
    pub logged_in_marker: String,
    /// 未自定义评分时使用的评分
    pub default_rating: Rating,
    /// 多个讲师匹配同一选项时的处理方式
    pub tie_break: TieBreak,
    /// 网络错误处理策略
    pub network_policy: NetworkPolicy,
    /// 最大登录次数，为空表示不限
    pub max_login_attempts: Option<usize>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://portals.au.edu.pk/qec/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            request_timeout_secs: None,
            campus: "Islamabad".to_string(),
            user_type: "Student/Alumni".to_string(),
            logged_in_marker: "logout".to_string(),
            default_rating: Rating::A,
            tie_break: TieBreak::LastWins,
            network_policy: NetworkPolicy::SkipItem,
            max_login_attempts: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：配置文件（可选）+ 环境变量
    ///
    /// 配置文件路径取自 `PROFORMA_CONFIG`，否则使用当前目录下的 `proforma.toml`（存在时）
    pub fn load() -> AppResult<Self> {
        let explicit = std::env::var("PROFORMA_CONFIG").ok();
        let base = match explicit.as_deref() {
            Some(path) => Self::from_file(Path::new(path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        base.with_env()
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::Config(ConfigError::TomlParseFailed { source, .. }) => {
                AppError::Config(ConfigError::TomlParseFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: String::new(),
            source,
        })?;
        Ok(config)
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env(self) -> AppResult<Self> {
        Ok(Self {
            base_url: std::env::var("PROFORMA_BASE_URL").unwrap_or(self.base_url),
            user_agent: std::env::var("PROFORMA_USER_AGENT").unwrap_or(self.user_agent),
            request_timeout_secs: env_parse("PROFORMA_TIMEOUT_SECS", "integer")?
                .or(self.request_timeout_secs),
            campus: std::env::var("PROFORMA_CAMPUS").unwrap_or(self.campus),
            user_type: std::env::var("PROFORMA_USER_TYPE").unwrap_or(self.user_type),
            logged_in_marker: std::env::var("PROFORMA_LOGGED_IN_MARKER")
                .unwrap_or(self.logged_in_marker),
            default_rating: env_parse("PROFORMA_DEFAULT_RATING", "rating (A-D)")?
                .unwrap_or(self.default_rating),
            tie_break: env_parse("PROFORMA_TIE_BREAK", "tie-break policy")?
                .unwrap_or(self.tie_break),
            network_policy: env_parse("PROFORMA_NETWORK_POLICY", "network policy")?
                .unwrap_or(self.network_policy),
            max_login_attempts: env_parse("PROFORMA_MAX_LOGIN_ATTEMPTS", "integer")?
                .or(self.max_login_attempts),
            verbose_logging: env_parse("VERBOSE_LOGGING", "boolean")?
                .unwrap_or(self.verbose_logging),
        })
    }

    /// 拼接门户下的页面地址
    pub fn page_url(&self, path: &str) -> AppResult<String> {
        let invalid = || {
            AppError::Network(NetworkError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
            })
        };
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|_| invalid())?;
        let url = base.join(path).map_err(|_| invalid())?;
        Ok(url.to_string())
    }
}

fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
