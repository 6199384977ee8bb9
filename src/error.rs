use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 登录或会话错误
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),
    /// 页面结构错误（缺少预期的隐藏字段）
    #[error("markup error: {0}")]
    Markup(#[from] MarkupError),
    /// 网络传输错误
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
    /// 交互输入错误
    #[error("prompt error: {0}")]
    Prompt(#[from] PromptError),
    /// 配置错误
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("{0}")]
    Other(String),
}

/// 登录 / 会话错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 登录页缺少隐藏字段
    #[error("login page did not contain the expected hidden fields")]
    LoginTokensMissing,
    /// 服务器拒绝了回发（通常是令牌过期）
    #[error("server rejected postback to {url} with status {status}")]
    SessionRejected { url: String, status: u16 },
    /// 会话已失效，页面跳回登录
    #[error("session expired while loading {url}")]
    SessionExpired { url: String },
    /// 登录重试次数已用完
    #[error("giving up after {attempts} failed login attempts")]
    AttemptsExhausted { attempts: usize },
}

/// 页面结构错误
#[derive(Debug, Error)]
pub enum MarkupError {
    /// 页面中没有可用的令牌
    #[error("no anti-tampering tokens available for {url}")]
    TokensMissing { url: String },
}

/// 网络错误
#[derive(Debug, Error)]
pub enum NetworkError {
    /// 请求超时
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// 无法建立连接
    #[error("could not connect to {url}")]
    Connect { url: String },
    /// 非成功状态码
    #[error("{url} answered with status {status}")]
    BadStatus { url: String, status: u16 },
    /// 其他请求失败
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 无效的 URL
    #[error("invalid url '{url}'")]
    InvalidUrl { url: String },
}

/// 交互输入错误
#[derive(Debug, Error)]
pub enum PromptError {
    /// 输入流已关闭
    #[error("input closed while asking for {what}")]
    Closed { what: String },
    /// 终端读取失败
    #[error("failed to read {what}: {source}")]
    Failed {
        what: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("environment variable {var_name}: value '{value}' is not a valid {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("failed to parse config file {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 错误影响范围
///
/// 驱动器据此决定跳过单项、放弃当前表单还是终止整个运行
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorScope {
    Item,
    Stage,
    Run,
}

impl AppError {
    /// 该错误本身的影响范围（网络错误由策略决定，这里返回 `Item`）
    pub fn scope(&self) -> ErrorScope {
        match self {
            AppError::Network(_) => ErrorScope::Item,
            AppError::Markup(_) => ErrorScope::Stage,
            AppError::Auth(_) | AppError::Prompt(_) | AppError::Config(_) => ErrorScope::Run,
            AppError::Other(_) => ErrorScope::Stage,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network(_))
    }

    /// 创建令牌缺失错误
    pub fn tokens_missing(url: impl Into<String>) -> Self {
        AppError::Markup(MarkupError::TokensMissing { url: url.into() })
    }

    /// 创建会话被拒绝错误
    pub fn session_rejected(url: impl Into<String>, status: u16) -> Self {
        AppError::Auth(AuthError::SessionRejected {
            url: url.into(),
            status,
        })
    }

    /// 创建输入关闭错误
    pub fn prompt_closed(what: impl Into<String>) -> Self {
        AppError::Prompt(PromptError::Closed { what: what.into() })
    }

    /// 创建终端读取错误
    pub fn prompt_failed(
        what: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Prompt(PromptError::Failed {
            what: what.into(),
            source: Box::new(source),
        })
    }

    /// 根据 reqwest 错误分类网络错误
    pub fn from_reqwest(url: impl Into<String>, err: reqwest::Error) -> Self {
        let url = url.into();
        let network = if err.is_timeout() {
            NetworkError::Timeout { url }
        } else if err.is_connect() {
            NetworkError::Connect { url }
        } else {
            NetworkError::Request {
                url,
                source: Box::new(err),
            }
        };
        AppError::Network(network)
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
