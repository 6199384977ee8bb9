//! 回发会话 - 业务能力层
//!
//! 持有会话客户端和最近一次响应中的令牌，保证每次回发都携带最新令牌

use crate::clients::SessionClient;
use crate::config::Config;
use crate::error::{AppError, AppResult, AuthError, NetworkError};
use crate::infrastructure::Transport;
use crate::models::FormData;
use crate::services::token_carrier::TokenSet;
use crate::utils::logging::truncate_text;
use tracing::{debug, warn};

/// 回发会话
///
/// 职责：
/// - 每次收到响应后立即替换令牌（响应中没有令牌时清空）
/// - 回发前附加令牌，没有令牌时拒绝发送
/// - 请求失败后令牌视为失效
pub struct PostbackSession<T: Transport> {
    client: SessionClient<T>,
    tokens: Option<TokenSet>,
    logged_in_marker: String,
}

impl<T: Transport> PostbackSession<T> {
    pub fn new(client: SessionClient<T>, config: &Config) -> Self {
        Self {
            client,
            tokens: None,
            logged_in_marker: config.logged_in_marker.to_lowercase(),
        }
    }

    pub fn client(&self) -> &SessionClient<T> {
        &self.client
    }

    /// 当前有效的令牌
    pub fn tokens(&self) -> Option<&TokenSet> {
        self.tokens.as_ref()
    }

    /// 页面是否处于登录状态（包含登录标记，忽略大小写）
    pub fn is_logged_in_page(&self, body: &str) -> bool {
        body.to_lowercase().contains(&self.logged_in_marker)
    }

    /// GET 页面并刷新令牌
    pub async fn load(&mut self, url: &str) -> AppResult<String> {
        self.tokens = None;
        let response = self.client.get(url).await?;
        if !response.is_success() {
            return Err(AppError::Network(NetworkError::BadStatus {
                url: url.to_string(),
                status: response.status,
            }));
        }
        self.refresh(url, &response.body);
        Ok(response.body)
    }

    /// GET 需要登录的页面；页面不含登录标记时视为会话失效
    pub async fn load_authenticated(&mut self, url: &str) -> AppResult<String> {
        let body = self.load(url).await?;
        if !self.is_logged_in_page(&body) {
            warn!("⚠️ {} 未包含登录标记，会话可能已失效", url);
            self.tokens = None;
            return Err(AuthError::SessionExpired {
                url: url.to_string(),
            }
            .into());
        }
        Ok(body)
    }

    /// 附加最新令牌后 POST
    ///
    /// 非成功状态码表示服务器拒绝了令牌，按会话失效处理
    pub async fn postback(&mut self, url: &str, mut form: FormData) -> AppResult<String> {
        let tokens = self
            .tokens
            .take()
            .ok_or_else(|| AppError::tokens_missing(url))?;
        tokens.attach(&mut form);

        let response = self.client.post(url, &form).await?;
        if !response.is_success() {
            warn!("⚠️ {} 拒绝回发，状态码 {}", url, response.status);
            return Err(AppError::session_rejected(url, response.status));
        }
        self.refresh(url, &response.body);
        Ok(response.body)
    }

    fn refresh(&mut self, url: &str, body: &str) {
        self.tokens = TokenSet::extract(body);
        if self.tokens.is_none() {
            debug!(
                "{} 的响应中没有令牌: {}",
                url,
                truncate_text(body.trim(), 120)
            );
        }
    }
}
