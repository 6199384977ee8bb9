//! 登录服务 - 业务能力层
//!
//! LoggedOut → LoggedIn 状态机的一次尝试；重试由调用方决定

use crate::config::Config;
use crate::error::{AppResult, AuthError};
use crate::infrastructure::Transport;
use crate::models::{FormData, LOGIN};
use crate::services::postback_session::PostbackSession;
use std::fmt;
use tracing::{info, warn};

/// 登录凭据
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 登录状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    LoggedOut,
    LoggedIn,
}

/// 尝试登录一次
///
/// 1. GET 登录页，取得令牌
/// 2. POST 凭据、校区和用户类型
/// 3. 响应包含登录标记时进入 `LoggedIn`
///
/// # 返回
/// 标记缺失时返回 `LoggedOut`；登录页没有令牌时返回 `AuthError::LoginTokensMissing`
pub async fn login<T: Transport>(
    session: &mut PostbackSession<T>,
    config: &Config,
    credentials: &Credentials,
) -> AppResult<LoginState> {
    let url = config.page_url(LOGIN.path)?;

    session.load(&url).await?;
    if session.tokens().is_none() {
        warn!("⚠️ 登录页中没有找到隐藏字段");
        return Err(AuthError::LoginTokensMissing.into());
    }

    let body = session.postback(&url, login_form(config, credentials)).await?;

    if session.is_logged_in_page(&body) {
        info!("✓ 用户 {} 登录成功", credentials.username);
        Ok(LoginState::LoggedIn)
    } else {
        warn!("⚠️ 用户 {} 登录失败", credentials.username);
        Ok(LoginState::LoggedOut)
    }
}

/// 登录表单（不含令牌）
pub fn login_form(config: &Config, credentials: &Credentials) -> FormData {
    let mut form = FormData::new();
    form.set(LOGIN.campus_field, config.campus.as_str())
        .set(LOGIN.user_type_field, config.user_type.as_str())
        .set(LOGIN.username_field, credentials.username.as_str())
        .set(LOGIN.password_field, credentials.password.as_str())
        .set(LOGIN.button_field, LOGIN.button_value);
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_fields() {
        let credentials = Credentials {
            username: "200123".to_string(),
            password: "s3cret".to_string(),
        };
        let form = login_form(&Config::default(), &credentials);

        assert_eq!(form.get(LOGIN.campus_field), Some("Islamabad"));
        assert_eq!(form.get(LOGIN.user_type_field), Some("Student/Alumni"));
        assert_eq!(form.get(LOGIN.username_field), Some("200123"));
        assert_eq!(form.get(LOGIN.password_field), Some("s3cret"));
        assert_eq!(form.get(LOGIN.button_field), Some("Login"));
    }

    #[test]
    fn test_debug_hides_password() {
        let credentials = Credentials {
            username: "200123".to_string(),
            password: "s3cret".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("s3cret"));
    }
}
