/// 会话客户端
///
/// 封装与门户之间的 GET / POST 交换，只负责传输，不读取也不更新令牌
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::models::{FormData, LOGIN};
use tracing::debug;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 会话客户端
pub struct SessionClient<T: Transport> {
    transport: T,
    user_agent: String,
    referer: String,
}

impl<T: Transport> SessionClient<T> {
    /// 创建新的会话客户端
    ///
    /// 所有请求都带固定的 User-Agent，Referer 指向登录页
    pub fn new(transport: T, config: &Config) -> AppResult<Self> {
        Ok(Self {
            transport,
            user_agent: config.user_agent.clone(),
            referer: config.page_url(LOGIN.path)?,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 发送请求
    ///
    /// # 参数
    /// - `method`: 请求方法
    /// - `url`: 完整地址
    /// - `form`: POST 表单（GET 时忽略）
    ///
    /// # 返回
    /// 返回状态码与正文
    pub async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        form: Option<&FormData>,
    ) -> AppResult<HttpResponse> {
        let request = self.build_request(method, url, form);
        debug!(
            "发送请求 {:?} {} (表单字段: {})",
            method,
            url,
            form.map(|f| f.len()).unwrap_or(0)
        );
        self.transport.execute(request).await
    }

    pub async fn get(&self, url: &str) -> AppResult<HttpResponse> {
        self.request(HttpMethod::Get, url, None).await
    }

    pub async fn post(&self, url: &str, form: &FormData) -> AppResult<HttpResponse> {
        self.request(HttpMethod::Post, url, Some(form)).await
    }

    /// 构建请求
    fn build_request(&self, method: HttpMethod, url: &str, form: Option<&FormData>) -> HttpRequest {
        let mut headers = vec![
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Referer".to_string(), self.referer.clone()),
        ];

        let body = match (method, form) {
            (HttpMethod::Post, Some(form)) => {
                headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
                Some(form.encode())
            }
            _ => None,
        };

        HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        requests: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, request: HttpRequest) -> AppResult<HttpResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(HttpResponse::new(200, "ok"))
        }
    }

    fn client() -> SessionClient<RecordingTransport> {
        SessionClient::new(RecordingTransport::default(), &Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_get_has_no_body_but_fixed_headers() {
        let client = client();
        let response = client.get("https://portals.au.edu.pk/qec/p1.aspx").await.unwrap();
        assert_eq!(response.body, "ok");

        let requests = client.transport().requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.body.is_none());
        assert!(request.header("Content-Type").is_none());
        assert_eq!(
            request.header("referer"),
            Some("https://portals.au.edu.pk/qec/login.aspx")
        );
        assert_eq!(request.header("User-Agent"), Some(Config::default().user_agent.as_str()));
    }

    #[tokio::test]
    async fn test_post_is_url_encoded() {
        let client = client();
        let mut form = FormData::new();
        form.set("__VIEWSTATE", "a+b/c=").set("q1", "A");
        client.post("https://portals.au.edu.pk/qec/p1.aspx", &form).await.unwrap();

        let requests = client.transport().requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("Content-Type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(request.body.as_deref(), Some("__VIEWSTATE=a%2Bb%2Fc%3D&q1=A"));
    }
}
