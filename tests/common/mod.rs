//! 集成测试共用的假门户与假终端

#![allow(dead_code)]

use async_trait::async_trait;
use proforma_autofill::error::{AppError, AppResult, NetworkError};
use proforma_autofill::infrastructure::{HttpMethod, HttpRequest, HttpResponse, Transport};
use proforma_autofill::models::proforma::{COURSE_LABEL_ID, EVENT_TARGET_FIELD};
use proforma_autofill::models::{FormData, Proforma, LOGIN};
use proforma_autofill::ui::{ProgressRow, Reporter};
use proforma_autofill::Config;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

pub const BASE_URL: &str = "https://portal.test/qec/";
pub const USERNAME: &str = "01-134201-001";
pub const PASSWORD: &str = "secret";

pub fn test_config() -> Config {
    Config {
        base_url: BASE_URL.to_string(),
        ..Config::default()
    }
}

/// 按路径与方法响应的假门户
///
/// - 登录页不含登录标记，密码正确时返回带 Logout 链接的首页
/// - 表单页的每次响应都带新的令牌
/// - 讲师选中回发的响应包含课程标签
#[derive(Default)]
pub struct FakePortal {
    instructors: Vec<(String, String)>,
    courses: HashMap<String, String>,
    subjects: Vec<(String, String)>,
    online: Vec<(String, String)>,
    failing_submissions: HashSet<String>,
    tokenless_pages: HashSet<String>,
    state: Mutex<PortalState>,
}

#[derive(Default)]
struct PortalState {
    requests: Vec<HttpRequest>,
    served: usize,
    tokenless_logins: usize,
}

impl FakePortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructor(mut self, value: &str, label: &str, course: &str) -> Self {
        self.instructors.push((value.to_string(), label.to_string()));
        self.courses.insert(value.to_string(), course.to_string());
        self
    }

    pub fn subject(mut self, value: &str, label: &str) -> Self {
        self.subjects.push((value.to_string(), label.to_string()));
        self
    }

    pub fn online_course(mut self, value: &str, label: &str) -> Self {
        self.online.push((value.to_string(), label.to_string()));
        self
    }

    /// 该选项的完整提交请求返回超时
    pub fn fail_submission_of(mut self, value: &str) -> Self {
        self.failing_submissions.insert(value.to_string());
        self
    }

    /// 前 `count` 次 GET 登录页时不返回隐藏字段
    pub fn tokenless_login_pages(mut self, count: usize) -> Self {
        if let Ok(state) = self.state.get_mut() {
            state.tokenless_logins = count;
        }
        self
    }

    /// 该表单页的所有响应都不带隐藏字段
    pub fn tokenless_page(mut self, path: &str) -> Self {
        self.tokenless_pages.insert(path.to_string());
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state
            .lock()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    /// 发往某页面的全部请求
    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| page_of(&r.url) == path)
            .collect()
    }

    /// 发往某页面的完整提交（不含选中回发）
    pub fn submissions_to(&self, path: &str) -> Vec<FormData> {
        self.requests_to(path)
            .into_iter()
            .filter(|r| r.method == HttpMethod::Post)
            .map(|r| FormData::decode(r.body.as_deref().unwrap_or_default()))
            .filter(|form| !form.contains(EVENT_TARGET_FIELD))
            .collect()
    }

    fn next_serial(&self) -> usize {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.served += 1;
        state.served
    }

    /// 本次 GET 登录页是否应缺少隐藏字段
    fn take_tokenless_login(&self) -> bool {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.tokenless_logins == 0 {
            return false;
        }
        state.tokenless_logins -= 1;
        true
    }

    fn login_page(&self, serial: usize, with_tokens: bool) -> String {
        let hidden = if with_tokens {
            hidden_fields(serial)
        } else {
            String::new()
        };
        format!(
            r#"<html><body><form method="post" action="./login.aspx" id="aspnetForm">
{}
<select name="{}"><option value="Islamabad">Islamabad</option></select>
<input name="{}" type="text" />
<input name="{}" type="password" />
<input type="submit" name="{}" value="Login" />
</form></body></html>"#,
            hidden,
            LOGIN.campus_field,
            LOGIN.username_field,
            LOGIN.password_field,
            LOGIN.button_field,
        )
    }

    fn form_page(&self, proforma: &Proforma, serial: usize, extra: &str) -> String {
        let options = match proforma.path {
            "p1.aspx" => &self.subjects,
            "p10.aspx" => &self.instructors,
            _ => &self.online,
        };
        let rendered: String = options
            .iter()
            .map(|(value, label)| format!(r#"<option value="{}">{}</option>"#, value, label))
            .collect();
        let hidden = if self.tokenless_pages.contains(proforma.path) {
            String::new()
        } else {
            hidden_fields(serial)
        };
        format!(
            r#"<html><body><form method="post" action="./{}" id="aspnetForm">
{}
<a id="ctl00_lnkLogout" href="logout.aspx">Logout</a>
<select name="{}" id="ddl"><option value="0">-- Select --</option>{}</select>
{}
</form></body></html>"#,
            proforma.path,
            hidden,
            proforma.dropdown,
            rendered,
            extra,
        )
    }

    fn respond(&self, request: &HttpRequest) -> AppResult<HttpResponse> {
        let serial = self.next_serial();
        let path = page_of(&request.url);
        let form = FormData::decode(request.body.as_deref().unwrap_or_default());

        if path == LOGIN.path {
            let body = match request.method {
                HttpMethod::Post if form.get(LOGIN.password_field) == Some(PASSWORD) => format!(
                    r#"<html><body>{}<a href="logout.aspx">Logout</a> Welcome</body></html>"#,
                    hidden_fields(serial)
                ),
                HttpMethod::Get => self.login_page(serial, !self.take_tokenless_login()),
                _ => self.login_page(serial, true),
            };
            return Ok(HttpResponse::new(200, body));
        }

        let Some(proforma) = Proforma::all().into_iter().find(|p| p.path == path) else {
            return Ok(HttpResponse::new(404, "not found"));
        };

        if request.method == HttpMethod::Get {
            return Ok(HttpResponse::new(200, self.form_page(&proforma, serial, "")));
        }

        let selected = form.get(proforma.dropdown).unwrap_or_default().to_string();
        if form.contains(EVENT_TARGET_FIELD) {
            let extra = match self.courses.get(&selected) {
                Some(course) if proforma.path == "p10.aspx" => format!(
                    r#"<span id="ctl00_ContentPlaceHolder2_{}">{}</span>"#,
                    COURSE_LABEL_ID, course
                ),
                _ => String::new(),
            };
            return Ok(HttpResponse::new(200, self.form_page(&proforma, serial, &extra)));
        }

        if self.failing_submissions.contains(&selected) {
            return Err(AppError::Network(NetworkError::Timeout {
                url: request.url.clone(),
            }));
        }
        Ok(HttpResponse::new(200, self.form_page(&proforma, serial, "")))
    }
}

#[async_trait]
impl Transport for FakePortal {
    async fn execute(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        if let Ok(mut state) = self.state.lock() {
            state.requests.push(request.clone());
        }
        self.respond(&request)
    }
}

fn hidden_fields(serial: usize) -> String {
    format!(
        r#"<input type="hidden" name="__VIEWSTATE" id="__VIEWSTATE" value="vs-{serial}" />
<input type="hidden" name="__VIEWSTATEGENERATOR" id="__VIEWSTATEGENERATOR" value="CA0B0334" />
<input type="hidden" name="__EVENTVALIDATION" id="__EVENTVALIDATION" value="ev-{serial}" />"#
    )
}

fn page_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// 按顺序回答提示并记录所有输出的假终端
#[derive(Default)]
pub struct FakeReporter {
    answers: RefCell<VecDeque<String>>,
    prompts: RefCell<Vec<String>>,
    lines: RefCell<Vec<String>>,
    successes: RefCell<Vec<String>>,
    failures: RefCell<Vec<String>>,
    tables: RefCell<Vec<Vec<ProgressRow>>>,
}

impl FakeReporter {
    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.borrow().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.borrow().clone()
    }

    pub fn tables(&self) -> Vec<Vec<ProgressRow>> {
        self.tables.borrow().clone()
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.borrow().len()
    }

    fn answer(&self, label: &str) -> AppResult<String> {
        self.prompts.borrow_mut().push(label.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| AppError::prompt_closed(label))
    }
}

impl Reporter for FakeReporter {
    fn report_line(&self, text: &str) {
        self.lines.borrow_mut().push(text.to_string());
    }

    fn report_success(&self, text: &str) {
        self.successes.borrow_mut().push(text.to_string());
    }

    fn report_failure(&self, text: &str) {
        self.failures.borrow_mut().push(text.to_string());
    }

    fn prompt_text(&self, label: &str) -> AppResult<String> {
        self.answer(label)
    }

    fn prompt_secret(&self, label: &str) -> AppResult<String> {
        self.answer(label)
    }

    fn render_progress_table(&self, _title: &str, rows: &[ProgressRow]) {
        self.tables.borrow_mut().push(rows.to_vec());
    }
}
