//! 运行驱动器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，按固定顺序调度各阶段：
//!
//! 1. **登录**：反复询问凭据直到登录成功
//! 2. **自定义评分**：可选，逐个讲师采集评分与课程
//! 3. **课程评价表**（p1）
//! 4. **讲师评价表**（p10）
//! 5. **在线学习评价表**（p10a）
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有会话（Cookie 与令牌）的模块
//! - **严格串行**：每次回发都依赖上一次响应中的令牌，不存在并发请求
//! - **尽力完成**：一个表单失败不影响后续表单，只有需要终止运行的错误才提前返回

use crate::clients::SessionClient;
use crate::config::{Config, NetworkPolicy};
use crate::error::{AppError, AppResult, AuthError, ErrorScope};
use crate::infrastructure::Transport;
use crate::models::{CapturedGrades, Proforma, ProformaKind};
use crate::orchestrator::rating_capture::capture_ratings;
use crate::services::{login, Credentials, LoginState, PostbackSession};
use crate::ui::Reporter;
use crate::utils::logging::{log_stage_complete, log_stage_start, log_startup, print_final_stats};
use crate::workflow::{ProformaFlow, StageOutcome};
use tracing::{error, info, warn};

pub const USERNAME_PROMPT: &str = "Enter your ID";
pub const PASSWORD_PROMPT: &str = "Enter your password";

/// 一次运行的结果
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// 按处理顺序排列的表单结果
    pub stages: Vec<(Proforma, StageOutcome)>,
    /// 自定义评分阶段采集到的数据
    pub grades: CapturedGrades,
}

impl RunSummary {
    pub fn outcome(&self, kind: ProformaKind) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|(proforma, _)| proforma.kind == kind)
            .map(|(_, outcome)| outcome)
    }

    pub fn submitted(&self) -> usize {
        self.stages.iter().map(|(_, o)| o.submitted()).sum()
    }
}

/// 应用主结构
pub struct App<T: Transport, R: Reporter> {
    config: Config,
    session: PostbackSession<T>,
    reporter: R,
}

impl<T: Transport, R: Reporter> App<T, R> {
    /// 初始化应用
    pub fn new(config: Config, transport: T, reporter: R) -> AppResult<Self> {
        let client = SessionClient::new(transport, &config)?;
        let session = PostbackSession::new(client, &config);
        Ok(Self {
            config,
            session,
            reporter,
        })
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn transport(&self) -> &T {
        self.session.client().transport()
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> AppResult<RunSummary> {
        log_startup(&self.config);

        self.login_loop().await?;

        let grades = self.capture().await?;

        let mut summary = RunSummary {
            stages: Vec::new(),
            grades,
        };

        for proforma in Proforma::all() {
            log_stage_start(&proforma);
            let outcome = self.run_stage(&proforma, &summary.grades).await?;
            log_stage_complete(&proforma, &outcome);
            summary.stages.push((proforma, outcome));
        }

        self.report_summary(&summary);
        print_final_stats(&summary.stages);

        Ok(summary)
    }

    /// 反复询问凭据直到登录成功
    ///
    /// 凭据错误、登录页缺少令牌、回发被拒绝都会重新询问；
    /// 网络错误在 `abort_run` 策略下终止运行
    async fn login_loop(&mut self) -> AppResult<()> {
        let mut attempts = 0;

        loop {
            if let Some(max) = self.config.max_login_attempts {
                if attempts >= max {
                    error!("❌ 登录 {} 次均失败", attempts);
                    return Err(AuthError::AttemptsExhausted { attempts }.into());
                }
            }
            attempts += 1;

            let credentials = Credentials {
                username: self.reporter.prompt_text(USERNAME_PROMPT)?,
                password: self.reporter.prompt_secret(PASSWORD_PROMPT)?,
            };

            match login(&mut self.session, &self.config, &credentials).await {
                Ok(LoginState::LoggedIn) => {
                    self.reporter.report_success("Login successful");
                    return Ok(());
                }
                Ok(LoginState::LoggedOut) => {
                    self.reporter
                        .report_failure("Login failed. Please try again.");
                }
                // 登录页缺少令牌或回发被拒绝：重新加载登录页再试
                Err(AppError::Auth(
                    e @ (AuthError::LoginTokensMissing | AuthError::SessionRejected { .. }),
                )) => {
                    warn!("⚠️ 第 {} 次登录失败: {}", attempts, e);
                    self.reporter
                        .report_failure(&format!("Login failed ({}). Please try again.", e));
                }
                Err(e) if e.is_network() && self.config.network_policy != NetworkPolicy::AbortRun => {
                    warn!("⚠️ 第 {} 次登录请求失败: {}", attempts, e);
                    self.reporter
                        .report_failure(&format!("Login request failed: {}", e));
                }
                Err(e) => {
                    self.reporter.report_failure(&format!("Login aborted: {}", e));
                    return Err(e);
                }
            }
        }
    }

    /// 自定义评分；失败时以空评分继续
    async fn capture(&mut self) -> AppResult<CapturedGrades> {
        match capture_ratings(&mut self.session, &self.config, &self.reporter).await {
            Ok(grades) => {
                info!(
                    "✓ 自定义评分 {} 项，关联课程 {} 项",
                    grades.ratings.len(),
                    grades.courses.len()
                );
                Ok(grades)
            }
            Err(e) if self.config.network_policy.scope_for(&e) == ErrorScope::Run => {
                self.reporter.report_failure(&format!("Run aborted: {}", e));
                Err(e)
            }
            Err(e) => {
                warn!("⚠️ 自定义评分失败，使用默认评分: {}", e);
                self.reporter.report_failure(&format!(
                    "Custom grades unavailable, using default grade {}: {}",
                    self.config.default_rating, e
                ));
                Ok(CapturedGrades::default())
            }
        }
    }

    /// 处理一份表单；只有需要终止运行的错误才返回 `Err`
    async fn run_stage(
        &mut self,
        proforma: &Proforma,
        grades: &CapturedGrades,
    ) -> AppResult<StageOutcome> {
        self.reporter.report_line(&format!("\n{}", proforma.title));

        let flow = ProformaFlow::new(&self.config, &self.reporter);
        match flow.run(&mut self.session, proforma, grades).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => self.stage_error(proforma, e),
        }
    }

    fn stage_error(&self, proforma: &Proforma, err: AppError) -> AppResult<StageOutcome> {
        error!("[{}] ❌ {}", proforma.kind, err);
        if self.config.network_policy.scope_for(&err) == ErrorScope::Run {
            self.reporter.report_failure(&format!("Run aborted: {}", err));
            return Err(err);
        }
        self.reporter
            .report_failure(&format!("{} could not be processed: {}", proforma.title, err));
        Ok(StageOutcome::Aborted {
            submitted: 0,
            failed: 0,
            reason: err.to_string(),
        })
    }

    fn report_summary(&self, summary: &RunSummary) {
        self.reporter.report_line("\nSummary");
        for (proforma, outcome) in &summary.stages {
            self.reporter
                .report_line(&format!("  {} ({}): {}", proforma.title, proforma.kind, outcome));
        }
    }
}
