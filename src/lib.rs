//! # Proforma Autofill
//!
//! 自动填写学生门户评价表（课程 / 讲师 / 在线学习）的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 客户端（Cookie 存储），只暴露 `Transport` 能力
//! - `clients/` - `SessionClient`，统一请求头的 GET / POST
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `TokenSet` - 隐藏令牌的提取与附加
//! - `PostbackSession` - 令牌随每次响应刷新的回发会话
//! - `option_scanner` - 下拉框扫描
//! - `correlation` - 讲师课程与科目的关联
//! - `auth_service` - 登录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份评价表"的完整提交流程
//! - `SubmissionCtx` - 上下文封装（表单 + 序号 + 名称）
//! - `ProformaFlow` - 流程编排（扫描 → 评分 → 选中 → 提交）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/driver` - 登录与三份表单的调度
//! - `orchestrator/rating_capture` - 自定义评分
//!
//! 终端交互通过 `ui::Reporter` 注入，核心流程不直接读写终端。
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod ui;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, NetworkPolicy};
pub use error::{AppError, AppResult, ErrorScope};
pub use infrastructure::{ReqwestTransport, Transport};
pub use models::{Proforma, ProformaKind, Rating};
pub use orchestrator::{App, RunSummary};
pub use services::TieBreak;
pub use ui::{Reporter, TerminalUi};
pub use workflow::{ProformaFlow, StageOutcome};
