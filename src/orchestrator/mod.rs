//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责运行级别的流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `driver` - 运行驱动器
//! - 持有会话（Cookie 与令牌）
//! - 登录重试
//! - 按 p1 → p10 → p10a 顺序处理表单
//! - 按错误范围决定跳过、放弃表单或终止运行
//! - 输出全局统计信息
//!
//! ### `rating_capture` - 自定义评分
//! - 逐个讲师读取课程并询问评分
//! - 刷新进度表
//!
//! ## 层次关系
//!
//! ```text
//! driver (登录 + 三份表单)
//!     ↓
//! rating_capture / workflow::ProformaFlow (单份表单)
//!     ↓
//! services (能力层：login / scan / correlate / postback)
//!     ↓
//! clients + infrastructure (SessionClient / Transport)
//! ```

pub mod driver;
pub mod rating_capture;

// 重新导出主要类型
pub use driver::{App, RunSummary};
pub use rating_capture::capture_ratings;
