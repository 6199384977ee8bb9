//! 终端交互
//!
//! 核心流程只通过 `Reporter` 与终端交互，具体的渲染与输入方式由实现决定

pub mod reporter;
pub mod terminal;
pub mod tty;

pub use reporter::{ProgressRow, Reporter, RowStatus};
pub use terminal::TerminalUi;
pub use tty::TerminalMode;
