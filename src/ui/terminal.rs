//! 终端实现
//!
//! 输入使用 dialoguer，颜色使用 console，表格使用 prettytable

use crate::error::{AppError, AppResult};
use crate::ui::reporter::{ProgressRow, Reporter, RowStatus};
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};
use prettytable::{format, Cell, Row, Table};
use std::io::ErrorKind;

const BANNER: &str = r"
  ___  _____ ____   ____            __
 / _ \| ____/ ___| |  _ \ _ __ ___ / _| ___  _ __ _ __ ___   __ _
| | | |  _|| |     | |_) | '__/ _ \ |_ / _ \| '__| '_ ` _ \ / _` |
| |_| | |__| |___  |  __/| | | (_) |  _| (_) | |  | | | | | | (_| |
 \__\_\_____\____| |_|   |_|  \___/|_|  \___/|_|  |_| |_| |_|\__,_|
";

/// 终端交互
pub struct TerminalUi {
    term: Term,
    theme: ColorfulTheme,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
        }
    }

    /// 清屏并打印标题
    pub fn print_banner(&self) {
        let _ = self.term.clear_screen();
        let _ = self.term.write_line(&style(BANNER).blue().bold().to_string());
        let _ = self.term.write_line("");
    }

    /// 等待回车后退出
    pub fn wait_for_enter(&self) {
        let _ = self.term.write_line("\nPress Enter to close the program...");
        let _ = self.term.read_line();
    }

    fn print_panel(&self, title: &str) {
        let mut panel = Table::new();
        panel.set_format(*format::consts::FORMAT_BOX_CHARS);
        panel.add_row(Row::new(vec![Cell::new(&format!(
            "{:^60}",
            title.to_uppercase()
        ))
        .style_spec("bFm")]));
        panel.printstd();
    }
}

impl Default for TerminalUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalUi {
    fn report_line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn report_success(&self, text: &str) {
        let _ = self
            .term
            .write_line(&style(format!("[ - ] {}", text)).green().to_string());
    }

    fn report_failure(&self, text: &str) {
        let _ = self
            .term
            .write_line(&style(format!("[ X ] {}", text)).red().to_string());
    }

    fn prompt_text(&self, label: &str) -> AppResult<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map(|text| text.trim().to_string())
            .map_err(|e| prompt_error(label, e))
    }

    fn prompt_secret(&self, label: &str) -> AppResult<String> {
        Password::with_theme(&self.theme)
            .with_prompt(label)
            .interact()
            .map_err(|e| prompt_error(label, e))
    }

    fn render_progress_table(&self, title: &str, rows: &[ProgressRow]) {
        let _ = self.term.clear_screen();
        self.print_panel(title);

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(Row::new(
            ["No.", "Teacher", "Course", "Grade"]
                .iter()
                .map(|h| Cell::new(h).style_spec("bFm"))
                .collect(),
        ));

        for row in rows {
            let (name, grade) = match row.status {
                RowStatus::Graded(rating) => (
                    Cell::new(&row.name),
                    Cell::new(rating.as_str()).style_spec("Fg"),
                ),
                RowStatus::Pending => (
                    Cell::new(&format!("{} ◄", row.name)).style_spec("Fc"),
                    Cell::new("Pending").style_spec("Fy"),
                ),
                RowStatus::Waiting => (Cell::new(&row.name), Cell::new("-")),
            };
            table.add_row(Row::new(vec![
                Cell::new(&row.number.to_string()),
                name,
                Cell::new(&row.course),
                grade,
            ]));
        }

        table.printstd();
    }
}

/// 输入流结束或标准输入不是终端时视为输入关闭，其余为读取失败
fn prompt_error(label: &str, err: dialoguer::Error) -> AppError {
    let dialoguer::Error::IO(io) = err;
    match io.kind() {
        ErrorKind::UnexpectedEof | ErrorKind::NotConnected | ErrorKind::BrokenPipe => {
            AppError::prompt_closed(label)
        }
        _ => AppError::prompt_failed(label, io),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromptError;
    use std::io;

    #[test]
    fn test_closed_input_maps_to_prompt_closed() {
        for kind in [ErrorKind::UnexpectedEof, ErrorKind::NotConnected] {
            let err = prompt_error(
                "Enter your ID",
                dialoguer::Error::IO(io::Error::new(kind, "closed")),
            );
            assert!(matches!(err, AppError::Prompt(PromptError::Closed { .. })));
        }
    }

    #[test]
    fn test_other_io_errors_are_failures() {
        let err = prompt_error(
            "Enter the Grade",
            dialoguer::Error::IO(io::Error::new(ErrorKind::PermissionDenied, "denied")),
        );
        assert!(matches!(err, AppError::Prompt(PromptError::Failed { .. })));
    }
}
