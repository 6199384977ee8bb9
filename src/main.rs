use anyhow::Result;
use proforma_autofill::ui::TerminalMode;
use proforma_autofill::{logger, App, Config, ReqwestTransport, TerminalUi};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    // Ctrl+C 时恢复终端属性（密码输入会关闭回显）和光标后退出
    let mode = TerminalMode::capture();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            mode.restore();
            let _ = console::Term::stdout().show_cursor();
            std::process::exit(130);
        }
    });

    let transport = ReqwestTransport::new(config.request_timeout_secs.map(Duration::from_secs))?;
    let ui = TerminalUi::new();
    ui.print_banner();

    // 初始化并运行应用
    let mut app = App::new(config, transport, ui)?;
    let result = app.run().await;

    app.reporter().wait_for_enter();
    result?;

    Ok(())
}
