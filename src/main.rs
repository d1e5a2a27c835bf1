use anyhow::Result;
use clap::Parser;
use page_qa::app::{App, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置并初始化日志
    let app = App::initialize(&cli)?;

    app.run(cli.command).await
}
