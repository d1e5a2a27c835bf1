use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::browser;
use crate::config::Config;
use crate::infrastructure::JsExecutor;
use crate::models::PanelResult;
use crate::panel::PanelView;
use crate::relay;
use crate::utils::logging;
use crate::workflow::AnswerFlow;

/// 从当前浏览器标签页抽取题目并给出结构化答案
#[derive(Parser, Debug)]
#[command(name = "page-qa")]
#[command(version)]
pub struct Cli {
    /// TOML 配置文件
    #[arg(long, env = "PAGE_QA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 启动中继服务
    Serve {
        /// 监听端口
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// 回答当前标签页中的题目
    Ask {
        /// 浏览器调试端口
        #[arg(short, long)]
        port: Option<u16>,
        /// 只考虑标题包含该文本的标签页
        #[arg(short, long)]
        title: Option<String>,
        /// 输出 JSON 而不是面板
        #[arg(long)]
        json: bool,
    },
    /// 只抽取题目，不调用中继
    Extract {
        /// 浏览器调试端口
        #[arg(short, long)]
        port: Option<u16>,
        /// 只考虑标题包含该文本的标签页
        #[arg(short, long)]
        title: Option<String>,
        /// 启动无头浏览器打开 --url
        #[arg(long, requires = "url")]
        headless: bool,
        /// 无头模式下打开的地址
        #[arg(long)]
        url: Option<String>,
    },
}

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用：加载配置并初始化日志
    pub fn initialize(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        logging::init(cli.verbose || config.verbose_logging);
        Ok(Self { config })
    }

    /// 执行子命令
    pub async fn run(mut self, command: Command) -> Result<()> {
        match command {
            Command::Serve { port } => {
                if let Some(port) = port {
                    self.config.port = port;
                }
                relay::serve(&self.config).await
            }
            Command::Ask { port, title, json } => {
                if let Some(port) = port {
                    self.config.browser_debug_port = port;
                }
                let result = self.ask(title.as_deref()).await;
                print_result(&result, json)?;
                info!("完成时间: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
                Ok(())
            }
            Command::Extract {
                port,
                title,
                headless,
                url,
            } => {
                if let Some(port) = port {
                    self.config.browser_debug_port = port;
                }
                self.extract(title.as_deref(), headless, url.as_deref()).await
            }
        }
    }

    async fn ask(&self, title: Option<&str>) -> PanelResult {
        println!("{}", PanelView::with_status("Extracting question from page..."));

        let (_browser, page) =
            match browser::connect_to_active_page(self.config.browser_debug_port, title).await {
                Ok(pair) => pair,
                Err(e) => return PanelResult::failed(e.to_string()),
            };

        let executor = JsExecutor::new(page);
        AnswerFlow::new(&self.config).run(&executor).await
    }

    async fn extract(&self, title: Option<&str>, headless: bool, url: Option<&str>) -> Result<()> {
        let (_browser, page) = match (headless, url) {
            (true, Some(url)) => {
                let executable = self.config.chrome_executable.as_deref();
                browser::launch_headless_browser(url, executable).await?
            }
            _ => browser::connect_to_active_page(self.config.browser_debug_port, title).await?,
        };

        let executor = JsExecutor::new(page);
        let payload = AnswerFlow::new(&self.config).extract(&executor).await?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        Ok(())
    }
}

fn print_result(result: &PanelResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", PanelView::from_result(result));
    }
    Ok(())
}
