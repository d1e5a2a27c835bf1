use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use super::drive_events;
use crate::error::BrowserError;

/// 启动无头浏览器并导航到指定 URL
///
/// `executable` 为空时由 chromiumoxide 自动查找本机的 Chrome / Chromium
pub async fn launch_headless_browser(
    url: &str,
    executable: Option<&str>,
) -> Result<(Browser, Page)> {
    info!("🚀 启动无头浏览器...");
    debug!("目标 URL: {}", url);

    let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
        "--disable-gpu",
        "--no-sandbox",
        "--disable-dev-shm-usage",
    ]);
    if let Some(path) = executable {
        builder = builder.chrome_executable(Path::new(path));
    }
    let config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        BrowserError::ConfigurationFailed(e)
    })?;

    let (browser, handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        BrowserError::ScriptExecutionFailed(e)
    })?;
    debug!("无头浏览器启动成功");

    drive_events(handler);
    sleep(Duration::from_millis(300)).await;

    let page = browser.new_page(url).await.map_err(BrowserError::ScriptExecutionFailed)?;
    page.wait_for_navigation().await.map_err(BrowserError::ScriptExecutionFailed)?;

    info!("✅ 无头浏览器已导航到: {}", url);
    Ok((browser, page))
}
