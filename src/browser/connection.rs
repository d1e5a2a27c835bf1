use anyhow::Result;
use chromiumoxide::{Browser, Page};
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use super::drive_events;
use crate::error::BrowserError;
use crate::infrastructure::JsExecutor;

/// 连接到正在运行的浏览器并找到当前活动标签页
///
/// 选择顺序：
/// 1. 标题包含 `target_title` 的页面（如果指定）
/// 2. `document.visibilityState` 为 visible 的页面
/// 3. 第一个页面
pub async fn connect_to_active_page(
    port: u16,
    target_title: Option<&str>,
) -> Result<(Browser, Page)> {
    let endpoint = format!("http://localhost:{}", port);
    info!("🔌 正在连接到浏览器: {}", endpoint);

    let (browser, handler) = Browser::connect(&endpoint).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        BrowserError::ConnectionFailed { port, source: e }
    })?;
    drive_events(handler);

    // 等待 target 列表同步
    sleep(Duration::from_millis(300)).await;

    let pages = browser.pages().await.map_err(BrowserError::ScriptExecutionFailed)?;
    debug!("浏览器共有 {} 个页面", pages.len());

    let chosen = match target_title {
        Some(title) => match page_with_title(&pages, title).await {
            Some(page) => Some(page),
            None => {
                debug!("没有标题包含 '{}' 的页面，改用可见页面", title);
                visible_page(&pages).await
            }
        },
        None => visible_page(&pages).await,
    };

    let page = match chosen {
        Some(page) => page,
        None => {
            debug!("没有可见页面，使用第一个页面");
            pages.into_iter().next().ok_or(BrowserError::NoActiveTab)?
        }
    };

    Ok((browser, page))
}

async fn page_with_title(pages: &[Page], title: &str) -> Option<Page> {
    for page in pages {
        let Ok(Some(current)) = page.get_title().await else {
            continue;
        };
        if current.contains(title) {
            info!("✓ 找到目标页面: {}", current);
            return Some(page.clone());
        }
    }
    None
}

async fn visible_page(pages: &[Page]) -> Option<Page> {
    for page in pages {
        let executor = JsExecutor::new(page.clone());
        match executor.eval_as::<String>("document.visibilityState").await {
            Ok(state) if state == "visible" => {
                let title = page.get_title().await.ok().flatten().unwrap_or_default();
                info!("✓ 使用当前可见页面: {}", title);
                return Some(page.clone());
            }
            Ok(state) => debug!("跳过页面 (visibilityState={})", state),
            Err(e) => debug!("无法读取页面可见状态: {}", e),
        }
    }
    None
}
