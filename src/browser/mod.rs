pub mod connection;
pub mod headless;

use chromiumoxide::Handler;
use futures::StreamExt;

pub use connection::connect_to_active_page;
pub use headless::launch_headless_browser;

/// 在后台消费 CDP 事件，handler 出错即停止
fn drive_events(mut handler: Handler) {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });
}
