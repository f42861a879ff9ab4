mod config;
mod desktop;
mod error;
mod handlers;
mod routes;
mod types;
mod whatsapp;

use std::sync::Arc;

use log::info;

use config::Config;
use desktop::SystemDesktop;
use handlers::AppState;
use whatsapp::BrowserSender;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&config::log_filters())
        .init();

    let config = Config::from_env();
    info!(
        "WhatsApp Web timing: wait {:?}, close tab {}, close after {:?}",
        config.timing.wait_time, config.timing.tab_close, config.timing.close_time
    );

    let sender = BrowserSender::new(SystemDesktop::new(), config.timing);
    let state = Arc::new(AppState {
        sender: Arc::new(sender),
    });
    let app = routes::router(state);

    let addr = config.addr();
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
