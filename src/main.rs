use anyhow::Result;
use news_tracker::config::AppConfig;
use news_tracker::internal::ui::app::App;
use news_tracker::tui;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first to get logging settings
    let config = AppConfig::load();

    // While the terminal UI owns stdout, logs must go to a file or they would
    // corrupt the screen. Fall back to console logging if the terminal cannot
    // be initialised.
    match tui::init() {
        Ok(terminal) => {
            let log_dir = config.logging.log_directory.as_deref().unwrap_or("logs");
            let file_appender = tracing_appender::rolling::daily(log_dir, "news-tracker.log");
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

            // RUST_LOG takes precedence over the configured levels.
            let env_filter = match std::env::var("RUST_LOG") {
                Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
                Err(_) => tracing_subscriber::EnvFilter::new(config.logging.filter_directive()),
            };

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();

            if config.api.api_key.is_none() {
                tracing::warn!("No API key configured; every search will fail until one is set");
            }

            let mut app = App::new(&config);
            let res = app.run(terminal).await;

            tui::restore()?;

            if let Err(err) = res {
                eprintln!("{err:?}");
            }

            Ok(())
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .init();

            eprintln!("Failed to initialize terminal: {e:?}");
            Err(e.into())
        }
    }
}
