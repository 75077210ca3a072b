mod app;
mod audio;
mod content_view;
mod list_view;
mod theme;
mod toast;
mod widgets;

use app::SlowQuranApp;
use eframe::NativeOptions;
use qurancore::{logging, ApiClient, AppConfig};
use std::sync::Arc;
use theme::SlowTheme;
use tracing::{error, warn};

fn main() -> eframe::Result<()> {
    let (config, config_error) = AppConfig::load();
    logging::init(&config.log_filter);
    if let Some(e) = config_error {
        warn!(error = %e, "ignoring unreadable config");
    }

    let client = match ApiClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "could not create http client");
            std::process::exit(1);
        }
    };

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([560.0, 400.0])
            .with_title("quran"),
        ..Default::default()
    };
    eframe::run_native("quran", options, Box::new(move |cc| {
        SlowTheme::default().apply(&cc.egui_ctx, config.arabic_font.as_deref());
        let mut app = SlowQuranApp::new(cc, &config, client);
        app.resume_last_read();
        Box::new(app)
    }))
}
