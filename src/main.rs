use absher_assistant::api::ApiPipeline;
use absher_assistant::integration::{AppConfig, Orchestrator};
use absher_assistant::session::SessionStore;
use absher_assistant::ui::{AbsherApp, AppState};
use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "absher_assistant=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;
    info!("Starting Absher assistant against {}", config.base_url);

    let pipeline = ApiPipeline::new(config.clone());
    let api_tx = pipeline.command_sender();
    let api_rx = pipeline.event_receiver();
    pipeline.start_worker()?;

    let (orchestrator, orchestrator_handle) = Orchestrator::new(config.clone(), api_tx.clone())?;
    orchestrator.start();

    let mut state = AppState::new(SessionStore::new()?);
    state.audio_enabled = config.enable_audio_input;
    state.connect_api(api_tx, api_rx);
    state.connect_orchestrator(orchestrator_handle);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_title("Absher Assistant"),
        ..Default::default()
    };

    eframe::run_native(
        "Absher Assistant",
        options,
        Box::new(|cc| Ok(Box::new(AbsherApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run UI: {}", e))?;

    Ok(())
}
