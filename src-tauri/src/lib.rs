mod errors;
mod inputs;
mod model;
mod pipeline;

use std::sync::Arc;

use log::{error, info};
use tauri::Manager;

use model::CalorieModel;
use pipeline::commands::{input_schema, predict_calories};

/// Process-wide state. The model is loaded exactly once at startup and is
/// read-only for the life of the process; requests share it without locking
/// because inference never mutates it.
pub(crate) struct AppState {
    pub(crate) model: Arc<CalorieModel>,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Burnwise starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let path = model::model_path();
                let calorie_model = match model::load_model(&path) {
                    Ok(loaded) => loaded,
                    Err(err) => {
                        // No artifact, no predictions: refuse to launch
                        // rather than serve a half-loaded model.
                        error!("refusing to start: {err}");
                        return Err(err.into());
                    }
                };

                app.manage(AppState {
                    model: Arc::new(calorie_model),
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![input_schema, predict_calories])
        .run(tauri::generate_context!())
        .expect("error while running tauri application")
}
