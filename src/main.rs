mod app;

use plasma_trajectories::RunOptions;

use app::PlasmaApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = RunOptions::from_env();
    log::info!("starting with {} worker threads", options.threads);

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([800.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Electron Trajectories in a Fusion Plasma",
        native_options,
        Box::new(|_cc| Ok(Box::new(PlasmaApp::new(options)))),
    )
}
