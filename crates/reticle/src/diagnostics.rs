use appconfig::{Settings, SettingsStore};
use glcore::DeviceInfo;
use tracing::info;

use crate::cli::RunArgs;

/// Dumps comprehensive startup diagnostics at INFO level.
pub fn dump_startup_diagnostics(
    args: &RunArgs,
    store: &SettingsStore,
    settings: &Settings,
    device: &DeviceInfo,
) {
    info!("=== Reticle Startup Diagnostics ===");

    info!("Options:");
    info!("  size: {}", args.size.as_deref().unwrap_or("from configuration"));
    info!("  fullscreen: {}", settings.video.full_screen);
    info!("  vsync: {}", settings.video.vsync);
    info!("  frame-delay-ms: {}", args.frame_delay_ms);

    info!("Paths:");
    info!("  config: {}", store.config_dir().display());
    info!("  settings file: {}", store.settings_path().display());

    info!("Video:");
    info!(
        "  resolution: {}x{}",
        settings.video.resolution_x, settings.video.resolution_y
    );

    info!("Device:");
    info!("  vendor: {}", device.vendor);
    info!("  renderer: {}", device.renderer);
    info!("  version: {}", device.version);
    info!("  GLSL: {}", device.shading_language);

    info!("=== End Startup Diagnostics ===");
}
