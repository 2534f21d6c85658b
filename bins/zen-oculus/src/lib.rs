//! Native activity entry point for the headset build.
//!
//! The APK loads this library and android-activity calls [`android_main`] on
//! its own thread. Everything else is shared with the desktop binary through
//! [`start`].

use tracing::{error, info};
use zen_xr::{ClientConfig, NullRenderer, Platform, XrResult};

/// Run the client on `platform` until the session exits.
pub fn start<P: Platform>(platform: P, config: &ClientConfig) -> XrResult<()> {
    info!(
        reference_space = %config.reference_space,
        rendering_scale = config.rendering_scale,
        "starting {}",
        config.application_name
    );
    zen_xr_openxr::run(platform, config, NullRenderer::shared())
}

#[cfg(target_os = "android")]
#[no_mangle]
fn android_main(app: android_activity::AndroidApp) {
    let config = ClientConfig::from_env();
    let filter = config
        .as_ref()
        .map(|config| config.log_filter.clone())
        .unwrap_or_else(|_| ClientConfig::default().log_filter);
    if let Err(err) = zen_common::init_logging(&filter) {
        eprintln!("failed to initialize logging: {err}");
        return;
    }

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err}");
            return;
        }
    };

    let platform = zen_xr_openxr::android::AndroidPlatform::new(app);
    if let Err(err) = start(platform, &config) {
        error!("client failed: {err}");
    }
}
