#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::info;
use zen_xr::{ClientConfig, HeadlessPlatform, ReferenceSpaceType, SpaceCreation};

#[derive(Parser, Debug)]
#[command(name = "zen-oculus", about = "Zen HMD client (desktop OpenXR runtime)")]
struct Args {
    /// JSON configuration file.
    #[arg(long, env = "ZEN_CONFIG")]
    config: Option<std::path::PathBuf>,
    /// Reference space used for rendering: view, local or stage.
    #[arg(long, env = "ZEN_REFERENCE_SPACE")]
    reference_space: Option<ReferenceSpaceType>,
    /// Create the reference space on the first frame instead of at startup.
    #[arg(long)]
    lazy_reference_space: bool,
    /// Multiplier applied to the recommended swapchain size.
    #[arg(long, env = "ZEN_RENDERING_SCALE")]
    rendering_scale: Option<f32>,
    #[arg(long, env = "RUST_LOG")]
    log_filter: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        if let Some(space) = self.reference_space {
            config.reference_space = space;
        }
        if self.lazy_reference_space {
            config.reference_space_creation = SpaceCreation::Lazy;
        }
        if let Some(scale) = self.rendering_scale {
            config.rendering_scale = scale;
        }
        if let Some(filter) = self.log_filter {
            config.log_filter = filter;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let config = Args::parse().into_config()?;
    zen_common::init_logging(&config.log_filter)?;

    zen_oculus::start(HeadlessPlatform::default(), &config)?;
    info!("client stopped");
    Ok(())
}
