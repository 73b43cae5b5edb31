use anyhow::Context;
use renta_config::RentaConfig;

use crate::cli::GlobalFlags;

/// Load layered config (with `.env`) and apply `--endpoint` / `--host`.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<RentaConfig> {
    let mut config =
        RentaConfig::load_with_dotenv().context("failed to load rentagpt configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut RentaConfig, flags: &GlobalFlags) {
    if let Some(host) = &flags.host {
        config.endpoint.host.clone_from(host);
        // A host given on the command line selects by route, even over a
        // configured URL.
        config.endpoint.url.clear();
    }
    if let Some(url) = &flags.endpoint {
        config.endpoint.url.clone_from(url);
    }
}
