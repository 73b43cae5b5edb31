use renta_config::RentaConfig;
use renta_core::responses::EndpointResponse;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `renta endpoint`.
pub fn handle(flags: &GlobalFlags, config: &RentaConfig) -> anyhow::Result<()> {
    let resolved = config.endpoint.resolve()?;
    output(
        &EndpointResponse {
            url: resolved.url,
            host: resolved.host,
            matched_route: resolved.matched_route,
        },
        flags.format,
    )
}
