use renta_auth::CredentialStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct KeyClearResponse {
    cleared: bool,
}

pub fn handle(flags: &GlobalFlags, store: &CredentialStore) -> anyhow::Result<()> {
    store.clear()?;
    output(&KeyClearResponse { cleared: true }, flags.format)
}
