use renta_auth::CredentialStore;
use renta_core::responses::KeyStatusResponse;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Never prints the key itself.
pub fn handle(flags: &GlobalFlags, store: &CredentialStore) -> anyhow::Result<()> {
    let status = match store.load() {
        Some(stored) => KeyStatusResponse {
            stored: true,
            valid_length: store.is_valid(&stored.value),
            source: Some(stored.source.to_string()),
        },
        None => KeyStatusResponse {
            stored: false,
            valid_length: false,
            source: None,
        },
    };
    output(&status, flags.format)
}
