use renta_core::SessionState;
use renta_core::responses::{AskResponse, EndpointResponse, KeyStatusResponse};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};

/// Handle `renta schema`.
pub fn handle(args: &SchemaArgs, _flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name {
        SchemaType::Ask => schemars::schema_for!(AskResponse),
        SchemaType::Session => schemars::schema_for!(SessionState),
        SchemaType::KeyStatus => schemars::schema_for!(KeyStatusResponse),
        SchemaType::Endpoint => schemars::schema_for!(EndpointResponse),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
