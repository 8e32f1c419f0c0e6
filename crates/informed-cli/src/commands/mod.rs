pub mod feeds;
pub mod init;
pub mod markets;
pub mod mood;
pub mod news;
pub mod topics;

use anyhow::Result;
use serde::Serialize;

/// Write one JSON envelope to stdout
pub fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
