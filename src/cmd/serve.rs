/*!
`serve.rs`

Implements `santa-mcp serve`: registers the santactl tools and prompts and
speaks MCP over stdin/stdout until the client disconnects. Registration or
transport failures abort startup.
*/

use anyhow::{Context, Result};

use crate::cmd::shared::build_server;
use crate::config::Settings;
use crate::server;

pub fn execute_serve(settings: &Settings) -> Result<()> {
    let server = build_server(settings)?;
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(server::serve_stdio(server))
}
