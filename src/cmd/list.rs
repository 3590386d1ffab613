/*!
`list.rs`

Implements `santa-mcp list <tools|prompts>`: prints the catalog the server
registers, without starting a transport or touching santactl.

JSON Output Shape (tools):
{
  "status": "ok",
  "subject": "tools",
  "count": 5,
  "tools": [ { "name": "santactl_version", "description": "..." }, ... ]
}

Prompts add a "role" field per item.
*/

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::cmd::format::{StyleOptions, emoji, heading, table};
use crate::cmd::subject::Subject;
use crate::server::{PromptRegistry, ToolRegistry};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Subject to list (tools|prompts; singular forms are accepted)
    pub subject: Subject,

    /// Output JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn execute_list(args: ListArgs) -> Result<()> {
    let output = if args.subject.is_tool() {
        render_tools(&ToolRegistry::santactl()?, args.json, &StyleOptions::detect())
    } else {
        render_prompts(&PromptRegistry::santactl()?, args.json, &StyleOptions::detect())
    };
    println!("{output}");
    Ok(())
}

fn render_tools(registry: &ToolRegistry, json_mode: bool, style: &StyleOptions) -> String {
    if json_mode {
        let items: Vec<_> = registry
            .iter()
            .map(|t| json!({ "name": t.name(), "description": t.description() }))
            .collect();
        let out = json!({
            "status": "ok",
            "subject": "tools",
            "count": items.len(),
            "tools": items,
        });
        return serde_json::to_string_pretty(&out).unwrap_or_else(|_| out.to_string());
    }

    let rows: Vec<Vec<String>> = registry
        .iter()
        .map(|t| vec![t.name().to_string(), t.description().to_string()])
        .collect();
    format!(
        "{}\n{}",
        heading(
            &format!("{} Tools ({})", emoji("tool", style), registry.len()),
            None,
            style
        ),
        table(&["NAME", "DESCRIPTION"], &rows, style)
    )
}

fn render_prompts(registry: &PromptRegistry, json_mode: bool, style: &StyleOptions) -> String {
    if json_mode {
        let items: Vec<_> = registry
            .iter()
            .map(|p| {
                json!({
                    "name": p.name(),
                    "description": p.description(),
                    "role": p.role(),
                })
            })
            .collect();
        let out = json!({
            "status": "ok",
            "subject": "prompts",
            "count": items.len(),
            "prompts": items,
        });
        return serde_json::to_string_pretty(&out).unwrap_or_else(|_| out.to_string());
    }

    let rows: Vec<Vec<String>> = registry
        .iter()
        .map(|p| {
            vec![
                p.name().to_string(),
                p.role().to_string(),
                p.description().to_string(),
            ]
        })
        .collect();
    format!(
        "{}\n{}",
        heading(
            &format!("{} Prompts ({})", emoji("prompt", style), registry.len()),
            None,
            style
        ),
        table(&["NAME", "ROLE", "DESCRIPTION"], &rows, style)
    )
}
