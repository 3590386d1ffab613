/*!
`get.rs`

Implements `santa-mcp get <tool|prompt> NAME`: detailed view of one catalog
entry.

  tool   : name, description, input schema, and the santactl command line
           the tool runs with default arguments
  prompt : name, role, description, full text

Plural subjects are accepted and behave like the singular form.
*/

use anyhow::{Result, anyhow};
use clap::Args;
use serde_json::json;

use crate::cmd::format::{Role, StyleOptions, color, heading};
use crate::cmd::shared::build_server;
use crate::cmd::subject::Subject;
use crate::config::Settings;
use crate::santactl::{CommandBuilder, Runner};
use crate::server::{PromptRegistration, SantaServer, ToolRegistration};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Subject kind (tool|prompt)
    pub subject: Subject,

    /// Tool or prompt name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute_get(args: GetArgs, settings: &Settings) -> Result<()> {
    let server = build_server(settings)?;
    println!(
        "{}",
        render(&server, &args, &StyleOptions::detect())?
    );
    Ok(())
}

fn render<R: Runner>(server: &SantaServer<R>, args: &GetArgs, style: &StyleOptions) -> Result<String> {
    let name = args.name.trim();
    if args.subject.is_tool() {
        let tool = server
            .tools()
            .get(name)
            .ok_or_else(|| anyhow!("tool '{name}' not found"))?;
        Ok(render_tool(tool, server.builder(), args.json, style))
    } else {
        let prompt = server
            .prompts()
            .get(name)
            .ok_or_else(|| anyhow!("prompt '{name}' not found"))?;
        Ok(render_prompt(prompt, args.json, style))
    }
}

/// Command line for the tool with empty arguments, when they decode.
fn default_command(tool: &ToolRegistration, builder: &CommandBuilder) -> Option<String> {
    tool.decode(Default::default())
        .ok()
        .map(|a| a.command(builder).to_string())
}

fn render_tool(
    tool: &ToolRegistration,
    builder: &CommandBuilder,
    json_mode: bool,
    style: &StyleOptions,
) -> String {
    let command = default_command(tool, builder);
    if json_mode {
        let out = json!({
            "status": "ok",
            "subject": "tool",
            "name": tool.name(),
            "description": tool.description(),
            "input_schema": tool.input_schema(),
            "command": command,
        });
        return serde_json::to_string_pretty(&out).unwrap_or_else(|_| out.to_string());
    }

    let schema = serde_json::to_string_pretty(tool.input_schema()).unwrap_or_default();
    let mut out = vec![
        heading(tool.name(), Some(tool.description()), style),
        color(Role::Accent, "Input schema:", style),
        schema,
    ];
    if let Some(cmd) = command {
        out.push(color(Role::Accent, "Runs:", style));
        out.push(format!("  {cmd}"));
    }
    out.join("\n")
}

fn render_prompt(prompt: &PromptRegistration, json_mode: bool, style: &StyleOptions) -> String {
    if json_mode {
        let out = json!({
            "status": "ok",
            "subject": "prompt",
            "name": prompt.name(),
            "description": prompt.description(),
            "role": prompt.role(),
            "text": prompt.text(),
        });
        return serde_json::to_string_pretty(&out).unwrap_or_else(|_| out.to_string());
    }
    format!(
        "{}\n{}",
        heading(
            prompt.name(),
            Some(&format!("role={} • {}", prompt.role(), prompt.description())),
            style
        ),
        prompt.text()
    )
}
