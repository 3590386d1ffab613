/*!
`exec.rs`

Implements `santa-mcp exec TOOL`: runs one santactl tool locally through the
same registry/handler path the MCP server uses, then prints the text the
client would have received.

Parameters:
  --param KEY=VALUE    (repeatable)
  --param-file FILE    (JSON or YAML object; --param overrides file entries)

Values are coerced by the tool's input schema (boolean flags accept
true/false/yes/no/1/0).

JSON Output:
{
  "status": "ok",
  "tool": "santactl_fileinfo",
  "arguments": { "file_path": "/usr/bin/yes" },
  "failed": false,
  "text": "..."
}

`failed` is true when santactl could not be run or exited non-zero; the text
then starts with "Error with <operation>:" and the process exits non-zero.
*/

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use rmcp::model::JsonObject;
use serde_json::json;

use crate::cmd::format::{Role, StyleOptions, color, emoji, heading};
use crate::cmd::shared::{
    build_arguments_from_schema, build_server, load_param_file_into_map, parse_params,
};
use crate::config::Settings;
use crate::santactl::Runner;
use crate::server::{SantaServer, result_text};

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Tool name to invoke
    #[arg(value_name = "TOOL")]
    pub tool: String,

    /// Provide parameter (KEY=VALUE), repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Load parameters from file (JSON or YAML). CLI --param overrides file entries
    #[arg(long = "param-file", value_name = "PATH")]
    pub param_file: Option<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of a local tool run.
#[derive(Debug)]
pub struct ExecOutcome {
    pub tool: String,
    pub arguments: JsonObject,
    pub text: String,
    pub failed: bool,
}

pub fn execute_exec(args: ExecArgs, settings: &Settings) -> Result<()> {
    let server = build_server(settings)?;
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;

    let outcome = match rt.block_on(run_tool(&server, &args)) {
        Ok(outcome) => outcome,
        Err(e) => return output_error(args.json, &format!("{e:#}")),
    };

    print_outcome(&outcome, args.json);
    if outcome.failed {
        bail!("tool '{}' reported a santactl failure", outcome.tool);
    }
    Ok(())
}

/// Collect parameters, coerce them by schema, and dispatch through the registry.
pub async fn run_tool<R: Runner>(server: &SantaServer<R>, args: &ExecArgs) -> Result<ExecOutcome> {
    let name = args.tool.trim();
    if name.is_empty() {
        bail!("tool name cannot be empty");
    }
    let registration = server
        .tools()
        .get(name)
        .ok_or_else(|| anyhow!("tool '{name}' not found"))?;

    let mut provided = parse_params(&args.params)?;
    if let Some(pf) = &args.param_file {
        load_param_file_into_map(pf, &mut provided)?;
    }
    let arguments = build_arguments_from_schema(registration.input_schema(), &provided)
        .context("Failed to build arguments")?;

    let result = server
        .call(name, Some(arguments.clone()))
        .await
        .map_err(|e| anyhow!("{}", e.message))?;
    let text = result_text(&result);
    let failed = text.starts_with("Error with ");

    Ok(ExecOutcome {
        tool: name.to_string(),
        arguments,
        text,
        failed,
    })
}

fn print_outcome(outcome: &ExecOutcome, json_mode: bool) {
    if json_mode {
        let out = json!({
            "status": "ok",
            "tool": outcome.tool,
            "arguments": outcome.arguments,
            "failed": outcome.failed,
            "text": outcome.text,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).unwrap_or_else(|_| out.to_string())
        );
        return;
    }

    let style = StyleOptions::detect();
    let (tag, role) = if outcome.failed {
        ("error", Role::Error)
    } else {
        ("success", Role::Success)
    };
    let title = format!("{} {}", emoji(tag, &style), outcome.tool);
    println!("{}", heading(&color(role, title, &style), None, &style));
    print!("{}", outcome.text);
    if !outcome.text.ends_with('\n') {
        println!();
    }
}

fn output_error(json: bool, msg: &str) -> Result<()> {
    if json {
        let err = json!({"status": "error", "error": msg});
        println!(
            "{}",
            serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
        );
    } else {
        let style = StyleOptions::detect();
        eprintln!(
            "{} {}",
            emoji("error", &style),
            color(Role::Error, msg, &style)
        );
    }
    bail!(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::santactl::{CommandBuilder, CommandSpec, Invocation};

    struct Echo;

    impl Runner for Echo {
        async fn run(&self, spec: &CommandSpec) -> Invocation {
            if spec.args().iter().any(|a| a == "/missing") {
                return Invocation::failed(spec, "no such file");
            }
            Invocation::Output(format!("{spec}\n"))
        }
    }

    fn server() -> SantaServer<Echo> {
        SantaServer::new(CommandBuilder::default(), Echo).unwrap()
    }

    fn exec_args(tool: &str, params: &[&str]) -> ExecArgs {
        ExecArgs {
            tool: tool.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            param_file: None,
            json: false,
        }
    }

    #[tokio::test]
    async fn params_are_coerced_and_dispatched() {
        let outcome = run_tool(
            &server(),
            &exec_args("santactl_sync", &["clean_sync=yes"]),
        )
        .await
        .unwrap();
        assert_eq!(outcome.text, "sudo /usr/local/bin/santactl sync --clean\n");
        assert_eq!(outcome.arguments.get("clean_sync"), Some(&json!(true)));
        assert!(!outcome.failed);
    }

    #[tokio::test]
    async fn santactl_failure_is_flagged() {
        let outcome = run_tool(
            &server(),
            &exec_args("santactl_fileinfo", &["file_path=/missing"]),
        )
        .await
        .unwrap();
        assert!(outcome.failed);
        assert_eq!(outcome.text, "Error with fileinfo: no such file");
    }

    #[tokio::test]
    async fn missing_required_param_is_an_error() {
        let err = run_tool(&server(), &exec_args("santactl_fileinfo", &[]))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("file_path"));
    }

    #[tokio::test]
    async fn undecodable_value_surfaces_protocol_message() {
        let err = run_tool(
            &server(),
            &exec_args("santactl_sync", &["clean_sync=sometimes"]),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("invalid arguments for 'santactl_sync'"));
    }

    #[tokio::test]
    async fn unknown_tool() {
        let err = run_tool(&server(), &exec_args("santactl_rule", &[]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
