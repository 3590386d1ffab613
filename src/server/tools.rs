//! Tool registry: santactl operations exposed as MCP tools.
//!
//! Each registration binds a tool name to its JSON input schema and a decoder
//! producing a typed [`ToolArguments`]. Dispatch builds the santactl command,
//! runs it, and always answers with a single text block; invocation failures
//! travel back as text, never as protocol errors.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::santactl::{CommandBuilder, CommandSpec, Invocation, Operation, Runner};

/* ---- Argument shapes ---- */

/// Arguments for tools that take none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NoArgs {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SyncArgs {
    /// Remove all existing rules before syncing from the server.
    #[serde(default)]
    pub clean_sync: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileinfoArgs {
    /// Absolute path to the file on disk.
    pub file_path: String,
    /// Also display the file's entitlements, if it has any.
    #[serde(default)]
    pub show_entitlements: bool,
}

/// Decoded arguments, one variant per tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolArguments {
    Version,
    Status,
    Metrics,
    Sync(SyncArgs),
    Fileinfo(FileinfoArgs),
}

impl ToolArguments {
    pub fn operation(&self) -> Operation {
        match self {
            ToolArguments::Version => Operation::Version,
            ToolArguments::Status => Operation::Status,
            ToolArguments::Metrics => Operation::Metrics,
            ToolArguments::Sync(_) => Operation::Sync,
            ToolArguments::Fileinfo(_) => Operation::Fileinfo,
        }
    }

    /// Operation-specific arguments appended after the subcommand.
    pub fn extra_args(&self) -> Vec<String> {
        match self {
            ToolArguments::Version | ToolArguments::Status | ToolArguments::Metrics => Vec::new(),
            ToolArguments::Sync(args) => {
                if args.clean_sync {
                    vec!["--clean".to_string()]
                } else {
                    Vec::new()
                }
            }
            // The path stays last so santactl never reads it as an option value.
            ToolArguments::Fileinfo(args) => {
                let mut out = Vec::with_capacity(2);
                if args.show_entitlements {
                    out.push("--entitlements".to_string());
                }
                out.push(args.file_path.clone());
                out
            }
        }
    }

    pub fn command(&self, builder: &CommandBuilder) -> CommandSpec {
        builder.for_operation(self.operation(), self.extra_args())
    }
}

/* ---- Registry ---- */

type Decoder = fn(JsonObject) -> Result<ToolArguments, serde_json::Error>;

/// One registered tool.
#[derive(Debug, Clone)]
pub struct ToolRegistration {
    name: &'static str,
    description: &'static str,
    schema: Arc<JsonObject>,
    decode: Decoder,
}

impl ToolRegistration {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn input_schema(&self) -> &JsonObject {
        &self.schema
    }

    pub fn decode(&self, arguments: JsonObject) -> Result<ToolArguments, serde_json::Error> {
        (self.decode)(arguments)
    }

    /// Protocol-level description advertised in `tools/list`.
    pub fn tool(&self) -> Tool {
        Tool::new(self.name, self.description, self.schema.clone())
    }
}

/// Name -> registration. Built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, ToolRegistration>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed santactl catalog.
    pub fn santactl() -> Result<Self> {
        let mut registry = Self::new();
        registry.register::<NoArgs>(
            "santactl_version",
            "List santa daemon versions",
            |args| decode::<NoArgs>(args).map(|_| ToolArguments::Version),
        )?;
        registry.register::<NoArgs>(
            "santactl_status",
            "Get the status of the Santa daemon",
            |args| decode::<NoArgs>(args).map(|_| ToolArguments::Status),
        )?;
        registry.register::<NoArgs>(
            "santactl_metrics",
            "Get performance metrics from the Santa daemon",
            |args| decode::<NoArgs>(args).map(|_| ToolArguments::Metrics),
        )?;
        registry.register::<SyncArgs>(
            "santactl_sync",
            "Have Santa perform a sync of the Santa rules database from the sync server",
            |args| decode(args).map(ToolArguments::Sync),
        )?;
        registry.register::<FileinfoArgs>(
            "santactl_fileinfo",
            "Get file information for a given absolute file path",
            |args| decode(args).map(ToolArguments::Fileinfo),
        )?;
        Ok(registry)
    }

    /// Register a tool whose input schema is derived from `T`.
    ///
    /// Fails on a duplicate name or a schema that is not a JSON object.
    pub fn register<T: JsonSchema>(
        &mut self,
        name: &'static str,
        description: &'static str,
        decode: Decoder,
    ) -> Result<()> {
        if self.tools.contains_key(name) {
            bail!("tool '{name}' is already registered");
        }
        let schema =
            schema_of::<T>().with_context(|| format!("invalid input schema for tool '{name}'"))?;
        self.tools.insert(
            name,
            ToolRegistration {
                name,
                description,
                schema: Arc::new(schema),
                decode,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolRegistration> {
        self.tools.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolRegistration> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn list(&self) -> Vec<Tool> {
        self.iter().map(ToolRegistration::tool).collect()
    }

    /// Look up `name` and decode `arguments` (absent means `{}`).
    pub fn resolve(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<ToolArguments, ErrorData> {
        let registration = self
            .get(name)
            .ok_or_else(|| ErrorData::invalid_params(format!("tool '{name}' not found"), None))?;
        registration
            .decode(arguments.unwrap_or_default())
            .map_err(|e| ErrorData::invalid_params(format!("invalid arguments for '{name}': {e}"), None))
    }

    /// Full dispatch: resolve, build, run, wrap.
    pub async fn call<R: Runner>(
        &self,
        builder: &CommandBuilder,
        runner: &R,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let args = self.resolve(name, arguments)?;
        let spec = args.command(builder);
        debug!(tool = name, command = %spec, "invoking tool");

        let invocation = runner.run(&spec).await;
        if let Invocation::Failed { error, .. } = &invocation {
            warn!(tool = name, operation = spec.operation(), %error, "santactl failed");
        }

        Ok(CallToolResult::success(vec![Content::text(
            invocation.into_text(),
        )]))
    }
}

fn decode<T: DeserializeOwned>(arguments: JsonObject) -> Result<T, serde_json::Error> {
    serde_json::from_value(serde_json::Value::Object(arguments))
}

fn schema_of<T: JsonSchema>() -> Result<JsonObject> {
    match serde_json::to_value(schemars::schema_for!(T))? {
        serde_json::Value::Object(map) => Ok(map),
        other => bail!("schema is not an object: {other}"),
    }
}

/// Concatenated text blocks of a call result.
///
/// Works on the serialized form so it does not depend on the result's field layout.
pub fn result_text(result: &CallToolResult) -> String {
    let value = serde_json::to_value(result).unwrap_or(serde_json::Value::Null);
    value
        .get("content")
        .and_then(|v| v.as_array())
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
