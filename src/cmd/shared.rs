/*!
shared.rs - helpers shared by the `exec` and `get` subcommands.

  - parse_params: KEY=VALUE pairs from the command line
  - load_param_file_into_map: JSON / YAML parameter files (CLI wins)
  - build_arguments_from_schema + coerce_value: raw strings -> typed JSON
    according to a tool's input schema
  - build_server: registries + santactl runner from resolved settings
*/

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result, bail};
use rmcp::model::JsonObject;
use serde_json::Value;

use crate::config::Settings;
use crate::santactl::ProcessRunner;
use crate::server::SantaServer;

/// Server backed by the real santactl, with startup failures kept fatal.
pub fn build_server(settings: &Settings) -> Result<SantaServer<ProcessRunner>> {
    SantaServer::new(settings.command_builder(), ProcessRunner)
}

/// Parse repeated `KEY=VALUE` flags. Keys are trimmed; values keep inner spaces.
pub fn parse_params(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut provided = HashMap::new();
    for kv in pairs {
        let Some((k, v)) = kv.split_once('=') else {
            bail!("invalid --param (expected KEY=VALUE): {kv}");
        };
        let key = k.trim();
        if key.is_empty() {
            bail!("invalid --param (empty key): {kv}");
        }
        provided.insert(key.to_string(), v.trim().to_string());
    }
    Ok(provided)
}

/// Merge a JSON or YAML object file into `provided`; existing keys win.
pub fn load_param_file_into_map(path: &str, provided: &mut HashMap<String, String>) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read param file: {path}"))?;
    let lower = path.to_ascii_lowercase();

    let value: Value = if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        serde_yaml::from_str(&raw).context("failed to parse YAML param file")?
    } else {
        serde_json::from_str(&raw).context("failed to parse JSON param file")?
    };

    let Value::Object(obj) = value else {
        bail!("param file root must be an object");
    };
    for (k, v) in obj {
        let s = match v {
            Value::String(sv) => sv,
            other => other.to_string(),
        };
        provided.entry(k).or_insert(s);
    }
    Ok(())
}

/// Build a typed argument object from raw strings using `schema`.
///
/// Declared properties are coerced by their `"type"`; a missing required
/// property is an error. Keys the schema does not declare are passed through
/// as strings so the server-side decoder can report them.
pub fn build_arguments_from_schema(
    schema: &JsonObject,
    provided: &HashMap<String, String>,
) -> Result<JsonObject> {
    let required: HashSet<&str> = schema
        .get("required")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|r| r.as_str()).collect())
        .unwrap_or_default();

    let mut remaining = provided.clone();
    let mut result = JsonObject::new();

    if let Some(props) = schema.get("properties").and_then(|v| v.as_object()) {
        for (pname, pobj) in props {
            let ptype = property_type(pobj);
            if let Some(raw) = remaining.remove(pname) {
                result.insert(pname.clone(), coerce_value(&raw, ptype));
            } else if required.contains(pname.as_str()) {
                bail!("missing required parameter: {pname}");
            }
        }
    }

    for (k, v) in remaining {
        result.insert(k, Value::String(v));
    }
    Ok(result)
}

/// `"type"` of a property; the first non-null entry when it is a list.
pub fn property_type(property: &Value) -> &str {
    match property.get("type") {
        Some(Value::String(t)) => t.as_str(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(|t| t.as_str())
            .find(|t| *t != "null")
            .unwrap_or("string"),
        _ => "string",
    }
}

/// Coerce a raw string by a primitive type hint; unparseable input stays a string.
pub fn coerce_value(raw: &str, type_hint: &str) -> Value {
    match type_hint {
        "integer" => raw
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        "number" => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string())),
        "boolean" => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Value::Bool(true),
            "false" | "0" | "no" | "n" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        },
        _ => Value::String(raw.to_string()),
    }
}
