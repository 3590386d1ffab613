//! MCP server: owns the tool and prompt registries and serves them over stdio.
//!
//! tools   -> ToolRegistry, ToolArguments (santactl dispatch)
//! prompts -> PromptRegistry (static help text)
//!
//! Protocol framing and transport are rmcp's; this module only answers
//! `tools/list`, `tools/call`, `prompts/list` and `prompts/get`.

pub mod prompts;
pub mod tools;

use std::future::Future;

use anyhow::{Context, Result, ensure};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, GetPromptRequestParam, GetPromptResult, Implementation,
    JsonObject, ListPromptsResult, ListToolsResult, PaginatedRequestParam, ServerCapabilities,
    ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData, ServerHandler, ServiceExt};
use tracing::{debug, info};

use crate::santactl::{CommandBuilder, ProcessRunner, Runner};

pub use prompts::{PromptRegistration, PromptRegistry};
pub use tools::{ToolArguments, ToolRegistration, ToolRegistry, result_text};

const INSTRUCTIONS: &str = "Administrative access to the Santa host-protection daemon via santactl. \
Tools: santactl_version, santactl_status, santactl_metrics, santactl_sync (runs as root, may \
prompt for a password on the host), santactl_fileinfo (absolute path required). \
Failed invocations are reported as text beginning with 'Error with <operation>:'. \
Prompts: santactl_status_prompt explains status output; keep database (execution rule) and \
watch item (file access) statistics separate.";

/// Server state. Built once; every request only reads it.
pub struct SantaServer<R = ProcessRunner> {
    tools: ToolRegistry,
    prompts: PromptRegistry,
    builder: CommandBuilder,
    runner: R,
}

impl<R: Runner> SantaServer<R> {
    /// Server with the santactl tool and prompt catalogs.
    pub fn new(builder: CommandBuilder, runner: R) -> Result<Self> {
        let tools = ToolRegistry::santactl().context("Failed to register santactl tools")?;
        let prompts = PromptRegistry::santactl().context("Failed to register santactl prompts")?;
        Ok(Self::with_registries(tools, prompts, builder, runner))
    }

    pub fn with_registries(
        tools: ToolRegistry,
        prompts: PromptRegistry,
        builder: CommandBuilder,
        runner: R,
    ) -> Self {
        Self {
            tools,
            prompts,
            builder,
            runner,
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn prompts(&self) -> &PromptRegistry {
        &self.prompts
    }

    pub fn builder(&self) -> &CommandBuilder {
        &self.builder
    }

    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        self.tools
            .call(&self.builder, &self.runner, name, arguments)
            .await
    }

    pub fn prompt(&self, name: &str) -> Result<GetPromptResult, ErrorData> {
        self.prompts.render(name)
    }
}

impl<R: Runner> ServerHandler for SantaServer<R> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tools.list())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            debug!(tool = %request.name, "tools/call");
            self.call(&request.name, request.arguments).await
        }
    }

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListPromptsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListPromptsResult::with_all_items(self.prompts.list())))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<GetPromptResult, ErrorData>> + Send + '_ {
        debug!(prompt = %request.name, "prompts/get");
        std::future::ready(self.prompt(&request.name))
    }
}

/// Serve over stdin/stdout until the client disconnects.
pub async fn serve_stdio<R: Runner>(server: SantaServer<R>) -> Result<()> {
    ensure!(!server.tools().is_empty(), "no tools registered");
    ensure!(!server.prompts().is_empty(), "no prompts registered");
    info!(
        tools = server.tools().len(),
        prompts = server.prompts().len(),
        santactl = server.builder().binary(),
        "serving santactl over stdio"
    );
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("Failed to initialize MCP stdio transport")?;
    let reason = service.waiting().await.context("MCP service task failed")?;
    info!(?reason, "MCP service stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::santactl::{CommandSpec, Invocation};
    use rmcp::ServiceError;
    use rmcp::model::ErrorCode;
    use serde_json::json;

    struct Echo;

    impl Runner for Echo {
        async fn run(&self, spec: &CommandSpec) -> Invocation {
            if spec.operation() == "sync" {
                return Invocation::failed(spec, "sync server unreachable");
            }
            Invocation::Output(spec.to_string())
        }
    }

    fn server() -> SantaServer<Echo> {
        SantaServer::new(CommandBuilder::default(), Echo).unwrap()
    }

    #[test]
    fn info_advertises_tools_and_prompts() {
        let info = serde_json::to_value(server().get_info()).unwrap();
        assert!(info["capabilities"].get("tools").is_some());
        assert!(info["capabilities"].get("prompts").is_some());
        assert_eq!(info["serverInfo"]["name"], json!("santa-mcp"));
    }

    #[test]
    fn listing_covers_both_registries() {
        let s = server();
        assert_eq!(s.tools().list().len(), 5);
        assert_eq!(s.prompts().list().len(), 3);
    }

    #[tokio::test]
    async fn call_goes_through_builder_and_runner() {
        let s = server();
        let args = json!({"file_path": "/usr/bin/yes"}).as_object().cloned();
        let result = s.call("santactl_fileinfo", args).await.unwrap();
        assert_eq!(
            result_text(&result),
            "/usr/local/bin/santactl fileinfo /usr/bin/yes"
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_a_protocol_error() {
        let err = server().call("santactl_rule", None).await.unwrap_err();
        assert!(err.message.contains("santactl_rule"));
    }

    #[tokio::test]
    async fn protocol_round_trip_over_duplex() {
        let (server_io, client_io) = tokio::io::duplex(64 * 1024);
        let server_task = tokio::spawn(async move {
            let service = server().serve(server_io).await?;
            service.waiting().await?;
            anyhow::Ok(())
        });
        let client = ().serve(client_io).await.unwrap();

        let tools = client.list_all_tools().await.unwrap();
        assert_eq!(tools.len(), 5);

        let result = client
            .call_tool(CallToolRequestParam {
                name: "santactl_sync".into(),
                arguments: json!({"clean_sync": true}).as_object().cloned(),
            })
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result_text(&result), "Error with sync: sync server unreachable");

        let err = client
            .call_tool(CallToolRequestParam {
                name: "santactl_fileinfo".into(),
                arguments: Some(JsonObject::new()),
            })
            .await
            .unwrap_err();
        match err {
            ServiceError::McpError(e) => assert_eq!(e.code, ErrorCode::INVALID_PARAMS),
            other => panic!("expected invalid params, got {other:?}"),
        }

        let prompts = client.list_all_prompts().await.unwrap();
        assert_eq!(prompts.len(), 3);
        for prompt in prompts {
            let rendered = client
                .get_prompt(GetPromptRequestParam {
                    name: prompt.name.clone(),
                    arguments: None,
                })
                .await
                .unwrap();
            assert_eq!(rendered.description.as_deref(), Some(prompt.name.as_str()));
            assert_eq!(rendered.messages.len(), 1);
        }

        client.cancel().await.unwrap();
        server_task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn empty_catalog_refuses_to_serve() {
        let server = SantaServer::with_registries(
            ToolRegistry::new(),
            PromptRegistry::santactl().unwrap(),
            CommandBuilder::default(),
            Echo,
        );
        let err = serve_stdio(server).await.unwrap_err();
        assert!(err.to_string().contains("no tools registered"));
    }

    #[test]
    fn duplicate_tool_aborts_construction() {
        let build = || -> Result<SantaServer<Echo>> {
            let mut registry = ToolRegistry::santactl()?;
            registry.register::<tools::NoArgs>("santactl_status", "again", |_| {
                Ok(ToolArguments::Status)
            })?;
            Ok(SantaServer::with_registries(
                registry,
                PromptRegistry::santactl()?,
                CommandBuilder::default(),
                Echo,
            ))
        };
        let first = build().err().map(|e| e.to_string());
        let second = build().err().map(|e| e.to_string());
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
