/*!
Subcommand dispatch.

  serve   (serve.rs)    MCP server over stdio
  list    (list.rs)     tool / prompt catalog
  get     (get.rs)      one tool (schema, command) or prompt (text)
  exec    (exec.rs)     run a tool locally through the server's handler path

Shared pieces: subject.rs (Subject enum), shared.rs (param coercion, server
construction), format.rs (human output).

Each subcommand module exposes one `execute_*` function returning
`anyhow::Result<()>`; argument structs derive `clap::Args`.
*/

pub mod exec;
pub mod format;
pub mod get;
pub mod list;
pub mod serve;
pub mod shared;
pub mod subject;

pub use exec::{ExecArgs, execute_exec};
pub use get::{GetArgs, execute_get};
pub use list::{ListArgs, execute_list};
pub use serve::execute_serve;
