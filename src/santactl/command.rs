//! Argument vector construction for santactl.

use std::fmt;

/// Absolute path of the santactl binary on a stock Santa install.
pub const DEFAULT_SANTACTL_PATH: &str = "/usr/local/bin/santactl";

/// Elevation prefix used for operations that need root.
pub const DEFAULT_ELEVATION: &str = "sudo";

/// Flag asking santactl for machine-readable output.
pub const JSON_FLAG: &str = "--json";

/// santactl subcommands reachable through the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Version,
    Status,
    Metrics,
    Sync,
    Fileinfo,
}

impl Operation {
    /// Subcommand token passed to santactl.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Version => "version",
            Operation::Status => "status",
            Operation::Metrics => "metrics",
            Operation::Sync => "sync",
            Operation::Fileinfo => "fileinfo",
        }
    }

    /// Only `sync` talks to the daemon's privileged control channel.
    pub fn elevated(&self) -> bool {
        matches!(self, Operation::Sync)
    }

    /// Only `version` is requested as JSON.
    pub fn structured(&self) -> bool {
        matches!(self, Operation::Version)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built invocation: program followed by its arguments.
///
/// The operation name is carried alongside the vector so failures can be
/// attributed without re-parsing argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    operation: String,
    argv: Vec<String>,
}

impl CommandSpec {
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Whole vector, program included.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Program (`argv[0]`) and the remaining arguments.
    pub fn split(&self) -> (&str, &[String]) {
        match self.argv.split_first() {
            Some((program, args)) => (program.as_str(), args),
            None => ("", &[]),
        }
    }

    pub fn program(&self) -> &str {
        self.split().0
    }

    pub fn args(&self) -> &[String] {
        self.split().1
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_words::join(self.argv()))
    }
}

/// Builds santactl argument vectors from a fixed binary path and elevation prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    binary: String,
    elevation: Vec<String>,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SANTACTL_PATH, vec![DEFAULT_ELEVATION.to_string()])
    }
}

impl CommandBuilder {
    pub fn new(binary: impl Into<String>, elevation: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            elevation,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Layout: `[elevation..] binary operation [--json] extra_args..`
    pub fn build<I, S>(
        &self,
        elevated: bool,
        structured: bool,
        operation: &str,
        extra_args: I,
    ) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = Vec::with_capacity(self.elevation.len() + 4);
        if elevated {
            argv.extend(self.elevation.iter().cloned());
        }
        argv.push(self.binary.clone());
        argv.push(operation.to_string());
        if structured {
            argv.push(JSON_FLAG.to_string());
        }
        argv.extend(extra_args.into_iter().map(Into::into));

        CommandSpec {
            operation: operation.to_string(),
            argv,
        }
    }

    /// Convenience: apply the policy flags attached to `op`.
    pub fn for_operation<I, S>(&self, op: Operation, extra_args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build(op.elevated(), op.structured(), op.as_str(), extra_args)
    }
}
