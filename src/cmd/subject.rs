/*!
Subject enum for CLI subcommands.

Variants:
  tools / tool      (santactl tool catalog; plural for list, singular for get)
  prompts / prompt  (static prompt catalog)
*/

use std::fmt;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Subject {
    /// All tools
    Tools,
    /// A single tool
    Tool,
    /// All prompts
    Prompts,
    /// A single prompt
    Prompt,
}

impl Subject {
    pub fn is_tool(&self) -> bool {
        matches!(self, Subject::Tools | Subject::Tool)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Subject::Tools => "tools",
            Subject::Tool => "tool",
            Subject::Prompts => "prompts",
            Subject::Prompt => "prompt",
        };
        f.write_str(s)
    }
}
