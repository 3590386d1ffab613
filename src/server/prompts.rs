//! Static prompts describing santactl and how to read its output.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use rmcp::ErrorData;
use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};

const STATUS_TEXT: &str = include_str!("prompts/status.txt");
const SUBCOMMANDS_TEXT: &str = include_str!("prompts/subcommands.txt");
const FILEINFO_TEXT: &str = include_str!("prompts/fileinfo.txt");

#[derive(Debug, Clone)]
pub struct PromptRegistration {
    name: &'static str,
    description: &'static str,
    role: PromptMessageRole,
    text: &'static str,
}

impl PromptRegistration {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn role(&self) -> &'static str {
        match self.role {
            PromptMessageRole::User => "user",
            PromptMessageRole::Assistant => "assistant",
        }
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn prompt(&self) -> Prompt {
        Prompt::new(self.name, Some(self.description), None)
    }

    /// The prompt body, tagged with the prompt's name. Arguments are ignored:
    /// every prompt is fixed text.
    pub fn render(&self) -> GetPromptResult {
        GetPromptResult {
            description: Some(self.name.to_string()),
            messages: vec![PromptMessage::new_text(self.role.clone(), self.text)],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptRegistry {
    prompts: BTreeMap<&'static str, PromptRegistration>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn santactl() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(
            "santactl_status_prompt",
            "explain the data in a santactl_status output",
            PromptMessageRole::Assistant,
            STATUS_TEXT,
        )?;
        registry.register(
            "santactl_subcommand_prompt",
            "list of valid santactl subcommands",
            PromptMessageRole::Assistant,
            SUBCOMMANDS_TEXT,
        )?;
        registry.register(
            "santactl_fileinfo_prompt",
            "usage of the santactl fileinfo subcommand",
            PromptMessageRole::User,
            FILEINFO_TEXT,
        )?;
        Ok(registry)
    }

    pub fn register(
        &mut self,
        name: &'static str,
        description: &'static str,
        role: PromptMessageRole,
        text: &'static str,
    ) -> Result<()> {
        if self.prompts.contains_key(name) {
            bail!("prompt '{name}' is already registered");
        }
        self.prompts.insert(
            name,
            PromptRegistration {
                name,
                description,
                role,
                text,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PromptRegistration> {
        self.prompts.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptRegistration> {
        self.prompts.values()
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn list(&self) -> Vec<Prompt> {
        self.iter().map(PromptRegistration::prompt).collect()
    }

    pub fn render(&self, name: &str) -> Result<GetPromptResult, ErrorData> {
        self.get(name)
            .map(PromptRegistration::render)
            .ok_or_else(|| ErrorData::invalid_params(format!("prompt '{name}' not found"), None))
    }
}
