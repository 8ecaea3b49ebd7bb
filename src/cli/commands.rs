//! Run cosmos-sql commands against query text

use serde_json::json;

use super::CliError;
use crate::{parse_with_options, ParserOptions, StructuralHasher};

/// What to do with the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Validate syntax only
    Check,
    /// Re-render the query in canonical form
    Format,
    /// Report structural hashes
    Hash,
    /// Replace identifying values and re-render
    Obfuscate,
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct CommandOptions {
    /// The query text
    pub query: String,
    /// One clause per line
    pub pretty: bool,
    /// Report only the strict hash
    pub strict: bool,
    /// Parser settings
    pub parser: ParserOptions,
}

impl Default for CommandOptions {
    fn default() -> Self {
        CommandOptions {
            query: String::new(),
            pretty: false,
            strict: false,
            parser: ParserOptions::default(),
        }
    }
}

/// Result of a command
#[derive(Debug)]
pub enum CommandResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Rendered query text
    Text(String),
    /// Machine-readable report
    Report(serde_json::Value),
}

/// Execute a command
pub fn execute(command: Command, options: &CommandOptions) -> Result<CommandResult, CliError> {
    if options.query.trim().is_empty() {
        return Err(CliError::NoInput);
    }

    let query = parse_with_options(&options.query, options.parser)?;

    let result = match command {
        Command::Check => CommandResult::SyntaxValid,
        Command::Format => CommandResult::Text(query.to_text(options.pretty)),
        Command::Obfuscate => CommandResult::Text(query.obfuscate().to_text(options.pretty)),
        Command::Hash => {
            let strict = StructuralHasher::strict().hash_query(&query);
            if options.strict {
                CommandResult::Report(json!({ "strict": strict }))
            } else {
                let non_strict = StructuralHasher::non_strict().hash_query(&query);
                CommandResult::Report(json!({ "strict": strict, "nonStrict": non_strict }))
            }
        }
    };

    Ok(result)
}
