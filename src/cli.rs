//! Command-line argument parsing for the weft binary.
//!
//! This module handles parsing command-line arguments and determining
//! which command to execute.

/// Arguments for a one-shot chat exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatArgs {
    /// The prompt to send
    pub prompt: String,
    /// Existing conversation to continue; a new one is created if unset
    pub conversation: Option<String>,
    /// Model override for this exchange
    pub model: Option<String>,
    /// Disable tool use for this exchange
    pub no_tools: bool,
    /// Enable model reasoning for this exchange
    pub reasoning: bool,
    /// System prompt to apply to the conversation
    pub system: Option<String>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Run one streaming chat exchange (default)
    Chat(ChatArgs),
    /// Print recent conversations
    ListConversations,
    /// Print available model ids
    ListModels,
    /// Show version information
    Version,
}

/// Usage text printed on argument errors.
pub const USAGE: &str = "\
Usage: weft [OPTIONS] <prompt>
       weft --list | --models | --version

Options:
  --conversation <id>  Continue an existing conversation
  --model <id>         Model to use for this exchange
  --no-tools           Disable tool use
  --reasoning          Enable model reasoning
  --system <prompt>    Set the conversation's system prompt
  --list               Print recent conversations
  --models             Print available model ids
  -V, --version        Show version information";

/// Parse command-line arguments and return the command to execute.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use weft::cli::{parse_args, CliCommand};
///
/// let args = vec!["weft".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, String>
where
    I: Iterator<Item = String>,
{
    let mut chat = ChatArgs::default();
    let mut prompt_parts: Vec<String> = Vec::new();
    let mut args = args.skip(1); // Skip the program name

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--list" => return Ok(CliCommand::ListConversations),
            "--models" => return Ok(CliCommand::ListModels),
            "--no-tools" => chat.no_tools = true,
            "--reasoning" => chat.reasoning = true,
            "--conversation" => {
                chat.conversation = Some(expect_value(&mut args, "--conversation")?);
            }
            "--model" => {
                chat.model = Some(expect_value(&mut args, "--model")?);
            }
            "--system" => {
                chat.system = Some(expect_value(&mut args, "--system")?);
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown option: {}", other));
            }
            _ => prompt_parts.push(arg),
        }
    }

    if prompt_parts.is_empty() {
        return Err("no prompt given".to_string());
    }

    chat.prompt = prompt_parts.join(" ");
    Ok(CliCommand::Chat(chat))
}

fn expect_value<I>(args: &mut I, flag: &str) -> Result<String, String>
where
    I: Iterator<Item = String>,
{
    match args.next() {
        Some(value) if !value.starts_with("--") => Ok(value),
        _ => Err(format!("{} requires a value", flag)),
    }
}
