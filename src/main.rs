//! weft binary: one streaming chat exchange from the terminal.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;

use weft::cli::{parse_args, ChatArgs, CliCommand, USAGE};
use weft::models::{NewConversation, StreamRequest};
use weft::sse::StreamHandlers;
use weft::{ClientConfig, LoomClient};

/// Model used when neither the CLI nor the profile names one.
const FALLBACK_MODEL: &str = "anthropic/claude-sonnet-4";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("error: {}\n\n{}", message, USAGE);
            std::process::exit(2);
        }
    };

    match command {
        // Version needs neither config nor a client
        CliCommand::Version => {
            println!("weft {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliCommand::ListConversations => list_conversations(&build_client()?).await,
        CliCommand::ListModels => list_models(&build_client()?).await,
        CliCommand::Chat(args) => chat(&build_client()?, args).await,
    }
}

/// Load configuration, wire up logging, and construct the client.
fn build_client() -> Result<LoomClient> {
    let config = ClientConfig::load()?;
    init_tracing(config.log_filter.as_deref());
    Ok(LoomClient::new(config)?)
}

/// Logs go to stderr so streamed content owns stdout.
fn init_tracing(config_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_filter.unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn list_conversations(client: &LoomClient) -> Result<()> {
    let conversations = client.list_conversations(20, 0).await?;
    for item in conversations {
        println!(
            "{}  {}  [{}]",
            item.id,
            item.title.as_deref().unwrap_or("(untitled)"),
            item.current_model
        );
    }
    Ok(())
}

async fn list_models(client: &LoomClient) -> Result<()> {
    let models = client.list_models().await?;
    for model in models {
        println!("{}", model.id);
    }
    Ok(())
}

async fn chat(client: &LoomClient, args: ChatArgs) -> Result<()> {
    let conversation_id = match &args.conversation {
        Some(id) => {
            if let Some(prompt) = &args.system {
                client.update_system_prompt(id, prompt).await?;
            }
            id.clone()
        }
        None => {
            let model = match &args.model {
                Some(model) => model.clone(),
                None => default_model(client).await,
            };
            let mut request = NewConversation::with_model(model);
            if let Some(prompt) = &args.system {
                request = request.with_system_prompt(prompt.clone());
            }
            let conversation = client.create_conversation(&request).await?;
            eprintln!("conversation {}", conversation.id);
            conversation.id
        }
    };

    let mut request = StreamRequest::new(args.prompt);
    if let Some(model) = args.model {
        request = request.with_model(model);
    }
    if args.no_tools {
        request = request.with_tools(false);
    }
    if args.reasoning {
        request = request.with_reasoning(true);
    }

    let failed = Arc::new(AtomicBool::new(false));
    let failed_event = Arc::clone(&failed);
    let failed_transport = Arc::clone(&failed);

    let handlers = StreamHandlers::new()
        .on_content_chunk(|chunk| {
            print!("{}", chunk.chunk);
            let _ = std::io::stdout().flush();
        })
        .on_tool_call(|call| {
            eprintln!("[tool] {}", call.tool_name.as_deref().unwrap_or("(unnamed)"));
        })
        .on_tool_result(|result| {
            eprintln!(
                "[tool done] {}",
                result.tool_name.as_deref().unwrap_or("(unnamed)")
            );
        })
        .on_title_complete(|title| {
            eprintln!("title: {}", title.title);
        })
        .on_error(move |err| {
            eprintln!("backend error: {}", err.message);
            failed_event.store(true, Ordering::SeqCst);
        })
        .on_close(|| println!())
        .on_connection_error(move |err| {
            eprintln!("connection error: {}", err.user_message());
            failed_transport.store(true, Ordering::SeqCst);
        });

    client.chat(&conversation_id, &request, handlers).await;

    if failed.load(Ordering::SeqCst) {
        return Err(eyre!("stream failed"));
    }
    Ok(())
}

/// Model for a fresh conversation: profile preference when reachable,
/// otherwise a sensible default.
async fn default_model(client: &LoomClient) -> String {
    match client.profile().await {
        Ok(profile) => profile
            .preferred_model
            .unwrap_or_else(|| FALLBACK_MODEL.to_string()),
        Err(_) => FALLBACK_MODEL.to_string(),
    }
}
