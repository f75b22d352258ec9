//! Command-line entrypoint for Reddit engagement analysis sessions.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use karmalens_config::Settings;
use karmalens_core::{SessionOrchestrator, fetch_task, fetcher};
use karmalens_memory::{HttpMemoryStore, MemoryManager, MemoryRecord, MemoryStore, UserScope};
use karmalens_runner::{AgentRunner, OpenAiChatClient};
use karmalens_tools::{McpToolProvider, ServerParams};
use log::{info, warn};

/// Command-line options.
#[derive(Parser)]
#[command(name = "karmalens", version, about = "Memory-augmented Reddit engagement analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a full analysis session informed by stored insights
    Analyze {
        /// Topic used to pull relevant records from memory
        #[arg(long)]
        topic: Option<String>,
    },
    /// Fetch hot posts from one subreddit through the tool server
    Fetch {
        /// Subreddit to fetch from
        #[arg(long, default_value = "Python")]
        subreddit: String,
        /// How many posts to fetch
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Inspect or clear the configured user's stored records
    Memory {
        #[command(subcommand)]
        command: MemoryCommand,
    },
}

#[derive(Subcommand)]
enum MemoryCommand {
    /// Search records by semantic relevance
    Search {
        /// Query text
        query: String,
        /// Maximum number of records to return
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List every stored record
    List,
    /// Delete every stored record
    Wipe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    karmalens::init_logging();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        eprintln!(
            "hint: check that the Reddit, OpenAI, and Mem0 credentials are set in the \
             environment and that the services are reachable"
        );
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::from_env().context("incomplete configuration")?;

    match cli.command {
        Command::Analyze { topic } => analyze(&settings, topic).await,
        Command::Fetch { subreddit, count } => fetch(&settings, &subreddit, count).await,
        Command::Memory { command } => memory(&settings, command).await,
    }
}

/// Run one full session: memory context, agent execution, insight storage.
async fn analyze(settings: &Settings, topic: Option<String>) -> anyhow::Result<()> {
    let manager = memory_manager(settings);
    let runner = agent_runner(settings);

    let mut session = SessionOrchestrator::new(manager, runner, settings.reddit.username.clone());
    if let Some(topic) = topic {
        session = session.with_topic_query(topic);
    }

    info!("starting analysis session (user={})", settings.reddit.username);
    let params = ServerParams::reddit(&settings.reddit);
    let report = session.run(&params).await?;

    println!("{}", report.result.raw);
    if let Some(usage) = report.result.usage {
        info!(
            "token usage (input={}, output={})",
            usage.input_tokens, usage.output_tokens
        );
    }
    info!(
        "analysis complete (context_records={}, new_records={})",
        report.history_records, report.persisted_records
    );
    Ok(())
}

/// Run the plain fetcher agent against the tool server, skipping memory.
async fn fetch(settings: &Settings, subreddit: &str, count: usize) -> anyhow::Result<()> {
    let runner = agent_runner(settings);

    let params = ServerParams::reddit(&settings.reddit);
    let provider = McpToolProvider::connect(&params).await?;
    let outcome = runner
        .run(&fetcher(), &fetch_task(subreddit, count), &provider)
        .await;
    if let Err(err) = provider.shutdown().await {
        warn!("tool server shutdown failed: {err}");
    }

    let result = outcome?;
    println!("{}", result.raw);
    Ok(())
}

/// Maintenance commands talk to the store directly so failures surface
/// instead of degrading the way session writes do.
async fn memory(settings: &Settings, command: MemoryCommand) -> anyhow::Result<()> {
    let store = HttpMemoryStore::new(
        settings.memory.base_url.clone(),
        settings.memory.api_key.clone(),
    );
    let scope = UserScope::for_username(&settings.reddit.username);

    match command {
        MemoryCommand::Search { query, limit } => {
            let records = store
                .search(&scope, &query, limit)
                .await
                .context("memory search failed")?;
            print_records(&records);
        }
        MemoryCommand::List => {
            let records = store
                .get_all(&scope)
                .await
                .context("memory list failed")?;
            print_records(&records);
        }
        MemoryCommand::Wipe => {
            store
                .delete_all(&scope)
                .await
                .context("memory wipe failed")?;
            println!("deleted all records for {scope}");
        }
    }
    Ok(())
}

fn memory_manager(settings: &Settings) -> MemoryManager {
    let store = Arc::new(HttpMemoryStore::new(
        settings.memory.base_url.clone(),
        settings.memory.api_key.clone(),
    ));
    let scope = UserScope::for_username(&settings.reddit.username);
    MemoryManager::new(store, scope)
}

fn agent_runner(settings: &Settings) -> AgentRunner {
    let chat = Arc::new(OpenAiChatClient::new(
        settings.runner.base_url.clone(),
        settings.runner.api_key.clone(),
        settings.runner.model.clone(),
        settings.runner.drop_params.clone(),
    ));
    AgentRunner::new(chat, settings.runner.max_tool_rounds)
}

fn print_records(records: &[MemoryRecord]) {
    if records.is_empty() {
        println!("no records");
        return;
    }
    for record in records {
        let kind = record.metadata["type"].as_str().unwrap_or("memory");
        println!("[{kind}] {}", record.text);
    }
}
