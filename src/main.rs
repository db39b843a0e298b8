use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use docchat::config::ConfigError;
use docchat::net::types::Role;
use docchat::net::upload::{ACCEPTED_EXTENSIONS, UploadFile};
use docchat::state::chat::Message;
use docchat::state::documents::format_size;
use docchat::{ApiClient, ApiError, ChatStore, ClientConfig, DocumentStore, RemoteApi, SendOutcome, StoreError};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Fetch(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "docchat", about = "Manage documents and ask questions about them")]
struct Cli {
    #[arg(long, env = "DOCCHAT_API_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the service.
    Health,
    Docs(DocsCommand),
    /// Ask a single question.
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Interactive conversation (`/clear`, `/docs`, `/quit`).
    Chat,
}

#[derive(Args, Debug)]
struct DocsCommand {
    #[command(subcommand)]
    command: DocsSubcommand,
}

#[derive(Subcommand, Debug)]
enum DocsSubcommand {
    List {
        #[arg(long)]
        query: Option<String>,
    },
    Upload {
        path: PathBuf,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.base_url.as_deref() {
        config = config.with_base_url(url)?;
    }
    tracing::debug!(base_url = %config.base_url, "client configured");
    let api: Arc<dyn RemoteApi> = Arc::new(ApiClient::new(&config)?);

    match cli.command {
        Command::Health => run_health(api.as_ref()).await,
        Command::Docs(docs) => run_docs(api, docs).await,
        Command::Ask { text } => run_ask(api, &text.join(" ")).await,
        Command::Chat => run_chat(api).await,
    }
}

async fn run_health(api: &dyn RemoteApi) -> Result<(), CliError> {
    let health = api.health_check().await?;
    println!("status: {}", health.status);
    println!("documents: {}", health.documents_count);
    println!("timestamp: {}", health.timestamp);
    Ok(())
}

async fn run_docs(api: Arc<dyn RemoteApi>, docs: DocsCommand) -> Result<(), CliError> {
    let store = DocumentStore::new(api);
    match docs.command {
        DocsSubcommand::List { query } => {
            store.fetch().await;
            let state = store.snapshot();
            if let Some(error) = state.error {
                return Err(CliError::Fetch(error));
            }
            let matches = state.matching(query.as_deref().unwrap_or_default());
            if matches.is_empty() {
                println!("no documents");
            }
            for doc in matches {
                println!("{}\t{}\t{}\t{}\t{}", doc.id, doc.name, doc.kind, format_size(doc.size), doc.modified);
            }
            Ok(())
        }
        DocsSubcommand::Upload { path } => run_upload(&store, &path).await,
        DocsSubcommand::Delete { id } => {
            let ack = store.remove(&id).await?;
            println!("{}", ack.message);
            println!("{} documents remaining", store.count());
            Ok(())
        }
    }
}

async fn run_upload(store: &DocumentStore, path: &std::path::Path) -> Result<(), CliError> {
    let file = UploadFile::from_path(path).await?;
    if !file.has_accepted_extension() {
        tracing::warn!(name = %file.name, accepted = ?ACCEPTED_EXTENSIONS, "extension not in the usual set; the server may reject it");
    }

    let name = file.name.clone();
    let mut rx = store.subscribe();
    let renderer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let upload = rx.borrow_and_update().upload;
            if upload.in_progress {
                print!("\ruploading {name}: {:>3}%", upload.progress);
                let _ = std::io::stdout().flush();
            }
        }
    });

    let result = store.upload(file).await;
    renderer.abort();
    println!();

    let ack = result?;
    println!("{}", ack.message);
    println!("{} documents available", store.count());
    Ok(())
}

async fn run_ask(api: Arc<dyn RemoteApi>, text: &str) -> Result<(), CliError> {
    let chat = ChatStore::new(api);
    let outcome = chat.send(text).await;
    if let Some(message) = chat.snapshot().last_message() {
        println!("{}", render_message(message));
    }
    match (outcome, chat.snapshot().error) {
        (SendOutcome::Failed, Some(error)) => Err(CliError::Fetch(error)),
        _ => Ok(()),
    }
}

async fn run_chat(api: Arc<dyn RemoteApi>) -> Result<(), CliError> {
    let documents = DocumentStore::mount(api.clone());
    let chat = ChatStore::new(api);

    let mut docs_rx = documents.subscribe();
    let ready = docs_rx
        .wait_for(|s| !s.loading)
        .await
        .map(|s| s.count());
    match ready {
        Ok(count) => println!("{count} documents available"),
        Err(_) => println!("document list unavailable"),
    }
    for message in &chat.snapshot().messages {
        println!("{}", render_message(message));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                chat.clear();
                for message in &chat.snapshot().messages {
                    println!("{}", render_message(message));
                }
            }
            "/docs" => {
                documents.fetch().await;
                let state = documents.snapshot();
                match state.error {
                    Some(error) => println!("document list unavailable: {error}"),
                    None => println!("{} documents available", state.count()),
                }
            }
            text => match chat.send(text).await {
                SendOutcome::Empty | SendOutcome::Busy => {}
                SendOutcome::Answered | SendOutcome::Failed => {
                    if let Some(message) = chat.snapshot().last_message() {
                        println!("{}", render_message(message));
                    }
                }
            },
        }
    }
    Ok(())
}

fn render_message(message: &Message) -> String {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    match &message.source {
        Some(source) => format!("{who}: {}\n  (source: {source})", message.content),
        None => format!("{who}: {}", message.content),
    }
}
