mod logging;
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use kemblog_client::backend::{DEFAULT_BUCKET, DEFAULT_TABLE};
use kemblog_client::{
    AdminError, AdminSession, BackendConfig, DeleteOutcome, Draft, ImageFile, PostId,
    RestAdminService, SupabaseClient,
};
use std::fs;
use std::path::{Path, PathBuf};
use ui::TerminalUi;

#[derive(Parser)]
#[command(name = "kemblog", author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the hosted backend
    #[arg(long, env = "KEMBLOG_URL", global = true)]
    url: Option<String>,

    /// Public API key sent with every request
    #[arg(long, env = "KEMBLOG_KEY", global = true, hide_env_values = true)]
    key: Option<String>,

    #[arg(long, env = "KEMBLOG_TABLE", default_value = DEFAULT_TABLE, global = true)]
    table: String,

    #[arg(long, env = "KEMBLOG_BUCKET", default_value = DEFAULT_BUCKET, global = true)]
    bucket: String,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    List {
        #[arg(short, long)]
        search: Option<String>,
    },

    Show {
        #[arg(short, long)]
        id: String,
    },

    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, conflicts_with = "content_file")]
        content: Option<String>,

        #[arg(long)]
        content_file: Option<PathBuf>,

        #[arg(long)]
        image: Option<PathBuf>,
    },

    Update {
        #[arg(short, long)]
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "content_file")]
        content: Option<String>,

        #[arg(long)]
        content_file: Option<PathBuf>,

        #[arg(long)]
        image: Option<PathBuf>,
    },

    Delete {
        #[arg(short, long)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

type Session = AdminSession<SupabaseClient, SupabaseClient, TerminalUi>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = backend_config(&cli)?;
    println!("🔌 Connecting to: {}", config.url);

    let service = RestAdminService::connect(config).context("Failed to create backend client")?;
    let assume_yes = matches!(cli.command, Commands::Delete { yes: true, .. });
    let mut session = AdminSession::new(service, TerminalUi::new(assume_yes));
    if let Commands::List {
        search: Some(query),
    } = &cli.command
    {
        session = session.with_query(query.clone());
    }

    if !run(&mut session, cli.command).await? {
        std::process::exit(1);
    }

    Ok(())
}

fn backend_config(cli: &Cli) -> Result<BackendConfig> {
    let Some(url) = cli.url.clone() else {
        bail!("Backend URL is not set: pass --url or set KEMBLOG_URL");
    };
    let Some(key) = cli.key.clone() else {
        bail!("API key is not set: pass --key or set KEMBLOG_KEY");
    };

    Ok(BackendConfig::new(url, key)
        .with_table(cli.table.clone())
        .with_bucket(cli.bucket.clone()))
}

/// Runs one command. `Ok(false)` means the failure was already shown to the
/// user and the process should exit non-zero.
async fn run(session: &mut Session, command: Commands) -> Result<bool> {
    match command {
        Commands::List { .. } => {
            session.load().await;
            Ok(true)
        }

        Commands::Show { id } => {
            let id = PostId::new(id);
            println!("🔍 Getting post #{}", id);

            let posts = session
                .service()
                .fetch()
                .await
                .context("Failed to fetch posts")?;

            match posts.into_iter().find(|post| post.id == id) {
                Some(post) => {
                    println!("✅ Post retrieved:");
                    println!("   ID: {}", post.id);
                    println!("   Title: {}", post.title);
                    println!(
                        "   Image: {}",
                        post.main_image_url.as_deref().unwrap_or("-")
                    );
                    println!("   Created: {}", post.created_at);
                    println!("   Content: {}", post.content);
                    Ok(true)
                }
                None => {
                    println!("❌ Post #{} not found", id);
                    println!("   Tip: Use 'list' command to see available posts");
                    Ok(false)
                }
            }
        }

        Commands::Create {
            title,
            content,
            content_file,
            image,
        } => {
            println!("📝 Creating new post...");
            let content = read_content(content, content_file)?.unwrap_or_default();
            let draft = with_image(Draft::new(title, content), image)?;

            match session.save(draft).await {
                Ok(_) => Ok(true),
                Err(e) => {
                    print_hint(&e);
                    Ok(false)
                }
            }
        }

        Commands::Update {
            id,
            title,
            content,
            content_file,
            image,
        } => {
            let id = PostId::new(id);
            println!("✏️ Updating post #{}", id);

            session.load().await;
            if session.edit(&id).is_err() {
                return Ok(false);
            }

            let content = read_content(content, content_file)?;
            let draft = match session.state().find_post(&id) {
                Some(stored) => Draft::new(
                    title.unwrap_or_else(|| stored.title.clone()),
                    content.unwrap_or_else(|| stored.content.clone()),
                ),
                None => return Ok(false),
            };
            let draft = with_image(draft, image)?;

            match session.save(draft).await {
                Ok(_) => Ok(true),
                Err(e) => {
                    print_hint(&e);
                    Ok(false)
                }
            }
        }

        Commands::Delete { id, .. } => {
            let id = PostId::new(id);
            println!("🗑️ Deleting post #{}", id);

            session.load().await;
            match session.delete(&id).await {
                Ok(DeleteOutcome::Cancelled) => {
                    println!("Deletion cancelled");
                    Ok(true)
                }
                Ok(DeleteOutcome::Deleted { removed }) => {
                    if !removed {
                        tracing::warn!("Post #{} was not in the loaded list", id);
                    }
                    println!("✅ Post deleted successfully!");
                    Ok(true)
                }
                Err(e) => {
                    print_hint(&e);
                    Ok(false)
                }
            }
        }
    }
}

/// The session has already shown the alert; this only adds a hint when the
/// backend itself pointed at the configuration.
fn print_hint(e: &AdminError) {
    match e.backend_error() {
        Some(source) if source.is_unauthorized() => {
            println!("   Tip: Check KEMBLOG_KEY, the backend rejected it");
        }
        Some(source) if source.is_not_found() => {
            println!("   Tip: Check KEMBLOG_URL and --table / --bucket");
        }
        _ => {}
    }
}

fn read_content(inline: Option<String>, file: Option<PathBuf>) -> Result<Option<String>> {
    match file {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read content from {:?}", path))
            .map(Some),
        None => Ok(inline),
    }
}

fn with_image(draft: Draft, path: Option<PathBuf>) -> Result<Draft> {
    match path {
        Some(path) => Ok(draft.with_image(read_image(&path)?)),
        None => Ok(draft),
    }
}

fn read_image(path: &Path) -> Result<ImageFile> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read image {:?}", path))?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Image path {:?} has no usable file name", path))?;
    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    Ok(ImageFile::new(name, bytes).with_content_type(content_type.essence_str()))
}
