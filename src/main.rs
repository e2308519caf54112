/*!
 * davtree - Main Entry Point
 *
 * Runs a single tree operation against a host directory:
 * - ls: enumerate a collection
 * - copy / move: relocate a subtree, confined to the sandbox
 * - rm: delete a node
 */

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use dav_tree::{init_tracing, EventBroadcaster, LocalStore, Tree, TreeConfig};

#[derive(Parser)]
#[command(name = "davtree")]
#[command(author, version, about = "Sandboxed tree operations over a host directory", long_about = None)]
struct Cli {
    /// Host directory served as the tree root
    #[arg(short, long)]
    root: PathBuf,

    /// Tree path that destinations must stay inside (default: $DAVTREE_SANDBOX)
    #[arg(short, long)]
    sandbox: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the children of a collection
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Copy a file or collection
    Copy { source: String, destination: String },
    /// Move or rename a file or collection
    Move { source: String, destination: String },
    /// Delete a file or collection
    Rm { path: String },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = TreeConfig::from_env();
    if let Some(sandbox) = cli.sandbox {
        config.sandbox = Some(PathBuf::from(sandbox));
    }

    let store = Arc::new(LocalStore::new(&cli.root));
    let events = EventBroadcaster::new(config.event_capacity);
    let mut changes = events.subscribe();
    let tree = Tree::builder(store)
        .with_config(&config)
        .events(events)
        .build();
    info!(root = %cli.root.display(), sandbox = ?config.sandbox, "Tree ready");

    match cli.command {
        Commands::Ls { path } => {
            for child in tree.get_children(&path).await? {
                let marker = if child.as_collection().is_some() { "/" } else { "" };
                println!("{}{}", child.name(), marker);
            }
        }
        Commands::Copy {
            source,
            destination,
        } => tree.copy(&source, &destination).await?,
        Commands::Move {
            source,
            destination,
        } => tree.move_to(&source, &destination).await?,
        Commands::Rm { path } => tree.delete(&path).await?,
    }

    while let Ok(event) = changes.try_recv() {
        debug!(path = %tree.strip_sandbox(event.path()), ?event, "Tree changed");
    }

    Ok(())
}
