mod commands;
mod opts;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::read::{CategoryArgs, GetArgs, ListArgs};
use opts::GlobalOpts;

#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "Storefront catalog CLI")]
struct Cli {
    #[command(flatten)]
    opts: GlobalOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List products, optionally filtered
    List(ListArgs),

    /// Show one product
    Get(GetArgs),

    /// List distinct categories
    Categories,

    /// List products in one category
    Category(CategoryArgs),

    /// Show catalog totals
    Summary,

    /// Read commands from stdin against one live catalog (create/update/delete persist until exit)
    Session,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let opts = &cli.opts;

    let result = match cli.command {
        Command::List(args) => commands::read::cmd_list(opts, &args).await,
        Command::Get(args) => commands::read::cmd_get(opts, &args).await,
        Command::Categories => commands::read::cmd_categories(opts).await,
        Command::Category(args) => commands::read::cmd_category(opts, &args).await,
        Command::Summary => commands::read::cmd_summary(opts).await,
        Command::Session => commands::session::cmd_session(opts).await,
    };
    if let Err(err) = result {
        output::print_failure(opts, &err)?;
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
