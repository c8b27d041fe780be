mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add_page, delete_page, export, init, insert, library, move_page, pages, AddPageArgs,
    DeletePageArgs, ExportArgs, InitArgs, InsertArgs, LibraryArgs, MovePageArgs, PagesArgs,
};
use tracing_subscriber::EnvFilter;

/// Sitecraft CLI - edit sites from the terminal
#[derive(Parser, Debug)]
#[command(name = "sitecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new site with a Home page
    Init(InitArgs),

    /// Print the page tree
    Pages(PagesArgs),

    /// Add a page
    AddPage(AddPageArgs),

    /// Move a page before, after or inside another page
    MovePage(MovePageArgs),

    /// Delete a page
    DeletePage(DeletePageArgs),

    /// Insert a template or combination into a page
    Insert(InsertArgs),

    /// List the block library
    Library(LibraryArgs),

    /// Export the site as JSON
    Export(ExportArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Pages(args) => pages(args, &cwd),
                Command::AddPage(args) => add_page(args, &cwd),
                Command::MovePage(args) => move_page(args, &cwd),
                Command::DeletePage(args) => delete_page(args, &cwd),
                Command::Insert(args) => insert(args, &cwd),
                Command::Library(args) => library(args, &cwd),
                Command::Export(args) => export(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
