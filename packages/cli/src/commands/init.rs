use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use sitecraft_editor::model::{IdGenerator, Site};
use sitecraft_editor::{FileStorage, Mutation, SiteDocument, SiteStorage};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Display name of the site
    #[arg(short, long, default_value = "My Site")]
    pub name: String,

    /// Site id (file name under the site directory)
    #[arg(long, default_value = "site")]
    pub site_id: String,

    /// Site directory
    #[arg(short, long, default_value = "site")]
    pub site_dir: String,

    /// Force overwrite existing config and site
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Sitecraft site...".bright_blue().bold());

    let config = Config {
        site_dir: args.site_dir.clone(),
        site_id: args.site_id.clone(),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let mut storage = FileStorage::new(config.get_site_dir(cwd));
    if storage.load(&config.site_id)?.is_some() && !args.force {
        println!(
            "  {} {} already exists, keeping it",
            "⚠️".yellow(),
            storage.site_path(&config.site_id).display()
        );
    } else {
        let mut doc = SiteDocument::new(
            Site::new(&config.site_id, &args.name),
            config.load_registry(cwd)?,
            Box::new(IdGenerator::new(&config.site_id)),
        );
        doc.apply(&Mutation::CreatePage {
            title: "Home".to_string(),
            parent_id: None,
        })?;
        doc.save(&mut storage)?;
        println!(
            "  {} Created {}",
            "✓".green(),
            storage.site_path(&config.site_id).display()
        );
    }

    println!();
    println!("{}", "✅ Site initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: sitecraft library");
    println!("  2. Run: sitecraft insert <page> --combination hero-section");
    println!("  3. Run: sitecraft pages");

    Ok(())
}
