use super::Session;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output file (prints to stdout when omitted)
    #[arg(short, long)]
    pub out: Option<String>,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let session = Session::open(cwd)?;
    let json = session.doc.export()?;

    match args.out {
        Some(out) => {
            let path = PathBuf::from(cwd).join(out);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, json)?;
            println!(
                "  {} Exported {} → {}",
                "✓".green(),
                session.config.site_id.bold(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
