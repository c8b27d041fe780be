use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use sitecraft_editor::TemplateCategory;

#[derive(Debug, Args)]
pub struct LibraryArgs {
    /// Only list combinations matching this text
    #[arg(short, long)]
    pub search: Option<String>,
}

pub fn library(args: LibraryArgs, cwd: &str) -> Result<()> {
    let registry = Config::load(cwd)?.load_registry(cwd)?;

    if args.search.is_none() {
        println!("{}", "Templates".bright_blue().bold());
        for category in [
            TemplateCategory::Basic,
            TemplateCategory::Media,
            TemplateCategory::Layout,
            TemplateCategory::Advanced,
        ] {
            let templates: Vec<_> = registry.templates_in(category).collect();
            if templates.is_empty() {
                continue;
            }
            println!("  {}", format!("{:?}", category).bold());
            for template in templates {
                println!(
                    "    {} {:<16} {}",
                    template.icon,
                    template.id.cyan(),
                    template.description.dimmed()
                );
            }
        }
        println!();
    }

    let combinations = match &args.search {
        Some(query) => registry.search(query),
        None => registry.combinations.iter().collect(),
    };

    println!("{}", "Combinations".bright_blue().bold());
    if combinations.is_empty() {
        println!("{}", "  (no matches)".dimmed());
    }
    for combination in combinations {
        println!(
            "  {:<24} {} {}",
            combination.id.cyan(),
            combination.description,
            format!("[{}]", combination.tags.join(", ")).dimmed()
        );
    }

    Ok(())
}
