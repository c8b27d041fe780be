use super::pages::PositionArg;
use super::Session;
use anyhow::{anyhow, Result};
use clap::{ArgGroup, Args};
use colored::Colorize;
use sitecraft_editor::block_tree::{block_count, find_block};
use sitecraft_editor::{Mutation, Placement};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["template", "combination"])))]
pub struct InsertArgs {
    /// Page to insert into
    pub page: String,

    /// Template id (one block)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Combination id (a group of blocks)
    #[arg(short, long)]
    pub combination: Option<String>,

    /// Block to insert relative to (appends to the page when omitted)
    #[arg(long)]
    pub target: Option<String>,

    /// Where relative to the target block
    #[arg(short, long, value_enum, default_value = "after")]
    pub position: PositionArg,
}

pub fn insert(args: InsertArgs, cwd: &str) -> Result<()> {
    let mut session = Session::open(cwd)?;
    let page = session
        .doc
        .site()
        .page(&args.page)
        .ok_or_else(|| anyhow!("Page not found: {}", args.page))?;

    if let Some(target) = &args.target {
        if find_block(&page.content, target).is_none() {
            return Err(anyhow!("Block not found on {}: {}", args.page, target));
        }
    }
    let before = block_count(&page.content);

    let placement = args
        .target
        .clone()
        .map(|target| Placement::new(target, args.position.into()));
    let (mutation, name) = match (args.template, args.combination) {
        (Some(template_id), _) => (
            Mutation::InsertTemplate {
                page_id: args.page.clone(),
                template_id: template_id.clone(),
                placement,
            },
            template_id,
        ),
        (None, Some(combination_id)) => {
            if session.doc.registry().combination(&combination_id).is_none() {
                return Err(anyhow!("Unknown combination: {}", combination_id));
            }
            (
                Mutation::InsertCombination {
                    page_id: args.page.clone(),
                    combination_id: combination_id.clone(),
                    placement,
                },
                combination_id,
            )
        }
        (None, None) => return Err(anyhow!("Pass --template or --combination")),
    };

    let outcome = session.doc.apply(&mutation)?;
    session.save()?;

    let added = session
        .doc
        .site()
        .page(&args.page)
        .map_or(0, |page| block_count(&page.content))
        .saturating_sub(before);
    println!(
        "  {} Inserted {} into {} ({} block{})",
        "✓".green(),
        name.bold(),
        args.page.bold(),
        added,
        if added == 1 { "" } else { "s" }
    );
    for id in &outcome.created {
        println!("    {}", id.dimmed());
    }
    Ok(())
}
