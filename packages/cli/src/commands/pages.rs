use super::Session;
use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use sitecraft_editor::hierarchy::{child_pages, page_url};
use sitecraft_editor::model::{DropPosition, Page};
use sitecraft_editor::{Mutation, OrphanPolicy};

#[derive(Debug, Args)]
pub struct PagesArgs {
    /// Also print page ids
    #[arg(long)]
    pub ids: bool,
}

#[derive(Debug, Args)]
pub struct AddPageArgs {
    /// Page title
    pub title: String,

    /// Parent page id
    #[arg(short, long)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PositionArg {
    Before,
    After,
    Inside,
}

impl From<PositionArg> for DropPosition {
    fn from(position: PositionArg) -> Self {
        match position {
            PositionArg::Before => DropPosition::Before,
            PositionArg::After => DropPosition::After,
            PositionArg::Inside => DropPosition::Inside,
        }
    }
}

#[derive(Debug, Args)]
pub struct MovePageArgs {
    /// Page to move
    pub source: String,

    /// Page to drop it on
    pub target: String,

    /// Where relative to the target
    #[arg(short, long, value_enum, default_value = "after")]
    pub position: PositionArg,
}

#[derive(Debug, Args)]
pub struct DeletePageArgs {
    /// Page to delete
    pub page: String,

    /// Delete child pages too instead of promoting them
    #[arg(long)]
    pub cascade: bool,
}

pub fn pages(args: PagesArgs, cwd: &str) -> Result<()> {
    let session = Session::open(cwd)?;
    let site = session.doc.site();

    println!("{} {}", "📄".bright_blue(), site.name.bold());
    if site.pages.is_empty() {
        println!("{}", "  (no pages)".dimmed());
        return Ok(());
    }
    print_level(&site.pages, None, 1, args.ids);
    Ok(())
}

fn print_level(pages: &[Page], parent_id: Option<&str>, depth: usize, ids: bool) {
    for page in child_pages(pages, parent_id) {
        let mut line = format!(
            "{}{} {} {}",
            "  ".repeat(depth),
            format!("{}.", page.order).dimmed(),
            page.title,
            page_url(pages, &page.id).cyan()
        );
        if ids {
            line.push_str(&format!(" [{}]", page.id).dimmed().to_string());
        }
        if !page.is_published {
            line.push_str(&format!(" {}", "draft".yellow()));
        }
        if !page.show_in_nav {
            line.push_str(&format!(" {}", "hidden".dimmed()));
        }
        println!("{}", line);
        print_level(pages, Some(&page.id), depth + 1, ids);
    }
}

pub fn add_page(args: AddPageArgs, cwd: &str) -> Result<()> {
    let mut session = Session::open(cwd)?;
    let outcome = session.doc.apply(&Mutation::CreatePage {
        title: args.title.clone(),
        parent_id: args.parent,
    })?;
    session.save()?;

    let id = outcome
        .created
        .first()
        .ok_or_else(|| anyhow!("no page was created"))?;
    println!(
        "  {} Added {} → {}",
        "✓".green(),
        args.title.bold(),
        page_url(&session.doc.site().pages, id).cyan()
    );
    Ok(())
}

pub fn move_page(args: MovePageArgs, cwd: &str) -> Result<()> {
    let mut session = Session::open(cwd)?;
    for id in [&args.source, &args.target] {
        if session.doc.site().page(id).is_none() {
            return Err(anyhow!("Page not found: {}", id));
        }
    }

    let position = DropPosition::from(args.position);
    let outcome = session.doc.apply(&Mutation::ReorderPages {
        source_id: args.source.clone(),
        target_id: args.target.clone(),
        position,
    })?;

    if !outcome.changed {
        println!(
            "{} Cannot move {} {} {}",
            "⚠️".yellow(),
            args.source,
            position,
            args.target
        );
        return Ok(());
    }

    session.save()?;
    println!(
        "  {} Moved {} {} {}",
        "✓".green(),
        args.source.bold(),
        position,
        args.target.bold()
    );
    Ok(())
}

pub fn delete_page(args: DeletePageArgs, cwd: &str) -> Result<()> {
    let mut session = Session::open(cwd)?;
    if session.doc.site().page(&args.page).is_none() {
        return Err(anyhow!("Page not found: {}", args.page));
    }

    let policy = if args.cascade {
        OrphanPolicy::Cascade
    } else {
        OrphanPolicy::PromoteToParent
    };
    let before = session.doc.site().pages.len();
    session.doc.apply(&Mutation::DeletePage {
        page_id: args.page.clone(),
        policy,
    })?;
    session.save()?;

    let removed = before - session.doc.site().pages.len();
    println!(
        "  {} Deleted {} ({} page{})",
        "✓".green(),
        args.page.bold(),
        removed,
        if removed == 1 { "" } else { "s" }
    );
    Ok(())
}
