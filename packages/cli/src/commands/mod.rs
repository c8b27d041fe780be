pub mod export;
pub mod init;
pub mod insert;
pub mod library;
pub mod pages;

pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use insert::{insert, InsertArgs};
pub use library::{library, LibraryArgs};
pub use pages::{
    add_page, delete_page, move_page, pages, AddPageArgs, DeletePageArgs, MovePageArgs, PagesArgs,
};

use crate::config::Config;
use anyhow::{Context, Result};
use sitecraft_editor::{EditorError, FileStorage, SiteDocument};
use tracing::info;

/// A loaded site plus where it came from
pub struct Session {
    pub config: Config,
    pub storage: FileStorage,
    pub doc: SiteDocument,
}

impl Session {
    pub fn open(cwd: &str) -> Result<Self> {
        let config = Config::load(cwd)?;
        let storage = FileStorage::new(config.get_site_dir(cwd));
        let registry = config.load_registry(cwd)?;

        let doc = match SiteDocument::open(&storage, &config.site_id, registry, config.history_depth)
        {
            Err(EditorError::SiteNotFound(id)) => {
                anyhow::bail!("Site '{}' not found. Run: sitecraft init", id)
            }
            other => other.with_context(|| format!("cannot open site '{}'", config.site_id))?,
        };
        info!(site_id = %config.site_id, pages = doc.site().pages.len(), "opened site");

        Ok(Self {
            config,
            storage,
            doc,
        })
    }

    pub fn save(&mut self) -> Result<()> {
        self.doc.save(&mut self.storage)?;
        info!(site_id = %self.config.site_id, version = self.doc.version, "saved site");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::pages::PositionArg;
    use super::*;
    use sitecraft_editor::hierarchy::{child_pages, validate_hierarchy};
    use std::sync::{Arc, Mutex};

    fn init_site(cwd: &str) {
        init(
            InitArgs {
                name: "Test".to_string(),
                site_id: "test".to_string(),
                site_dir: "site".to_string(),
                force: false,
            },
            cwd,
        )
        .unwrap();
    }

    fn page_id(cwd: &str, title: &str) -> String {
        let session = Session::open(cwd).unwrap();
        let site = session.doc.site();
        site.pages
            .iter()
            .find(|p| p.title == title)
            .map(|p| p.id.clone())
            .unwrap()
    }

    /// Collects formatted log lines for assertions
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_session_logs_open_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        init_site(&cwd);

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut session = Session::open(&cwd).unwrap();
            session.save().unwrap();
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("opened site"));
        assert!(output.contains("saved site"));
        assert!(output.contains("site_id=test"));
    }

    #[test]
    fn test_open_without_init() {
        let dir = tempfile::tempdir().unwrap();
        let err = Session::open(&dir.path().display().to_string()).err().unwrap();
        assert!(err.to_string().contains("sitecraft init"));
    }

    #[test]
    fn test_page_commands() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        init_site(&cwd);
        let home = page_id(&cwd, "Home");

        for title in ["About", "Team"] {
            add_page(
                AddPageArgs {
                    title: title.to_string(),
                    parent: None,
                },
                &cwd,
            )
            .unwrap();
        }
        let about = page_id(&cwd, "About");
        let team = page_id(&cwd, "Team");

        move_page(
            MovePageArgs {
                source: team.clone(),
                target: about.clone(),
                position: PositionArg::Inside,
            },
            &cwd,
        )
        .unwrap();
        move_page(
            MovePageArgs {
                source: about.clone(),
                target: home.clone(),
                position: PositionArg::Before,
            },
            &cwd,
        )
        .unwrap();

        let session = Session::open(&cwd).unwrap();
        let pages = &session.doc.site().pages;
        validate_hierarchy(pages).unwrap();
        let roots: Vec<_> = child_pages(pages, None).iter().map(|p| p.id.clone()).collect();
        assert_eq!(roots, vec![about.clone(), home]);
        assert_eq!(child_pages(pages, Some(about.as_str()))[0].id, team);

        delete_page(
            DeletePageArgs {
                page: about,
                cascade: true,
            },
            &cwd,
        )
        .unwrap();
        assert_eq!(Session::open(&cwd).unwrap().doc.site().pages.len(), 1);
    }

    #[test]
    fn test_insert_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        init_site(&cwd);
        let home = page_id(&cwd, "Home");

        insert(
            InsertArgs {
                page: home.clone(),
                template: None,
                combination: Some("hero-section".to_string()),
                target: None,
                position: PositionArg::After,
            },
            &cwd,
        )
        .unwrap();
        assert!(insert(
            InsertArgs {
                page: home.clone(),
                template: Some("nope".to_string()),
                combination: None,
                target: None,
                position: PositionArg::After,
            },
            &cwd,
        )
        .is_err());

        export(
            ExportArgs {
                out: Some("out/site.json".to_string()),
            },
            &cwd,
        )
        .unwrap();
        let json = std::fs::read_to_string(dir.path().join("out/site.json")).unwrap();
        let site = sitecraft_editor::import_site(&json).unwrap();
        assert_eq!(site.page(&home).unwrap().content.len(), 3);
    }
}
