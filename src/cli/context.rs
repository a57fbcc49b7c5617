use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use soulfill_template_store::InMemoryTemplateStore;
use tokio::sync::OnceCell;

use crate::cli::output::OutputFormat;
use crate::cli::session::PageSession;
use crate::config::Config;

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
    output: OutputFormat,
    store: OnceCell<Arc<InMemoryTemplateStore>>,
}

impl CliContext {
    pub fn new(config: Config, config_path: PathBuf, output: OutputFormat) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            output,
            store: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    /// Template store mirrored to `store_path`, opened on first use.
    pub async fn store(&self) -> Result<Arc<InMemoryTemplateStore>> {
        self.store
            .get_or_try_init(|| async {
                let path = &self.config.store_path;
                InMemoryTemplateStore::with_persistence(path)
                    .map(Arc::new)
                    .with_context(|| format!("failed to open template store {}", path.display()))
            })
            .await
            .map(Arc::clone)
    }

    pub async fn open_page(&self, fixture: &Path) -> Result<PageSession> {
        let store = self.store().await?;
        PageSession::open(fixture, self.config(), store)
    }
}
