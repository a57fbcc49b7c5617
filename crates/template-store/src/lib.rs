//! Template persistence for SoulFill.
//!
//! The autofill core only ever reads templates through [`TemplateStore`]; this crate provides the
//! in-process implementation used by the CLI, optionally backed by a JSON file.

pub mod errors;
mod memory;

pub use errors::StoreError;
pub use memory::{InMemoryTemplateStore, StoreStatsSnapshot, StoredTemplate};

use async_trait::async_trait;
use soulfill_core_types::{Template, TemplateId, TemplateSummary};

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn list(&self) -> Result<Vec<TemplateSummary>, StoreError>;
    async fn get(&self, id: &TemplateId) -> Result<Template, StoreError>;
    /// Inserts or replaces a template; an empty id is assigned a fresh one.
    async fn save(&self, template: Template) -> Result<Template, StoreError>;
    async fn delete(&self, id: &TemplateId) -> Result<(), StoreError>;

    /// Usage bookkeeping after a successful fill. Stores without counters ignore it.
    async fn mark_applied(&self, _id: &TemplateId) -> Result<(), StoreError> {
        Ok(())
    }

    async fn default_template(&self) -> Result<Option<Template>, StoreError> {
        let summaries = self.list().await?;
        match summaries.into_iter().find(|summary| summary.is_default) {
            Some(summary) => self.get(&summary.id).await.map(Some),
            None => Ok(None),
        }
    }
}
