use std::collections::HashSet;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use soulfill_core_types::{Template, TemplateId, TemplateSummary};
use tracing::{debug, info, warn};

use crate::errors::StoreError;
use crate::TemplateStore;

/// Template plus bookkeeping kept alongside it on disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub template: Template,
    #[serde(default)]
    pub seq: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub use_count: u64,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct InMemoryTemplateStore {
    inner: DashMap<TemplateId, StoredTemplate>,
    storage_path: Option<PathBuf>,
    next_seq: AtomicU64,
    metrics: StoreMetrics,
}

#[derive(Default)]
struct StoreMetrics {
    lookups: AtomicU64,
    misses: AtomicU64,
    saves: AtomicU64,
    deletes: AtomicU64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatsSnapshot {
    pub lookups: u64,
    pub misses: u64,
    pub saves: u64,
    pub deletes: u64,
    pub current_templates: u64,
    pub template_uses: u64,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store mirrored to `path`; existing content is loaded eagerly.
    pub fn with_persistence(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let store = Self {
            storage_path: Some(path.clone()),
            ..Self::default()
        };

        if path.exists() {
            let bytes = fs::read(&path)?;
            if !bytes.is_empty() {
                let records: Vec<StoredTemplate> = serde_json::from_slice(&bytes)
                    .map_err(|err| StoreError::Io(format!("{}: {err}", path.display())))?;
                let mut max_seq = 0;
                for record in records {
                    max_seq = max_seq.max(record.seq);
                    store.inner.insert(record.template.id.clone(), record);
                }
                store.next_seq.store(max_seq + 1, Ordering::Relaxed);
                info!(path = %path.display(), templates = store.inner.len(), "loaded template store");
            }
        }

        Ok(store)
    }

    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }

    /// Bumps the usage counter after a template was applied to a page.
    pub fn record_applied(&self, id: &TemplateId) {
        let updated = match self.inner.get_mut(id) {
            Some(mut entry) => {
                entry.use_count = entry.use_count.saturating_add(1);
                entry.last_used_at = Some(Utc::now());
                true
            }
            None => false,
        };
        if updated {
            if let Err(err) = self.persist_to_disk() {
                warn!(error = %err, "template store persist failed after usage update");
            }
        }
    }

    pub fn record(&self, id: &TemplateId) -> Option<StoredTemplate> {
        self.inner.get(id).map(|entry| entry.value().clone())
    }

    pub fn stats_snapshot(&self) -> StoreStatsSnapshot {
        StoreStatsSnapshot {
            lookups: self.metrics.lookups.load(Ordering::Relaxed),
            misses: self.metrics.misses.load(Ordering::Relaxed),
            saves: self.metrics.saves.load(Ordering::Relaxed),
            deletes: self.metrics.deletes.load(Ordering::Relaxed),
            current_templates: self.inner.len() as u64,
            template_uses: self.inner.iter().map(|entry| entry.use_count).sum(),
        }
    }

    fn ordered(&self) -> Vec<StoredTemplate> {
        let mut records: Vec<StoredTemplate> =
            self.inner.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by_key(|record| record.seq);
        records
    }

    /// Returns the records as they were before their default flag was cleared.
    fn clear_other_defaults(&self, keep: &TemplateId) -> Vec<StoredTemplate> {
        let mut previous = Vec::new();
        for mut entry in self.inner.iter_mut() {
            if entry.key() != keep && entry.template.is_default {
                debug!(template = %entry.key(), "clearing previous default template");
                previous.push(entry.value().clone());
                entry.template.is_default = false;
                entry.updated_at = Utc::now();
            }
        }
        previous
    }

    /// Puts back records captured before a mutation whose write to disk failed.
    fn restore(
        &self,
        id: &TemplateId,
        previous: Option<StoredTemplate>,
        others: Vec<StoredTemplate>,
    ) {
        match previous {
            Some(record) => {
                self.inner.insert(id.clone(), record);
            }
            None => {
                self.inner.remove(id);
            }
        }
        for record in others {
            self.inner.insert(record.template.id.clone(), record);
        }
    }

    fn persist_to_disk(&self) -> io::Result<()> {
        let Some(path) = self.storage_path.as_ref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(&self.ordered())
            .map_err(|err| io::Error::new(ErrorKind::Other, format!("{err}")))?;
        fs::write(path, json)
    }
}

fn validate(template: &Template) -> Result<(), StoreError> {
    if template.name.is_empty() {
        return Err(StoreError::Invalid("template name is required".into()));
    }
    let mut seen = HashSet::new();
    for field in &template.fields {
        if field.label.trim().is_empty() {
            return Err(StoreError::Invalid(format!(
                "field '{}' has an empty label",
                field.key
            )));
        }
        if !seen.insert(field.key.as_str()) {
            return Err(StoreError::Invalid(format!(
                "duplicate field key '{}'",
                field.key
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn list(&self) -> Result<Vec<TemplateSummary>, StoreError> {
        Ok(self
            .ordered()
            .iter()
            .map(|record| record.template.summary())
            .collect())
    }

    async fn get(&self, id: &TemplateId) -> Result<Template, StoreError> {
        self.metrics.lookups.fetch_add(1, Ordering::Relaxed);
        match self.inner.get(id) {
            Some(entry) => Ok(entry.template.clone()),
            None => {
                self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                Err(StoreError::NotFound(id.to_string()))
            }
        }
    }

    async fn save(&self, template: Template) -> Result<Template, StoreError> {
        let mut template = template.normalized();
        validate(&template)?;
        if template.id.is_empty() {
            template.id = TemplateId::new();
        }

        let now = Utc::now();
        let id = template.id.clone();
        let previous = self.inner.get(&id).map(|entry| entry.value().clone());
        let record = match &previous {
            Some(existing) => StoredTemplate {
                template: template.clone(),
                updated_at: now,
                ..existing.clone()
            },
            None => StoredTemplate {
                template: template.clone(),
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                created_at: now,
                updated_at: now,
                use_count: 0,
                last_used_at: None,
            },
        };
        self.inner.insert(id.clone(), record);
        let cleared = if template.is_default {
            self.clear_other_defaults(&id)
        } else {
            Vec::new()
        };
        if let Err(err) = self.persist_to_disk() {
            warn!(error = %err, "template store persist failed after save; rolled back");
            self.restore(&id, previous, cleared);
            return Err(err.into());
        }
        self.metrics.saves.fetch_add(1, Ordering::Relaxed);
        debug!(template = %id, fields = template.fields.len(), "template saved");
        Ok(template)
    }

    async fn delete(&self, id: &TemplateId) -> Result<(), StoreError> {
        let Some((_, removed)) = self.inner.remove(id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        if let Err(err) = self.persist_to_disk() {
            warn!(error = %err, "template store persist failed after delete; rolled back");
            self.restore(id, Some(removed), Vec::new());
            return Err(err.into());
        }
        self.metrics.deletes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn mark_applied(&self, id: &TemplateId) -> Result<(), StoreError> {
        self.record_applied(id);
        Ok(())
    }
}
