use async_trait::async_trait;
use soulfill_core_types::{FieldDescriptor, FormScan, HostError};

/// Page field extraction. Both calls are independent and may race with each other.
#[async_trait]
pub trait ScanPort: Send + Sync {
    /// Fields inside `selector`, or the whole page when `None`.
    async fn scan_container(&self, selector: Option<&str>)
        -> Result<Vec<FieldDescriptor>, HostError>;
    /// One entry per top-level form-like container.
    async fn scan_whole_forms(&self) -> Result<Vec<FormScan>, HostError>;
}
