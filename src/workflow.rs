//! Batch helpers for setup workflows.
//!
//! A batch obtains one credential up front, then drives per-item writes. A
//! failed item is logged and recorded; the batch moves on to the next one.

use serde::Serialize;

use crate::auth::TokenProvider;
use crate::error::{Result, SetupError};
use crate::resource::{PathParams, ResourceClient, ResourceTemplate};

/// Build a resource client from a freshly obtained credential.
pub async fn connect(
    provider: &dyn TokenProvider,
    base_url: &str,
    page_size: usize,
) -> Result<ResourceClient> {
    let credential = provider.bearer_token().await?;
    Ok(ResourceClient::new(base_url, credential).with_page_size(page_size))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub index: usize,
    pub label: String,
    pub status: Option<u16>,
    pub reason: String,
}

/// Outcome of a [`create_each`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub created: usize,
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.created + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, index: usize, label: String, error: &SetupError) {
        tracing::warn!(index, item = %label, error = %error, "item create failed, continuing");
        self.failures.push(ItemFailure {
            index,
            label,
            status: error.status(),
            reason: error.to_string(),
        });
    }
}

/// POST each item in order. `label` names an item in logs and in the report.
pub async fn create_each<'a, B, I, F>(
    client: &ResourceClient,
    template: &ResourceTemplate,
    params: &PathParams,
    items: I,
    label: F,
) -> BatchReport
where
    B: Serialize + 'a,
    I: IntoIterator<Item = &'a B>,
    F: Fn(&B) -> String,
{
    let mut report = BatchReport::default();
    for (index, item) in items.into_iter().enumerate() {
        let name = label(item);
        match client.create(template, params, item).await {
            Ok(()) => {
                tracing::info!(index, item = %name, "created");
                report.created += 1;
            }
            Err(err) => report.record_failure(index, name, &err),
        }
    }
    tracing::info!(
        resource = %template,
        created = report.created,
        failed = report.failures.len(),
        "batch finished"
    );
    report
}
