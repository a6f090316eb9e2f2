//! Outbound channel for approved draft content.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

/// Pluggable output channel the review desk hands approved content to.
#[async_trait]
pub trait PublishChannel: Send + Sync {
    async fn publish(&self, content: &str) -> Result<()>;
}

/// Writes approved content to stdout (the CLI's "clipboard").
pub struct StdoutChannel;

#[async_trait]
impl PublishChannel for StdoutChannel {
    async fn publish(&self, content: &str) -> Result<()> {
        println!("{content}");
        Ok(())
    }
}

/// Swallows content. For environments with no outbound side effects.
pub struct NoopChannel;

#[async_trait]
impl PublishChannel for NoopChannel {
    async fn publish(&self, _content: &str) -> Result<()> {
        Ok(())
    }
}

/// Records published content for test assertions.
#[derive(Default)]
pub struct MemoryChannel {
    published: Mutex<Vec<String>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishChannel for MemoryChannel {
    async fn publish(&self, content: &str) -> Result<()> {
        self.published.lock().unwrap().push(content.to_string());
        Ok(())
    }
}
