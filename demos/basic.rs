//! Basic usage example for the task runner.
//!
//! This example demonstrates:
//! - Implementing the Callback trait for a flaky "upload" operation
//! - Configuring concurrency and the retry schedule
//! - Logging progress through TracingEventHandler
//! - Reading the run summary
//!
//! Run with `RUST_LOG=debug cargo run --example basic` to see worker output.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::anyhow;
use async_task_runner::{Callback, HasEntityId, TaskRunner, TracingEventHandler};
use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

/// A file waiting to be uploaded.
#[derive(Clone, Debug)]
struct Upload {
    name: String,
    /// How many times the fake server rejects this file before accepting it.
    rejections: u32,
}

impl HasEntityId for Upload {
    fn entity_id(&self) -> String {
        self.name.clone()
    }
}

/// Pretends to upload files, rejecting each one a configured number of times.
#[derive(Default)]
struct FakeUploader {
    seen: Mutex<HashMap<String, u32>>,
}

#[async_trait]
impl Callback<Upload> for FakeUploader {
    type Output = usize;
    type Error = anyhow::Error;

    async fn call(&self, upload: Upload) -> anyhow::Result<usize> {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let attempt = {
            let mut seen = self.seen.lock().map_err(|_| anyhow!("state poisoned"))?;
            let count = seen.entry(upload.name.clone()).or_insert(0);
            *count += 1;
            *count
        };

        if attempt <= upload.rejections {
            return Err(anyhow!("server busy (attempt {})", attempt));
        }
        Ok(upload.name.len())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let uploads = vec![
        Upload { name: "report.pdf".into(), rejections: 0 },
        Upload { name: "photo.jpg".into(), rejections: 2 },
        Upload { name: "notes.txt".into(), rejections: 1 },
        Upload { name: "backup.tar".into(), rejections: 0 },
    ];

    let runner = TaskRunner::builder(FakeUploader::default())
        .concurrent_tasks(2)
        .retry_after_seconds(0.2)
        .retry_delay_step_milliseconds(100)
        .with_event_handler(TracingEventHandler)
        .build()?;

    let summary = runner.run(uploads).await;

    println!(
        "Uploaded {} files in {} attempts ({} failed attempts)",
        summary.succeeded, summary.attempts, summary.failures
    );
    Ok(())
}
