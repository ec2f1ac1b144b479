use std::time::Duration;

use async_trait::async_trait;

use crate::{Result, compose::MonthPage};

/// Pause after each page so the rendering surface can settle
pub const PAGE_SETTLE_DELAY: Duration = Duration::from_millis(600);

/// Receives finished pages from the export driver
#[async_trait]
pub trait PageSink {
    /// Persist one page. `index` is the zero-based page position.
    async fn write_page(&mut self, index: usize, page: &MonthPage) -> Result<()>;
}

/// Sequential page export driver.
///
/// Pages go to the sink strictly in order: page N is fully written before
/// page N+1 starts, with a settle pause after each page. The first sink
/// error aborts the remaining pages.
pub struct Exporter {
    settle: Duration,
}

impl Exporter {
    pub fn new() -> Self {
        Self {
            settle: PAGE_SETTLE_DELAY,
        }
    }

    /// Override the settle pause (tests use zero)
    pub fn with_settle(settle: Duration) -> Self {
        Self { settle }
    }

    pub async fn export<S: PageSink + Send>(&self, pages: &[MonthPage], sink: &mut S) -> Result<()> {
        let total = pages.len();
        for (index, page) in pages.iter().enumerate() {
            tracing::info!(
                "Exporting page {}/{}: {} {}",
                index + 1,
                total,
                page.name,
                page.year
            );
            sink.write_page(index, page).await?;
            tokio::time::sleep(self.settle).await;
        }
        tracing::info!("Export finished: {} pages", total);
        Ok(())
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}
