//! Progress surface
//!
//! The batch orchestrator reports progress through an explicit handle
//! instead of ambient/global state, so the surface lives exactly as long
//! as the batch that owns it and tests can substitute a recorder.

use async_trait::async_trait;
use tracing::info;

/// Handle the orchestrator drives while a batch runs.
///
/// Contract: `start` is called once before the first remote call (and not
/// at all for an empty batch), `advance` once after every completed call
/// with the running `(processed, total)` pair, `finish` once after the
/// dismiss delay.
#[async_trait]
pub trait ProgressSurface: Send + Sync {
    async fn start(&self, total: usize);
    async fn advance(&self, processed: usize, total: usize);
    async fn finish(&self, processed: usize, total: usize);
}

/// Progress surface rendered as log lines with a textual percentage bar.
pub struct LogProgress {
    bar_width: usize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self { bar_width: 30 }
    }

    fn render_bar(&self, processed: usize, total: usize) -> String {
        let percent = if total == 0 {
            0.0
        } else {
            processed as f64 / total as f64 * 100.0
        };
        // Clamp so a caller overshooting `total` cannot underflow the
        // empty segment below.
        let filled = ((self.bar_width * processed) / total.max(1)).min(self.bar_width);
        format!(
            "[{}{}] {:.0}%",
            "█".repeat(filled),
            "░".repeat(self.bar_width - filled),
            percent
        )
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressSurface for LogProgress {
    async fn start(&self, total: usize) {
        info!("📄 Creating documents from {} file(s)...", total);
        info!("{} 0 of {} documents created", self.render_bar(0, total), total);
    }

    async fn advance(&self, processed: usize, total: usize) {
        info!(
            "{} {} of {} documents created",
            self.render_bar(processed, total),
            processed,
            total
        );
    }

    async fn finish(&self, _processed: usize, _total: usize) {
        // The bar is already full at this point; nothing to tear down
        // for a log-backed surface.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar_bounds() {
        let progress = LogProgress::new();
        assert!(progress.render_bar(0, 4).contains("0%"));
        assert!(progress.render_bar(2, 4).contains("50%"));
        assert!(progress.render_bar(4, 4).contains("100%"));
    }

    #[test]
    fn test_render_bar_survives_overshoot() {
        let progress = LogProgress::new();
        // processed > total must not panic; the bar just stays full.
        let bar = progress.render_bar(6, 5);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 30);
        assert_eq!(bar.chars().filter(|c| *c == '░').count(), 0);
    }

    #[test]
    fn test_render_bar_fill_is_monotonic() {
        let progress = LogProgress::new();
        let filled = |p: usize| {
            progress
                .render_bar(p, 5)
                .chars()
                .filter(|c| *c == '█')
                .count()
        };
        assert!(filled(0) <= filled(1));
        assert!(filled(1) <= filled(3));
        assert_eq!(filled(5), 30);
    }
}
