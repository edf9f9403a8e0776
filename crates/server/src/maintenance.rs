//! Periodic maintenance: leftover cascade debris and expired bans.

use std::time::Duration;

use galerie_core::{DeletionService, ModerationService};
use tokio::time::interval;

/// Maintenance schedule.
#[derive(Debug, Clone, Copy)]
pub struct MaintenanceConfig {
    /// Time between two passes.
    pub every: Duration,
    /// Galeries and images handled per pass.
    pub batch: u64,
}

/// Spawn the maintenance loop.
pub fn spawn(
    config: MaintenanceConfig,
    deletion_service: DeletionService,
    moderation_service: ModerationService,
) {
    tokio::spawn(async move {
        let mut interval = interval(config.every);
        loop {
            interval.tick().await;

            match deletion_service.sweep(config.batch).await {
                Ok(report) => {
                    if !report.is_empty() {
                        tracing::info!(
                            galeries = report.galeries.len(),
                            images = report.images.len(),
                            blob_failures = report.blob_failures.len(),
                            "Swept cascade leftovers"
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Sweep failed");
                }
            }

            if let Err(e) = moderation_service.purge_expired_black_lists().await {
                tracing::error!(error = %e, "Failed to purge expired black lists");
            }
        }
    });
}
