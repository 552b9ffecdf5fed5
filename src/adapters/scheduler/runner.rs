//! PlanSchedulerService - periodic trigger for the scheduler tick.
//!
//! The core itself has no scheduling logic, only the idempotent
//! `ProcessPlansHandler::handle` batch operation. This service is the
//! external trigger: a tokio interval that invokes one tick per period
//! and logs the outcome.
//!
//! ## Graceful Shutdown
//!
//! The service listens on a watch channel and runs one final tick before
//! stopping, so an in-flight transition window is not left half-observed
//! longer than necessary.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::handlers::plans::{ProcessPlansHandler, TickSummary};

/// Configuration for the PlanSchedulerService.
#[derive(Debug, Clone)]
pub struct PlanSchedulerConfig {
    /// How often to run a tick.
    pub tick_interval: Duration,
}

impl Default for PlanSchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
        }
    }
}

impl PlanSchedulerConfig {
    /// Create config with a custom tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

/// Background service driving the discount plan lifecycle.
pub struct PlanSchedulerService {
    handler: Arc<ProcessPlansHandler>,
    config: PlanSchedulerConfig,
}

impl PlanSchedulerService {
    /// Create a service ticking once per minute.
    pub fn new(handler: Arc<ProcessPlansHandler>) -> Self {
        Self {
            handler,
            config: PlanSchedulerConfig::default(),
        }
    }

    /// Create a service with custom configuration.
    pub fn with_config(handler: Arc<ProcessPlansHandler>, config: PlanSchedulerConfig) -> Self {
        Self { handler, config }
    }

    /// Run the tick loop until the shutdown signal is received.
    ///
    /// A failed tick is logged and the loop keeps going; persisted plan
    /// status plus idempotent ticks mean the next interval repairs any
    /// partial run.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.tick_interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        self.tick_once().await;
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.tick_once().await;
                }
            }
        }
    }

    /// Run exactly one tick (also used by tests).
    pub async fn tick_once(&self) -> Option<TickSummary> {
        match self.handler.handle().await {
            Ok(summary) => {
                if summary != TickSummary::default() {
                    tracing::info!(
                        activated = summary.activated,
                        expired = summary.expired,
                        failed = summary.failed,
                        "scheduler tick complete"
                    );
                }
                Some(summary)
            }
            Err(e) => {
                tracing::error!(error = %e, "scheduler tick aborted");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedClock, InMemoryDiscountStore};
    use crate::domain::foundation::{PlanId, ProductId, StoreId, Timestamp, UserId};
    use crate::domain::plans::{Discount, DiscountPlan, PlanStatus, ProductPricing};
    use crate::ports::PlanStore;

    fn base_time() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    async fn seeded_service(
        now: Timestamp,
    ) -> (PlanSchedulerService, Arc<InMemoryDiscountStore>, PlanId) {
        let store = Arc::new(InMemoryDiscountStore::new());
        let clock = Arc::new(FixedClock::at(now));

        let plan = DiscountPlan::create(
            PlanId::new(),
            StoreId::new(),
            "Launch Discount",
            Discount::percentage(50).unwrap(),
            now.minus_secs(30),
            now.plus_days(1),
            UserId::new(),
            now,
        )
        .unwrap();
        store.insert(&plan).await.unwrap();

        let product = ProductId::new();
        store.insert_product(ProductPricing::undiscounted(product, 10_000));
        store.attach_product(plan.id, product).await.unwrap();

        let handler = Arc::new(ProcessPlansHandler::new(store.clone(), store.clone(), clock));
        let service = PlanSchedulerService::with_config(
            handler,
            PlanSchedulerConfig::default().with_tick_interval(Duration::from_millis(10)),
        );
        (service, store, plan.id)
    }

    #[tokio::test]
    async fn tick_once_processes_due_plans() {
        let now = base_time();
        let (service, store, plan_id) = seeded_service(now).await;

        let summary = service.tick_once().await.unwrap();

        assert_eq!(summary.activated, 1);
        assert_eq!(store.plan(plan_id).unwrap().status, PlanStatus::Active);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let now = base_time();
        let (service, store, plan_id) = seeded_service(now).await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            service.run(shutdown_rx).await;
        });

        // Give the loop time to tick at least once.
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(store.plan(plan_id).unwrap().status, PlanStatus::Active);
    }

    #[tokio::test]
    async fn config_defaults_to_one_minute() {
        let config = PlanSchedulerConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(60));
    }
}
