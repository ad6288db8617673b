// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0
//! State Flusher - Background task for batched persistence
//!
//! Used with `flush_mode: background`. Classifications only mark the engine
//! dirty; this task saves at most once per interval and once more on
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::IntelligenceEngine;

pub struct StateFlusher {
    engine: Arc<IntelligenceEngine>,
    interval: Duration,
    shutdown_token: CancellationToken,
}

impl StateFlusher {
    pub fn new(engine: Arc<IntelligenceEngine>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Interval taken from the engine's persistence config
    pub fn from_config(engine: Arc<IntelligenceEngine>) -> Self {
        let seconds = engine.config().persistence.flush_interval_seconds;
        Self::new(engine, Duration::from_secs(seconds))
    }

    /// Get a handle to trigger shutdown
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Start the flusher background task
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "Starting state flusher background task"
        );

        let mut tick = interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.flush_cycle().await;
                }
                _ = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received, flushing intelligence state");
                    self.flush_cycle().await;
                    break;
                }
            }
        }

        info!("State flusher background task stopped");
    }

    async fn flush_cycle(&self) {
        match self.engine.flush().await {
            Ok(true) => debug!("Flushed intelligence state"),
            Ok(false) => debug!("Intelligence state unchanged, nothing to flush"),
            Err(e) => warn!("State flush failed, will retry next cycle: {}", e),
        }
    }
}
