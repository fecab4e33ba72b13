use std::sync::Arc;

use derive_more::Display;
use tracing::{debug, info, warn};

use crate::application::SyncConfig;
use crate::controller::{Pause, StopSignal};
use crate::filesystem::Filesystem;
use crate::reconciler::{PassResult, Reconciler};

/// States of the periodic synchronization loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ControllerState {
    Idle,
    Syncing,
    Waiting,
    Stopped,
}

/// Totals over the lifetime of one controller run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub passes: usize,
    pub failed_entries: usize,
}

/// Drives the reconciler at a fixed interval until the stop signal is raised.
///
/// The stop signal is checked before every pass, including the first one, and
/// only there: a pause in progress always runs to completion. Passes never
/// overlap; the outcome of a pass is logged before the pause begins.
pub struct Controller<F, S, P> {
    config: Arc<SyncConfig>,
    reconciler: Reconciler<F>,
    stop_signal: S,
    pause: P,
}

impl<F, S, P> Controller<F, S, P>
where
    F: Filesystem,
    S: StopSignal,
    P: Pause,
{
    pub fn new(
        config: Arc<SyncConfig>,
        reconciler: Reconciler<F>,
        stop_signal: S,
        pause: P,
    ) -> Self {
        Self {
            config,
            reconciler,
            stop_signal,
            pause,
        }
    }

    /// Runs passes until stopped
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        let mut state = ControllerState::Idle;

        loop {
            let next = match state {
                ControllerState::Idle => self.at_pass_boundary(),
                ControllerState::Syncing => {
                    self.sync_once(&mut report).await;
                    ControllerState::Waiting
                }
                ControllerState::Waiting => {
                    self.pause.pause(self.config.interval).await;
                    self.at_pass_boundary()
                }
                ControllerState::Stopped => break,
            };
            debug!("Controller state {} -> {}", state, next);
            state = next;
        }

        info!(
            passes = report.passes,
            failed_entries = report.failed_entries,
            "Stop signal detected, synchronization stopped"
        );
        report
    }

    fn at_pass_boundary(&self) -> ControllerState {
        if self.stop_signal.is_raised() {
            ControllerState::Stopped
        } else {
            ControllerState::Syncing
        }
    }

    async fn sync_once(&self, report: &mut RunReport) {
        let pass = report.passes + 1;
        info!(pass, "Synchronization started");

        let result = self
            .reconciler
            .reconcile(&self.config.source, &self.config.replica)
            .await;

        report.passes = pass;
        report.failed_entries += result.failures.len();
        log_pass_outcome(pass, &result);
    }
}

fn log_pass_outcome(pass: usize, result: &PassResult) {
    let elapsed_ms = result.elapsed.as_millis() as u64;
    if result.is_clean() {
        info!(
            pass,
            created = result.created,
            updated = result.updated,
            deleted = result.deleted,
            changes = result.changes(),
            errors = 0,
            elapsed_ms,
            "Synchronization finished"
        );
    } else {
        warn!(
            pass,
            created = result.created,
            updated = result.updated,
            deleted = result.deleted,
            changes = result.changes(),
            errors = result.failures.len(),
            elapsed_ms,
            "Synchronization finished with errors"
        );
    }
}
