//! Truncate admin request path
//!
//! A truncate request moves through a small state machine:
//! Validating (container names, deadline) → Resolving (sentinel and
//! guard checks) → Updating (registry advance) → Acknowledged.
//! The deadline is checked before the registry is touched, so a timed
//! out request leaves no partial effect.

use std::time::Instant;

use tracing::{debug, warn};

use tidemark_core::{Error, NanoTime, Namespace, Result, SetName};

use crate::config::InfoPolicy;
use crate::engine::Engine;

/// Where a truncate request currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncatePhase {
    /// Checking the request's arguments and deadline
    Validating,
    /// Resolving the sentinel threshold and applying guards
    Resolving,
    /// Advancing the watermark registry
    Updating,
    /// Done; the watermark is in effect
    Acknowledged,
    /// Terminal failure; nothing was modified
    Rejected,
}

/// A validated truncate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncateCommand {
    /// Namespace to truncate
    pub namespace: Namespace,
    /// Set scope; `None` truncates the whole namespace
    pub set: Option<SetName>,
    /// Threshold last-update time; zero means "now"
    pub threshold: NanoTime,
}

impl TruncateCommand {
    /// Whole-namespace truncation.
    pub fn namespace(namespace: Namespace, threshold: NanoTime) -> Self {
        TruncateCommand {
            namespace,
            set: None,
            threshold,
        }
    }

    /// Single-set truncation.
    pub fn set(namespace: Namespace, set: SetName, threshold: NanoTime) -> Self {
        TruncateCommand {
            namespace,
            set: Some(set),
            threshold,
        }
    }
}

/// Acknowledgement returned for a completed truncate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncateReceipt {
    /// The watermark now governing the container (nanoseconds)
    pub watermark: u64,
    /// Whether the container held any record when the request ran;
    /// truncating an absent container succeeds as a no-op
    pub container_existed: bool,
}

/// Executes truncate commands against an engine.
///
/// Stateless apart from the engine reference; one handler can serve
/// requests from many threads.
pub struct AdminRequestHandler<'a> {
    engine: &'a Engine,
}

impl<'a> AdminRequestHandler<'a> {
    /// A handler over `engine`.
    pub fn new(engine: &'a Engine) -> Self {
        AdminRequestHandler { engine }
    }

    /// Run a truncate command to completion.
    ///
    /// # Errors
    ///
    /// - `Error::Timeout` when the policy deadline has already passed;
    ///   the registry is untouched in that case
    /// - `Error::ServerDomain` from the threshold guards
    pub fn truncate(
        &self,
        command: TruncateCommand,
        policy: Option<&InfoPolicy>,
    ) -> Result<TruncateReceipt> {
        let started = Instant::now();
        let mut phase = TruncatePhase::Validating;
        debug!(?phase, namespace = %command.namespace, "truncate request");

        // Deadline check before any effect. A zero timeout can never
        // be met and always times out here.
        if let Some(timeout) = policy.and_then(|p| p.timeout) {
            if started.elapsed() >= timeout {
                phase = TruncatePhase::Rejected;
                warn!(?phase, namespace = %command.namespace, ?timeout, "truncate timed out before applying");
                return Err(Error::Timeout(format!(
                    "truncate of '{}' exceeded {:?} before taking effect",
                    command.namespace, timeout
                )));
            }
        }

        phase = TruncatePhase::Resolving;
        debug!(?phase, set = ?command.set, threshold = %command.threshold, "resolving");
        let container_existed = match &command.set {
            Some(set) => self.engine.store().set_exists(&command.namespace, set),
            None => self.engine.store().namespace_exists(&command.namespace),
        };

        phase = TruncatePhase::Updating;
        debug!(?phase, container_existed, "advancing watermark");
        let watermark = match self
            .engine
            .truncate(&command.namespace, command.set.as_ref(), command.threshold)
        {
            Ok(watermark) => watermark,
            Err(err) => {
                phase = TruncatePhase::Rejected;
                warn!(?phase, namespace = %command.namespace, %err, "truncate rejected");
                return Err(err);
            }
        };

        phase = TruncatePhase::Acknowledged;
        debug!(?phase, watermark, container_existed, "truncate acknowledged");
        Ok(TruncateReceipt {
            watermark,
            container_existed,
        })
    }
}
