//! Client handle
//!
//! `Client` is the typed front door over an engine: record operations
//! take strong types, while `truncate` accepts loosely-typed [`Arg`]
//! values and runs them through the guards first, so a caller holding
//! nothing but wire values gets the full client-side error taxonomy.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use tidemark_core::{Generation, Namespace, RecordKey, Result, SetName, Value};
use tidemark_engine::{AdminRequestHandler, Engine, InfoPolicy, TruncateCommand, TruncateReceipt};
use tidemark_storage::StoredRecord;

use crate::arg::Arg;
use crate::guard;

/// A handle onto a running engine.
#[derive(Clone)]
pub struct Client {
    engine: Arc<Engine>,
}

impl Client {
    /// A client over `engine`.
    pub fn new(engine: Arc<Engine>) -> Self {
        Client { engine }
    }

    /// The engine behind this client.
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Write a record under `(namespace, set, user_key)`.
    pub fn put(
        &self,
        namespace: &Namespace,
        set: &SetName,
        user_key: &str,
        bins: FxHashMap<String, Value>,
    ) -> Generation {
        self.engine
            .put(RecordKey::new(namespace.clone(), set.clone(), user_key), bins)
    }

    /// Read a record; truncated records read as absent.
    pub fn get(&self, namespace: &Namespace, set: &SetName, user_key: &str) -> Option<StoredRecord> {
        self.engine
            .get(&RecordKey::new(namespace.clone(), set.clone(), user_key))
    }

    /// Visibility-filtered existence check.
    pub fn exists(&self, namespace: &Namespace, set: &SetName, user_key: &str) -> bool {
        self.engine
            .exists(&RecordKey::new(namespace.clone(), set.clone(), user_key))
    }

    /// Remove a record; removing a truncated record reports not-found.
    pub fn remove(
        &self,
        namespace: &Namespace,
        set: &SetName,
        user_key: &str,
    ) -> Option<StoredRecord> {
        self.engine
            .remove(&RecordKey::new(namespace.clone(), set.clone(), user_key))
    }

    /// Truncate a namespace or set from loosely-typed arguments.
    ///
    /// `set` may be null or empty text to truncate the whole
    /// namespace; `threshold` is nanoseconds since the Unix epoch with
    /// zero meaning "now".
    ///
    /// # Errors
    ///
    /// Guard errors (`TypeArgument`, `RangeUnderflow`, `RangeOverflow`)
    /// for malformed arguments; engine errors (`ServerDomain`,
    /// `Timeout`) from the admin path.
    pub fn truncate(
        &self,
        namespace: &Arg,
        set: &Arg,
        threshold: &Arg,
        policy: Option<&InfoPolicy>,
    ) -> Result<TruncateReceipt> {
        let namespace = guard::namespace_arg(namespace)?;
        let set = guard::set_arg(set)?;
        let threshold = guard::threshold_arg(threshold)?;
        debug!(%namespace, ?set, %threshold, "truncate call");

        let command = TruncateCommand {
            namespace,
            set,
            threshold,
        };
        AdminRequestHandler::new(&self.engine).truncate(command, policy)
    }

    /// Truncate from a positional argument list
    /// `(namespace, set, threshold[, policy])`, the shape a wire
    /// decoder hands over.
    pub fn truncate_args(&self, args: &[Arg]) -> Result<TruncateReceipt> {
        let parsed = guard::parse_truncate_args(args)?;
        let command = TruncateCommand {
            namespace: parsed.namespace,
            set: parsed.set,
            threshold: parsed.threshold,
        };
        AdminRequestHandler::new(&self.engine).truncate(command, parsed.policy.as_ref())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("engine", &self.engine).finish()
    }
}
