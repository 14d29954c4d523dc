use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::shared::AppError;

type SharedResult<V> = Shared<BoxFuture<'static, Result<V, AppError>>>;

enum Slot<V: Clone> {
    /// A computation is running; later callers await the same future
    Pending {
        generation: u64,
        future: SharedResult<V>,
    },
    Ready(V),
}

struct Slots<K, V: Clone> {
    entries: HashMap<K, Slot<V>>,
    next_generation: u64,
}

/// Keyed single-flight memoization table.
///
/// The first caller for a key starts the computation; concurrent callers for
/// the same key attach to it and all observe the same outcome. Successful
/// results stay cached for the lifetime of the table. Failures are evicted so
/// the next caller starts afresh.
///
/// The lock only guards slot bookkeeping and is never held while a
/// computation is awaited, so distinct keys make progress independently.
pub struct SingleFlightCache<K, V: Clone> {
    slots: Mutex<Slots<K, V>>,
}

impl<K, V> Default for SingleFlightCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SingleFlightCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                entries: HashMap::new(),
                next_generation: 0,
            }),
        }
    }

    /// Completed value for `key`, if any. In-flight computations are not awaited.
    pub async fn get(&self, key: &K) -> Option<V> {
        match self.slots.lock().await.entries.get(key) {
            Some(Slot::Ready(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Returns the cached value for `key`, joining or starting the computation as needed.
    ///
    /// `init` is only invoked when no entry exists for the key.
    pub async fn get_or_try_init<F, Fut>(&self, key: K, init: F) -> Result<V, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, AppError>> + Send + 'static,
    {
        let (generation, future) = {
            let mut guard = self.slots.lock().await;
            let slots = &mut *guard;

            // A failure nobody stayed around to settle is as good as no entry
            let abandoned_failure = matches!(
                slots.entries.get(&key),
                Some(Slot::Pending { future, .. }) if matches!(future.peek(), Some(Err(_)))
            );
            if abandoned_failure {
                debug!("Discarding settled failure left by a cancelled caller");
                slots.entries.remove(&key);
            }

            match slots.entries.get(&key) {
                Some(Slot::Ready(value)) => {
                    debug!("Cache hit");
                    return Ok(value.clone());
                }
                Some(Slot::Pending { generation, future }) => {
                    debug!("Joining in-flight computation");
                    (*generation, future.clone())
                }
                None => {
                    let generation = slots.next_generation;
                    slots.next_generation += 1;
                    let future = init().boxed().shared();
                    slots.entries.insert(
                        key.clone(),
                        Slot::Pending {
                            generation,
                            future: future.clone(),
                        },
                    );
                    (generation, future)
                }
            }
        };

        let outcome = future.await;
        self.settle(key, generation, &outcome).await;
        outcome
    }

    /// Replaces the pending slot for `key` with the outcome, provided the slot
    /// still belongs to the computation identified by `generation`.
    async fn settle(&self, key: K, generation: u64, outcome: &Result<V, AppError>) {
        let mut guard = self.slots.lock().await;
        let slots = &mut *guard;

        let owned = matches!(
            slots.entries.get(&key),
            Some(Slot::Pending { generation: current, .. }) if *current == generation
        );
        if !owned {
            return;
        }

        match outcome {
            Ok(value) => {
                slots.entries.insert(key, Slot::Ready(value.clone()));
            }
            Err(err) => {
                warn!(error = %err, "Computation failed, evicting cache entry");
                slots.entries.remove(&key);
            }
        }
    }
}
