//! # Storefront Runtime
//!
//! The `Store` runtime coordinates reducer execution for the cart.
//!
//! The store manages:
//!
//! 1. State behind a single `RwLock` - every reduce runs under the
//!    write lock, so transitions are serialized and can never
//!    interleave mid-computation
//! 2. The reducer (transition logic)
//! 3. The environment (injected dependencies)
//! 4. Effect execution with the action feedback loop
//! 5. Change notification for views: each completed transition bumps a
//!    state version observable through [`Store::subscribe`]
//!
//! ## Example
//!
//! ```ignore
//! let store = Store::new(AppState::new(), CartReducer::new(), env);
//!
//! store.send(CartAction::ClearCart).await;
//! let count = store.state(|s| s.cart.item_count).await;
//! ```

use std::sync::Arc;
use storefront_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{RwLock, watch};

/// The Store - runtime coordinator for a reducer
///
/// The store is the single serialized update channel for its state:
/// `send` acquires the write lock, runs the pure reducer, publishes the
/// new state version, and then executes any returned effects on the
/// runtime. Cloning a store is cheap and shares the underlying state.
///
/// # Type Parameters
///
/// - `S`: state type
/// - `A`: action type
/// - `E`: environment type
/// - `R`: reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    /// Monotonic state version, bumped after every transition.
    ///
    /// Views subscribe to this channel and read a fresh snapshot via
    /// [`Store::state`] whenever it changes.
    version: watch::Sender<u64>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (version, _) = watch::channel(0);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            version,
        }
    }

    /// Send an action to the store
    ///
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Bumps the state version for subscribers
    /// 4. Executes returned effects in spawned tasks; effects may
    ///    produce further actions, which are sent back to the store
    ///
    /// `send` returns after starting effect execution, not after the
    /// effects complete. Concurrent sends serialize at the reducer.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) {
        metrics::counter!("store.actions.total").increment(1);

        let effects = {
            let mut state = self.state.write().await;
            tracing::trace!("acquired write lock on state");

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            effects
        };

        // Publish the new version only after the lock is released, so a
        // subscriber reading a snapshot never observes the pre-transition
        // state under the new version.
        self.version.send_modify(|v| *v += 1);

        tracing::trace!(count = effects.len(), "executing effects");
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure so the read lock is released
    /// promptly:
    ///
    /// ```ignore
    /// let total = store.state(|s| s.cart.total).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Subscribe to state changes
    ///
    /// Returns a receiver over the monotonic state version. The value
    /// carries no state; a change means "re-read your snapshot". Views
    /// await `changed()` and then call [`Store::state`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Execute a single effect, feeding any produced action back in
    fn execute_effect(&self, effect: Effect<A>) {
        match effect {
            Effect::None => {
                tracing::trace!("executing Effect::None (no-op)");
            }
            Effect::Future(fut) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                let store = self.clone();

                tokio::spawn(async move {
                    if let Some(action) = fut.await {
                        tracing::trace!("effect produced an action, sending to store");
                        store.send(action).await;
                    }
                });
            }
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            version: self.version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::SmallVec;

    #[derive(Clone, Debug, Default)]
    struct CounterState {
        count: i64,
    }

    #[derive(Clone, Debug)]
    enum CounterAction {
        Increment,
        Reset,
    }

    #[derive(Clone)]
    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                CounterAction::Increment => state.count += 1,
                CounterAction::Reset => state.count = 0,
            }
            SmallVec::new()
        }
    }

    #[tokio::test]
    async fn send_applies_transition() {
        let store = Store::new(CounterState::default(), CounterReducer, ());

        store.send(CounterAction::Increment).await;
        store.send(CounterAction::Increment).await;
        assert_eq!(store.state(|s| s.count).await, 2);

        store.send(CounterAction::Reset).await;
        assert_eq!(store.state(|s| s.count).await, 0);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code: tasks should not panic
    async fn concurrent_sends_serialize_at_the_reducer() {
        let store = Store::new(CounterState::default(), CounterReducer, ());

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.send(CounterAction::Increment).await;
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.state(|s| s.count).await, 50);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code: sender is alive
    async fn subscribers_see_a_version_bump_per_transition() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        let mut rx = store.subscribe();
        let initial = *rx.borrow_and_update();

        store.send(CounterAction::Increment).await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), initial + 1);

        store.send(CounterAction::Increment).await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), initial + 2);
    }
}
