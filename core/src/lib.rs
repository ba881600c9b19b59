//! # Storefront Core
//!
//! Core traits and types for the storefront cart architecture.
//!
//! The cart subsystem is built around the Reducer pattern:
//!
//! - **State**: owned domain state for a feature (the cart, the session)
//! - **Action**: every input that can change state (the dispatchable intents)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side-effect descriptions, executed by the runtime, never by reducers
//! - **Environment**: injected dependencies behind traits (clock, id generation)
//!
//! Reducers never perform I/O and never fail: every action is a total
//! function over the state domain. All networking lives behind the sync
//! adapter, outside this crate.
//!
//! ## Example
//!
//! ```
//! use storefront_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Counter { count: i64 }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction { Increment }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = Counter;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Counter,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain the transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: the domain state this reducer operates on
    /// - `Action`: the action type this reducer processes
    /// - `Environment`: the injected dependencies this reducer needs
    ///
    /// # Contract
    ///
    /// `reduce` must be a total function: it validates the action, updates
    /// state in place, and returns effect descriptions. It must not perform
    /// I/O, must not panic, and must not suspend.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: mutable reference to current state
        /// - `action`: the action to process
        /// - `env`: reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effect descriptions to be executed by the runtime. Most cart
        /// transitions return no effects; the inline capacity of four keeps
        /// the common case off the heap.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe side effects to be performed by the runtime. They are
/// values, not execution, and are returned from reducers.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future an effect runs, optionally producing a feedback action.
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the `Store`
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: the action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into
        /// the reducer through the store.
        Future(EffectFuture<Action>),
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation as an effect
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Self::Future(Box::pin(fut))
        }

        /// Whether this effect is the no-op effect
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Self::None)
        }
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// All external dependencies a reducer needs are abstracted behind traits
/// and injected via the Environment parameter, so tests can substitute
/// deterministic implementations.
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Identifier generator - abstracts id generation for testability
    ///
    /// Cart item identifiers are client-generated tokens. Production ids are
    /// derived from the current epoch milliseconds; tests inject sequential
    /// generators for deterministic assertions.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier
        ///
        /// Every call returns a value strictly greater than any previously
        /// returned value from the same generator.
        fn next_id(&self) -> u64;
    }

    /// Production id generator: epoch milliseconds read through a
    /// [`Clock`], bumped when two calls land in the same millisecond so
    /// ids stay unique and monotonic.
    #[derive(Debug, Default)]
    pub struct SystemIdGenerator<C = SystemClock> {
        clock: C,
        last: AtomicU64,
    }

    impl SystemIdGenerator<SystemClock> {
        /// Create a generator over the system clock
        #[must_use]
        pub const fn new() -> Self {
            Self::with_clock(SystemClock)
        }
    }

    impl<C: Clock> SystemIdGenerator<C> {
        /// Create a generator reading time from the given clock
        #[must_use]
        pub const fn with_clock(clock: C) -> Self {
            Self {
                clock,
                last: AtomicU64::new(0),
            }
        }
    }

    impl<C: Clock> IdGenerator for SystemIdGenerator<C> {
        fn next_id(&self) -> u64 {
            // timestamp_millis is positive for any realistic clock; a clock
            // before 1970 degrades to the monotonic bump path.
            let now = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
            let mut prev = self.last.load(Ordering::Relaxed);
            loop {
                let candidate = now.max(prev + 1);
                match self.last.compare_exchange_weak(
                    prev,
                    candidate,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => return candidate,
                    Err(observed) => prev = observed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, IdGenerator, SystemClock, SystemIdGenerator};

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn system_ids_are_strictly_increasing() {
        let ids = SystemIdGenerator::new();
        let mut prev = ids.next_id();
        for _ in 0..1000 {
            let next = ids.next_id();
            assert!(next > prev, "expected {next} > {prev}");
            prev = next;
        }
    }

    #[test]
    fn ids_derive_from_the_injected_clock() {
        use chrono::TimeZone;

        #[derive(Debug)]
        struct FrozenClock;
        impl Clock for FrozenClock {
            fn now(&self) -> chrono::DateTime<chrono::Utc> {
                chrono::Utc
                    .with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
                    .single()
                    .unwrap_or_default()
            }
        }

        let expected = u64::try_from(FrozenClock.now().timestamp_millis()).unwrap_or(0);
        let ids = SystemIdGenerator::with_clock(FrozenClock);

        // First id is the clock reading; a frozen clock then falls into
        // the same-millisecond bump path.
        assert_eq!(ids.next_id(), expected);
        assert_eq!(ids.next_id(), expected + 1);
        assert_eq!(ids.next_id(), expected + 2);
    }

    #[test]
    fn effect_debug_formatting() {
        let none: Effect<()> = Effect::None;
        assert_eq!(format!("{none:?}"), "Effect::None");

        let fut: Effect<()> = Effect::future(async { None });
        assert_eq!(format!("{fut:?}"), "Effect::Future(<future>)");
        assert!(!fut.is_none());
    }
}
