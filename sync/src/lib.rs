//! # Storefront Sync
//!
//! This crate connects the pure cart reducer to a cart backend and
//! exposes the surface a view layer binds to.
//!
//! ## Features
//!
//! - **Session split**: guest sessions stay local, authenticated
//!   sessions route through the remote cart service
//! - **Server confirmation**: remote mutations fold into local state
//!   only after the server accepts them
//! - **Wholesale replace**: after a confirmed mutation the server cart
//!   is refetched and replaces the local cart, so totals never drift
//! - **Ordered mutations**: concurrent mutations against the same
//!   product reach the server in submission order
//!
//! ## Architecture
//!
//! ```text
//! View → CartHandle → CartSyncAdapter → Store (local)
//!                                     → RemoteCartService (remote)
//! ```
//!
//! ## Example: binding a guest cart
//!
//! ```rust,ignore
//! use storefront_sync::*;
//!
//! let session = Arc::new(InMemorySessionStore::new());
//! let service = HttpCartService::new("https://shop.example/api", Arc::clone(&session))?;
//! let adapter = Arc::new(CartSyncAdapter::select(store.clone(), session, service));
//! let handle = CartHandle::new(store, adapter);
//!
//! handle.add_item(product, 2).await?;
//! let cart = handle.cart().await;
//! ```

// Public modules
pub mod adapter;
pub mod error;
pub mod handle;
pub mod remote;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Re-export commonly used types
pub use adapter::{CartStore, CartSyncAdapter};
pub use error::{Result, SyncError};
pub use handle::CartHandle;
pub use remote::{DEFAULT_TIMEOUT, HttpCartService, RemoteCartService};
pub use session::{InMemorySessionStore, SessionStore};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockCall, MockCartService};
