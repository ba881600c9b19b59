//! Cart domain for the storefront.
//!
//! This crate holds the single source of truth for cart contents: the
//! domain types and a deterministic, pure transition function over the
//! dispatchable cart intents. It demonstrates the core storefront
//! architecture:
//!
//! - Owned state snapshot (`AppState` with its `Cart`)
//! - Named intents (`CartAction`) covering add, update, remove, clear
//!   and wholesale replacement from the remote service
//! - A total reducer: no I/O, no failure, no illegal states
//! - Derived projections (`total`, `item_count`) recomputed together on
//!   every transition so they can never drift from the item list
//!
//! Synchronization with the remote cart service lives in the `sync`
//! crate; nothing here suspends or talks to the network.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use storefront_cart::{AppState, CartAction, CartEnvironment, CartReducer, Product, ProductId};
//! use storefront_core::{environment::SystemIdGenerator, reducer::Reducer};
//!
//! let env = CartEnvironment::new(Arc::new(SystemIdGenerator::new()));
//! let reducer = CartReducer::new();
//! let mut state = AppState::new();
//!
//! let product = Product::new(ProductId::new(1), "Botol 600ml", 950);
//! reducer.reduce(&mut state, CartAction::AddItem { product, quantity: 2 }, &env);
//!
//! assert_eq!(state.cart.item_count, 2);
//! assert_eq!(state.cart.total, 1900);
//! ```

pub mod catalog;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use catalog::{CatalogLookup, StaticCatalog};
pub use reducer::{CartEnvironment, CartReducer};
pub use types::{
    AppState, Cart, CartAction, CartItem, CartItemId, Product, ProductId, ProductVariant, User,
    UserId, VariantId,
};
