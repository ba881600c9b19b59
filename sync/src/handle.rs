//! View-facing cart handle.
//!
//! `CartHandle` is the single surface a view layer talks to: snapshot
//! reads, change subscription, and cart operations that already route
//! through the sync adapter. Views never construct actions themselves.

use crate::adapter::{CartStore, CartSyncAdapter};
use crate::error::Result;
use crate::remote::RemoteCartService;
use std::sync::Arc;
use storefront_cart::{AppState, Cart, CartAction, CartItemId, Product, ProductId, User};
use tokio::sync::watch;

/// Cloneable facade over the cart store and its sync adapter
///
/// A view holds one of these, renders from [`CartHandle::cart`] (or a
/// projection via [`CartHandle::state`]), and re-reads whenever the
/// receiver from [`CartHandle::subscribe`] reports a change.
pub struct CartHandle<S> {
    store: CartStore,
    adapter: Arc<CartSyncAdapter<S>>,
}

impl<S: RemoteCartService> CartHandle<S> {
    /// Bind a handle to a store and its adapter
    ///
    /// The adapter must drive the same store, otherwise confirmed
    /// mutations and snapshots would disagree.
    #[must_use]
    pub fn new(store: CartStore, adapter: Arc<CartSyncAdapter<S>>) -> Self {
        Self { store, adapter }
    }

    /// Snapshot of the whole cart
    pub async fn cart(&self) -> Cart {
        self.store.state(|s| s.cart.clone()).await
    }

    /// Read a projection of the current app state
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.store.state(f).await
    }

    /// Subscribe to state changes; a change means re-read the snapshot
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.subscribe()
    }

    /// Add a product to the cart
    pub async fn add_item(&self, product: Product, quantity: u32) -> Result<()> {
        self.adapter.add_item(product, quantity).await
    }

    /// Set a cart line's quantity; zero or less removes it
    pub async fn update_quantity(
        &self,
        item_id: CartItemId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<()> {
        self.adapter
            .update_quantity(item_id, product_id, quantity)
            .await
    }

    /// Remove a cart line
    pub async fn remove_item(&self, item_id: CartItemId, product_id: ProductId) -> Result<()> {
        self.adapter.remove_item(item_id, product_id).await
    }

    /// Empty the cart
    pub async fn clear(&self) -> Result<()> {
        self.adapter.clear().await
    }

    /// Pull the server cart into local state
    pub async fn refresh(&self) -> Result<()> {
        self.adapter.refresh().await
    }

    /// Record the signed-in user, or clear it on logout
    pub async fn set_user(&self, user: Option<User>) {
        self.store.send(CartAction::SetUser(user)).await;
    }

    /// Flip the global loading flag
    pub async fn set_loading(&self, loading: bool) {
        self.store.send(CartAction::SetLoading(loading)).await;
    }
}

impl<S> Clone for CartHandle<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            adapter: Arc::clone(&self.adapter),
        }
    }
}
