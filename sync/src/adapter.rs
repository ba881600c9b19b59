//! Cart sync adapter: bridges cart intents to the active backend.
//!
//! The adapter owns the policy split between guest and authenticated
//! sessions. Guest sessions apply every intent locally through the
//! reducer. Authenticated sessions send the intent to the remote cart
//! service first and only fold the result into local state after the
//! server confirms, by refetching the server cart and replacing the
//! local one wholesale.

use crate::error::{Result, SyncError};
use crate::remote::RemoteCartService;
use crate::session::SessionStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use storefront_cart::{AppState, Cart, CartAction, CartEnvironment, CartItemId, CartReducer, Product, ProductId};
use storefront_runtime::Store;
use tokio::sync::RwLock;

/// The store type the adapter drives
pub type CartStore = Store<AppState, CartAction, CartEnvironment, CartReducer>;

/// Which side of the session split a cart operation targets
enum Backend<S> {
    /// Guest session: intents apply locally only
    Local,
    /// Authenticated session: intents go to the remote service
    Remote(S),
}

/// Routes cart intents to the local reducer or the remote service
///
/// The backend is selected once, when the adapter is built, from
/// whether the session holds a token. A login or logout produces a new
/// adapter rather than flipping this one mid-flight.
pub struct CartSyncAdapter<S> {
    store: CartStore,
    session: Arc<dyn SessionStore>,
    backend: Backend<S>,
    /// Cart-wide ordering gate. Item mutations take it shared; `clear`
    /// takes it exclusive so it cannot interleave with item mutations.
    ordering: RwLock<()>,
    /// Per-product locks: mutations touching the same product run in
    /// the order they acquired the lock, mutations on different
    /// products run concurrently.
    locks: Mutex<HashMap<ProductId, Arc<tokio::sync::Mutex<()>>>>,
    /// Every refetch+replace pair runs under this lock, so replaces
    /// apply in fetch order and a stale snapshot can never overwrite
    /// the mirror of a later confirmed mutation.
    mirror: tokio::sync::Mutex<()>,
}

impl<S: RemoteCartService> CartSyncAdapter<S> {
    /// Build an adapter, selecting the backend from the session
    ///
    /// A session holding a token selects the remote backend; otherwise
    /// every intent stays local.
    pub fn select(store: CartStore, session: Arc<dyn SessionStore>, service: S) -> Self {
        let backend = if session.has_token() {
            tracing::debug!("session holds a token, selecting remote backend");
            Backend::Remote(service)
        } else {
            tracing::debug!("no session token, selecting local backend");
            Backend::Local
        };

        Self {
            store,
            session,
            backend,
            ordering: RwLock::new(()),
            locks: Mutex::new(HashMap::new()),
            mirror: tokio::sync::Mutex::new(()),
        }
    }

    /// Whether this adapter routes mutations to the remote service
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self.backend, Backend::Remote(_))
    }

    /// Add a product to the cart
    ///
    /// Remote sessions post the addition and refetch; guest sessions
    /// merge locally by product id.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_item(&self, product: Product, quantity: u32) -> Result<()> {
        match &self.backend {
            Backend::Local => {
                self.store
                    .send(CartAction::AddItem { product, quantity })
                    .await;
                Ok(())
            }
            Backend::Remote(service) => {
                let _ordering = self.ordering.read().await;
                let lock = self.product_lock(product.id);
                let _guard = lock.lock().await;
                self.confirm(service, service.add_item(product.id, quantity).await)
                    .await
            }
        }
    }

    /// Set the quantity of an existing cart line
    ///
    /// A quantity of zero or less removes the line. The local path is
    /// keyed by cart line id, the remote contract by product id, so
    /// callers supply both.
    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_quantity(
        &self,
        item_id: CartItemId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<()> {
        match &self.backend {
            Backend::Local => {
                self.store
                    .send(CartAction::UpdateItemQuantity { item_id, quantity })
                    .await;
                Ok(())
            }
            Backend::Remote(service) => {
                let _ordering = self.ordering.read().await;
                let lock = self.product_lock(product_id);
                let _guard = lock.lock().await;
                self.confirm(service, service.update_item(product_id, quantity).await)
                    .await
            }
        }
    }

    /// Remove a cart line
    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, item_id: CartItemId, product_id: ProductId) -> Result<()> {
        match &self.backend {
            Backend::Local => {
                self.store.send(CartAction::RemoveItem { item_id }).await;
                Ok(())
            }
            Backend::Remote(service) => {
                let _ordering = self.ordering.read().await;
                let lock = self.product_lock(product_id);
                let _guard = lock.lock().await;
                self.confirm(service, service.remove_item(product_id).await)
                    .await
            }
        }
    }

    /// Empty the cart
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        match &self.backend {
            Backend::Local => {
                self.store.send(CartAction::ClearCart).await;
                Ok(())
            }
            Backend::Remote(service) => {
                // Exclusive: no item mutation may interleave with clear.
                let _ordering = self.ordering.write().await;
                self.confirm(service, service.clear().await).await
            }
        }
    }

    /// Pull the server cart into local state
    ///
    /// Remote sessions fetch and replace wholesale; for guest sessions
    /// local state is already authoritative and this is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        match &self.backend {
            Backend::Local => Ok(()),
            Backend::Remote(service) => {
                let _mirror = self.mirror.lock().await;
                let cart = match service.fetch_cart().await {
                    Ok(cart) => cart,
                    Err(error) => return Err(self.fail(error)),
                };
                self.replace(cart).await;
                Ok(())
            }
        }
    }

    /// Fold a confirmed mutation into local state
    ///
    /// On success the server cart is refetched and replaces the local
    /// cart, so local totals always reflect what the server accepted.
    /// On failure local state is left untouched.
    async fn confirm(&self, service: &S, outcome: Result<()>) -> Result<()> {
        if let Err(error) = outcome {
            return Err(self.fail(error));
        }
        metrics::counter!("sync.mutations.confirmed").increment(1);

        let _mirror = self.mirror.lock().await;
        match service.fetch_cart().await {
            Ok(cart) => {
                self.replace(cart).await;
                Ok(())
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    async fn replace(&self, cart: Cart) {
        self.store.send(CartAction::ReplaceCart(cart)).await;
    }

    /// Record a sync failure; an expired session also drops its token
    fn fail(&self, error: SyncError) -> SyncError {
        metrics::counter!("sync.mutations.failed").increment(1);
        if error.is_unauthorized() {
            tracing::warn!("remote rejected the session token, clearing it");
            self.session.clear();
        } else {
            tracing::debug!(%error, "cart sync failed");
        }
        error
    }

    fn product_lock(&self, product_id: ProductId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            locks
                .entry(product_id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}
