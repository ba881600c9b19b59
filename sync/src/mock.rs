//! Scripted in-memory cart service for tests.
//!
//! `MockCartService` plays the remote side of the sync contract: it
//! keeps a server-held cart, records every call in order, and can be
//! scripted to fail or to delay, so adapter tests can assert on call
//! counts, ordering, and failure handling without a network.

use crate::error::{Result, SyncError};
use crate::remote::RemoteCartService;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use storefront_cart::{Cart, CartItem, CartItemId, Product, ProductId};

/// One recorded call against the mock service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `fetch_cart`
    FetchCart,
    /// `add_item`
    AddItem {
        /// Product added
        product_id: ProductId,
        /// Quantity added
        quantity: u32,
    },
    /// `update_item`
    UpdateItem {
        /// Product updated
        product_id: ProductId,
        /// New quantity
        quantity: i64,
    },
    /// `remove_item`
    RemoveItem {
        /// Product removed
        product_id: ProductId,
    },
    /// `clear`
    Clear,
}

impl MockCall {
    /// Whether this call mutates the server cart
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::FetchCart)
    }
}

#[derive(Debug, Default)]
struct MockInner {
    cart: Mutex<Cart>,
    catalog: Mutex<Vec<Product>>,
    calls: Mutex<Vec<MockCall>>,
    failures: Mutex<VecDeque<SyncError>>,
    latencies: Mutex<VecDeque<Duration>>,
}

/// In-memory stand-in for the remote cart service
///
/// Clones share state, so tests can keep a handle for assertions while
/// the adapter owns another.
#[derive(Debug, Clone, Default)]
pub struct MockCartService {
    inner: Arc<MockInner>,
}

impl MockCartService {
    /// Create a mock with an empty server cart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose server cart is pre-seeded
    #[must_use]
    pub fn with_cart(cart: Cart) -> Self {
        let mock = Self::new();
        *mock.inner.cart.lock().unwrap_or_else(PoisonError::into_inner) = cart;
        mock
    }

    /// Teach the mock a product so `add_item` can build server lines
    pub fn seed_product(&self, product: Product) {
        self.inner
            .catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(product);
    }

    /// Script the next call to fail with the given error
    pub fn fail_next(&self, error: SyncError) {
        self.inner
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(error);
    }

    /// Script a latency for the next mutating call
    pub fn delay_next(&self, latency: Duration) {
        self.inner
            .latencies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(latency);
    }

    /// All recorded calls, in order
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.inner
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded mutating calls
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|call| call.is_mutation()).count()
    }

    /// The current server-held cart
    #[must_use]
    pub fn server_cart(&self) -> Cart {
        self.inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: MockCall) {
        self.inner
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn take_failure(&self) -> Result<()> {
        let scripted = self
            .inner
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match scripted {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn take_latency(&self) -> Option<Duration> {
        self.inner
            .latencies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    async fn apply_latency(&self) {
        if let Some(latency) = self.take_latency() {
            tokio::time::sleep(latency).await;
        }
    }

    fn lookup(&self, product_id: ProductId) -> Option<Product> {
        self.inner
            .catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|product| product.id == product_id)
            .cloned()
    }
}

impl RemoteCartService for MockCartService {
    async fn fetch_cart(&self) -> Result<Cart> {
        self.record(MockCall::FetchCart);
        self.take_failure()?;
        Ok(self.server_cart())
    }

    async fn add_item(&self, product_id: ProductId, quantity: u32) -> Result<()> {
        self.apply_latency().await;
        self.record(MockCall::AddItem {
            product_id,
            quantity,
        });
        self.take_failure()?;

        let product = self.lookup(product_id).ok_or_else(|| SyncError::Rejected {
            message: format!("produk {product_id} tidak ditemukan"),
        })?;

        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(line) = cart
            .items
            .iter_mut()
            .find(|line| line.product.id == product_id)
        {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            // Server line ids are server-generated; derive from the product.
            let id = CartItemId::new(product_id.get());
            cart.items.push(CartItem::new(id, product, quantity));
        }
        cart.recompute();
        Ok(())
    }

    async fn update_item(&self, product_id: ProductId, quantity: i64) -> Result<()> {
        self.apply_latency().await;
        self.record(MockCall::UpdateItem {
            product_id,
            quantity,
        });
        self.take_failure()?;

        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if quantity > 0 {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            if let Some(line) = cart
                .items
                .iter_mut()
                .find(|line| line.product.id == product_id)
            {
                line.quantity = quantity;
            }
        } else {
            cart.items.retain(|line| line.product.id != product_id);
        }
        cart.recompute();
        Ok(())
    }

    async fn remove_item(&self, product_id: ProductId) -> Result<()> {
        self.apply_latency().await;
        self.record(MockCall::RemoveItem { product_id });
        self.take_failure()?;

        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cart.items.retain(|line| line.product.id != product_id);
        cart.recompute();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.apply_latency().await;
        self.record(MockCall::Clear);
        self.take_failure()?;

        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *cart = Cart::empty();
        Ok(())
    }
}
