//! Reducer logic for the cart.
//!
//! The transition function is pure and total: it validates nothing
//! beyond existence checks, performs no I/O, and cannot fail. Whether
//! an intent also needs to reach the remote cart service is decided
//! outside, by the sync adapter.

use crate::types::{AppState, Cart, CartAction, CartItem, CartItemId, Product};
use storefront_core::{SmallVec, effect::Effect, environment::IdGenerator, reducer::Reducer};
use std::sync::Arc;

/// Environment dependencies for the cart reducer
#[derive(Clone)]
pub struct CartEnvironment {
    /// Generator for client-side cart line identifiers
    pub ids: Arc<dyn IdGenerator>,
}

impl CartEnvironment {
    /// Creates a new `CartEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }
}

/// Reducer for the cart state machine
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Merge a product into the cart, or append a new line
    fn add_item(cart: &mut Cart, product: Product, quantity: u32, ids: &dyn IdGenerator) {
        if let Some(existing) = cart
            .items
            .iter_mut()
            .find(|item| item.product.id == product.id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            let id = CartItemId::new(ids.next_id());
            cart.items.push(CartItem::new(id, product, quantity));
        }
        cart.recompute();
    }

    /// Replace a line's quantity, removing the line when it drops to zero
    fn update_quantity(cart: &mut Cart, item_id: CartItemId, quantity: i64) {
        if quantity > 0 {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            if let Some(item) = cart.items.iter_mut().find(|item| item.id == item_id) {
                item.quantity = quantity;
            }
        } else {
            cart.items.retain(|item| item.id != item_id);
        }
        cart.recompute();
    }

    /// Remove a line unconditionally
    fn remove_item(cart: &mut Cart, item_id: CartItemId) {
        cart.items.retain(|item| item.id != item_id);
        cart.recompute();
    }
}

impl Reducer for CartReducer {
    type State = AppState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CartAction::SetUser(user) => {
                state.user = user;
            }
            CartAction::SetLoading(loading) => {
                state.loading = loading;
            }
            CartAction::AddItem { product, quantity } => {
                Self::add_item(&mut state.cart, product, quantity, env.ids.as_ref());
            }
            CartAction::UpdateItemQuantity { item_id, quantity } => {
                Self::update_quantity(&mut state.cart, item_id, quantity);
            }
            CartAction::RemoveItem { item_id } => {
                Self::remove_item(&mut state.cart, item_id);
            }
            CartAction::ClearCart => {
                state.cart = Cart::empty();
            }
            CartAction::ReplaceCart(cart) => {
                state.cart = cart;
            }
        }

        SmallVec::new()
    }
}
