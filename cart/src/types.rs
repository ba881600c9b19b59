//! Domain types for the storefront cart.
//!
//! The cart holds read-only snapshots of products as they existed at
//! add time; it reads `harga` and `stock` and never mutates a product.
//! `Cart::total` and `Cart::item_count` are cached projections of the
//! item list and are recomputed together after every transition.

use serde::{Deserialize, Serialize};

/// Unique identifier for a product in the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(u64);

/// Unique identifier for a product variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantId(u64);

/// Client-generated identifier for a cart line
///
/// Issued by the environment's id generator when an item is first added;
/// production ids are timestamp-derived tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CartItemId(u64);

/// Unique identifier for a user account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(u64);

macro_rules! id_impls {
    ($($name:ident),*) => {
        $(
            impl $name {
                /// Wrap a raw identifier
                #[must_use]
                pub const fn new(id: u64) -> Self {
                    Self(id)
                }

                /// Return the raw identifier
                #[must_use]
                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

id_impls!(ProductId, VariantId, CartItemId, UserId);

/// A selectable product variant
///
/// Variant selection is not wired into cart insertion: adding to cart
/// always uses the base product's id and price. Modeled for catalog
/// completeness only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant identifier
    pub id: VariantId,
    /// Variant dimension name (e.g. "Ukuran")
    pub name: String,
    /// Variant value label (e.g. "600ml")
    pub value: String,
    /// Stock for this variant
    pub stock: u32,
}

/// A catalog product, immutable from the cart's perspective
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Description shown on the detail page
    pub description: String,
    /// Unit price in rupiah
    pub harga: u64,
    /// Category label
    pub category: String,
    /// Stock quantity
    pub stock: u32,
    /// Optional variant list
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    /// Optional media references
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Create a product with the given id, name and unit price
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, harga: u64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            harga,
            category: String::new(),
            stock: 0,
            variants: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the category label
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the stock quantity
    #[must_use]
    pub const fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Set the variant list
    #[must_use]
    pub fn with_variants(mut self, variants: Vec<ProductVariant>) -> Self {
        self.variants = variants;
        self
    }

    /// Set the media references
    #[must_use]
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}

/// A single cart line: a product snapshot plus a quantity
///
/// The quantity is always at least 1. A transition that would take it
/// to zero or below removes the line instead of storing it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Client-generated line identifier
    pub id: CartItemId,
    /// Snapshot of the product at add time
    pub product: Product,
    /// Quantity, >= 1
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart line
    #[must_use]
    pub const fn new(id: CartItemId, product: Product, quantity: u32) -> Self {
        Self {
            id,
            product,
            quantity,
        }
    }

    /// Line subtotal: unit price times quantity
    #[must_use]
    pub const fn subtotal(&self) -> u64 {
        self.product.harga.saturating_mul(self.quantity as u64)
    }
}

/// The cart: an insertion-ordered list of lines plus cached projections
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart lines in insertion order
    pub items: Vec<CartItem>,
    /// Cached projection: sum of line subtotals, in rupiah
    pub total: u64,
    /// Cached projection: sum of line quantities
    pub item_count: u32,
}

impl Cart {
    /// The empty cart
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            item_count: 0,
        }
    }

    /// Build a cart from lines, computing both projections
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self {
            items,
            total: 0,
            item_count: 0,
        };
        cart.recompute();
        cart
    }

    /// Recompute `total` and `item_count` from the item list
    ///
    /// Idempotent: recomputing twice yields the same values. Every
    /// transition ends with this so the projections cannot drift.
    pub fn recompute(&mut self) {
        self.total = self
            .items
            .iter()
            .map(CartItem::subtotal)
            .fold(0, u64::saturating_add);
        self.item_count = self
            .items
            .iter()
            .map(|item| item.quantity)
            .fold(0, u32::saturating_add);
    }

    /// Whether the cart holds no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines (not the quantity sum)
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Look up a line by its identifier
    #[must_use]
    pub fn get(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Look up the line holding a given product, if any
    ///
    /// At most one line exists per product id: adds merge by product.
    #[must_use]
    pub fn find_by_product(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }
}

/// An authenticated user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Optional avatar reference
    pub avatar: Option<String>,
}

impl User {
    /// Create a user without an avatar
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            avatar: None,
        }
    }
}

/// Application state held by the store
///
/// Created once at application start with an empty cart and no user,
/// mutated only through the reducer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// The signed-in user, if any
    pub user: Option<User>,
    /// The cart
    pub cart: Cart,
    /// Whether a page-level load is in flight
    pub loading: bool,
}

impl AppState {
    /// Fresh state: empty cart, no user, not loading
    #[must_use]
    pub const fn new() -> Self {
        Self {
            user: None,
            cart: Cart::empty(),
            loading: false,
        }
    }

    /// Whether a user is signed in
    ///
    /// Derived from `user` rather than stored, so it can never disagree
    /// with it.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Actions representing the dispatchable cart intents
///
/// Every variant is a total transition over the full cart domain; the
/// reducer validates nothing beyond existence checks and never fails.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CartAction {
    /// Set or clear the signed-in user
    SetUser(Option<User>),

    /// Toggle the page-level loading flag
    SetLoading(bool),

    /// Add a product to the cart
    ///
    /// Callers pass a quantity >= 1; the reducer does not clamp. If a
    /// line for the same product id exists its quantity is incremented,
    /// otherwise a new line is appended with a fresh identifier.
    AddItem {
        /// Product snapshot to add
        product: Product,
        /// Quantity to add, >= 1
        quantity: u32,
    },

    /// Replace a line's quantity
    ///
    /// A quantity of zero or below removes the line. An unknown id is a
    /// no-op.
    UpdateItemQuantity {
        /// Line to update
        item_id: CartItemId,
        /// New quantity; <= 0 removes the line
        quantity: i64,
    },

    /// Remove a line unconditionally; an unknown id is a no-op
    RemoveItem {
        /// Line to remove
        item_id: CartItemId,
    },

    /// Reset the cart to empty
    ClearCart,

    /// Wholesale overwrite from the authoritative remote snapshot
    ReplaceCart(Cart),
}
