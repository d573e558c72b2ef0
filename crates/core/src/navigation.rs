//! Page routes and the state carried between them.
//!
//! There is no shared store. Every page transition hands a
//! [`NavigationBundle`] to the destination page, which owns it outright.
//! Pages that need a signed-in shopper turn the bundle into a [`Shopper`]
//! and forward state only through [`Shopper::navigate`], which always packs
//! the identity, cart and wishlist together.
//!
//! ```text
//!   Auth ──(sign in)──► Shop ◄──────────────┐
//!                        │ │ │              │ CartAddition
//!                        │ │ └──► Offers ───┤
//!                        │ └────► Wishlist ─┘
//!                        └──────► Checkout ──(order placed, identity only)──► Shop
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::cart::Cart;
use crate::catalog::CatalogItem;
use crate::types::{Identity, ProductId};
use crate::wishlist::Wishlist;

/// A page of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Auth,
    Shop,
    Checkout,
    Offers,
    Wishlist,
    NotFound,
}

impl Route {
    /// URL path of the page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Auth => "/",
            Self::Shop => "/shop",
            Self::Checkout => "/checkout",
            Self::Offers => "/offers",
            Self::Wishlist => "/wishlist",
            Self::NotFound => "/not-found",
        }
    }

    /// Resolve a URL path; anything unrecognised is [`Route::NotFound`].
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" => Self::Auth,
            "/shop" => Self::Shop,
            "/checkout" => Self::Checkout,
            "/offers" => Self::Offers,
            "/wishlist" => Self::Wishlist,
            _ => Self::NotFound,
        }
    }

    /// Whether the page redirects to [`Route::Auth`] without an identity.
    #[must_use]
    pub const fn requires_identity(self) -> bool {
        matches!(self, Self::Shop | Self::Offers | Self::Wishlist)
    }
}

/// A one-shot "add this item to the cart" instruction for the Shop page.
///
/// Deliberately not `Clone`: [`Shopper::apply`] takes it by value, so an
/// addition can be acted on once and then no longer exists.
#[derive(Debug, PartialEq, Eq)]
pub struct CartAddition {
    item: CatalogItem,
}

impl CartAddition {
    #[must_use]
    pub const fn new(item: CatalogItem) -> Self {
        Self { item }
    }

    #[must_use]
    pub const fn item(&self) -> &CatalogItem {
        &self.item
    }

    #[must_use]
    pub fn into_item(self) -> CatalogItem {
        self.item
    }
}

/// State handed from one page to the next.
///
/// Absent fields mean "the previous page did not send this", which is
/// different from an empty cart or wishlist.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NavigationBundle {
    pub identity: Option<Identity>,
    pub cart: Option<Cart>,
    pub wishlist: Option<Wishlist>,
    pub pending_cart_addition: Option<CartAddition>,
}

impl NavigationBundle {
    /// A bundle carrying nothing, as on a direct visit.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A bundle for a freshly signed-in shopper: identity, empty cart and
    /// empty wishlist.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Shopper::new(identity).to_bundle()
    }
}

/// A page transition: where to go and what to take along.
#[derive(Debug, PartialEq, Eq)]
pub struct Navigation {
    pub to: Route,
    pub bundle: NavigationBundle,
}

impl Navigation {
    #[must_use]
    pub const fn new(to: Route, bundle: NavigationBundle) -> Self {
        Self { to, bundle }
    }
}

/// Why a page refused the bundle it was given.
///
/// Neither case is shown to the shopper; the page silently redirects to
/// [`NavigationError::fallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// A protected page was reached without an identity.
    #[error("page requires a signed-in shopper")]
    MissingIdentity,

    /// Checkout was reached without cart data.
    #[error("checkout requires cart data")]
    MissingCartContext,
}

impl NavigationError {
    /// The safe page to redirect to.
    #[must_use]
    pub const fn fallback(self) -> Route {
        match self {
            Self::MissingIdentity => Route::Auth,
            Self::MissingCartContext => Route::Shop,
        }
    }
}

/// A shopper's working state on a protected page.
///
/// Each page builds one from the bundle it received and owns it until it
/// navigates away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shopper {
    identity: Identity,
    cart: Cart,
    wishlist: Wishlist,
}

/// Result of accepting a bundle on a protected page.
#[derive(Debug)]
pub struct Arrival {
    pub shopper: Shopper,
    /// Addition requested by the previous page, to apply exactly once.
    pub pending: Option<CartAddition>,
}

impl Shopper {
    /// A shopper with an empty cart and wishlist.
    #[must_use]
    pub const fn new(identity: Identity) -> Self {
        Self {
            identity,
            cart: Cart::new(),
            wishlist: Wishlist::new(),
        }
    }

    /// Accept an incoming bundle.
    ///
    /// The pending addition is split off from the shopper's state so that
    /// re-reading the shopper can never replay it.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::MissingIdentity`] if the bundle has no
    /// identity.
    pub fn receive(bundle: NavigationBundle) -> Result<Arrival, NavigationError> {
        let NavigationBundle {
            identity,
            cart,
            wishlist,
            pending_cart_addition,
        } = bundle;
        let identity = identity.ok_or(NavigationError::MissingIdentity)?;

        Ok(Arrival {
            shopper: Self {
                identity,
                cart: cart.unwrap_or_default(),
                wishlist: wishlist.unwrap_or_default(),
            },
            pending: pending_cart_addition,
        })
    }

    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Apply a one-shot cart addition, consuming it.
    #[must_use]
    pub fn apply(self, addition: CartAddition) -> Self {
        self.add_to_cart(addition.item())
    }

    #[must_use]
    pub fn add_to_cart(self, item: &CatalogItem) -> Self {
        Self {
            cart: self.cart.with_item(item),
            ..self
        }
    }

    #[must_use]
    pub fn remove_from_cart(self, id: ProductId) -> Self {
        Self {
            cart: self.cart.without_item(id),
            ..self
        }
    }

    #[must_use]
    pub fn add_to_wishlist(self, item: &CatalogItem) -> Self {
        Self {
            wishlist: self.wishlist.with_item(item),
            ..self
        }
    }

    #[must_use]
    pub fn remove_from_wishlist(self, id: ProductId) -> Self {
        Self {
            wishlist: self.wishlist.without_item(id),
            ..self
        }
    }

    /// Everything this shopper knows, packed for the next page.
    #[must_use]
    pub fn to_bundle(&self) -> NavigationBundle {
        NavigationBundle {
            identity: Some(self.identity.clone()),
            cart: Some(self.cart.clone()),
            wishlist: Some(self.wishlist.clone()),
            pending_cart_addition: None,
        }
    }

    /// Navigate to `to`, forwarding identity, cart and wishlist.
    #[must_use]
    pub fn navigate(&self, to: Route) -> Navigation {
        Navigation::new(to, self.to_bundle())
    }

    /// Navigate to `to` with a one-shot request to add `item` to the cart.
    ///
    /// Used by pages that cannot change the Shop page's cart themselves.
    #[must_use]
    pub fn navigate_with_addition(&self, to: Route, item: &CatalogItem) -> Navigation {
        let mut bundle = self.to_bundle();
        bundle.pending_cart_addition = Some(CartAddition::new(item.clone()));
        Navigation::new(to, bundle)
    }
}

impl From<Shopper> for NavigationBundle {
    fn from(shopper: Shopper) -> Self {
        Self {
            identity: Some(shopper.identity),
            cart: Some(shopper.cart),
            wishlist: Some(shopper.wishlist),
            pending_cart_addition: None,
        }
    }
}
