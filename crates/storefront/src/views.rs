//! JSON view documents, one per page.
//!
//! Every URL in a view already embeds the bundle the shopper would carry by
//! following it, so a client never assembles state tokens itself. Action URLs
//! are POST targets that expect a `product_id` form field.

use premium_tech_core::{
    Cart, CartEntry, Catalog, CatalogItem, CheckoutSession, CurrencyCode, Identity, Offer,
    OrderSummary, ProductId, Route, Shopper, checkout,
};
use serde::Serialize;

use crate::services::auth::AuthMode;
use crate::token;

// =============================================================================
// Building Blocks
// =============================================================================

/// A catalog item as shown on any page.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl From<&CatalogItem> for ItemView {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price.display(),
            image: item.image.clone(),
        }
    }
}

/// One cart line.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: ItemView,
    pub quantity: u32,
    pub line_price: String,
}

impl From<&CartEntry> for CartLineView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            item: ItemView::from(entry.item()),
            quantity: entry.quantity(),
            line_price: entry.line_price().display(),
        }
    }
}

/// The cart drawer.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_items: u32,
    pub total: String,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, currency: CurrencyCode) -> Self {
        Self {
            lines: cart.iter().map(CartLineView::from).collect(),
            total_items: cart.total_items(),
            total: cart.total_price(currency).display(),
        }
    }
}

/// Page-to-page navigation, each link carrying the full bundle.
#[derive(Debug, Clone, Serialize)]
pub struct NavLinks {
    pub shop: String,
    pub offers: String,
    pub wishlist: String,
    pub checkout: String,
}

impl NavLinks {
    #[must_use]
    pub fn new(shopper: &Shopper) -> Self {
        let link = |route| token::location(&shopper.navigate(route));
        Self {
            shop: link(Route::Shop),
            offers: link(Route::Offers),
            wishlist: link(Route::Wishlist),
            checkout: link(Route::Checkout),
        }
    }
}

fn action(path: &str, shopper: &Shopper) -> String {
    token::href(path, &shopper.to_bundle())
}

// =============================================================================
// Auth
// =============================================================================

/// Sign-in / sign-up page.
#[derive(Debug, Serialize)]
pub struct AuthView {
    pub page: Route,
    pub mode: AuthMode,
    pub fields: Vec<&'static str>,
    pub submit: &'static str,
    pub switch_mode: &'static str,
}

impl AuthView {
    #[must_use]
    pub fn new(mode: AuthMode) -> Self {
        let (fields, switch_mode) = match mode {
            AuthMode::SignIn => (vec!["email", "password"], "/?mode=sign_up"),
            AuthMode::SignUp => (
                vec!["email", "password", "confirm_password"],
                "/?mode=sign_in",
            ),
        };
        Self {
            page: Route::Auth,
            mode,
            fields,
            submit: Route::Auth.path(),
            switch_mode,
        }
    }
}

// =============================================================================
// Shop
// =============================================================================

/// A product on the shop page.
#[derive(Debug, Serialize)]
pub struct ProductCardView {
    #[serde(flatten)]
    pub item: ItemView,
    pub in_cart: u32,
    pub in_wishlist: bool,
}

/// Where the shop page's buttons post to.
#[derive(Debug, Serialize)]
pub struct ShopActions {
    pub add_to_cart: String,
    pub remove_from_cart: String,
    pub add_to_wishlist: String,
    pub remove_from_wishlist: String,
}

/// The product catalog with cart drawer.
#[derive(Debug, Serialize)]
pub struct ShopView {
    pub page: Route,
    pub identity: Identity,
    pub products: Vec<ProductCardView>,
    pub cart: CartView,
    pub wishlist_count: usize,
    pub actions: ShopActions,
    pub links: NavLinks,
}

impl ShopView {
    #[must_use]
    pub fn new(shopper: &Shopper, catalog: &Catalog) -> Self {
        let products = catalog
            .products()
            .iter()
            .map(|item| ProductCardView {
                item: ItemView::from(item),
                in_cart: shopper.cart().quantity_of(item.id),
                in_wishlist: shopper.wishlist().contains(item.id),
            })
            .collect();

        Self {
            page: Route::Shop,
            identity: shopper.identity().clone(),
            products,
            cart: CartView::new(shopper.cart(), catalog.currency()),
            wishlist_count: shopper.wishlist().len(),
            actions: ShopActions {
                add_to_cart: action("/shop/cart/add", shopper),
                remove_from_cart: action("/shop/cart/remove", shopper),
                add_to_wishlist: action("/shop/wishlist/add", shopper),
                remove_from_wishlist: action("/shop/wishlist/remove", shopper),
            },
            links: NavLinks::new(shopper),
        }
    }
}

// =============================================================================
// Offers
// =============================================================================

/// A discounted item.
#[derive(Debug, Serialize)]
pub struct OfferView {
    #[serde(flatten)]
    pub item: ItemView,
    pub original_price: String,
    pub savings: String,
    pub discount_percent: u32,
}

impl From<&Offer> for OfferView {
    fn from(offer: &Offer) -> Self {
        Self {
            item: ItemView::from(&offer.item),
            original_price: offer.original_price.display(),
            savings: offer.savings().display(),
            discount_percent: offer.discount_percent(),
        }
    }
}

/// Special offers page.
#[derive(Debug, Serialize)]
pub struct OffersView {
    pub page: Route,
    pub identity: Identity,
    pub offers: Vec<OfferView>,
    pub cart_count: u32,
    pub add_to_cart: String,
    pub links: NavLinks,
}

impl OffersView {
    #[must_use]
    pub fn new(shopper: &Shopper, catalog: &Catalog) -> Self {
        Self {
            page: Route::Offers,
            identity: shopper.identity().clone(),
            offers: catalog.offers().iter().map(OfferView::from).collect(),
            cart_count: shopper.cart().total_items(),
            add_to_cart: action("/offers/cart/add", shopper),
            links: NavLinks::new(shopper),
        }
    }
}

// =============================================================================
// Wishlist
// =============================================================================

/// Saved items page.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub page: Route,
    pub identity: Identity,
    pub items: Vec<ItemView>,
    pub add_to_cart: String,
    pub remove: String,
    pub links: NavLinks,
}

impl WishlistView {
    #[must_use]
    pub fn new(shopper: &Shopper) -> Self {
        Self {
            page: Route::Wishlist,
            identity: shopper.identity().clone(),
            items: shopper.wishlist().iter().map(ItemView::from).collect(),
            add_to_cart: action("/wishlist/cart/add", shopper),
            remove: action("/wishlist/remove", shopper),
            links: NavLinks::new(shopper),
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Order summary shown beside the checkout form.
#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub lines: Vec<CartLineView>,
    pub total: String,
}

impl From<&OrderSummary> for SummaryView {
    fn from(summary: &OrderSummary) -> Self {
        Self {
            lines: summary.line_items.iter().map(CartLineView::from).collect(),
            total: summary.total.display(),
        }
    }
}

/// Input limits the checkout form enforces.
#[derive(Debug, Serialize)]
pub struct FieldLimits {
    pub card_number: usize,
    pub cvv: usize,
}

/// Checkout page in the form-entry phase.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub page: Route,
    pub identity: Option<Identity>,
    pub summary: SummaryView,
    pub fields: [&'static str; 8],
    pub limits: FieldLimits,
    pub submit: String,
    pub back_to_shop: String,
}

impl CheckoutView {
    #[must_use]
    pub fn new(session: &CheckoutSession) -> Self {
        let back = session.back_to_shop();
        Self {
            page: Route::Checkout,
            identity: session.identity().cloned(),
            summary: SummaryView::from(session.summary()),
            fields: [
                "name",
                "email",
                "address",
                "city",
                "zip_code",
                "card_number",
                "expiry_date",
                "cvv",
            ],
            limits: FieldLimits {
                card_number: checkout::CARD_NUMBER_MAX_LEN,
                cvv: checkout::CVV_MAX_LEN,
            },
            submit: token::href(Route::Checkout.path(), &back.bundle),
            back_to_shop: token::location(&back),
        }
    }
}

// =============================================================================
// Not Found
// =============================================================================

/// Catch-all page.
#[derive(Debug, Serialize)]
pub struct NotFoundView {
    pub page: Route,
    pub path: String,
    pub message: &'static str,
    pub home: &'static str,
}

impl NotFoundView {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            page: Route::NotFound,
            path: path.to_owned(),
            message: "Oops! Page not found",
            home: Route::Auth.path(),
        }
    }
}
