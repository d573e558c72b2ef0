//! The bundle token: how a [`NavigationBundle`] rides along in a URL.
//!
//! The token is base64url (no padding) JSON. Items are referenced by id only
//! and resolved against the catalog on the way in, which is also where the
//! cart and wishlist invariants are re-established for whatever a client
//! sent back.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use premium_tech_core::{
    Cart, CartAddition, Catalog, CatalogItem, Identity, Navigation, NavigationBundle, ProductId,
    Wishlist,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query parameter carrying the token.
pub const STATE_PARAM: &str = "state";

/// Errors decoding a token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is invalid: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct WireBundle {
    #[serde(rename = "u", default, skip_serializing_if = "Option::is_none")]
    identity: Option<Identity>,
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    cart: Option<Vec<WireLine>>,
    #[serde(rename = "w", default, skip_serializing_if = "Option::is_none")]
    wishlist: Option<Vec<ProductId>>,
    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    add: Option<ProductId>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireLine {
    #[serde(rename = "i")]
    id: ProductId,
    #[serde(rename = "q")]
    quantity: u32,
}

/// Encode a bundle as a token.
#[must_use]
pub fn encode(bundle: &NavigationBundle) -> String {
    URL_SAFE_NO_PAD.encode(wire_json(&to_wire(bundle)))
}

/// Decode a token, resolving item ids against `catalog`.
///
/// Unknown ids and zero quantities are dropped; duplicate ids are merged.
///
/// # Errors
///
/// Returns [`TokenError`] if the token is not base64url or its payload is
/// not a bundle.
pub fn decode(token: &str, catalog: &Catalog) -> Result<NavigationBundle, TokenError> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim())?;
    let wire: WireBundle = serde_json::from_slice(&bytes)?;

    let resolve = |id: ProductId| -> Option<CatalogItem> {
        let item = catalog.find(id).cloned();
        if item.is_none() {
            tracing::debug!(%id, "Dropping unknown item from state token");
        }
        item
    };

    Ok(NavigationBundle {
        identity: wire.identity,
        cart: wire.cart.map(|lines| {
            Cart::from_lines(
                lines
                    .into_iter()
                    .filter_map(|line| resolve(line.id).map(|item| (item, line.quantity))),
            )
        }),
        wishlist: wire
            .wishlist
            .map(|ids| Wishlist::from_items(ids.into_iter().filter_map(resolve))),
        pending_cart_addition: wire.add.and_then(resolve).map(CartAddition::new),
    })
}

/// URL for a navigation: the destination path with the bundle attached.
#[must_use]
pub fn location(navigation: &Navigation) -> String {
    href(navigation.to.path(), &navigation.bundle)
}

/// URL for an arbitrary path with the bundle attached.
///
/// Used for action endpoints such as `/shop/cart/add` which are not pages
/// of their own.
#[must_use]
pub fn href(path: &str, bundle: &NavigationBundle) -> String {
    if is_empty(bundle) {
        return path.to_owned();
    }
    format!("{path}?{STATE_PARAM}={}", urlencoding::encode(&encode(bundle)))
}

fn to_wire(bundle: &NavigationBundle) -> WireBundle {
    WireBundle {
        identity: bundle.identity.clone(),
        cart: bundle.cart.as_ref().map(|cart| {
            cart.iter()
                .map(|entry| WireLine {
                    id: entry.item().id,
                    quantity: entry.quantity(),
                })
                .collect()
        }),
        wishlist: bundle
            .wishlist
            .as_ref()
            .map(|wishlist| wishlist.iter().map(|item| item.id).collect()),
        add: bundle
            .pending_cart_addition
            .as_ref()
            .map(|addition| addition.item().id),
    }
}

fn is_empty(bundle: &NavigationBundle) -> bool {
    bundle.identity.is_none()
        && bundle.cart.is_none()
        && bundle.wishlist.is_none()
        && bundle.pending_cart_addition.is_none()
}

fn wire_json(wire: &WireBundle) -> Vec<u8> {
    // Serializing plain structs of strings and integers cannot fail.
    serde_json::to_vec(wire).unwrap_or_default()
}
