//! Checkout flow.
//!
//! ```text
//!   enter(bundle) ──► NoCartData ──► redirect to Shop
//!        │
//!        └──────────► FormEntry ──submit(form)──► Submitted ──► Shop, identity only
//!                        ▲              │
//!                        └── FormErrors ┘
//! ```
//!
//! No payment is taken and nothing about the order is kept.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, CartEntry};
use crate::navigation::{Navigation, NavigationBundle, NavigationError, Route};
use crate::notification::Notification;
use crate::types::{Email, Identity, Price};
use crate::wishlist::Wishlist;

/// Maximum characters accepted in the card number field.
pub const CARD_NUMBER_MAX_LEN: usize = 16;

/// Maximum characters accepted in the CVV field.
pub const CVV_MAX_LEN: usize = 3;

/// Shipping and payment details entered by the shopper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
}

/// What is wrong with a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldProblem {
    #[error("is required")]
    Required,
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
    #[error("is invalid: {reason}")]
    Invalid { reason: String },
}

/// A problem with one named field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field} {problem}")]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

/// Every problem found in a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{} checkout field(s) are invalid", .0.len())]
#[serde(transparent)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Names of the offending fields, in form order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|error| error.field)
    }
}

impl CheckoutForm {
    /// Check the form the way the checkout page's inputs constrain it: every
    /// field present, card number and CVV within length, email well formed.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] listing every failing field.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = Vec::new();
        let fields: [(&'static str, &str, Option<usize>); 8] = [
            ("name", &self.name, None),
            ("email", &self.email, None),
            ("address", &self.address, None),
            ("city", &self.city, None),
            ("zip_code", &self.zip_code, None),
            ("card_number", &self.card_number, Some(CARD_NUMBER_MAX_LEN)),
            ("expiry_date", &self.expiry_date, None),
            ("cvv", &self.cvv, Some(CVV_MAX_LEN)),
        ];

        for (field, value, max) in fields {
            let value = value.trim();
            let problem = if value.is_empty() {
                Some(FieldProblem::Required)
            } else if let Some(max) = max.filter(|&max| value.chars().count() > max) {
                Some(FieldProblem::TooLong { max })
            } else if field == "email" {
                Email::parse(value).err().map(|err| FieldProblem::Invalid {
                    reason: err.to_string(),
                })
            } else {
                None
            };

            if let Some(problem) = problem {
                errors.push(FieldError { field, problem });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormErrors(errors))
        }
    }
}

/// Lines and total shown on the checkout page. Computed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub line_items: Vec<CartEntry>,
    pub total: Price,
}

impl OrderSummary {
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            line_items: cart.entries().to_vec(),
            total: cart.iter().map(CartEntry::line_price).sum(),
        }
    }
}

/// Where a checkout visit currently stands.
#[derive(Debug)]
pub enum CheckoutPhase {
    /// Reached without cart data; the only way out is this redirect.
    NoCartData(Navigation),
    /// Showing the order and collecting shipping and payment details.
    FormEntry(CheckoutSession),
    /// Order placed.
    Submitted(CheckoutReceipt),
}

impl CheckoutPhase {
    /// Enter checkout with an incoming bundle.
    ///
    /// A missing or empty cart means there is nothing to check out, and the
    /// visit ends with a redirect to the Shop carrying whatever identity and
    /// wishlist arrived.
    #[must_use]
    pub fn enter(bundle: NavigationBundle) -> Self {
        let NavigationBundle {
            identity,
            cart,
            wishlist,
            pending_cart_addition: _,
        } = bundle;

        match cart.filter(|cart| !cart.is_empty()) {
            Some(cart) => Self::FormEntry(CheckoutSession {
                summary: OrderSummary::from_cart(&cart),
                identity,
                cart,
                wishlist: wishlist.unwrap_or_default(),
            }),
            None => Self::NoCartData(Navigation::new(
                NavigationError::MissingCartContext.fallback(),
                NavigationBundle {
                    identity,
                    cart: None,
                    wishlist,
                    pending_cart_addition: None,
                },
            )),
        }
    }
}

/// A checkout visit in the form-entry phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    identity: Option<Identity>,
    cart: Cart,
    wishlist: Wishlist,
    summary: OrderSummary,
}

/// A submission that failed validation, handing the session back.
#[derive(Debug)]
pub struct Rejected {
    pub session: CheckoutSession,
    pub errors: FormErrors,
}

impl CheckoutSession {
    #[must_use]
    pub const fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Leave checkout without ordering, taking the whole state back.
    #[must_use]
    pub fn back_to_shop(&self) -> Navigation {
        Navigation::new(
            Route::Shop,
            NavigationBundle {
                identity: self.identity.clone(),
                cart: Some(self.cart.clone()),
                wishlist: Some(self.wishlist.clone()),
                pending_cart_addition: None,
            },
        )
    }

    /// Place the order.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] with the untouched session when the form does
    /// not validate.
    pub fn submit(self, form: &CheckoutForm) -> Result<CheckoutReceipt, Box<Rejected>> {
        if let Err(errors) = form.validate() {
            return Err(Box::new(Rejected {
                session: self,
                errors,
            }));
        }

        Ok(CheckoutReceipt {
            notification: Notification::order_placed(),
            navigation: Navigation::new(
                Route::Shop,
                NavigationBundle {
                    identity: self.identity,
                    cart: None,
                    wishlist: None,
                    pending_cart_addition: None,
                },
            ),
            summary: self.summary,
        })
    }
}

impl From<CheckoutReceipt> for CheckoutPhase {
    fn from(receipt: CheckoutReceipt) -> Self {
        Self::Submitted(receipt)
    }
}

/// Outcome of a placed order.
#[derive(Debug)]
pub struct CheckoutReceipt {
    pub notification: Notification,
    /// Back to the Shop carrying only the identity.
    pub navigation: Navigation,
    pub summary: OrderSummary,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::navigation::Shopper;
    use crate::types::ProductId;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            address: "12 Analytical Way".to_owned(),
            city: "London".to_owned(),
            zip_code: "N1 9GU".to_owned(),
            card_number: "4242424242424242".to_owned(),
            expiry_date: "12/30".to_owned(),
            cvv: "123".to_owned(),
        }
    }

    fn shopper_with_headphones() -> Shopper {
        let catalog = Catalog::builtin();
        let headphones = catalog.find(ProductId::new(1)).unwrap();
        let watch = catalog.find(ProductId::new(2)).unwrap();
        Shopper::new(Identity::new("ada@example.com").unwrap())
            .add_to_cart(headphones)
            .add_to_wishlist(watch)
    }

    fn enter_form(bundle: NavigationBundle) -> CheckoutSession {
        match CheckoutPhase::enter(bundle) {
            CheckoutPhase::FormEntry(session) => session,
            other => panic!("expected form entry, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_empty_form_lists_every_field() {
        let errors = CheckoutForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                "name",
                "email",
                "address",
                "city",
                "zip_code",
                "card_number",
                "expiry_date",
                "cvv"
            ]
        );
        assert!(
            errors
                .errors()
                .iter()
                .all(|error| error.problem == FieldProblem::Required)
        );
    }

    #[test]
    fn test_length_limits() {
        let form = CheckoutForm {
            card_number: "42424242424242424".to_owned(),
            cvv: "1234".to_owned(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.errors(),
            &[
                FieldError {
                    field: "card_number",
                    problem: FieldProblem::TooLong { max: 16 },
                },
                FieldError {
                    field: "cvv",
                    problem: FieldProblem::TooLong { max: 3 },
                },
            ]
        );
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let form = CheckoutForm {
            city: "   ".to_owned(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["city"]);
    }

    #[test]
    fn test_invalid_email() {
        let form = CheckoutForm {
            email: "not-an-email".to_owned(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(matches!(
            errors.errors()[0].problem,
            FieldProblem::Invalid { .. }
        ));
    }

    #[test]
    fn test_enter_without_cart_redirects_to_shop() {
        match CheckoutPhase::enter(NavigationBundle::empty()) {
            CheckoutPhase::NoCartData(navigation) => {
                assert_eq!(navigation.to, Route::Shop);
                assert!(navigation.bundle.identity.is_none());
            }
            other => panic!("expected NoCartData, got {other:?}"),
        }
    }

    #[test]
    fn test_enter_with_empty_cart_keeps_identity_on_redirect() {
        let identity = Identity::new("ada@example.com").unwrap();
        match CheckoutPhase::enter(NavigationBundle::signed_in(identity.clone())) {
            CheckoutPhase::NoCartData(navigation) => {
                assert_eq!(navigation.bundle.identity, Some(identity));
            }
            other => panic!("expected NoCartData, got {other:?}"),
        }
    }

    #[test]
    fn test_summary() {
        let session = enter_form(shopper_with_headphones().navigate(Route::Checkout).bundle);
        let summary = session.summary();
        assert_eq!(summary.line_items.len(), 1);
        assert_eq!(summary.total.display(), "$299.99");
    }

    #[test]
    fn test_submit_carries_only_identity() {
        let shopper = shopper_with_headphones();
        let session = enter_form(shopper.navigate(Route::Checkout).bundle);

        let receipt = session.submit(&valid_form()).unwrap();
        assert_eq!(receipt.notification.title, "Order Placed Successfully");
        assert_eq!(receipt.navigation.to, Route::Shop);
        assert_eq!(receipt.navigation.bundle.identity.as_ref(), Some(shopper.identity()));
        assert!(receipt.navigation.bundle.cart.is_none());
        assert!(receipt.navigation.bundle.wishlist.is_none());
        assert!(receipt.navigation.bundle.pending_cart_addition.is_none());
        assert!(matches!(
            CheckoutPhase::from(receipt),
            CheckoutPhase::Submitted(_)
        ));
    }

    #[test]
    fn test_rejected_submit_returns_session() {
        let session = enter_form(shopper_with_headphones().navigate(Route::Checkout).bundle);
        let before = session.clone();

        let rejected = session.submit(&CheckoutForm::default()).unwrap_err();
        assert_eq!(rejected.session, before);
        assert_eq!(rejected.errors.errors().len(), 8);
    }

    #[test]
    fn test_back_to_shop_forwards_everything() {
        let shopper = shopper_with_headphones();
        let session = enter_form(shopper.navigate(Route::Checkout).bundle);
        assert_eq!(session.back_to_shop(), shopper.navigate(Route::Shop));
    }
}
