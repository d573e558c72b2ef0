//! End-to-end shopper journeys through the storefront.

#![allow(clippy::unwrap_used)]

use premium_tech_core::ProductId;
use premium_tech_integration_tests::{TestServer, location, notifications};
use reqwest::StatusCode;

const EMAIL: &str = "ada@example.com";

/// Follow one redirect hop and return where it points.
async fn post_and_follow(server: &TestServer, action: &str, product_id: &str) -> String {
    let response = server
        .post_form(action, &[("product_id", product_id)])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "POST {action}");
    location(&response)
}

#[tokio::test]
async fn test_sign_in_lands_on_empty_shop() {
    let server = TestServer::spawn().await;

    let response = server
        .post_form("/", &[("email", EMAIL), ("password", "pw")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let welcome = notifications(&response);
    assert_eq!(welcome[0]["title"], "Welcome back!");

    let shop_url = location(&response);
    let shop = server.view(&shop_url).await;
    assert_eq!(shop["identity"], EMAIL);
    assert_eq!(shop["cart"]["total_items"], 0);
    assert_eq!(shop["cart"]["total"], "$0.00");
    assert_eq!(shop["wishlist_count"], 0);
}

#[tokio::test]
async fn test_sign_up_requires_matching_passwords() {
    let server = TestServer::spawn().await;

    let mismatch = server
        .post_form(
            "/",
            &[
                ("mode", "sign_up"),
                ("email", EMAIL),
                ("password", "pw"),
                ("confirm_password", "wp"),
            ],
        )
        .await;
    assert_eq!(mismatch.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let created = server
        .post_form(
            "/",
            &[
                ("mode", "sign_up"),
                ("email", EMAIL),
                ("password", "pw"),
                ("confirm_password", "pw"),
            ],
        )
        .await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        notifications(&created)[0]["title"],
        "Account created successfully!"
    );
}

#[tokio::test]
async fn test_add_item_then_checkout() {
    let server = TestServer::spawn().await;
    let shop = server.view(&server.sign_in(EMAIL).await).await;

    let add = shop["actions"]["add_to_cart"].as_str().unwrap();
    let shop_url = post_and_follow(&server, add, "1").await;
    let shop = server.view(&shop_url).await;
    assert_eq!(shop["cart"]["total"], "$299.99");

    let checkout = server
        .view(shop["links"]["checkout"].as_str().unwrap())
        .await;
    assert_eq!(checkout["summary"]["lines"].as_array().unwrap().len(), 1);
    assert_eq!(checkout["summary"]["total"], "$299.99");

    let submit = checkout["submit"].as_str().unwrap();
    let response = server
        .post_form(
            submit,
            &[
                ("name", "Ada Lovelace"),
                ("email", EMAIL),
                ("address", "12 Analytical Way"),
                ("city", "London"),
                ("zip_code", "N1 9GU"),
                ("card_number", "4242424242424242"),
                ("expiry_date", "12/30"),
                ("cvv", "123"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        notifications(&response)[0]["title"],
        "Order Placed Successfully"
    );

    let shop_url = location(&response);
    assert!(server.bundle_at(&shop_url).cart.is_none());
    let shop = server.view(&shop_url).await;
    assert_eq!(shop["identity"], EMAIL);
    assert_eq!(shop["cart"]["total_items"], 0);
}

#[tokio::test]
async fn test_checkout_rejects_incomplete_form() {
    let server = TestServer::spawn().await;
    let shop = server.view(&server.sign_in(EMAIL).await).await;
    let add = shop["actions"]["add_to_cart"].as_str().unwrap();
    let shop = server.view(&post_and_follow(&server, add, "2").await).await;
    let checkout = server
        .view(shop["links"]["checkout"].as_str().unwrap())
        .await;

    let response = server
        .post_form(
            checkout["submit"].as_str().unwrap(),
            &[("name", "Ada"), ("card_number", "42424242424242424242")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.unwrap();
    let card = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|error| error["field"] == "card_number")
        .unwrap();
    assert_eq!(card["problem"]["kind"], "too_long");
    assert_eq!(card["problem"]["max"], 16);
}

#[tokio::test]
async fn test_direct_checkout_redirects_to_shop_then_sign_in() {
    let server = TestServer::spawn().await;

    let response = server.get("/checkout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/shop");

    let response = server.get("/shop").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_offer_merges_into_existing_cart_once() {
    let server = TestServer::spawn().await;
    let shop = server.view(&server.sign_in(EMAIL).await).await;

    let add = shop["actions"]["add_to_cart"].as_str().unwrap();
    let shop = server.view(&post_and_follow(&server, add, "1").await).await;

    let offers = server
        .view(shop["links"]["offers"].as_str().unwrap())
        .await;
    let offer_id = offers["offers"][0]["id"].as_i64().unwrap().to_string();
    let add_offer = offers["add_to_cart"].as_str().unwrap();

    // Offers hands the item to the shop, which applies it and settles
    let pending_url = post_and_follow(&server, add_offer, &offer_id).await;
    assert!(server.bundle_at(&pending_url).pending_cart_addition.is_some());

    let response = server.get(&pending_url).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let settled_url = location(&response);

    let bundle = server.bundle_at(&settled_url);
    assert!(bundle.pending_cart_addition.is_none());
    let cart = bundle.cart.unwrap();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.quantity_of(ProductId::new(1)), 1);
    assert_eq!(cart.quantity_of(offer_id.parse().unwrap()), 1);

    // Rendering the settled shop again never re-applies the addition
    for _ in 0..2 {
        let shop = server.view(&settled_url).await;
        assert_eq!(shop["cart"]["total_items"], 2);
    }
}

#[tokio::test]
async fn test_wishlist_round_trip() {
    let server = TestServer::spawn().await;
    let shop = server.view(&server.sign_in(EMAIL).await).await;

    let save = shop["actions"]["add_to_wishlist"].as_str().unwrap();
    let shop_url = post_and_follow(&server, save, "3").await;
    let shop = server.view(&shop_url).await;
    let save_again = shop["actions"]["add_to_wishlist"].as_str().unwrap();
    let shop = server
        .view(&post_and_follow(&server, save_again, "3").await)
        .await;
    assert_eq!(shop["wishlist_count"], 1);

    let wishlist = server
        .view(shop["links"]["wishlist"].as_str().unwrap())
        .await;
    assert_eq!(wishlist["items"][0]["id"], 3);

    // Add to cart from the wishlist goes through the shop
    let pending_url =
        post_and_follow(&server, wishlist["add_to_cart"].as_str().unwrap(), "3").await;
    let settled_url = location(&server.get(&pending_url).await);
    let shop = server.view(&settled_url).await;
    assert_eq!(shop["cart"]["total_items"], 1);
    assert_eq!(shop["wishlist_count"], 1);

    // Removing from the wishlist stays on the wishlist page
    let wishlist = server
        .view(shop["links"]["wishlist"].as_str().unwrap())
        .await;
    let wishlist_url =
        post_and_follow(&server, wishlist["remove"].as_str().unwrap(), "3").await;
    assert!(wishlist_url.starts_with("/wishlist"));
    let wishlist = server.view(&wishlist_url).await;
    assert!(wishlist["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_removal_drops_whole_entry() {
    let server = TestServer::spawn().await;
    let shop = server.view(&server.sign_in(EMAIL).await).await;

    let mut shop_url = String::new();
    let mut add = shop["actions"]["add_to_cart"].as_str().unwrap().to_owned();
    for _ in 0..3 {
        shop_url = post_and_follow(&server, &add, "10").await;
        let shop = server.view(&shop_url).await;
        add = shop["actions"]["add_to_cart"].as_str().unwrap().to_owned();
    }
    assert_eq!(
        server
            .bundle_at(&shop_url)
            .cart
            .unwrap()
            .quantity_of(ProductId::new(10)),
        3
    );

    let shop = server.view(&shop_url).await;
    let remove = shop["actions"]["remove_from_cart"].as_str().unwrap();
    let shop_url = post_and_follow(&server, remove, "10").await;
    assert!(server.bundle_at(&shop_url).cart.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let server = TestServer::spawn().await;
    let response = server.get("/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}
