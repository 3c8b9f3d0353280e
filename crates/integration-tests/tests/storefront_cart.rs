//! Integration tests for the storefront cart flow.
//!
//! Each test boots a fresh storefront; every `reqwest` client keeps its own
//! cookie jar and so acts as one visitor with one session.

use coursecart_integration_tests::TestServer;
use coursecart_storefront::routes::cart::CHECKOUT_NOTICE;
use coursecart_storefront::routes::contact::CONTACT_THANKS;
use reqwest::{Client, Response, StatusCode};

async fn add_algebra(server: &TestServer, client: &Client) -> Response {
    client
        .post(server.url("/cart/add"))
        .header("HX-Request", "true")
        .form(&[
            ("name", "Algebra I"),
            ("price", "$49.99"),
            ("image", "/static/img/algebra.svg"),
        ])
        .send()
        .await
        .expect("Failed to add to cart")
}

async fn badge(server: &TestServer, client: &Client) -> String {
    client
        .get(server.url("/cart/count"))
        .send()
        .await
        .expect("Failed to get cart count")
        .text()
        .await
        .expect("Failed to read response")
        .trim()
        .to_string()
}

fn hx_trigger(resp: &Response) -> serde_json::Value {
    let raw = resp
        .headers()
        .get("hx-trigger")
        .expect("Missing HX-Trigger header")
        .to_str()
        .expect("HX-Trigger is not ASCII");
    serde_json::from_str(raw).expect("HX-Trigger is not JSON")
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::spawn().await;
    let resp = server
        .visitor()
        .get(server.url("/health"))
        .send()
        .await
        .expect("Failed to get health");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.expect("Failed to read response"), "ok");
}

#[tokio::test]
async fn test_home_lists_catalog() {
    let server = TestServer::spawn().await;
    let client = server.visitor();

    let resp = client
        .get(server.url("/"))
        .send()
        .await
        .expect("Failed to get home");
    assert_eq!(resp.status(), StatusCode::OK);

    let csp = resp
        .headers()
        .get("content-security-policy")
        .expect("Missing CSP header")
        .to_str()
        .expect("CSP is not ASCII")
        .to_string();
    assert!(csp.contains("'nonce-"));

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Algebra I"));
    assert!(body.contains("Geometry"));
    assert!(body.contains("🛒 (0)"));
}

#[tokio::test]
async fn test_add_same_course_twice() {
    let server = TestServer::spawn().await;
    let client = server.visitor();

    let resp = add_algebra(&server, &client).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let trigger = hx_trigger(&resp);
    assert_eq!(trigger["cart-updated"], true);
    assert_eq!(
        trigger["cart-notice"]["message"],
        "Algebra I added to cart!"
    );
    assert_eq!(
        resp.text().await.expect("Failed to read response").trim(),
        "🛒 (1)"
    );

    let resp = add_algebra(&server, &client).await;
    assert_eq!(
        resp.text().await.expect("Failed to read response").trim(),
        "🛒 (2)"
    );

    let page = client
        .get(server.url("/cart"))
        .send()
        .await
        .expect("Failed to get cart")
        .text()
        .await
        .expect("Failed to read response");

    // One line item with quantity 2
    assert_eq!(page.matches("cart-item ").count(), 1);
    assert!(page.contains(r#"value="2""#));
    assert!(page.contains("$99.98"));
    assert!(page.contains("$8.00"));
    assert!(page.contains("$107.98"));
    assert!(page.contains("🛒 (2)"));
}

#[tokio::test]
async fn test_add_from_cart_page_returns_regions() {
    let server = TestServer::spawn().await;
    let client = server.visitor();

    let resp = client
        .post(server.url("/cart/add"))
        .header("HX-Request", "true")
        .header("HX-Current-URL", server.url("/cart"))
        .form(&[("name", "Geometry"), ("price", "$39.50"), ("image", "")])
        .send()
        .await
        .expect("Failed to add to cart");

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("col-md-8"));
    assert!(body.contains("$39.50"));
    assert!(body.contains("$42.66"));
}

#[tokio::test]
async fn test_update_quantity_clamps_to_one() {
    let server = TestServer::spawn().await;
    let client = server.visitor();
    add_algebra(&server, &client).await;

    let resp = client
        .post(server.url("/cart/update"))
        .form(&[("index", "0"), ("quantity", "5")])
        .send()
        .await
        .expect("Failed to update cart");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(badge(&server, &client).await, "🛒 (5)");

    let resp = client
        .post(server.url("/cart/update"))
        .form(&[("index", "0"), ("quantity", "-3")])
        .send()
        .await
        .expect("Failed to update cart");
    assert_eq!(hx_trigger(&resp)["cart-updated"], true);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(r#"value="1""#));
    assert_eq!(badge(&server, &client).await, "🛒 (1)");
}

#[tokio::test]
async fn test_remove_only_item_shows_placeholder() {
    let server = TestServer::spawn().await;
    let client = server.visitor();
    add_algebra(&server, &client).await;

    let resp = client
        .post(server.url("/cart/remove"))
        .form(&[("index", "0")])
        .send()
        .await
        .expect("Failed to remove from cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Your cart is empty."));
    assert!(body.contains("$0.00"));
    assert_eq!(badge(&server, &client).await, "🛒 (0)");
}

#[tokio::test]
async fn test_bad_index_is_rejected_and_cart_unchanged() {
    let server = TestServer::spawn().await;
    let client = server.visitor();
    add_algebra(&server, &client).await;

    for index in ["7", "abc", "-1"] {
        let resp = client
            .post(server.url("/cart/remove"))
            .form(&[("index", index)])
            .send()
            .await
            .expect("Failed to post remove");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "index {index}");
    }

    let resp = client
        .post(server.url("/cart/update"))
        .form(&[("index", "3"), ("quantity", "2")])
        .send()
        .await
        .expect("Failed to post update");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(badge(&server, &client).await, "🛒 (1)");
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let server = TestServer::spawn().await;
    let alice = server.visitor();
    let bob = server.visitor();

    add_algebra(&server, &alice).await;
    add_algebra(&server, &alice).await;

    assert_eq!(badge(&server, &alice).await, "🛒 (2)");
    assert_eq!(badge(&server, &bob).await, "🛒 (0)");
}

#[tokio::test]
async fn test_checkout_acknowledges_and_keeps_cart() {
    let server = TestServer::spawn().await;
    let client = server.visitor();
    add_algebra(&server, &client).await;

    let resp = client
        .post(server.url("/checkout"))
        .header("HX-Request", "true")
        .send()
        .await
        .expect("Failed to post checkout");

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(hx_trigger(&resp)["cart-notice"]["message"], CHECKOUT_NOTICE);
    assert_eq!(badge(&server, &client).await, "🛒 (1)");
}

#[tokio::test]
async fn test_contact_submission_is_acknowledged() {
    let server = TestServer::spawn().await;
    let client = server.visitor();

    let resp = client
        .post(server.url("/contact"))
        .header("HX-Request", "true")
        .form(&[
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("message", "Do you offer calculus?"),
        ])
        .send()
        .await
        .expect("Failed to post contact form");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&resp)["cart-notice"]["message"], CONTACT_THANKS);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(CONTACT_THANKS));
    assert!(!body.contains("ada@example.com"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let server = TestServer::spawn().await;
    let resp = server
        .visitor()
        .get(server.url("/no-such-page"))
        .send()
        .await
        .expect("Failed to get page");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
