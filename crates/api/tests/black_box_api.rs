use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::json;

use storecms_api::app::{build_app, services::AppServices};
use storecms_auth::{Hs256Jwt, JwtClaims};
use storecms_core::AdminId;

const JWT_SECRET: &str = "test-secret";
const PASSWORD: &str = "a strong password";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory repositories, ephemeral port.
        let app = build_app(AppServices::in_memory(), JWT_SECRET);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn session_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap()
}

async fn signup(client: &reqwest::Client, base_url: &str, username: &str) -> serde_json::Value {
    let res = client
        .post(format!("{}/signup", base_url))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": PASSWORD,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn create_store(client: &reqwest::Client, base_url: &str, name: &str) -> String {
    let res = client
        .post(format!("{}/stores", base_url))
        .json(&json!({ "name": name, "description": "test store" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_category(
    client: &reqwest::Client,
    base_url: &str,
    store_id: &str,
    name: &str,
) -> String {
    let res = client
        .post(format!("{}/stores/{}/categories", base_url, store_id))
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/admin", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_sets_session_cookie() {
    let srv = TestServer::spawn().await;
    let client = session_client();

    let body = signup(&client, &srv.base_url, "alice").await;
    assert_eq!(body["data"]["email"], "alice@example.com");

    // The cookie from signup authenticates follow-up requests.
    let res = client
        .get(format!("{}/admin", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["username"], "alice");
}

#[tokio::test]
async fn duplicate_email_rejected() {
    let srv = TestServer::spawn().await;
    let client = session_client();

    signup(&client, &srv.base_url, "alice").await;

    let res = reqwest::Client::new()
        .post(format!("{}/signup", srv.base_url))
        .json(&json!({
            "username": "alice2",
            "email": "alice@example.com",
            "password": PASSWORD,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn weak_password_rejected() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .post(format!("{}/signup", srv.base_url))
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "short",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "weak_password");
}

#[tokio::test]
async fn login_logout_lifecycle() {
    let srv = TestServer::spawn().await;

    signup(&session_client(), &srv.base_url, "alice").await;

    let client = session_client();

    // Wrong password first.
    let res = client
        .post(format!("{}/login", srv.base_url))
        .json(&json!({ "email": "alice@example.com", "password": "wrong password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Right password; email lookup is case-insensitive.
    let res = client
        .post(format!("{}/login", srv.base_url))
        .json(&json!({ "email": "Alice@Example.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["data"]["stores"].as_array().unwrap().is_empty());

    let res = client
        .get(format!("{}/admin", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Logout clears the cookie.
    let res = client
        .post(format!("{}/logout", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/admin", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bearer_token_also_accepted() {
    let srv = TestServer::spawn().await;

    let body = signup(&session_client(), &srv.base_url, "alice").await;
    let admin_id: AdminId = body["data"]["id"].as_str().unwrap().parse().unwrap();

    let now = Utc::now();
    let token = Hs256Jwt::new(JWT_SECRET.as_bytes())
        .sign(&JwtClaims {
            sub: admin_id,
            issued_at: now,
            expires_at: now + ChronoDuration::minutes(10),
        })
        .expect("failed to sign jwt");

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/admin", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // A token signed with another secret is rejected.
    let forged = Hs256Jwt::new(b"wrong-secret")
        .sign(&JwtClaims {
            sub: admin_id,
            issued_at: now,
            expires_at: now + ChronoDuration::minutes(10),
        })
        .unwrap();
    let res = client
        .get(format!("{}/admin", srv.base_url))
        .bearer_auth(&forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn store_lifecycle_create_update_delete() {
    let srv = TestServer::spawn().await;
    let client = session_client();
    signup(&client, &srv.base_url, "alice").await;

    let store_id = create_store(&client, &srv.base_url, "Outdoor Gear").await;

    let res = client
        .get(format!("{}/stores", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let res = client
        .put(format!("{}/stores/{}", srv.base_url, store_id))
        .json(&json!({ "name": "Outdoor & Camping", "description": "renamed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Outdoor & Camping");

    let res = client
        .delete(format!("{}/stores/{}", srv.base_url, store_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/stores/{}", srv.base_url, store_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_and_variant_crud() {
    let srv = TestServer::spawn().await;
    let client = session_client();
    signup(&client, &srv.base_url, "alice").await;

    let store_id = create_store(&client, &srv.base_url, "Apparel").await;
    let category_id = create_category(&client, &srv.base_url, &store_id, "Shirts").await;

    // Variant with options.
    let res = client
        .post(format!("{}/stores/{}/variants", srv.base_url, store_id))
        .json(&json!({
            "category_id": category_id,
            "name": "Size",
            "weight": 1,
            "options": [
                { "value": "S", "weight": 1 },
                { "value": "M", "weight": 2 },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let variant_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["options"].as_array().unwrap().len(), 2);

    // Listing narrows by category.
    let res = client
        .get(format!(
            "{}/stores/{}/variants?category_id={}",
            srv.base_url, store_id, category_id
        ))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Update replaces the option set.
    let res = client
        .put(format!(
            "{}/stores/{}/variants/{}",
            srv.base_url, store_id, variant_id
        ))
        .json(&json!({
            "name": "Size",
            "options": [{ "value": "XL" }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let options = body["data"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0]["value"], "XL");

    // A category from nowhere can't anchor a variant.
    let res = client
        .post(format!("{}/stores/{}/variants", srv.base_url, store_id))
        .json(&json!({
            "category_id": uuid::Uuid::now_v7().to_string(),
            "name": "Color",
            "options": [],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .delete(format!(
            "{}/stores/{}/variants/{}",
            srv.base_url, store_id, variant_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_lifecycle_with_items() {
    let srv = TestServer::spawn().await;
    let client = session_client();
    signup(&client, &srv.base_url, "alice").await;

    let store_id = create_store(&client, &srv.base_url, "Apparel").await;
    let category_id = create_category(&client, &srv.base_url, &store_id, "Shirts").await;

    let res = client
        .post(format!("{}/stores/{}/variants", srv.base_url, store_id))
        .json(&json!({
            "category_id": category_id,
            "name": "Size",
            "options": [{ "value": "S" }, { "value": "M" }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let options = body["data"]["options"].as_array().unwrap();
    let option_s = options[0]["id"].as_str().unwrap().to_string();
    let option_m = options[1]["id"].as_str().unwrap().to_string();

    // Product with one item per size.
    let res = client
        .post(format!("{}/stores/{}/products", srv.base_url, store_id))
        .json(&json!({
            "category_id": category_id,
            "name": "Plain Tee",
            "description": "A plain tee",
            "rating": 4.5,
            "is_featured": true,
            "items": [
                { "sku": "TEE-S", "quantity": 10, "price": 1999, "variant_option_ids": [option_s] },
                { "sku": "TEE-M", "quantity": 5, "price": 1999, "discounted_price": 1499,
                  "variant_option_ids": [option_m] },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let product_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    // Featured filter finds it; archived filter does not.
    let res = client
        .get(format!(
            "{}/stores/{}/products?featured=true",
            srv.base_url, store_id
        ))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let res = client
        .get(format!(
            "{}/stores/{}/products?archived=true",
            srv.base_url, store_id
        ))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());

    // Update archives the product and replaces the items.
    let res = client
        .put(format!(
            "{}/stores/{}/products/{}",
            srv.base_url, store_id, product_id
        ))
        .json(&json!({
            "category_id": category_id,
            "name": "Plain Tee",
            "description": "A plain tee",
            "is_archived": true,
            "items": [
                { "sku": "TEE-S", "quantity": 0, "price": 999, "variant_option_ids": [option_s] },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["is_archived"], true);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let res = client
        .delete(format!(
            "{}/stores/{}/products/{}",
            srv.base_url, store_id, product_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!(
            "{}/stores/{}/products/{}",
            srv.base_url, store_id, product_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_item_option_must_belong_to_category() {
    let srv = TestServer::spawn().await;
    let client = session_client();
    signup(&client, &srv.base_url, "alice").await;

    let store_id = create_store(&client, &srv.base_url, "Apparel").await;
    let category_id = create_category(&client, &srv.base_url, &store_id, "Shirts").await;

    let res = client
        .post(format!("{}/stores/{}/products", srv.base_url, store_id))
        .json(&json!({
            "category_id": category_id,
            "name": "Plain Tee",
            "description": "A plain tee",
            "items": [
                { "sku": "TEE-X", "quantity": 1, "price": 1000,
                  "variant_option_ids": [uuid::Uuid::now_v7().to_string()] },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn duplicate_sku_within_product_rejected() {
    let srv = TestServer::spawn().await;
    let client = session_client();
    signup(&client, &srv.base_url, "alice").await;

    let store_id = create_store(&client, &srv.base_url, "Apparel").await;
    let category_id = create_category(&client, &srv.base_url, &store_id, "Shirts").await;

    let res = client
        .post(format!("{}/stores/{}/products", srv.base_url, store_id))
        .json(&json!({
            "category_id": category_id,
            "name": "Plain Tee",
            "description": "A plain tee",
            "items": [
                { "sku": "TEE", "quantity": 1, "price": 1000 },
                { "sku": "TEE", "quantity": 2, "price": 2000 },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn cross_admin_isolation_blocks_reads_and_writes() {
    let srv = TestServer::spawn().await;

    let alice = session_client();
    signup(&alice, &srv.base_url, "alice").await;
    let store_id = create_store(&alice, &srv.base_url, "Alice's Store").await;

    let bob = session_client();
    signup(&bob, &srv.base_url, "bob").await;

    // Bob sees no stores and can't read Alice's by ID.
    let res = bob
        .get(format!("{}/stores", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());

    let res = bob
        .get(format!("{}/stores/{}", srv.base_url, store_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Writes under Alice's store are blocked the same way.
    let res = bob
        .post(format!("{}/stores/{}/categories", srv.base_url, store_id))
        .json(&json!({ "name": "Sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = bob
        .delete(format!("{}/stores/{}", srv.base_url, store_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Alice still has her store.
    let res = alice
        .get(format!("{}/stores/{}", srv.base_url, store_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
