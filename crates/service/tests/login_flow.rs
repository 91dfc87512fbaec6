use std::sync::Arc;
use std::time::Duration;

use axum::{routing::post, Json, Router};
use common::graphql::ShopifyFetcher;
use serde_json::{json, Value};
use service::auth::{login::UNIDENTIFIED_CUSTOMER_MESSAGE, Credentials, LoginHandler};
use service::customer::CustomerRevalidator;
use service::errors::CommerceError;
use service::session::{FileSessionStore, SessionStore};
use tokio::net::TcpListener;

async fn storefront(Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default();
    if query.contains("customerAccessTokenCreate") {
        let input = &body["variables"]["input"];
        if input["email"] == "ada@example.com" && input["password"] == "secret" {
            return Json(json!({ "data": { "customerAccessTokenCreate": {
                "customerUserErrors": [],
                "customerAccessToken": { "accessToken": "tok-ada", "expiresAt": "2099-01-01T00:00:00Z" }
            }}}));
        }
        return Json(json!({ "data": { "customerAccessTokenCreate": {
            "customerUserErrors": [{ "code": "UNIDENTIFIED_CUSTOMER", "field": ["input"], "message": "Unidentified customer" }],
            "customerAccessToken": null
        }}}));
    }
    if body["variables"]["customerAccessToken"] == "tok-ada" {
        return Json(json!({ "data": { "customer": {
            "id": "gid://shopify/Customer/1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "displayName": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": null,
            "acceptsMarketing": false
        }}}));
    }
    Json(json!({ "data": { "customer": null } }))
}

async fn spawn_storefront() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake storefront");
    let addr = listener.local_addr().expect("local addr");
    let router = Router::new().route("/api/2021-01/graphql.json", post(storefront));
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve fake storefront");
    });
    format!("http://{addr}/api/2021-01/graphql.json")
}

fn session_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("storefront-login-flow-{}-{}", std::process::id(), name))
        .join("customer_token.json")
}

#[tokio::test]
async fn login_persists_token_and_refreshes_customer() -> anyhow::Result<()> {
    let endpoint = spawn_storefront().await;
    let fetch = Arc::new(ShopifyFetcher::new(endpoint, "public", Duration::from_secs(5))?);
    let path = session_path("ok");
    let session = FileSessionStore::new(&path, chrono::Duration::days(30)).await?;
    let customer = Arc::new(CustomerRevalidator::new(fetch.clone(), session.clone()));
    let login = LoginHandler::new(session.clone()).use_hook(fetch, customer.clone());

    login.login(Credentials::new("ada@example.com", "secret")).await?;

    assert_eq!(session.token().await.as_deref(), Some("tok-ada"));
    let profile = customer.customer().await.expect("customer cached after login");
    assert_eq!(profile.display_name.as_deref(), Some("Ada Lovelace"));
    assert!(path.exists());

    session.clear().await?;
    Ok(())
}

#[tokio::test]
async fn wrong_password_reports_friendly_message() -> anyhow::Result<()> {
    let endpoint = spawn_storefront().await;
    let fetch = Arc::new(ShopifyFetcher::new(endpoint, "public", Duration::from_secs(5))?);
    let session = FileSessionStore::new(session_path("bad"), chrono::Duration::days(30)).await?;
    let customer = Arc::new(CustomerRevalidator::new(fetch.clone(), session.clone()));
    let login = LoginHandler::new(session.clone()).use_hook(fetch, customer.clone());

    let err = login
        .login(Credentials::new("ada@example.com", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err, CommerceError::Validation(UNIDENTIFIED_CUSTOMER_MESSAGE.into()));
    assert_eq!(session.token().await, None);
    assert_eq!(customer.customer().await, None);
    Ok(())
}
