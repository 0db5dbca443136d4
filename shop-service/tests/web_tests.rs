mod common;

use auth::Role;
use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use reqwest::header::LOCATION;
use reqwest::header::SET_COOKIE;
use reqwest::StatusCode;

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("Missing Location header")
        .to_str()
        .unwrap()
}

fn session_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter(|value| value.starts_with("shop_session="))
        .map(str::to_string)
        .collect()
}

fn session_cookie(response: &reqwest::Response) -> Option<String> {
    session_cookies(response).into_iter().next()
}

#[tokio::test]
async fn test_home_page_is_public() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Welcome to MyShop"));
}

#[tokio::test]
async fn test_login_page_keeps_return_url() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/account/login?return_url=%2Fusers")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"name="return_url" value="/users""#));
}

#[tokio::test]
async fn test_anonymous_users_page_redirects_to_login() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/users?page_number=2")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/account/login?return_url=%2Fusers%3Fpage_number%3D2"
    );
}

#[tokio::test]
async fn test_sign_in_sets_session_and_follows_return_url() {
    let app = TestApp::spawn().await;
    app.seed_user("nicola", Role::User, true).await;

    let response = app.sign_in("nicola", Some("/users")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users");

    let cookie = session_cookie(&response).expect("Session cookie not set");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    // Browser-session cookie unless remember me was ticked
    assert!(!cookie.contains("Expires"));

    let response = app
        .get("/users")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("nicola@example.com"));
    assert!(html.contains("Signed in as <strong>nicola</strong>"));
    // Only admins get delete buttons
    assert!(!html.contains("/delete"));
}

#[tokio::test]
async fn test_sign_in_ignores_foreign_return_url() {
    let app = TestApp::spawn().await;
    app.seed_user("nicola", Role::User, true).await;

    for return_url in ["https://evil.example.com/", "//evil.example.com", "/\\evil"] {
        let response = app.sign_in("nicola", Some(return_url)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }
}

#[tokio::test]
async fn test_remember_me_sets_persistent_cookie() {
    let app = TestApp::spawn().await;
    app.seed_user("nicola", Role::User, true).await;

    let response = app
        .post("/account/login")
        .form(&[
            ("username", "nicola"),
            ("password", common::TEST_PASSWORD),
            ("remember_me", "true"),
        ])
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&response).expect("Session cookie not set");
    assert!(cookie.contains("Expires"));
}

#[tokio::test]
async fn test_failed_sign_in_rerenders_form() {
    let app = TestApp::spawn().await;
    app.seed_user("nicola", Role::User, true).await;
    app.seed_user("dormant", Role::User, false).await;

    let response = app
        .post("/account/login")
        .form(&[("username", "nicola"), ("password", "wrong_password")])
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
    let html = response.text().await.unwrap();
    assert!(html.contains("Invalid username or password"));
    assert!(html.contains(r#"value="nicola""#));

    let response = app.sign_in("dormant", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("User account is inactive"));
}

#[tokio::test]
async fn test_user_cannot_use_admin_pages() {
    let app = TestApp::spawn().await;
    let target = app.seed_user("target", Role::User, true).await;
    app.seed_user("nicola", Role::User, true).await;
    app.sign_in("nicola", None).await;

    let response = app
        .post(&format!("/users/{}/delete", target.id))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/access-denied");

    let response = app
        .get("/account/access-denied")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_deletes_user_from_page() {
    let app = TestApp::spawn().await;
    let target = app.seed_user("target", Role::User, true).await;
    app.seed_user("root", Role::Admin, true).await;
    app.sign_in("root", None).await;

    let html = app
        .get("/users")
        .send()
        .await
        .expect("Failed to execute request")
        .text()
        .await
        .unwrap();
    assert!(html.contains(&format!("/users/{}/delete", target.id)));

    let response = app
        .post(&format!("/users/{}/delete", target.id))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users");

    let html = app
        .get("/users")
        .send()
        .await
        .expect("Failed to execute request")
        .text()
        .await
        .unwrap();
    assert!(!html.contains("target@example.com"));

    let response = app
        .post(&format!("/users/{}/delete", target.id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::spawn().await;
    app.seed_user("nicola", Role::User, true).await;
    app.sign_in("nicola", None).await;

    let response = app
        .post("/account/logout")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookie = session_cookie(&response).expect("Removal cookie not set");
    assert!(cookie.contains("Max-Age=0"));

    let response = app
        .get("/users")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_bearer_token_does_not_open_pages() {
    let app = TestApp::spawn().await;
    app.seed_user("nicola", Role::User, true).await;
    let token = app.token_for("nicola").await;

    let response = app
        .get_authenticated("/users", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/account/login"));
}

#[tokio::test]
async fn test_forged_session_cookie_is_anonymous() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/users")
        .header("Cookie", "shop_session=forged.value.here")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/account/login"));
}

#[tokio::test]
async fn test_aging_session_is_renewed_on_page_visit() {
    let app = TestApp::spawn().await;
    let user = app.seed_user("nicola", Role::User, true).await;

    // Less than half of the 60 minute window left
    let session = app.session_for(&user, Utc::now() - Duration::minutes(45));

    let response = app
        .request_with_session(reqwest::Method::GET, "/users", &session)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = session_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(!cookies[0].contains("Max-Age=0"));
    assert!(!cookies[0].starts_with(&format!("shop_session={};", session.value)));
}

#[tokio::test]
async fn test_fresh_session_is_not_reissued() {
    let app = TestApp::spawn().await;
    let user = app.seed_user("nicola", Role::User, true).await;
    let session = app.session_for(&user, Utc::now());

    let response = app
        .request_with_session(reqwest::Method::GET, "/users", &session)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookies(&response).is_empty());
}

#[tokio::test]
async fn test_logout_with_aging_session_only_removes_cookie() {
    let app = TestApp::spawn().await;
    let user = app.seed_user("nicola", Role::User, true).await;
    let session = app.session_for(&user, Utc::now() - Duration::minutes(45));

    let response = app
        .request_with_session(reqwest::Method::POST, "/account/logout", &session)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookies = session_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("shop_session=;"));
    assert!(cookies[0].contains("Max-Age=0"));
}
