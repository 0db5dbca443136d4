use std::sync::Arc;

use auth::AuthConfig;
use auth::PasswordHasher;
use auth::Role;
use auth::Session;
use auth::SessionAuthenticator;
use auth::SessionSettings;
use chrono::DateTime;
use chrono::Utc;
use serde_json::json;
use shop_service::domain::user::models::EmailAddress;
use shop_service::domain::user::models::User;
use shop_service::domain::user::models::UserId;
use shop_service::domain::user::models::Username;
use shop_service::domain::user::ports::UserRepository;
use shop_service::inbound::http::router::create_router;
use shop_service::inbound::http::router::AppState;
use shop_service::outbound::repositories::InMemoryUserRepository;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "pass_word!";

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryUserRepository>,
    /// Keeps cookies, never follows redirects
    pub api_client: reqwest::Client,
    /// No cookie store, never follows redirects
    pub bare_client: reqwest::Client,
}

/// Authentication settings the spawned server runs with
pub fn auth_config() -> AuthConfig {
    // Plain http, so the cookie must not be marked Secure
    AuthConfig::new(TEST_SECRET, "MyShop.Api", "MyShop.Client").with_session(SessionSettings {
        secure_cookie: false,
        ..SessionSettings::default()
    })
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());

        let auth_config = auth_config();

        let state = AppState::with_repository(Arc::clone(&repository), &auth_config)
            .expect("Failed to build application state");
        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Failed to create reqwest client"),
            bare_client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    /// Session for `user` as if signed in at `signed_in_at`, signed with the server's key
    pub fn session_for(&self, user: &User, signed_in_at: DateTime<Utc>) -> Session {
        SessionAuthenticator::new(&auth_config())
            .expect("Failed to create session authenticator")
            .begin_session_at(&user.claims(), false, signed_in_at)
            .expect("Failed to begin session")
    }

    /// Helper to make a request carrying only the given session cookie
    pub fn request_with_session(
        &self,
        method: reqwest::Method,
        path: &str,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        self.bare_client
            .request(method, &format!("{}{}", self.address, path))
            .header(reqwest::header::COOKIE, format!("shop_session={}", session.value))
    }

    /// Insert an account directly into the store
    pub async fn seed_user(&self, username: &str, role: Role, is_active: bool) -> User {
        let password_hash = PasswordHasher::new()
            .hash(TEST_PASSWORD)
            .expect("Failed to hash password");

        let user = User {
            id: UserId::new(),
            username: Username::new(username.to_string()).expect("Invalid username"),
            email: EmailAddress::new(format!("{}@example.com", username))
                .expect("Invalid email"),
            password_hash,
            role,
            is_active,
            created_at: Utc::now(),
        };

        self.repository
            .create(user)
            .await
            .expect("Failed to seed user")
    }

    /// Sign in through the API and return the bearer token
    pub async fn token_for(&self, username: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": TEST_PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Token missing from login response")
            .to_string()
    }

    /// Sign in through the login form; the session cookie lands in the client's jar
    pub async fn sign_in(&self, username: &str, return_url: Option<&str>) -> reqwest::Response {
        let mut form = vec![("username", username), ("password", TEST_PASSWORD)];
        if let Some(return_url) = return_url {
            form.push(("return_url", return_url));
        }

        self.post("/account/login")
            .form(&form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}
