//! Integration tests for the fitness diary API.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory tests (no external services)
//! cargo test -p fitness-diary-integration-tests
//!
//! # Including PostgreSQL store tests
//! DIARY_TEST_DATABASE_URL=postgres://localhost/diary_test \
//!     cargo test -p fitness-diary-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `diary_api` - Diary and catalog endpoints over HTTP
//! - `profile_api` - Profile parameter endpoints over HTTP
//! - `postgres_stores` - `PostgreSQL` store behavior (ignored by default)

use std::net::{Ipv4Addr, SocketAddr};

use reqwest::{Client, RequestBuilder};
use tokio::net::TcpListener;

use fitness_diary_api::config::DiaryConfig;
use fitness_diary_api::db::{MemoryStore, Stores};
use fitness_diary_api::models::NewUser;
use fitness_diary_api::state::AppState;
use fitness_diary_core::{Email, NewExercise};

/// A seeded user and the token it authenticates with.
pub struct TestUser {
    pub email: &'static str,
    pub token: &'static str,
}

/// First seeded user.
pub const ALICE: TestUser = TestUser {
    email: "alice@example.com",
    token: "alice-session-token",
};

/// Second seeded user.
pub const BOB: TestUser = TestUser {
    email: "bob@example.com",
    token: "bob-session-token",
};

/// Catalog loaded into every test server, IDs 1..=3 in this order.
#[must_use]
pub fn sample_exercises() -> Vec<NewExercise> {
    [
        ("3/4 sit-up", "waist", "abs", 220),
        ("air bike", "waist", "abs", 312),
        ("barbell curl", "upper arms", "biceps", 150),
    ]
    .into_iter()
    .map(|(name, body_part, target, burned_calories)| NewExercise {
        name: name.to_string(),
        body_part: body_part.to_string(),
        target: target.to_string(),
        equipment: "body weight".to_string(),
        gif_url: String::new(),
        burned_calories,
        time_minutes: 3,
    })
    .collect()
}

/// An API server running on an ephemeral port with in-memory stores.
pub struct TestServer {
    addr: SocketAddr,
    client: Client,
}

impl TestServer {
    /// Seed the stores, bind `127.0.0.1:0` and serve the app in the background.
    ///
    /// # Panics
    ///
    /// Panics if seeding or binding fails.
    pub async fn start() -> Self {
        let stores = Stores::memory(MemoryStore::with_exercises(sample_exercises()));
        for user in [ALICE, BOB] {
            stores
                .users
                .create(NewUser {
                    name: user.email.split('@').next().unwrap_or_default().to_string(),
                    email: Email::parse(user.email).expect("seed email is valid"),
                    token: user.token.to_string(),
                })
                .await
                .expect("Failed to seed user");
        }

        let config = DiaryConfig::in_memory(Ipv4Addr::LOCALHOST.into(), 0);
        let listener = TcpListener::bind(config.socket_addr())
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = fitness_diary_api::app(AppState::new(config, stores));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            addr,
            client: Client::new(),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Unauthenticated request builder.
    #[must_use]
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Request builder authenticated as `user`.
    #[must_use]
    pub fn as_user(&self, user: &TestUser, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(user.token)
    }
}
