//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! fd-cli user create -n "Alice" -e alice@example.com
//! ```
//!
//! The new user's session token is printed once; it is what clients send as
//! `Authorization: Bearer <token>`.

use rand::{Rng, distr::Alphanumeric};

use fitness_diary_api::db::{PgUserStore, UserStore};
use fitness_diary_api::models::NewUser;
use fitness_diary_core::Email;

use super::{CommandError, connect};

/// Length of generated session tokens.
const TOKEN_LEN: usize = 48;

/// Generate a random alphanumeric session token.
fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Create a new user and print their session token.
pub async fn create(name: &str, email: &str) -> Result<(), CommandError> {
    let email =
        Email::parse(email).map_err(|e| CommandError::InvalidEmail(email.to_owned(), e))?;

    let pool = connect().await?;
    let store = PgUserStore::new(pool);

    let token = generate_token();
    let user = store
        .create(NewUser {
            name: name.to_owned(),
            email,
            token: token.clone(),
        })
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User created");

    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }

    Ok(())
}
