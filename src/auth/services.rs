use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::{
    auth::{
        password,
        repo_types::{AccountSummary, NewAccount, User},
    },
    error::{AppError, AppResult},
};

/// Store a new account. Returns the id the database assigned.
pub async fn register(db: &SqlitePool, account: NewAccount) -> AppResult<i64> {
    let hash = password::hash_blocking(account.password.clone()).await?;

    match User::insert(db, &account, &hash).await {
        Ok(id) => Ok(id),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!(username = %account.username, email = %account.email, error = %e, "duplicate signup");
            Err(AppError::Duplicate)
        }
        Err(e) => Err(AppError::Storage(e)),
    }
}

/// Check a username/password pair and return the account's display data.
pub async fn authenticate(
    db: &SqlitePool,
    username: &str,
    password: &str,
) -> AppResult<AccountSummary> {
    let Some(user) = User::find_by_username(db, username).await? else {
        password::verify_dummy_blocking(password.to_string()).await;
        warn!(%username, "login unknown username");
        return Err(AppError::Authentication);
    };

    if !password::verify_blocking(password.to_string(), user.password_hash.clone()).await? {
        warn!(%username, user_id = user.id, "login invalid password");
        return Err(AppError::Authentication);
    }

    debug!(user_id = user.id, "credentials verified");
    Ok(AccountSummary {
        name: user.name,
        role: user.role,
    })
}
