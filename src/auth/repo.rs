use crate::auth::repo_types::{NewAccount, User};
use sqlx::SqlitePool;

impl User {
    /// Find a user by username.
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, dob, gender, phone, email, role, password_hash
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user and return its id. Unique violations come back untouched
    /// so the caller can tell a duplicate from a broken database.
    pub async fn insert(
        db: &SqlitePool,
        account: &NewAccount,
        password_hash: &str,
    ) -> sqlx::Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, name, dob, gender, phone, email, role, password_hash)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.username)
        .bind(&account.name)
        .bind(&account.dob)
        .bind(&account.gender)
        .bind(&account.phone)
        .bind(&account.email)
        .bind(&account.role)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(result.last_insert_rowid())
    }

    #[cfg(test)]
    pub async fn count(db: &SqlitePool) -> sqlx::Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await?;
        Ok(n)
    }
}
