use serde::Serialize;

/// Account row from the `users` table. No route reads or writes it yet;
/// admin login still checks a fixed credential pair.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_admin: bool,
}
