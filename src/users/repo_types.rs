use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String, // authentication principal, not unique
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String, // argon2 PHC string
    pub salary: Option<Decimal>,
}

/// Fields for an insert; the hash is computed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub salary: Decimal,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub salary: Option<Decimal>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            salary: u.salary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serialization_hides_hash() {
        let user = User {
            id: 1,
            name: "Ana".into(),
            email: "ana@x.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            salary: Some(Decimal::new(120050, 2)),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("ana@x.com"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }
}
