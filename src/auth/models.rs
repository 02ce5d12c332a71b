use serde::Serialize;

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: String,
}

/// A bearer token issued for a verified identity
#[derive(Clone, Debug, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}
