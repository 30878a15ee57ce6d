use serde::{Deserialize, Serialize};

/// One entry of the user file. `id` duplicates the map key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}
