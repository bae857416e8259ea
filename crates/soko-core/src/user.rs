//! Users and roles.
//!
//! Authentication and session issuance live outside this system; a user here
//! is only the identity that ownership checks and moderation need.

use crate::ids::{UserId, VendorId};
use crate::unix_timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Vendor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "vendor" => Some(Role::Vendor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    /// Set once the user registers a vendor profile.
    pub vendor_id: Option<VendorId>,
    pub is_active: bool,
    pub created_at: i64,
}

impl User {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::generate(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into().to_lowercase(),
            phone: phone.into(),
            role: Role::User,
            vendor_id: None,
            is_active: true,
            created_at: unix_timestamp(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
