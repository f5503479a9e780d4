use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application role controlling which dashboard and permissions apply.
///
/// - `Public`: general public user. Sees center and equipment lookups only.
/// - `Staff`: healthcare staff attached to a center. Equipment and
///   maintenance operations.
/// - `DistrictAdmin`: district administrator. Oversees centers, staff, and
///   district-wide reports.
///
/// The set is closed: role strings outside it are never coerced into a
/// variant. Callers that meet an unknown role string must handle `None`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Public,
    Staff,
    DistrictAdmin,
}

impl UserRole {
    /// Parse a role string from the profile table. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(UserRole::Public),
            "staff" => Some(UserRole::Staff),
            "district_admin" => Some(UserRole::DistrictAdmin),
            _ => None,
        }
    }

    /// Lowercase string as stored in the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Public => "public",
            UserRole::Staff => "staff",
            UserRole::DistrictAdmin => "district_admin",
        }
    }

    /// Human-readable label for UI display.
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Public => "Public User",
            UserRole::Staff => "Healthcare Staff",
            UserRole::DistrictAdmin => "District Administrator",
        }
    }

    /// Roles that require employment details (employee id, designation) at signup.
    pub fn requires_employment_details(&self) -> bool {
        matches!(self, UserRole::Staff | UserRole::DistrictAdmin)
    }
}

/// The external auth system's record of a logged-in principal.
///
/// Owned entirely by the backend; the client holds a transient read-only copy
/// that does not survive a page reload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

/// Application-level user record, keyed by the identity id.
///
/// Read from the `users` table; never mutated by this client. The `role`
/// field stays a raw string so an unknown role can be surfaced verbatim
/// instead of silently mapped to a default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub auth_id: Uuid,
    pub email: String,
    pub role: String,
    pub full_name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_id: Option<Uuid>,
}

impl Profile {
    /// The profile's role as an enum, or `None` for unrecognized role strings.
    pub fn parsed_role(&self) -> Option<UserRole> {
        UserRole::parse(&self.role)
    }
}

fn default_true() -> bool {
    true
}

/// A health center, used to populate the signup selection control.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Center {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub district: String,
}

impl Center {
    /// Dropdown label: "Name (Type) - District".
    pub fn label(&self) -> String {
        format!("{} ({}) - {}", self.name, self.kind, self.district)
    }
}
