use crate::error::AppError;
use crate::models::UserRole;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login form payload. Only presence is checked client-side; credential
/// verification is entirely the backend's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,
}

impl LoginRequest {
    /// Reject empty credentials before any network call.
    pub fn validate_form(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}

/// Signup form payload. Staff and district-admin signups carry employment
/// fields; the public role does not.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    pub confirm_password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    pub phone: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
    pub center_id: String,
    pub employee_id: String,
    pub designation: String,
    pub department: String,
}

impl SignupRequest {
    /// Full client-side validation: derive-level checks (required fields,
    /// password length, email shape) plus the cross-field rules: password
    /// confirmation and the role-conditional employment requirements.
    /// Nothing here reaches the network.
    pub fn validate_form(&self) -> Result<(), AppError> {
        let mut field_errors = match self.validate() {
            Ok(()) => Default::default(),
            Err(errors) => AppError::from(errors).field_errors,
        };

        if self.password != self.confirm_password {
            field_errors.insert(
                "confirm_password".to_string(),
                "Passwords do not match".to_string(),
            );
        }

        if let Some(role) = UserRole::parse(&self.role) {
            if role.requires_employment_details() {
                if role == UserRole::Staff && self.center_id.is_empty() {
                    field_errors.insert(
                        "center_id".to_string(),
                        "Center selection is required for staff members".to_string(),
                    );
                }
                if self.employee_id.is_empty() {
                    field_errors.insert(
                        "employee_id".to_string(),
                        "Employee ID is required for staff members".to_string(),
                    );
                }
                if self.designation.is_empty() {
                    field_errors.insert(
                        "designation".to_string(),
                        "Designation is required for staff members".to_string(),
                    );
                }
            }
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation("Validation failed", field_errors))
        }
    }

    /// Profile fields carried as auth metadata on sign-up. The backend
    /// materializes the `users` row from this object, which is the single
    /// source of truth the profile lookup reads. Empty optional fields are
    /// sent as null; an absent center selection is omitted entirely.
    pub fn metadata(&self) -> serde_json::Value {
        let mut data = serde_json::json!({
            "full_name": self.full_name,
            "role": self.role,
            "phone": non_empty(&self.phone),
            "employee_id": non_empty(&self.employee_id),
            "designation": non_empty(&self.designation),
            "department": non_empty(&self.department),
        });
        if !self.center_id.is_empty() {
            data["center_code"] = serde_json::Value::String(self.center_id.clone());
        }
        data
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_public_signup() -> SignupRequest {
        SignupRequest {
            email: "villager@example.org".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            full_name: "A Villager".into(),
            role: "public".into(),
            ..Default::default()
        }
    }

    fn valid_staff_signup() -> SignupRequest {
        SignupRequest {
            email: "nurse@example.org".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            full_name: "A Nurse".into(),
            phone: "9876543210".into(),
            role: "staff".into(),
            center_id: "0b944737-7e5a-4a0e-86d4-0a2a7d29d9a0".into(),
            employee_id: "EMP-7".into(),
            designation: "Staff Nurse".into(),
            department: "General Medicine".into(),
        }
    }

    #[test]
    fn login_rejects_empty_fields() {
        let err = LoginRequest::default().validate_form().unwrap_err();
        assert_eq!(err.summary(), "Email and password are required");

        let ok = LoginRequest {
            email: "a@b.example".into(),
            password: "pw".into(),
        };
        assert!(ok.validate_form().is_ok());
    }

    #[test]
    fn public_signup_without_employment_fields_is_valid() {
        assert!(valid_public_signup().validate_form().is_ok());
    }

    #[test]
    fn staff_signup_with_all_fields_is_valid() {
        assert!(valid_staff_signup().validate_form().is_ok());
    }

    #[test]
    fn password_mismatch_is_rejected() {
        let mut form = valid_public_signup();
        form.confirm_password = "different".into();
        let err = form.validate_form().unwrap_err();
        assert_eq!(
            err.field_errors.get("confirm_password").unwrap(),
            "Passwords do not match"
        );
    }

    #[test]
    fn short_password_is_rejected() {
        let mut form = valid_public_signup();
        form.password = "abc".into();
        form.confirm_password = "abc".into();
        let err = form.validate_form().unwrap_err();
        assert_eq!(
            err.field_errors.get("password").unwrap(),
            "Password must be at least 6 characters long"
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut form = valid_public_signup();
        form.email = "not-an-email".into();
        let err = form.validate_form().unwrap_err();
        assert_eq!(
            err.field_errors.get("email").unwrap(),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn staff_requires_center_employee_id_and_designation() {
        let mut form = valid_staff_signup();
        form.center_id.clear();
        form.employee_id.clear();
        form.designation.clear();
        let err = form.validate_form().unwrap_err();
        assert!(err.field_errors.contains_key("center_id"));
        assert!(err.field_errors.contains_key("employee_id"));
        assert!(err.field_errors.contains_key("designation"));
    }

    #[test]
    fn district_admin_center_is_optional() {
        let mut form = valid_staff_signup();
        form.role = "district_admin".into();
        form.center_id.clear();
        assert!(form.validate_form().is_ok());
    }

    #[test]
    fn district_admin_still_requires_employment_fields() {
        let mut form = valid_staff_signup();
        form.role = "district_admin".into();
        form.employee_id.clear();
        assert!(form.validate_form().is_err());
    }

    #[test]
    fn metadata_omits_empty_center_and_nulls_empty_optionals() {
        let form = valid_public_signup();
        let data = form.metadata();
        assert_eq!(data.get("center_code"), None);
        assert_eq!(data["phone"], serde_json::Value::Null);
        assert_eq!(data["full_name"], "A Villager");
        assert_eq!(data["role"], "public");
    }

    #[test]
    fn metadata_carries_center_code_when_selected() {
        let form = valid_staff_signup();
        let data = form.metadata();
        assert_eq!(data["center_code"], form.center_id.as_str());
        assert_eq!(data["designation"], "Staff Nurse");
    }
}
