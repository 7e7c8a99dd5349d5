use serde::{Deserialize, Serialize};

use crate::users::repo::Role;

/// Partial update body. Absent fields leave the record unchanged; `role` is
/// honored for admin callers only.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_tolerates_absent_fields() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"name":"Bob"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Bob"));
        assert!(req.email.is_none());
        assert!(req.password.is_none());
        assert!(req.role.is_none());

        let req: UpdateUserRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(req.name.is_none());
    }

    #[test]
    fn update_request_parses_role() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"role":"admin"}"#).unwrap();
        assert_eq!(req.role, Some(Role::Admin));
        assert!(serde_json::from_str::<UpdateUserRequest>(r#"{"role":"superuser"}"#).is_err());
    }
}
