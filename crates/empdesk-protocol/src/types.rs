use serde::{Deserialize, Serialize};

/// Username and password submitted to the token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Account creation payload for the register endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Employee record as owned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EmployeeRecord {
    /// Backend primary key, used in `employees/{id}/` paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub employee_id: String,
    pub employee_name: String,
    pub employee_email: String,
    pub employee_contact: String,
}

/// Access/refresh pair returned by a successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}
