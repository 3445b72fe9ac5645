use serde::{Deserialize, Serialize};

/// Login-Body, unterschieden über das Feld `role`
#[derive(Debug, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum LoginRequest {
    Driver {
        name: Option<String>,
        #[serde(rename = "employeeNumber")]
        employee_number: Option<String>,
    },
    Admin {
        email: Option<String>,
        password: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Admin,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub id: String,
    pub name: String,
    pub role: Role,
}
