use serde_json::Value;

use crate::checks::CheckError;

use super::method::HttpMethod;

/// A fully-read response from the target application.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub method: HttpMethod,
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Parse the body as JSON. A body that is not JSON is a contract
    /// violation for every endpoint the suite talks to.
    pub fn json(&self) -> Result<Value, CheckError> {
        serde_json::from_str(&self.body).map_err(|source| CheckError::Decode {
            method: self.method,
            path: self.path.clone(),
            status: self.status,
            source,
        })
    }

    /// Body for diagnostics: parsed JSON when possible, the raw text otherwise.
    pub fn raw(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}
