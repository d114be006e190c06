use std::error::Error;
use std::{fmt, io};

#[derive(Debug)]
pub enum FormkitError {
    Io(io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    String(String),
    ConfigError(String),
    UnknownField(String),
    InvalidInput(String, String), // field name, reason
    #[cfg(feature = "http_client")]
    HttpClientError(crate::http::HttpClientError),
}

impl fmt::Display for FormkitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormkitError::Io(e) => write!(f, "{}", e),
            FormkitError::Yaml(e) => write!(f, "YAML error: {}", e),
            FormkitError::Json(e) => write!(f, "JSON error: {}", e),
            FormkitError::String(s) => write!(f, "{}", s),
            FormkitError::ConfigError(s) => write!(f, "Config error: {}", s),
            FormkitError::UnknownField(s) => {
                write!(f, "Unknown field: {}", s)
            }
            FormkitError::InvalidInput(field, reason) => {
                write!(f, "Invalid input for {}: {}", field, reason)
            }
            #[cfg(feature = "http_client")]
            FormkitError::HttpClientError(e) => write!(f, "{}", e),
        }
    }
}

impl Error for FormkitError {}

impl From<io::Error> for FormkitError {
    fn from(error: io::Error) -> Self {
        FormkitError::Io(error)
    }
}

impl From<serde_yaml::Error> for FormkitError {
    fn from(error: serde_yaml::Error) -> Self {
        FormkitError::Yaml(error)
    }
}

impl From<serde_json::Error> for FormkitError {
    fn from(error: serde_json::Error) -> Self {
        FormkitError::Json(error)
    }
}

impl From<&str> for FormkitError {
    fn from(error: &str) -> Self {
        FormkitError::String(error.to_owned())
    }
}

impl From<std::string::String> for FormkitError {
    fn from(error: std::string::String) -> Self {
        FormkitError::String(error)
    }
}

#[cfg(feature = "http_client")]
impl From<crate::http::HttpClientError> for FormkitError {
    fn from(error: crate::http::HttpClientError) -> Self {
        FormkitError::HttpClientError(error)
    }
}
