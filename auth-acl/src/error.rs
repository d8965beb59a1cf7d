use crate::models::PermissionLevel;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AclError {
    #[error("Insufficient permissions for {resource_type}: {required} required")]
    Forbidden {
        resource_type: String,
        required: PermissionLevel,
    },

    #[error("Resource ID not provided")]
    MissingResourceId,

    #[error("Organization context required")]
    OrganizationRequired,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AclError {
    pub fn forbidden(resource_type: &str, required: PermissionLevel) -> Self {
        Self::Forbidden {
            resource_type: resource_type.to_string(),
            required,
        }
    }
}

pub type Result<T> = std::result::Result<T, AclError>;
