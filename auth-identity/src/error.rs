use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User profile not found")]
    ProfileNotFound,

    #[error("Organization membership required")]
    OrganizationRequired,

    #[error("Admin privileges required")]
    AdminRequired,

    #[error("Super admin privileges required")]
    SuperAdminRequired,

    #[error("Identity service error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IdentityError {
    /// True when the failure means the caller is not authenticated at all,
    /// as opposed to authenticated but lacking privileges.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            IdentityError::MissingCredentials
                | IdentityError::InvalidToken
                | IdentityError::ProfileNotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
