use thiserror::Error;

use crate::auth::MIN_PASSWORD_LENGTH;

/// Everything a form submission can fail with. The display strings are shown to the user as-is,
/// except for `Internal`, which is logged and replaced with a generic page.
#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Please enter username and password")]
    MissingCredentials,

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please fill in all required fields")]
    MissingRequiredFields,

    #[error("Password confirmation does not match")]
    PasswordMismatch,

    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,

    #[error("Username or email is already taken")]
    UsernameOrEmailTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Scheduled time is invalid")]
    InvalidScheduledTime,

    #[error("Selected video does not exist")]
    InvalidVideoSelection,

    #[error("Please choose a video file")]
    MissingVideoFile,

    #[error("Unsupported video format, use mp4, mov, avi or mkv")]
    UnsupportedVideoFormat,

    #[error("User not found")]
    UserNotFound,

    #[error("Video not found")]
    VideoNotFound,

    #[error("Stream not found")]
    StreamNotFound,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            UseCaseError::UserNotFound | UseCaseError::VideoNotFound | UseCaseError::StreamNotFound
        )
    }
}
