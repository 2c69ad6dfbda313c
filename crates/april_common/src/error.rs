//! Error types for APRIL.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AprilError {
    #[error("Unknown preference category: {0}")]
    UnknownCategory(String),

    #[error("Preference store error: {0}")]
    Store(String),
}
