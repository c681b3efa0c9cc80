pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "fees")]
pub mod fees;

#[cfg(feature = "performance")]
pub mod performance;

#[cfg(feature = "engine")]
pub mod engine;

#[cfg(feature = "onboarding")]
pub mod onboarding;

#[cfg(feature = "synthetic")]
pub mod synthetic;

pub use error::PmsError;
pub use types::*;

/// Standard result type for all engine operations
pub type PmsResult<T> = Result<T, PmsError>;
