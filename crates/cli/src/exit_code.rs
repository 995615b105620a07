//! Process exit codes
//!
//! Scripts branch on these, so the numeric values are stable.

/// Exit code returned by `sct`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    /// Bad arguments, missing configuration, or a 400/422 from the server
    UsageError = 2,
    /// The request never got a response
    NetworkError = 3,
    /// 401 or 403 from the server
    AuthError = 4,
    NotFound = 5,
}

impl ExitCode {
    /// Map an HTTP status code to an exit code
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => ExitCode::Success,
            400 | 422 => ExitCode::UsageError,
            401 | 403 => ExitCode::AuthError,
            404 => ExitCode::NotFound,
            _ => ExitCode::GeneralError,
        }
    }

    /// Map a client-side error to an exit code
    pub fn from_error(error: &sct_core::Error) -> Self {
        match error {
            sct_core::Error::Network(_) => ExitCode::NetworkError,
            sct_core::Error::InvalidUrl(_)
            | sct_core::Error::InvalidHeader(_)
            | sct_core::Error::Config(_) => ExitCode::UsageError,
            _ => ExitCode::GeneralError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
