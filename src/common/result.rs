use crate::common::error::NestrepoError;

/// Result alias used across the crate
///
/// # Examples
///
/// ```
/// use nestrepo::common::result::NestrepoResult;
/// use nestrepo::common::error::NestrepoError;
///
/// fn example_function() -> NestrepoResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> NestrepoResult<()> {
///     Err(NestrepoError::timeout(30))
/// }
/// ```
pub type NestrepoResult<T> = Result<T, NestrepoError>;

/// Helpers for async code
pub mod async_helpers {
    use super::{NestrepoError, NestrepoResult};
    use std::future::Future;

    /// Run `f`, failing with [`NestrepoError::Timeout`] after `timeout_secs`
    pub async fn with_timeout<F, T>(f: F, timeout_secs: u64) -> NestrepoResult<T>
    where
        F: Future<Output = NestrepoResult<T>>,
    {
        let timeout_duration = std::time::Duration::from_secs(timeout_secs);

        match tokio::time::timeout(timeout_duration, f).await {
            Ok(result) => result,
            Err(_) => Err(NestrepoError::timeout(timeout_secs)),
        }
    }

    /// Like [`with_timeout`], but a `None` limit runs `f` to completion
    pub async fn with_optional_timeout<F, T>(f: F, timeout_secs: Option<u64>) -> NestrepoResult<T>
    where
        F: Future<Output = NestrepoResult<T>>,
    {
        match timeout_secs {
            Some(secs) => with_timeout(f, secs).await,
            None => f.await,
        }
    }
}
