//! The unit of work applied to each record.

use std::future::Future;

use async_trait::async_trait;

/// A fallible asynchronous operation run once per attempt at a record.
///
/// Any error is treated as retryable. The runner may call `call` many times
/// with clones of the same value until it returns `Ok`.
///
/// Plain async closures implement this trait:
///
/// ```rust,ignore
/// let callback = |id: String| async move { upload(&id).await };
/// ```
#[async_trait]
pub trait Callback<T>: Send + Sync {
    /// The success payload. The runner discards it.
    type Output: Send;

    /// The failure payload, handed to the event handler.
    type Error: Send;

    /// Process one record.
    async fn call(&self, record: T) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<T, F, Fut, O, E> Callback<T> for F
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    type Output = O;
    type Error = E;

    async fn call(&self, record: T) -> Result<O, E> {
        (self)(record).await
    }
}
