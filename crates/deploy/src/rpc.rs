//! Readiness polling for JSON-RPC endpoints.

use std::{fmt::Display, future::Future, time::Duration};

use crate::error::DeploymentError;

/// Wait for a service to be ready by repeatedly calling a check function.
///
/// Returns `Ok(())` once `check_fn` succeeds, or [`DeploymentError::NotReady`]
/// once `timeout` has elapsed.
pub async fn wait_until_ready<F, Fut, E>(
    name: &str,
    timeout: Duration,
    interval: Duration,
    check_fn: F,
) -> Result<(), DeploymentError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(DeploymentError::NotReady {
                name: name.to_string(),
                timeout,
            });
        }

        match check_fn().await {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::trace!(error = %e, service = %name, "Readiness check failed, retrying...");
            }
        }

        tokio::time::sleep(interval).await;
    }
}
