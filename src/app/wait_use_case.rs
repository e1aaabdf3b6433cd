use std::time::Duration;
use tracing::{error, info, instrument};

use crate::app::ports::HealthProbePort;
use crate::config::ServiceConfig;
use crate::error::{Result, SeedError};
use crate::retry::{retry, Attempted, RetryPolicy};

/// Block until every service answers 200 on its health URL, in order.
///
/// The first service that exhausts its attempts aborts the wait.
#[instrument(skip_all, fields(services = services.len()))]
pub async fn wait_for_services(
    probe: &dyn HealthProbePort,
    services: &[ServiceConfig],
    policy: RetryPolicy,
    settle: Duration,
) -> Result<()> {
    info!("Waiting for services to be ready...");

    for service in services {
        let outcome = retry(policy, |_| async move {
            match probe.status(&service.url).await {
                Ok(200) => Ok(()),
                Ok(status) => Err(format!("status {status}")),
                Err(e) => Err(e.to_string()),
            }
        })
        .await;

        match outcome {
            Attempted::Succeeded { attempts, .. } => {
                info!(attempts, "✓ {} is ready", service.name);
            }
            Attempted::Exhausted { last_error, attempts } => {
                error!(attempts, %last_error, "✗ {} failed to start", service.name);
                return Err(SeedError::ServiceUnavailable {
                    name: service.name.clone(),
                    attempts,
                });
            }
        }
    }

    info!("All services are ready!");
    if !settle.is_zero() {
        tokio::time::sleep(settle).await;
    }
    Ok(())
}
