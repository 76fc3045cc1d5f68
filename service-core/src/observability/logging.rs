use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the JSON log subscriber for a service.
///
/// `RUST_LOG` takes precedence over `log_level`. Returns an error if a global
/// subscriber is already installed.
pub fn init_tracing(service_name: &str, log_level: &str) -> Result<(), anyhow::Error> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init()
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to initialize tracing for service '{}': {}",
                service_name,
                e
            )
        })?;

    tracing::info!(service = %service_name, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        // The first call may lose to another test in the same binary; either
        // way a subscriber is installed afterwards.
        let _ = init_tracing("service-core-test", "info");
        assert!(init_tracing("service-core-test", "info").is_err());
    }
}
