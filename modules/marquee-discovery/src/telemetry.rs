use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, defaulting to `info` for the workspace
/// crates unless `RUST_LOG` says otherwise. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("marquee_discovery=info,marquee_common=info,omdb_client=info")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init_tracing();
        super::init_tracing();
        tracing::info!("still logging");
    }
}
