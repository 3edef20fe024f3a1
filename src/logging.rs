use tracing_subscriber::EnvFilter;

/// Default filter when RUST_LOG is unset.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "pe_shortlist=debug,warn"
    } else {
        "warn"
    }
}

/// Initialize the tracing subscriber. Uses `RUST_LOG` for filtering if present.
///
/// Output goes through [`crate::stderr_buffer`], so lines logged while the dashboard
/// is up are printed after the terminal is restored. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(crate::stderr_buffer::writer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("pe_shortlist=debug"));
    }
}
