use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.top_k == 0 {
        errors.push("top_k: must be at least 1".to_string());
    }

    if config.model.trim().is_empty() {
        errors.push("model: must not be empty".to_string());
    }

    let api_base = config.api_base.trim();
    if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
        errors.push(format!(
            "api_base: invalid '{}' - must start with http:// or https://",
            config.api_base
        ));
    }

    match config.fetch.timeout() {
        Ok(d) if d.is_zero() => errors.push("fetch.timeout: must be greater than zero".to_string()),
        Ok(_) => {}
        Err(e) => errors.push(format!(
            "fetch.timeout: invalid duration '{}' - {}",
            config.fetch.timeout, e
        )),
    }

    if config.fetch.max_chars == 0 {
        errors.push("fetch.max_chars: must be at least 1".to_string());
    }

    if let Err(e) = config.cache.ttl() {
        errors.push(format!(
            "cache.ttl: invalid duration '{}' - {}",
            config.cache.ttl, e
        ));
    }

    if let Some(ref dataset) = config.dataset {
        if dataset.as_os_str().is_empty() {
            errors.push("dataset: must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
