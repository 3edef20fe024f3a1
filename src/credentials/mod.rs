/// Environment variable holding the model API key.
pub const ENV_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable that overrides the configured model name.
pub const ENV_MODEL_VAR: &str = "OPENAI_MODEL";

/// Check for an API key in the OPENAI_API_KEY environment variable.
/// Returns Some(key) if the env var is set and non-empty, None otherwise.
pub fn get_api_key_from_env() -> Option<String> {
    non_blank(std::env::var(ENV_API_KEY_VAR).ok())
}

/// Model name from OPENAI_MODEL, if set and non-empty.
pub fn get_model_from_env() -> Option<String> {
    non_blank(std::env::var(ENV_MODEL_VAR).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
