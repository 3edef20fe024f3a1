use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, validate_config, Config, DEFAULT_DATASET_PATH};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Serialize and write a config atomically, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let defaults = Config::default();

    println!();
    println!("PE Shortlist Configuration Wizard");
    println!("=================================");
    println!();

    // 1. Dataset
    println!("The fund dataset is a JSON array of fund records (name, industries, regions, ranges, deal types).");
    let dataset = prompt_with_default("Fund dataset path", DEFAULT_DATASET_PATH)?;

    // 2. Shortlist size
    println!();
    let top_k: usize = loop {
        let input = prompt_with_default("How many funds should the shortlist show?", "5")?;
        match input.parse::<usize>() {
            Ok(v) if v > 0 => break v,
            _ => println!("  Invalid: must be a positive whole number. Try again."),
        }
    };

    // 3. Extraction
    println!();
    println!("Profiles are extracted by a language model when OPENAI_API_KEY is set.");
    println!("Offline mode always uses keyword heuristics instead.");
    let offline = prompt_yes_no("Always run offline?", false)?;
    let model = if offline {
        defaults.model.clone()
    } else {
        prompt_with_default("Model", &defaults.model)?
    };
    let api_base = if offline {
        defaults.api_base.clone()
    } else {
        prompt_with_default("API base URL", &defaults.api_base)?
    };

    // 4. Page cache
    println!();
    let mut cache = defaults.cache.clone();
    cache.enabled = prompt_yes_no("Cache fetched pages on disk?", true)?;
    if cache.enabled {
        cache.ttl = loop {
            let input = prompt_with_default("Cache lifetime", &defaults.cache.ttl)?;
            match humantime::parse_duration(&input) {
                Ok(_) => break input,
                Err(e) => println!("  Invalid: {}. Try again.", e),
            }
        };
    }

    // 5. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 6. Write config
    let config = Config {
        dataset: Some(PathBuf::from(dataset)),
        top_k,
        model,
        api_base,
        offline,
        fetch: defaults.fetch.clone(),
        cache,
    };
    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Generated config is invalid:\n  {}", errors.join("\n  "));
    }

    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `pe-shortlist match <URL>` to get started.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use std::env;

    #[test]
    fn test_write_config_round_trip() {
        let dir = env::temp_dir().join("pe_shortlist_test_init");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("config.yaml");

        let config = Config {
            dataset: Some(PathBuf::from("funds.json")),
            top_k: 4,
            offline: true,
            ..Default::default()
        };
        write_config(&path, &config).unwrap();

        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
