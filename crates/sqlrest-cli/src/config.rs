use std::path::Path;

use miette::Result;
use sqlrest_config::config::{generate_default_config, Config};
use tracing::info;

const REDACTED: &str = "********";

/// Prints the configuration with secrets masked.
pub fn display_config(path: &Path) -> Result<()> {
    let config = redacted(Config::load(path)?);
    let doc = config.to_annotated_document()?;

    info!("# {}", path.display());
    println!("{doc}");
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    generate_default_config(path)?;
    Ok(())
}

fn redacted(mut config: Config) -> Config {
    for profile in config.profile.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.to_string());
        }
        if profile.token.is_some() {
            profile.token = Some(REDACTED.to_string());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use sqlrest_config::profile::Profile;

    use super::*;

    #[test]
    fn test_redacted_masks_secrets() {
        let mut config = Config::default_config();
        config.profile.insert(
            "prod".to_string(),
            Profile {
                username: Some("admin".to_string()),
                password: Some("hunter2".to_string()),
                token: Some("Bearer abc".to_string()),
                ..Profile::new("https://db.example.com")
            },
        );

        let rendered = redacted(config).to_annotated_document().unwrap().to_string();
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("Bearer abc"));
    }
}
