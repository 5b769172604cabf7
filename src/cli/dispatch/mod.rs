use crate::{
    cli::actions::{login::Args, Action},
    provider::ProviderConfig,
};
use anyhow::{Context, Result};
use std::time::Duration;

/// # Errors
/// Returns an error if required arguments are missing or the provider URL is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let url = matches
        .get_one::<String>("url")
        .cloned()
        .context("missing required argument: --url")?;
    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(10);

    let mut config = ProviderConfig::new(&url)
        .context("invalid provider URL")?
        .with_timeout(Duration::from_secs(timeout));
    if let Some(auth_path) = matches.get_one::<String>("auth-path") {
        config = config.with_auth_path(auth_path);
    }
    if let Some(provider) = matches.get_one::<String>("provider") {
        config = config.with_provider_id(provider);
    }

    let destination = matches
        .get_one::<String>("destination")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| crate::gate::DEFAULT_DESTINATION.to_string());

    let identifier = matches
        .get_one::<String>("identifier")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    Ok(Action::Login(Args {
        config,
        destination,
        identifier,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_handler_builds_login_action() -> Result<()> {
        let matches = commands::new().try_get_matches_from(vec![
            "vestibule",
            "--url",
            "https://app.tld/",
            "--provider",
            "ldap",
            "--destination",
            " /home ",
            "--timeout",
            "5",
            "--identifier",
            "  ",
        ])?;

        let Action::Login(args) = handler(&matches)?;
        assert_eq!(args.config.base_url, "https://app.tld");
        assert_eq!(args.config.provider_id, "ldap");
        assert_eq!(args.config.timeout, Duration::from_secs(5));
        assert_eq!(args.destination, "/home");
        assert_eq!(args.identifier, None);
        Ok(())
    }

    #[test]
    fn test_handler_rejects_invalid_url() -> Result<()> {
        let matches =
            commands::new().try_get_matches_from(vec!["vestibule", "--url", "app.tld"])?;
        let Err(err) = handler(&matches) else {
            panic!("expected an invalid URL error");
        };
        assert_eq!(err.to_string(), "invalid provider URL");
        Ok(())
    }
}
