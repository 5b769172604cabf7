use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    Command::new("vestibule")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("url")
                .long("url")
                .help("Identity provider base URL, example: https://app.tld")
                .env("VESTIBULE_URL")
                .required(true),
        )
        .arg(
            Arg::new("auth-path")
                .long("auth-path")
                .help("Path of the provider auth endpoints")
                .default_value("/api/auth")
                .env("VESTIBULE_AUTH_PATH"),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .help("Credentials provider id")
                .default_value("credentials")
                .env("VESTIBULE_PROVIDER"),
        )
        .arg(
            Arg::new("destination")
                .long("destination")
                .help("Path to continue to once signed in")
                .default_value("/dashboard")
                .env("VESTIBULE_DESTINATION"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Request timeout in seconds")
                .default_value("10")
                .env("VESTIBULE_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("identifier")
                .short('u')
                .long("identifier")
                .help("Email to prefill in the sign-in prompt")
                .env("VESTIBULE_IDENTIFIER"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("VESTIBULE_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "vestibule");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_defaults() {
        temp_env::with_vars(
            [
                ("VESTIBULE_AUTH_PATH", None::<&str>),
                ("VESTIBULE_PROVIDER", None),
                ("VESTIBULE_DESTINATION", None),
                ("VESTIBULE_TIMEOUT", None),
                ("VESTIBULE_IDENTIFIER", None),
            ],
            || {
                let matches =
                    new().get_matches_from(vec!["vestibule", "--url", "https://app.tld"]);

                assert_eq!(
                    matches.get_one::<String>("url").cloned(),
                    Some("https://app.tld".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>("auth-path").cloned(),
                    Some("/api/auth".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>("provider").cloned(),
                    Some("credentials".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>("destination").cloned(),
                    Some("/dashboard".to_string())
                );
                assert_eq!(matches.get_one::<u64>("timeout").copied(), Some(10));
                assert_eq!(matches.get_one::<String>("identifier"), None);
            },
        );
    }

    #[test]
    fn test_check_args() {
        let matches = new().get_matches_from(vec![
            "vestibule",
            "--url",
            "https://app.tld",
            "--auth-path",
            "/auth",
            "--provider",
            "ldap",
            "--destination",
            "/home",
            "--timeout",
            "3",
            "-u",
            "a@b.com",
        ]);

        assert_eq!(
            matches.get_one::<String>("auth-path").cloned(),
            Some("/auth".to_string())
        );
        assert_eq!(
            matches.get_one::<String>("provider").cloned(),
            Some("ldap".to_string())
        );
        assert_eq!(
            matches.get_one::<String>("destination").cloned(),
            Some("/home".to_string())
        );
        assert_eq!(matches.get_one::<u64>("timeout").copied(), Some(3));
        assert_eq!(
            matches.get_one::<String>("identifier").cloned(),
            Some("a@b.com".to_string())
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("VESTIBULE_URL", Some("https://app.tld")),
                ("VESTIBULE_DESTINATION", Some("/home")),
                ("VESTIBULE_TIMEOUT", Some("30")),
                ("VESTIBULE_IDENTIFIER", Some("a@b.com")),
                ("VESTIBULE_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["vestibule"]);
                assert_eq!(
                    matches.get_one::<String>("url").cloned(),
                    Some("https://app.tld".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>("destination").cloned(),
                    Some("/home".to_string())
                );
                assert_eq!(matches.get_one::<u64>("timeout").copied(), Some(30));
                assert_eq!(
                    matches.get_one::<String>("identifier").cloned(),
                    Some("a@b.com".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_missing_url_is_an_error() {
        temp_env::with_vars([("VESTIBULE_URL", None::<&str>)], || {
            let result = new().try_get_matches_from(vec!["vestibule"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result =
            new().try_get_matches_from(vec!["vestibule", "--url", "https://app.tld", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("VESTIBULE_LOG_LEVEL", Some(level)),
                    ("VESTIBULE_URL", Some("https://app.tld")),
                ],
                || {
                    let matches = new().get_matches_from(vec!["vestibule"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").copied(),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("VESTIBULE_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "vestibule".to_string(),
                    "--url".to_string(),
                    "https://app.tld".to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }
}
