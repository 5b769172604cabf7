//! Terminal sign-in. Renders the login page as prompts: a waiting line while the
//! session resolves, then identifier and hidden password prompts until the
//! provider accepts the credentials or the user gives up (EOF).

use crate::{
    gate::{
        page::{FormView, IDENTIFIER_LABEL, SECRET_LABEL, WAITING_LABEL},
        LoginPage, Navigator, Screen,
    },
    provider::{IdentityProvider, ProviderConfig, ProviderSession, UserSession},
};
use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use std::{
    cell::{Cell, RefCell},
    io::{self, BufRead, Write},
    rc::Rc,
};
use tracing::{debug, info};

/// Shown when the user leaves a required field empty.
const REQUIRED_MESSAGE: &str = "Email and password are required.";

#[derive(Debug)]
pub struct Args {
    pub config: ProviderConfig,
    pub destination: String,
    pub identifier: Option<String>,
}

/// Records navigation requests for the prompt loop to act on.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    destination: RefCell<Option<String>>,
    refresh: Cell<bool>,
}

impl TerminalNavigator {
    fn take_destination(&self) -> Option<String> {
        self.destination.borrow_mut().take()
    }

    fn take_refresh(&self) -> bool {
        self.refresh.replace(false)
    }
}

impl Navigator for TerminalNavigator {
    fn push(&self, destination: &str) {
        info!(destination, "navigation requested");
        *self.destination.borrow_mut() = Some(destination.to_string());
    }

    fn refresh(&self) {
        debug!("session refresh requested");
        self.refresh.set(true);
    }
}

/// Execute the login action.
/// # Errors
/// Returns an error if the provider client cannot be built or the terminal fails.
pub async fn execute(args: Args) -> Result<()> {
    let provider = IdentityProvider::new(args.config)?;
    let session = Rc::new(ProviderSession::new(provider.clone()));
    let navigator = Rc::new(TerminalNavigator::default());
    let page = LoginPage::new(
        Rc::clone(&session),
        Rc::new(provider.clone()),
        Rc::clone(&navigator),
        &args.destination,
    );

    let mut prefill = args.identifier;
    let mut header_shown = false;

    if page.render() == Screen::Waiting {
        println!("{WAITING_LABEL}");
    }
    session.hydrate().await;

    loop {
        let screen = page.render();

        if let Some(destination) = navigator.take_destination() {
            if navigator.take_refresh() {
                session.hydrate().await;
            }
            let url = provider.config().app_url(&destination);
            println!("{}", completion_message(&url, session.session().as_ref()));
            return Ok(());
        }

        let Screen::Form(view) = screen else {
            bail!("sign-in page is waiting without a pending redirect");
        };

        if !header_shown {
            println!("{}", header(&view));
            header_shown = true;
        }
        if let Some(banner) = banner(&view) {
            println!("{banner}");
        }

        let default = prefill
            .take()
            .or_else(|| Some(view.identifier.clone()))
            .filter(|value| !value.is_empty());
        let Some(identifier) = read_identifier(default).await? else {
            println!();
            println!("Sign-in cancelled.");
            return Ok(());
        };
        let secret = read_secret().await?;

        if identifier.is_empty() || secret.is_empty() {
            println!("{REQUIRED_MESSAGE}");
            prefill = Some(identifier);
            continue;
        }

        page.controller().set_identifier(identifier);
        page.controller().set_secret(SecretString::from(secret));

        let Some(attempt) = page.submit() else {
            continue;
        };
        if let Screen::Form(busy) = page.render() {
            println!("{}", busy.submit_label);
        }
        attempt.await;
    }
}

fn header(view: &FormView) -> String {
    let mut lines = vec![view.title.to_string(), view.description.to_string()];
    for link in &view.links {
        match link.prompt {
            Some(prompt) => lines.push(format!("  {prompt} {}: {}", link.label, link.href)),
            None => lines.push(format!("  {}: {}", link.label, link.href)),
        }
    }
    lines.join("\n")
}

fn banner(view: &FormView) -> Option<String> {
    view.error.as_ref().map(|error| format!("! {error}"))
}

fn completion_message(url: &str, session: Option<&UserSession>) -> String {
    let who = session
        .and_then(|session| session.user.as_ref())
        .and_then(|user| user.email.as_deref().or(user.name.as_deref()));

    match who {
        Some(who) => format!("Signed in as {who}. Continue at {url}"),
        None => format!("Signed in. Continue at {url}"),
    }
}

async fn read_identifier(default: Option<String>) -> Result<Option<String>> {
    tokio::task::spawn_blocking(move || {
        prompt_identifier(&mut io::stdin().lock(), default.as_deref())
    })
    .await
    .context("identifier prompt task failed")?
}

async fn read_secret() -> Result<String> {
    tokio::task::spawn_blocking(|| rpassword::prompt_password(format!("{SECRET_LABEL}: ")))
        .await
        .context("password prompt task failed")?
        .context("failed to read password")
}

/// Reads the identifier. Returns `None` on EOF; an empty answer takes the default.
fn prompt_identifier(input: &mut impl BufRead, default: Option<&str>) -> Result<Option<String>> {
    match default {
        Some(default) => print!("{IDENTIFIER_LABEL} [{default}]: "),
        None => print!("{IDENTIFIER_LABEL}: "),
    }
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let value = line.trim();
    if value.is_empty() {
        Ok(Some(default.unwrap_or_default().to_string()))
    } else {
        Ok(Some(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::page::{RECOVER_LINK, SIGN_UP_LINK, SUBMIT_LABEL};
    use crate::provider::SessionUser;
    use std::io::Cursor;

    fn view(error: Option<&str>) -> FormView {
        FormView {
            title: "Login",
            description: "Enter your credentials to access your account",
            identifier: String::new(),
            submit_label: SUBMIT_LABEL,
            submit_enabled: true,
            error: error.map(ToString::to_string),
            links: [SIGN_UP_LINK, RECOVER_LINK],
        }
    }

    #[test]
    fn prompt_identifier_reads_trimmed_line() -> Result<()> {
        let mut input = Cursor::new("  a@b.com \n");
        assert_eq!(
            prompt_identifier(&mut input, None)?,
            Some("a@b.com".to_string())
        );
        Ok(())
    }

    #[test]
    fn prompt_identifier_uses_default_on_empty_line() -> Result<()> {
        let mut input = Cursor::new("\n");
        assert_eq!(
            prompt_identifier(&mut input, Some("a@b.com"))?,
            Some("a@b.com".to_string())
        );
        let mut input = Cursor::new("\n");
        assert_eq!(prompt_identifier(&mut input, None)?, Some(String::new()));
        Ok(())
    }

    #[test]
    fn prompt_identifier_returns_none_on_eof() -> Result<()> {
        let mut input = Cursor::new("");
        assert_eq!(prompt_identifier(&mut input, Some("a@b.com"))?, None);
        Ok(())
    }

    #[test]
    fn banner_only_when_error_is_set() {
        assert_eq!(banner(&view(None)), None);
        assert_eq!(
            banner(&view(Some("Invalid credentials"))),
            Some("! Invalid credentials".to_string())
        );
    }

    #[test]
    fn header_lists_links() {
        let rendered = header(&view(None));
        assert!(rendered.starts_with("Login\n"));
        assert!(rendered.contains("Don't have an account? Sign up: /signup"));
        assert!(rendered.contains("Forgot your password?: /auth/forgot-password"));
    }

    #[test]
    fn completion_message_prefers_email() {
        let session = UserSession {
            user: Some(SessionUser {
                name: Some("Ada".to_string()),
                email: Some("a@b.com".to_string()),
            }),
            expires: None,
        };
        assert_eq!(
            completion_message("https://app.tld/dashboard", Some(&session)),
            "Signed in as a@b.com. Continue at https://app.tld/dashboard"
        );
        assert_eq!(
            completion_message("https://app.tld/dashboard", None),
            "Signed in. Continue at https://app.tld/dashboard"
        );
    }

    #[test]
    fn navigator_records_destination_and_refresh_once() {
        let navigator = TerminalNavigator::default();
        navigator.push("/dashboard");
        navigator.refresh();

        assert_eq!(navigator.take_destination().as_deref(), Some("/dashboard"));
        assert!(navigator.take_refresh());
        assert_eq!(navigator.take_destination(), None);
        assert!(!navigator.take_refresh());
    }
}
