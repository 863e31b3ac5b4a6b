//! Session commands: login, register, logout, whoami, theme.

use crate::cli::ThemeArg;
use crate::context::App;
use crate::error::CliError;

pub async fn login(
    app: &App,
    username: Option<String>,
    password: Option<String>,
) -> Result<(), CliError> {
    let username = match username {
        Some(username) => username,
        None => inquire::Text::new("Username:").prompt()?,
    };
    let password = match password {
        Some(password) => password,
        None => inquire::Password::new("Password:")
            .without_confirmation()
            .prompt()?,
    };

    let profile = app.auth.login(&username, &password).await?;
    println!("Logged in as {} ({})", profile.username, profile.role);
    Ok(())
}

pub async fn register(
    app: &App,
    username: &str,
    password: &str,
    role: Option<&str>,
) -> Result<(), CliError> {
    let response = app.auth.register(username, password, role).await?;
    println!("{}", response.message);
    if let Some(user_id) = response.user_id {
        println!("User id: {}", user_id);
    }
    Ok(())
}

pub fn logout(app: &App) -> Result<(), CliError> {
    app.auth.logout()?;
    app.queries.store().clear_all();
    println!("Session closed.");
    Ok(())
}

pub fn whoami(app: &App) -> Result<(), CliError> {
    match app.session.user() {
        // Role comes from the unverified token payload: show it, never
        // gate anything on it.
        Some(user) => println!("{} (id {}, role {})", user.username, user.id, user.role),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub fn theme(app: &App, theme: Option<ThemeArg>) -> Result<(), CliError> {
    match theme {
        Some(theme) => {
            app.session.set_theme(theme.into())?;
            println!("Theme set to {}.", app.session.theme());
        }
        None => println!("Theme: {}", app.session.theme()),
    }
    Ok(())
}
