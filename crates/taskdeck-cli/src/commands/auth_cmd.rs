use taskdeck_core::auth::AuthClient;

use crate::error::CliError;
use crate::session::{clear_stored_session, load_stored_session, CliSessionStore};

fn auth_client(api_url: &str) -> Result<AuthClient<CliSessionStore>, CliError> {
    AuthClient::new(api_url, CliSessionStore).map_err(|error| CliError::Auth(error.to_string()))
}

pub async fn run_login(api_url: &str, username: &str, password: &str) -> Result<(), CliError> {
    let client = auth_client(api_url)?;
    client
        .login(username, password)
        .await
        .map_err(|error| CliError::Auth(error.to_string()))?;
    println!("Signed in as {username}");
    Ok(())
}

pub async fn run_signup(
    api_url: &str,
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), CliError> {
    let client = auth_client(api_url)?;
    let message = client
        .register(username, password, confirm_password)
        .await
        .map_err(|error| CliError::Auth(error.to_string()))?;
    println!("{message}");
    println!("You can now sign in with `taskdeck login`.");
    Ok(())
}

pub fn run_logout() -> Result<(), CliError> {
    clear_stored_session().map_err(|error| CliError::Auth(error.to_string()))?;
    println!("Signed out");
    Ok(())
}

pub fn run_status() -> Result<(), CliError> {
    let session = load_stored_session().map_err(|error| CliError::Auth(error.to_string()))?;
    if session.is_some() {
        println!("Signed in (session token stored)");
    } else {
        println!("Not signed in");
    }
    Ok(())
}
