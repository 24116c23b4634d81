use crate::config::{is_http_url, CliConfig};
use crate::error::CliError;

pub fn run_config(config: &CliConfig, set_api_url: Option<&str>) -> Result<(), CliError> {
    let Some(url) = set_api_url else {
        println!("api_base_url: {}", config.resolve_api_url(None));
        return Ok(());
    };

    if !is_http_url(url) {
        return Err(CliError::Config(format!(
            "API base URL must include http:// or https://: {url}"
        )));
    }

    let mut updated = config.clone();
    updated.api_base_url = Some(url.trim().to_string());
    let path = updated.save().map_err(CliError::Config)?;
    println!("{}", path.display());
    Ok(())
}
