use anyhow::Result;
use inquire::{Confirm, CustomType, Text};
use weathernow_core::Config;

/// Walk through the settings and write them back to the config file.
pub fn run() -> Result<()> {
    let mut config = Config::load()?;

    config.language = Text::new("Language code for place names:")
        .with_default(&config.language)
        .with_help_message("Sent to the geocoder, e.g. en, de, fr")
        .prompt()?;

    config.suggestions.count = CustomType::<u32>::new("How many suggestions to show:")
        .with_default(config.suggestions.count)
        .with_error_message("Please type a whole number")
        .prompt()?;

    config.suggestions.debounce_ms = CustomType::<u64>::new("Typing pause before suggesting (ms):")
        .with_default(config.suggestions.debounce_ms)
        .with_error_message("Please type a whole number")
        .prompt()?;

    config.http.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.http.timeout_secs)
        .with_error_message("Please type a whole number")
        .prompt()?;

    let change_endpoints = Confirm::new("Change provider URLs?").with_default(false).prompt()?;
    if change_endpoints {
        config.endpoints.geocoding = Text::new("Geocoding URL:")
            .with_default(&config.endpoints.geocoding)
            .prompt()?;
        config.endpoints.forecast =
            Text::new("Forecast URL:").with_default(&config.endpoints.forecast).prompt()?;
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
