use weathernow_core::{
    LookupStatus, WeatherViewModel,
    present::{compass_direction, describe_weather_code, format_local_time, round_half_up},
};

pub const IDLE_HINT: &str = "Enter a city name to check the weather conditions";
pub const LOADING: &str = "Loading weather data...";

/// The result panel for any lookup state.
pub fn status(status: &LookupStatus) -> Vec<String> {
    match status {
        LookupStatus::Idle => vec![IDLE_HINT.to_string()],
        LookupStatus::Loading => vec![LOADING.to_string()],
        LookupStatus::Success(view) => report(view),
        LookupStatus::Failed(message) => vec![message.clone()],
    }
}

pub fn report(view: &WeatherViewModel) -> Vec<String> {
    let mut lines = vec![
        view.location_label.clone(),
        format!(
            "{}°C  {}",
            round_half_up(view.temperature),
            describe_weather_code(view.weather_code)
        ),
        format!("Feels like {}°C", round_half_up(view.apparent_temperature)),
        String::new(),
        row("Humidity", format!("{}%", view.humidity)),
        row(
            "Wind",
            format!(
                "{} km/h {}",
                round_half_up(view.wind_speed),
                compass_direction(view.wind_direction_degrees)
            ),
        ),
        row("Pressure", format!("{} hPa", round_half_up(view.pressure))),
        row("Cloud cover", format!("{}%", view.cloud_cover)),
        row("Sunrise", format_local_time(&view.sunrise)),
        row("Sunset", format_local_time(&view.sunset)),
    ];

    if view.precipitation > 0.0 {
        lines.push(String::new());
        lines.push(format!("Current precipitation: {} mm", view.precipitation));
    }

    lines
}

fn row(label: &str, value: String) -> String {
    format!("{label:<12} {value}")
}
