//! Pure formatting helpers used by every renderer.

use chrono::{DateTime, NaiveDateTime};

const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// English phrase for a WMO weather interpretation code.
pub fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Foggy",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}

/// `hh:mm AM/PM` for a provider timestamp.
///
/// Forecast timestamps come without an offset and are already local to the
/// place (`timezone=auto`), so the wall-clock part is printed as-is.
pub fn format_local_time(iso_timestamp: &str) -> String {
    parse_wall_clock(iso_timestamp)
        .map(|dt| dt.format("%I:%M %p").to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}

fn parse_wall_clock(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_local()))
}

/// Nearest of the eight compass points; 0° is north.
pub fn compass_direction(degrees: f64) -> &'static str {
    let sector = round_half_up(degrees / 45.0);
    COMPASS_POINTS[sector.rem_euclid(8) as usize]
}

/// Round half toward positive infinity for display.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_codes() {
        assert_eq!(describe_weather_code(0), "Clear sky");
        assert_eq!(describe_weather_code(2), "Partly cloudy");
        assert_eq!(describe_weather_code(3), "Overcast");
        assert_eq!(describe_weather_code(48), "Foggy");
        assert_eq!(describe_weather_code(61), "Slight rain");
        assert_eq!(describe_weather_code(95), "Thunderstorm");
        assert_eq!(describe_weather_code(99), "Thunderstorm with hail");
    }

    #[test]
    fn unmapped_codes_are_unknown() {
        for code in [4, 50, 100, -1, 12345] {
            assert_eq!(describe_weather_code(code), "Unknown");
        }
    }

    #[test]
    fn compass_cardinal_points() {
        assert_eq!(compass_direction(0.0), "N");
        assert_eq!(compass_direction(90.0), "E");
        assert_eq!(compass_direction(180.0), "S");
        assert_eq!(compass_direction(270.0), "W");
    }

    #[test]
    fn compass_rounds_and_wraps() {
        assert_eq!(compass_direction(359.0), "N");
        assert_eq!(compass_direction(22.0), "N");
        assert_eq!(compass_direction(23.0), "NE");
        assert_eq!(compass_direction(225.0), "SW");
        assert_eq!(compass_direction(720.0), "N");
    }

    #[test]
    fn compass_rounds_halves_up() {
        assert_eq!(compass_direction(-22.5), "N");
        assert_eq!(compass_direction(22.5), "NE");
        assert_eq!(compass_direction(-67.5), "NW");
    }

    #[test]
    fn compass_is_total() {
        assert_eq!(compass_direction(-90.0), "W");
        assert_eq!(compass_direction(f64::NAN), "N");
    }

    #[test]
    fn local_time_twelve_hour() {
        assert_eq!(format_local_time("2024-06-01T05:47"), "05:47 AM");
        assert_eq!(format_local_time("2024-06-01T21:48"), "09:48 PM");
        assert_eq!(format_local_time("2024-06-01T12:05:30"), "12:05 PM");
        assert_eq!(format_local_time("2024-06-01T00:10"), "12:10 AM");
    }

    #[test]
    fn local_time_keeps_offset_wall_clock() {
        assert_eq!(format_local_time("2024-06-01T06:30:00+02:00"), "06:30 AM");
    }

    #[test]
    fn local_time_invalid_input() {
        assert_eq!(format_local_time(""), "Invalid Date");
        assert_eq!(format_local_time("sunrise"), "Invalid Date");
    }

    #[test]
    fn rounding_matches_widget() {
        assert_eq!(round_half_up(18.4), 18);
        assert_eq!(round_half_up(18.5), 19);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
    }
}
