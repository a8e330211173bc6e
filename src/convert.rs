//! Numeric-to-display conversions for heights, ratings and counts.

/// Placeholder for any value the sources could not provide.
pub const NA: &str = "NA";

const METRES_TO_FEET: f64 = 3.28084;

/// Length unit carried by structural height measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Metres,
    Feet,
}

impl Unit {
    /// Case-insensitive parse of the unit spellings seen in the exports
    /// ("METRE", "m", "FOOT", "ft", ...). Unknown units yield `None` so
    /// the value is reported as NA rather than misconverted.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "metre" | "metres" | "meter" | "meters" => Some(Self::Metres),
            "ft" | "foot" | "feet" => Some(Self::Feet),
            _ => None,
        }
    }
}

/// Converts a height to the `F'-I"` display form. Metres are converted
/// at 3.28084 ft/m; inches that round to 12 carry into the next foot.
/// Missing or non-finite values and unknown units render as "NA".
pub fn to_feet_inches(value: Option<f64>, unit: Option<Unit>) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return NA.to_string(),
    };
    let feet_decimal = match unit {
        Some(Unit::Metres) => value * METRES_TO_FEET,
        Some(Unit::Feet) => value,
        None => return NA.to_string(),
    };
    let mut feet = feet_decimal.floor() as i64;
    let mut inches = ((feet_decimal - feet_decimal.floor()) * 12.0).round() as i64;
    if inches == 12 {
        feet += 1;
        inches = 0;
    }
    format!("{feet}'-{inches}\"")
}

/// Converts a height given in total inches to the `F'-I"` form.
///
/// Unlike [`to_feet_inches`], the rounded remainder is NOT carried into
/// the next foot, so 71.6 inches renders as `5'-12"`. The survey-derived
/// columns have always been formatted this way and downstream consumers
/// compare these strings, so the inconsistency is kept deliberately.
pub fn feet_inches_from_inches(total_inches: f64) -> String {
    if !total_inches.is_finite() {
        return NA.to_string();
    }
    let feet = (total_inches / 12.0).floor() as i64;
    let inches = (total_inches % 12.0).round() as i64;
    format!("{feet}'-{inches}\"")
}

/// Two-decimal percentage string, or "NA" for missing input. Ties round
/// half away from zero, so 78.125 renders as "78.13%" (`{:.2}` alone
/// rounds half to even and would give "78.12%").
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let rounded = (v * 100.0).round() / 100.0;
            format!("{rounded:.2}%")
        }
        _ => NA.to_string(),
    }
}

/// "NO" for zero or negative counts, else "YES (n)".
pub fn format_yes_no_count(count: i64) -> String {
    if count <= 0 {
        "NO".to_string()
    } else {
        format!("YES ({count})")
    }
}
