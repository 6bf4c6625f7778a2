//! Identifier helpers shared by every emitter.
//!
//! All functions here are pure: the same text always yields the same name.
//! Alert identifiers, metric names and source-code identifiers are derived
//! from free text in several files, and they only line up because they all go
//! through these helpers.

/// Identifier used when an alert's text has nothing usable in it.
pub const FALLBACK_ALERT_NAME: &str = "CustomAlert";

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Turns alert text into a PascalCase alert identifier.
///
/// ```
/// use monitorgen::monitoring::naming::sanitize;
///
/// assert_eq!(sanitize("error rate is above 5%"), "ErrorRateIsAbove5");
/// assert_eq!(sanitize("  --  "), "CustomAlert");
/// ```
pub fn sanitize(text: &str) -> String {
    let name: String = tokens(text)
        .map(|token| {
            if token.chars().all(|c| c.is_ascii_digit()) {
                token.to_string()
            } else {
                title_case(token)
            }
        })
        .collect();

    if name.is_empty() {
        FALLBACK_ALERT_NAME.to_string()
    } else {
        name
    }
}

/// lower_snake_case slug, e.g. `"Page Views!"` -> `"page_views"`.
///
/// Returns an empty string when the text has no alphanumeric characters.
pub fn slugify(text: &str) -> String {
    tokens(text)
        .map(|token| token.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Like [`slugify`] but joined with `-`, for hostnames and Docker service names.
pub fn kebab(text: &str) -> String {
    tokens(text)
        .map(|token| token.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// `shop_page_views` -> `ShopPageViews`
pub fn pascal_case(snake: &str) -> String {
    snake.split('_').map(title_case).collect()
}

/// `shop_page_views` -> `shopPageViews`
pub fn camel_case(snake: &str) -> String {
    let pascal = pascal_case(snake);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts human durations to Prometheus durations.
///
/// Accepts `"90 days"`, `"2 hours"`, `"10m"`, `"1 week"`. Returns `None` when
/// no number/unit pair can be read.
pub fn to_prometheus_duration(text: &str) -> Option<String> {
    let lowered = text.trim().to_lowercase();
    let digits_end = lowered
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(lowered.len());
    let (digits, rest) = lowered.split_at(digits_end);
    let value: u64 = digits.parse().ok()?;
    let unit = match rest.trim() {
        "ms" | "millisecond" | "milliseconds" => "ms",
        "s" | "sec" | "secs" | "second" | "seconds" => "s",
        "m" | "min" | "mins" | "minute" | "minutes" => "m",
        "h" | "hr" | "hrs" | "hour" | "hours" => "h",
        "d" | "day" | "days" => "d",
        "w" | "week" | "weeks" => "w",
        "y" | "year" | "years" => "y",
        _ => return None,
    };
    Some(format!("{}{}", value, unit))
}

/// Length of a Prometheus duration in milliseconds, for picking the longest one.
pub fn duration_millis(duration: &str) -> Option<u64> {
    let digits_end = duration.find(|c: char| !c.is_ascii_digit())?;
    let (digits, unit) = duration.split_at(digits_end);
    let value: u64 = digits.parse().ok()?;
    let factor = match unit {
        "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 604_800_000,
        "y" => 31_536_000_000,
        _ => return None,
    };
    value.checked_mul(factor)
}

/// Escapes text for a double-quoted string literal in generated source or PromQL.
pub fn escape_double_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
