//! Human-friendly formatting for counts, sizes and timestamps.

use chrono::{DateTime, Local, NaiveDate, TimeDelta, Timelike, Utc};

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Size given in KiB, printed with decimal units (`"1.5 MB"`).
pub fn natural_size(kib: u64) -> String {
    let bytes = kib.saturating_mul(1024);
    if bytes < 1000 {
        return format!("{bytes} Bytes");
    }
    let units = ["kB", "MB", "GB", "TB"];
    let mut value = bytes as f64 / 1000.0;
    let mut unit = 0;
    while value >= 1000.0 && unit < units.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{value:.1} {}", units[unit])
}

/// Rough span of time in words: `"a moment"`, `"5 minutes"`, `"2 years"`.
pub fn natural_delta(delta: TimeDelta) -> String {
    let secs = delta.num_seconds().abs();
    let days = secs / 86_400;

    if secs < 1 {
        return "a moment".to_string();
    }
    if days == 0 {
        return match secs {
            1 => "a second".to_string(),
            2..=59 => format!("{secs} seconds"),
            60..=119 => "a minute".to_string(),
            120..=3599 => format!("{} minutes", secs / 60),
            3600..=7199 => "an hour".to_string(),
            _ => format!("{} hours", secs / 3600),
        };
    }

    let years = days / 365;
    let months = ((days % 365) as f64 / 30.5) as i64;
    match (years, months) {
        (0, 0) if days == 1 => "a day".to_string(),
        (0, 0) => format!("{days} days"),
        (0, 1) => "a month".to_string(),
        (0, m) => format!("{m} months"),
        (1, 0) => "a year".to_string(),
        (1, 1) => "1 year, 1 month".to_string(),
        (1, m) => format!("1 year, {m} months"),
        (y, _) => format!("{y} years"),
    }
}

/// `"today"`, `"yesterday"`, `"Mar 02"` within the year, `"Mar 02 2021"` otherwise.
pub fn natural_date(date: NaiveDate, today: NaiveDate) -> String {
    match (today - date).num_days() {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        -1 => "tomorrow".to_string(),
        d if d.abs() < 365 => date.format("%b %d").to_string(),
        _ => date.format("%b %d %Y").to_string(),
    }
}

/// Clock face for the local time, rounded up to the next half hour.
pub fn clock_emoji(time: DateTime<Local>) -> char {
    let mut secs = time.num_seconds_from_midnight();
    if time.nanosecond() > 0 {
        secs += 1;
    }
    let slot = secs.div_ceil(30 * 60) % 48;
    let hour = (slot / 2) % 12;
    let index = if hour == 0 { 11 } else { hour - 1 };
    let base = if slot % 2 == 0 { 0x1F550 } else { 0x1F55C };
    char::from_u32(base + index).unwrap_or('🕛')
}

/// Line for a card timestamp, e.g. `"🕞 Last pushed: 3 days ago (Oct 16)"`.
///
/// `delta_first` puts the relative delta first; otherwise the date leads.
pub fn timestamp_line(
    label: &str,
    time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    delta_first: bool,
) -> String {
    let Some(time) = time else {
        return format!("🕛 {label}: unknown");
    };
    let local = time.with_timezone(&Local);
    let today = now.with_timezone(&Local).date_naive();
    let delta = natural_delta(now - time);
    let date = natural_date(local.date_naive(), today);
    let emoji = clock_emoji(local);

    if delta_first {
        format!("{emoji} {label}: {delta} ago ({date})")
    } else {
        format!("{emoji} {label}: {date} ({delta})")
    }
}

/// Language name, or `"N/A"` when the host didn't detect one.
pub fn language(lang: Option<&str>) -> String {
    lang.filter(|l| !l.is_empty()).unwrap_or("N/A").to_string()
}
