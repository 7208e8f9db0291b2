use chrono::{DateTime, Local};
use time_humanize::HumanTime;

const CHAT_BASE_URL: &str = "https://chat.openai.com/?q=";

/// Hand the draft off to a chat assistant in the browser
pub fn chat_url(text: &str) -> String {
    format!("{}{}", CHAT_BASE_URL, percent_encode(text))
}

/// RFC 3986 query-component encoding; everything outside the
/// unreserved set is escaped, including spaces.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{:02X}", byte));
            }
        }
    }
    out
}

/// "May 3, 2026 at 2:41 PM", the history-entry date style
pub fn human_date(dt: &DateTime<Local>) -> String {
    let day = dt.format("%-d");
    format!("{} {}, {} at {}", dt.format("%B"), day, dt.format("%Y"), dt.format("%-I:%M %p"))
}

/// Relative age like "an hour ago", for history entries
pub fn relative_age(dt: &DateTime<Local>, now: &DateTime<Local>) -> String {
    let secs = now.signed_duration_since(*dt).num_seconds();
    HumanTime::from(-secs).to_string()
}
