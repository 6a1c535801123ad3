use jiff::Timestamp;

/// Format an RFC 3339 publication timestamp as a long date, e.g.
/// "2024-01-15T10:00:00Z" -> "Monday, January 15, 2024". Dates are rendered
/// in UTC. Returns `None` when the timestamp does not parse.
pub fn format_published_at(raw: &str) -> Option<String> {
    let ts: Timestamp = raw.trim().parse().ok()?;
    Some(ts.strftime("%A, %B %-d, %Y").to_string())
}
