/// Format whole seconds as `mm:ss`. Minutes keep counting past 59, so an
/// hour-long episode ends at "60:00".
pub fn format_duration(seconds: u64) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Parse a `mm:ss` string back into whole seconds
pub fn parse_duration(text: &str) -> Option<u64> {
    let (mins, secs) = text.trim().split_once(':')?;
    if mins.is_empty() || secs.len() != 2 {
        return None;
    }

    let mins: u64 = mins.parse().ok()?;
    let secs: u64 = secs.parse().ok()?;
    if secs >= 60 {
        return None;
    }

    mins.checked_mul(60)?.checked_add(secs)
}
