/// Formats seconds as `H:MM:SS`. Hours are not wrapped into days.
pub fn format_duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    format!("{}{}:{:02}:{:02}", sign, hours, mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00:00");
        assert_eq!(format_duration(1), "0:00:01");
        assert_eq!(format_duration(59), "0:00:59");
        assert_eq!(format_duration(60), "0:01:00");
        assert_eq!(format_duration(61), "0:01:01");
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(5400), "1:30:00");
        assert_eq!(format_duration(3661), "1:01:01");
        assert_eq!(format_duration(86400 + 3600 + 60 + 1), "25:01:01");
        assert_eq!(format_duration(-300), "-0:05:00");
    }
}
