//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Human readable duration from seconds.
///
/// e.g. 45s, 5m, 2h 05m
pub fn secs2readable(secs: i64) -> String {
    let s = secs.max(0);
    let hours = s / 3600;
    let minutes = (s % 3600) / 60;

    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::secs2readable;

    #[test]
    fn readable_durations() {
        assert_eq!(secs2readable(45), "45s");
        assert_eq!(secs2readable(300), "5m");
        assert_eq!(secs2readable(7500), "2h 05m");
        assert_eq!(secs2readable(-10), "0s");
    }
}
