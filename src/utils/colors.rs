/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Overlay intensity color:
/// 0..=33 → green
/// 34..=66 → yellow
/// 67..=100 → red
pub fn color_for_intensity(intensity: u8) -> &'static str {
    match intensity {
        0..=33 => GREEN,
        34..=66 => YELLOW,
        _ => RED,
    }
}
