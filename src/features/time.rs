/// Render seconds since midnight as a 12-hour clock, e.g. `"2:30 AM"`.
pub fn format_time(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let period = if hours < 12 { "AM" } else { "PM" };
    let hour = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour, minutes, period)
}
