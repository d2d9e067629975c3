use chrono::DateTime;

const DEGREE: char = '\u{00B0}';

// Half-up rounding, so x.5 always goes towards +inf, negatives included.
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Three-digit compass heading for a scene rotation angle.
///
/// The scene rotation is the negated yaw, so the label reads back the yaw:
/// a rotation of 0 shows "000°", a rotation of 359 (or -1) shows "001°".
pub fn heading_label(rotation_deg: f64) -> String {
    let r = round_half_up(rotation_deg + 360.0).rem_euclid(360);
    format!("{:03}{}", (360 - r) % 360, DEGREE)
}

/// Three-digit magnetic course label, in the range "001°" to "360°".
///
/// Integer remainder truncates towards zero, so bearings below -359 go
/// through "000°" and negative values.
pub fn bearing_label(magnetic_bearing_deg: f64) -> String {
    format!(
        "{:03}{}",
        round_half_up(magnetic_bearing_deg + 359.0) % 360 + 1,
        DEGREE
    )
}

/// `HH:MM:SS` time of day, UTC, for a fix timestamp.
pub fn gps_time_label(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(t) => t.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}
