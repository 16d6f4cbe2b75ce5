//! User-facing reply texts.

use odolog_core::{Difference, OdometerEvent};

pub fn usage_hint(prefix: &str) -> String {
    format!(
        "❌ Please provide the odometer reading.\n**Usage:** `{prefix} 149684` (with optional photo attachment)"
    )
}

/// Summary posted after a successful append. The distance line is omitted when unavailable.
pub fn success_summary(event: &OdometerEvent, difference: Difference) -> String {
    let mut text = String::from("📊 **Odometer data recorded!**\n");
    text.push_str(&format!("📅 Date: {}\n", event.date));
    text.push_str(&format!("🕒 Time: {}\n", event.time));
    text.push_str(&format!(
        "📍 Location: {}\n",
        event.location.as_deref().unwrap_or("Not provided")
    ));
    text.push_str(&format!("🚗 Odometer: {} km\n", event.odometer_reading));
    if let Difference::Km(km) = difference {
        text.push_str(&format!("📏 Distance from last reading: {km} km\n"));
    }
    text
}

pub fn failure_message(error: &str) -> String {
    format!("❌ Error recording odometer data. Please try again.\nError: {error}")
}
