/// Normalize a user-typed phone number for Twilio.
///
/// Strips everything but digits, assumes a North American number when exactly
/// ten digits remain (prepends country code `1`), then prepends `+`.
/// Returns `None` when no digits are left.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        0 => None,
        10 => Some(format!("+1{digits}")),
        _ => Some(format!("+{digits}")),
    }
}
