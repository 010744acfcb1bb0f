use rand::distributions::Alphanumeric;
use rand::Rng;

/// Record identifier of the form `<prefix>_<unix-millis>_<9 lowercase alphanumerics>`.
pub fn new_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("{prefix}_{}_{suffix}", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_has_prefix_timestamp_and_suffix() {
        let id = new_id("lead");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3, "unexpected id shape: {id}");
        assert_eq!(parts[0], "lead");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn ids_differ() {
        assert_ne!(new_id("msg"), new_id("msg"));
    }
}
