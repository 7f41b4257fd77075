use std::time;

/// The current time, formatted for humans (RFC 3339).
pub fn time_str() -> String {
    humantime::format_rfc3339_seconds(time::SystemTime::now()).to_string()
}

/// The current UNIX timestamp, in seconds.
pub fn time() -> u64 {
    match time::SystemTime::now().duration_since(time::UNIX_EPOCH) {
        Ok(unix_time) => unix_time.as_secs(),
        Err(_) => {
            log::error!("Computer clock set before 01/01/1970?");
            0
        }
    }
}
