use chrono::Utc;
use rand::Rng;

pub const BOOKING_ID_PREFIX: &str = "PT";
pub const DOCTOR_ID_PREFIX: &str = "DR";

/// `<prefix>-<unix millis>-<random 0..10000>`
pub fn generate_id(prefix: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), suffix)
}
