use rand::Rng;

const CARRIER_PREFIX: &str = "MK";
const COUNTRY_CODE: &str = "US";

/// Upper bound (exclusive) of the numeric segment; serials are drawn
/// uniformly from `0..SERIAL_BOUND` and zero-padded to eight digits.
const SERIAL_BOUND: u32 = 100_000_000;

/// Produce a human-readable tracking number: carrier prefix, eight-digit
/// serial, country suffix (e.g. `MK04711234US`).
///
/// The generator does not guarantee uniqueness; the unique constraint on
/// `packages.tracking_no` does, and callers retry generation when an
/// insert trips it.
pub fn generate_tracking_no() -> String {
    let serial = rand::thread_rng().gen_range(0..SERIAL_BOUND);
    format!("{CARRIER_PREFIX}{serial:08}{COUNTRY_CODE}")
}
