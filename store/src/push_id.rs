//! Chronologically sortable push ids.
//!
//! The hosted database mints 20-character child keys whose lexicographic
//! order matches insertion order: 8 characters encode the millisecond
//! timestamp, the remaining 12 carry entropy. Two ids minted in the same
//! millisecond stay ordered because the entropy part is incremented rather
//! than re-rolled, exactly like the hosted database's client SDK. Both
//! store implementations mint keys client-side.

use rand::Rng;
use std::sync::Mutex;

/// Key alphabet, ordered by ASCII value so ids sort chronologically.
const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

/// Timestamp and entropy of the previously minted id.
static LAST: Mutex<(i64, [u8; 12])> = Mutex::new((i64::MIN, [0; 12]));

/// Generates a push id for the given millisecond timestamp.
///
/// Negative timestamps (pre-epoch clocks) are clamped to zero.
#[must_use]
pub fn generate(timestamp_millis: i64) -> String {
    let mut id = [0u8; 20];
    let mut ts = u64::try_from(timestamp_millis).unwrap_or(0);

    for slot in id[..8].iter_mut().rev() {
        *slot = PUSH_CHARS[usize::try_from(ts % 64).unwrap_or(0)];
        ts /= 64;
    }

    let mut last = match LAST.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if last.0 == timestamp_millis {
        increment(&mut last.1);
    } else {
        last.0 = timestamp_millis;
        let mut rng = rand::thread_rng();
        for slot in &mut last.1 {
            *slot = rng.gen_range(0u8..64);
        }
    }
    for (slot, index) in id[8..].iter_mut().zip(last.1) {
        *slot = PUSH_CHARS[usize::from(index)];
    }

    String::from_utf8_lossy(&id).into_owned()
}

/// Adds one to the base-64 entropy, carrying leftwards.
fn increment(entropy: &mut [u8; 12]) {
    for digit in entropy.iter_mut().rev() {
        if *digit < 63 {
            *digit += 1;
            return;
        }
        *digit = 0;
    }
}
