//! Random alias generation.

use rand::{distributions::Alphanumeric, Rng};

/// Generate a uniformly random alphanumeric alias of exactly `length`
/// characters.
pub fn generate(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
