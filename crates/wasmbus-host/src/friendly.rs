//! Deterministic friendly host names.
//!
//! A host gets a two-word name derived from its public key, so the same
//! key always logs under the same name across restarts. The value has
//! no semantic weight beyond readability.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const ADJECTIVES: &[&str] = &[
    "amber", "ancient", "autumn", "bold", "brisk", "calm", "cosmic", "crimson", "dawn", "dusty",
    "eager", "emerald", "fabled", "frosty", "gentle", "golden", "hidden", "icy", "jolly", "late",
    "lunar", "misty", "noble", "northern", "pale", "quiet", "rapid", "restless", "silent",
    "solar", "wandering", "winter",
];

const NOUNS: &[&str] = &[
    "badger", "breeze", "brook", "cloud", "comet", "cove", "dawn", "dune", "ember", "falcon",
    "fern", "fjord", "gale", "glade", "harbor", "heron", "lake", "meadow", "moon", "otter",
    "peak", "pine", "raven", "reef", "ridge", "river", "sparrow", "summit", "thicket", "tide",
    "valley", "wolf",
];

/// Returns the two-word name for a host key, e.g. `wandering-valley`.
#[must_use]
pub fn friendly_name(host_key: &str) -> String {
    let mut hasher = DefaultHasher::new();
    host_key.hash(&mut hasher);
    let seed = hasher.finish();

    let adjective = ADJECTIVES[(seed % ADJECTIVES.len() as u64) as usize];
    let noun = NOUNS[((seed / ADJECTIVES.len() as u64) % NOUNS.len() as u64) as usize];
    format!("{adjective}-{noun}")
}
