//! Worker name generation

use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: [&str; 6] = ["amazing", "brilliant", "clever", "dynamic", "elegant", "fantastic"];
const NOUNS: [&str; 6] = ["blog", "site", "portal", "hub", "space", "platform"];

/// `<prefix>-<adjective>-<noun>-<100..=999>`
pub fn generate_worker_name<R: Rng>(prefix: &str, rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("amazing");
    let noun = NOUNS.choose(rng).copied().unwrap_or("blog");
    let number: u32 = rng.gen_range(100..=999);
    format!("{}-{}-{}-{}", prefix, adjective, noun, number)
}

/// Picks the worker name for a deploy.
///
/// With `auto` set the name is always generated. Otherwise a non-empty
/// `custom` name wins, else `<prefix>-<1000..=9999>`.
pub fn resolve_worker_name<R: Rng>(
    prefix: &str,
    auto: bool,
    custom: Option<&str>,
    rng: &mut R,
) -> String {
    if auto {
        return generate_worker_name(prefix, rng);
    }

    match custom.map(str::trim).filter(|c| !c.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("{}-{}", prefix, rng.gen_range(1000..=9999)),
    }
}
