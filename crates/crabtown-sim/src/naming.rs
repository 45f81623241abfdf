//! Name and handle generation from small fixed vocabularies.
//!
//! Two generators: crab display names ("Grumpy Pinchy") for the roaming
//! agents, and the session author handle ("WaveCrab42") generated once at
//! session start and used for every submission in that session. All pool
//! selection goes through the injected [`Rng`].

use rand::Rng;

/// Adjectives for crab display names.
const NAME_ADJECTIVES: [&str; 10] = [
    "Grumpy", "Happy", "Sleepy", "Speedy", "Lazy", "Curious", "Shy", "Bold", "Tiny", "Big",
];

/// Proper names for crab display names.
const CRAB_NAMES: [&str; 15] = [
    "Pinchy", "Snippy", "Clawdia", "Sheldon", "Sandy", "Coral", "Bubbles", "Neptune", "Tide",
    "Kelp", "Marina", "Barnacle", "Reef", "Scuttle", "Waddle",
];

/// Vocabulary for session handles.
const HANDLE_WORDS: [&str; 10] = [
    "Crab", "Shell", "Wave", "Sand", "Tide", "Reef", "Coral", "Pearl", "Ocean", "Beach",
];

/// Shell color palette (hex strings handed through to the renderer).
const SHELL_COLORS: [&str; 6] = [
    "#e17055", "#d63031", "#e84393", "#fd79a8", "#fab1a0", "#ff7675",
];

/// Pick one entry from a non-empty pool.
fn pick<'a>(pool: &'a [&'a str], rng: &mut impl Rng) -> &'a str {
    let idx = rng.random_range(0..pool.len());
    pool.get(idx).copied().unwrap_or("Crab")
}

/// Generate a crab display name: adjective + proper name.
pub fn generate_crab_name(rng: &mut impl Rng) -> String {
    let adjective = pick(&NAME_ADJECTIVES, rng);
    let name = pick(&CRAB_NAMES, rng);
    format!("{adjective} {name}")
}

/// Generate a session handle: two vocabulary words plus a numeric suffix,
/// e.g. "WaveCrab42". Handles are human-readable, not guaranteed unique;
/// one session only ever generates one.
pub fn generate_handle(rng: &mut impl Rng) -> String {
    let first = pick(&HANDLE_WORDS, rng);
    let second = pick(&HANDLE_WORDS, rng);
    let suffix: u16 = rng.random_range(0..999);
    format!("{first}{second}{suffix}")
}

/// Pick a shell color from the palette.
pub fn pick_shell_color(rng: &mut impl Rng) -> &'static str {
    pick(&SHELL_COLORS, rng)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn crab_name_is_adjective_plus_name() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            let name = generate_crab_name(&mut rng);
            let mut parts = name.split(' ');
            let adjective = parts.next().unwrap();
            let proper = parts.next().unwrap();
            assert!(parts.next().is_none());
            assert!(NAME_ADJECTIVES.contains(&adjective));
            assert!(CRAB_NAMES.contains(&proper));
        }
    }

    #[test]
    fn handle_is_two_words_and_a_suffix() {
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..100 {
            let handle = generate_handle(&mut rng);
            let digits: String = handle.chars().filter(char::is_ascii_digit).collect();
            let suffix: u16 = digits.parse().unwrap();
            assert!(suffix < 999);
            let words: String = handle.chars().filter(|c| c.is_ascii_alphabetic()).collect();
            // The alphabetic part must decompose into two vocabulary words.
            assert!(HANDLE_WORDS
                .iter()
                .any(|w| words.starts_with(w) && HANDLE_WORDS.contains(&&words[w.len()..])));
        }
    }

    #[test]
    fn seeded_rng_gives_deterministic_names() {
        let mut a = SmallRng::seed_from_u64(42);
        let mut b = SmallRng::seed_from_u64(42);
        assert_eq!(generate_handle(&mut a), generate_handle(&mut b));
        assert_eq!(generate_crab_name(&mut a), generate_crab_name(&mut b));
    }

    #[test]
    fn shell_color_comes_from_the_palette() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(SHELL_COLORS.contains(&pick_shell_color(&mut rng)));
        }
    }
}
