//! Fake value generation for registered factories.
//!
//! A [`Faker`] is handed to every factory invocation so field values can be
//! synthesized without the factory owning any randomness itself. Generated
//! values are plain data; nothing validates or coerces them downstream.
//!
//! ## Example
//!
//! ```
//! use fixturedb::Faker;
//!
//! let faker = Faker::seeded(7);
//! let name = faker.first_name();
//! assert!(!name.is_empty());
//! assert_eq!(name, Faker::seeded(7).first_name());
//! ```

use std::ops::Range;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Carmen", "Dmitri", "Elena", "Farid", "Greta", "Hector",
    "Ingrid", "Jonas", "Katya", "Lionel", "Marisol", "Nadia", "Oskar", "Priya",
    "Quentin", "Rosa", "Stefan", "Tamara",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Brandt", "Castillo", "Dvorak", "Eriksen", "Fontaine", "Gallo",
    "Hoffmann", "Ivanova", "Jensen", "Kowalski", "Lindqvist", "Moreau",
    "Nakamura", "Oliveira", "Petrov", "Quispe", "Rossi", "Sato", "Takahashi",
];

const STREET_NAMES: &[&str] = &[
    "Maple", "Cedar", "Willow", "Juniper", "Alder", "Birch", "Chestnut",
    "Hawthorn", "Linden", "Sycamore",
];

const STREET_SUFFIXES: &[&str] = &["Street", "Avenue", "Lane", "Road", "Boulevard"];

const CITIES: &[&str] = &[
    "Springdale", "Riverton", "Lakewood", "Fairview", "Ashford", "Brookhaven",
    "Clearwater", "Mill Valley", "Oakhurst", "Port Ellen",
];

const WORDS: &[&str] = &[
    "amber", "basalt", "cinder", "drift", "ember", "fjord", "gale", "harbor",
    "isle", "jade", "krill", "lagoon", "meadow", "nimbus", "orchid", "pebble",
    "quartz", "reef", "sierra", "tundra", "umber", "vale", "willow", "zephyr",
];

/// The value generator passed to factories.
///
/// Entropy-seeded by default; use [`Faker::seeded`] for reproducible suites.
/// All generators take `&self` so a single faker can be shared by every
/// factory invocation of a database instance.
pub struct Faker {
    rng: Mutex<StdRng>,
}

impl Faker {
    /// Create a faker seeded from OS entropy.
    pub fn new() -> Self {
        Faker {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a faker with a fixed seed. Identical seeds produce identical
    /// value sequences.
    pub fn seeded(seed: u64) -> Self {
        Faker {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock still holds a usable RNG state; recover it.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }

    fn pick(&self, pool: &[&str]) -> String {
        let index = self.with_rng(|rng| rng.gen_range(0..pool.len()));
        pool[index].to_string()
    }

    /// A given name, e.g. `"Elena"`.
    pub fn first_name(&self) -> String {
        self.pick(FIRST_NAMES)
    }

    /// A family name, e.g. `"Moreau"`.
    pub fn last_name(&self) -> String {
        self.pick(LAST_NAMES)
    }

    /// A lowercase login handle, e.g. `"elena42"`.
    pub fn username(&self) -> String {
        format!("{}{}", self.first_name().to_lowercase(), self.number(1..100))
    }

    /// An email address on a reserved example domain.
    pub fn email(&self) -> String {
        format!("{}@example.com", self.username())
    }

    /// An avatar image URL on a reserved example domain.
    pub fn avatar_url(&self) -> String {
        format!("https://avatars.example.com/{}.png", self.number(1000..10000))
    }

    /// A street name, e.g. `"Maple Street"`.
    pub fn street_name(&self) -> String {
        format!("{} {}", self.pick(STREET_NAMES), self.pick(STREET_SUFFIXES))
    }

    /// A city name, e.g. `"Riverton"`.
    pub fn city(&self) -> String {
        self.pick(CITIES)
    }

    /// A single lowercase word.
    pub fn word(&self) -> String {
        self.pick(WORDS)
    }

    /// A capitalized sentence of 5 to 10 words.
    pub fn sentence(&self) -> String {
        let count = self.with_rng(|rng| rng.gen_range(5..=10));
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(self.word());
        }
        let mut sentence = words.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }

    /// A paragraph of 3 to 5 sentences.
    pub fn paragraph(&self) -> String {
        let count = self.with_rng(|rng| rng.gen_range(3..=5));
        let sentences: Vec<String> = (0..count).map(|_| self.sentence()).collect();
        sentences.join(" ")
    }

    /// A uniformly distributed integer in `range`.
    pub fn number(&self, range: Range<u64>) -> u64 {
        self.with_rng(|rng| rng.gen_range(range))
    }

    /// A fair coin flip.
    pub fn boolean(&self) -> bool {
        self.with_rng(|rng| rng.gen_bool(0.5))
    }
}

impl Default for Faker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_fakers_agree() {
        let a = Faker::seeded(42);
        let b = Faker::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.first_name(), b.first_name());
            assert_eq!(a.paragraph(), b.paragraph());
            assert_eq!(a.number(0..1000), b.number(0..1000));
        }
    }

    #[test]
    fn test_number_stays_in_range() {
        let faker = Faker::new();
        for _ in 0..100 {
            let n = faker.number(10..20);
            assert!((10..20).contains(&n));
        }
    }

    #[test]
    fn test_email_shape() {
        let faker = Faker::new();
        let email = faker.email();
        assert!(email.ends_with("@example.com"));
        assert!(email.len() > "@example.com".len());
    }

    #[test]
    fn test_sentence_is_capitalized_and_terminated() {
        let faker = Faker::seeded(1);
        let sentence = faker.sentence();
        assert!(sentence.chars().next().unwrap().is_ascii_uppercase());
        assert!(sentence.ends_with('.'));
    }
}
