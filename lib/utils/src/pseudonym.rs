use rand::Rng;

const ADJECTIVES: [&str; 14] = [
    "dreamy", "analog", "vintage", "classic", "timeless", "retro", "nostalgic",
    "creative", "mystic", "gentle", "quiet", "cosmic", "mindful", "peaceful",
];

const NOUNS: [&str; 12] = [
    "typewriter", "camera", "journal", "polaroid", "vinyl", "letter",
    "postcard", "darkroom", "notebook", "telescope", "compass", "manuscript",
];

/// Generates a display handle of the form `adjective_noun_123` for actors
/// who post without an account-linked name.
pub fn generate_pseudonym() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    let number = rng.random_range(1..=999);

    format!("{adjective}_{noun}_{number}")
}

#[cfg(test)]
mod tests {
    use crate::pseudonym::{generate_pseudonym, ADJECTIVES, NOUNS};

    #[test]
    fn test_generate_pseudonym_shape() {
        for _ in 0..100 {
            let pseudonym = generate_pseudonym();
            let parts: Vec<&str> = pseudonym.split('_').collect();
            assert_eq!(parts.len(), 3);
            assert!(ADJECTIVES.contains(&parts[0]));
            assert!(NOUNS.contains(&parts[1]));
            let number: u32 = parts[2].parse().expect("Pseudonym should end with a number");
            assert!((1..=999).contains(&number));
        }
    }
}
