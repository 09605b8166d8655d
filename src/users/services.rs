use rand::Rng;

const ALPHABET: &str = "qazwsxedcrfvYUIOPmnjklQWERT123456786";

const MIN_NAME_LEN: usize = 5;
const MAX_NAME_LEN: usize = 10;

/// Upper bound for ids picked when the caller does not name one.
pub const MAX_RANDOM_ID: i32 = 10;

/// A contiguous 5..=10 character slice of the alphabet.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let start = rng.gen_range(0..=ALPHABET.len() - MAX_NAME_LEN);
    let len = rng.gen_range(MIN_NAME_LEN..=MAX_NAME_LEN);
    ALPHABET[start..start + len].to_string()
}

pub fn email_for(name: &str) -> String {
    format!("{name}@example.com")
}

/// A `(name, email)` pair ready to insert.
pub fn random_user<R: Rng + ?Sized>(rng: &mut R) -> (String, String) {
    let name = random_name(rng);
    let email = email_for(&name);
    (name, email)
}

pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.gen_range(1..=MAX_RANDOM_ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    lazy_static! {
        static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9]{5,10}$").unwrap();
    }

    #[test]
    fn names_match_pattern_and_come_from_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let name = random_name(&mut rng);
            assert!(NAME_RE.is_match(&name), "bad name {name}");
            assert!(ALPHABET.contains(&name));
        }
    }

    #[test]
    fn email_is_derived_from_name() {
        let mut rng = StdRng::seed_from_u64(7);
        let (name, email) = random_user(&mut rng);
        assert_eq!(email, format!("{name}@example.com"));
    }

    #[test]
    fn ids_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let id = random_id(&mut rng);
            assert!((1..=MAX_RANDOM_ID).contains(&id));
        }
    }
}
