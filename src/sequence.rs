use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which recall test is being administered
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// digits only, recalled in presentation order
    #[default]
    #[strum(to_string = "Digit Span")]
    DigitOnly,
    /// mixed letters and digits, recalled digits first then letters, each ascending
    #[strum(to_string = "Letter-Number")]
    LetterNumber,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::DigitOnly => Mode::LetterNumber,
            Mode::LetterNumber => Mode::DigitOnly,
        }
    }

    /// Inverse of `Display`, for reading back an event log
    pub fn from_label(label: &str) -> Option<Self> {
        [Mode::DigitOnly, Mode::LetterNumber]
            .into_iter()
            .find(|mode| mode.to_string() == label)
    }

    /// Caption of the mode button: names the mode a press switches to
    pub fn switch_label(self) -> &'static str {
        match self {
            Mode::DigitOnly => "Switch to Letter-Number",
            Mode::LetterNumber => "Switch to Digit Span",
        }
    }
}

/// Generate a fresh sequence of `length` characters for `mode`.
///
/// Every position is drawn independently. In letter-number mode a fair coin
/// picks between an uppercase letter and a digit, so repeats are allowed.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, length: usize, mode: Mode) -> Vec<char> {
    (0..length)
        .map(|_| match mode {
            Mode::LetterNumber if rng.gen_bool(0.5) => random_letter(rng),
            _ => random_digit(rng),
        })
        .collect()
}

fn random_digit<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'0' + rng.gen_range(0..10u8))
}

fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'A' + rng.gen_range(0..26u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_generated_length_matches_stage() {
        let mut rng = StdRng::seed_from_u64(7);
        for stage in 3..20 {
            assert_eq!(generate(&mut rng, stage, Mode::DigitOnly).len(), stage);
            assert_eq!(generate(&mut rng, stage, Mode::LetterNumber).len(), stage);
        }
    }

    #[test]
    fn test_digit_only_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let seq = generate(&mut rng, 9, Mode::DigitOnly);
            assert!(seq.iter().all(|c| c.is_ascii_digit()), "{seq:?}");
        }
    }

    #[test]
    fn test_letter_number_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let seq = generate(&mut rng, 9, Mode::LetterNumber);
            assert!(
                seq.iter()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
                "{seq:?}"
            );
        }
    }

    #[test]
    fn test_letter_number_produces_both_classes() {
        let mut rng = StdRng::seed_from_u64(3);
        let seq = generate(&mut rng, 400, Mode::LetterNumber);
        assert!(seq.iter().any(|c| c.is_ascii_digit()));
        assert!(seq.iter().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_digits_cover_full_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let seq = generate(&mut rng, 1000, Mode::DigitOnly);
        for d in '0'..='9' {
            assert!(seq.contains(&d), "digit {d} never generated");
        }
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::DigitOnly.to_string(), "Digit Span");
        assert_eq!(Mode::LetterNumber.to_string(), "Letter-Number");
        for mode in [Mode::DigitOnly, Mode::LetterNumber] {
            assert_eq!(Mode::from_label(&mode.to_string()), Some(mode));
        }
        assert_eq!(Mode::from_label("digit span"), None);
    }

    #[test]
    fn test_mode_toggle_and_switch_label() {
        assert_eq!(Mode::DigitOnly.toggled(), Mode::LetterNumber);
        assert_eq!(Mode::LetterNumber.toggled(), Mode::DigitOnly);
        assert_eq!(Mode::DigitOnly.switch_label(), "Switch to Letter-Number");
        assert_eq!(Mode::LetterNumber.switch_label(), "Switch to Digit Span");
    }
}
