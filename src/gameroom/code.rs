use rand::Rng;

/// Characters a room code may contain.
const GLYPHS: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Room codes are short enough to read out loud.
const LEN: usize = 6;

/// Short human-typeable room identifier.
/// Uniqueness among live rooms is the Lobby's job, not this type's.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct Code([u8; LEN]);

impl Code {
    pub fn random() -> Self {
        let mut rng = rand::rng();
        Self(std::array::from_fn(|_| {
            GLYPHS[rng.random_range(0..GLYPHS.len())]
        }))
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).expect("codes are ASCII")
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalizes whitespace and case so codes can be typed sloppily.
impl TryFrom<&str> for Code {
    type Error = &'static str;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim().to_uppercase();
        let bytes = s.as_bytes();
        if bytes.len() != LEN {
            return Err("room codes are 6 characters");
        }
        if !bytes.iter().all(|b| GLYPHS.contains(b)) {
            return Err("room codes use A-Z and 0-9 only");
        }
        Ok(Self(std::array::from_fn(|i| bytes[i])))
    }
}

impl serde::Serialize for Code {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let code = Code::try_from("  ab12cd \n").unwrap();
        assert_eq!(code.as_str(), "AB12CD");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Code::try_from("ABC").is_err());
        assert!(Code::try_from("ABCDEFG").is_err());
    }

    #[test]
    fn rejects_foreign_characters() {
        assert!(Code::try_from("AB-12!").is_err());
    }

    #[test]
    fn random_codes_are_well_formed() {
        for _ in 0..100 {
            let code = Code::random();
            assert_eq!(Code::try_from(code.as_str()), Ok(code));
        }
    }
}
