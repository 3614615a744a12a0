use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps customer contact details so they never reach log output in full.
///
/// `Debug` and `Display` show a redacted form (last four digits of a phone
/// number, first letter and domain of an email). Serialization is unchanged,
/// API responses still carry the real value.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> Masked<T> {
    pub fn redacted(&self) -> String {
        redact(self.0.as_ref())
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Masked({})", self.redacted())
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

fn redact(value: &str) -> String {
    if let Some((local, domain)) = value.split_once('@') {
        let first = local.chars().next().map(String::from).unwrap_or_default();
        return format!("{}***@{}", first, domain);
    }

    let digits: Vec<char> = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("***{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_is_redacted() {
        let phone = Masked("(555) 123-4567".to_string());
        assert_eq!(phone.to_string(), "***4567");
        assert_eq!(format!("{:?}", phone), "Masked(***4567)");
    }

    #[test]
    fn test_email_keeps_domain() {
        let email = Masked("sarah@example.com");
        assert_eq!(email.to_string(), "s***@example.com");
    }

    #[test]
    fn test_serializes_real_value() {
        let email = Masked("sarah@example.com".to_string());
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"sarah@example.com\"");
    }
}
