use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Number of trailing characters left visible when a value is masked.
const VISIBLE_TAIL: usize = 2;

/// A wrapper for passenger identifiers (passport numbers, phone numbers) that
/// masks its value in `Debug` and `Display` output.
///
/// Serialization writes the real value; the wrapper only guards against
/// leaking it through log macros such as `tracing::info!("{:?}", passenger)`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> Masked<T> {
    /// The masked rendering, keeping only the last two characters.
    pub fn redacted(&self) -> String {
        let value = self.0.as_ref();
        let len = value.chars().count();
        if len <= VISIBLE_TAIL {
            return "*".repeat(len);
        }
        let tail: String = value.chars().skip(len - VISIBLE_TAIL).collect();
        format!("{}{}", "*".repeat(len - VISIBLE_TAIL), tail)
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
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
    /// Access the unmasked value. Callers are responsible for not logging it.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}
