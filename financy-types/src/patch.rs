//! Tri-state field for partial updates.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field of a partial update.
///
/// JSON `{}` gives `Absent` (with `#[serde(default)]` on the field),
/// `{"field": null}` gives `Null`, and `{"field": v}` gives `Value(v)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Key not present: leave the stored value unchanged.
    #[default]
    Absent,
    /// Key present with `null`: clear the stored value.
    Null,
    /// Key present with a value: replace the stored value.
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Returns `None` when absent, `Some(None)` when null.
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }

    /// Applies the patch to a stored optional value.
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *target = None,
            Patch::Value(v) => *target = Some(v),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Value(v) => serializer.serialize_some(v),
            Patch::Absent | Patch::Null => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    struct Input {
        #[serde(default, skip_serializing_if = "Patch::is_absent")]
        notes: Patch<String>,
    }

    #[test]
    fn test_missing_key_is_absent() {
        let input: Input = serde_json::from_str("{}").unwrap();
        assert_eq!(input.notes, Patch::Absent);
    }

    #[test]
    fn test_null_is_distinct_from_absent() {
        let input: Input = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(input.notes, Patch::Null);
    }

    #[test]
    fn test_value() {
        let input: Input = serde_json::from_str(r#"{"notes": "hi"}"#).unwrap();
        assert_eq!(input.notes, Patch::Value("hi".to_string()));
    }

    #[test]
    fn test_absent_is_skipped_on_serialize() {
        let json = serde_json::to_string(&Input {
            notes: Patch::Absent,
        })
        .unwrap();
        assert_eq!(json, "{}");

        let json = serde_json::to_string(&Input { notes: Patch::Null }).unwrap();
        assert_eq!(json, r#"{"notes":null}"#);
    }

    #[test]
    fn test_apply_to() {
        let mut stored = Some("old".to_string());
        Patch::Absent.apply_to(&mut stored);
        assert_eq!(stored.as_deref(), Some("old"));
        Patch::Null.apply_to(&mut stored);
        assert_eq!(stored, None);
        Patch::Value("new".to_string()).apply_to(&mut stored);
        assert_eq!(stored.as_deref(), Some("new"));
    }
}
