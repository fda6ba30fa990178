//! Purpose: Three-state value for partial-update fields.
//! Exports: `Patch`.
//! Role: Distinguishes "leave unchanged" from "clear" from "set" in patch payloads and commands.
//! Invariants: A missing JSON field decodes to `Unset` (requires `#[serde(default)]` on the field).
//! Invariants: JSON `null` decodes to `Cleared`; any other value decodes to `Set`.
//! Notes: Pair with `skip_serializing_if = "Patch::is_unset"` so `Unset` fields stay absent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Patch<T> {
    Unset,
    Cleared,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> Patch<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Patch::Unset)
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    /// The supplied value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unset | Patch::Cleared => None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(value) => Patch::Set(value),
            None => Patch::Cleared,
        })
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Set(value) => serializer.serialize_some(value),
            Patch::Unset | Patch::Cleared => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Patch;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct Doc {
        #[serde(default, skip_serializing_if = "Patch::is_unset")]
        stack: Patch<String>,
    }

    #[test]
    fn missing_null_and_value_decode_to_distinct_states() {
        let missing: Doc = serde_json::from_str("{}").expect("decode");
        let null: Doc = serde_json::from_str(r#"{"stack":null}"#).expect("decode");
        let set: Doc = serde_json::from_str(r#"{"stack":"cflinuxfs4"}"#).expect("decode");

        assert_eq!(missing.stack, Patch::Unset);
        assert_eq!(null.stack, Patch::Cleared);
        assert_eq!(set.stack, Patch::Set("cflinuxfs4".to_string()));
    }

    #[test]
    fn unset_fields_are_omitted_and_cleared_fields_serialize_as_null() {
        let unset = serde_json::to_string(&Doc::default()).expect("encode");
        let cleared = serde_json::to_string(&Doc {
            stack: Patch::Cleared,
        })
        .expect("encode");

        assert_eq!(unset, "{}");
        assert_eq!(cleared, r#"{"stack":null}"#);
    }

    #[test]
    fn value_is_only_present_when_set() {
        assert_eq!(Patch::<u8>::Unset.value(), None);
        assert_eq!(Patch::<u8>::Cleared.value(), None);
        assert_eq!(Patch::Set(1).value(), Some(&1));
        assert!(Patch::Set(1).is_set());
        assert!(!Patch::<u8>::Cleared.is_set());
    }
}
