/// (De)serializes an `Arc<str>` as a plain string, borrowing from the input
/// when the deserializer allows it.
pub mod serde_arc_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::borrow::Cow;
    use std::sync::Arc;

    pub fn serialize<S: Serializer>(value: &Arc<str>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<str>, D::Error> {
        let raw: Cow<'de, str> = Deserialize::deserialize(deserializer)?;
        Ok(Arc::from(raw.as_ref()))
    }
}
