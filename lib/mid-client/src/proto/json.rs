use serde::Serialize;

/// Renders `value` as JSON for log output.
///
/// Never fails: a serialization error is folded into the returned text.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(error) => format!(
            "Failed to serialize object of type [{}] to JSON. Cause: [{error}]",
            std::any::type_name::<T>()
        ),
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use serde::ser::Error;
    use serde::{Serialize, Serializer};

    use super::to_json;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not today"))
        }
    }

    #[test]
    fn test_to_json_renders_value() {
        let value = HashMap::from([("msisdn", "+41000000000")]);
        assert_eq!(to_json(&value), r#"{"msisdn":"+41000000000"}"#);
    }

    #[test]
    fn test_to_json_none_renders_null() {
        assert_eq!(to_json(&Option::<String>::None), "null");
    }

    #[test]
    fn test_to_json_failure_is_reported_in_text() {
        let rendered = to_json(&Unserializable);
        assert!(rendered.starts_with("Failed to serialize object of type"));
        assert!(rendered.contains("not today"));
    }
}
