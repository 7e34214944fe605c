use crate::shared::error::AppError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// プッシュチャネルのペイロードを DTO の配列に正規化する。
///
/// 受け付ける形: DTO の配列、`{"data": [...]}` 形式のエンベロープ、`null`（空のスナップショット）。
pub fn decode_snapshot<D: DeserializeOwned>(payload: Value) -> Result<Vec<D>, AppError> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(payload)?),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Null) => Ok(Vec::new()),
            Some(data @ Value::Array(_)) => Ok(serde_json::from_value(data)?),
            _ => Err(AppError::DeserializationError(
                "Snapshot object must carry a `data` array".to_string(),
            )),
        },
        other => Err(AppError::DeserializationError(format!(
            "Unsupported snapshot payload: {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[test]
    fn accepts_array_envelope_and_null() {
        let direct: Vec<Item> = decode_snapshot(json!([{ "id": "a" }])).unwrap();
        assert_eq!(direct, vec![Item { id: "a".into() }]);

        let wrapped: Vec<Item> =
            decode_snapshot(json!({ "data": [{ "id": "a" }, { "id": "b" }] })).unwrap();
        assert_eq!(wrapped.len(), 2);

        let empty: Vec<Item> = decode_snapshot(Value::Null).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn rejects_scalars_and_bare_objects() {
        assert!(decode_snapshot::<Item>(json!("oops")).is_err());
        assert!(decode_snapshot::<Item>(json!({ "id": "a" })).is_err());
    }

    #[test]
    fn shape_mismatch_is_a_deserialization_error() {
        let err = decode_snapshot::<Item>(json!([{ "name": "no id" }])).unwrap_err();
        assert!(matches!(err, AppError::DeserializationError(_)));
    }
}
