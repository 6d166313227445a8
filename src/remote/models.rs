// Wire types for the YAPI open API
// Fields are kept as loosely typed as YAPI sends them; conversion happens in crate::convert

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Every YAPI response is wrapped in `{errcode, errmsg, data}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub errcode: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub errmsg: String,
    pub data: Option<T>,
}

/// `data` of `interface/list_cat` and `interface/get_list`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfacePage {
    #[serde(default, deserialize_with = "nullable")]
    pub list: Vec<RemoteInterface>,
    #[serde(default, deserialize_with = "nullable")]
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteProject {
    #[serde(default, rename = "_id", deserialize_with = "nullable")]
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, rename = "basepath", deserialize_with = "nullable")]
    pub base_path: String,
    #[serde(default, deserialize_with = "nullable")]
    pub desc: String,
    #[serde(default, deserialize_with = "nullable")]
    pub uid: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub icon: String,
    #[serde(default, deserialize_with = "nullable")]
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteCategory {
    #[serde(default, rename = "_id", deserialize_with = "nullable")]
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub desc: String,
    #[serde(default, deserialize_with = "nullable")]
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteInterface {
    #[serde(default, rename = "_id", deserialize_with = "nullable")]
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: i64,
    #[serde(default, rename = "catid", deserialize_with = "nullable")]
    pub category_id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub path: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub method: String,
    /// "undone" or "done"
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub req_params: Vec<RemoteParam>,
    #[serde(default, deserialize_with = "nullable")]
    pub req_headers: Vec<RemoteHeader>,
    #[serde(default, deserialize_with = "nullable")]
    pub req_body_type: String,
    #[serde(default, deserialize_with = "lenient_body")]
    pub req_body_other: RemoteBody,
    #[serde(default, deserialize_with = "nullable")]
    pub res_body: String,
    #[serde(default, deserialize_with = "nullable")]
    pub desc: String,
    #[serde(default, deserialize_with = "nullable")]
    pub up_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteParam {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub desc: String,
    /// "1" marks a required parameter, everything else is optional
    #[serde(default, deserialize_with = "nullable")]
    pub required: String,
    #[serde(default, rename = "type", deserialize_with = "nullable")]
    pub param_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteHeader {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub value: String,
    #[serde(default, deserialize_with = "nullable")]
    pub desc: String,
    #[serde(default, deserialize_with = "nullable")]
    pub required: String,
}

/// Structured request body descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteBody {
    /// json, form, text...
    #[serde(default, rename = "type", deserialize_with = "nullable")]
    pub body_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub schema: Vec<RemoteParam>,
}

// YAPI sends null for blank fields as often as it omits them.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Servers also send a JSON-schema string or null in this slot; those carry
// no structured descriptor.
fn lenient_body<'de, D>(deserializer: D) -> Result<RemoteBody, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(RemoteBody::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_descriptor_accepts_object_string_and_null() {
        let obj: RemoteInterface = serde_json::from_value(json!({
            "_id": 1, "catid": 2,
            "req_body_other": {"type": "json", "schema": [{"name": "a", "required": "1"}]}
        }))
        .unwrap();
        assert_eq!(obj.req_body_other.body_type, "json");
        assert_eq!(obj.req_body_other.schema.len(), 1);

        let text: RemoteInterface = serde_json::from_value(json!({
            "_id": 1, "catid": 2, "req_body_other": "{\"type\":\"object\"}"
        }))
        .unwrap();
        assert_eq!(text.req_body_other, RemoteBody::default());

        let null: RemoteInterface = serde_json::from_value(json!({
            "_id": 1, "catid": 2, "req_body_other": null
        }))
        .unwrap();
        assert_eq!(null.req_body_other, RemoteBody::default());
    }

    #[test]
    fn envelope_without_data_decodes() {
        let env: Envelope<Vec<RemoteCategory>> =
            serde_json::from_str(r#"{"errcode": 40011, "errmsg": "token invalid"}"#).unwrap();
        assert_eq!(env.errcode, 40011);
        assert!(env.data.is_none());
    }

    #[test]
    fn null_and_missing_fields_decode_to_defaults() {
        let iface: RemoteInterface = serde_json::from_value(json!({
            "_id": 7, "title": "List users", "desc": null, "path": null,
            "req_params": null, "req_headers": [{"name": "X-Env", "value": null}]
        }))
        .unwrap();
        assert_eq!(iface.id, 7);
        assert_eq!(iface.category_id, 0, "missing catid");
        assert_eq!(iface.desc, "");
        assert_eq!(iface.path, "");
        assert!(iface.req_params.is_empty());
        assert_eq!(iface.req_headers[0].value, "");

        let cat: RemoteCategory = serde_json::from_value(json!({"_id": 1, "name": null, "desc": null})).unwrap();
        assert_eq!(cat.name, "");
    }
}
