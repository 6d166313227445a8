// Remote-to-local conversion for YAPI interfaces
//
// Pure functions: no I/O, never fail. Malformed input degrades to empty
// fields on the produced endpoint.
//
// Rules:
// - "required" is true only for the exact string "1"
// - a request parameter is a path parameter when the URL template contains
//   ":name" or "{name}", otherwise a query parameter
// - remote body schemas are flat; nesting only comes from inference
// - duplicate header names: last one wins

use std::collections::BTreeMap;

use super::inference::infer_response;
use crate::models::{ApiBody, ApiParam, BodyKind, Endpoint, FieldType, Method, ParameterLocation};
use crate::remote::models::{RemoteBody, RemoteHeader, RemoteInterface, RemoteParam};

/// YAPI encodes booleans as "0"/"1" strings. Only "1" means required.
pub fn is_required_flag(flag: &str) -> bool {
    flag == "1"
}

/// Path if `name` appears as a `:name` or `{name}` placeholder in `path`.
pub fn classify_location(name: &str, path: &str) -> ParameterLocation {
    if path.contains(&format!(":{}", name)) || path.contains(&format!("{{{}}}", name)) {
        ParameterLocation::Path
    } else {
        ParameterLocation::Query
    }
}

pub fn convert_param(param: &RemoteParam, location: ParameterLocation) -> ApiParam {
    ApiParam {
        name: param.name.clone(),
        field_type: FieldType::from_remote(&param.param_type),
        location,
        required: is_required_flag(&param.required),
        description: param.desc.clone(),
        default_value: None,
        children: Vec::new(),
    }
}

pub fn convert_schema_list(schema: &[RemoteParam]) -> Vec<ApiParam> {
    schema
        .iter()
        .map(|p| convert_param(p, ParameterLocation::Body))
        .collect()
}

pub fn convert_headers(headers: &[RemoteHeader]) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for h in headers {
        map.insert(h.name.clone(), h.value.clone());
    }
    map
}

/// Structured request body, only when the descriptor has both a type and fields.
pub fn convert_request_body(body: &RemoteBody) -> Option<ApiBody> {
    if body.body_type.is_empty() || body.schema.is_empty() {
        return None;
    }
    Some(ApiBody {
        kind: BodyKind::from_remote(&body.body_type),
        data_type: "object".to_string(),
        schema: convert_schema_list(&body.schema),
        example: None,
        json_schema: String::new(),
    })
}

/// Build an unsaved endpoint from a remote interface. The collection id is
/// left for the caller to fill in.
pub fn convert_interface(remote: &RemoteInterface) -> Endpoint {
    let mut endpoint = Endpoint::new(
        remote.title.clone(),
        Method::from(remote.method.as_str()),
        remote.path.clone(),
    );
    endpoint.description = remote.desc.clone();

    endpoint.request_params = remote
        .req_params
        .iter()
        .map(|p| convert_param(p, classify_location(&p.name, &remote.path)))
        .collect();

    endpoint.headers = convert_headers(&remote.req_headers);
    endpoint.request_body = convert_request_body(&remote.req_body_other);

    if !remote.res_body.is_empty() {
        if let Some((params, body)) = infer_response(&remote.res_body) {
            endpoint.response_params = params;
            endpoint.response_body = Some(body);
        }
    }

    endpoint
}
