// Documentation output for APIHub projects
// Supports Markdown, HTML, OpenAPI 3.0 and Postman v2.1 export

use chrono::Local;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{ApiParam, Collection, Endpoint, FieldType, ParameterLocation, Project};
use crate::store::ProjectStore;

lazy_static! {
    // ":id" style placeholders, rewritten to "{id}" for OpenAPI
    static ref COLON_PLACEHOLDER: Regex = Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Markdown,
    Html,
    OpenApi,
    Postman,
}

impl DocFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DocFormat::Markdown => "md",
            DocFormat::Html => "html",
            DocFormat::OpenApi => "openapi.json",
            DocFormat::Postman => "postman_collection.json",
        }
    }
}

impl FromStr for DocFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(DocFormat::Markdown),
            "html" => Ok(DocFormat::Html),
            "openapi" | "json" => Ok(DocFormat::OpenApi),
            "postman" => Ok(DocFormat::Postman),
            other => Err(Error::InvalidConfig(format!("unknown documentation format: {}", other))),
        }
    }
}

/// A project with all of its collections and their endpoints.
#[derive(Debug, Clone)]
pub struct ProjectDocument {
    pub project: Project,
    pub sections: Vec<(Collection, Vec<Endpoint>)>,
}

impl ProjectDocument {
    pub async fn load(store: &dyn ProjectStore, project_id: &str) -> Result<Self> {
        let project = store
            .get_project(project_id)
            .await?
            .ok_or_else(|| Error::not_found("project", project_id))?;

        let mut sections = Vec::new();
        for collection in store.get_collections_by_project(project_id).await? {
            let endpoints = store.get_endpoints_by_collection(&collection.id).await?;
            sections.push((collection, endpoints));
        }
        Ok(Self { project, sections })
    }

    fn title(&self) -> &str {
        if self.project.name.is_empty() {
            "API Documentation"
        } else {
            &self.project.name
        }
    }
}

pub fn render(doc: &ProjectDocument, format: DocFormat) -> Result<String> {
    Ok(match format {
        DocFormat::Markdown => render_markdown(doc),
        DocFormat::Html => render_html(doc),
        DocFormat::OpenApi => serde_json::to_string_pretty(&render_openapi(doc))?,
        DocFormat::Postman => serde_json::to_string_pretty(&render_postman(doc))?,
    })
}

/// Write the rendered document to `dir` under a timestamped name.
pub fn export(doc: &ProjectDocument, format: DocFormat, dir: &Path) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("apihub_docs_{}.{}", timestamp, format.extension()));
    fs::write(&path, render(doc, format)?)?;
    Ok(path)
}

fn write_param_table(out: &mut String, title: &str, params: &[ApiParam]) {
    if params.is_empty() {
        return;
    }
    let _ = writeln!(out, "**{}:**\n", title);
    let _ = writeln!(out, "| Name | Type | In | Required | Description |");
    let _ = writeln!(out, "|------|------|----|----------|-------------|");
    write_param_rows(out, params, 0);
    out.push('\n');
}

fn write_param_rows(out: &mut String, params: &[ApiParam], depth: usize) {
    for p in params {
        let indent = "&nbsp;&nbsp;".repeat(depth);
        let _ = writeln!(
            out,
            "| {}{} | {} | {} | {} | {} |",
            indent,
            p.name,
            p.field_type,
            p.location,
            if p.required { "yes" } else { "no" },
            p.description.replace('|', "\\|")
        );
        write_param_rows(out, &p.children, depth + 1);
    }
}

pub fn render_markdown(doc: &ProjectDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", doc.title());
    if !doc.project.description.is_empty() {
        let _ = writeln!(out, "{}\n", doc.project.description);
    }

    for (collection, endpoints) in &doc.sections {
        let _ = writeln!(out, "## {}\n", collection.name);
        if !collection.description.is_empty() {
            let _ = writeln!(out, "{}\n", collection.description);
        }

        for ep in endpoints {
            let _ = writeln!(out, "### {} {}\n", ep.method, ep.name);
            if !ep.description.is_empty() {
                let _ = writeln!(out, "**Description:** {}\n", ep.description);
            }
            let _ = writeln!(out, "**Endpoint:** `{}`\n", ep.url);
            let _ = writeln!(out, "**Method:** `{}`\n", ep.method);

            if !ep.headers.is_empty() {
                out.push_str("**Headers:**\n\n```\n");
                for (k, v) in &ep.headers {
                    let _ = writeln!(out, "{}: {}", k, v);
                }
                out.push_str("```\n\n");
            }

            write_param_table(&mut out, "Request Parameters", &ep.request_params);
            if let Some(body) = &ep.request_body {
                write_param_table(&mut out, "Request Body", &body.schema);
            }
            if let Some(raw) = ep.body.as_deref().filter(|b| !b.is_empty()) {
                let _ = writeln!(out, "**Request Body Example:**\n\n```json\n{}\n```\n", raw);
            }
            write_param_table(&mut out, "Response Fields", &ep.response_params);
            if let Some(body) = &ep.response_body {
                if !body.json_schema.is_empty() {
                    let _ = writeln!(out, "**Response Example:**\n\n```json\n{}\n```\n", body.json_schema);
                }
            }

            out.push_str("---\n\n");
        }
    }
    out
}

/// Escape text for HTML element content and attribute values
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn html_param_table(out: &mut String, title: &str, params: &[ApiParam]) {
    if params.is_empty() {
        return;
    }
    let _ = writeln!(out, "<h4>{}</h4>", escape_html(title));
    out.push_str("<table><tr><th>Name</th><th>Type</th><th>In</th><th>Required</th><th>Description</th></tr>\n");
    html_param_rows(out, params, 0);
    out.push_str("</table>\n");
}

fn html_param_rows(out: &mut String, params: &[ApiParam], depth: usize) {
    for p in params {
        let _ = writeln!(
            out,
            "<tr><td style=\"padding-left: {}em\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            depth + 1,
            escape_html(&p.name),
            p.field_type,
            p.location,
            if p.required { "yes" } else { "no" },
            escape_html(&p.description)
        );
        html_param_rows(out, &p.children, depth + 1);
    }
}

pub fn render_html(doc: &ProjectDocument) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(doc.title()));
    out.push_str(
        "<style>\n\
         body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; line-height: 1.6; }\n\
         h1 { border-bottom: 2px solid #333; padding-bottom: 10px; }\n\
         pre, code { background: #f4f4f4; border-radius: 4px; }\n\
         pre { padding: 10px; overflow-x: auto; }\n\
         table { border-collapse: collapse; margin-bottom: 1em; }\n\
         td, th { border: 1px solid #ddd; padding: 4px 8px; text-align: left; }\n\
         </style>\n</head>\n<body>\n",
    );

    let _ = writeln!(out, "<h1>{}</h1>", escape_html(doc.title()));
    if !doc.project.description.is_empty() {
        let _ = writeln!(out, "<p>{}</p>", escape_html(&doc.project.description));
    }

    for (collection, endpoints) in &doc.sections {
        let _ = writeln!(out, "<h2>{}</h2>", escape_html(&collection.name));
        if !collection.description.is_empty() {
            let _ = writeln!(out, "<p>{}</p>", escape_html(&collection.description));
        }
        for ep in endpoints {
            let _ = writeln!(
                out,
                "<h3><code>{}</code> {}</h3>",
                escape_html(ep.method.as_str()),
                escape_html(&ep.name)
            );
            if !ep.description.is_empty() {
                let _ = writeln!(out, "<p>{}</p>", escape_html(&ep.description));
            }
            let _ = writeln!(out, "<p><code>{}</code></p>", escape_html(&ep.url));
            if !ep.headers.is_empty() {
                out.push_str("<pre>");
                for (k, v) in &ep.headers {
                    let _ = writeln!(out, "{}: {}", escape_html(k), escape_html(v));
                }
                out.push_str("</pre>\n");
            }
            html_param_table(&mut out, "Request Parameters", &ep.request_params);
            if let Some(body) = &ep.request_body {
                html_param_table(&mut out, "Request Body", &body.schema);
            }
            html_param_table(&mut out, "Response Fields", &ep.response_params);
            out.push_str("<hr>\n");
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Path component of an endpoint URL with `:name` placeholders as `{name}`.
pub fn openapi_path(url: &str) -> String {
    let mut path = url;
    if let Some(rest) = url.strip_prefix("http://").or_else(|| url.strip_prefix("https://")) {
        path = rest.find('/').map(|i| &rest[i..]).unwrap_or("/");
    }
    let path = path.split('?').next().unwrap_or(path);
    COLON_PLACEHOLDER.replace_all(path, "{$1}").into_owned()
}

fn openapi_schema(params: &[ApiParam]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for p in params {
        let mut schema = json!({ "type": p.field_type.as_str() });
        if !p.description.is_empty() {
            schema["description"] = json!(p.description);
        }
        match p.field_type {
            FieldType::Object => {
                let nested = openapi_schema(&p.children);
                schema["properties"] = nested["properties"].clone();
                if let Some(required) = nested.get("required") {
                    schema["required"] = required.clone();
                }
            }
            FieldType::Array => {
                schema["items"] = if p.children.is_empty() {
                    json!({})
                } else {
                    openapi_schema(&p.children)
                };
            }
            _ => {}
        }
        if p.required {
            required.push(json!(p.name));
        }
        properties.insert(p.name.clone(), schema);
    }
    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

pub fn render_openapi(doc: &ProjectDocument) -> Value {
    let mut paths = Map::new();

    for (collection, endpoints) in &doc.sections {
        for ep in endpoints {
            let parameters: Vec<Value> = ep
                .request_params
                .iter()
                .filter(|p| matches!(p.location, ParameterLocation::Path | ParameterLocation::Query | ParameterLocation::Header))
                .map(|p| {
                    json!({
                        "name": p.name,
                        "in": p.location.to_string(),
                        "required": p.required || p.location == ParameterLocation::Path,
                        "description": p.description,
                        "schema": { "type": p.field_type.as_str() }
                    })
                })
                .collect();

            let mut operation = json!({
                "summary": ep.name,
                "description": ep.description,
                "tags": [collection.name],
                "parameters": parameters,
                "responses": { "200": { "description": "Success" } }
            });

            if let Some(body) = &ep.request_body {
                operation["requestBody"] = json!({
                    "content": { body.kind.mime_type(): { "schema": openapi_schema(&body.schema) } }
                });
            }
            if let Some(body) = &ep.response_body {
                let schema = if body.data_type == "array" {
                    json!({ "type": "array", "items": openapi_schema(&body.schema) })
                } else {
                    openapi_schema(&body.schema)
                };
                operation["responses"]["200"]["content"] = json!({
                    body.kind.mime_type(): { "schema": schema }
                });
            }

            let item = paths
                .entry(openapi_path(&ep.url))
                .or_insert_with(|| Value::Object(Map::new()));
            item[ep.method.as_str().to_ascii_lowercase()] = operation;
        }
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": doc.title(),
            "description": doc.project.description,
            "version": "1.0.0"
        },
        "paths": paths
    })
}

pub fn render_postman(doc: &ProjectDocument) -> Value {
    let folders: Vec<Value> = doc
        .sections
        .iter()
        .map(|(collection, endpoints)| {
            let items: Vec<Value> = endpoints
                .iter()
                .map(|ep| {
                    let headers: Vec<Value> = ep
                        .headers
                        .iter()
                        .map(|(k, v)| json!({ "key": k, "value": v }))
                        .collect();
                    let mut request = json!({
                        "method": ep.method.as_str(),
                        "header": headers,
                        "url": { "raw": ep.url },
                        "description": ep.description
                    });
                    if let Some(raw) = ep.body.as_deref().filter(|b| !b.is_empty()) {
                        request["body"] = json!({ "mode": "raw", "raw": raw });
                    }
                    json!({ "name": ep.name, "request": request })
                })
                .collect();
            json!({ "name": collection.name, "description": collection.description, "item": items })
        })
        .collect();

    json!({
        "info": {
            "name": doc.title(),
            "description": doc.project.description,
            "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
        },
        "item": folders
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_path_strips_host_and_rewrites_placeholders() {
        assert_eq!(openapi_path("/users/:id"), "/users/{id}");
        assert_eq!(openapi_path("https://api.example.com/v1/users/:id/posts/:post_id"), "/v1/users/{id}/posts/{post_id}");
        assert_eq!(openapi_path("http://host"), "/");
        assert_eq!(openapi_path("/search?q=1"), "/search");
        assert_eq!(openapi_path("/users/{id}"), "/users/{id}");
    }

    #[test]
    fn html_escaping() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn format_names() {
        assert_eq!("md".parse::<DocFormat>().unwrap(), DocFormat::Markdown);
        assert_eq!("OpenAPI".parse::<DocFormat>().unwrap(), DocFormat::OpenApi);
        assert!("pdf".parse::<DocFormat>().is_err());
    }
}
