//! Server-side rendering of the viewer pages.

use serde::Serialize;
use tera::{Context, Tera};
use url::form_urlencoded;

use crate::error::{Error, Result};
use crate::openapi::model::{Document, EndpointKey, Operation};
use crate::viewer::markdown::render_markdown;
use crate::viewer::state::ReadyView;

/// Tag bucket for operations that declare none.
const DEFAULT_TAG: &str = "Default";

pub fn templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("viewer.html", include_str!("../../templates/viewer.html")),
        ("error.html", include_str!("../../templates/error.html")),
    ])
    .map_err(|err| Error::ServerStartFailed {
        reason: format!("Failed to load templates: {err}"),
    })?;
    Ok(tera)
}

#[derive(Debug, Serialize)]
pub struct PageView {
    title: String,
    overview_html: Option<String>,
    language: String,
    file: String,
    languages: Vec<String>,
    files: Vec<String>,
    groups: Vec<GroupView>,
    endpoint: Option<EndpointView>,
}

#[derive(Debug, Serialize)]
struct GroupView {
    tag: String,
    endpoints: Vec<EndpointLinkView>,
}

#[derive(Debug, Serialize)]
struct EndpointLinkView {
    method: String,
    method_class: &'static str,
    path: String,
    summary: Option<String>,
    selected: bool,
    href: String,
}

#[derive(Debug, Serialize)]
struct EndpointView {
    method: String,
    method_class: &'static str,
    path: String,
    summary: Option<String>,
    description_html: Option<String>,
    parameters: Vec<ParameterView>,
    request_body: Option<BodyView>,
    responses: Vec<ResponseView>,
}

#[derive(Debug, Serialize)]
struct ParameterView {
    name: String,
    schema_type: String,
    location: String,
    required: bool,
    description_html: Option<String>,
}

#[derive(Debug, Serialize)]
struct BodyView {
    description: Option<String>,
    required: bool,
    content_types: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ResponseView {
    status: String,
    status_class: &'static str,
    description: Option<String>,
    content_types: Vec<String>,
}

pub fn page_view(view: &ReadyView, languages: &[String], files: &[String]) -> PageView {
    let doc = &view.document;
    let endpoint = view.selected.as_ref().and_then(|key| {
        doc.operation(&key.path, &key.method)
            .map(|op| endpoint_view(key, op))
    });

    PageView {
        title: doc
            .info
            .title
            .clone()
            .unwrap_or_else(|| "API Documentation".to_string()),
        // The overview is the landing view for documents with no endpoints.
        overview_html: if endpoint.is_none() {
            doc.info.description.as_deref().map(render_markdown)
        } else {
            None
        },
        language: view.language.clone(),
        file: view.file.clone(),
        languages: languages.to_vec(),
        files: files.to_vec(),
        groups: group_by_tags(doc, view.selected.as_ref(), &view.language, &view.file),
        endpoint,
    }
}

/// Group every operation under its declared tags, `Default` otherwise.
/// Group order follows first appearance in the document.
fn group_by_tags(
    doc: &Document,
    selected: Option<&EndpointKey>,
    language: &str,
    file: &str,
) -> Vec<GroupView> {
    let mut groups: Vec<GroupView> = Vec::new();
    for entry in &doc.paths {
        for op_entry in &entry.operations {
            let op = &op_entry.operation;
            let tags: Vec<&str> = if op.tags.is_empty() {
                vec![DEFAULT_TAG]
            } else {
                op.tags.iter().map(String::as_str).collect()
            };
            let key = EndpointKey {
                path: entry.path.clone(),
                method: op_entry.method.clone(),
            };
            for tag in tags {
                let link = EndpointLinkView {
                    method: op_entry.method.clone(),
                    method_class: method_class(&op_entry.method),
                    path: entry.path.clone(),
                    summary: op.summary.clone(),
                    selected: selected == Some(&key),
                    href: endpoint_href(language, file, &key),
                };
                match groups.iter().position(|group| group.tag == tag) {
                    Some(i) => groups[i].endpoints.push(link),
                    None => groups.push(GroupView {
                        tag: tag.to_string(),
                        endpoints: vec![link],
                    }),
                }
            }
        }
    }
    groups
}

fn endpoint_view(key: &EndpointKey, op: &Operation) -> EndpointView {
    EndpointView {
        method: key.method.clone(),
        method_class: method_class(&key.method),
        path: key.path.clone(),
        summary: op.summary.clone(),
        description_html: op.description.as_deref().map(render_markdown),
        parameters: op
            .parameters
            .iter()
            .map(|param| ParameterView {
                name: param.name.clone(),
                schema_type: param
                    .schema_type
                    .clone()
                    .unwrap_or_else(|| "any".to_string()),
                location: param.location.clone(),
                required: param.required,
                description_html: param.description.as_deref().map(render_markdown),
            })
            .collect(),
        request_body: op.request_body.as_ref().map(|body| BodyView {
            description: body.description.clone(),
            required: body.required,
            content_types: body.content_types.clone(),
        }),
        responses: op
            .responses
            .iter()
            .map(|response| ResponseView {
                status: response.status.clone(),
                status_class: status_class(&response.status),
                description: response.description.clone(),
                content_types: response.content_types.clone(),
            })
            .collect(),
    }
}

fn endpoint_href(language: &str, file: &str, key: &EndpointKey) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("lang", language)
        .append_pair("file", file)
        .append_pair("path", &key.path)
        .append_pair("method", &key.method)
        .finish();
    format!("/?{query}")
}

fn method_class(method: &str) -> &'static str {
    match method.to_ascii_lowercase().as_str() {
        "get" => "method-get",
        "post" => "method-post",
        "put" => "method-put",
        "delete" => "method-delete",
        "patch" => "method-patch",
        _ => "method-other",
    }
}

fn status_class(status: &str) -> &'static str {
    match status.parse::<u16>() {
        Ok(code) if (200..300).contains(&code) => "status-2xx",
        Ok(code) if (300..400).contains(&code) => "status-3xx",
        Ok(code) if (400..500).contains(&code) => "status-4xx",
        Ok(code) if code >= 500 => "status-5xx",
        _ => "status-other",
    }
}

pub fn render_page(tera: &Tera, page: &PageView) -> Result<String> {
    let context = Context::from_serialize(page)
        .map_err(|err| Error::io("Failed to build template context", std::io::Error::other(err)))?;
    tera.render("viewer.html", &context)
        .map_err(|err| Error::io("Failed to render viewer page", std::io::Error::other(err)))
}

pub fn render_error(tera: &Tera, message: &str) -> Result<String> {
    let mut context = Context::new();
    context.insert("message", message);
    tera.render("error.html", &context)
        .map_err(|err| Error::io("Failed to render error page", std::io::Error::other(err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(yaml: &str) -> Document {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        Document::from_value(&value)
    }

    fn ready_view(doc: Document) -> ReadyView {
        let selected = doc.first_endpoint();
        ReadyView {
            language: "en".to_string(),
            file: "api.yaml".to_string(),
            document: doc,
            selected,
        }
    }

    const SAMPLE: &str = r#"
info:
  title: Widget API
paths:
  /widgets:
    get:
      tags: [Widgets]
      summary: List widgets
      responses:
        "200":
          description: OK
    post:
      responses:
        "500":
          description: Kaboom
  /health:
    get:
      tags: [Ops, Widgets]
      responses:
        "200":
          description: OK
"#;

    #[test]
    fn groups_follow_first_appearance_with_default_bucket() {
        let doc = document(SAMPLE);
        let groups = group_by_tags(&doc, None, "en", "api.yaml");
        let tags: Vec<&str> = groups.iter().map(|g| g.tag.as_str()).collect();
        assert_eq!(tags, ["Widgets", "Default", "Ops"]);
        // /health carries two tags, so it shows up in both groups.
        assert_eq!(groups[0].endpoints.len(), 2);
        assert_eq!(groups[2].endpoints.len(), 1);
    }

    #[test]
    fn hrefs_encode_query_values() {
        let key = EndpointKey {
            path: "/widgets/{id}".to_string(),
            method: "get".to_string(),
        };
        let href = endpoint_href("en", "api.yaml", &key);
        assert_eq!(
            href,
            "/?lang=en&file=api.yaml&path=%2Fwidgets%2F%7Bid%7D&method=get"
        );
    }

    #[test]
    fn class_mapping_covers_methods_and_statuses() {
        assert_eq!(method_class("GET"), "method-get");
        assert_eq!(method_class("trace"), "method-other");
        assert_eq!(status_class("204"), "status-2xx");
        assert_eq!(status_class("301"), "status-3xx");
        assert_eq!(status_class("404"), "status-4xx");
        assert_eq!(status_class("503"), "status-5xx");
        assert_eq!(status_class("default"), "status-other");
    }

    #[test]
    fn page_view_selects_the_endpoint_and_hides_the_overview() {
        let page = page_view(
            &ready_view(document(SAMPLE)),
            &["en".to_string(), "es".to_string()],
            &["api.yaml".to_string()],
        );
        assert_eq!(page.title, "Widget API");
        assert!(page.overview_html.is_none());
        let endpoint = page.endpoint.as_ref().unwrap();
        assert_eq!(endpoint.path, "/widgets");
        assert_eq!(endpoint.method, "get");
        assert_eq!(endpoint.responses[0].status_class, "status-2xx");
    }

    #[test]
    fn overview_shows_when_there_are_no_endpoints() {
        let doc = document("info:\n  title: Empty\n  description: Just **docs**.\npaths: {}\n");
        let page = page_view(&ready_view(doc), &["en".to_string()], &[]);
        assert!(page.endpoint.is_none());
        assert_eq!(
            page.overview_html.as_deref(),
            Some("<p>Just <strong>docs</strong>.</p>\n")
        );
    }

    #[test]
    fn viewer_template_renders() {
        let tera = templates().unwrap();
        let page = page_view(
            &ready_view(document(SAMPLE)),
            &["en".to_string(), "es".to_string()],
            &["api.yaml".to_string(), "admin.yaml".to_string()],
        );
        let html = render_page(&tera, &page).unwrap();
        assert!(html.contains("Widget API"));
        assert!(html.contains("/widgets"));
        assert!(html.contains("method-get"));
        assert!(html.contains("List widgets"));
    }

    #[test]
    fn error_template_renders_message_and_hint() {
        let tera = templates().unwrap();
        let html = render_error(&tera, "load failed: HTTP 404").unwrap();
        assert!(html.contains("load failed: HTTP 404"));
        assert!(html.contains("speclingo generate"));
    }
}
