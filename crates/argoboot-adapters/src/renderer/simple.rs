//! Strict placeholder substitution renderer.
//!
//! Supported syntax:
//!
//! - `{{ name }}` / `{{ a.b }}`: the binding's value. Strings are inserted
//!   as-is, other scalars in their JSON form.
//! - `{{ name | yaml }}`: the value as a double-quoted YAML scalar, safe for
//!   free-form text containing `:`, `#` or quotes.
//! - `{{#name}} … {{/name}}`: a section. Skipped when the binding is absent,
//!   `null`, `false` or empty; repeated once per element for arrays (the
//!   element is `{{ . }}`); rendered once otherwise.
//!
//! A section tag that ends its line takes the newline with it, so sections
//! can sit on lines of their own without leaving blank lines behind.
//!
//! Every placeholder must resolve. A missing binding is an error, never an
//! empty string.

use serde_json::Value;
use tracing::{instrument, trace};

use argoboot_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::Bindings,
    error::BootstrapResult,
};

use crate::builtin_templates::TemplateCatalog;

/// Renderer over a [`TemplateCatalog`].
#[derive(Debug, Clone, Default)]
pub struct SimpleRenderer {
    catalog: TemplateCatalog,
}

impl SimpleRenderer {
    pub fn new(catalog: TemplateCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip(self, bindings))]
    fn render(&self, name: &str, bindings: &Bindings) -> BootstrapResult<String> {
        let source = self.catalog.get(name)?;
        let rendered = render_str(source, bindings).map_err(|reason| {
            ApplicationError::RenderingFailed {
                template: name.to_string(),
                reason,
            }
        })?;
        trace!(
            bytes = rendered.len(),
            bindings = ?bindings.keys().collect::<Vec<_>>(),
            "Template rendered"
        );
        Ok(rendered)
    }

    fn source(&self, name: &str) -> BootstrapResult<String> {
        self.catalog.get(name).map(str::to_string)
    }
}

/// Render template text against `bindings`.
///
/// Errors are plain messages; [`SimpleRenderer`] attaches the template name.
pub fn render_str(source: &str, bindings: &Bindings) -> Result<String, String> {
    let nodes = parse(source)?;
    let mut out = String::with_capacity(source.len());
    let scope = Scope {
        bindings,
        item: None,
        parent: None,
    };
    render_nodes(&nodes, &scope, &mut out)?;
    Ok(out)
}

// ── Parsing ───────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum Node {
    Text(String),
    Var(String, Filter),
    Section { name: String, body: Vec<Node> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Filter {
    Raw,
    Yaml,
}

fn var_tag(tag: &str) -> Result<Node, String> {
    let (name, filter) = match tag.split_once('|') {
        None => (tag, Filter::Raw),
        Some((name, filter)) => match filter.trim() {
            "yaml" => (name, Filter::Yaml),
            other => return Err(format!("unknown filter '{other}'")),
        },
    };
    Ok(Node::Var(tag_name(name)?, filter))
}

fn parse(source: &str) -> Result<Vec<Node>, String> {
    // Open sections, innermost last. The bottom entry is the document.
    let mut stack: Vec<(Option<String>, Vec<Node>)> = vec![(None, Vec::new())];
    let mut rest = source;

    while let Some(open) = rest.find("{{") {
        push_text(&mut stack, &rest[..open]);
        let after_open = &rest[open + 2..];
        let close = after_open
            .find("}}")
            .ok_or_else(|| format!("unterminated tag at '{}'", snippet(&rest[open..])))?;
        let tag = after_open[..close].trim();
        rest = &after_open[close + 2..];

        if let Some(name) = tag.strip_prefix('#') {
            let name = tag_name(name)?;
            stack.push((Some(name), Vec::new()));
            rest = consume_newline(rest);
        } else if let Some(name) = tag.strip_prefix('/') {
            let name = tag_name(name)?;
            let (open_name, body) = match stack.pop() {
                Some((Some(open_name), body)) => (open_name, body),
                _ => return Err(format!("'{{{{/{name}}}}}' closes no section")),
            };
            if open_name != name {
                return Err(format!(
                    "'{{{{/{name}}}}}' closes section '{open_name}'"
                ));
            }
            current(&mut stack)?.push(Node::Section { name, body });
            rest = consume_newline(rest);
        } else {
            current(&mut stack)?.push(var_tag(tag)?);
        }
    }
    push_text(&mut stack, rest);

    match stack.pop() {
        Some((None, nodes)) if stack.is_empty() => Ok(nodes),
        Some((Some(name), _)) => Err(format!("section '{name}' is never closed")),
        _ => Err("unbalanced sections".into()),
    }
}

fn current(stack: &mut [(Option<String>, Vec<Node>)]) -> Result<&mut Vec<Node>, String> {
    stack
        .last_mut()
        .map(|(_, nodes)| nodes)
        .ok_or_else(|| "unbalanced sections".to_string())
}

fn push_text(stack: &mut [(Option<String>, Vec<Node>)], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some((_, nodes)) = stack.last_mut() {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn tag_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    let valid = name == "."
        || (!name.is_empty()
            && name
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_')));
    if valid {
        Ok(name.to_string())
    } else {
        Err(format!("invalid placeholder '{{{{{raw}}}}}'"))
    }
}

fn consume_newline(rest: &str) -> &str {
    rest.strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest)
}

fn snippet(s: &str) -> &str {
    let end = s.char_indices().nth(20).map_or(s.len(), |(i, _)| i);
    &s[..end]
}

// ── Rendering ─────────────────────────────────────────────────────────────────

struct Scope<'a> {
    bindings: &'a Bindings,
    /// Current section value, if it is an array element or an object.
    item: Option<&'a Value>,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    fn lookup(&self, name: &str) -> Option<&'a Value> {
        if name == "." {
            return self.item;
        }
        if let Some(found) = self.item.and_then(|item| lookup_in(item, name)) {
            return Some(found);
        }
        match self.parent {
            Some(parent) => parent.lookup(name),
            None => self.bindings.lookup(name),
        }
    }
}

fn lookup_in<'v>(value: &'v Value, dotted: &str) -> Option<&'v Value> {
    dotted
        .split('.')
        .try_fold(value, |v, key| v.as_object()?.get(key))
        .filter(|v| !v.is_null())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    }
}

fn render_nodes(nodes: &[Node], scope: &Scope<'_>, out: &mut String) -> Result<(), String> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name, filter) => {
                let value = scope
                    .lookup(name)
                    .ok_or_else(|| format!("missing binding '{name}'"))?;
                match filter {
                    Filter::Raw => push_value(out, value),
                    Filter::Yaml => push_quoted(out, value),
                }
            }
            Node::Section { name, body } => {
                let Some(value) = scope.lookup(name).filter(|v| is_truthy(v)) else {
                    continue;
                };
                match value {
                    Value::Array(items) => {
                        for item in items {
                            let inner = Scope {
                                bindings: scope.bindings,
                                item: Some(item),
                                parent: Some(scope),
                            };
                            render_nodes(body, &inner, out)?;
                        }
                    }
                    Value::Object(_) => {
                        let inner = Scope {
                            bindings: scope.bindings,
                            item: Some(value),
                            parent: Some(scope),
                        };
                        render_nodes(body, &inner, out)?;
                    }
                    _ => render_nodes(body, scope, out)?,
                }
            }
        }
    }
    Ok(())
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

/// A JSON string literal is a valid double-quoted YAML scalar.
fn push_quoted(out: &mut String, value: &Value) {
    match value {
        Value::String(_) => out.push_str(&value.to_string()),
        other => out.push_str(&Value::String(other.to_string()).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(source: &str, bindings: &Bindings) -> Result<String, String> {
        render_str(source, bindings)
    }

    #[test]
    fn substitutes_plain_and_dotted_names() {
        let b = Bindings::new()
            .with("namespace", "payments-dev")
            .with("app", json!({ "name": "api-app-dev" }));

        assert_eq!(
            render("{{namespace}}/{{ app.name }}", &b).unwrap(),
            "payments-dev/api-app-dev"
        );
    }

    #[test]
    fn missing_binding_is_an_error() {
        let err = render("repoURL: {{ app.repo_url }}", &Bindings::new()).unwrap_err();
        assert_eq!(err, "missing binding 'app.repo_url'");
    }

    #[test]
    fn null_binding_counts_as_missing() {
        let b = Bindings::new().with("x", Value::Null);
        assert!(render("{{x}}", &b).is_err());
    }

    #[test]
    fn section_is_skipped_without_leaving_blank_lines() {
        let template = "a\n{{#deploy_plugin}}\nplugin: {{deploy_plugin}}\n{{/deploy_plugin}}\nb\n";

        assert_eq!(render(template, &Bindings::new()).unwrap(), "a\nb\n");

        let b = Bindings::new().with("deploy_plugin", "custom");
        assert_eq!(render(template, &b).unwrap(), "a\nplugin: custom\nb\n");
    }

    #[test]
    fn falsy_values_skip_sections() {
        for value in [json!(false), json!(""), json!([]), json!({})] {
            let b = Bindings::new().with("x", value);
            assert_eq!(render("{{#x}}shown{{/x}}", &b).unwrap(), "");
        }
    }

    #[test]
    fn arrays_repeat_with_current_item() {
        let b = Bindings::new()
            .with("namespaces", json!(["shop-dev", "pay-dev"]))
            .with("env", "dev");
        let template = "{{#namespaces}}\n- {{ . }} ({{env}})\n{{/namespaces}}\n";

        assert_eq!(
            render(template, &b).unwrap(),
            "- shop-dev (dev)\n- pay-dev (dev)\n"
        );
    }

    #[test]
    fn object_sections_resolve_fields_first() {
        let b = Bindings::new()
            .with("name", "outer")
            .with("app", json!({ "name": "inner" }));
        assert_eq!(render("{{#app}}{{name}}{{/app}}", &b).unwrap(), "inner");
    }

    #[test]
    fn non_string_scalars_use_json_form() {
        let b = Bindings::new().with("port", 8080).with("insecure", true);
        assert_eq!(render("{{port}} {{insecure}}", &b).unwrap(), "8080 true");
    }

    #[test]
    fn yaml_filter_quotes_free_form_text() {
        let b = Bindings::new()
            .with("description", "Payments: core platform #1 \"beta\"")
            .with("version", 1.5);
        let out = render(
            "description: {{ description | yaml }}\nversion: {{version|yaml}}\n",
            &b,
        )
        .unwrap();

        let doc: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(
            doc["description"].as_str(),
            Some("Payments: core platform #1 \"beta\"")
        );
        assert_eq!(doc["version"].as_str(), Some("1.5"));
    }

    #[test]
    fn unknown_filter_is_rejected() {
        let b = Bindings::new().with("a", "x");
        assert_eq!(render("{{ a | upper }}", &b).unwrap_err(), "unknown filter 'upper'");
    }

    #[test]
    fn builtin_project_keeps_punctuated_description() {
        let b = Bindings::new()
            .with("project_name", "shop-dev")
            .with("project_description", "Payments: core platform #1");
        let out = SimpleRenderer::default().render("project.yml", &b).unwrap();

        let doc: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(doc["metadata"]["name"].as_str(), Some("shop-dev"));
        assert_eq!(
            doc["spec"]["description"].as_str(),
            Some("Payments: core platform #1")
        );
    }

    #[test]
    fn malformed_templates_are_rejected() {
        let b = Bindings::new().with("a", "x");
        assert!(render("{{a", &b).unwrap_err().contains("unterminated"));
        assert!(render("{{#a}}x", &b).unwrap_err().contains("never closed"));
        assert!(render("{{/a}}", &b).unwrap_err().contains("closes no section"));
        assert!(render("{{#a}}{{/b}}", &b).is_err());
        assert!(render("{{ .Values.image }}", &b).is_err());
    }

    #[test]
    fn renderer_reports_template_name() {
        let renderer = SimpleRenderer::new(
            TemplateCatalog::builtin().with_template("custom.yml", "{{ missing }}"),
        );
        let err = renderer.render("custom.yml", &Bindings::new()).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("custom.yml"));
        assert!(msg.contains("missing binding 'missing'"));
    }

    #[test]
    fn source_returns_raw_text() {
        let renderer = SimpleRenderer::default();
        let raw = renderer.source("deploy/deployment.yml").unwrap();
        assert!(raw.contains("{{ .Values.replicaCount"));
    }

    #[test]
    fn builtin_application_renders_to_valid_yaml() {
        let b = Bindings::new()
            .with(
                "app",
                json!({
                    "name": "api-app-dev",
                    "repo_url": "https://example.com/api.git",
                    "source_path": "kustomized_helm/overlays/dev",
                }),
            )
            .with("namespace", "payments-dev")
            .with("destination_cluster", "in-cluster")
            .with("project_name", "shop-dev");
        let renderer = SimpleRenderer::default();

        let plain = renderer.render("application.yml", &b).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&plain).unwrap();
        assert_eq!(doc["metadata"]["name"].as_str(), Some("api-app-dev"));
        assert_eq!(doc["spec"]["destination"]["namespace"].as_str(), Some("payments-dev"));
        assert!(doc["spec"]["source"].get("plugin").is_none());

        let with_plugin = renderer
            .render("application.yml", &b.with("deploy_plugin", "custom"))
            .unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&with_plugin).unwrap();
        assert_eq!(doc["spec"]["source"]["plugin"]["name"].as_str(), Some("custom"));
    }
}
