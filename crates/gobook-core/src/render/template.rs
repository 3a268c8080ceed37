//! Repository templates, written in Go's `text/template` syntax
//!
//! Templates are executed by `gtmpl` over the JSON form of the template data,
//! so objects become maps addressed as `{{ .Repository.Name }}` and arrays can
//! be walked with `{{ range .Packages }}`.

use std::collections::HashMap;

use gtmpl_value::Value;
use thiserror::Error;

/// A template that failed to parse or execute
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TemplateError {
    pub message: String,
}

/// Execute `text` with `data` as the dot
pub fn render_str(text: &str, data: &serde_json::Value) -> Result<String, TemplateError> {
    gtmpl::template(text, to_value(data)).map_err(|e| TemplateError {
        message: e.to_string(),
    })
}

/// Convert JSON into the value model the template engine walks
pub fn to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                Value::from(n.as_f64().unwrap_or_default())
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(to_value).collect()),
        serde_json::Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_value(v)))
                .collect::<HashMap<_, _>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> serde_json::Value {
        json!({
            "Repository": { "Name": "kit", "Owner": "acme" },
            "Packages": [
                { "Name": "widget", "Description": "Widgets" },
                { "Name": "store", "Description": "" }
            ],
            "Empty": []
        })
    }

    #[test]
    fn nested_fields() {
        let out = render_str("{{ .Repository.Owner }}/{{ .Repository.Name }}", &data()).unwrap();
        assert_eq!(out, "acme/kit");
    }

    #[test]
    fn range_sets_the_dot() {
        let out = render_str("{{ range .Packages }}[{{ .Name }}]{{ end }}", &data()).unwrap();
        assert_eq!(out, "[widget][store]");
    }

    #[test]
    fn if_else_follows_go_truthiness() {
        let text = "{{ range .Packages }}{{ if .Description }}{{ .Description }}{{ else }}-{{ end }};{{ end }}";
        assert_eq!(render_str(text, &data()).unwrap(), "Widgets;-;");
    }

    #[test]
    fn range_else_on_empty_list() {
        let out = render_str("{{ range .Empty }}x{{ else }}none{{ end }}", &data()).unwrap();
        assert_eq!(out, "none");
    }

    #[test]
    fn numbers_print_plainly() {
        let out = render_str("{{ .Priority }}", &json!({ "Priority": 3 })).unwrap();
        assert_eq!(out, "3");
    }

    #[test]
    fn structural_errors_are_reported() {
        assert!(render_str("{{ if .Repository }}open", &data()).is_err());
        assert!(render_str("{{ end }}", &data()).is_err());
        assert!(render_str("{{ .Repository.Name ", &data()).is_err());
    }
}
