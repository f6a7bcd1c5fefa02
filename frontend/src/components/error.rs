use crate::api::ApiError;
use leptos::*;
use serde_json::Value;

/// Flattens Laravel-style `{field: [messages]}` validation details.
pub fn validation_messages(details: Option<&Value>) -> Vec<String> {
    let Some(details) = details else {
        return Vec::new();
    };
    let collect = |value: &Value| -> Vec<String> {
        match value {
            Value::String(text) => vec![text.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    };
    match details {
        Value::Object(fields) => fields.values().flat_map(collect).collect(),
        other => collect(other),
    }
}

#[component]
pub fn InlineErrorMessage(#[prop(into)] error: Signal<Option<ApiError>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some() fallback=|| ()>
            <div class="bg-status-error-bg border border-status-error-border text-status-error-text px-4 py-3 rounded space-y-1 my-2">
                <div class="font-bold">{move || error.get().map(|e| e.error).unwrap_or_default()}</div>
                {move || {
                    let messages = error
                        .get()
                        .filter(|e| e.code == "VALIDATION_ERROR")
                        .map(|e| validation_messages(e.details.as_ref()))
                        .unwrap_or_default();
                    (!messages.is_empty()).then(|| view! {
                        <ul class="list-disc list-inside text-sm">
                            {messages.into_iter().map(|m| view! { <li>{m}</li> }).collect_view()}
                        </ul>
                    })
                }}
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_messages_flatten_fields() {
        let details = json!({
            "email": ["The email has already been taken."],
            "password": ["Too short.", "Needs a digit."]
        });
        assert_eq!(
            validation_messages(Some(&details)),
            vec![
                "The email has already been taken.".to_string(),
                "Too short.".to_string(),
                "Needs a digit.".to_string(),
            ]
        );
        assert!(validation_messages(None).is_empty());
        assert_eq!(validation_messages(Some(&json!(["one"]))), vec!["one".to_string()]);
    }
}
