use serde_json::Value;

pub fn extract_url(output: &Value) -> Option<String> {
    if is_falsy(output) {
        return None;
    }

    from_list(output)
        .or_else(|| from_url_member(output))
        .or_else(|| from_href_member(output))
        .or_else(|| from_http_string(output))
        .or_else(|| from_coercion(output))
}

fn from_list(output: &Value) -> Option<String> {
    extract_url(output.as_array()?.first()?)
}

fn from_url_member(output: &Value) -> Option<String> {
    extract_url(output.as_object()?.get("url")?)
}

fn from_href_member(output: &Value) -> Option<String> {
    output.as_object()?.get("href").map(stringify)
}

fn from_http_string(output: &Value) -> Option<String> {
    let text = output.as_str()?;
    text.starts_with("http").then(|| text.to_string())
}

fn from_coercion(output: &Value) -> Option<String> {
    let text = stringify(output);
    text.starts_with("http").then_some(text)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().map(|n| n == 0.0).unwrap_or(false),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
