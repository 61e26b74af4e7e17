//! Response envelope parsing
//!
//! Backend replies are JSON objects prefixed with an anti-hijacking loop
//! (`for (;;);`), occasionally several objects separated by CRLF. An expired
//! session does not produce an envelope at all: the server bounces the request
//! to its login page instead. Everything in this module is shared by all
//! endpoint wrappers.

use crate::core::session::{RefreshedCookie, SessionRefresh};
use crate::core::transport::RawResponse;
use crate::utils::error::TransportError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Backend error code meaning "not logged in"
pub const NOT_LOGGED_IN_CODE: i64 = 1357001;

static FOR_LOOP_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"for\s*\(\s*;\s*;\s*\)\s*;\s*").expect("Invalid for-loop prefix regex")
});

static OBJECT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\}\r\n *\{").expect("Invalid object separator regex"));

/// Fragments only found on the login and checkpoint pages
const LOGIN_PAGE_MARKERS: &[&str] = &[
    "login_form",
    "id=\"loginbutton\"",
    "/login.php",
    "/login/",
    "/checkpoint/",
];

/// Path fragments of the login and checkpoint URLs
const LOGIN_PATH_MARKERS: &[&str] = &["/login", "/checkpoint"];

/// Strip the `for (;;);` prefix and join concatenated objects into an array
pub fn make_parsable(body: &str) -> String {
    let stripped = FOR_LOOP_PREFIX.replace(body, "");
    let objects: Vec<&str> = OBJECT_SEPARATOR.split(&stripped).collect();
    if objects.len() == 1 {
        return stripped.into_owned();
    }
    format!("[{}]", objects.join("},{"))
}

/// Does this URL point at the login or checkpoint flow?
pub fn is_login_url(url: &str) -> bool {
    LOGIN_PATH_MARKERS.iter().any(|marker| url.contains(marker))
}

/// Detect a login page served in place of an envelope
///
/// Looks only at the raw exchange, never at parsed JSON, so it can run before
/// any parse attempt.
pub fn detect_login_page(response: &RawResponse) -> Option<String> {
    if response.is_redirect() {
        if let Some(location) = response.location.as_deref() {
            if is_login_url(location) {
                return Some(format!("Redirected to {}", location));
            }
        }
    }

    let head = response.body.trim_start();
    if !head.starts_with('<') {
        return None;
    }

    LOGIN_PAGE_MARKERS
        .iter()
        .find(|marker| response.body.contains(*marker))
        .map(|marker| format!("Received a login page ({})", marker))
}

/// Parse the body of an exchange into a JSON value
pub fn parse_body(body: &str) -> Result<Value, TransportError> {
    let parsable = make_parsable(body);
    serde_json::from_str(&parsable).map_err(|e| TransportError::malformed(e.to_string(), body))
}

/// Detect "not logged in" signalled inside a well-formed envelope
pub fn detect_login_required(payload: &Value) -> Option<String> {
    for envelope in envelopes(payload) {
        if envelope.get("error").and_then(Value::as_i64) == Some(NOT_LOGGED_IN_CODE) {
            return Some("Not logged in.".to_string());
        }
        if let Some(redirect) = envelope.get("redirect").and_then(Value::as_str) {
            if is_login_url(redirect) {
                return Some(format!("Redirected to {}", redirect));
            }
        }
    }
    None
}

/// JavaScript-style truthiness of an `error` field
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First envelope carrying a truthy `error` field
pub fn find_error(payload: &Value) -> Option<&Value> {
    envelopes(payload).find(|envelope| envelope.get("error").is_some_and(is_truthy))
}

/// Collect credential rotations announced through `jsmods.require`
///
/// Entries look like `["DTSG", "setToken", [], ["<token>"]]` and
/// `["Cookie", "set", [], ["_js_<name>", "<value>", ...]]`.
pub fn extract_refresh(payload: &Value) -> SessionRefresh {
    let mut refresh = SessionRefresh::default();

    for envelope in envelopes(payload) {
        let Some(requires) = envelope
            .pointer("/jsmods/require")
            .and_then(Value::as_array)
        else {
            continue;
        };

        for entry in requires {
            let module = entry.get(0).and_then(Value::as_str);
            let method = entry.get(1).and_then(Value::as_str);
            let args = entry.get(3).and_then(Value::as_array);

            match (module, method, args) {
                (Some("DTSG"), Some("setToken"), Some(args)) => {
                    if let Some(token) = args.first().and_then(Value::as_str) {
                        refresh.fb_dtsg = Some(token.to_string());
                    }
                }
                (Some("Cookie"), _, Some(args)) => {
                    let name = args.first().and_then(Value::as_str);
                    let value = args.get(1).and_then(Value::as_str);
                    if let (Some(name), Some(value)) = (name, value) {
                        refresh.cookies.push(RefreshedCookie {
                            name: name.replacen("_js_", "", 1),
                            value: value.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    refresh
}

fn envelopes(payload: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match payload {
        Value::Array(items) => Box::new(items.iter()),
        other => Box::new(std::iter::once(other)),
    }
}
