//! Canned backend responses

/// Accepted archive change
pub const ARCHIVE_OK: &str = r#"for (;;);{"__ar":1,"payload":null,"archived_ids":["10"]}"#;

/// Backend rejection with diagnostic fields
pub const AJAX_ERROR: &str = r#"for (;;);{"__ar":1,"error":1545012,"errorSummary":"Temporary Failure","errorDescription":"There was a temporary error, please try again.","payload":null,"lid":"6818475"}"#;

/// "Not logged in" inside a well-formed envelope
pub const NOT_LOGGED_IN: &str =
    r#"for (;;);{"__ar":1,"error":1357001,"errorSummary":"Not Logged In","payload":null}"#;

/// Login page served instead of an envelope; the inline script would look
/// like an application error if it were ever parsed
pub const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en" id="facebook"><head><title>Log in to Facebook</title></head>
<body>
<form id="login_form" action="/login/device-based/regular/login/?login_attempt=1" method="post">
<input type="email" name="email"/><input type="password" name="pass"/>
<button id="loginbutton" type="submit">Log In</button>
</form>
<script>handle({"error":"ajax error","errorSummary":"never surfaced"});</script>
</body></html>"#;

/// Accepted response that also rotates the signing token
pub fn token_rotation(token: &str) -> String {
    format!(
        r#"for (;;);{{"__ar":1,"payload":null,"jsmods":{{"require":[["DTSG","setToken",[],["{}"]]]}}}}"#,
        token
    )
}
