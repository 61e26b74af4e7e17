//! changeArchivedStatus over HTTP
//!
//! Covers the wire format and each outcome the pipeline can end in.

#[cfg(test)]
mod tests {
    use crate::common::{
        AJAX_ERROR, ARCHIVE_OK, LOGIN_PAGE, NOT_LOGGED_IN, TEST_FB_DTSG, TEST_USER_ID,
        TestBackend, test_session,
    };
    use mercury_rs::sdk::CHANGE_ARCHIVED_STATUS_PATH;
    use mercury_rs::{ApiError, ConfigBuilder, ErrorKind, MessengerClient, TransportError};
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn respond_with(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(CHANGE_ARCHIVED_STATUS_PATH))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }

    // ==================== Wire Format ====================

    /// Every id becomes an `ids[<id>]` field next to the signing fields
    #[tokio::test]
    async fn test_request_carries_form_and_session() {
        let backend = TestBackend::start().await;

        Mock::given(method("POST"))
            .and(path(CHANGE_ARCHIVED_STATUS_PATH))
            .and(header_exists("cookie"))
            .and(body_string_contains("ids%5B10%5D=true"))
            .and(body_string_contains("ids%5B20%5D=true"))
            .and(body_string_contains(format!("__user={}", TEST_USER_ID)))
            .and(body_string_contains(format!("fb_dtsg={}", TEST_FB_DTSG)))
            .and(body_string_contains("jazoest=2"))
            .and(body_string_contains("__a=1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARCHIVE_OK))
            .expect(1)
            .mount(&backend.server)
            .await;

        backend
            .client
            .change_archived_status(vec!["10", "20"], true)
            .await
            .unwrap();

        let requests = backend.server.received_requests().await.unwrap();
        let cookies = requests[0].headers.get("cookie").unwrap().to_str().unwrap();
        assert!(cookies.contains("xs=session-secret"));
        assert!(cookies.contains(&format!("c_user={}", TEST_USER_ID)));
    }

    #[tokio::test]
    async fn test_unarchive_single_numeric_id() {
        let backend = TestBackend::start().await;

        Mock::given(method("POST"))
            .and(path(CHANGE_ARCHIVED_STATUS_PATH))
            .and(body_string_contains("ids%5B123456789%5D=false"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARCHIVE_OK))
            .expect(1)
            .mount(&backend.server)
            .await;

        backend
            .client
            .change_archived_status(123456789u64, false)
            .await
            .unwrap();
    }

    /// Same input, same payload: no counters or nonces
    #[tokio::test]
    async fn test_repeated_calls_send_identical_bodies() {
        let backend = TestBackend::start().await;

        Mock::given(method("POST"))
            .and(path(CHANGE_ARCHIVED_STATUS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARCHIVE_OK))
            .expect(2)
            .mount(&backend.server)
            .await;

        backend.client.change_archived_status("10", true).await.unwrap();
        backend.client.change_archived_status("10", true).await.unwrap();

        let bodies = backend.received_bodies().await;
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0], bodies[1]);
    }

    #[tokio::test]
    async fn test_empty_list_sends_nothing() {
        let backend = TestBackend::start().await;

        let err = backend
            .client
            .change_archived_status(Vec::<String>::new(), true)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(backend.received_bodies().await.is_empty());
    }

    // ==================== Outcomes ====================

    #[tokio::test]
    async fn test_application_error_forwards_full_payload() {
        let backend = TestBackend::start().await;
        respond_with(
            &backend.server,
            ResponseTemplate::new(200).set_body_string(AJAX_ERROR),
        )
        .await;

        let err = backend
            .client
            .change_archived_status("10", true)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Application);
        assert_eq!(
            err.payload(),
            Some(&json!({
                "__ar": 1,
                "error": 1545012,
                "errorSummary": "Temporary Failure",
                "errorDescription": "There was a temporary error, please try again.",
                "payload": null,
                "lid": "6818475"
            }))
        );
    }

    /// A login page wins over the error-looking script embedded in it
    #[tokio::test]
    async fn test_login_page_is_login_expired() {
        let backend = TestBackend::start().await;
        respond_with(
            &backend.server,
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(LOGIN_PAGE),
        )
        .await;

        let err = backend
            .client
            .change_archived_status("10", true)
            .await
            .unwrap_err();
        assert!(err.is_login_expired());
    }

    #[tokio::test]
    async fn test_login_redirect_is_not_followed() {
        let backend = TestBackend::start().await;
        let login_url = format!("{}/login.php?next=%2F", backend.server.uri());
        respond_with(
            &backend.server,
            ResponseTemplate::new(302).insert_header("location", login_url.as_str()),
        )
        .await;

        let err = backend
            .client
            .change_archived_status("10", true)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LoginExpired);
    }

    #[tokio::test]
    async fn test_not_logged_in_envelope() {
        let backend = TestBackend::start().await;
        respond_with(
            &backend.server,
            ResponseTemplate::new(200).set_body_string(NOT_LOGGED_IN),
        )
        .await;

        let err = backend
            .client
            .change_archived_status("10", true)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::LoginExpired("Not logged in.".to_string()));
    }

    /// Server errors are reported once, never retried
    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let backend = TestBackend::start().await;
        respond_with(
            &backend.server,
            ResponseTemplate::new(500).set_body_string("Internal Server Error"),
        )
        .await;

        let err = backend
            .client
            .change_archived_status("10", true)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Transport(TransportError::HttpStatus { status: 500, .. })
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let backend = TestBackend::start_with(|config| config.timeout_secs(1)).await;
        respond_with(
            &backend.server,
            ResponseTemplate::new(200)
                .set_body_string(ARCHIVE_OK)
                .set_delay(Duration::from_secs(3)),
        )
        .await;

        let err = backend
            .client
            .change_archived_status("10", true)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Bind and release a port so nothing listens on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let closed = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let config = ConfigBuilder::new().base_url(closed).build().unwrap();
        let client = MessengerClient::new(config.clone(), test_session(&config)).unwrap();

        let err = client.change_archived_status("10", true).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Network(_))));
    }

    // ==================== Callback Form ====================

    #[tokio::test]
    async fn test_callback_gets_application_payload() {
        let backend = TestBackend::start().await;
        respond_with(
            &backend.server,
            ResponseTemplate::new(200)
                .set_body_string(r#"{"error": "ajax error", "errorSummary": "..."}"#),
        )
        .await;

        let (tx, rx) = oneshot::channel();
        backend
            .client
            .change_archived_status_with_callback(
                vec!["10"],
                true,
                Some(Box::new(move |err| {
                    let _ = tx.send(err);
                })),
            )
            .unwrap()
            .await
            .unwrap();

        let err = rx.await.unwrap().unwrap();
        assert_eq!(
            err.payload(),
            Some(&json!({"error": "ajax error", "errorSummary": "..."}))
        );
    }

    #[tokio::test]
    async fn test_callback_without_error_on_success() {
        let backend = TestBackend::start().await;
        respond_with(
            &backend.server,
            ResponseTemplate::new(200).set_body_string(r#"{"archived_ids":["10"]}"#),
        )
        .await;

        let (tx, rx) = oneshot::channel();
        backend
            .client
            .change_archived_status_with_callback(
                "10",
                true,
                Some(Box::new(move |err| {
                    let _ = tx.send(err);
                })),
            )
            .unwrap()
            .await
            .unwrap();

        assert!(rx.await.unwrap().is_none());
    }

    /// Concurrent calls share the session without coordinating
    #[tokio::test]
    async fn test_concurrent_calls() {
        let backend = TestBackend::start().await;

        Mock::given(method("POST"))
            .and(path(CHANGE_ARCHIVED_STATUS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARCHIVE_OK))
            .expect(5)
            .mount(&backend.server)
            .await;

        let calls = (0u64..5).map(|id| backend.client.change_archived_status(id, true));
        let results = futures::future::join_all(calls).await;

        assert!(results.iter().all(Result::is_ok));
    }

    #[tokio::test]
    async fn test_session_on_other_origin_is_rejected() {
        let backend = TestBackend::start().await;
        let config = ConfigBuilder::new()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();

        let err = MessengerClient::new(config, backend.session.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
