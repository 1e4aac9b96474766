#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::get,
        Router,
    };
    use base64::prelude::*;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::AdminConfig;
    use crate::routes::admin::{export_submissions_csv, list_submissions};
    use crate::state::AppState;
    use crate::tests::support::{setup_state, setup_state_with_admin};

    fn admin_config() -> AdminConfig {
        AdminConfig {
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            allowed_ips: vec![],
        }
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/admin/writing-submissions", get(list_submissions))
            .route("/admin/writing-submissions.csv", get(export_submissions_csv))
            .with_state(state)
    }

    fn request(uri: &str, credentials: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(creds) = credentials {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Basic {}", BASE64_STANDARD.encode(creds)),
            );
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn insert_submission(pool: &sqlx::SqlitePool, first_name: &str, email: &str) {
        sqlx::query(
            "INSERT INTO writing_submissions (first_name, last_name, email) VALUES (?1, 'Doe', ?2)",
        )
        .bind(first_name)
        .bind(email)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn unconfigured_admin_answers_service_unavailable() {
        let state = setup_state(None).await;

        let response =
            app(state).oneshot(request("/admin/writing-submissions", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn missing_credentials_are_challenged() {
        let state = setup_state_with_admin(None, admin_config()).await;

        let response =
            app(state).oneshot(request("/admin/writing-submissions", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenge =
            response.headers().get(header::WWW_AUTHENTICATE).and_then(|h| h.to_str().ok());
        assert!(challenge.unwrap().starts_with("Basic"));
    }

    #[tokio::test]
    async fn wrong_credentials_are_rejected() {
        let state = setup_state_with_admin(None, admin_config()).await;

        let response = app(state)
            .oneshot(request("/admin/writing-submissions", Some("admin:wrong")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn repeated_failures_lock_the_ip_out() {
        let state = setup_state_with_admin(None, admin_config()).await;
        let router = app(state);

        for _ in 0..10 {
            let response = router
                .clone()
                .oneshot(request("/admin/writing-submissions", Some("admin:wrong")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        // Even valid credentials are refused once the window is exhausted.
        let response = router
            .oneshot(request("/admin/writing-submissions", Some("admin:secret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn ip_allowlist_blocks_other_sources() {
        let mut config = admin_config();
        config.allowed_ips = vec!["203.0.113.7".to_string()];
        let state = setup_state_with_admin(None, config).await;
        let router = app(state);

        // No forwarding headers: the request counts as 127.0.0.1.
        let response = router
            .clone()
            .oneshot(request("/admin/writing-submissions", Some("admin:secret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let mut allowed = request("/admin/writing-submissions", Some("admin:secret"));
        allowed.headers_mut().insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
        let response = router.oneshot(allowed).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn list_returns_recent_submissions() {
        let state = setup_state_with_admin(None, admin_config()).await;
        insert_submission(&state.db, "Jane", "jane@example.com").await;
        insert_submission(&state.db, "John", "john@example.com").await;

        let response = app(state)
            .oneshot(request("/admin/writing-submissions?limit=1", Some("admin:secret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["total"], 1);
        assert_eq!(v["submissions"][0]["last_name"], "Doe");
    }

    #[tokio::test]
    async fn csv_export_carries_header_and_rows() {
        let state = setup_state_with_admin(None, admin_config()).await;
        insert_submission(&state.db, "Quote\"Name", "jane@example.com").await;

        let response = app(state)
            .oneshot(request("/admin/writing-submissions.csv", Some("admin:secret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type =
            response.headers().get(header::CONTENT_TYPE).and_then(|h| h.to_str().ok()).unwrap();
        assert!(content_type.starts_with("text/csv"));
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|h| h.to_str().ok())
            .unwrap();
        assert!(disposition.contains("writing-submissions-"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"id\",\"created_at\",\"first_name\",\"last_name\",\"email\",\"source_ip\",\"user_agent\""
        );
        let row = lines.next().unwrap();
        assert!(row.contains("\"Quote\"\"Name\""));
        assert!(row.contains("\"jane@example.com\""));
    }
}
