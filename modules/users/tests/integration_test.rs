//! REST-level tests for the users module.
//!
//! Key points:
//! - Every test runs once per backend: in-memory repository and SeaORM on a
//!   fresh in-memory SQLite database with migrations applied.
//! - Requests go through the real route registration via `tower::ServiceExt::oneshot`.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use common::{create_test_router, send, Backend};

#[tokio::test]
async fn test_user_lifecycle() {
    for backend in Backend::ALL {
        let router = create_test_router(backend).await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/users",
            Some(json!({ "name": "John Doe", "email": "john@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{backend:?}");
        let id = body["data"]["id"].as_i64().expect("id assigned");
        assert!(id > 0);
        assert_eq!(body["data"]["name"], "John Doe");
        assert_eq!(body["data"]["email"], "john@example.com");

        let (status, fetched) = send(&router, "GET", &format!("/api/v1/users/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, body);

        let (status, deleted) =
            send(&router, "DELETE", &format!("/api/v1/users/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, json!({ "message": "User deleted" }));

        let (status, missing) = send(&router, "GET", &format!("/api/v1/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing, json!({ "error": "User not found" }));

        // deleting again is reported as absence, not as a failure
        let (status, again) = send(&router, "DELETE", &format!("/api/v1/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(again, json!({ "error": "User not found" }));
    }
}

#[tokio::test]
async fn test_list_starts_empty() {
    for backend in Backend::ALL {
        let router = create_test_router(backend).await;
        let (status, body) = send(&router, "GET", "/api/v1/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "data": [] }));
    }
}

#[tokio::test]
async fn test_validation_errors() {
    let cases = [
        (
            json!({ "name": "A", "email": "test@example.com" }),
            "Name must be between 2 and 100 characters",
        ),
        (
            json!({ "name": "John", "email": "not-an-email" }),
            "Invalid email format",
        ),
        (
            json!({ "name": "John" }),
            "Name and email are required",
        ),
        (
            json!({ "name": "", "email": "john@example.com" }),
            "Name and email are required",
        ),
    ];

    for backend in Backend::ALL {
        let router = create_test_router(backend).await;
        for (payload, message) in &cases {
            let (status, body) =
                send(&router, "POST", "/api/v1/users", Some(payload.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(body, json!({ "error": message }));
        }

        let (_, list) = send(&router, "GET", "/api/v1/users", None).await;
        assert_eq!(list, json!({ "data": [] }), "nothing stored on rejection");
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    for backend in Backend::ALL {
        let router = create_test_router(backend).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/users")
            .header("content-type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Invalid request body" }));
    }
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    for backend in Backend::ALL {
        let router = create_test_router(backend).await;

        let (status, _) = send(
            &router,
            "POST",
            "/api/v1/users",
            Some(json!({ "name": "First", "email": "same@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/users",
            Some(json!({ "name": "Second", "email": "same@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "Email already exists" }));

        let (_, list) = send(&router, "GET", "/api/v1/users", None).await;
        let matching = list["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|u| u["email"] == "same@example.com")
            .count();
        assert_eq!(matching, 1);
    }
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    for backend in Backend::ALL {
        let router = create_test_router(backend).await;
        for (method, body) in [
            ("GET", None),
            ("DELETE", None),
            (
                "PUT",
                Some(json!({ "name": "John", "email": "john@example.com" })),
            ),
        ] {
            let (status, response) = send(&router, method, "/api/v1/users/abc", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
            assert_eq!(response, json!({ "error": "Invalid user ID" }));
        }
    }
}

#[tokio::test]
async fn test_list_stays_ordered_after_delete() {
    for backend in Backend::ALL {
        let router = create_test_router(backend).await;

        let mut ids = Vec::new();
        for (name, email) in [
            ("Alice", "a@example.com"),
            ("Bob", "b@example.com"),
            ("Carol", "c@example.com"),
        ] {
            let (_, body) = send(
                &router,
                "POST",
                "/api/v1/users",
                Some(json!({ "name": name, "email": email })),
            )
            .await;
            ids.push(body["data"]["id"].as_i64().unwrap());
        }

        let (status, _) = send(&router, "DELETE", &format!("/api/v1/users/{}", ids[1]), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, list) = send(&router, "GET", "/api/v1/users", None).await;
        let listed: Vec<i64> = list["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_i64().unwrap())
            .collect();
        assert_eq!(listed, vec![ids[0], ids[2]], "{backend:?}");
        assert!(listed.windows(2).all(|w| w[0] < w[1]));
    }
}

#[tokio::test]
async fn test_update_user() {
    for backend in Backend::ALL {
        let router = create_test_router(backend).await;

        let (_, alice) = send(
            &router,
            "POST",
            "/api/v1/users",
            Some(json!({ "name": "Alice", "email": "alice@example.com" })),
        )
        .await;
        let (_, bob) = send(
            &router,
            "POST",
            "/api/v1/users",
            Some(json!({ "name": "Bob", "email": "bob@example.com" })),
        )
        .await;
        let alice_id = alice["data"]["id"].as_i64().unwrap();
        let bob_id = bob["data"]["id"].as_i64().unwrap();

        let (status, updated) = send(
            &router,
            "PUT",
            &format!("/api/v1/users/{alice_id}"),
            Some(json!({ "name": "Alice Smith", "email": "alice.smith@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            updated,
            json!({ "data": { "id": alice_id, "name": "Alice Smith", "email": "alice.smith@example.com" } })
        );

        let (status, body) = send(
            &router,
            "PUT",
            &format!("/api/v1/users/{bob_id}"),
            Some(json!({ "name": "Bob", "email": "alice.smith@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "Email already exists" }));

        let (status, body) = send(
            &router,
            "PUT",
            "/api/v1/users/424242",
            Some(json!({ "name": "Nobody", "email": "nobody@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "User not found" }));

        let (status, body) = send(
            &router,
            "PUT",
            &format!("/api/v1/users/{bob_id}"),
            Some(json!({ "name": "B", "email": "bob@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Name must be between 2 and 100 characters" })
        );
    }
}
