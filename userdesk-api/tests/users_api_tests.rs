/// Integration tests for the user management API
///
/// These run the full router (extractors, validation, service rules and
/// error mapping) over the in-memory repository.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{error_fields, user_payload, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_create_and_get_user() {
    let ctx = TestContext::new();

    let (id, password) = ctx.create_user("Ada@Example.com").await;
    assert_eq!(id, 1);
    assert_eq!(password.len(), 16);

    let (status, body) = ctx.get(&format!("/v1/users/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["surname"], "Lovelace");
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["status"], "active");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_get_missing_user() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/v1/users/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "User with ID: 7 not found");
}

#[tokio::test]
async fn test_invalid_user_id() {
    let ctx = TestContext::new();

    for uri in ["/v1/users/abc", "/v1/users/0", "/v1/users/-3"] {
        let (status, body) = ctx.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["message"], "Invalid user id parameter");
    }

    let (status, _) = ctx.post("/v1/users/abc/suspend", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_users_pagination() {
    let ctx = TestContext::new();
    for i in 0..3 {
        ctx.create_user(&format!("user{}@example.com", i)).await;
    }

    let (status, body) = ctx.get("/v1/users?page=2&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_users"], 3);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 2);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], 3);

    // Out-of-range and unparsable values fall back
    let (status, body) = ctx.get("/v1/users?page=0&limit=500").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 100);
    assert_eq!(body["users"].as_array().unwrap().len(), 3);

    let (status, body) = ctx.get("/v1/users?page=x&limit=y").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
}

#[tokio::test]
async fn test_list_users_repeated_params_use_first_value() {
    let ctx = TestContext::new();
    for i in 0..3 {
        ctx.create_user(&format!("user{}@example.com", i)).await;
    }

    let (status, body) = ctx.get("/v1/users?page=1&page=2&limit=2&limit=oops").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["users"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_users_empty() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/v1/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_users"], 0);
    assert_eq!(body["users"], json!([]));
}

#[tokio::test]
async fn test_malformed_json() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, body) = ctx.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["message"], "Invalid request payload");
}

#[tokio::test]
async fn test_create_user_validation() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post(
            "/v1/users",
            Some(json!({ "name": "", "email": "not-an-email", "phone": "12ab" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(
        error_fields(&body),
        vec![
            ("email".to_string(), "email".to_string()),
            ("name".to_string(), "required".to_string()),
            ("phone".to_string(), "phone".to_string()),
            ("surname".to_string(), "required".to_string()),
        ]
    );
    assert_eq!(body["details"][1]["message"], "Name is required");
}

#[tokio::test]
async fn test_validation_messages_follow_accept_language() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/v1/users",
            Some(json!({ "name": "Ada", "surname": "Lovelace" })),
            Some("tr-TR,tr;q=0.9,en;q=0.5"),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_fields(&body),
        vec![("email".to_string(), "required".to_string())]
    );
    assert_eq!(body["details"][0]["message"], "E-posta alanı zorunludur");
}

#[tokio::test]
async fn test_create_user_trims_padded_fields() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post(
            "/v1/users",
            Some(json!({
                "name": format!("{} ", "A".repeat(50)),
                "surname": "  Lovelace",
                "email": "  Ada@Example.com  "
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, user) = ctx.get(&format!("/v1/users/{}", body["id"])).await;
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["surname"], "Lovelace");
    assert_eq!(user["name"].as_str().unwrap().len(), 50);
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let ctx = TestContext::new();
    ctx.create_user("ada@example.com").await;

    let (status, body) = ctx
        .post("/v1/users", Some(user_payload("ADA@example.com")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_status_lifecycle() {
    let ctx = TestContext::new();
    let (id, _) = ctx.create_user("ada@example.com").await;

    // Active users cannot be activated
    let (status, body) = ctx.post(&format!("/v1/users/{}/activate", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Cannot activate user with ID: 1 while it is active"
    );

    let (status, body) = ctx.post(&format!("/v1/users/{}/suspend", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User with ID: 1 successfully suspended");

    let (status, _) = ctx.post(&format!("/v1/users/{}/suspend", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = ctx
        .post(&format!("/v1/users/{}/deactivate", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User with ID: 1 successfully deactivated");

    let (_, user) = ctx.get(&format!("/v1/users/{}", id)).await;
    assert_eq!(user["status"], "deactivated");

    // Deactivated users can't be suspended, only reactivated
    let (status, _) = ctx.post(&format!("/v1/users/{}/suspend", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = ctx.post(&format!("/v1/users/{}/activate", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User with ID: 1 successfully reactivated");

    let (_, user) = ctx.get(&format!("/v1/users/{}", id)).await;
    assert_eq!(user["status"], "active");
}

#[tokio::test]
async fn test_status_change_on_missing_user() {
    let ctx = TestContext::new();

    for action in ["suspend", "deactivate", "activate"] {
        let (status, _) = ctx.post(&format!("/v1/users/42/{}", action), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", action);
    }
}

#[tokio::test]
async fn test_update_user() {
    let ctx = TestContext::new();
    let (id, _) = ctx.create_user("ada@example.com").await;
    ctx.create_user("grace@example.com").await;

    let (status, body) = ctx
        .put(
            &format!("/v1/users/{}", id),
            json!({
                "name": "Augusta",
                "surname": "King",
                "email": "augusta@example.com",
                "phone": ""
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "User with ID: 1 successfully updated with the given data"
    );

    let (_, user) = ctx.get(&format!("/v1/users/{}", id)).await;
    assert_eq!(user["name"], "Augusta");
    assert_eq!(user["email"], "augusta@example.com");
    assert_eq!(user["phone"], json!(null));

    // Keeping your own email is fine, taking another user's is not
    let (status, _) = ctx
        .put(&format!("/v1/users/{}", id), user_payload("augusta@example.com"))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .put(&format!("/v1/users/{}", id), user_payload("grace@example.com"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_user_errors() {
    let ctx = TestContext::new();

    let (status, _) = ctx.put("/v1/users/9", user_payload("x@example.com")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (id, _) = ctx.create_user("ada@example.com").await;
    let (status, body) = ctx
        .put(&format!("/v1/users/{}", id), json!({ "name": "Ada" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_fields(&body),
        vec![
            ("email".to_string(), "required".to_string()),
            ("surname".to_string(), "required".to_string()),
        ]
    );

    ctx.post(&format!("/v1/users/{}/deactivate", id), None).await;
    let (status, _) = ctx
        .put(&format!("/v1/users/{}", id), user_payload("ada@example.com"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_password() {
    let ctx = TestContext::new();
    let (id, password) = ctx.create_user("ada@example.com").await;
    let uri = format!("/v1/users/{}/password", id);

    let (status, body) = ctx
        .put(
            &uri,
            json!({
                "current_password": password,
                "new_password": "N3w!Password",
                "confirm_password": "N3w!Password"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Password of user with ID: 1 successfully updated"
    );

    // The old password no longer works
    let (status, body) = ctx
        .put(
            &uri,
            json!({
                "current_password": password,
                "new_password": "An0ther!Pass",
                "confirm_password": "An0ther!Pass"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_fields(&body),
        vec![("current_password".to_string(), "password_incorrect".to_string())]
    );

    // Reusing the current password is rejected
    let (status, body) = ctx
        .put(
            &uri,
            json!({
                "current_password": "N3w!Password",
                "new_password": "N3w!Password",
                "confirm_password": "N3w!Password"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_fields(&body),
        vec![("new_password".to_string(), "password_reused".to_string())]
    );
}

#[tokio::test]
async fn test_update_password_validation() {
    let ctx = TestContext::new();
    let (id, _) = ctx.create_user("ada@example.com").await;
    let uri = format!("/v1/users/{}/password", id);

    let (status, body) = ctx
        .put(
            &uri,
            json!({
                "current_password": "",
                "new_password": "weakpass1!",
                "confirm_password": "different"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_fields(&body),
        vec![
            ("confirm_password".to_string(), "must_match".to_string()),
            ("current_password".to_string(), "required".to_string()),
            ("new_password".to_string(), "password_uppercase".to_string()),
        ]
    );
    assert_eq!(
        body["details"][0]["message"],
        "Password confirmation must match new password"
    );
}

#[tokio::test]
async fn test_update_password_on_inactive_user() {
    let ctx = TestContext::new();
    let (id, password) = ctx.create_user("ada@example.com").await;
    ctx.post(&format!("/v1/users/{}/deactivate", id), None).await;

    let (status, body) = ctx
        .put(
            &format!("/v1/users/{}/password", id),
            json!({
                "current_password": password,
                "new_password": "N3w!Password",
                "confirm_password": "N3w!Password"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Cannot change the password of user with ID: 1 while it is deactivated"
    );
}
