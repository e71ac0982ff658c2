use serde_json::json;

use crate::common::{PASSWORD, TestApp, registration, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "email": "Alice@Example.com", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_taken_username() {
        let app = TestApp::spawn().await;

        let first = app
            .post_without_token(routes::REGISTER, &registration("alice"))
            .await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "email": "other@example.com", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_used_email() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice").await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alicia", "email": "ALICE@example.com", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_without_a_valid_email() {
        let app = TestApp::spawn().await;

        for email in ["", "not-an-address"] {
            let res = app
                .post_without_token(
                    routes::REGISTER,
                    &json!({"username": "alice", "email": email, "password": PASSWORD}),
                )
                .await;
            assert_eq!(res.status, 400, "{email:?} should be rejected");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "password": PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "email": "alice@example.com", "password": "short"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_an_invalid_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "no spaces!", "email": "x@example.com", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_raw(routes::REGISTER, r#"{"username": "alice""#, "unused")
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_receives_a_member_token() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["role"], "member");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "not-the-password"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_the_same_way() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "nobody", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn returns_the_token_owner() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["role"], "member");
        assert!(res.body["id"].is_number());
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn forged_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not.a.jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
