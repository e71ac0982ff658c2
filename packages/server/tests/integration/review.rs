use serde_json::json;

use crate::common::{TestApp, routes};

const MOVIE: &str = "Interstellar";

async fn app_with_movie() -> TestApp {
    let app = TestApp::spawn().await;
    app.insert_movie(MOVIE, "sci-fi", &["space"]).await;
    app
}

mod create {
    use super::*;

    #[tokio::test]
    async fn review_is_published_and_rating_recomputed() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(
                routes::REVIEWS,
                &json!({"title": MOVIE, "review": "Stunning.", "rating": 5}),
                &alice,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["movieRating"], 5.0);
        assert_eq!(res.body["review"]["username"], "alice");
        assert_eq!(res.body["review"]["title"], MOVIE);
        assert_eq!(res.body["review"]["review"], "Stunning.");
        assert_eq!(app.movie_rating(MOVIE).await, 5.0);
    }

    #[tokio::test]
    async fn legacy_field_names_are_accepted() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(
                routes::REVIEWS,
                &json!({"movie": MOVIE, "comment": "Old client.", "rating": 4}),
                &alice,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["review"]["review"], "Old client.");
    }

    #[tokio::test]
    async fn author_comes_from_the_token_not_the_body() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(
                routes::REVIEWS,
                &json!({"title": MOVIE, "rating": 3, "username": "mallory"}),
                &alice,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["review"]["username"], "alice");
        assert_eq!(res.body["review"]["review"], "");
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = app_with_movie().await;

        let res = app
            .post_without_token(routes::REVIEWS, &json!({"title": MOVIE, "rating": 4}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn missing_title_is_reported_before_missing_token() {
        let app = app_with_movie().await;

        let res = app
            .post_without_token(routes::REVIEWS, &json!({"rating": 4}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn out_of_range_and_non_numeric_ratings_are_rejected() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;

        for rating in [json!(5.5), json!(-1), json!("five"), json!(null)] {
            let res = app
                .post_with_token(
                    routes::REVIEWS,
                    &json!({"title": MOVIE, "rating": rating}),
                    &alice,
                )
                .await;
            assert_eq!(res.status, 400, "rating {rating} should be rejected");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }

        assert_eq!(app.movie_rating(MOVIE).await, 0.0);
    }

    #[tokio::test]
    async fn padded_title_is_an_unknown_movie() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(
                routes::REVIEWS,
                &json!({"title": format!("  {MOVIE} "), "rating": 4}),
                &alice,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MOVIE_NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_movie_is_rejected() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(
                routes::REVIEWS,
                &json!({"title": "Casablanca", "rating": 4}),
                &alice,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MOVIE_NOT_FOUND");
    }

    #[tokio::test]
    async fn second_review_of_the_same_movie_conflicts() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;
        app.create_review(&alice, MOVIE, 5.0).await;

        let res = app
            .post_with_token(routes::REVIEWS, &json!({"title": MOVIE, "rating": 1}), &alice)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
        assert_eq!(app.movie_rating(MOVIE).await, 5.0);
    }

    #[tokio::test]
    async fn concurrent_duplicates_yield_exactly_one_review() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;
        let body = json!({"title": MOVIE, "rating": 4});

        let (first, second) = tokio::join!(
            app.post_with_token(routes::REVIEWS, &body, &alice),
            app.post_with_token(routes::REVIEWS, &body, &alice),
        );

        let mut statuses = [first.status, second.status];
        statuses.sort();
        assert_eq!(statuses, [201, 409]);

        let list = app
            .get_without_token(&format!("{}?username=alice", routes::REVIEWS))
            .await;
        assert_eq!(list.body.as_array().unwrap().len(), 1);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn filters_by_title_and_author_newest_first() {
        let app = app_with_movie().await;
        app.insert_movie("Heat", "crime", &[]).await;
        let alice = app.create_authenticated_user("alice").await;
        let bob = app.create_authenticated_user("bob").await;

        let first = app.create_review(&alice, MOVIE, 5.0).await;
        let second = app.create_review(&bob, MOVIE, 4.0).await;
        app.create_review(&alice, "Heat", 3.0).await;

        let res = app
            .get_without_token(&format!("{}?title={MOVIE}", routes::REVIEWS))
            .await;
        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![second as i64, first as i64]);

        let res = app
            .get_without_token(&format!("{}?username=alice", routes::REVIEWS))
            .await;
        assert_eq!(res.body.as_array().unwrap().len(), 2);

        let res = app.get_without_token(routes::REVIEWS).await;
        assert_eq!(res.body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn malformed_ids_get_a_json_validation_error() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;

        let res = app
            .delete_with_token("/api/v1/reviews/abc", &alice)
            .await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app.get_without_token("/api/v1/reviews/99999999999").await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app
            .patch_with_token("/api/v1/reviews/1.5", &json!({"rating": 1}), &alice)
            .await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn get_by_id_and_missing_id() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;
        let id = app.create_review(&alice, MOVIE, 5.0).await;

        let res = app.get_without_token(&routes::review(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.id(), id);

        let res = app.get_without_token(&routes::review(id + 100)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn owner_can_change_rating_and_comment() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;
        let id = app.create_review(&alice, MOVIE, 5.0).await;

        let res = app
            .patch_with_token(
                &routes::review(id),
                &json!({"rating": 2, "review": "Second viewing was weaker."}),
                &alice,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Review updated");
        assert_eq!(res.body["movieRating"], 2.0);
        assert_eq!(res.body["review"]["review"], "Second viewing was weaker.");

        let fetched = app.get_without_token(&routes::review(id)).await;
        assert_eq!(fetched.body["rating"], 2.0);
    }

    #[tokio::test]
    async fn omitted_fields_keep_their_value() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;
        let id = app.create_review(&alice, MOVIE, 5.0).await;

        let res = app
            .patch_with_token(&routes::review(id), &json!({"comment": "Edited."}), &alice)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["review"]["rating"], 5.0);
        assert_eq!(res.body["review"]["review"], "Edited.");
    }

    #[tokio::test]
    async fn invalid_rating_leaves_review_untouched() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;
        let id = app.create_review(&alice, MOVIE, 5.0).await;

        let res = app
            .patch_with_token(&routes::review(id), &json!({"rating": 9}), &alice)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        let fetched = app.get_without_token(&routes::review(id)).await;
        assert_eq!(fetched.body["rating"], 5.0);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;
        let carol = app.create_authenticated_user("carol").await;
        let id = app.create_review(&alice, MOVIE, 5.0).await;

        let res = app
            .patch_with_token(&routes::review(id), &json!({"rating": 1}), &carol)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn missing_review_is_reported_before_ownership() {
        let app = app_with_movie().await;
        let carol = app.create_authenticated_user("carol").await;

        let res = app
            .patch_with_token(&routes::review(4242), &json!({"rating": 1}), &carol)
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn anonymous_update_is_rejected() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;
        let id = app.create_review(&alice, MOVIE, 5.0).await;

        let res = app
            .patch_without_token(&routes::review(id), &json!({"rating": 1}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn owner_can_delete_and_last_delete_resets_rating() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;
        let id = app.create_review(&alice, MOVIE, 4.0).await;

        let res = app.delete_with_token(&routes::review(id), &alice).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Review deleted");
        assert_eq!(res.body["movieRating"], 0.0);
        assert_eq!(app.movie_rating(MOVIE).await, 0.0);

        let fetched = app.get_without_token(&routes::review(id)).await;
        assert_eq!(fetched.status, 404);
    }

    #[tokio::test]
    async fn anonymous_delete_is_rejected() {
        let app = app_with_movie().await;
        let alice = app.create_authenticated_user("alice").await;
        let id = app.create_review(&alice, MOVIE, 4.0).await;

        let res = app.delete_without_token(&routes::review(id)).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

/// Two ratings, an edit, a refused duplicate, a refused foreign delete, then
/// both reviews withdrawn.
#[tokio::test]
async fn rating_follows_the_review_lifecycle() {
    let app = app_with_movie().await;
    let alice = app.create_authenticated_user("alice").await;
    let bob = app.create_authenticated_user("bob").await;
    let carol = app.create_authenticated_user("carol").await;

    // Two ratings.
    assert_eq!(app.movie_rating(MOVIE).await, 0.0);
    let alice_review = app.create_review(&alice, MOVIE, 5.0).await;
    assert_eq!(app.movie_rating(MOVIE).await, 5.0);
    let bob_review = app.create_review(&bob, MOVIE, 4.0).await;
    assert_eq!(app.movie_rating(MOVIE).await, 4.5);

    // Alice lowers her rating.
    let res = app
        .patch_with_token(&routes::review(alice_review), &json!({"rating": 3}), &alice)
        .await;
    assert_eq!(res.body["movieRating"], 3.5);

    // A second review by alice is refused.
    let res = app
        .post_with_token(routes::REVIEWS, &json!({"title": MOVIE, "rating": 1}), &alice)
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(app.movie_rating(MOVIE).await, 3.5);

    // Carol cannot delete alice's review.
    let res = app
        .delete_with_token(&routes::review(alice_review), &carol)
        .await;
    assert_eq!(res.status, 403);
    let still_there = app.get_without_token(&routes::review(alice_review)).await;
    assert_eq!(still_there.status, 200);

    // Bob withdraws.
    let res = app.delete_with_token(&routes::review(bob_review), &bob).await;
    assert_eq!(res.body["movieRating"], 3.0);

    // The last review goes.
    let res = app
        .delete_with_token(&routes::review(alice_review), &alice)
        .await;
    assert_eq!(res.body["movieRating"], 0.0);
    assert_eq!(app.movie_rating(MOVIE).await, 0.0);
}
