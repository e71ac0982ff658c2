use crate::common::{TestApp, routes};

async fn seeded_app() -> TestApp {
    let app = TestApp::spawn().await;
    app.insert_movie("Interstellar", "sci-fi", &["space", "drama"])
        .await;
    app.insert_movie("Heat", "crime", &["heist"]).await;
    app.insert_movie("Inception", "sci-fi", &["dreams", "heist"])
        .await;
    app
}

fn titles(body: &serde_json::Value) -> Vec<&str> {
    body.as_array()
        .expect("list response should be an array")
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn lists_all_movies_in_title_order() {
    let app = seeded_app().await;

    let res = app.get_without_token(routes::MOVIES).await;

    assert_eq!(res.status, 200);
    assert_eq!(titles(&res.body), vec!["Heat", "Inception", "Interstellar"]);
    assert_eq!(res.body[0]["rating"], 0.0);
    assert_eq!(res.body[0]["tags"], serde_json::json!(["heist"]));
}

#[tokio::test]
async fn search_is_a_case_insensitive_substring_match() {
    let app = seeded_app().await;

    let res = app
        .get_without_token(&format!("{}?search=INTER", routes::MOVIES))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(titles(&res.body), vec!["Interstellar"]);
}

#[tokio::test]
async fn category_filter_is_exact_and_star_means_any() {
    let app = seeded_app().await;

    let res = app
        .get_without_token(&format!("{}?category=sci-fi", routes::MOVIES))
        .await;
    assert_eq!(titles(&res.body), vec!["Inception", "Interstellar"]);

    let res = app
        .get_without_token(&format!("{}?category=*", routes::MOVIES))
        .await;
    assert_eq!(titles(&res.body).len(), 3);
}

#[tokio::test]
async fn tag_filter_matches_any_listed_tag() {
    let app = seeded_app().await;

    let res = app
        .get_without_token(&format!("{}?tags=heist,%20space", routes::MOVIES))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(titles(&res.body), vec!["Heat", "Inception", "Interstellar"]);

    let res = app
        .get_without_token(&format!("{}?tags=dreams&category=sci-fi", routes::MOVIES))
        .await;
    assert_eq!(titles(&res.body), vec!["Inception"]);
}

#[tokio::test]
async fn get_returns_first_title_containing_the_text() {
    let app = seeded_app().await;

    let res = app.get_without_token(&routes::movie("in")).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["title"], "Inception");
    assert_eq!(res.body["category"], "sci-fi");
}

#[tokio::test]
async fn get_unknown_movie_is_not_found() {
    let app = seeded_app().await;

    let res = app.get_without_token(&routes::movie("Casablanca")).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
