mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::{Models, numbers};
use multidx::web::router;
use tower::ServiceExt;

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn encode_form(values: &[String]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("f{i}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn root_redirects_to_the_first_page() {
    let app = router(Models::answering(0).registry());

    let response = app.oneshot(get("/")).await.expect("response");

    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
        Some(&b"/parkinsons"[..])
    );
}

#[tokio::test]
async fn health_reports_ok() {
    let app = router(Models::answering(0).registry());

    let response = app.oneshot(get("/health")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn each_page_renders_navigation_and_form() {
    for slug in ["parkinsons", "kidney", "liver"] {
        let app = router(Models::answering(0).registry());

        let response = app.oneshot(get(&format!("/{slug}"))).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK, "{slug}");
        let html = body_text(response).await;
        assert!(html.contains("Multiple Disease Prediction System"));
        assert!(html.contains("Parkinson&#39;s Prediction"));
        assert!(html.contains("Kidney Prediction"));
        assert!(html.contains("Liver Prediction"));
        assert!(html.contains(&format!("action=\"/{slug}\"")));
        assert!(!html.contains("class=\"outcome"));
    }
}

#[tokio::test]
async fn unknown_page_is_not_found() {
    let app = router(Models::answering(0).registry());

    let response = app.oneshot(get("/heart")).await.expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn liver_submission_shows_verdict_and_keeps_values() {
    let models = Models::answering(0);
    let app = router(models.registry());

    let response = app
        .oneshot(post("/liver", encode_form(&numbers(10))))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No Liver Disease detected"));
    assert!(html.contains("class=\"outcome safe\""));
    assert!(html.contains("value=\"10.5\""));
    assert_eq!(models.liver.calls(), 1);
    let expected: Vec<f64> = (1..=10).map(|i| f64::from(i) + 0.5).collect();
    assert_eq!(models.liver.last_seen(), Some(expected));
}

#[tokio::test]
async fn kidney_blank_submission_shows_warning_without_dispatch() {
    let models = Models::answering(1);
    let app = router(models.registry());
    let mut values = vec!["Female".to_string()];
    values.extend(numbers(24));
    values[5] = String::new();

    let response = app
        .oneshot(post("/kidney", encode_form(&values)))
        .await
        .expect("response");

    let html = body_text(response).await;
    assert!(html.contains("Please fill in all input fields before predicting."));
    assert!(html.contains("class=\"outcome warning\""));
    assert!(html.contains("<option value=\"Female\" selected>Female</option>"));
    assert_eq!(models.kidney.calls(), 0);
}

#[tokio::test]
async fn submitted_markup_is_escaped() {
    let models = Models::answering(1);
    let app = router(models.registry());
    let mut values = numbers(22);
    values[0] = "%3Cscript%3E".to_string();

    let response = app
        .oneshot(post("/parkinsons", encode_form(&values)))
        .await
        .expect("response");

    let html = body_text(response).await;
    assert!(!html.contains("<script>"));
    assert!(html.contains("value=\"&lt;script&gt;\""));
    assert!(html.contains("Invalid input! Please enter numerical values only."));
    assert_eq!(models.parkinsons.calls(), 0);
}

#[tokio::test]
async fn liver_model_arity_mismatch_renders_as_an_error() {
    let registry = multidx::registry::ModelRegistry::new(
        common::Recording::new(22, 1),
        common::Recording::new(24, 1),
        common::Recording::new(9, 1),
    );
    let app = router(registry);

    let response = app
        .oneshot(post("/liver", encode_form(&numbers(10))))
        .await
        .expect("response");

    let html = body_text(response).await;
    assert!(html.contains("class=\"outcome error\""));
    assert!(html.contains("Feature count mismatch: Expected 9, but got 10."));
}
