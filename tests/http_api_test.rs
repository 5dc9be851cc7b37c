// ==========================================
// End-to-end HTTP tests
// ==========================================
// Serve the real router on an ephemeral port and drive it with reqwest,
// checking status codes and wire-format field names.
// ==========================================

mod helpers;

use std::sync::Arc;

use serde_json::{json, Value};

use helpers::api_test_helper::ApiTestEnv;
use spooltrack::http;

/// Spin up the router on 127.0.0.1:0 and return its base URL.
///
/// The env (and with it the temp database) must outlive the returned URL.
async fn serve(env: &ApiTestEnv) -> String {
    let state = Arc::new(spooltrack::app::AppState::new(&env.db_path).unwrap());
    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn filament_body() -> Value {
    json!({
        "brand": "Prusament",
        "material": "PLA",
        "colorName": "Galaxy Black",
        "colorHex": "#1a1a2e",
        "diameter": 1.75,
        "totalWeight": 1000.0,
        "remainingWeight": 1000.0,
        "price": 24.99
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let env = ApiTestEnv::new();
    let base = serve(&env).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn test_filament_lifecycle_over_http() {
    let env = ApiTestEnv::new();
    let base = serve(&env).await;
    let client = reqwest::Client::new();

    // create
    let resp = client
        .post(format!("{base}/filaments"))
        .json(&filament_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["colorName"], json!("Galaxy Black"));
    assert_eq!(created["opened"], json!(false));

    // get with usage history
    let resp = client
        .get(format!("{base}/filaments/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let detail: Value = resp.json().await.unwrap();
    assert_eq!(detail["id"], created["id"]);
    assert_eq!(detail["usages"], json!([]));

    // patch
    let resp = client
        .patch(format!("{base}/filaments/{id}"))
        .json(&json!({ "opened": true, "notes": "in use" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["opened"], json!(true));
    assert_eq!(updated["brand"], json!("Prusament"));

    // usage
    let resp = client
        .post(format!("{base}/filaments/{id}/usage"))
        .json(&json!({ "gramsUsed": 250.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = client
        .get(format!("{base}/filaments/{id}"))
        .send()
        .await
        .unwrap();
    let detail: Value = resp.json().await.unwrap();
    assert_eq!(detail["remainingWeight"], json!(750.0));
    assert_eq!(detail["usages"].as_array().unwrap().len(), 1);

    // delete, then 404
    let resp = client
        .delete(format!("{base}/filaments/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let resp = client
        .get(format!("{base}/filaments/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_list_filaments_query_params() {
    let env = ApiTestEnv::new();
    let base = serve(&env).await;
    let client = reqwest::Client::new();

    for (brand, material) in [("Prusament", "PLA"), ("eSUN", "PETG"), ("Sunlu", "PLA")] {
        let mut body = filament_body();
        body["brand"] = json!(brand);
        body["material"] = json!(material);
        let resp = client
            .post(format!("{base}/filaments"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
    }

    let resp = client
        .get(format!("{base}/filaments?material=PLA&page=1&limit=10"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["pagination"]["total"], json!(2));
    assert_eq!(page["pagination"]["totalPages"], json!(1));
    assert_eq!(page["data"].as_array().unwrap().len(), 2);

    let resp = client
        .get(format!("{base}/filaments?q=esun"))
        .send()
        .await
        .unwrap();
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["pagination"]["total"], json!(1));
    assert_eq!(page["data"][0]["brand"], json!("eSUN"));
}

#[tokio::test]
async fn test_validation_errors_are_400_with_violations() {
    let env = ApiTestEnv::new();
    let base = serve(&env).await;
    let client = reqwest::Client::new();

    let mut body = filament_body();
    body["brand"] = json!("");
    body["remainingWeight"] = json!(1500.0);
    let resp = client
        .post(format!("{base}/filaments"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let err: Value = resp.json().await.unwrap();
    assert!(err["error"].as_str().unwrap().contains("validation"));
    let violations = err["violations"].as_array().unwrap();
    assert!(violations.iter().any(|v| v["field"] == json!("brand")));
    assert!(violations
        .iter()
        .any(|v| v["field"] == json!("remainingWeight")));
}

#[tokio::test]
async fn test_overdraw_over_http_is_400() {
    let env = ApiTestEnv::new();
    let base = serve(&env).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/filaments"))
        .json(&filament_body())
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = client
        .post(format!("{base}/filaments/{id}/usage"))
        .json(&json!({ "gramsUsed": 5000.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let err: Value = resp.json().await.unwrap();
    let msg = err["error"].as_str().unwrap();
    assert!(msg.contains("5000"));
    assert!(msg.contains("1000"));
}

#[tokio::test]
async fn test_printer_nozzle_model_routes() {
    let env = ApiTestEnv::new();
    let base = serve(&env).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/nozzles"))
        .json(&json!({ "size": 0.4, "material": "Brass", "condition": "New" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let nozzle: Value = resp.json().await.unwrap();

    let resp = client
        .post(format!("{base}/printers"))
        .json(&json!({
            "name": "Prusa MK4",
            "model": "Original Prusa MK4",
            "currentNozzleId": nozzle["id"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let printer: Value = resp.json().await.unwrap();

    let printer_id = printer["id"].as_str().unwrap();
    let resp = client
        .get(format!("{base}/printers/{printer_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let detail: Value = resp.json().await.unwrap();
    assert_eq!(detail["currentNozzle"]["id"], nozzle["id"]);

    let resp = client
        .post(format!("{base}/models"))
        .json(&json!({ "name": "Benchy", "tags": ["Functional", "Boat"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let model: Value = resp.json().await.unwrap();
    let tags = model["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 2);

    let resp = client.get(format!("{base}/models")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let models: Value = resp.json().await.unwrap();
    assert_eq!(models.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_dashboard_routes() {
    let env = ApiTestEnv::new();
    let base = serve(&env).await;
    let client = reqwest::Client::new();

    let mut body = filament_body();
    body["remainingWeight"] = json!(150.0);
    client
        .post(format!("{base}/filaments"))
        .json(&body)
        .send()
        .await
        .unwrap();

    let resp = client
        .get(format!("{base}/dashboard/summary"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let summary: Value = resp.json().await.unwrap();
    assert_eq!(summary["totalSpools"], json!(1));
    assert_eq!(summary["lowStockSpools"], json!(1));
    assert_eq!(summary["unopenedSpools"], json!(1));

    let resp = client
        .get(format!("{base}/dashboard/materials?unopened=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let rollups: Value = resp.json().await.unwrap();
    assert_eq!(rollups[0]["material"], json!("PLA"));
    assert_eq!(rollups[0]["count"], json!(1));
    // 150g in kilograms
    assert_eq!(rollups[0]["totalWeight"], json!(0.15));
}
