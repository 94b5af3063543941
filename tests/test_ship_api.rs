//! End-to-end HTTP test: serve the router on an ephemeral port backed by the
//! in-memory store and drive it with a real client.

use serde_json::{json, Value};
use ship_registry::{transport, MemoryShipStore, ShipCatalog};
use std::sync::Arc;

async fn spawn_server() -> Result<String, Box<dyn std::error::Error>> {
    let catalog = ShipCatalog::new(Arc::new(MemoryShipStore::new()));
    let router = transport::http::create_router(transport::http::AppState { catalog });

    // Bind to an ephemeral port to avoid conflicts with a running server.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

fn millis(year: i32) -> i64 {
    use chrono::TimeZone;
    chrono::Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn ship_body(name: &str, year: i32, speed: f64, crew: i32) -> Value {
    json!({
        "name": name,
        "planet": "Saturn",
        "shipType": "MILITARY",
        "productionDate": millis(year),
        "speed": speed,
        "crewSize": crew
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ship_crud_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    let health = client.get(format!("{}/health", base_url)).send().await?;
    assert_eq!(health.status(), 200);

    // --- create ---
    let resp = client
        .post(format!("{}/rest/ships", base_url))
        .json(&ship_body("Enterprise", 3019, 0.5, 430))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await?;
    assert_eq!(body["success"], true);
    let ship = &body["data"];
    let id = ship["id"].as_i64().expect("id");
    assert_eq!(ship["isUsed"], false);
    assert_eq!(ship["rating"].as_f64(), Some(40.0));
    assert_eq!(ship["productionDate"].as_i64(), Some(millis(3019)));

    // --- read ---
    let resp = client
        .get(format!("{}/rest/ships/{}", base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["name"], "Enterprise");

    // --- partial update; a caller-supplied rating is ignored ---
    let resp = client
        .post(format!("{}/rest/ships/{}", base_url, id))
        .json(&json!({ "isUsed": true, "rating": 99.0 }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["isUsed"], true);
    assert_eq!(body["data"]["rating"].as_f64(), Some(20.0));
    assert_eq!(body["data"]["crewSize"], 430);

    // --- delete ---
    let resp = client
        .delete(format!("{}/rest/ships/{}", base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{}/rest/ships/{}", base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), 404);
    let resp = client
        .delete(format!("{}/rest/ships/{}", base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), 404);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ship_errors_map_to_status_codes() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    for bad_id in ["0", "abc", "-1"] {
        let resp = client
            .get(format!("{}/rest/ships/{}", base_url, bad_id))
            .send()
            .await?;
        assert_eq!(resp.status(), 400, "id {bad_id}");
    }

    let mut too_big_crew = ship_body("Defiant", 3000, 0.5, 10000);
    let resp = client
        .post(format!("{}/rest/ships", base_url))
        .json(&too_big_crew)
        .send()
        .await?;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["field"], "crewSize");

    too_big_crew["crewSize"] = json!(10);
    too_big_crew["shipType"] = json!("YACHT");
    let resp = client
        .post(format!("{}/rest/ships", base_url))
        .json(&too_big_crew)
        .send()
        .await?;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["field"], "shipType");

    let resp = client
        .post(format!("{}/rest/ships", base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let resp = client
        .get(format!("{}/rest/ships?shipType=YACHT", base_url))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let resp = client
        .get(format!("{}/rest/ships?minSpeed=fast", base_url))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ship_listing_filters_and_pages() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    let fleet = [
        ("Aurora", 2850, 0.10, 5),
        ("Borealis", 2900, 0.20, 50),
        ("Corona", 2950, 0.50, 500),
        ("Draco", 3000, 0.80, 5000),
        ("Eclipse", 3019, 0.99, 9999),
    ];
    for (name, year, speed, crew) in fleet {
        let resp = client
            .post(format!("{}/rest/ships", base_url))
            .json(&ship_body(name, year, speed, crew))
            .send()
            .await?;
        assert_eq!(resp.status(), 200);
    }

    // Default paging: first page of three, ordered by id.
    let body: Value = client
        .get(format!("{}/rest/ships", base_url))
        .send()
        .await?
        .json()
        .await?;
    let page = &body["data"];
    assert_eq!(page["items"].as_array().map(Vec::len), Some(3));
    assert_eq!(page["totalItems"], 5);
    assert_eq!(page["items"][0]["name"], "Aurora");

    // Open-ended date range combined with a speed range.
    let body: Value = client
        .get(format!(
            "{}/rest/ships?before={}&minSpeed=0.2&maxSpeed=0.8&pageSize=10",
            base_url,
            millis(2950)
        ))
        .send()
        .await?
        .json()
        .await?;
    let names: Vec<&str> = body["data"]["items"]
        .as_array()
        .expect("items")
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Borealis", "Corona"]);

    // Ordering by speed, second page of two.
    let body: Value = client
        .get(format!(
            "{}/rest/ships?order=SPEED&pageNumber=1&pageSize=2",
            base_url
        ))
        .send()
        .await?
        .json()
        .await?;
    let names: Vec<&str> = body["data"]["items"]
        .as_array()
        .expect("items")
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Corona", "Draco"]);

    // Count ignores paging.
    let body: Value = client
        .get(format!("{}/rest/ships/count?name=or&pageSize=1", base_url))
        .send()
        .await?
        .json()
        .await?;
    // Aurora, Borealis, Corona
    assert_eq!(body["data"]["count"], 3);

    let body: Value = client
        .get(format!("{}/rest/ships/count", base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["count"], 5);

    Ok(())
}
