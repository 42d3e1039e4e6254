//! Tests for the ESI and Janice clients

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::FetchConfig;
use crate::types::FetchRequest;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    HttpClient::with_config(config).unwrap()
}

fn esi_for(server: &MockServer) -> EsiClient {
    EsiClient::new(http_for(server), FetchConfig::default())
        .with_zkillboard_url(format!("{}/zkb/api", server.uri()))
}

#[tokio::test]
async fn test_server_status_sends_datasource() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status/"))
        .and(query_param("datasource", "singularity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "players": 12345,
            "server_version": "2211445"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server).with_datasource("singularity");
    let status = esi.server_status().await.unwrap();
    assert_eq!(status["players"], 12345);
}

#[tokio::test]
async fn test_killmail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/killmails/128276154/0b3a6f1c2d/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "killmail_id": 128276154,
            "solar_system_id": 30000142
        })))
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server);
    let km = esi.killmail(128_276_154, "0b3a6f1c2d").await.unwrap();
    assert_eq!(km["solar_system_id"], 30000142);
}

#[tokio::test]
async fn test_ids_to_names_drops_zero_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/universe/names/"))
        .and(wiremock::matchers::body_json(json!([95465499, 98000001])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 95465499, "name": "CCP Bartender", "category": "character"},
            {"id": 98000001, "name": "Test Corp", "category": "corporation"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server);
    let names = esi.ids_to_names(&[0, 95_465_499, 0, 98_000_001]).await.unwrap();

    assert_eq!(names.len(), 2);
    assert_eq!(names.get("95465499").map(String::as_str), Some("CCP Bartender"));
    assert_eq!(names.get("98000001").map(String::as_str), Some("Test Corp"));
}

#[tokio::test]
async fn test_ids_to_names_empty_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server);
    assert!(esi.ids_to_names(&[]).await.unwrap().is_empty());
    assert!(esi.ids_to_names(&[0, 0]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resolve_killmail_from_zkillboard() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zkb/api/killID/128276154/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"killmail_id": 128276154, "zkb": {"hash": "deadbeef", "totalValue": 1.0}}
        ])))
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server);
    let (id, hash) = esi
        .resolve_killmail("https://zkillboard.com/kill/128276154/")
        .await
        .unwrap();

    assert_eq!(id, 128_276_154);
    assert_eq!(hash, "deadbeef");
}

#[tokio::test]
async fn test_resolve_bare_id_looks_up_hash() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zkb/api/killID/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"killmail_id": 42, "zkb": {"hash": "c0ffee"}}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server);
    assert_eq!(
        esi.resolve_killmail("42").await.unwrap(),
        (42, "c0ffee".to_string())
    );
}

#[tokio::test]
async fn test_resolve_killmail_zkillboard_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zkb/api/killID/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server);
    let err = esi
        .resolve_killmail("https://zkillboard.com/kill/7/")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_resolve_esi_link_without_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server);
    assert_eq!(
        esi.resolve_killmail("https://esi.evetech.net/latest/killmails/42/abc123/")
            .await
            .unwrap(),
        (42, "abc123".to_string())
    );
}

#[tokio::test]
async fn test_killmail_details_aggregates_and_prices() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/killmails/128276154/0b3a6f1c2d/"))
        .and(query_param("datasource", "tranquility"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "killmail_id": 128276154,
            "killmail_time": "2024-05-01T12:00:00Z",
            "solar_system_id": 30000142,
            "victim": {
                "character_id": 95465499,
                "corporation_id": 98000001,
                "ship_type_id": 587,
                "items": [
                    {"item_type_id": 2488, "flag": 87, "quantity_destroyed": 2, "singleton": 0},
                    {"item_type_id": 2488, "flag": 87, "quantity_destroyed": 3, "singleton": 0},
                    {"item_type_id": 2488, "flag": 87, "quantity_dropped": 1, "singleton": 0},
                    {"item_type_id": 2048, "flag": 11, "quantity_dropped": 1, "singleton": 0}
                ]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/universe/names/"))
        .and(wiremock::matchers::body_json(json!([
            587, 2048, 2488, 30000142, 95465499, 98000001
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 587, "name": "Rifter", "category": "inventory_type"},
            {"id": 2048, "name": "Damage Control II", "category": "inventory_type"},
            {"id": 2488, "name": "Warrior II", "category": "inventory_type"},
            {"id": 30000142, "name": "Jita", "category": "solar_system"},
            {"id": 95465499, "name": "CCP Bartender", "category": "character"},
            {"id": 98000001, "name": "Test Corp", "category": "corporation"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/janice/appraisal"))
        .and(body_partial_json(json!({
            "pricedata": {"raw_textarea": "Damage Control II\t1\nWarrior II\t5\nWarrior II\t1\nRifter"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appraisal": {"prices": {"sell": {"min": 1250000.0}}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server);
    let janice_http = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(format!("{}/janice", mock_server.uri()))
            .build(),
    )
    .unwrap();
    let janice = JaniceClient::new(janice_http);

    let details = esi
        .killmail_details(128_276_154, "0b3a6f1c2d", &janice)
        .await
        .unwrap();

    assert_eq!(details.character_name, "CCP Bartender");
    assert_eq!(details.ship_type_name, "Rifter");
    assert_eq!(details.solar_system_name, "Jita");
    assert_eq!(details.alliance_id, 0);
    assert_eq!(details.alliance_name, UNKNOWN_NAME);
    assert!((details.janice_amount - 1_250_000.0).abs() < f64::EPSILON);

    let summary: Vec<(SlotType, &str, bool, i64)> = details
        .items
        .iter()
        .map(|i| (i.slot, i.item_name.as_str(), i.dropped, i.quantity))
        .collect();
    assert_eq!(
        summary,
        vec![
            (SlotType::Low, "Damage Control II", true, 1),
            (SlotType::Drone, "Warrior II", false, 5),
            (SlotType::Drone, "Warrior II", true, 1),
        ]
    );

    let slots: Vec<SlotType> = details.slots.iter().map(|g| g.slot).collect();
    assert_eq!(slots, vec![SlotType::Low, SlotType::Drone]);
    assert_eq!(details.slots[1].items.len(), 2);
}

#[tokio::test]
async fn test_killmail_details_missing_killmail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/killmails/1/bad/"))
        .respond_with(ResponseTemplate::new(422).set_body_string("Invalid killmail_id and/or killmail_hash"))
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server);
    let janice = JaniceClient::new(http_for(&mock_server));
    let err = esi.killmail_details(1, "bad", &janice).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Member {
    character_id: i64,
}

#[tokio::test]
async fn test_all_pages_as_typed_items() {
    let mock_server = MockServer::start().await;

    for page in 1..=2 {
        Mock::given(method("GET"))
            .and(path("/corporations/98000001/members/"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Pages", "2")
                    .set_body_json(json!([{"character_id": page}])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let esi = esi_for(&mock_server);
    let members: Vec<Member> = esi
        .all_pages_as(FetchRequest::new("/corporations/98000001/members/").bearer("tok"))
        .await
        .unwrap();

    assert_eq!(
        members,
        vec![Member { character_id: 1 }, Member { character_id: 2 }]
    );
}

#[tokio::test]
async fn test_all_pages_as_shape_mismatch_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ids/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Pages", "1")
                .set_body_json(json!([1, 2, 3])),
        )
        .mount(&mock_server)
        .await;

    let esi = esi_for(&mock_server);
    let result: crate::error::Result<Vec<Member>> =
        esi.all_pages_as(FetchRequest::new("/ids/")).await;
    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[tokio::test]
async fn test_janice_appraisal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/appraisal"))
        .and(body_partial_json(json!({
            "market_name": "jita",
            "pricedata": {"raw_textarea": "Tritanium 100", "pricing_type": "immediate"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appraisal": {"prices": {"sell": {"min": 512.5, "max": 600.0}}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let janice = JaniceClient::new(http_for(&mock_server));
    let value = janice.appraisal("Tritanium 100").await.unwrap();
    assert!((value - 512.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_janice_empty_appraisal_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let janice = JaniceClient::new(http_for(&mock_server));
    assert!(janice.appraisal("").await.unwrap().abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_janice_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/appraisal"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let janice = JaniceClient::new(http_for(&mock_server));
    let err = janice.appraisal("Tritanium 1").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}
