use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use metaserv::database::{CatalogDatabase, CatalogDescription};
use metaserv::server::{create_axum_router, ServerConfig, ServerState, WebContext};
use serde_json::{json, Value};
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "databases": [{
    "id": 1,
    "name": "S12_sdss",
    "host": "lsst-qserv-dax01",
    "port": 4040,
    "schemas": [
      {
        "id": 10,
        "name": "sdss_stripe82_00",
        "description": "SDSS Stripe 82 coadd",
        "default": true,
        "tables": [{
          "id": 100,
          "name": "Object",
          "description": "Detected sources",
          "columns": [
            {"name": "objectId", "datatype": "long", "ucd": "meta.id;src"},
            {"name": "ra", "datatype": "double", "unit": "deg", "ucd": "pos.eq.ra"},
            {"name": "decl", "datatype": "double", "unit": "deg", "ucd": "pos.eq.dec"}
          ]
        }]
      },
      {
        "id": 11,
        "name": "sdss_stripe82_01",
        "tables": [
          {"id": 110, "name": "Source", "columns": [{"name": "sourceId", "datatype": "long"}]},
          {"id": 111, "name": "Object_v", "table_type": "view", "columns": []}
        ]
      }
    ]
  }]
}"#;

fn setup() -> (TempDir, TestServer) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.sqlite3");
    let path = path.to_string_lossy().to_string();

    {
        let db = CatalogDatabase::open(&path).unwrap();
        let description = CatalogDescription::from_json(CATALOG).unwrap();
        db.loader().load(&description).unwrap();
    }

    let context = WebContext::default().with_catalog_path(path);
    let state = ServerState::new(context, ServerConfig::default());
    let server = TestServer::new(create_axum_router(state)).unwrap();
    (dir, server)
}

#[tokio::test]
async fn index_links_to_databases() {
    let (_dir, server) = setup();

    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_json(&json!({"Metadata v1. Links": "/db"}));

    let page = server
        .get("/")
        .add_header(ACCEPT, HeaderValue::from_static("text/html"))
        .await;
    page.assert_status_ok();
    assert!(page
        .header(CONTENT_TYPE)
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(page.text().contains("<a href=\"/db/\">/db/</a>"));
}

#[tokio::test]
async fn lists_database_names() {
    let (_dir, server) = setup();

    let response = server.get("/db/").await;
    response.assert_status_ok();
    response.assert_json(&json!({"results": ["S12_sdss"]}));

    // no trailing slash
    server.get("/db").await.assert_json(&json!({"results": ["S12_sdss"]}));
}

#[tokio::test]
async fn lists_database_summaries_on_request() {
    let (_dir, server) = setup();

    let response = server.get("/db/").add_query_param("description", "true").await;
    response.assert_json(&json!({
        "results": [{
            "name": "S12_sdss",
            "host": "lsst-qserv-dax01",
            "port": 4040,
            "default_schema": "sdss_stripe82_00"
        }]
    }));
}

#[tokio::test]
async fn database_detail_lists_schemas() {
    let (_dir, server) = setup();

    let by_name = server.get("/db/S12_sdss/").await.json::<Value>();
    let by_id = server.get("/db/1").await.json::<Value>();
    assert_eq!(by_name, by_id);

    let result = &by_name["result"];
    assert_eq!(result["name"], "S12_sdss");
    assert_eq!(result["default_schema"], "sdss_stripe82_00");
    let schemas = result["schemas"].as_array().unwrap();
    assert_eq!(schemas.len(), 2);
    assert_eq!(schemas[0]["is_default"], true);
}

#[tokio::test]
async fn default_schema_tables_match_explicit_schema() {
    let (_dir, server) = setup();

    let implicit = server.get("/db/S12_sdss/tables/").await.json::<Value>();
    let by_id = server.get("/db/1/tables/").await.json::<Value>();
    let explicit = server
        .get("/db/S12_sdss/sdss_stripe82_00/tables/")
        .await
        .json::<Value>();
    assert_eq!(implicit, by_id);
    assert_eq!(implicit, explicit);
    assert_eq!(implicit["result"]["name"], "sdss_stripe82_00");
    assert_eq!(implicit["result"]["tables"][0]["name"], "Object");

    let other = server.get("/db/1/11/tables").await.json::<Value>();
    let names: Vec<&str> = other["result"]["tables"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Object_v", "Source"]);
    assert_eq!(other["result"]["tables"][0]["table_type"], "view");
}

#[tokio::test]
async fn table_columns_keep_their_order() {
    let (_dir, server) = setup();

    let response = server.get("/db/S12_sdss/tables/Object/").await;
    response.assert_status_ok();
    let body = response.json::<Value>();

    let columns: Vec<&str> = body["result"]["columns"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(columns, vec!["objectId", "ra", "decl"]);
    assert_eq!(body["result"]["columns"][1]["unit"], "deg");
    assert_eq!(body["result"]["columns"][0]["unit"], Value::Null);

    let by_ids = server.get("/db/1/10/tables/100").await.json::<Value>();
    assert_eq!(body, by_ids);
}

#[tokio::test]
async fn table_outside_schema_is_not_found() {
    let (_dir, server) = setup();

    // Source lives in sdss_stripe82_01, not the default schema
    let response = server.get("/db/S12_sdss/tables/Source/").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "table 'Source' not found");

    server
        .get("/db/S12_sdss/sdss_stripe82_01/tables/Source/")
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn unknown_entities_are_not_found() {
    let (_dir, server) = setup();

    for path in [
        "/db/nonexistent/",
        "/db/999/tables/",
        "/db/S12_sdss/nope/tables/",
        "/db/S12_sdss/tables/Nope/",
    ] {
        server.get(path).await.assert_status(StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn malformed_tokens_are_rejected() {
    let (_dir, server) = setup();

    let response = server.get("/db/S12-sdss/").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "INVALID_IDENTIFIER");
    assert_eq!(body["error"]["details"], json!({"kind": "database", "token": "S12-sdss"}));

    server
        .get("/db/S12_sdss/tables/1abc/")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn undecodable_segments_use_the_error_envelope() {
    let (_dir, server) = setup();

    let response = server.get("/db/%FF/").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "INVALID_IDENTIFIER");
    assert_eq!(body["error"]["details"]["kind"], "database");

    let response = server.get("/db/S12_sdss/tables/%C3%28/").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["details"]["kind"], "table");
}

#[tokio::test]
async fn out_of_range_port_cannot_be_stored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.sqlite3");
    let db = CatalogDatabase::open(&path.to_string_lossy()).unwrap();

    db.connection()
        .execute("INSERT INTO ms_database (db_id, name, port) VALUES (1, 'good', 3360)", [])
        .unwrap();
    let bad = db
        .connection()
        .execute("INSERT INTO ms_database (db_id, name, port) VALUES (2, 'bad', 70000)", []);
    assert!(bad.is_err());
    drop(db);

    let context = WebContext::default().with_catalog_path(path.to_string_lossy());
    let state = ServerState::new(context, ServerConfig::default());
    let server = TestServer::new(create_axum_router(state)).unwrap();
    server
        .get("/db/")
        .await
        .assert_json(&json!({"results": ["good"]}));
}

#[tokio::test]
async fn html_is_negotiated() {
    let (_dir, server) = setup();

    let response = server
        .get("/db/S12_sdss/tables/")
        .add_header(ACCEPT, HeaderValue::from_static("text/html"))
        .await;
    response.assert_status_ok();
    let content_type = response.header(CONTENT_TYPE);
    assert!(content_type.to_str().unwrap().starts_with("text/html"));
    let text = response.text();
    assert!(text.contains("<a href=\"/db/S12_sdss/tables/Object/\">Object</a>"));

    let missing = server
        .get("/db/nonexistent/")
        .add_header(ACCEPT, HeaderValue::from_static("text/html"))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert!(missing.text().contains("database &#39;nonexistent&#39; not found"));
}

#[tokio::test]
async fn bearer_tokens_do_not_affect_responses() {
    let (_dir, server) = setup();

    let plain = server.get("/db/").await.json::<Value>();
    // payload {"uid":"jdoe"}
    let with_token = server
        .get("/db/")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_static("Bearer eyJhbGciOiJub25lIn0.eyJ1aWQiOiJqZG9lIn0.sig"),
        )
        .await;
    with_token.assert_status_ok();
    assert_eq!(with_token.json::<Value>(), plain);

    let garbage = server
        .get("/db/")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"))
        .await;
    garbage.assert_status_ok();
    assert_eq!(garbage.json::<Value>(), plain);
}

#[tokio::test]
async fn missing_store_is_a_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let context = WebContext::default()
        .with_catalog_path(dir.path().join("missing.sqlite3").to_string_lossy());
    let state = ServerState::new(context, ServerConfig::default());
    let server = TestServer::new(create_axum_router(state)).unwrap();

    let response = server.get("/db/").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"]["code"], "STORE_UNAVAILABLE");
}
