use serde_json::json;
use techradar_core::db::open_db_in_memory;
use techradar_core::{
    BannerError, BannerService, BannerStore, RadarConfig, ServiceError, SqliteBannerStore,
};

#[test]
fn banner_lifecycle_over_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let config = RadarConfig::default();
    let service = BannerService::new(SqliteBannerStore::new(&conn, config.banner_document_key));

    assert!(service.active_banners().unwrap().is_empty());

    service
        .add_banner(&json!({"banner": {
            "title": "Radar refresh", "message": "New radar published",
            "type": "success", "pages": ["radar", "home"]
        }}))
        .unwrap();
    service
        .add_banner(&json!({"banner": {
            "message": "Draft notice", "pages": ["home"], "show": false
        }}))
        .unwrap();

    let all = service.all_banners().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].description, "New radar published");
    let active = service.active_banners().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].title, "Radar refresh");

    let change = service
        .set_visibility(&json!({"index": 0, "show": false}))
        .unwrap();
    assert_eq!(change.revision, 3);
    assert!(service.active_banners().unwrap().is_empty());

    let change = service.delete_banner(&json!({"index": 0})).unwrap();
    assert_eq!((change.total, change.revision), (1, 4));
    assert_eq!(service.all_banners().unwrap()[0].message, "Draft notice");
}

#[test]
fn stored_banner_document_keeps_wire_names() {
    let conn = open_db_in_memory().unwrap();
    let service = BannerService::new(SqliteBannerStore::new(&conn, "messages.json"));
    service
        .add_banner(&json!({"banner": {"message": "Hello", "pages": ["home"]}}))
        .unwrap();

    let body: String = conn
        .query_row(
            "SELECT body FROM documents WHERE doc_key = 'messages.json';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({"messages": [{
            "title": "", "message": "Hello", "description": "Hello",
            "type": "info", "pages": ["home"], "show": true
        }]})
    );
}

#[test]
fn delete_never_creates_the_document() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBannerStore::new(&conn, "messages.json");
    assert!(store.load().unwrap().is_none());

    let service = BannerService::new(SqliteBannerStore::new(&conn, "messages.json"));
    let err = service.delete_banner(&json!({"index": 0})).unwrap_err();
    assert!(matches!(err, ServiceError::Banner(BannerError::MessagesNotFound)));
    assert_eq!(err.status_code(), 400);

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM documents;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}
