use techradar_core::{
    classify, parse_query, AddressBookService, IdentifierKind, MapDirectory, ServiceError,
    ValidationError,
};

#[test]
fn query_is_trimmed_and_blank_pieces_dropped() {
    assert_eq!(
        parse_query("  octocat  ,   , anotheruser  ").unwrap(),
        vec!["octocat".to_string(), "anotheruser".to_string()]
    );
}

#[test]
fn query_of_only_separators_is_missing_input() {
    let err = parse_query(" , , ,").unwrap_err();
    assert_eq!(err, ValidationError::MissingInput);
    assert_eq!(err.to_string(), "Missing input");
}

#[test]
fn classifier_distinguishes_email_and_username() {
    assert_eq!(classify("octo.cat@ons.gov.uk"), IdentifierKind::Email);
    assert_eq!(classify("octocat"), IdentifierKind::Username);
}

#[test]
fn service_resolves_profiles_from_address_book_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("addressbook.json");
    std::fs::write(
        &path,
        r#"{
            "emailToUsername": {"jane.doe@ons.gov.uk": "janedoe"},
            "usernameToEmail": {"janedoe": "jane.doe@ons.gov.uk"}
        }"#,
    )
    .unwrap();

    let service = AddressBookService::new(MapDirectory::load(&path).unwrap());
    let profiles = service.lookup("JaneDoe, Jane.Doe@ons.gov.uk").unwrap();
    assert_eq!(profiles.len(), 2);
    for profile in &profiles {
        assert_eq!(profile.username.as_deref(), Some("janedoe"));
        assert_eq!(profile.email.as_deref(), Some("jane.doe@ons.gov.uk"));
        assert_eq!(profile.url.as_deref(), Some("https://github.com/janedoe"));
        assert_eq!(profile.fullname.as_deref(), Some("jane doe"));
    }

    let json = serde_json::to_value(&profiles[0]).unwrap();
    assert_eq!(json["url"], "https://github.com/janedoe");
}

#[test]
fn service_reports_missing_input_as_bad_request() {
    let service = AddressBookService::new(MapDirectory::new());
    let err = service.lookup("   ").unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ValidationError::MissingInput)));
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.error_body()["error"], "Missing input");
}
