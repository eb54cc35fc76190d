use followthrough_core::db::open_db_in_memory;
use followthrough_core::{hash_api_key, AuthError, AuthService, SqliteApiKeyRepository};

#[test]
fn issued_key_authenticates_to_its_workspace() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteApiKeyRepository::new(&conn));

    let issued = auth.issue_key("w_demo", "u_demo", "cli").unwrap();
    assert!(issued.api_key.starts_with("vd_"));
    assert_eq!(issued.api_key.len(), 35);
    assert!(issued.id.starts_with("k_"));

    let ctx = auth
        .authenticate(Some(&format!("Bearer {}", issued.api_key)))
        .unwrap();
    assert_eq!(ctx.workspace_id, "w_demo");
    assert_eq!(ctx.owner_id, "u_demo");
    assert_eq!(ctx.api_key_id, issued.id);

    let lower = auth
        .authenticate(Some(&format!("bearer   {}", issued.api_key)))
        .unwrap();
    assert_eq!(lower, ctx);
}

#[test]
fn plaintext_is_never_stored() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteApiKeyRepository::new(&conn));
    let issued = auth.issue_key("w_demo", "u_demo", "cli").unwrap();

    let stored_hash: String = conn
        .query_row(
            "SELECT key_hash FROM api_keys WHERE id = ?1;",
            [issued.id.as_str()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored_hash, hash_api_key(&issued.api_key));
    assert_ne!(stored_hash, issued.api_key);
}

#[test]
fn malformed_headers_are_missing_bearer() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteApiKeyRepository::new(&conn));

    for header in [None, Some(""), Some("Basic abc"), Some("Bearer")] {
        assert!(
            matches!(auth.authenticate(header), Err(AuthError::MissingBearer)),
            "header={header:?}"
        );
    }
}

#[test]
fn short_and_unknown_keys_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteApiKeyRepository::new(&conn));

    assert!(matches!(
        auth.authenticate(Some("Bearer short")),
        Err(AuthError::InvalidKey)
    ));
    assert!(matches!(
        auth.authenticate(Some("Bearer vd_0000000000000000000000000000")),
        Err(AuthError::UnknownKey)
    ));
}

#[test]
fn revoked_key_stops_working() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteApiKeyRepository::new(&conn));
    let issued = auth.issue_key("w_demo", "u_demo", "cli").unwrap();

    auth.revoke_key(&issued.id).unwrap();
    auth.revoke_key(&issued.id).unwrap();
    assert!(matches!(
        auth.authenticate_key(&issued.api_key),
        Err(AuthError::UnknownKey)
    ));
    assert!(matches!(
        auth.revoke_key("k_missing"),
        Err(AuthError::KeyNotFound(_))
    ));
}
