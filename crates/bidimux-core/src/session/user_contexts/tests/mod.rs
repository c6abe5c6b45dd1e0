use super::*;

#[test]
fn default_context_always_exists() {
    let storage = UserContextStorage::new();
    assert!(storage.verify(DEFAULT_USER_CONTEXT).is_ok());
    assert_eq!(storage.ids(), vec!["default".to_string()]);
}

#[test]
fn default_context_cannot_be_removed() {
    let mut storage = UserContextStorage::new();
    let err = storage.remove(DEFAULT_USER_CONTEXT).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArgument);
}

#[test]
fn unknown_context_is_no_such_user_context() {
    let mut storage = UserContextStorage::new();
    assert_eq!(
        storage.remove("missing").unwrap_err().code,
        ErrorCode::NoSuchUserContext
    );
    assert_eq!(
        storage.verify("missing").unwrap_err().code,
        ErrorCode::NoSuchUserContext
    );
}

#[test]
fn ids_list_the_default_first() {
    let mut storage = UserContextStorage::new();
    storage.add("BC2", UserContextConfig::default());
    storage.add("BC1", UserContextConfig::default());
    assert_eq!(
        storage.ids(),
        vec!["default".to_string(), "BC1".to_string(), "BC2".to_string()]
    );
}

#[test]
fn id_mapping_between_protocols() {
    assert_eq!(UserContextStorage::browser_context_id("default"), None);
    assert_eq!(UserContextStorage::browser_context_id("BC1"), Some("BC1"));
    assert_eq!(UserContextStorage::user_context_id(None), "default");
    assert_eq!(UserContextStorage::user_context_id(Some("BC1")), "BC1");
}
