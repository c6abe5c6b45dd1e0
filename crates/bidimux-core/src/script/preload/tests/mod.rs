use serde_json::json;

use super::*;

fn channel(id: &str) -> ChannelProperties {
    serde_json::from_value(json!({"channel": id})).unwrap()
}

#[test]
fn wrapped_source_invokes_the_user_function() {
    let script = PreloadScript::new("() => { window.marker = 1; }", Vec::new(), None, None, None);
    let source = script.wrapped_source();
    assert!(source.starts_with("(() => {"));
    assert!(source.contains("(() => { window.marker = 1; })()"));
    assert!(source.ends_with("})();"));
}

#[test]
fn wrapped_source_parks_channels_under_globals() {
    let script = PreloadScript::new(
        "(send) => { send('ready'); }",
        vec![channel("chan-1")],
        None,
        None,
        None,
    );
    let source = script.wrapped_source();
    let global = channel_global_name(&script.id, 0);
    assert!(source.contains(&format!("globalThis['{global}'] =")));
    assert!(source.contains(&format!("globalThis['{global}'].sendMessage")));
}

#[test]
fn scoping_rules() {
    let global = PreloadScript::new("() => {}", Vec::new(), None, None, None);
    assert!(global.is_global());
    assert!(global.applies_to("TOP", "default"));

    let scoped = PreloadScript::new(
        "() => {}",
        Vec::new(),
        None,
        Some(vec!["TOP".to_string()]),
        None,
    );
    assert!(!scoped.is_global());
    assert!(scoped.applies_to("TOP", "default"));
    assert!(!scoped.applies_to("OTHER", "default"));

    let user_scoped = PreloadScript::new(
        "() => {}",
        Vec::new(),
        None,
        None,
        Some(vec!["profile".to_string()]),
    );
    assert!(user_scoped.applies_to("ANY", "profile"));
    assert!(!user_scoped.applies_to("ANY", "default"));
}

#[test]
fn storage_remove_validates_the_id() {
    let mut storage = PreloadScriptStorage::new();
    let err = storage.remove("missing").unwrap_err();
    assert_eq!(err.code, crate::error::ErrorCode::NoSuchScript);

    let id = storage.add(PreloadScript::new("() => {}", Vec::new(), None, None, None));
    storage.record_cdp_id(&id, "T1", "cdp-1".to_string());

    let removed = storage.remove(&id).unwrap();
    assert_eq!(removed.cdp_ids.get("T1").map(String::as_str), Some("cdp-1"));
    assert!(storage.get(&id).is_none());
}
