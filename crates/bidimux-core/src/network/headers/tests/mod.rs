use serde_json::json;

use super::*;

#[test]
fn folded_cdp_headers_split_into_lines() {
    let headers: CdpHeaders = serde_json::from_value(json!({
        "Accept": "*/*",
        "Set-Cookie": "a=1\nb=2"
    }))
    .unwrap();

    let mut translated = headers_from_cdp(&headers);
    translated.sort_by(|a, b| a.name.cmp(&b.name).then(
        bytes_value_text(&a.value).cmp(&bytes_value_text(&b.value)),
    ));

    assert_eq!(translated.len(), 3);
    assert_eq!(translated[0].name, "Accept");
    assert_eq!(translated[1].name, "Set-Cookie");
    assert_eq!(bytes_value_text(&translated[1].value), "a=1");
    assert_eq!(bytes_value_text(&translated[2].value), "b=2");
}

#[test]
fn bytes_value_decodes_base64() {
    let value = BytesValue::Base64 {
        value: "aGVsbG8=".to_string(),
    };
    assert_eq!(bytes_value_text(&value), "hello");
}

#[test]
fn same_site_round_trip() {
    // CDP -> BiDi -> CDP keeps the explicit spellings.
    for (cdp, bidi) in [
        (CookieSameSite::Strict, SameSite::Strict),
        (CookieSameSite::Lax, SameSite::Lax),
        (CookieSameSite::None, SameSite::None),
    ] {
        assert_eq!(same_site_from_cdp(Some(cdp)), bidi);
        assert_eq!(same_site_to_cdp(Some(bidi)), cdp);
    }
    // Defaults differ by direction.
    assert_eq!(same_site_from_cdp(None), SameSite::None);
    assert_eq!(same_site_to_cdp(None), CookieSameSite::Lax);
}

#[test]
fn cdp_cookie_translates() {
    let cookie: CdpCookie = serde_json::from_value(json!({
        "name": "sid",
        "value": "secret",
        "domain": ".example.com",
        "path": "/",
        "expires": 1900000000.0,
        "size": 9,
        "httpOnly": true,
        "secure": true,
        "session": false,
        "sameSite": "Strict"
    }))
    .unwrap();

    let translated = cookie_from_cdp(&cookie);
    assert_eq!(translated.name, "sid");
    assert_eq!(bytes_value_text(&translated.value), "secret");
    assert_eq!(translated.same_site, SameSite::Strict);
    assert_eq!(translated.expiry, Some(1_900_000_000));
    assert!(translated.http_only);
}

#[test]
fn session_cookie_has_no_expiry() {
    let cookie: CdpCookie = serde_json::from_value(json!({
        "name": "s",
        "value": "v",
        "domain": "example.com",
        "path": "/",
        "expires": -1.0,
        "size": 2,
        "httpOnly": false,
        "secure": false,
        "session": true
    }))
    .unwrap();
    assert_eq!(cookie_from_cdp(&cookie).expiry, None);
}

#[test]
fn set_cookie_header_line_renders_attributes() {
    let header: SetCookieHeader = serde_json::from_value(json!({
        "name": "sid",
        "value": {"type": "string", "value": "v"},
        "domain": "example.com",
        "path": "/",
        "secure": true,
        "httpOnly": true,
        "sameSite": "lax",
        "maxAge": 60
    }))
    .unwrap();

    let line = set_cookie_header_line(&header);
    assert_eq!(
        line,
        "sid=v; Domain=example.com; Path=/; Max-Age=60; Secure; HttpOnly; SameSite=Lax"
    );
}

#[test]
fn headers_size_counts_wire_overhead() {
    let headers = vec![Header {
        name: "Accept".to_string(),
        value: BytesValue::String {
            value: "*/*".to_string(),
        },
    }];
    // "Accept" + ": " + "*/*" + "\r\n"
    assert_eq!(headers_size(&headers), 13);
}
