use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use super::*;

fn token_with_claims(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{body}.signature")
}

#[test]
fn payload_decodes_the_claims_segment() {
    let token = token_with_claims(&json!({ "sub": "7", "role": "USER" }));
    let claims = payload(&token).unwrap();
    assert_eq!(claims["sub"], "7");
    assert_eq!(claims["role"], "USER");
}

#[test]
fn padded_claims_are_tolerated() {
    let token = token_with_claims(&json!({ "role": "ADMIN" }));
    let (head, rest) = token.split_once('.').unwrap();
    let (body, sig) = rest.split_once('.').unwrap();
    let padded = format!("{head}.{body}==.{sig}");

    assert_eq!(role_claim(&padded).as_deref(), Some("ADMIN"));
}

#[test]
fn wrong_segment_count_yields_none() {
    assert!(payload("onlyonepart").is_none());
    assert!(payload("two.parts").is_none());
    assert!(payload("a.b.c.d").is_none());
}

#[test]
fn non_json_claims_yield_none() {
    let body = URL_SAFE_NO_PAD.encode(b"not json at all");
    assert!(payload(&format!("h.{body}.s")).is_none());
}

#[test]
fn invalid_base64_yields_none() {
    assert!(payload("h.!!!.s").is_none());
}

#[test]
fn role_claim_requires_a_string_role() {
    let token = token_with_claims(&json!({ "role": 7 }));
    assert_eq!(role_claim(&token), None);

    let token = token_with_claims(&json!({ "sub": "7" }));
    assert_eq!(role_claim(&token), None);
}
