//! Request validation for the release-code endpoints.
//!
//! Create runs three checks in order (presence, email, `emuso`) and stops at
//! the first failure. Update runs only the email and `emuso` checks; any other
//! field missing from the body is written as NULL.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::constants::{EMUSO_VALUES, MSG_INVALID_EMAIL, MSG_INVALID_EMUSO, MSG_REQUIRED_FIELDS};
use crate::error::{AppError, AppResult};
use crate::types::{
    CreateReleaseCodeRequest, NewReleaseCode, ReleaseCodeChanges, UpdateReleaseCodeRequest,
};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern must compile")
});

/// Syntactic email check: `local@domain.tld`, no whitespace, a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_emuso(emuso: &str) -> bool {
    EMUSO_VALUES.contains(&emuso)
}

/// Missing, `null`, `false`, `0` and `""` all count as absent.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) | Some(Value::Bool(true)) => true,
    }
}

/// Text form of a scalar body value. Null and missing map to `None`.
fn as_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn check_email(email: Option<&str>) -> AppResult<()> {
    if email.is_some_and(is_valid_email) {
        Ok(())
    } else {
        Err(AppError::Validation(MSG_INVALID_EMAIL.to_string()))
    }
}

fn check_emuso(emuso: Option<&str>) -> AppResult<()> {
    if emuso.is_some_and(is_valid_emuso) {
        Ok(())
    } else {
        Err(AppError::Validation(MSG_INVALID_EMUSO.to_string()))
    }
}

/// Validates a create body and returns the record to insert.
///
/// `idcodigo` is not parsed here: a non-numeric id is reported by the
/// datastore when the row is inserted.
pub fn validate_create(request: &CreateReleaseCodeRequest) -> AppResult<NewReleaseCode> {
    let fields = [
        &request.idcodigo,
        &request.codigo,
        &request.emuso,
        &request.nome,
        &request.email,
        &request.chave1,
        &request.chave2,
        &request.chave3,
        &request.valorhash,
    ];
    if !fields.iter().all(|field| is_present(field.as_ref())) {
        return Err(AppError::Validation(MSG_REQUIRED_FIELDS.to_string()));
    }

    let text = |value: &Option<Value>| as_text(value.as_ref()).unwrap_or_default();

    let email = text(&request.email);
    check_email(Some(email.as_str()))?;

    let emuso = text(&request.emuso);
    check_emuso(Some(emuso.as_str()))?;

    Ok(NewReleaseCode {
        idcodigo: text(&request.idcodigo),
        codigo: text(&request.codigo),
        emuso,
        nome: text(&request.nome),
        email,
        chave1: text(&request.chave1),
        chave2: text(&request.chave2),
        chave3: text(&request.chave3),
        valorhash: text(&request.valorhash),
    })
}

/// Validates an update body. Only email and `emuso` are checked.
pub fn validate_update(request: &UpdateReleaseCodeRequest) -> AppResult<ReleaseCodeChanges> {
    let email = as_text(request.email.as_ref());
    check_email(email.as_deref())?;

    let emuso = as_text(request.emuso.as_ref());
    check_emuso(emuso.as_deref())?;

    Ok(ReleaseCodeChanges {
        emuso,
        nome: as_text(request.nome.as_ref()),
        email,
        chave1: as_text(request.chave1.as_ref()),
        chave2: as_text(request.chave2.as_ref()),
        chave3: as_text(request.chave3.as_ref()),
        valorhash: as_text(request.valorhash.as_ref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn full_body() -> Value {
        json!({
            "idcodigo": 1,
            "codigo": "REL-001",
            "emuso": "S",
            "nome": "Release one",
            "email": "ops@example.com",
            "chave1": "k1",
            "chave2": "k2",
            "chave3": "k3",
            "valorhash": "abc123"
        })
    }

    fn full_request() -> CreateReleaseCodeRequest {
        serde_json::from_value(full_body()).unwrap()
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("a@b.co")]
    #[case("user.name+tag@mail.example.com")]
    #[case("a@b.c.d")]
    fn test_email_accepted(#[case] email: &str) {
        assert!(is_valid_email(email));
    }

    #[rstest]
    #[case("a@b")]
    #[case("a b@c.com")]
    #[case("@b.com")]
    #[case("")]
    #[case("a@@b.com")]
    #[case("a@b .com")]
    #[case("a@b.")]
    fn test_email_rejected(#[case] email: &str) {
        assert!(!is_valid_email(email));
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(json!(null)), false)]
    #[case(Some(json!(false)), false)]
    #[case(Some(json!(0)), false)]
    #[case(Some(json!(0.0)), false)]
    #[case(Some(json!("")), false)]
    #[case(Some(json!("x")), true)]
    #[case(Some(json!(7)), true)]
    #[case(Some(json!(true)), true)]
    fn test_is_present(#[case] value: Option<Value>, #[case] expected: bool) {
        assert_eq!(is_present(value.as_ref()), expected);
    }

    #[test]
    fn test_validate_create_builds_record() {
        let record = validate_create(&full_request()).unwrap();
        assert_eq!(record.idcodigo, "1");
        assert_eq!(record.codigo, "REL-001");
        assert_eq!(record.emuso, "S");
        assert_eq!(record.valorhash, "abc123");
    }

    #[test]
    fn test_validate_create_passes_id_through_as_text() {
        let mut request = full_request();
        request.idcodigo = Some(json!("abc"));
        assert_eq!(validate_create(&request).unwrap().idcodigo, "abc");
    }

    #[test]
    fn test_validate_create_stringifies_numeric_keys() {
        let mut request = full_request();
        request.chave1 = Some(json!(123));
        assert_eq!(validate_create(&request).unwrap().chave1, "123");
    }

    #[rstest]
    #[case("idcodigo", json!(0))]
    #[case("codigo", json!(""))]
    #[case("emuso", json!(null))]
    #[case("nome", json!(""))]
    #[case("email", json!(null))]
    #[case("chave1", json!(false))]
    #[case("chave2", json!(""))]
    #[case("chave3", json!(""))]
    #[case("valorhash", json!(0))]
    fn test_validate_create_blank_field(#[case] field: &str, #[case] blank: Value) {
        let mut body = full_body();
        body[field] = blank;
        let request: CreateReleaseCodeRequest = serde_json::from_value(body).unwrap();
        assert_eq!(message(validate_create(&request).unwrap_err()), MSG_REQUIRED_FIELDS);

        let mut body = full_body();
        body.as_object_mut().unwrap().remove(field);
        let request: CreateReleaseCodeRequest = serde_json::from_value(body).unwrap();
        assert_eq!(message(validate_create(&request).unwrap_err()), MSG_REQUIRED_FIELDS);
    }

    #[test]
    fn test_validate_create_presence_checked_before_email() {
        let mut request = full_request();
        request.email = Some(json!("not-an-email"));
        request.nome = None;
        assert_eq!(message(validate_create(&request).unwrap_err()), MSG_REQUIRED_FIELDS);
    }

    #[test]
    fn test_validate_create_email_checked_before_emuso() {
        let mut request = full_request();
        request.email = Some(json!("a@b"));
        request.emuso = Some(json!("X"));
        assert_eq!(message(validate_create(&request).unwrap_err()), MSG_INVALID_EMAIL);
    }

    #[test]
    fn test_validate_create_rejects_bad_emuso() {
        let mut request = full_request();
        request.emuso = Some(json!("X"));
        assert_eq!(message(validate_create(&request).unwrap_err()), MSG_INVALID_EMUSO);
    }

    #[test]
    fn test_validate_update_nulls_absent_fields() {
        let request: UpdateReleaseCodeRequest = serde_json::from_value(json!({
            "emuso": "N",
            "email": "a@b.co"
        }))
        .unwrap();
        let changes = validate_update(&request).unwrap();
        assert_eq!(changes.emuso.as_deref(), Some("N"));
        assert_eq!(changes.email.as_deref(), Some("a@b.co"));
        assert_eq!(changes.nome, None);
        assert_eq!(changes.valorhash, None);
    }

    #[test]
    fn test_validate_update_keeps_empty_strings() {
        let request: UpdateReleaseCodeRequest = serde_json::from_value(json!({
            "emuso": "S",
            "email": "a@b.co",
            "nome": ""
        }))
        .unwrap();
        assert_eq!(validate_update(&request).unwrap().nome.as_deref(), Some(""));
    }

    #[test]
    fn test_validate_update_requires_valid_email_and_emuso() {
        let missing_email: UpdateReleaseCodeRequest =
            serde_json::from_value(json!({ "emuso": "S" })).unwrap();
        assert_eq!(message(validate_update(&missing_email).unwrap_err()), MSG_INVALID_EMAIL);

        let bad_emuso: UpdateReleaseCodeRequest =
            serde_json::from_value(json!({ "emuso": "s", "email": "a@b.co" })).unwrap();
        assert_eq!(message(validate_update(&bad_emuso).unwrap_err()), MSG_INVALID_EMUSO);
    }
}
