//! Enquiry body extraction
//!
//! The website posts either JSON (fetch) or `application/x-www-form-urlencoded`
//! (plain HTML form). Both decode into the same `EnquiryForm`.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    Form, Json,
};

use crate::domain::entities::EnquiryForm;
use crate::error::AppError;

#[derive(Debug)]
pub struct EnquiryPayload(pub EnquiryForm);

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for EnquiryPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form_encoded(req.headers()) {
            let Form(form) = Form::<EnquiryForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(form))
        } else {
            let Json(form) = Json::<EnquiryForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(form))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    async fn extract(content_type: &str, body: &'static str) -> Result<EnquiryForm, AppError> {
        let request = Request::builder()
            .method("POST")
            .uri("/api/send-email")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        EnquiryPayload::from_request(request, &())
            .await
            .map(|EnquiryPayload(form)| form)
    }

    #[tokio::test]
    async fn decodes_json() {
        let form = extract(
            "application/json",
            r#"{"name":"Asha","email":"asha@example.com","country":"India","message":"Hi"}"#,
        )
        .await
        .unwrap();

        assert_eq!(form.name.as_deref(), Some("Asha"));
        assert_eq!(form.country.as_deref(), Some("India"));
        assert!(form.company.is_none());
    }

    #[tokio::test]
    async fn decodes_form_encoding() {
        let form = extract(
            "application/x-www-form-urlencoded; charset=UTF-8",
            "name=Asha+Rao&email=asha%40example.com&country=India&message=Hello&website=",
        )
        .await
        .unwrap();

        assert_eq!(form.name.as_deref(), Some("Asha Rao"));
        assert_eq!(form.email.as_deref(), Some("asha@example.com"));
        assert_eq!(form.website.as_deref(), Some(""));
        assert!(!form.is_spam());
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let result = extract("application/json", r#"{"name": "#).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn unsupported_content_type_is_bad_request() {
        let result = extract("text/plain", "name=Asha").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
