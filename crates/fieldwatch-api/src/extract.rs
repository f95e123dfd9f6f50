//! Request body extraction.
//!
//! Submissions arrive either as JSON or as URL-encoded forms. Both are
//! turned into a JSON value for the service; form fields become strings.
//! Any other content type, or none, is refused with the 400 envelope.

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::{Form, Json};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A JSON or form-encoded request body as a JSON value.
#[derive(Debug)]
pub struct ApiBody(pub Value);

/// Body encodings accepted for submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFormat {
    Json,
    Form,
}

impl BodyFormat {
    fn of(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
        let mime = value.split(';').next()?.trim().to_ascii_lowercase();
        if mime == "application/json" || mime.ends_with("+json") {
            Some(Self::Json)
        } else if mime == "application/x-www-form-urlencoded" {
            Some(Self::Form)
        } else {
            None
        }
    }
}

impl<S: Send + Sync> FromRequest<S> for ApiBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match BodyFormat::of(req.headers()) {
            Some(BodyFormat::Json) => {
                let Json(value) = Json::<Value>::from_request(req, state).await?;
                Ok(Self(value))
            }
            Some(BodyFormat::Form) => {
                let Form(fields) = Form::<Map<String, Value>>::from_request(req, state).await?;
                Ok(Self(Value::Object(fields)))
            }
            None => Err(ApiError::Body {
                status: StatusCode::BAD_REQUEST,
                detail: "Expected a JSON or URL-encoded form body".to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn recognises_body_formats() {
        assert_eq!(
            BodyFormat::of(&headers("application/json; charset=utf-8")),
            Some(BodyFormat::Json)
        );
        assert_eq!(
            BodyFormat::of(&headers("application/vnd.api+json")),
            Some(BodyFormat::Json)
        );
        assert_eq!(
            BodyFormat::of(&headers("application/x-www-form-urlencoded")),
            Some(BodyFormat::Form)
        );
        assert_eq!(BodyFormat::of(&headers("text/plain")), None);
        assert_eq!(BodyFormat::of(&HeaderMap::new()), None);
    }
}
