use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Request body that accepts JSON and falls back to form encoding for any
/// other content type.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|_| ApiError::validation("Invalid data format"))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|_| ApiError::validation("Invalid data format"))?;
            Ok(Self(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Creds {
        email: Option<String>,
        password: Option<String>,
    }

    fn request(content_type: &str, body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn parses_json_bodies() {
        let req = request(
            "application/json",
            r#"{"email":"a@b.com","password":"pw"}"#,
        );
        let JsonOrForm(creds) = JsonOrForm::<Creds>::from_request(req, &()).await.unwrap();
        assert_eq!(creds.email.as_deref(), Some("a@b.com"));
        assert_eq!(creds.password.as_deref(), Some("pw"));
    }

    #[tokio::test]
    async fn falls_back_to_form_bodies() {
        let req = request(
            "application/x-www-form-urlencoded",
            "email=a%40b.com&password=pw",
        );
        let JsonOrForm(creds) = JsonOrForm::<Creds>::from_request(req, &()).await.unwrap();
        assert_eq!(creds.email.as_deref(), Some("a@b.com"));
        assert_eq!(creds.password.as_deref(), Some("pw"));
    }

    #[tokio::test]
    async fn missing_fields_come_back_as_none() {
        let req = request("application/json", "{}");
        let JsonOrForm(creds) = JsonOrForm::<Creds>::from_request(req, &()).await.unwrap();
        assert!(creds.email.is_none());
        assert!(creds.password.is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let req = request("application/json", "{not json");
        let err = JsonOrForm::<Creds>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
