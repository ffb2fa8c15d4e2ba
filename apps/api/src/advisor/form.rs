//! Form body extractor accepting both urlencoded and multipart submissions.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};

use crate::errors::AppError;

/// Text fields of a submitted form, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    /// Returns the trimmed value of `name`, treating blank values as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormFields {
    fn from(pairs: [(&str, &str); N]) -> Self {
        FormFields(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(format!("Invalid form body: {e}")))?;
            return Ok(FormFields(fields));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid form body: {e}")))?;

        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid form body: {e}")))?
        {
            // File parts carry no profile data.
            if field.file_name().is_some() {
                continue;
            }
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid form body: {e}")))?;
            fields.entry(name).or_insert(value);
        }
        Ok(FormFields(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;

    #[test]
    fn test_get_trims_and_skips_blank_values() {
        let fields = FormFields::from([("state", "  Ohio "), ("major", "   ")]);
        assert_eq!(fields.get("state"), Some("Ohio"));
        assert_eq!(fields.get("major"), None);
        assert_eq!(fields.get("gpa"), None);
    }

    #[tokio::test]
    async fn test_extracts_urlencoded_body() {
        let req = http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("satScore=1200&school-size=large"))
            .unwrap();
        let fields = FormFields::from_request(req, &()).await.unwrap();
        assert_eq!(fields.get("satScore"), Some("1200"));
        assert_eq!(fields.get("school-size"), Some("large"));
    }

    #[tokio::test]
    async fn test_extracts_multipart_body() {
        let body = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"satScore\"\r\n\r\n\
            1350\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"state\"\r\n\r\n\
            Texas\r\n\
            --XYZ--\r\n";
        let req = http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "multipart/form-data; boundary=XYZ")
            .body(Body::from(body))
            .unwrap();
        let fields = FormFields::from_request(req, &()).await.unwrap();
        assert_eq!(fields.get("satScore"), Some("1350"));
        assert_eq!(fields.get("state"), Some("Texas"));
    }

    #[tokio::test]
    async fn test_rejects_wrong_content_type() {
        let req = http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let err = FormFields::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
