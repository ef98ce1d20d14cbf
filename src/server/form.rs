//! Post form decoding

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};

use super::AppError;
use crate::content::{NewPost, PostUpdate};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Fields submitted by the create and edit forms
///
/// Missing fields are empty. When a field repeats, the first value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub tagline: String,
    pub body: String,
    pub published: String,
}

impl PostForm {
    /// Decode the request body, then fill in from the query string
    ///
    /// Body values come before query values, so the body wins when both
    /// carry a field. A request without a content type contributes only its
    /// query string.
    pub async fn from_request(request: Request) -> Result<Self, AppError> {
        let query = request.uri().query().unwrap_or_default().to_owned();

        let mut pairs = match media_type(request.headers()).as_str() {
            "" => Vec::new(),
            FORM_CONTENT_TYPE => {
                let body = Bytes::from_request(request, &())
                    .await
                    .map_err(|e| AppError::body(e.status(), e.body_text()))?;
                decode_urlencoded(&body)?
            }
            MULTIPART_CONTENT_TYPE => {
                let multipart = Multipart::from_request(request, &())
                    .await
                    .map_err(|e| AppError::body(e.status(), e.body_text()))?;
                multipart_fields(multipart).await?
            }
            other => {
                return Err(AppError::Validation(format!(
                    "unsupported content type `{}`",
                    other
                )))
            }
        };

        pairs.extend(decode_urlencoded(query.as_bytes())?);
        Ok(Self::from_pairs(pairs))
    }

    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = PostForm::default();
        let mut seen = [false; 4];
        for (key, value) in pairs {
            let (slot, field) = match key.as_str() {
                "title" => (0, &mut form.title),
                "tagline" => (1, &mut form.tagline),
                "body" => (2, &mut form.body),
                "published" => (3, &mut form.published),
                _ => continue,
            };
            if !seen[slot] {
                seen[slot] = true;
                *field = value;
            }
        }
        form
    }

    /// Only the literal string "true" publishes
    pub fn is_published(&self) -> bool {
        self.published == "true"
    }

    pub fn into_new_post(self, slug: String) -> NewPost {
        let published = self.is_published();
        NewPost {
            title: self.title,
            tagline: self.tagline,
            body: self.body,
            slug,
            published,
        }
    }

    pub fn into_update(self) -> PostUpdate {
        let published = self.is_published();
        PostUpdate {
            title: self.title,
            tagline: self.tagline,
            body: self.body,
            published,
        }
    }
}

/// Lowercased media type without parameters, empty when absent
fn media_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn decode_urlencoded(input: &[u8]) -> Result<Vec<(String, String)>, AppError> {
    check_percent_escapes(input)?;
    serde_urlencoded::from_bytes(input).map_err(|e| AppError::Validation(e.to_string()))
}

async fn multipart_fields(mut multipart: Multipart) -> Result<Vec<(String, String)>, AppError> {
    let mut pairs = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::body(e.status(), e.body_text()))?
    {
        // File uploads are not form values
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| AppError::body(e.status(), e.body_text()))?;
        pairs.push((name, value));
    }
    Ok(pairs)
}

/// Reject `%` not followed by two hex digits
fn check_percent_escapes(input: &[u8]) -> Result<(), AppError> {
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%' {
            let valid = input
                .get(i + 1..i + 3)
                .map_or(false, |hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(AppError::Validation(format!(
                    "invalid percent escape at byte {}",
                    i
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
