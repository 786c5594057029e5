//! Request extractors that run structural validation before any handler.
//!
//! Both reject with [`AppError::InvalidPayload`], so malformed input always
//! reaches the client as the 400 envelope and never as axum's native
//! rejection (415/422 with a plain-text body).

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, HeaderValue},
};
use serde_json::Value;
use tracing::warn;

use crate::error::AppError;
use crate::validation::{parse_body, parse_path_integer, FieldError, FieldErrorKind, FromPayload};

/// A JSON body decoded into `T`, with every field failure collected.
///
/// The body is decoded as JSON when `Content-Type` is absent, `application/json`
/// or an `application/*+json` type. Any other declared type leaves the raw
/// body undecoded, which can never form an object.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: FromPayload + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json_body = is_json_content_type(req.headers().get(header::CONTENT_TYPE));

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            warn!(%rejection, "Request body could not be read");
            reject(vec![FieldError::new(
                FieldErrorKind::BodyUnreadable,
                vec!["body".into()],
            )])
        })?;

        if !json_body && !bytes.iter().all(u8::is_ascii_whitespace) {
            let raw = String::from_utf8_lossy(&bytes).into_owned();
            return Err(reject(vec![FieldError::new(
                FieldErrorKind::ModelType,
                vec!["body".into()],
            )
            .with_input(Value::String(raw))]));
        }

        let value = parse_body(&bytes).map_err(|err| reject(vec![err]))?;
        T::from_payload(&value).map(Payload).map_err(reject)
    }
}

/// Signed `{index}` path segment. Range checks are left to the store.
#[derive(Debug, Clone, Copy)]
pub struct ItemIndex(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ItemIndex
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                warn!(%rejection, "Path parameter could not be read");
                reject(vec![FieldError::in_path(FieldErrorKind::IntParsing, "index")])
            })?;

        parse_path_integer("index", &raw)
            .map(ItemIndex)
            .map_err(|err| reject(vec![err]))
    }
}

fn is_json_content_type(value: Option<&HeaderValue>) -> bool {
    let Some(value) = value else {
        return true;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

/// Joins two extraction results, keeping every structural failure.
///
/// When both sides are malformed their field errors are concatenated, first
/// side first; otherwise the first failure wins.
pub fn both<A, B>(
    first: Result<A, AppError>,
    second: Result<B, AppError>,
) -> Result<(A, B), AppError> {
    match (first, second) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(AppError::InvalidPayload(mut errors)), Err(AppError::InvalidPayload(more))) => {
            errors.extend(more);
            Err(AppError::InvalidPayload(errors))
        }
        (Err(err), _) | (_, Err(err)) => Err(err),
    }
}

fn reject(errors: Vec<FieldError>) -> AppError {
    let codes: Vec<&str> = errors.iter().map(|e| e.kind.code()).collect();
    warn!(?codes, "Rejected malformed request");
    AppError::InvalidPayload(errors)
}
