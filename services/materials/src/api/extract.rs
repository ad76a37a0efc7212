//! 请求提取器
//!
//! 把 axum 的 JSON 和路径解析错误统一转换为 Problem Details 格式的 Validation 错误

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use materials_errors::{AppError, AppResult};
use serde::de::DeserializeOwned;

/// JSON 请求体
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::validation(e.body_text()))?;
        Ok(Self(value))
    }
}

/// 路径参数
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| AppError::validation(e.body_text()))?;
        Ok(Self(value))
    }
}

/// ID 必须为正整数
pub fn positive_id(field: &str, raw: i64) -> AppResult<i64> {
    if raw < 1 {
        return Err(AppError::validation(format!("{field} must be at least 1, got {raw}")));
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_id() {
        assert_eq!(positive_id("teacher_id", 1).unwrap(), 1);
        assert!(matches!(positive_id("teacher_id", 0), Err(AppError::Validation(_))));
        assert!(positive_id("material_id", -3).is_err());
    }
}
