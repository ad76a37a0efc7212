//! 强类型 ID 定义
//!
//! 均为数据库生成的 64 位自增主键

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 教师 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
    sqlx::Type,
)]
#[display("{_0}")]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TeacherId(pub i64);

/// 学科 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
    sqlx::Type,
)]
#[display("{_0}")]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct SubjectId(pub i64);

/// 物料 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
    sqlx::Type,
)]
#[display("{_0}")]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct MaterialId(pub i64);

/// 物料版本 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
    sqlx::Type,
)]
#[display("{_0}")]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct MaterialVersionId(pub i64);
