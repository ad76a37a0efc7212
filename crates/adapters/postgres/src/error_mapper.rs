//! 数据库错误映射工具
//!
//! 提供统一的 SQLx 错误到 AppError 的转换

use materials_errors::AppError;

/// 将 SQLx 错误转换为 AppError，区分不同错误类型
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => match db_err.code() {
            // PostgreSQL 约束违规代码
            Some(code) => match code.as_ref() {
                "23505" => AppError::conflict("Duplicate entry violates unique constraint"),
                "23P01" => AppError::conflict("Exclusion constraint violation"),
                "23503" => AppError::validation("foreign key constraint violation"),
                "23514" => AppError::validation("Check constraint violation"),
                "23502" => AppError::validation("Not null constraint violation"),
                "22001" => AppError::validation("String data too long"),
                _ => AppError::database(format!("Database error ({code}): {db_err}")),
            },
            None => AppError::database(db_err.to_string()),
        },
        sqlx::Error::PoolTimedOut => AppError::database("Database connection pool timeout"),
        sqlx::Error::PoolClosed => AppError::database("Database connection pool is closed"),
        _ => AppError::database(e.to_string()),
    }
}

/// 判断 sqlx 错误是否可重试（仅用于建立连接）
pub fn is_sqlx_retryable(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| {
            // 57P03: cannot_connect_now, 08xxx: connection_exception
            code == "57P03" || code.starts_with("08")
        }),
        _ => false,
    }
}
