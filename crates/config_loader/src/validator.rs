//! 配置校验模块
//!
//! 校验规则：
//! - handler_timeout_ms > 0 (如设置)
//! - logging.level 为已知级别或合法 filter directive
//! - metrics_port != 0 (如设置)

use contracts::{ContractError, Settings};

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// 校验 Settings 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(settings: &Settings) -> Result<(), ContractError> {
    validate_dispatcher(settings)?;
    validate_logging(settings)?;
    Ok(())
}

/// 校验分发器配置
fn validate_dispatcher(settings: &Settings) -> Result<(), ContractError> {
    if settings.dispatcher.handler_timeout_ms == Some(0) {
        return Err(ContractError::config_validation(
            "dispatcher.handler_timeout_ms",
            "handler_timeout_ms must be > 0, omit it to wait indefinitely",
        ));
    }
    Ok(())
}

/// 校验日志配置
fn validate_logging(settings: &Settings) -> Result<(), ContractError> {
    let level = settings.logging.level.trim();
    let is_level = LOG_LEVELS.contains(&level.to_lowercase().as_str());
    // e.g. "dispatcher=debug,info"
    let is_directive = !level.is_empty() && level.contains('=');

    if !is_level && !is_directive {
        return Err(ContractError::config_validation(
            "logging.level",
            format!("unknown log level '{}'", settings.logging.level),
        ));
    }

    if settings.logging.metrics_port == Some(0) {
        return Err(ContractError::config_validation(
            "logging.metrics_port",
            "metrics_port must be > 0",
        ));
    }
    Ok(())
}
