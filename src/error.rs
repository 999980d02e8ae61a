//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use thiserror::Error;

/// The primary error type for the congestion controller.
/// 拥塞控制器的主要错误类型。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A configuration parameter is outside its domain.
    /// 配置参数超出了其取值范围。
    #[error("invalid configuration: `{field}` = {value} ({reason})")]
    Configuration {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The caller used the controller in a way that can never be valid,
    /// such as changing parameters after initialization.
    ///
    /// 调用方以永远无效的方式使用控制器，例如在初始化之后修改参数。
    #[error("controller misuse: {0}")]
    Misuse(&'static str),

    /// An argument violated the precondition of an operation.
    /// 参数违反了操作的前置条件。
    #[error("precondition violated: {0}")]
    Precondition(String),
}

impl Error {
    pub(crate) fn configuration(
        field: &'static str,
        value: impl std::fmt::Display,
        reason: &'static str,
    ) -> Self {
        Error::Configuration {
            field,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether the error is a caller-side logic bug that must abort setup.
    /// 该错误是否为必须终止设置流程的调用方逻辑错误。
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Misuse(_))
    }
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;
