//! エラー型の定義
//!
//! このモジュールは、Lecturaライブラリで使用されるすべてのエラー型を定義します。

use std::error::Error;
use std::fmt;

/// Lectura専用のResult型
///
/// エラー型としてデフォルトで[`LecturaError`]を使用します。
pub type Result<T, E = LecturaError> = std::result::Result<T, E>;

/// Lecturaのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
/// 各バリアントは特定のエラー条件に対応しています。
#[derive(Debug, thiserror::Error)]
pub enum LecturaError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 入力不足エラー
    ///
    /// [`InsufficientInputError`]のエラーバリアント。
    /// エンティティグリッドの構築に必要な文数が足りない場合に発生します。
    #[error(transparent)]
    InsufficientInput(InsufficientInputError),

    /// ディレクトリが指定されたエラー
    ///
    /// ファイルが期待される場所にディレクトリが指定された場合に発生します。
    #[error("The path '{0}' is a directory, but a file was expected.")]
    PathIsDirectory(std::path::PathBuf),

    /// I/Oエラー
    ///
    /// [`std::io::Error`]のエラーバリアント。
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl LecturaError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// 入力不足エラーを生成します
    ///
    /// # 引数
    ///
    /// * `required` - 必要な文数
    /// * `found` - 実際の文数
    pub(crate) fn insufficient_input(required: usize, found: usize) -> Self {
        Self::InsufficientInput(InsufficientInputError { required, found })
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// 文数が足りない場合に使用されるエラー
#[derive(Debug)]
pub struct InsufficientInputError {
    /// 必要な文数
    pub(crate) required: usize,

    /// 実際に見つかった文数
    pub(crate) found: usize,
}

impl InsufficientInputError {
    /// 必要な文数を返します。
    pub fn required(&self) -> usize {
        self.required
    }

    /// 入力に含まれていた文数を返します。
    pub fn found(&self) -> usize {
        self.found
    }
}

impl fmt::Display for InsufficientInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "InsufficientInputError: entity grid needs at least {} sentences, found: {}",
            self.required, self.found
        )
    }
}

impl Error for InsufficientInputError {}
