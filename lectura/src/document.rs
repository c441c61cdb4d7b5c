//! 構文解析済み文書のデータ構造
//!
//! このモジュールは、外部のNLPパイプライン（トークン化、品詞付与、係り受け解析、
//! 見出し語化、文分割）の出力を表現する不変の値型を提供します。
//!
//! # 主要な構造体
//!
//! - [`ParsedDocument`]: 文の列
//! - [`Sentence`]: トークン列と係り受け木
//! - [`Token`]: 表層形、品詞、依存関係ラベルなど
pub mod sentence;
pub mod token;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::conllu;
use crate::errors::{LecturaError, Result};

pub use sentence::Sentence;
pub use token::{Pos, Token};

/// 構文解析済みの文書
///
/// 文書は一度構築されると変更されません。修正版が必要な処理
/// （[`crate::correction`] など）は新しい文書を返します。
#[derive(Default, Clone, Debug, PartialEq)]
pub struct ParsedDocument {
    id: Option<String>,
    sentences: Vec<Sentence>,
}

impl ParsedDocument {
    /// 文の列から文書を作成します。
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self {
            id: None,
            sentences,
        }
    }

    /// 文書IDを設定した文書を返します。
    pub fn with_id<S>(mut self, id: S) -> Self
    where
        S: Into<String>,
    {
        self.id = Some(id.into());
        self
    }

    /// CoNLL-U形式のリーダーから文書を読み込みます。
    ///
    /// 入力全体を1つの文書として扱います。詳細は [`conllu::read_document`] を参照してください。
    ///
    /// # エラー
    ///
    /// 入力形式が不正な場合、[`LecturaError`] が返されます。
    pub fn from_conllu<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        conllu::read_document(rdr)
    }

    /// CoNLL-U形式のファイルから文書を読み込みます。
    ///
    /// # 引数
    ///
    /// * `path` - CoNLL-Uファイルへのパス
    ///
    /// # エラー
    ///
    /// パスがディレクトリの場合は [`LecturaError::PathIsDirectory`]、
    /// 読み込みや形式に問題がある場合はその他の [`LecturaError`] が返されます。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(LecturaError::PathIsDirectory(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_conllu(file)
    }

    /// 文書IDを返します。
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// 文のスライスを返します。
    #[inline(always)]
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// 文の数を返します。
    #[inline(always)]
    pub fn num_sentences(&self) -> usize {
        self.sentences.len()
    }

    /// 文書中のすべてのトークンを文の順に返すイテレータ
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.sentences.iter().flat_map(|sent| sent.tokens().iter())
    }

    /// 各文に関数を適用した新しい文書を返します（内部メソッド）
    pub(crate) fn map_sentences<F>(&self, f: F) -> Self
    where
        F: FnMut(&Sentence) -> Sentence,
    {
        Self {
            id: self.id.clone(),
            sentences: self.sentences.iter().map(f).collect(),
        }
    }
}
