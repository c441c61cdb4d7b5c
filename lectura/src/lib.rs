//! # Lectura
//!
//! Lecturaは、構文解析済みのスペイン語テキストから、エンティティグリッドに基づく
//! 局所的結束性と表層的な読みやすさの指標を計算するライブラリです。
//!
//! ## 概要
//!
//! 外部のNLPパイプラインが出力した係り受け解析の結果（CoNLL-U形式など）を入力とし、
//! 文章の結束性や複雑さを数値化した特徴量を計算します。計算は純粋関数で、
//! 入力の文書は変更されません。
//!
//! ## 主な機能
//!
//! - **エンティティグリッド**: 名詞・代名詞・固有名詞の文法役割（`S`、`O`、`X`、`-`）を
//!   文ごとに並べた表と、16種類の役割遷移の確率
//! - **局所的結束性**: エンティティグラフの射影に基づく6種類の指標
//!   （`PU`、`PW`、`PACC` とその距離減衰版）
//! - **表層的な指標**: 語数、平均語長、語彙密度、統語的類似度など
//! - **構文解析の補正**: 動詞の見出し語の補正と迂言形の印付け
//! - **CoNLL-U形式の読み込み**
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use lectura::{compute_local_coherence, EntityGrid, ParsedDocument};
//!
//! let conllu = "\
//! 1\tEl\tel\tDET\t_\t_\t2\tdet\t_\t_
//! 2\tperro\tperro\tNOUN\t_\t_\t3\tnsubj\t_\t_
//! 3\tladra\tladrar\tVERB\t_\t_\t0\troot\t_\t_
//!
//! 1\tJuan\tJuan\tPROPN\t_\t_\t2\tnsubj\t_\t_
//! 2\tve\tver\tVERB\t_\t_\t0\troot\t_\t_
//! 3\tal\tal\tADP\t_\t_\t4\tcase\t_\t_
//! 4\tperro\tperro\tNOUN\t_\t_\t2\tobj\t_\t_
//!
//! ";
//! let doc = ParsedDocument::from_conllu(conllu.as_bytes())?;
//!
//! let grid = EntityGrid::new(&doc)?;
//! assert_eq!(grid.sentence_count(), 2);
//! assert_eq!(grid.so_transitions(), 0.5);
//! assert_eq!(grid.ns_transitions(), 0.5);
//!
//! let (pu, pw, pacc, _, _, _) = compute_local_coherence(&grid).as_tuple();
//! assert_eq!(pu, 0.5);
//! assert_eq!(pw, 0.5);
//! assert_eq!(pacc, 3.0);
//! # Ok(())
//! # }
//! ```

/// 局所的結束性の計算
pub mod coherence;

/// CoNLL-U形式の読み込み
pub mod conllu;

/// 構文解析結果の補正
pub mod correction;

/// 構文解析済み文書のデータ構造
pub mod document;

/// エンティティグリッドの構築
pub mod entity_grid;

/// エラー型の定義
pub mod errors;

/// 既知性の指標
pub mod givenness;

/// 文法役割と役割遷移
pub mod role;

/// 表層的な読みやすさの指標
pub mod surface;

/// 中間計算のトレース
pub mod trace;

/// 内部ユーティリティ関数
pub mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use coherence::{compute_local_coherence, LocalCoherence};
pub use document::ParsedDocument;
pub use entity_grid::{EntityGrid, EntityGridBuilder};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
