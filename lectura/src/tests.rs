//! Lecturaのテストモジュール群
//!
//! 各コンポーネント（エンティティグリッド、局所的結束性、CoNLL-U、表層的な指標）を
//! 組み合わせた動作を検証するテストを含みます。

mod properties;
