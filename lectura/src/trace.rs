//! 中間計算の構造化トレース
//!
//! 文どうしの比較などの中間結果を、呼び出し側が所有する [`Trace`] に記録します。
//! トレースは関数の引数として明示的に渡され、プロセス全体で共有される状態は持ちません。

use std::fmt;

use serde::Serialize;

/// トレースに記録されるイベント
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// 隣接する2文の品詞分布を比較した
    PosComparison {
        /// 前の文の位置（0始まり）
        first: usize,
        /// 後の文の位置（0始まり）
        second: usize,
        /// 品詞ごとの出現数の差の絶対値の和
        difference: usize,
        /// 2文の品詞の出現数の和
        total: usize,
    },

    /// 係り受け木の2つのノードが一致した
    NodeMatch {
        /// 1つ目の木のノードの表層形
        first: String,
        /// 2つ目の木のノードの表層形
        second: String,
        /// 中心ノード（ルート）どうしの一致かどうか
        central: bool,
    },

    /// 隣接する2文の統語的類似度を計算した
    SentenceSimilarity {
        /// 前の文の位置（0始まり）
        first: usize,
        /// 後の文の位置（0始まり）
        second: usize,
        /// 一致したノードの数
        common: usize,
        /// 2文のトークン数の和から一致数を引いた値
        total: usize,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PosComparison {
                first,
                second,
                difference,
                total,
            } => write!(
                f,
                "pos s{} vs s{}: {} / {}",
                first + 1,
                second + 1,
                difference,
                total
            ),
            Self::NodeMatch {
                first,
                second,
                central,
            } => {
                if *central {
                    write!(f, "root match {} - {}", first, second)
                } else {
                    write!(f, "node match {} - {}", first, second)
                }
            }
            Self::SentenceSimilarity {
                first,
                second,
                common,
                total,
            } => write!(
                f,
                "syntax s{} vs s{}: {} common of {}",
                first + 1,
                second + 1,
                common,
                total
            ),
        }
    }
}

/// 呼び出し側が所有するトレース
///
/// # 例
///
/// ```
/// use lectura::trace::Trace;
///
/// let mut trace = Trace::new();
/// assert!(trace.is_enabled());
/// assert!(trace.events().is_empty());
///
/// let trace = Trace::disabled();
/// assert!(!trace.is_enabled());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    enabled: bool,
    events: Vec<TraceEvent>,
}

impl Trace {
    /// 記録を行うトレースを作成します。
    pub fn new() -> Self {
        Self {
            enabled: true,
            events: vec![],
        }
    }

    /// 何も記録しないトレースを作成します。
    pub fn disabled() -> Self {
        Self::default()
    }

    /// 記録が有効かどうかを返します。
    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// イベントを記録します。
    ///
    /// イベントは記録が有効な場合にのみ生成されます。
    #[inline(always)]
    pub fn record<F>(&mut self, event: F)
    where
        F: FnOnce() -> TraceEvent,
    {
        if self.enabled {
            self.events.push(event());
        }
    }

    /// 記録されたイベントを返します。
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// 記録されたイベントを消去します。
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_trace_records_nothing() {
        let mut trace = Trace::disabled();
        trace.record(|| unreachable!());
        assert!(trace.events().is_empty());
    }

    #[test]
    fn test_trace_display() {
        let mut trace = Trace::new();
        trace.record(|| TraceEvent::PosComparison {
            first: 0,
            second: 1,
            difference: 2,
            total: 8,
        });
        assert_eq!(1, trace.events().len());
        assert_eq!("pos s1 vs s2: 2 / 8", trace.events()[0].to_string());
        trace.clear();
        assert!(trace.events().is_empty());
    }
}
