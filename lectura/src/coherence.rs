//! エンティティグラフに基づく局所的結束性
//!
//! エンティティグリッドを「文 × エンティティ」の二部グラフとみなし、
//! 文どうしの一部射影（one-mode projection）から6種類の局所的結束性を計算します。
//!
//! | 名前        | 文の組 (i, j) の重み                          |
//! |-------------|-----------------------------------------------|
//! | `PU`        | 共有エンティティが1つでもあれば 1             |
//! | `PW`        | 共有エンティティの数                          |
//! | `PACC`      | 共有エンティティの役割の重みの積の和          |
//! | `*_dist`    | 上記を文の距離 `j - i` で割ったもの           |
//!
//! いずれも上三角（`i < j`）の重みの総和を文数で割った値です。

use serde::Serialize;

use crate::entity_grid::EntityGrid;
use crate::role::Role;

/// 6種類の局所的結束性
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LocalCoherence {
    /// 重みなし射影
    #[serde(rename = "local_coherence_PU")]
    pub pu: f64,
    /// 共有エンティティ数で重み付けした射影
    #[serde(rename = "local_coherence_PW")]
    pub pw: f64,
    /// 統語的役割で重み付けした射影
    #[serde(rename = "local_coherence_PACC")]
    pub pacc: f64,
    /// 距離で減衰させた `pu`
    #[serde(rename = "local_coherence_PU_dist")]
    pub pu_dist: f64,
    /// 距離で減衰させた `pw`
    #[serde(rename = "local_coherence_PW_dist")]
    pub pw_dist: f64,
    /// 距離で減衰させた `pacc`
    #[serde(rename = "local_coherence_PACC_dist")]
    pub pacc_dist: f64,
}

impl LocalCoherence {
    /// 特徴量名（[`Self::as_array`] の順）
    pub const NAMES: [&'static str; 6] = [
        "local_coherence_PU",
        "local_coherence_PW",
        "local_coherence_PACC",
        "local_coherence_PU_dist",
        "local_coherence_PW_dist",
        "local_coherence_PACC_dist",
    ];

    /// `(PU, PW, PACC, PU_dist, PW_dist, PACC_dist)` の組を返します。
    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64, f64) {
        (
            self.pu,
            self.pw,
            self.pacc,
            self.pu_dist,
            self.pw_dist,
            self.pacc_dist,
        )
    }

    /// [`Self::as_tuple`] と同じ順の配列を返します。
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.pu,
            self.pw,
            self.pacc,
            self.pu_dist,
            self.pw_dist,
            self.pacc_dist,
        ]
    }
}

/// 文どうしの射影グラフ
///
/// `n × n` の密行列を2つ保持します。値が入るのは上三角（`i < j`）のみです。
///
/// * `shared` - 文 `i` と `j` の両方に出現するエンティティの数
/// * `weighted` - それらのエンティティの役割の重みの積の和
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionGraph {
    n: usize,
    shared: Vec<u64>,
    weighted: Vec<u64>,
}

impl ProjectionGraph {
    /// エンティティグリッドから射影グラフを構築します。
    ///
    /// 計算量は O(E · n²) です（E はエンティティ数、n は文数）。
    /// 各エンティティについて出現する文を一度だけ抜き出し、その組だけを走査します。
    pub fn from_grid(grid: &EntityGrid) -> Self {
        let n = grid.sentence_count();
        let mut shared = vec![0; n * n];
        let mut weighted = vec![0; n * n];

        let mut mentions: Vec<(usize, Role)> = Vec::with_capacity(n);
        for (_, roles) in grid.grid() {
            mentions.clear();
            mentions.extend(
                roles
                    .iter()
                    .enumerate()
                    .filter(|(_, role)| role.is_present())
                    .map(|(i, &role)| (i, role)),
            );
            for (k, &(i, role_i)) in mentions.iter().enumerate() {
                for &(j, role_j) in &mentions[k + 1..] {
                    shared[i * n + j] += 1;
                    weighted[i * n + j] += u64::from(role_i.weight() * role_j.weight());
                }
            }
        }

        Self {
            n,
            shared,
            weighted,
        }
    }

    /// 文の数を返します。
    #[inline(always)]
    pub fn num_sentences(&self) -> usize {
        self.n
    }

    // 上三角の外（`i >= j` または `j >= n`）は None
    #[inline(always)]
    fn cell(&self, i: usize, j: usize) -> Option<usize> {
        (i < j && j < self.n).then(|| i * self.n + j)
    }

    /// 文 `i` と `j` の共有エンティティ数（`PW` の重み）を返します。
    ///
    /// `i >= j` の場合、または `j` が文数以上の場合は常に0です。
    #[inline(always)]
    pub fn shared(&self, i: usize, j: usize) -> u64 {
        self.cell(i, j).map_or(0, |k| self.shared[k])
    }

    /// 文 `i` と `j` の間に辺があるかどうか（`PU` の重み）を返します。
    #[inline(always)]
    pub fn connected(&self, i: usize, j: usize) -> bool {
        self.shared(i, j) != 0
    }

    /// 文 `i` と `j` の役割の重みの和（`PACC` の重み）を返します。
    ///
    /// [`Self::shared`] と同じく、上三角の外では0です。
    #[inline(always)]
    pub fn weighted(&self, i: usize, j: usize) -> u64 {
        self.cell(i, j).map_or(0, |k| self.weighted[k])
    }

    /// 6種類の局所的結束性を計算します。
    ///
    /// 文数が2未満の場合はすべて0です。
    pub fn local_coherence(&self) -> LocalCoherence {
        let n = self.n;
        if n < 2 {
            return LocalCoherence::default();
        }

        let mut scores = LocalCoherence::default();
        for i in 0..n {
            for j in i + 1..n {
                let shared = self.shared(i, j);
                if shared == 0 {
                    continue;
                }
                let weighted = self.weighted(i, j) as f64;
                let shared = shared as f64;
                // j > i なので距離は1以上
                let distance = (j - i) as f64;

                scores.pu += 1.0;
                scores.pw += shared;
                scores.pacc += weighted;
                scores.pu_dist += 1.0 / distance;
                scores.pw_dist += shared / distance;
                scores.pacc_dist += weighted / distance;
            }
        }

        let n = n as f64;
        scores.pu /= n;
        scores.pw /= n;
        scores.pacc /= n;
        scores.pu_dist /= n;
        scores.pw_dist /= n;
        scores.pacc_dist /= n;
        scores
    }
}

/// エンティティグリッドから6種類の局所的結束性を計算します。
///
/// 文数が2未満のグリッドに対してはすべて0を返します。エラーにはなりません。
///
/// # 例
///
/// ```
/// use lectura::compute_local_coherence;
/// use lectura::role::Role::{Absent, Subject};
/// use lectura::EntityGrid;
///
/// let grid = EntityGrid::from_rows(3, [("LUNA", vec![Subject, Absent, Subject])])?;
/// let (_, _, pacc, _, _, pacc_dist) = compute_local_coherence(&grid).as_tuple();
/// assert_eq!(pacc, 9.0 / 3.0);
/// assert_eq!(pacc_dist, 4.5 / 3.0);
/// # Ok::<(), lectura::errors::LecturaError>(())
/// ```
pub fn compute_local_coherence(grid: &EntityGrid) -> LocalCoherence {
    if grid.sentence_count() < 2 {
        return LocalCoherence::default();
    }
    ProjectionGraph::from_grid(grid).local_coherence()
}
