//! 文法役割と役割遷移の定義
//!
//! エンティティグリッドの各セルは、エンティティがその文の中で担う文法役割
//! （主語 `S`、目的語 `O`、その他 `X`、不在 `-`）を保持します。
//! 隣接する2文の役割の組を遷移と呼び、16通りの遷移が存在します。

use std::fmt;

use serde::Serialize;

/// 主語として扱う依存関係ラベル
const SUBJECT_LABELS: [&str; 4] = ["nsubj", "csubj", "csubjpass", "dsubjpass"];

/// 目的語として扱う依存関係ラベル
const OBJECT_LABELS: [&str; 4] = ["iobj", "obj", "pobj", "dobj"];

/// エンティティの文法役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Role {
    /// 主語
    #[serde(rename = "S")]
    Subject,
    /// 目的語
    #[serde(rename = "O")]
    Object,
    /// その他の依存関係
    #[serde(rename = "X")]
    Other,
    /// 文中に出現しない
    #[serde(rename = "-")]
    Absent,
}

impl Role {
    /// すべての役割（遷移表の行・列の順）
    pub const ALL: [Self; 4] = [Self::Subject, Self::Object, Self::Other, Self::Absent];

    /// 依存関係ラベルを文法役割に変換します。
    ///
    /// | 役割 | 依存関係ラベル                          |
    /// |------|-----------------------------------------|
    /// | `S`  | `nsubj`, `csubj`, `csubjpass`, `dsubjpass` |
    /// | `O`  | `iobj`, `obj`, `pobj`, `dobj`           |
    /// | `X`  | 上記以外のすべて                        |
    ///
    /// ラベルは完全一致で比較します。`nsubj:pass` のようなサブタイプ付きのラベルは `X` です。
    ///
    /// # 例
    ///
    /// ```
    /// use lectura::role::Role;
    ///
    /// assert_eq!(Role::from_dependency("nsubj"), Role::Subject);
    /// assert_eq!(Role::from_dependency("obj"), Role::Object);
    /// assert_eq!(Role::from_dependency("nmod"), Role::Other);
    /// ```
    pub fn from_dependency(dep: &str) -> Self {
        if SUBJECT_LABELS.contains(&dep) {
            Self::Subject
        } else if OBJECT_LABELS.contains(&dep) {
            Self::Object
        } else {
            Self::Other
        }
    }

    /// 役割の1文字表記を返します。
    #[inline(always)]
    pub const fn symbol(self) -> char {
        match self {
            Self::Subject => 'S',
            Self::Object => 'O',
            Self::Other => 'X',
            Self::Absent => '-',
        }
    }

    /// 1文字表記から役割を返します。
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'S' => Some(Self::Subject),
            'O' => Some(Self::Object),
            'X' => Some(Self::Other),
            '-' => Some(Self::Absent),
            _ => None,
        }
    }

    /// 統語的な重みを返します。
    ///
    /// 主語ほど結束性への寄与が大きいとみなし、`S`=3、`O`=2、`X`=1、`-`=0 とします。
    #[inline(always)]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Subject => 3,
            Self::Object => 2,
            Self::Other => 1,
            Self::Absent => 0,
        }
    }

    /// 文中に出現しているかどうかを返します。
    #[inline(always)]
    pub const fn is_present(self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// 同じ文の中で既に割り当てられた役割を `incoming` で上書きすべきかを返します。
    ///
    /// 空のセルには常に書き込みます。`S` は常に上書きし、`O` は `X` のみを上書きします。
    /// `X` は既存の役割を上書きしません。
    #[inline(always)]
    pub(crate) fn should_overwrite(self, incoming: Self) -> bool {
        match (self, incoming) {
            (Self::Absent, _) => true,
            (_, Self::Subject) => true,
            (Self::Other, Self::Object) => true,
            _ => false,
        }
    }

    #[inline(always)]
    const fn index(self) -> usize {
        match self {
            Self::Subject => 0,
            Self::Object => 1,
            Self::Other => 2,
            Self::Absent => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 隣接する2文の間での役割の遷移
///
/// `from` が前の文、`to` が後の文の役割です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    /// 前の文での役割
    pub from: Role,
    /// 後の文での役割
    pub to: Role,
}

impl Transition {
    /// 遷移の種類の数
    pub const COUNT: usize = 16;

    /// 遷移を作成します。
    pub const fn new(from: Role, to: Role) -> Self {
        Self { from, to }
    }

    /// すべての遷移を `SS, SO, SX, S-, OS, ..., --` の順で返します。
    pub fn all() -> impl Iterator<Item = Self> {
        Role::ALL
            .into_iter()
            .flat_map(|from| Role::ALL.into_iter().map(move |to| Self::new(from, to)))
    }

    /// 遷移表でのインデックス（0..16）を返します。
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.from.index() * 4 + self.to.index()
    }

    /// 2文字表記（例: `"S-"`）を返します。
    pub fn code(self) -> String {
        let mut code = String::with_capacity(2);
        code.push(self.from.symbol());
        code.push(self.to.symbol());
        code
    }

    /// 2文字表記から遷移を返します。
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let from = Role::from_symbol(chars.next()?)?;
        let to = Role::from_symbol(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self::new(from, to))
    }

    /// 特徴量名として使う小文字の名前（例: `"sn"`）を返します。`-` は `n` で表します。
    pub fn name(self) -> &'static str {
        const NAMES: [&str; Transition::COUNT] = [
            "ss", "so", "sx", "sn", "os", "oo", "ox", "on", "xs", "xo", "xx", "xn", "ns", "no",
            "nx", "nn",
        ];
        NAMES[self.index()]
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from.symbol(), self.to.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dependency() {
        for dep in SUBJECT_LABELS {
            assert_eq!(Role::Subject, Role::from_dependency(dep));
        }
        for dep in OBJECT_LABELS {
            assert_eq!(Role::Object, Role::from_dependency(dep));
        }
        assert_eq!(Role::Other, Role::from_dependency("obl"));
        assert_eq!(Role::Other, Role::from_dependency("nsubj:pass"));
        assert_eq!(Role::Other, Role::from_dependency("NSUBJ"));
        assert_eq!(Role::Other, Role::from_dependency(""));
    }

    #[test]
    fn test_should_overwrite() {
        assert!(Role::Absent.should_overwrite(Role::Other));
        assert!(Role::Object.should_overwrite(Role::Subject));
        assert!(Role::Other.should_overwrite(Role::Object));
        assert!(!Role::Subject.should_overwrite(Role::Object));
        assert!(!Role::Object.should_overwrite(Role::Other));
        assert!(!Role::Subject.should_overwrite(Role::Other));
    }

    #[test]
    fn test_transition_order() {
        let codes: Vec<String> = Transition::all().map(Transition::code).collect();
        assert_eq!(
            codes,
            [
                "SS", "SO", "SX", "S-", "OS", "OO", "OX", "O-", "XS", "XO", "XX", "X-", "-S",
                "-O", "-X", "--"
            ]
        );
        for (i, t) in Transition::all().enumerate() {
            assert_eq!(i, t.index());
            assert_eq!(Some(t), Transition::from_code(&t.code()));
        }
    }

    #[test]
    fn test_transition_name() {
        let t = Transition::new(Role::Other, Role::Absent);
        assert_eq!("xn", t.name());
        assert_eq!("X-", t.to_string());
        assert_eq!(None, Transition::from_code("SOX"));
        assert_eq!(None, Transition::from_code("Z-"));
    }
}
