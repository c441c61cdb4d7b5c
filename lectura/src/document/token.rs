//! 構文解析済みトークンの定義
//!
//! このモジュールは、外部のNLPパイプラインが出力したトークンを表現する型を提供します。
//! トークンは表層形、見出し語、品詞、形態素性、係り先、依存関係ラベルを保持し、
//! 構築後は変更されません。修正が必要な場合は新しいトークンを生成します。

use std::fmt;
use std::str::FromStr;

use crate::utils::parse_feats;

/// Universal Dependencies の品詞タグ（UPOS）
///
/// 17種類の標準タグに加えて、spaCy が出力する `SPACE` と、
/// 未知のタグを保持する [`Pos::Other`] を持ちます。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pos {
    /// 形容詞
    Adj,
    /// 前置詞・後置詞
    Adp,
    /// 副詞
    Adv,
    /// 助動詞
    Aux,
    /// 等位接続詞
    Cconj,
    /// 限定詞
    Det,
    /// 間投詞
    Intj,
    /// 名詞
    Noun,
    /// 数詞
    Num,
    /// 小辞
    Part,
    /// 代名詞
    Pron,
    /// 固有名詞
    Propn,
    /// 句読点
    Punct,
    /// 従位接続詞
    Sconj,
    /// 記号
    Sym,
    /// 動詞
    Verb,
    /// その他
    X,
    /// 空白
    Space,
    /// 未知のタグ
    Other(String),
}

impl Pos {
    /// タグ文字列を返します。
    pub fn as_str(&self) -> &str {
        match self {
            Self::Adj => "ADJ",
            Self::Adp => "ADP",
            Self::Adv => "ADV",
            Self::Aux => "AUX",
            Self::Cconj => "CCONJ",
            Self::Det => "DET",
            Self::Intj => "INTJ",
            Self::Noun => "NOUN",
            Self::Num => "NUM",
            Self::Part => "PART",
            Self::Pron => "PRON",
            Self::Propn => "PROPN",
            Self::Punct => "PUNCT",
            Self::Sconj => "SCONJ",
            Self::Sym => "SYM",
            Self::Verb => "VERB",
            Self::X => "X",
            Self::Space => "SPACE",
            Self::Other(tag) => tag,
        }
    }

    /// エンティティグリッドの対象となる品詞（`NOUN`、`PRON`、`PROPN`）かどうかを返します。
    #[inline(always)]
    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Noun | Self::Pron | Self::Propn)
    }

    /// 語として数える品詞かどうかを返します。
    ///
    /// `PUNCT`、`SYM`、`SPACE` 以外はすべて語とみなします。
    #[inline(always)]
    pub fn is_word(&self) -> bool {
        !matches!(self, Self::Punct | Self::Sym | Self::Space)
    }

    /// 名詞（`NOUN`、`PROPN`）かどうかを返します。
    #[inline(always)]
    pub fn is_noun(&self) -> bool {
        matches!(self, Self::Noun | Self::Propn)
    }

    /// 動詞または助動詞かどうかを返します。
    #[inline(always)]
    pub fn is_verb(&self) -> bool {
        matches!(self, Self::Verb | Self::Aux)
    }
}

impl FromStr for Pos {
    type Err = std::convert::Infallible;

    /// タグ文字列をパースします。大文字・小文字は区別しません。
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let pos = match tag.to_ascii_uppercase().as_str() {
            "ADJ" => Self::Adj,
            "ADP" => Self::Adp,
            "ADV" => Self::Adv,
            "AUX" => Self::Aux,
            "CCONJ" | "CONJ" => Self::Cconj,
            "DET" => Self::Det,
            "INTJ" => Self::Intj,
            "NOUN" => Self::Noun,
            "NUM" => Self::Num,
            "PART" => Self::Part,
            "PRON" => Self::Pron,
            "PROPN" => Self::Propn,
            "PUNCT" => Self::Punct,
            "SCONJ" => Self::Sconj,
            "SYM" => Self::Sym,
            "VERB" => Self::Verb,
            "X" => Self::X,
            "SPACE" | "_SP" => Self::Space,
            _ => Self::Other(tag.to_string()),
        };
        Ok(pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 構文解析済みのトークン
///
/// トークンは以下の情報を保持します：
/// - 表層形と見出し語
/// - 品詞（UPOS）と言語固有のタグ（XPOS）
/// - 形態素性（`Person=3|Number=Sing` のようなキーと値の組）
/// - 文内での係り先のインデックス（0始まり、ルートは `None`）
/// - 依存関係ラベル
/// - 迂言形（periphrasis）の一部として印付けされているかどうか
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    text: String,
    lemma: String,
    pos: Pos,
    xpos: String,
    feats: Vec<(String, String)>,
    head: Option<usize>,
    deprel: String,
    periphrasis: bool,
}

impl Token {
    /// 表層形、品詞、依存関係ラベルからトークンを作成します。
    ///
    /// 見出し語は表層形の小文字、係り先は `None` で初期化されます。
    ///
    /// # 引数
    ///
    /// * `text` - 表層形
    /// * `pos` - 品詞
    /// * `deprel` - 依存関係ラベル
    pub fn new<S, D>(text: S, pos: Pos, deprel: D) -> Self
    where
        S: Into<String>,
        D: Into<String>,
    {
        let text = text.into();
        Self {
            lemma: text.to_lowercase(),
            text,
            pos,
            xpos: String::new(),
            feats: vec![],
            head: None,
            deprel: deprel.into(),
            periphrasis: false,
        }
    }

    /// 見出し語を設定したトークンを返します。
    pub fn with_lemma<S>(mut self, lemma: S) -> Self
    where
        S: Into<String>,
    {
        self.lemma = lemma.into();
        self
    }

    /// 言語固有のタグを設定したトークンを返します。
    pub fn with_xpos<S>(mut self, xpos: S) -> Self
    where
        S: Into<String>,
    {
        self.xpos = xpos.into();
        self
    }

    /// 形態素性文字列（例: `Mood=Ind|Person=3|VerbForm=Fin`）を設定したトークンを返します。
    ///
    /// `_` または空文字列は形態素性なしとして扱われます。
    pub fn with_feats(mut self, feats: &str) -> Self {
        self.feats = parse_feats(feats);
        self
    }

    /// 係り先のインデックス（文内、0始まり）を設定したトークンを返します。
    pub fn with_head(mut self, head: Option<usize>) -> Self {
        self.head = head;
        self
    }

    /// 迂言形の印を付けたトークンを返します。
    pub fn with_periphrasis(mut self, periphrasis: bool) -> Self {
        self.periphrasis = periphrasis;
        self
    }

    /// 表層形を返します。
    #[inline(always)]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 見出し語を返します。
    #[inline(always)]
    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    /// 品詞を返します。
    #[inline(always)]
    pub fn pos(&self) -> &Pos {
        &self.pos
    }

    /// 言語固有のタグを返します。
    #[inline(always)]
    pub fn xpos(&self) -> &str {
        &self.xpos
    }

    /// 依存関係ラベルを返します。
    #[inline(always)]
    pub fn deprel(&self) -> &str {
        &self.deprel
    }

    /// 係り先のインデックスを返します。ルートの場合は `None` です。
    #[inline(always)]
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// 形態素性のキーと値の組を返します。
    pub fn feats(&self) -> &[(String, String)] {
        &self.feats
    }

    /// 指定したキーの形態素性の値を返します。
    ///
    /// # 例
    ///
    /// ```
    /// use lectura::document::{Pos, Token};
    ///
    /// let token = Token::new("come", Pos::Verb, "root").with_feats("Person=3|VerbForm=Fin");
    /// assert_eq!(token.feat("VerbForm"), Some("Fin"));
    /// assert_eq!(token.feat("Mood"), None);
    /// ```
    pub fn feat(&self, key: &str) -> Option<&str> {
        self.feats
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 指定したキーの形態素性が `value` を含むかどうかを返します。
    ///
    /// UD では `Person=1,3` のように複数の値がカンマで区切られることがあります。
    pub fn has_feat(&self, key: &str, value: &str) -> bool {
        self.feat(key)
            .is_some_and(|v| v.split(',').any(|part| part == value))
    }

    /// 迂言形の一部として印付けされているかどうかを返します。
    #[inline(always)]
    pub fn is_periphrasis(&self) -> bool {
        self.periphrasis
    }

    /// 文のルートかどうかを返します。
    ///
    /// 係り先がない、または依存関係ラベルが `root`（大文字・小文字を区別しない）の場合に真です。
    pub fn is_root(&self) -> bool {
        self.head.is_none() || self.deprel.eq_ignore_ascii_case("root")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_from_str() {
        assert_eq!(Pos::Noun, "NOUN".parse::<Pos>().unwrap());
        assert_eq!(Pos::Propn, "propn".parse::<Pos>().unwrap());
        assert_eq!(Pos::Space, "SPACE".parse::<Pos>().unwrap());
        assert_eq!(Pos::Other("FOO".to_string()), "FOO".parse::<Pos>().unwrap());
    }

    #[test]
    fn test_pos_classes() {
        assert!(Pos::Pron.is_entity());
        assert!(!Pos::Verb.is_entity());
        assert!(Pos::Adj.is_word());
        assert!(!Pos::Punct.is_word());
        assert!(!Pos::Sym.is_word());
        assert!(Pos::Aux.is_verb());
    }

    #[test]
    fn test_token_feats() {
        let token = Token::new("Nosotros", Pos::Pron, "nsubj").with_feats("Number=Plur|Person=1,3");
        assert_eq!(token.lemma(), "nosotros");
        assert!(token.has_feat("Person", "1"));
        assert!(token.has_feat("Person", "3"));
        assert!(!token.has_feat("Person", "2"));
        assert!(token.is_root());
    }

    #[test]
    fn test_token_root() {
        let token = Token::new("perro", Pos::Noun, "nsubj").with_head(Some(1));
        assert!(!token.is_root());
        let token = Token::new("ladra", Pos::Verb, "ROOT").with_head(Some(1));
        assert!(token.is_root());
    }
}
