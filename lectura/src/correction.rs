//! 構文解析結果の補正
//!
//! 外部のパーザはスペイン語の活用形の見出し語や迂言形（`ir a` + 不定詞など）を
//! 正しく扱えないことがあります。このモジュールの関数は入力の文書を変更せず、
//! 補正済みの新しい文書を返します。

use std::io::{BufRead, BufReader, Read};

use hashbrown::HashMap;

use crate::document::{ParsedDocument, Token};
use crate::errors::{LecturaError, Result};

/// 活用形から不定詞への対応表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfinitiveMap {
    map: HashMap<String, String>,
}

impl InfinitiveMap {
    /// 空の対応表を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定されたリーダーから対応表を読み込みます。
    ///
    /// 各行は「活用形\t不定詞」の形式です。空行と `#` で始まる行は無視されます。
    /// 活用形は小文字に正規化されます。
    ///
    /// # 引数
    ///
    /// * `rdr` - 対応表のリーダー
    ///
    /// # エラー
    ///
    /// 2列でない行がある場合、[`LecturaError`] が返されます。
    ///
    /// # 例
    ///
    /// ```
    /// use lectura::correction::InfinitiveMap;
    ///
    /// let map = InfinitiveMap::from_reader("fue\tir\nvamos\tir\n".as_bytes())?;
    /// assert_eq!(map.get("Fue"), Some("ir"));
    /// assert_eq!(map.get("comió"), None);
    /// # Ok::<(), lectura::errors::LecturaError>(())
    /// ```
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let buf = BufReader::new(rdr);

        let mut map = Self::new();
        for (i, line) in buf.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut spl = line.split('\t');
            match (spl.next(), spl.next(), spl.next()) {
                (Some(conjugated), Some(infinitive), None) => {
                    map.insert(conjugated, infinitive);
                }
                _ => {
                    return Err(LecturaError::invalid_format(
                        "rdr",
                        format!(
                            "line {}: expected a conjugated form and an infinitive",
                            i + 1
                        ),
                    ))
                }
            }
        }
        log::debug!("[lectura] loaded {} infinitive mappings", map.len());
        Ok(map)
    }

    /// 対応を追加します。不定詞が空の場合は何もしません。
    pub fn insert<S, T>(&mut self, conjugated: S, infinitive: T)
    where
        S: AsRef<str>,
        T: Into<String>,
    {
        let infinitive = infinitive.into();
        if infinitive.is_empty() {
            return;
        }
        self.map.insert(conjugated.as_ref().to_lowercase(), infinitive);
    }

    /// 活用形に対応する不定詞を返します。大文字・小文字は区別しません。
    pub fn get(&self, conjugated: &str) -> Option<&str> {
        self.map.get(&conjugated.to_lowercase()).map(String::as_str)
    }

    /// 対応の数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 対応表が空かどうかを返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

const INFINITIVE_PERIPHRASES: &[&str] = &[
    "ir a",
    "tener que",
    "haber que",
    "haber de",
    "deber",
    "deber de",
    "poder",
    "volver a",
    "acabar de",
    "empezar a",
    "comenzar a",
    "ponerse a",
    "echar a",
    "dejar de",
    "llegar a",
    "soler",
    "venir a",
];

const GERUND_PERIPHRASES: &[&str] = &[
    "estar", "seguir", "continuar", "ir", "andar", "venir", "llevar", "quedarse",
];

const PARTICIPLE_PERIPHRASES: &[&str] = &[
    "haber", "estar", "ser", "llevar", "tener", "quedar", "dejar",
];

/// 非定形動詞の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbForm {
    /// 不定詞（`VerbForm=Inf`）
    Infinitive,
    /// 現在分詞（`VerbForm=Ger`）
    Gerund,
    /// 過去分詞（`VerbForm=Part`）
    Participle,
}

impl VerbForm {
    /// UD の `VerbForm` の値を返します。
    pub const fn feat_value(self) -> &'static str {
        match self {
            Self::Infinitive => "Inf",
            Self::Gerund => "Ger",
            Self::Participle => "Part",
        }
    }
}

/// 迂言形の助動詞の一覧
///
/// 各迂言形は、非定形動詞の直前に並ぶ見出し語の列です（例: `["ir", "a"]`）。
/// [`Default`] はスペイン語の代表的な迂言形を返します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Periphrases {
    infinitive: Vec<Vec<String>>,
    gerund: Vec<Vec<String>>,
    participle: Vec<Vec<String>>,
}

fn split_periphrases<I, S>(list: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    list.into_iter()
        .map(|p| {
            p.as_ref()
                .split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
        })
        .filter(|words| !words.is_empty())
        .collect()
}

impl Periphrases {
    /// 空の一覧を作成します。
    pub fn empty() -> Self {
        Self {
            infinitive: vec![],
            gerund: vec![],
            participle: vec![],
        }
    }

    /// 不定詞をとる迂言形を設定します。各要素は空白区切りの見出し語の列です。
    pub fn infinitive<I, S>(mut self, list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.infinitive = split_periphrases(list);
        self
    }

    /// 現在分詞をとる迂言形を設定します。
    pub fn gerund<I, S>(mut self, list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.gerund = split_periphrases(list);
        self
    }

    /// 過去分詞をとる迂言形を設定します。
    pub fn participle<I, S>(mut self, list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.participle = split_periphrases(list);
        self
    }

    /// 指定した種類の迂言形を返します。
    pub fn get(&self, form: VerbForm) -> &[Vec<String>] {
        match form {
            VerbForm::Infinitive => &self.infinitive,
            VerbForm::Gerund => &self.gerund,
            VerbForm::Participle => &self.participle,
        }
    }
}

impl Default for Periphrases {
    fn default() -> Self {
        Self::empty()
            .infinitive(INFINITIVE_PERIPHRASES)
            .gerund(GERUND_PERIPHRASES)
            .participle(PARTICIPLE_PERIPHRASES)
    }
}

/// 動詞の見出し語を対応表の不定詞で置き換えた新しい文書を返します。
///
/// 対象は `VERB` と `AUX` のトークンで、表層形が対応表にないものはそのまま残ります。
pub fn correct_lemmas(doc: &ParsedDocument, infinitives: &InfinitiveMap) -> ParsedDocument {
    doc.map_sentences(|sent| {
        let tokens = sent
            .iter()
            .map(|token| {
                let corrected = token.clone();
                if !token.pos().is_verb() {
                    return corrected;
                }
                match infinitives.get(token.text()) {
                    Some(infinitive) => corrected.with_lemma(infinitive),
                    None => corrected,
                }
            })
            .collect();
        sent.replace_tokens(tokens)
    })
}

fn matches_periphrasis(tokens: &[Token], end: usize, words: &[String]) -> bool {
    if words.len() > end {
        return false;
    }
    tokens[end - words.len()..end]
        .iter()
        .zip(words)
        .all(|(token, word)| token.lemma() == word.as_str())
}

/// 迂言形を印付けした新しい文書を返します。
///
/// 非定形動詞（`VerbForm` が `Inf`、`Ger`、`Part`）の直前の見出し語の列が一覧の迂言形と
/// 一致する場合、迂言形の2語目から非定形動詞までのトークンに印を付けます。
/// 1語の迂言形では非定形動詞のみに印が付き、直前の助動詞は節の中心として残ります。
///
/// 照合は文の中だけで行います。
///
/// # 例
///
/// ```
/// use lectura::correction::{mark_periphrasis, Periphrases};
/// use lectura::document::{ParsedDocument, Pos, Sentence, Token};
///
/// let sentence = Sentence::new(vec![
///     Token::new("Voy", Pos::Aux, "aux").with_lemma("ir").with_head(Some(2)),
///     Token::new("a", Pos::Adp, "mark").with_head(Some(2)),
///     Token::new("comer", Pos::Verb, "root").with_feats("VerbForm=Inf"),
/// ])?;
/// let doc = ParsedDocument::new(vec![sentence]);
/// let marked = mark_periphrasis(&doc, &Periphrases::default());
///
/// let flags: Vec<bool> = marked.tokens().map(Token::is_periphrasis).collect();
/// assert_eq!(flags, [false, true, true]);
/// assert!(doc.tokens().all(|t| !t.is_periphrasis()));
/// # Ok::<(), lectura::errors::LecturaError>(())
/// ```
pub fn mark_periphrasis(doc: &ParsedDocument, periphrases: &Periphrases) -> ParsedDocument {
    const FORMS: [VerbForm; 3] = [VerbForm::Infinitive, VerbForm::Gerund, VerbForm::Participle];

    doc.map_sentences(|sent| {
        let mut marks = vec![false; sent.len()];
        for form in FORMS {
            for (i, token) in sent.iter().enumerate() {
                if !token.has_feat("VerbForm", form.feat_value()) {
                    continue;
                }
                for words in periphrases.get(form) {
                    if matches_periphrasis(sent, i, words) {
                        log::trace!(
                            "[lectura] periphrasis \"{}\" before {}",
                            words.join(" "),
                            token.text()
                        );
                        for mark in &mut marks[i + 1 - words.len()..=i] {
                            *mark = true;
                        }
                    }
                }
            }
        }
        let tokens = sent
            .iter()
            .zip(marks)
            .map(|(token, mark)| token.clone().with_periphrasis(token.is_periphrasis() || mark))
            .collect();
        sent.replace_tokens(tokens)
    })
}

/// 見出し語の補正と迂言形の印付けを順に適用した新しい文書を返します。
pub fn fix_parse_tree(
    doc: &ParsedDocument,
    infinitives: &InfinitiveMap,
    periphrases: &Periphrases,
) -> ParsedDocument {
    mark_periphrasis(&correct_lemmas(doc, infinitives), periphrases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Pos, Sentence};
    use crate::surface::clause_count;

    fn haber_comido() -> ParsedDocument {
        // Juan ha comido .
        let sentence = Sentence::new(vec![
            Token::new("Juan", Pos::Propn, "nsubj").with_head(Some(2)),
            Token::new("ha", Pos::Aux, "aux")
                .with_lemma("ha")
                .with_feats("Mood=Ind|Person=3|VerbForm=Fin")
                .with_head(Some(2)),
            Token::new("comido", Pos::Verb, "root").with_feats("VerbForm=Part"),
            Token::new(".", Pos::Punct, "punct").with_head(Some(2)),
        ])
        .unwrap();
        ParsedDocument::new(vec![sentence])
    }

    #[test]
    fn test_infinitive_map_from_reader() {
        let data = "# comment\nha\thaber\n\nfui\tir\r\nvacío\t\n";
        let map = InfinitiveMap::from_reader(data.as_bytes()).unwrap();
        assert_eq!(2, map.len());
        assert_eq!(Some("haber"), map.get("HA"));
        assert_eq!(Some("ir"), map.get("fui"));
        assert_eq!(None, map.get("vacío"));
    }

    #[test]
    fn test_infinitive_map_invalid_line() {
        let result = InfinitiveMap::from_reader("ha\thaber\nroto\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_correct_lemmas() {
        let doc = haber_comido();
        let mut map = InfinitiveMap::new();
        map.insert("ha", "haber");
        map.insert("Juan", "juanear");

        let corrected = correct_lemmas(&doc, &map);
        let lemmas: Vec<&str> = corrected.tokens().map(Token::lemma).collect();
        assert_eq!(lemmas, ["juan", "haber", "comido", "."]);
        // 入力は変更されない
        assert_eq!("ha", doc.sentences()[0].token(1).lemma());
    }

    #[test]
    fn test_fix_parse_tree() {
        let doc = haber_comido();
        let mut map = InfinitiveMap::new();
        map.insert("ha", "haber");

        let fixed = fix_parse_tree(&doc, &map, &Periphrases::default());
        let flags: Vec<bool> = fixed.tokens().map(Token::is_periphrasis).collect();
        assert_eq!(flags, [false, false, true, false]);
        assert_eq!(1, clause_count(&fixed));
        assert!(doc.tokens().all(|t| !t.is_periphrasis()));

        // 見出し語が補正されないと迂言形として認識されない
        let unfixed = mark_periphrasis(&doc, &Periphrases::default());
        assert!(unfixed.tokens().all(|t| !t.is_periphrasis()));
    }

    #[test]
    fn test_mark_periphrasis_at_sentence_start() {
        let sentence = Sentence::new(vec![
            Token::new("comer", Pos::Verb, "root").with_feats("VerbForm=Inf")
        ])
        .unwrap();
        let doc = ParsedDocument::new(vec![sentence]);
        let marked = mark_periphrasis(&doc, &Periphrases::default());
        assert!(!marked.sentences()[0].token(0).is_periphrasis());
    }

    #[test]
    fn test_custom_periphrases() {
        let periphrases = Periphrases::empty().gerund(["seguir", "", "  "]);
        assert_eq!(1, periphrases.get(VerbForm::Gerund).len());
        assert!(periphrases.get(VerbForm::Infinitive).is_empty());

        let sentence = Sentence::new(vec![
            Token::new("sigue", Pos::Aux, "aux")
                .with_lemma("seguir")
                .with_head(Some(1)),
            Token::new("lloviendo", Pos::Verb, "root").with_feats("VerbForm=Ger"),
        ])
        .unwrap();
        let doc = ParsedDocument::new(vec![sentence]);
        let marked = mark_periphrasis(&doc, &periphrases);
        let flags: Vec<bool> = marked.tokens().map(Token::is_periphrasis).collect();
        assert_eq!(flags, [false, true]);
    }
}
