//! エンティティグリッドの構築
//!
//! このモジュールは、構文解析済みの文書から「文 × エンティティ」の文法役割の行列
//! （エンティティグリッド）を構築し、隣接する2文間の16種類の役割遷移の確率を計算します。
//!
//! エンティティは名詞・代名詞・固有名詞（`NOUN`、`PRON`、`PROPN`）のトークンで、
//! 表層形を大文字化したものをキーとします。共参照解析は行いません。
//!
//! # 例
//!
//! ```
//! use lectura::document::{ParsedDocument, Pos, Sentence, Token};
//! use lectura::role::Role;
//! use lectura::EntityGrid;
//!
//! let doc = ParsedDocument::new(vec![
//!     Sentence::new(vec![Token::new("perro", Pos::Noun, "nsubj")])?,
//!     Sentence::new(vec![Token::new("perro", Pos::Noun, "obj")])?,
//! ]);
//! let grid = EntityGrid::new(&doc)?;
//!
//! assert_eq!(grid.roles("PERRO"), Some(&[Role::Subject, Role::Object][..]));
//! assert_eq!(grid.so_transitions(), 1.0);
//! # Ok::<(), lectura::errors::LecturaError>(())
//! ```

use std::fmt;

use hashbrown::HashMap;

use crate::document::{ParsedDocument, Token};
use crate::errors::{LecturaError, Result};
use crate::role::{Role, Transition};

/// エンティティグリッドの構築に必要な最小の文数
pub const MIN_SENTENCES: usize = 2;

/// 文数が [`MIN_SENTENCES`] に満たない文書の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortDocumentPolicy {
    /// [`LecturaError::InsufficientInput`] を返します。
    #[default]
    Reject,

    /// 遷移確率がすべて0の退化したグリッドを返します。
    ZeroFill,
}

/// エンティティのキーの作り方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityKey {
    /// 表層形を大文字化したもの
    #[default]
    Surface,

    /// 見出し語を大文字化したもの
    ///
    /// 見出し語が空または `_` の場合は表層形を使います。
    Lemma,
}

impl EntityKey {
    fn key(self, token: &Token) -> String {
        match self {
            Self::Surface => token.text().to_uppercase(),
            Self::Lemma => {
                let lemma = token.lemma();
                if lemma.is_empty() || lemma == "_" {
                    token.text().to_uppercase()
                } else {
                    lemma.to_uppercase()
                }
            }
        }
    }
}

/// エンティティグリッドのビルダー
///
/// # 例
///
/// ```
/// use lectura::document::ParsedDocument;
/// use lectura::entity_grid::{EntityGridBuilder, ShortDocumentPolicy};
///
/// let doc = ParsedDocument::default();
/// let grid = EntityGridBuilder::new()
///     .short_document_policy(ShortDocumentPolicy::ZeroFill)
///     .build(&doc)?;
/// assert_eq!(grid.sentence_count(), 0);
/// assert_eq!(grid.nn_transitions(), 0.0);
/// # Ok::<(), lectura::errors::LecturaError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntityGridBuilder {
    short_document_policy: ShortDocumentPolicy,
    entity_key: EntityKey,
}

impl EntityGridBuilder {
    /// デフォルト設定のビルダーを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 短い文書の扱いを設定します。
    pub fn short_document_policy(mut self, policy: ShortDocumentPolicy) -> Self {
        self.short_document_policy = policy;
        self
    }

    /// エンティティのキーの作り方を設定します。
    pub fn entity_key(mut self, entity_key: EntityKey) -> Self {
        self.entity_key = entity_key;
        self
    }

    /// 文書からエンティティグリッドを構築します。
    ///
    /// 1. 各文の `NOUN`/`PRON`/`PROPN` トークンをエンティティとして記録し、
    ///    初出時にすべての文で不在（`-`）の行を作ります。
    /// 2. 依存関係ラベルを役割に変換し、同じ文に複数回現れた場合は `S > O > X` の優先順位で
    ///    セルを埋めます（最初の割り当ては、より優先度の高い役割が来ない限り保持されます）。
    /// 3. すべての隣接文の組について遷移を数え、`(文数 - 1) × エンティティ数` で正規化します。
    ///
    /// # エラー
    ///
    /// 文数が [`MIN_SENTENCES`] 未満で、ポリシーが [`ShortDocumentPolicy::Reject`] の場合、
    /// [`LecturaError::InsufficientInput`] が返されます。
    pub fn build(&self, doc: &ParsedDocument) -> Result<EntityGrid> {
        let n_sent = doc.num_sentences();
        if n_sent < MIN_SENTENCES {
            match self.short_document_policy {
                ShortDocumentPolicy::Reject => {
                    return Err(LecturaError::insufficient_input(MIN_SENTENCES, n_sent));
                }
                ShortDocumentPolicy::ZeroFill => {
                    log::warn!(
                        "[lectura] entity grid built from {} sentence(s); all transitions are zero",
                        n_sent
                    );
                }
            }
        }

        let mut entities: Vec<String> = vec![];
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut rows: Vec<Vec<Role>> = vec![];

        for (i, sent) in doc.sentences().iter().enumerate() {
            for token in sent.iter().filter(|t| t.pos().is_entity()) {
                let key = self.entity_key.key(token);
                let row = match index.get(&key) {
                    Some(&row) => row,
                    None => {
                        let row = entities.len();
                        index.insert(key.clone(), row);
                        entities.push(key);
                        rows.push(vec![Role::Absent; n_sent]);
                        row
                    }
                };
                let role = Role::from_dependency(token.deprel());
                let cell = &mut rows[row][i];
                if cell.should_overwrite(role) {
                    log::trace!(
                        "[lectura] s{} {}: {} -> {}",
                        i + 1,
                        entities[row],
                        cell,
                        role
                    );
                    *cell = role;
                }
            }
        }

        Ok(EntityGrid::from_parts(entities, index, rows, n_sent))
    }
}

/// エンティティグリッド
///
/// エンティティごとに、文の数と同じ長さの役割列を保持します。
/// エンティティは文書中の初出順に並びます。
/// 構築後は変更されず、元の文書への参照も持ちません。
#[derive(Debug, Clone, PartialEq)]
pub struct EntityGrid {
    entities: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Role>>,
    sentence_count: usize,
    probabilities: [f64; Transition::COUNT],
}

impl EntityGrid {
    /// デフォルト設定で文書からエンティティグリッドを構築します。
    ///
    /// [`EntityGridBuilder::build`] を参照してください。
    ///
    /// # エラー
    ///
    /// 文数が [`MIN_SENTENCES`] 未満の場合、[`LecturaError::InsufficientInput`] が返されます。
    pub fn new(doc: &ParsedDocument) -> Result<Self> {
        EntityGridBuilder::default().build(doc)
    }

    /// エンティティのキーと役割列の組から直接グリッドを作成します。
    ///
    /// 診断やテストのためのコンストラクタです。文数の下限は検査しません。
    ///
    /// # 引数
    ///
    /// * `sentence_count` - 文の数
    /// * `rows` - エンティティのキーと役割列の組
    ///
    /// # エラー
    ///
    /// 役割列の長さが `sentence_count` と異なる場合、またはキーが重複している場合、
    /// [`LecturaError::InvalidArgument`] が返されます。
    pub fn from_rows<I, S>(sentence_count: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Role>)>,
        S: Into<String>,
    {
        let mut entities = vec![];
        let mut index = HashMap::new();
        let mut grid_rows = vec![];
        for (entity, roles) in rows {
            let entity = entity.into();
            if roles.len() != sentence_count {
                return Err(LecturaError::invalid_argument(
                    "rows",
                    format!(
                        "entity {} has {} roles, but the grid has {} sentences",
                        entity,
                        roles.len(),
                        sentence_count
                    ),
                ));
            }
            if index.contains_key(&entity) {
                return Err(LecturaError::invalid_argument(
                    "rows",
                    format!("duplicate entity {}", entity),
                ));
            }
            index.insert(entity.clone(), entities.len());
            entities.push(entity);
            grid_rows.push(roles);
        }
        Ok(Self::from_parts(entities, index, grid_rows, sentence_count))
    }

    /// 遷移確率を計算してグリッドを確定します（内部メソッド）
    fn from_parts(
        entities: Vec<String>,
        index: HashMap<String, usize>,
        rows: Vec<Vec<Role>>,
        sentence_count: usize,
    ) -> Self {
        let mut counts = [0usize; Transition::COUNT];
        for row in &rows {
            for pair in row.windows(2) {
                counts[Transition::new(pair[0], pair[1]).index()] += 1;
            }
        }

        let total_transitions = sentence_count.saturating_sub(1) * entities.len();
        let mut probabilities = [0.0; Transition::COUNT];
        if total_transitions != 0 {
            for (prob, &count) in probabilities.iter_mut().zip(&counts) {
                *prob = count as f64 / total_transitions as f64;
            }
        }

        log::debug!(
            "[lectura] entity grid: {} sentences, {} entities, {} transitions",
            sentence_count,
            entities.len(),
            total_transitions
        );

        Self {
            entities,
            index,
            rows,
            sentence_count,
            probabilities,
        }
    }

    /// 文の数を返します。
    #[inline(always)]
    pub fn sentence_count(&self) -> usize {
        self.sentence_count
    }

    /// エンティティの数を返します。
    #[inline(always)]
    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    /// エンティティのキーを初出順に返します。
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// 指定したエンティティの役割列を返します。
    pub fn roles(&self, entity: &str) -> Option<&[Role]> {
        self.index.get(entity).map(|&row| self.rows[row].as_slice())
    }

    /// エンティティと役割列の組を初出順に返すイテレータ
    pub fn grid(&self) -> impl Iterator<Item = (&str, &[Role])> + '_ {
        self.entities
            .iter()
            .zip(&self.rows)
            .map(|(entity, roles)| (entity.as_str(), roles.as_slice()))
    }

    /// 指定した遷移の確率を返します。
    #[inline(always)]
    pub fn transition(&self, transition: Transition) -> f64 {
        self.probabilities[transition.index()]
    }

    /// すべての遷移とその確率を `SS, SO, ..., --` の順で返すイテレータ
    pub fn transitions(&self) -> impl Iterator<Item = (Transition, f64)> + '_ {
        Transition::all().map(|t| (t, self.transition(t)))
    }

    /// `SS` 遷移の確率を返します。
    pub fn ss_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Subject, Role::Subject))
    }

    /// `SO` 遷移の確率を返します。
    pub fn so_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Subject, Role::Object))
    }

    /// `SX` 遷移の確率を返します。
    pub fn sx_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Subject, Role::Other))
    }

    /// `S-` 遷移の確率を返します。
    pub fn sn_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Subject, Role::Absent))
    }

    /// `OS` 遷移の確率を返します。
    pub fn os_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Object, Role::Subject))
    }

    /// `OO` 遷移の確率を返します。
    pub fn oo_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Object, Role::Object))
    }

    /// `OX` 遷移の確率を返します。
    pub fn ox_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Object, Role::Other))
    }

    /// `O-` 遷移の確率を返します。
    pub fn on_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Object, Role::Absent))
    }

    /// `XS` 遷移の確率を返します。
    pub fn xs_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Other, Role::Subject))
    }

    /// `XO` 遷移の確率を返します。
    pub fn xo_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Other, Role::Object))
    }

    /// `XX` 遷移の確率を返します。
    pub fn xx_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Other, Role::Other))
    }

    /// `X-` 遷移の確率を返します。
    pub fn xn_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Other, Role::Absent))
    }

    /// `-S` 遷移の確率を返します。
    pub fn ns_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Absent, Role::Subject))
    }

    /// `-O` 遷移の確率を返します。
    pub fn no_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Absent, Role::Object))
    }

    /// `-X` 遷移の確率を返します。
    pub fn nx_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Absent, Role::Other))
    }

    /// `--` 遷移の確率を返します。
    pub fn nn_transitions(&self) -> f64 {
        self.transition(Transition::new(Role::Absent, Role::Absent))
    }
}

impl fmt::Display for EntityGrid {
    /// エンティティごとに1行、役割を文の順に空白区切りで出力します。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .entities
            .iter()
            .map(|e| e.chars().count())
            .max()
            .unwrap_or(0);
        for (entity, roles) in self.grid() {
            write!(f, "{:<width$}", entity, width = width)?;
            for role in roles {
                write!(f, " {}", role)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Pos, Sentence};

    fn noun(text: &str, dep: &str) -> Token {
        Token::new(text, Pos::Noun, dep)
    }

    fn doc(sentences: Vec<Vec<Token>>) -> ParsedDocument {
        ParsedDocument::new(
            sentences
                .into_iter()
                .map(|tokens| Sentence::new(tokens).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_rows_have_sentence_count_entries() {
        let doc = doc(vec![
            vec![noun("perro", "nsubj")],
            vec![noun("gato", "obj")],
            vec![Token::new("ella", Pos::Pron, "nsubj")],
        ]);
        let grid = EntityGrid::new(&doc).unwrap();
        assert_eq!(3, grid.num_entities());
        for (_, roles) in grid.grid() {
            assert_eq!(3, roles.len());
        }
        assert_eq!(&["PERRO", "GATO", "ELLA"], grid.entities());
    }

    #[test]
    fn test_non_entities_are_ignored() {
        let doc = doc(vec![
            vec![Token::new("corre", Pos::Verb, "root"), noun("niño", "nsubj")],
            vec![Token::new("rápido", Pos::Adv, "advmod")],
        ]);
        let grid = EntityGrid::new(&doc).unwrap();
        assert_eq!(&["NIÑO"], grid.entities());
        assert_eq!(Some(&[Role::Subject, Role::Absent][..]), grid.roles("NIÑO"));
    }

    #[test]
    fn test_case_insensitive_keys() {
        let doc = doc(vec![vec![noun("Casa", "obl")], vec![noun("casa", "obj")]]);
        let grid = EntityGrid::new(&doc).unwrap();
        assert_eq!(1, grid.num_entities());
        assert_eq!(Some(&[Role::Other, Role::Object][..]), grid.roles("CASA"));
    }

    #[test]
    fn test_lemma_keys() {
        let doc = doc(vec![
            vec![noun("perros", "nsubj").with_lemma("perro")],
            vec![noun("perro", "obj").with_lemma("perro")],
        ]);
        let grid = EntityGridBuilder::new()
            .entity_key(EntityKey::Lemma)
            .build(&doc)
            .unwrap();
        assert_eq!(&["PERRO"], grid.entities());

        let grid = EntityGrid::new(&doc).unwrap();
        assert_eq!(&["PERROS", "PERRO"], grid.entities());
    }

    #[test]
    fn test_precedence_keeps_first_unless_higher() {
        let doc = doc(vec![
            vec![noun("mesa", "obj"), noun("mesa", "obl")],
            vec![noun("mesa", "obl"), noun("mesa", "iobj")],
        ]);
        let grid = EntityGrid::new(&doc).unwrap();
        assert_eq!(Some(&[Role::Object, Role::Object][..]), grid.roles("MESA"));
    }

    #[test]
    fn test_short_document_rejected() {
        let doc = doc(vec![vec![noun("perro", "nsubj")]]);
        match EntityGrid::new(&doc) {
            Err(LecturaError::InsufficientInput(e)) => {
                assert_eq!(2, e.required());
                assert_eq!(1, e.found());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_short_document_zero_filled() {
        let doc = doc(vec![vec![noun("perro", "nsubj")]]);
        let grid = EntityGridBuilder::new()
            .short_document_policy(ShortDocumentPolicy::ZeroFill)
            .build(&doc)
            .unwrap();
        assert_eq!(1, grid.sentence_count());
        assert_eq!(Some(&[Role::Subject][..]), grid.roles("PERRO"));
        assert!(grid.transitions().all(|(_, p)| p == 0.0));
    }

    #[test]
    fn test_no_entities() {
        let doc = doc(vec![
            vec![Token::new("¡", Pos::Punct, "punct")],
            vec![Token::new("!", Pos::Punct, "punct")],
        ]);
        let grid = EntityGrid::new(&doc).unwrap();
        assert_eq!(0, grid.num_entities());
        assert!(grid.transitions().all(|(_, p)| p == 0.0));
    }

    #[test]
    fn test_from_rows_validates_length() {
        let result = EntityGrid::from_rows(3, [("PERRO", vec![Role::Subject])]);
        assert!(matches!(result, Err(LecturaError::InvalidArgument(_))));

        let result = EntityGrid::from_rows(
            1,
            [("PERRO", vec![Role::Subject]), ("PERRO", vec![Role::Other])],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        let grid = EntityGrid::from_rows(
            3,
            [
                ("SOL", vec![Role::Subject, Role::Absent, Role::Other]),
                ("NUBE", vec![Role::Absent, Role::Object, Role::Absent]),
            ],
        )
        .unwrap();
        assert_eq!("SOL  S - X\nNUBE - O -\n", grid.to_string());
    }
}
