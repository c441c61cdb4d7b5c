//! 既知性（givenness）の指標
//!
//! 3人称代名詞の出現頻度を、照応の解決を要する箇所の多さの近似として計算します。

use crate::document::{ParsedDocument, Pos, Token};
use crate::surface::ratio;

#[inline(always)]
fn is_third_person_pronoun(token: &Token) -> bool {
    *token.pos() == Pos::Pron && token.has_feat("Person", "3")
}

/// 代名詞の密度を返します。
///
/// 3人称代名詞の数を語数で割った値です。語がない場合は `0.0` を返します。
///
/// # 例
///
/// ```
/// use lectura::document::{ParsedDocument, Pos, Sentence, Token};
/// use lectura::givenness::pronoun_density;
///
/// let sentence = Sentence::new(vec![
///     Token::new("Ella", Pos::Pron, "nsubj").with_feats("Person=3").with_head(Some(1)),
///     Token::new("canta", Pos::Verb, "root"),
/// ])?;
/// let doc = ParsedDocument::new(vec![sentence]);
/// assert_eq!(pronoun_density(&doc), 0.5);
/// # Ok::<(), lectura::errors::LecturaError>(())
/// ```
pub fn pronoun_density(doc: &ParsedDocument) -> f64 {
    let mut words = 0;
    let mut pronouns = 0;
    for token in doc.tokens().filter(|token| token.pos().is_word()) {
        words += 1;
        if is_third_person_pronoun(token) {
            pronouns += 1;
        }
    }
    ratio(pronouns, words)
}

/// 3人称代名詞と名詞（`NOUN`、`PROPN`）の比を返します。
///
/// 名詞がない場合は `0.0` を返します。
pub fn pronoun_noun_ratio(doc: &ParsedDocument) -> f64 {
    let mut nouns = 0;
    let mut pronouns = 0;
    for token in doc.tokens() {
        if token.pos().is_noun() {
            nouns += 1;
        }
        if is_third_person_pronoun(token) {
            pronouns += 1;
        }
    }
    ratio(pronouns, nouns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Sentence;

    fn doc(tokens: Vec<Token>) -> ParsedDocument {
        ParsedDocument::new(vec![Sentence::new(tokens).unwrap()])
    }

    #[test]
    fn test_pronoun_density() {
        let doc = doc(vec![
            Token::new("lo", Pos::Pron, "obj")
                .with_feats("Case=Acc|Person=3")
                .with_head(Some(1)),
            Token::new("vio", Pos::Verb, "root"),
        ]);
        assert_eq!(0.5, pronoun_density(&doc));
    }

    #[test]
    fn test_pronoun_noun_ratio() {
        let doc = doc(vec![
            Token::new("ella", Pos::Pron, "nsubj")
                .with_feats("Person=3")
                .with_head(Some(1)),
            Token::new("libro", Pos::Noun, "root"),
        ]);
        assert_eq!(1.0, pronoun_noun_ratio(&doc));
    }

    #[test]
    fn test_first_person_is_not_counted() {
        let doc = doc(vec![
            Token::new("yo", Pos::Pron, "nsubj")
                .with_feats("Person=1")
                .with_head(Some(1)),
            Token::new("leo", Pos::Verb, "root"),
        ]);
        assert_eq!(0.0, pronoun_density(&doc));
        assert_eq!(0.0, pronoun_noun_ratio(&doc));
    }

    #[test]
    fn test_zero_denominators() {
        let without_nouns = doc(vec![
            Token::new("él", Pos::Pron, "nsubj")
                .with_feats("Person=3")
                .with_head(Some(1)),
            Token::new("llega", Pos::Verb, "root"),
        ]);
        assert_eq!(0.5, pronoun_density(&without_nouns));
        assert_eq!(0.0, pronoun_noun_ratio(&without_nouns));

        let without_words = doc(vec![Token::new("...", Pos::Punct, "root")]);
        assert_eq!(0.0, pronoun_density(&without_words));
        assert_eq!(0.0, pronoun_density(&ParsedDocument::default()));
    }
}
