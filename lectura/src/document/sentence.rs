//! 構文解析済みの文を提供するモジュール
//!
//! このモジュールは、トークン列と係り受け木を保持する文の表現を提供します。
//! 構築時に係り先のインデックスを検証し、各トークンの子のリストを事前に計算します。

use std::ops::Deref;

use crate::document::token::Token;
use crate::errors::{LecturaError, Result};

/// 構文解析済みの文
///
/// # フィールド
///
/// * `tokens` - 文を構成するトークン列
/// * `children` - 各トークンの子のインデックス（文内、昇順）
#[derive(Default, Clone, Debug, PartialEq)]
pub struct Sentence {
    tokens: Vec<Token>,
    children: Vec<Vec<usize>>,
}

impl Sentence {
    /// トークン列から文を構築します
    ///
    /// # 引数
    ///
    /// * `tokens` - 文を構成するトークン列
    ///
    /// # エラー
    ///
    /// 係り先のインデックスが文の範囲外、または自分自身を指している場合、
    /// [`LecturaError`] が返されます。
    pub fn new(tokens: Vec<Token>) -> Result<Self> {
        let mut children = vec![vec![]; tokens.len()];
        for (i, token) in tokens.iter().enumerate() {
            if let Some(head) = token.head() {
                if head >= tokens.len() {
                    return Err(LecturaError::invalid_argument(
                        "tokens",
                        format!(
                            "head {} of token {} ({}) is out of range for a sentence of {} tokens",
                            head,
                            i,
                            token.text(),
                            tokens.len()
                        ),
                    ));
                }
                if head == i {
                    return Err(LecturaError::invalid_argument(
                        "tokens",
                        format!("token {} ({}) is its own head", i, token.text()),
                    ));
                }
                children[head].push(i);
            }
        }
        Ok(Self { tokens, children })
    }

    /// 係り受け構造を保ったままトークンを差し替えた新しい文を返します（内部メソッド）
    ///
    /// 呼び出し側は、トークン数と各トークンの係り先が変わっていないことを保証する必要があります。
    pub(crate) fn replace_tokens(&self, tokens: Vec<Token>) -> Self {
        debug_assert_eq!(self.tokens.len(), tokens.len());
        debug_assert!(self
            .tokens
            .iter()
            .zip(&tokens)
            .all(|(a, b)| a.head() == b.head()));
        Self {
            tokens,
            children: self.children.clone(),
        }
    }

    /// トークンのスライスを返します
    #[inline(always)]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// 指定位置のトークンを返します
    ///
    /// # 引数
    ///
    /// * `i` - トークン位置（0始まり）
    #[inline(always)]
    pub fn token(&self, i: usize) -> &Token {
        &self.tokens[i]
    }

    /// 指定位置のトークンの係り先の位置を返します
    ///
    /// ルートの場合は `None` を返します。
    #[inline(always)]
    pub fn head_of(&self, i: usize) -> Option<usize> {
        self.tokens[i].head()
    }

    /// 指定位置のトークンの子の位置を昇順で返します
    #[inline(always)]
    pub fn children(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    /// ルートトークンの位置を返します
    ///
    /// 最初に見つかったルートを返します。空の文では `None` です。
    pub fn root(&self) -> Option<usize> {
        self.tokens.iter().position(Token::is_root)
    }

    /// 係り受け木におけるトークンの深さを返します
    ///
    /// ルートの深さを1とし、ルートに到達するまでにたどった段数を数えます。
    /// 入力に循環がある場合でも、文の長さで打ち切られます。
    ///
    /// # 引数
    ///
    /// * `i` - トークン位置（0始まり）
    pub fn depth(&self, i: usize) -> usize {
        let mut depth = 1;
        let mut current = i;
        while let Some(head) = self.tokens[current].head() {
            if self.tokens[current].is_root() || depth > self.tokens.len() {
                break;
            }
            current = head;
            depth += 1;
        }
        depth
    }

    /// 表層形を空白で連結した文字列を返します
    pub fn text(&self) -> String {
        let mut text = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if i != 0 {
                text.push(' ');
            }
            text.push_str(token.text());
        }
        text
    }
}

impl Deref for Sentence {
    type Target = [Token];

    fn deref(&self) -> &Self::Target {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::token::Pos;

    fn sample() -> Sentence {
        // El perro negro ladra .
        Sentence::new(vec![
            Token::new("El", Pos::Det, "det").with_head(Some(1)),
            Token::new("perro", Pos::Noun, "nsubj").with_head(Some(3)),
            Token::new("negro", Pos::Adj, "amod").with_head(Some(1)),
            Token::new("ladra", Pos::Verb, "root"),
            Token::new(".", Pos::Punct, "punct").with_head(Some(3)),
        ])
        .unwrap()
    }

    #[test]
    fn test_sentence_tree() {
        let sent = sample();
        assert_eq!(sent.len(), 5);
        assert_eq!(sent.root(), Some(3));
        assert_eq!(sent.children(3), &[1, 4]);
        assert_eq!(sent.children(1), &[0, 2]);
        assert_eq!(sent.head_of(0), Some(1));
        assert_eq!(sent.depth(3), 1);
        assert_eq!(sent.depth(1), 2);
        assert_eq!(sent.depth(0), 3);
        assert_eq!(sent.text(), "El perro negro ladra .");
    }

    #[test]
    fn test_sentence_invalid_head() {
        let result = Sentence::new(vec![
            Token::new("perro", Pos::Noun, "nsubj").with_head(Some(5)),
        ]);
        assert!(matches!(result, Err(LecturaError::InvalidArgument(_))));
    }

    #[test]
    fn test_sentence_self_head() {
        let result =
            Sentence::new(vec![Token::new("perro", Pos::Noun, "nsubj").with_head(Some(0))]);
        assert!(result.is_err());
    }

    #[test]
    fn test_depth_with_cycle() {
        let sent = Sentence::new(vec![
            Token::new("a", Pos::Noun, "dep").with_head(Some(1)),
            Token::new("b", Pos::Noun, "dep").with_head(Some(0)),
        ])
        .unwrap();
        assert!(sent.depth(0) <= 3);
        assert_eq!(sent.root(), None);
    }
}
