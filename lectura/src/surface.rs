//! 表層的な読みやすさの指標
//!
//! 文数、語数、文字数のような浅い計測値から、文章の複雑さや結束性を近似する指標を計算します。
//! どの関数も [`ParsedDocument`] を読み取るだけで、変更しません。
//!
//! 分母が0になる場合は、NaN やエラーではなく常に `0.0` を返します。
//!
//! 節の数を使う指標（[`clause_count`]、[`subordination`]、[`average_clause_length`]）は、
//! 迂言形が印付けされた文書を前提とします。印付けには
//! [`fix_parse_tree`](crate::correction::fix_parse_tree) を使います。

use hashbrown::HashMap;

use crate::document::{ParsedDocument, Pos, Sentence, Token};
use crate::trace::{Trace, TraceEvent};

/// 否定語として数える見出し語
pub const NEGATION_WORDS: [&str; 10] = [
    "no", "ni", "nunca", "jamás", "tampoco", "nadie", "nada", "ningún", "ninguno", "ninguna",
];

/// 接続語として数える見出し語
pub const CONNECTION_WORDS: [&str; 4] = ["y", "o", "no", "si"];

/// [`words_before_root`] で使う探索深さの既定値
pub const DEFAULT_MAX_DEPTH: usize = 4;

const LEXICAL_POS: [Pos; 6] = [Pos::Verb, Pos::Aux, Pos::Adj, Pos::Noun, Pos::Propn, Pos::Adv];

/// 分母が0の場合に `0.0` を返す割り算
#[inline(always)]
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// 文の数を返します。
#[inline(always)]
pub fn sentence_count(doc: &ParsedDocument) -> usize {
    doc.num_sentences()
}

/// 語の数を返します。`PUNCT`、`SYM`、`SPACE` は語に含めません。
pub fn word_count(doc: &ParsedDocument) -> usize {
    doc.tokens().filter(|token| token.pos().is_word()).count()
}

/// 文字数を返します。
///
/// `PUNCT` と `SPACE` のトークンは数えません。
/// 文字数は小文字化した表層形の Unicode スカラー値の数です。
pub fn char_count(doc: &ParsedDocument) -> usize {
    doc.tokens()
        .filter(|token| !matches!(token.pos(), Pos::Punct | Pos::Space))
        .map(|token| token.text().to_lowercase().chars().count())
        .sum()
}

/// 名詞（`NOUN`、`PROPN`）の数を返します。
pub fn noun_count(doc: &ParsedDocument) -> usize {
    doc.tokens().filter(|token| token.pos().is_noun()).count()
}

/// 平均語長（文字数 / 語数）を返します。
///
/// # 例
///
/// ```
/// use lectura::document::{ParsedDocument, Pos, Sentence, Token};
/// use lectura::surface::average_word_length;
///
/// let sentence = Sentence::new(vec![
///     Token::new("Hola", Pos::Intj, "root"),
///     Token::new("mundo", Pos::Noun, "vocative").with_head(Some(0)),
///     Token::new(".", Pos::Punct, "punct").with_head(Some(0)),
/// ])?;
/// let doc = ParsedDocument::new(vec![sentence]);
/// assert_eq!(average_word_length(&doc), 9.0 / 2.0);
/// # Ok::<(), lectura::errors::LecturaError>(())
/// ```
pub fn average_word_length(doc: &ParsedDocument) -> f64 {
    ratio(char_count(doc), word_count(doc))
}

/// 平均文長（語数 / 文数）を返します。
pub fn average_sentence_length(doc: &ParsedDocument) -> f64 {
    ratio(word_count(doc), sentence_count(doc))
}

fn pos_count(doc: &ParsedDocument, pos_types: &[Pos]) -> (usize, usize) {
    let mut total_words = 0;
    let mut total_pos = 0;
    for token in doc.tokens().filter(|token| token.pos().is_word()) {
        total_words += 1;
        if pos_types.contains(token.pos()) {
            total_pos += 1;
        }
    }
    (total_pos, total_words)
}

/// 語のうち、指定した品詞のいずれかを持つものの割合を返します。
///
/// # 引数
///
/// * `doc` - 対象の文書
/// * `pos_types` - 数える品詞
pub fn pos_ratio(doc: &ParsedDocument, pos_types: &[Pos]) -> f64 {
    let (total_pos, total_words) = pos_count(doc, pos_types);
    ratio(total_pos, total_words)
}

/// 語彙密度を返します。
///
/// 語のうち `VERB`、`AUX`、`ADJ`、`NOUN`、`PROPN`、`ADV` の割合です。
pub fn lexical_density(doc: &ParsedDocument) -> f64 {
    pos_ratio(doc, &LEXICAL_POS)
}

/// 動詞（`VERB`、`AUX`）と名詞（`NOUN`、`PROPN`）の比を返します。
pub fn verb_noun_ratio(doc: &ParsedDocument) -> f64 {
    let (verbs, _) = pos_count(doc, &[Pos::Verb, Pos::Aux]);
    let (nouns, _) = pos_count(doc, &[Pos::Noun, Pos::Propn]);
    ratio(verbs, nouns)
}

fn lemma_in(token: &Token, words: &[&str]) -> bool {
    let lemma = token.lemma().to_lowercase();
    words.contains(&lemma.as_str())
}

/// 否定語の密度を返します。
///
/// 見出し語が [`NEGATION_WORDS`] に含まれる語の数を語数で割った値です。
pub fn negation_density(doc: &ParsedDocument) -> f64 {
    let negations = doc
        .tokens()
        .filter(|token| token.pos().is_word() && lemma_in(token, &NEGATION_WORDS))
        .count();
    ratio(negations, word_count(doc))
}

/// 接続語（`y`、`o`、`no`、`si`）の割合を返します。
pub fn connection_words_ratio(doc: &ParsedDocument) -> f64 {
    let connections = doc
        .tokens()
        .filter(|token| token.pos().is_word() && lemma_in(token, &CONNECTION_WORDS))
        .count();
    ratio(connections, word_count(doc))
}

/// 1人称・2人称のトークンの密度を返します。
///
/// 形態素性 `Person=1` または `Person=2` を持つトークンの数を語数で割った値です。
pub fn first_second_person_density(doc: &ParsedDocument) -> f64 {
    let count = doc
        .tokens()
        .filter(|token| token.has_feat("Person", "1") || token.has_feat("Person", "2"))
        .count();
    ratio(count, word_count(doc))
}

/// 名詞句の密度を返します。
///
/// 名詞（`NOUN`、`PROPN`）に係るトークンのうち、次のいずれかを満たすものを数え、
/// 名詞の数で割ります。
///
/// * 表層形が縮約冠詞 `al` または `del` である
/// * 依存関係ラベルが `cc`、`case`、`cop` のいずれでもなく、句読点でもない
pub fn noun_phrase_density(doc: &ParsedDocument) -> f64 {
    let mut children = 0;
    for sent in doc.sentences() {
        for (i, token) in sent.iter().enumerate() {
            let head = match sent.head_of(i) {
                Some(head) if head != i => head,
                _ => continue,
            };
            if !sent.token(head).pos().is_noun() {
                continue;
            }
            let upper = token.text().to_uppercase();
            let contraction = upper == "AL" || upper == "DEL";
            let modifier = !matches!(token.deprel(), "cc" | "case" | "cop")
                && *token.pos() != Pos::Punct;
            if contraction || modifier {
                children += 1;
            }
        }
    }
    ratio(children, noun_count(doc))
}

/// 節の数を推定します。
///
/// 定形（`VerbForm=Fin`）の `VERB` または `AUX` のうち、迂言形として印付けされていないものを
/// 数えます。
pub fn clause_count(doc: &ParsedDocument) -> usize {
    doc.tokens()
        .filter(|token| {
            token.pos().is_verb() && !token.is_periphrasis() && token.has_feat("VerbForm", "Fin")
        })
        .count()
}

/// 従属度（節数 / 文数）を返します。
pub fn subordination(doc: &ParsedDocument) -> f64 {
    ratio(clause_count(doc), sentence_count(doc))
}

/// 平均節長（語数 / 節数）を返します。
pub fn average_clause_length(doc: &ParsedDocument) -> f64 {
    ratio(word_count(doc), clause_count(doc))
}

/// 文中の品詞ごとの出現数を返します。
///
/// 句読点を含むすべてのトークンを数えます。
pub fn pos_distribution(sentence: &Sentence) -> HashMap<Pos, usize> {
    let mut distribution = HashMap::new();
    for token in sentence.iter() {
        *distribution.entry(token.pos().clone()).or_insert(0) += 1;
    }
    distribution
}

/// 隣接する文どうしの品詞分布の非類似度の平均を返します。
///
/// 隣接する2文それぞれについて、どちらかに現れる品詞ごとの出現数の差の絶対値の和を、
/// 2文の出現数の合計で割ります。その値を `n - 1` 組で平均します。
/// 文が2つ未満の場合は `0.0` です。
pub fn pos_dissimilarity(doc: &ParsedDocument) -> f64 {
    pos_dissimilarity_traced(doc, &mut Trace::disabled())
}

/// [`pos_dissimilarity`] と同じ値を計算し、文の組ごとの比較を `trace` に記録します。
pub fn pos_dissimilarity_traced(doc: &ParsedDocument, trace: &mut Trace) -> f64 {
    let distributions: Vec<_> = doc.sentences().iter().map(pos_distribution).collect();
    if distributions.len() < 2 {
        return 0.0;
    }

    let mut dissimilarity = 0.0;
    for (i, pair) in distributions.windows(2).enumerate() {
        let (current, next) = (&pair[0], &pair[1]);
        let mut difference = 0;
        let mut total = 0;
        for (pos, &count) in current {
            let count_next = next.get(pos).copied().unwrap_or(0);
            difference += count.abs_diff(count_next);
            total += count + count_next;
        }
        for (pos, &count_next) in next {
            if !current.contains_key(pos) {
                difference += count_next;
                total += count_next;
            }
        }
        trace.record(|| TraceEvent::PosComparison {
            first: i,
            second: i + 1,
            difference,
            total,
        });
        dissimilarity += ratio(difference, total);
    }
    dissimilarity / (distributions.len() - 1) as f64
}

/// 2つの係り受け木のノードの類似度を返します。
///
/// 子ノードの品詞が一致する組を再帰的に数えます。各子ノードは高々1回しか一致しません。
/// `is_central` が真の場合は2つのノード自身の品詞も比較し、一致しなければ `0` を返します。
///
/// # 引数
///
/// * `first` - 1つ目のノードを含む文
/// * `i` - 1つ目のノードの位置
/// * `second` - 2つ目のノードを含む文
/// * `j` - 2つ目のノードの位置
/// * `is_central` - 中心ノード（ルート）どうしの比較かどうか
pub fn node_similarity(
    first: &Sentence,
    i: usize,
    second: &Sentence,
    j: usize,
    is_central: bool,
) -> usize {
    let budget = first.len().min(second.len());
    node_similarity_inner(
        first,
        i,
        second,
        j,
        is_central,
        budget,
        &mut Trace::disabled(),
    )
}

// 係り先に循環がある入力でも止まるよう、再帰の深さを文の長さで打ち切る
fn node_similarity_inner(
    first: &Sentence,
    i: usize,
    second: &Sentence,
    j: usize,
    is_central: bool,
    budget: usize,
    trace: &mut Trace,
) -> usize {
    let mut similarity = 0;
    if is_central {
        if first.token(i).pos() != second.token(j).pos() {
            return 0;
        }
        similarity += 1;
        trace.record(|| TraceEvent::NodeMatch {
            first: first.token(i).text().to_string(),
            second: second.token(j).text().to_string(),
            central: true,
        });
    }
    if budget == 0 {
        return similarity;
    }

    let children2 = second.children(j);
    let mut seen2 = vec![false; children2.len()];
    for &child1 in first.children(i) {
        let pos1 = first.token(child1).pos();
        let matched = children2
            .iter()
            .enumerate()
            .find(|&(k, &child2)| !seen2[k] && second.token(child2).pos() == pos1);
        if let Some((k, &child2)) = matched {
            seen2[k] = true;
            similarity += 1;
            trace.record(|| TraceEvent::NodeMatch {
                first: first.token(child1).text().to_string(),
                second: second.token(child2).text().to_string(),
                central: false,
            });
            similarity +=
                node_similarity_inner(first, child1, second, child2, false, budget - 1, trace);
        }
    }
    similarity
}

/// 隣接する文どうしの統語的類似度の平均を返します。
///
/// 隣接する2文のルートから [`node_similarity`] で一致ノード数 `c` を求め、
/// `c / (|前の文| + |後の文| - c)` を `n - 1` 組で平均します。
/// 文が2つ未満の場合は `0.0` です。
pub fn syntactic_similarity(doc: &ParsedDocument) -> f64 {
    syntactic_similarity_traced(doc, &mut Trace::disabled())
}

/// [`syntactic_similarity`] と同じ値を計算し、一致したノードと文の組ごとの結果を
/// `trace` に記録します。
pub fn syntactic_similarity_traced(doc: &ParsedDocument, trace: &mut Trace) -> f64 {
    let sentences = doc.sentences();
    if sentences.len() < 2 {
        return 0.0;
    }

    let mut aggregate = 0.0;
    for (k, pair) in sentences.windows(2).enumerate() {
        let (prev, sent) = (&pair[0], &pair[1]);
        let common = match (sent.root(), prev.root()) {
            (Some(i), Some(j)) => {
                let budget = sent.len().min(prev.len());
                node_similarity_inner(sent, i, prev, j, true, budget, trace)
            }
            _ => 0,
        };
        let total = (sent.len() + prev.len()).saturating_sub(common);
        trace.record(|| TraceEvent::SentenceSimilarity {
            first: k,
            second: k + 1,
            common,
            total,
        });
        aggregate += ratio(common, total);
    }
    aggregate / (sentences.len() - 1) as f64
}

/// 係り受け木におけるトークンの深さを返します。ルートの深さは1です。
#[inline(always)]
pub fn word_depth(sentence: &Sentence, i: usize) -> usize {
    sentence.depth(i)
}

fn verb_root(sentence: &Sentence, max_depth: usize) -> Option<usize> {
    let root = sentence.root();
    if let Some(root) = root {
        if sentence.token(root).pos().is_verb() {
            return Some(root);
        }
    }
    (2..max_depth).find_map(|depth| {
        sentence
            .iter()
            .enumerate()
            .find(|&(i, token)| token.pos().is_verb() && sentence.depth(i) == depth)
            .map(|(i, _)| i)
    })
}

/// 主動詞より前にある語の数の平均を返します。
///
/// 各文について、ルートが動詞であればそれを、そうでなければ深さ `2..max_depth` の範囲で
/// 最も浅い位置にある動詞を主動詞とみなし、それより前にある句読点以外のトークンを数えます。
/// 主動詞が見つからない文は平均から除外します。
///
/// # 引数
///
/// * `doc` - 対象の文書
/// * `max_depth` - 動詞を探す深さの上限（この値を含まない）。通常は [`DEFAULT_MAX_DEPTH`]
pub fn words_before_root(doc: &ParsedDocument, max_depth: usize) -> f64 {
    let mut total_words = 0;
    let mut total_roots = 0;
    for sent in doc.sentences() {
        if let Some(root) = verb_root(sent, max_depth) {
            total_roots += 1;
            total_words += sent[..root]
                .iter()
                .filter(|token| *token.pos() != Pos::Punct)
                .count();
        }
    }
    ratio(total_words, total_roots)
}
