//! CoNLL-U形式の読み込みモジュール。
//!
//! 外部のNLPパイプライン（Stanza、UDPipeなど）が出力するCoNLL-U形式のテキストから
//! [`ParsedDocument`] を構築します。
//!
//! 各トークン行は次の10列をタブで区切った形式を想定しています。
//!
//! ```text
//! ID FORM LEMMA UPOS XPOS FEATS HEAD DEPREL DEPS MISC
//! ```
//!
//! - `#` で始まる行はコメントとして読み飛ばします。`# newdoc` は新しい文書の開始です。
//! - 空行は文の終わりを表します。
//! - 複合語の範囲（`1-2`）と空ノード（`1.1`）は読み飛ばします。

use std::io::{BufRead, BufReader, Read};

use crate::document::{ParsedDocument, Pos, Sentence, Token};
use crate::errors::{LecturaError, Result};

const NUM_COLUMNS: usize = 10;

/// 読み込み中のトークン行
struct Row {
    token: Token,
    id: usize,
    head: Option<usize>,
    lineno: usize,
}

/// 読み込み中の文書
#[derive(Default)]
struct PendingDocument {
    id: Option<String>,
    sentences: Vec<Sentence>,
}

impl PendingDocument {
    fn is_empty(&self) -> bool {
        self.id.is_none() && self.sentences.is_empty()
    }

    fn finish(self) -> ParsedDocument {
        let doc = ParsedDocument::new(self.sentences);
        match self.id {
            Some(id) => doc.with_id(id),
            None => doc,
        }
    }
}

/// CoNLL-U形式の入力全体を1つの文書として読み込みます。
///
/// `# newdoc` コメントは無視され、すべての文が1つの文書に入ります。
/// 最初に見つかった文書IDが使われます。
///
/// # 引数
///
/// * `rdr` - CoNLL-U形式のリーダー
///
/// # エラー
///
/// 入力形式が不正な場合、[`LecturaError`] が返されます。
///
/// # 例
///
/// ```
/// let data = "\
/// 1\tEl\tel\tDET\t_\t_\t2\tdet\t_\t_
/// 2\tperro\tperro\tNOUN\t_\t_\t3\tnsubj\t_\t_
/// 3\tladra\tladrar\tVERB\t_\t_\t0\troot\t_\t_
///
/// ";
/// let doc = lectura::conllu::read_document(data.as_bytes())?;
/// assert_eq!(doc.num_sentences(), 1);
/// assert_eq!(doc.sentences()[0].token(1).deprel(), "nsubj");
/// # Ok::<(), lectura::errors::LecturaError>(())
/// ```
pub fn read_document<R>(rdr: R) -> Result<ParsedDocument>
where
    R: Read,
{
    let mut id = None;
    let mut sentences = vec![];
    for doc in read_documents(rdr)? {
        if id.is_none() {
            id = doc.id().map(str::to_string);
        }
        sentences.extend(doc.sentences().iter().cloned());
    }
    let doc = ParsedDocument::new(sentences);
    Ok(match id {
        Some(id) => doc.with_id(id),
        None => doc,
    })
}

/// CoNLL-U形式の入力を `# newdoc` ごとの文書に分けて読み込みます。
///
/// `# newdoc id = X` の形式であれば `X` が文書IDになります。
/// 空の入力に対しては空のベクターを返します。
///
/// # 引数
///
/// * `rdr` - CoNLL-U形式のリーダー
///
/// # エラー
///
/// 列数が10でない行、数値でないIDや係り先、範囲外の係り先がある場合、
/// 行番号を含む [`LecturaError::InvalidFormat`] が返されます。
pub fn read_documents<R>(rdr: R) -> Result<Vec<ParsedDocument>>
where
    R: Read,
{
    let buf = BufReader::new(rdr);

    let mut documents = vec![];
    let mut pending = PendingDocument::default();
    let mut rows = vec![];
    for (i, line) in buf.lines().enumerate() {
        let line = line?;
        let lineno = i + 1;
        let line = line.trim_end_matches('\r');

        if line.trim().is_empty() {
            flush_sentence(&mut rows, &mut pending.sentences)?;
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some(id) = parse_newdoc(comment) {
                flush_sentence(&mut rows, &mut pending.sentences)?;
                let prev = std::mem::take(&mut pending);
                if !prev.is_empty() {
                    documents.push(prev.finish());
                }
                pending.id = id;
            }
            continue;
        }
        if let Some(row) = parse_row(line, lineno, rows.len())? {
            rows.push(row);
        }
    }
    flush_sentence(&mut rows, &mut pending.sentences)?;
    if !pending.is_empty() {
        documents.push(pending.finish());
    }

    log::debug!("[lectura] read {} document(s) from CoNLL-U input", documents.len());

    Ok(documents)
}

/// `# newdoc` コメントを解析します。
///
/// `newdoc` コメントでなければ `None`、IDがなければ `Some(None)` を返します。
fn parse_newdoc(comment: &str) -> Option<Option<String>> {
    let rest = comment.trim().strip_prefix("newdoc")?;
    let id = rest
        .trim()
        .strip_prefix("id")
        .map(|s| s.trim().trim_start_matches('=').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Some(id)
}

/// トークン行を解析します。
///
/// 複合語の範囲と空ノードの場合は `None` を返します。
///
/// # 引数
///
/// * `line` - トークン行
/// * `lineno` - 1始まりの行番号
/// * `num_rows` - 現在の文でこれまでに読み込んだトークン数
fn parse_row(line: &str, lineno: usize, num_rows: usize) -> Result<Option<Row>> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() != NUM_COLUMNS {
        return Err(LecturaError::invalid_format(
            "conllu",
            format!(
                "line {}: expected {} tab-separated columns, found {}",
                lineno,
                NUM_COLUMNS,
                cols.len()
            ),
        ));
    }
    if cols[0].contains('-') || cols[0].contains('.') {
        return Ok(None);
    }

    let id: usize = cols[0].parse().map_err(|_| {
        LecturaError::invalid_format("conllu", format!("line {}: invalid ID '{}'", lineno, cols[0]))
    })?;
    if id != num_rows + 1 {
        return Err(LecturaError::invalid_format(
            "conllu",
            format!("line {}: expected ID {}, found {}", lineno, num_rows + 1, id),
        ));
    }

    let head = match cols[6] {
        "_" => None,
        head => {
            let head: usize = head.parse().map_err(|_| {
                LecturaError::invalid_format(
                    "conllu",
                    format!("line {}: invalid HEAD '{}'", lineno, head),
                )
            })?;
            // 0 はルート
            head.checked_sub(1)
        }
    };

    let form = cols[1];
    let lemma = if cols[2] == "_" && form != "_" {
        form.to_lowercase()
    } else {
        cols[2].to_string()
    };
    let xpos = if cols[4] == "_" { "" } else { cols[4] };
    let pos = cols[3].parse::<Pos>().unwrap_or_else(|e| match e {});

    let token = Token::new(form, pos, cols[7])
        .with_lemma(lemma)
        .with_xpos(xpos)
        .with_feats(cols[5]);

    Ok(Some(Row {
        token,
        id,
        head,
        lineno,
    }))
}

/// 読み込んだトークン行を文として確定します。
///
/// 係り先が文の範囲外、または自分自身を指している場合はエラーを返します。
fn flush_sentence(rows: &mut Vec<Row>, sentences: &mut Vec<Sentence>) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let len = rows.len();
    let mut tokens = Vec::with_capacity(len);
    for row in rows.drain(..) {
        if let Some(head) = row.head {
            if head >= len {
                return Err(LecturaError::invalid_format(
                    "conllu",
                    format!(
                        "line {}: HEAD {} is out of range for a sentence of {} tokens",
                        row.lineno,
                        head + 1,
                        len
                    ),
                ));
            }
            if head + 1 == row.id {
                return Err(LecturaError::invalid_format(
                    "conllu",
                    format!("line {}: token {} is its own head", row.lineno, row.id),
                ));
            }
        }
        tokens.push(row.token.with_head(row.head));
    }
    sentences.push(Sentence::new(tokens)?);
    Ok(())
}
