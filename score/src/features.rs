//! 文書ごとの特徴量の抽出と書き出し

use std::io::Write;

use lectura::document::ParsedDocument;
use lectura::givenness;
use lectura::role::Transition;
use lectura::surface;
use lectura::{compute_local_coherence, EntityGrid, LocalCoherence};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// 表層的な指標の列名（[`Features::extract`] での並び順）
const SURFACE_NAMES: [&str; 20] = [
    "sentence_count",
    "word_count",
    "char_count",
    "noun_count",
    "clause_count",
    "average_word_length",
    "average_sentence_length",
    "average_clause_length",
    "lexical_density",
    "verb_noun_ratio",
    "negation_density",
    "connection_words_ratio",
    "first_second_person_density",
    "noun_phrase_density",
    "subordination",
    "pos_dissimilarity",
    "syntactic_similarity",
    "words_before_root",
    "pronoun_density",
    "pronoun_noun_ratio",
];

/// 1文書分の特徴量
///
/// 列は、16種類の遷移確率、6種類の局所的結束性、表層的な指標の順に並びます。
#[derive(Debug, Clone)]
pub struct Features {
    document: String,
    values: Vec<(&'static str, f64)>,
}

impl Features {
    /// 文書名を除く列名を出力順に返します。
    pub fn names() -> impl Iterator<Item = &'static str> {
        Transition::all()
            .map(Transition::name)
            .chain(LocalCoherence::NAMES)
            .chain(SURFACE_NAMES)
    }

    /// エンティティグリッドと迂言形を印付けした文書から特徴量を抽出します。
    pub fn extract(document: String, doc: &ParsedDocument, grid: &EntityGrid) -> Self {
        let proxies = [
            surface::sentence_count(doc) as f64,
            surface::word_count(doc) as f64,
            surface::char_count(doc) as f64,
            surface::noun_count(doc) as f64,
            surface::clause_count(doc) as f64,
            surface::average_word_length(doc),
            surface::average_sentence_length(doc),
            surface::average_clause_length(doc),
            surface::lexical_density(doc),
            surface::verb_noun_ratio(doc),
            surface::negation_density(doc),
            surface::connection_words_ratio(doc),
            surface::first_second_person_density(doc),
            surface::noun_phrase_density(doc),
            surface::subordination(doc),
            surface::pos_dissimilarity(doc),
            surface::syntactic_similarity(doc),
            surface::words_before_root(doc, surface::DEFAULT_MAX_DEPTH),
            givenness::pronoun_density(doc),
            givenness::pronoun_noun_ratio(doc),
        ];

        let values = grid
            .transitions()
            .map(|(_, p)| p)
            .chain(compute_local_coherence(grid).as_array())
            .chain(proxies)
            .zip(Self::names())
            .map(|(value, name)| (name, value))
            .collect();

        Self { document, values }
    }

    /// 特徴量の名前と値の組を返します。
    #[cfg(test)]
    pub fn values(&self) -> &[(&'static str, f64)] {
        &self.values
    }

    /// 区切り文字で連結したヘッダ行を書き出します。
    ///
    /// 列名は固定なので、文書がなくても書き出せます。
    pub fn write_header<W>(mut wtr: W, csv: bool) -> std::io::Result<()>
    where
        W: Write,
    {
        let sep = if csv { b"," } else { b"\t" };
        wtr.write_all(b"document")?;
        for name in Self::names() {
            wtr.write_all(sep)?;
            wtr.write_all(name.as_bytes())?;
        }
        wtr.write_all(b"\n")
    }

    /// 区切り文字で連結した値の行を書き出します。
    ///
    /// CSV の場合、文書名は必要に応じて引用符で囲まれます。
    pub fn write_row<W>(&self, mut wtr: W, csv: bool) -> std::io::Result<()>
    where
        W: Write,
    {
        if csv {
            quote_csv_cell(&mut wtr, self.document.as_bytes())?;
        } else {
            wtr.write_all(self.document.as_bytes())?;
        }
        let sep = if csv { "," } else { "\t" };
        for (_, value) in &self.values {
            write!(wtr, "{}{}", sep, value)?;
        }
        wtr.write_all(b"\n")
    }
}

impl Serialize for Features {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("document", &self.document)?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// CSVのセルとして引用符付きでデータを書き込みます。
pub fn quote_csv_cell<W>(mut wtr: W, mut data: &[u8]) -> std::io::Result<()>
where
    W: Write,
{
    let mut output = [0; 4096];
    let mut writer = csv_core::Writer::new();
    loop {
        let (result, nin, nout) = writer.field(data, &mut output);
        wtr.write_all(&output[..nout])?;
        if result == csv_core::WriteResult::InputEmpty {
            break;
        }
        data = &data[nin..];
    }
    let (_, nout) = writer.finish(&mut output);
    wtr.write_all(&output[..nout])?;
    Ok(())
}
