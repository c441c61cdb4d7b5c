//! 結束性と読みやすさの特徴量を計算するユーティリティ
//!
//! このバイナリは、CoNLL-U形式で与えられた構文解析済みの文書を読み込み、
//! `# newdoc` ごとにエンティティグリッドの遷移確率、局所的結束性、表層的な指標を計算して、
//! 指定された出力形式（tsv、csv、json、detail）で結果を出力します。

mod features;

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use lectura::conllu;
use lectura::correction::{fix_parse_tree, InfinitiveMap, Periphrases};
use lectura::entity_grid::{EntityGridBuilder, EntityKey, ShortDocumentPolicy};
use lectura::surface;
use lectura::trace::Trace;
use lectura::{compute_local_coherence, LocalCoherence};

use clap::Parser;

use crate::features::Features;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Tsv,
    Csv,
    Json,
    Detail,
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "tsv" => Ok(Self::Tsv),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "detail" => Ok(Self::Detail),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(
    name = "score",
    about = "Computes entity-grid coherence and readability features"
)]
struct Args {
    /// Input file in CoNLL-U. Reads stdin if not given.
    #[clap(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output mode. Choices are tsv, csv, json, and detail.
    #[clap(short = 'O', long, default_value = "tsv")]
    output_mode: OutputMode,

    /// Scores documents with fewer than two sentences as all zeros instead of failing.
    #[clap(long)]
    zero_fill: bool,

    /// Keys entities by lemma instead of surface form.
    #[clap(long)]
    lemma_entities: bool,

    /// Tab-separated map from conjugated verbs to infinitives, used to correct lemmas.
    #[clap(short = 'I', long)]
    infinitives: Option<PathBuf>,
}

/// メイン関数
///
/// 入力を文書ごとに読み込み、特徴量を計算して指定された形式で標準出力に出力します。
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let infinitives = match &args.infinitives {
        Some(path) => {
            eprintln!("Loading the infinitive map...");
            InfinitiveMap::from_reader(File::open(path)?)?
        }
        None => InfinitiveMap::new(),
    };
    let periphrases = Periphrases::default();

    eprintln!("Reading documents...");
    let docs = match &args.input {
        Some(path) => conllu::read_documents(File::open(path)?)?,
        None => conllu::read_documents(std::io::stdin().lock())?,
    };
    eprintln!("Scoring {} document(s)", docs.len());

    let builder = EntityGridBuilder::new()
        .short_document_policy(if args.zero_fill {
            ShortDocumentPolicy::ZeroFill
        } else {
            ShortDocumentPolicy::Reject
        })
        .entity_key(if args.lemma_entities {
            EntityKey::Lemma
        } else {
            EntityKey::Surface
        });

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    match args.output_mode {
        OutputMode::Tsv => Features::write_header(&mut out, false)?,
        OutputMode::Csv => Features::write_header(&mut out, true)?,
        OutputMode::Json | OutputMode::Detail => {}
    }
    for (i, doc) in docs.iter().enumerate() {
        let name = doc
            .id()
            .map_or_else(|| format!("doc{}", i + 1), str::to_string);
        let grid = builder
            .build(doc)
            .map_err(|e| format!("{}: {}", name, e))?;
        let fixed = fix_parse_tree(doc, &infinitives, &periphrases);

        match args.output_mode {
            OutputMode::Tsv | OutputMode::Csv => {
                let csv = matches!(args.output_mode, OutputMode::Csv);
                let features = Features::extract(name, &fixed, &grid);
                features.write_row(&mut out, csv)?;
            }
            OutputMode::Json => {
                let features = Features::extract(name, &fixed, &grid);
                serde_json::to_writer_pretty(&mut out, &features)?;
                out.write_all(b"\n")?;
            }
            OutputMode::Detail => {
                writeln!(&mut out, "# document = {}", name)?;
                write!(&mut out, "{}", grid)?;
                for (t, p) in grid.transitions() {
                    writeln!(&mut out, "{}\t{}", t, p)?;
                }
                let coherence = compute_local_coherence(&grid);
                for (name, value) in LocalCoherence::NAMES.iter().zip(coherence.as_array()) {
                    writeln!(&mut out, "{}\t{}", name, value)?;
                }
                let mut trace = Trace::new();
                let dissimilarity = surface::pos_dissimilarity_traced(&fixed, &mut trace);
                let similarity = surface::syntactic_similarity_traced(&fixed, &mut trace);
                for event in trace.events() {
                    writeln!(&mut out, "{}", event)?;
                }
                writeln!(&mut out, "pos_dissimilarity\t{}", dissimilarity)?;
                writeln!(&mut out, "syntactic_similarity\t{}", similarity)?;
                out.write_all(b"EOS\n")?;
            }
        }
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}
