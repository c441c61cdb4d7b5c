use crate::coherence::compute_local_coherence;
use crate::document::{ParsedDocument, Pos, Sentence, Token};
use crate::entity_grid::{EntityGrid, EntityGridBuilder, ShortDocumentPolicy};
use crate::role::Role::{self, Absent, Object, Other, Subject};
use crate::role::Transition;

fn doc(sentences: &[&[(&str, Pos, &str)]]) -> ParsedDocument {
    ParsedDocument::new(
        sentences
            .iter()
            .map(|tokens| {
                Sentence::new(
                    tokens
                        .iter()
                        .map(|(text, pos, dep)| Token::new(*text, pos.clone(), *dep))
                        .collect(),
                )
                .unwrap()
            })
            .collect(),
    )
}

fn assert_close(expected: f64, actual: f64) {
    assert!(
        (expected - actual).abs() < 1e-12,
        "expected {}, found {}",
        expected,
        actual
    );
}

/// 主語の後に目的語が現れる2文の文書
#[test]
fn test_subject_then_object() {
    let doc = doc(&[
        &[("perro", Pos::Noun, "nsubj")],
        &[("perro", Pos::Noun, "obj")],
    ]);
    let grid = EntityGrid::new(&doc).unwrap();
    assert_eq!(Some(&[Subject, Object][..]), grid.roles("PERRO"));
    for (t, p) in grid.transitions() {
        if t == Transition::new(Subject, Object) {
            assert_eq!(1.0, p);
        } else {
            assert_eq!(0.0, p, "{}", t);
        }
    }
}

/// 1文目と3文目にのみ現れるエンティティ
#[test]
fn test_gap_in_the_middle() {
    let doc = doc(&[
        &[("gato", Pos::Noun, "obl")],
        &[("llueve", Pos::Verb, "root")],
        &[("gato", Pos::Noun, "nmod")],
    ]);
    let grid = EntityGrid::new(&doc).unwrap();
    assert_eq!(Some(&[Other, Absent, Other][..]), grid.roles("GATO"));
    assert_eq!(0.5, grid.xn_transitions());
    assert_eq!(0.5, grid.nx_transitions());
    assert_eq!(0.0, grid.xx_transitions());
}

/// 距離2の主語どうしの組
#[test]
fn test_accumulated_weight_at_distance_two() {
    let grid = EntityGrid::from_rows(3, [("LUNA", vec![Subject, Absent, Subject])]).unwrap();
    let lc = compute_local_coherence(&grid);
    assert_close(9.0 / 3.0, lc.pacc);
    assert_close(4.5 / 3.0, lc.pacc_dist);
    assert_close(1.0 / 3.0, lc.pu);
    assert_close(0.5 / 3.0, lc.pu_dist);
}

#[test]
fn test_sentence_count_round_trip() {
    let sentence: &[(&str, Pos, &str)] = &[("sol", Pos::Noun, "nsubj")];
    for n in 2..6 {
        let doc = doc(&vec![sentence; n]);
        let grid = EntityGrid::new(&doc).unwrap();
        assert_eq!(doc.num_sentences(), grid.sentence_count());
    }
}

#[test]
fn test_precedence_is_order_independent() {
    let orders: [&[(&str, Pos, &str)]; 2] = [
        &[("Ana", Pos::Propn, "nsubj"), ("Ana", Pos::Propn, "obj")],
        &[("Ana", Pos::Propn, "obj"), ("Ana", Pos::Propn, "nsubj")],
    ];
    for sentence in orders {
        let doc = doc(&[sentence, &[("Ana", Pos::Propn, "obl")]]);
        let grid = EntityGrid::new(&doc).unwrap();
        assert_eq!(Some(&[Subject, Other][..]), grid.roles("ANA"));
    }

    // X の後の O は上書きし、O の後の X は上書きしない
    for sentence in [
        &[("mar", Pos::Noun, "obl"), ("mar", Pos::Noun, "dobj")][..],
        &[("mar", Pos::Noun, "dobj"), ("mar", Pos::Noun, "obl")][..],
    ] {
        let doc = doc(&[sentence, &[]]);
        let grid = EntityGrid::new(&doc).unwrap();
        assert_eq!(Some(&[Object, Absent][..]), grid.roles("MAR"));
    }
}

#[test]
fn test_probabilities_sum_to_one() {
    let doc = doc(&[
        &[("niña", Pos::Noun, "nsubj"), ("libro", Pos::Noun, "obj")],
        &[("ella", Pos::Pron, "nsubj"), ("mesa", Pos::Noun, "obl")],
        &[("libro", Pos::Noun, "nsubj")],
        &[("niña", Pos::Noun, "iobj"), ("Pedro", Pos::Propn, "csubj")],
    ]);
    let grid = EntityGrid::new(&doc).unwrap();
    let sum: f64 = grid.transitions().map(|(_, p)| p).sum();
    assert_close(1.0, sum);
    for (_, p) in grid.transitions() {
        assert!((0.0..=1.0).contains(&p));
    }
}

#[test]
fn test_degenerate_coherence() {
    for n in 0..2 {
        let rows: Vec<(&str, Vec<Role>)> = vec![("RÍO", vec![Subject; n])];
        let grid = EntityGrid::from_rows(n, rows).unwrap();
        assert_eq!([0.0; 6], compute_local_coherence(&grid).as_array());
    }

    let doc = ParsedDocument::default();
    let grid = EntityGridBuilder::new()
        .short_document_policy(ShortDocumentPolicy::ZeroFill)
        .build(&doc)
        .unwrap();
    assert_eq!([0.0; 6], compute_local_coherence(&grid).as_array());
}

#[test]
fn test_distance_decay() {
    for d in 1..5 {
        let mut roles = vec![Absent; d + 1];
        roles[0] = Object;
        roles[d] = Other;
        let grid = EntityGrid::from_rows(d + 1, [("CIELO", roles)]).unwrap();
        let lc = compute_local_coherence(&grid);
        let d = d as f64;
        assert_close(lc.pu / d, lc.pu_dist);
        assert_close(lc.pw / d, lc.pw_dist);
        assert_close(lc.pacc / d, lc.pacc_dist);
        assert_close(2.0 / (d + 1.0), lc.pacc);
    }
}

#[test]
fn test_display_table() {
    let grid = EntityGrid::from_rows(
        3,
        [
            ("SOL", vec![Subject, Absent, Other]),
            ("NUBE", vec![Absent, Object, Absent]),
        ],
    )
    .unwrap();
    assert_eq!("SOL  S - X\nNUBE - O -\n", grid.to_string());
}
