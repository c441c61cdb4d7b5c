//! ユーティリティ関数を提供するモジュール
//!
//! 主に以下の機能を提供します：
//!
//! - UD形式の形態素性（`FEATS`）文字列の解析
//! - テスト用のマクロ

/// UD形式の形態素性文字列を解析してキーと値の組のベクターに分割する
///
/// `Key=Value` の組が `|` で区切られた文字列を解析します。
/// `_` または空文字列の場合は空のベクターを返します。
/// `=` を含まない要素は値が空文字列のキーとして扱います。
///
/// # 引数
///
/// * `feats` - 解析する形態素性文字列
///
/// # 戻り値
///
/// 出現順のキーと値の組
///
/// # 例
///
/// ```
/// # use lectura::utils::parse_feats;
/// let feats = parse_feats("Mood=Ind|Number=Sing|Person=3");
/// assert_eq!(feats[2], ("Person".to_string(), "3".to_string()));
///
/// assert!(parse_feats("_").is_empty());
/// ```
pub fn parse_feats(feats: &str) -> Vec<(String, String)> {
    let feats = feats.trim();
    if feats.is_empty() || feats == "_" {
        return vec![];
    }
    feats
        .split('|')
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (item.to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
/// HashMapリテラルを簡潔に記述するためのマクロ
///
/// # 例
///
/// ```ignore
/// let map = hashmap! {
///     "key1" => "value1",
///     "key2" => "value2",
/// };
/// ```
///
/// # 注意
///
/// このマクロはテスト時のみ利用可能です。
macro_rules! hashmap {
    ( $($k:expr => $v:expr,)* ) => {
        {
            #[allow(unused_mut)]
            let mut h = hashbrown::HashMap::new();
            $(
                h.insert($k, $v);
            )*
            h
        }
    };
    ( $($k:expr => $v:expr),* ) => {
        hashmap![$( $k => $v, )*]
    };
}

#[cfg(test)]
pub(crate) use hashmap;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feats() {
        assert_eq!(
            vec![
                ("Gender".to_string(), "Masc".to_string()),
                ("Number".to_string(), "Sing".to_string()),
            ],
            parse_feats("Gender=Masc|Number=Sing")
        );
    }

    #[test]
    fn test_parse_feats_without_value() {
        assert_eq!(
            vec![("Perif".to_string(), String::new())],
            parse_feats("Perif")
        );
        assert!(parse_feats("").is_empty());
    }
}
