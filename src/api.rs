//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 出力対象者の選択
///
/// 抽出結果を全員分出力するか、1人分にフィルタするかを指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserFilter {
    /// フィルタなし（全員分の`MonthData`を出力）
    All,

    /// 指定した名前の人のみ（完全一致・大文字小文字区別）
    ///
    /// 対象者が見つからない月は空のシフトリストとして出力されます。
    Name(String),
}

impl UserFilter {
    /// CLI引数からフィルタを生成
    ///
    /// リテラル`"all"`（小文字・完全一致）のみフィルタなしを意味し、
    /// それ以外の文字列はすべて人名として扱われます。
    pub fn from_arg(arg: &str) -> Self {
        if arg == "all" {
            UserFilter::All
        } else {
            UserFilter::Name(arg.to_string())
        }
    }
}
