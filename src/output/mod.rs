//! Output Module
//!
//! 抽出結果のJSON出力を提供するモジュール。
//! フィルタの有無に応じて出力レコードの形が変わるため、両者をenumとして
//! 表現します。

use std::io::Write;

use crate::api::UserFilter;
use crate::error::XlShiftError;
use crate::schedule::{filter_months, FilteredMonthData, MonthData};

/// JSON出力レポート
///
/// フィルタなしの場合は`MonthData`の配列、1人分にフィルタした場合は
/// `FilteredMonthData`の配列として出力されます。
#[derive(Debug, Clone, PartialEq)]
pub enum JsonReport {
    /// 全員分の月データ
    Full(Vec<MonthData>),
    /// 1人分にフィルタした月データ
    Filtered(Vec<FilteredMonthData>),
}

impl JsonReport {
    /// 月データ列とフィルタからレポートを構築する
    ///
    /// `UserFilter::All`は内部で計算した月データをそのまま出力する
    /// 恒等変換です。
    pub fn build(months: Vec<MonthData>, filter: &UserFilter) -> Self {
        match filter {
            UserFilter::All => JsonReport::Full(months),
            UserFilter::Name(name) => JsonReport::Filtered(filter_months(&months, name)),
        }
    }

    /// レポートをJSONとして書き出す
    ///
    /// UTF-8、2スペースインデント、末尾改行なしで一度だけ書き込みます。
    pub fn render<W: Write>(&self, writer: W) -> Result<(), XlShiftError> {
        match self {
            JsonReport::Full(months) => serde_json::to_writer_pretty(writer, months),
            JsonReport::Filtered(months) => serde_json::to_writer_pretty(writer, months),
        }
        .map_err(|e| XlShiftError::Io(e.into()))
    }

    /// レポートをJSON文字列として取得する
    pub fn to_json_string(&self) -> Result<String, XlShiftError> {
        match self {
            JsonReport::Full(months) => serde_json::to_string_pretty(months),
            JsonReport::Filtered(months) => serde_json::to_string_pretty(months),
        }
        .map_err(|e| XlShiftError::Io(e.into()))
    }

    /// 月エントリ数
    pub fn len(&self) -> usize {
        match self {
            JsonReport::Full(months) => months.len(),
            JsonReport::Filtered(months) => months.len(),
        }
    }

    /// 月エントリが空かどうか
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
