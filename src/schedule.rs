//! Schedule Records Module
//!
//! 抽出結果を表すレコード型と、個人名によるフィルタリングを提供するモジュール。
//! すべてのレコードは実行ごとに新しく構築され、構築後は変更されません。

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::types::MAX_EXACT_INT;

/// 1人の1日分のシフト
///
/// `date`は日付行から取得した数値、`value`はその人・その日のセルの生の内容。
/// セルが存在しない場合は`value`が`None`となり、JSON出力ではキー自体が
/// 省略されます。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shift {
    /// 日付番号（整数値はJSON整数として出力される）
    #[serde(serialize_with = "serialize_date")]
    pub date: f64,

    /// セルの生の値（空セルは`None`でキー省略）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// 1人の1か月分のシフト
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftData {
    /// 名前列から取得した表示名
    pub name: String,

    /// 発見された日付列と同数のシフト（スキャン順）
    pub shifts: Vec<Shift>,
}

/// 1シート（= 1か月）分の抽出結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthData {
    /// 入力ファイル名から導出された年
    pub year: u16,

    /// シート名から得た月番号
    pub month: u32,

    /// 発見された名前行と同数の個人データ（スキャン順）
    pub data: Vec<ShiftData>,
}

/// 1人分にフィルタした1か月の抽出結果
///
/// `MonthData`の`data`ラッパーを外し、対象者の`shifts`のみを平坦に持ちます。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredMonthData {
    pub year: u16,
    pub month: u32,
    pub shifts: Vec<Shift>,
}

/// 日付番号のシリアライズ（整数値はJSON整数に畳み込む）
fn serialize_date<S>(date: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if date.fract() == 0.0 && date.abs() < MAX_EXACT_INT {
        serializer.serialize_i64(*date as i64)
    } else {
        serializer.serialize_f64(*date)
    }
}

/// 月データ列を1人分にフィルタする
///
/// 名前は完全一致（大文字小文字区別）で照合します。対象者がその月に
/// 存在しない場合はエラーにせず、空のシフトリストを返します。
pub fn filter_months(months: &[MonthData], name: &str) -> Vec<FilteredMonthData> {
    months
        .iter()
        .map(|month| FilteredMonthData {
            year: month.year,
            month: month.month,
            shifts: month
                .data
                .iter()
                .find(|person| person.name == name)
                .map(|person| person.shifts.clone())
                .unwrap_or_default(),
        })
        .collect()
}
