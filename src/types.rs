//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveTime};
use serde_json::{json, Value};

/// f64が整数を正確に表現できる上限（2^53）
pub(crate) const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 日付・時刻（Excelシリアル値）
    DateTime(f64),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    #[default]
    Empty,
}

impl CellValue {
    /// calamineのセルデータから値を生成
    pub fn from_data(data: &Data) -> Self {
        match data {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::String(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) => CellValue::String(s.clone()),
            Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
            Data::Empty => CellValue::Empty,
        }
    }

    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 数値への強制変換
    ///
    /// 日付行スキャンの判定に使用します。数値と日付シリアル値はそのまま、
    /// 論理値は1/0、文字列はトリム後に数値として解釈できる場合のみ変換されます。
    /// 空セル・空文字列・エラー値は変換されません。
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::DateTime(serial) => Some(*serial),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
                }
            }
            CellValue::Error(_) | CellValue::Empty => None,
        }
    }

    /// 名前セルとして取り込む際の表示文字列
    ///
    /// 整数値の数値セルは小数点以下を付けずに表示します（例: `101` → `"101"`）。
    pub fn display_name(&self) -> String {
        match self {
            CellValue::Number(n) => format_number(*n),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(serial) => {
                excel_serial_to_iso(*serial).unwrap_or_else(|| serial.to_string())
            }
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }

    /// シフト値としてJSON値へ変換
    ///
    /// 整数値の浮動小数点数はJSON整数に畳み込み、日付シリアル値はISO 8601
    /// 文字列として出力します。空セルは`None`（JSONキー自体を省略）。
    pub fn to_json(&self) -> Option<Value> {
        match self {
            CellValue::Number(n) => Some(number_to_json(*n)),
            CellValue::String(s) => Some(json!(s)),
            CellValue::Bool(b) => Some(json!(b)),
            CellValue::DateTime(serial) => match excel_serial_to_iso(*serial) {
                Some(iso) => Some(json!(iso)),
                None => Some(number_to_json(*serial)),
            },
            CellValue::Error(e) => Some(json!(e)),
            CellValue::Empty => None,
        }
    }
}

/// f64をJSON数値へ変換（整数値はJSON整数に畳み込む）
pub(crate) fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
        json!(n as i64)
    } else {
        json!(n)
    }
}

/// f64を表示用文字列へ変換（整数値は小数点以下なし）
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Excelシリアル値をISO 8601文字列へ変換
///
/// 1900年エポック基準。シリアル値60（存在しない1900-02-29）以降は
/// Excelの閏年バグを補正します。時刻成分を持つ場合は日付時刻形式で出力します。
pub(crate) fn excel_serial_to_iso(serial: f64) -> Option<String> {
    if serial < 0.0 {
        return None;
    }

    // 1900-02-29は実在しないが、Excelはシリアル値60として数える
    let days = if serial > 59.0 { serial - 1.0 } else { serial };

    let base = NaiveDate::from_ymd_opt(1900, 1, 1)?;
    let whole_days = days.trunc() as i64;
    let fractional_day = days.fract();

    // シリアル値1が1900-01-01
    let date = base.checked_add_signed(Duration::days(whole_days - 1))?;

    if fractional_day > 0.0 {
        let seconds = (fractional_day * 86_400.0).round() as u32;
        let time = NaiveTime::from_hms_opt(
            (seconds / 3600) % 24,
            (seconds % 3600) / 60,
            seconds % 60,
        )?;
        Some(format!("{}T{}", date.format("%Y-%m-%d"), time.format("%H:%M:%S")))
    } else {
        Some(date.format("%Y-%m-%d").to_string())
    }
}

/// セル座標（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    /// 新しい座標を生成
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1形式の文字列に変換（例: (0, 0) -> "A1"）
    pub fn to_a1_notation(&self) -> String {
        let col_str = Self::col_index_to_letter(self.col);
        format!("{}{}", col_str, self.row + 1)
    }

    /// A1形式の文字列を座標に変換（例: "J3" -> (2, 9)）
    ///
    /// # 戻り値
    ///
    /// * `Some(CellCoord)` - 有効なA1形式の場合
    /// * `None` - 列部分・行部分が欠けている、または不正な文字を含む場合
    pub fn parse_a1(cell_ref: &str) -> Option<Self> {
        let cell_ref = cell_ref.trim();
        let split = cell_ref.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = cell_ref.split_at(split);

        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
            col = col.checked_mul(26)?.checked_add(digit)?;
        }

        let row: u32 = digits.parse().ok()?;
        if row == 0 {
            return None;
        }

        Some(Self::new(row - 1, col - 1))
    }

    /// 列インデックスを文字列に変換（0 -> "A", 25 -> "Z", 26 -> "AA"）
    fn col_index_to_letter(mut col: u32) -> String {
        let mut result = String::new();
        loop {
            let remainder = col % 26;
            result.insert(0, (b'A' + remainder as u8) as char);
            if col < 26 {
                break;
            }
            col = col / 26 - 1;
        }
        result
    }
}
