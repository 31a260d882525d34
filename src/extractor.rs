//! Extractor Module
//!
//! シフト表グリッドの走査と再構成を行う中核モジュール。
//!
//! アンカーセル（デフォルトJ3）を基準に、下方向へ「名前行」、右方向へ
//! 「日付列」を走査し、その交差領域を(person, date)ごとのレコードへ
//! 再構成します。どちらの走査も条件を満たさない最初のセルで停止します
//! （途中の欠落は領域の打ち切りとして扱い、スキップはしません）。

use std::path::Path;

use crate::grid::SheetGrid;
use crate::schedule::{MonthData, Shift, ShiftData};
use crate::types::{CellCoord, CellValue};

/// 1シート分のグリッドから1か月のシフトデータを抽出
///
/// # 引数
///
/// * `grid` - 値と塗りつぶし信号を統合したシートグリッド
/// * `anchor` - 走査の基準となるアンカーセル座標
/// * `year` - 入力ファイル名から導出された年
/// * `month` - シート名から得た月番号
///
/// # 戻り値
///
/// 発見された名前行と同数の`ShiftData`を持つ`MonthData`。
/// 名前行・日付列が見つからない場合も、空の結果としてエラーなく返します。
pub(crate) fn extract_month(
    grid: &SheetGrid,
    anchor: CellCoord,
    year: u16,
    month: u32,
) -> MonthData {
    let names = scan_names(grid, anchor);
    let dates = scan_dates(grid, anchor);

    let data = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let shifts = dates
                .iter()
                .enumerate()
                .map(|(j, &date)| {
                    let coord = CellCoord::new(
                        anchor.row + i as u32 + 1,
                        anchor.col + j as u32 + 1,
                    );
                    Shift {
                        date,
                        value: grid.value(coord).and_then(CellValue::to_json),
                    }
                })
                .collect();
            ShiftData {
                name: name.clone(),
                shifts,
            }
        })
        .collect();

    MonthData { year, month, data }
}

/// 名前行の走査
///
/// アンカーの1行下から下方向へ、背景塗りつぶし色を持つ行が続く限り
/// セルの値を表示名として取り込みます。信号のない最初の行で停止します。
fn scan_names(grid: &SheetGrid, anchor: CellCoord) -> Vec<String> {
    let mut names = Vec::new();
    let mut row = anchor.row + 1;

    while grid.has_fill(CellCoord::new(row, anchor.col)) {
        let name = grid
            .value(CellCoord::new(row, anchor.col))
            .map(CellValue::display_name)
            .unwrap_or_default();
        names.push(name);
        row += 1;
    }

    names
}

/// 日付列の走査
///
/// アンカーの1列右から右方向へ、値が数値として解釈できる列が続く限り
/// 日付番号を取り込みます。数値でない最初の列で停止します。
fn scan_dates(grid: &SheetGrid, anchor: CellCoord) -> Vec<f64> {
    let mut dates = Vec::new();
    let mut col = anchor.col + 1;

    while let Some(date) = grid
        .value(CellCoord::new(anchor.row, col))
        .and_then(CellValue::as_number)
    {
        dates.push(date);
        col += 1;
    }

    dates
}

/// ファイル名（ベースネーム）から4桁の年を取り出す
///
/// 最初に現れる連続した4桁の数字を年として解釈します。
///
/// # 使用例
///
/// ```rust
/// use xlshift::year_from_filename;
///
/// assert_eq!(year_from_filename("roster_2024.xlsx"), Some(2024));
/// assert_eq!(year_from_filename("roster.xlsx"), None);
/// ```
pub fn year_from_filename<P: AsRef<Path>>(path: P) -> Option<u16> {
    let name = path.as_ref().file_name()?.to_str()?;
    let bytes = name.as_bytes();

    bytes
        .windows(4)
        .find(|window| window.iter().all(|b| b.is_ascii_digit()))
        .and_then(|window| std::str::from_utf8(window).ok())
        .and_then(|digits| digits.parse().ok())
}
