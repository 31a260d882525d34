//! Workbook Parser Module
//!
//! calamineを使用したExcelファイル解析の基礎実装。
//! セル値はcalamineから、背景色情報はスタイルカタログから取得し、
//! 両者を統合した`SheetGrid`を構築します。

use calamine::{open_workbook_auto_from_rs, Reader, Sheets, Xlsx};
use std::io::{Cursor, Read, Seek};

use crate::error::XlShiftError;
use crate::grid::SheetGrid;
use crate::parser::StyleCatalog;
use crate::security::SecurityConfig;
use crate::types::{CellCoord, CellValue};

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
/// calamineはセルの塗りつぶし情報を公開しないため、同じ入力バッファから
/// `StyleCatalog`を構築して統合します。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
    /// スタイルカタログ（背景色の解決用）
    styles: StyleCatalog,
}

impl WorkbookParser {
    /// ワークブックを開き、スタイルカタログも構築する
    ///
    /// # 引数
    ///
    /// * `reader` - Excelファイルを読み込むためのリーダー（Read + Seekトレイトを実装）
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックとスタイルの読み込みに成功した場合
    /// * `Err(XlShiftError)` - エラーが発生した場合
    ///
    /// 入力は一度メモリに読み込まれ、calamineとスタイルカタログの両方が
    /// 同じバッファから解析されます。
    pub fn open<R: Read + Seek>(mut reader: R) -> Result<Self, XlShiftError> {
        let security_config = SecurityConfig::default();

        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;

        if bytes_read as u64 > security_config.max_input_file_size {
            return Err(XlShiftError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, security_config.max_input_file_size
            )));
        }

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer.clone()))
            .map_err(XlShiftError::Parse)?;
        let workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(XlShiftError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        let styles = StyleCatalog::new(Cursor::new(buffer))?;

        Ok(Self { workbook, styles })
    }

    /// すべてのシート名を取得（ワークブック順）
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シートをパースして`SheetGrid`を構築
    ///
    /// # 引数
    ///
    /// * `sheet_name` - パースするシート名
    ///
    /// # 戻り値
    ///
    /// * `Ok(SheetGrid)` - 値と塗りつぶし信号を統合したグリッド
    /// * `Err(XlShiftError)` - パースエラーが発生した場合
    pub fn parse_sheet(&mut self, sheet_name: &str) -> Result<SheetGrid, XlShiftError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| XlShiftError::Parse(e.into()))?;

        let mut grid = SheetGrid::new();

        // calamineのレンジは先頭の使用セルを原点とするため、
        // 絶対座標へオフセットを適用する
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        for (row_offset, row) in range.rows().enumerate() {
            for (col_offset, data) in row.iter().enumerate() {
                let value = CellValue::from_data(data);
                if value.is_empty() {
                    continue;
                }
                let coord = CellCoord::new(
                    start_row + row_offset as u32,
                    start_col + col_offset as u32,
                );
                grid.set_value(coord, value);
            }
        }

        // 塗りつぶしのみの空セルはcalamineの使用レンジに現れないことが
        // あるため、スタイルカタログ側から信号を統合する
        for coord in self.styles.styled_cells(sheet_name) {
            grid.set_fill(coord);
        }

        Ok(grid)
    }
}
