//! Builder Module
//!
//! Fluent Builder APIを提供し、`Extractor`インスタンスを段階的に構築する。

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::XlShiftError;
use crate::extractor::{extract_month, year_from_filename};
use crate::parser::WorkbookParser;
use crate::schedule::MonthData;
use crate::types::CellCoord;

/// 抽出処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ExtractorConfig {
    /// 走査の基準となるアンカーセル座標
    pub anchor: CellCoord,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            // シフト表グリッドの基準セルはJ3
            anchor: CellCoord::new(2, 9),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Extractor`インスタンスを段階的に構築するためのビルダーです。
/// アンカーセルにはデフォルト値（J3）が設定されており、必要な場合のみ
/// オーバーライドできます。設定の検証は`build()`時に行われます。
///
/// # 使用例
///
/// ```rust
/// use xlshift::ExtractorBuilder;
///
/// # fn main() -> Result<(), xlshift::XlShiftError> {
/// let extractor = ExtractorBuilder::new()
///     .with_anchor("B2")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExtractorBuilder {
    /// アンカーセルのA1形式参照（構築中・未検証）
    anchor: String,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - アンカーセル: J3
    pub fn new() -> Self {
        Self {
            anchor: "J3".to_string(),
        }
    }

    /// アンカーセルをA1形式で指定する
    ///
    /// # 引数
    ///
    /// * `cell_ref` - アンカーセルのA1形式参照（例: `"J3"`）
    ///
    /// 検証は`build()`時に行われ、不正な参照は`Config`エラーになります。
    pub fn with_anchor(mut self, cell_ref: &str) -> Self {
        self.anchor = cell_ref.to_string();
        self
    }

    /// 設定を検証して`Extractor`を構築する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Extractor)` - 設定が有効な場合
    /// * `Err(XlShiftError::Config)` - アンカーセル参照が不正な場合
    pub fn build(self) -> Result<Extractor, XlShiftError> {
        let anchor = CellCoord::parse_a1(&self.anchor).ok_or_else(|| {
            XlShiftError::Config(format!(
                "Invalid anchor cell reference: '{}'",
                self.anchor
            ))
        })?;

        Ok(Extractor {
            config: ExtractorConfig { anchor },
        })
    }
}

/// シフト表の抽出器
///
/// ワークブックを読み込み、各シートをアンカーセル基準で走査して
/// 月ごとのシフトデータへ再構成します。処理は完全に同期的で、
/// ファイルは1つずつ順番に読み込まれます。
///
/// # 使用例
///
/// ## ファイルからの抽出
///
/// ```rust,no_run
/// use xlshift::ExtractorBuilder;
///
/// # fn main() -> Result<(), xlshift::XlShiftError> {
/// let extractor = ExtractorBuilder::new().build()?;
/// let months = extractor.extract_path("roster_2024.xlsx")?;
/// # Ok(())
/// # }
/// ```
///
/// ## メモリバッファからの抽出
///
/// ```rust,no_run
/// use std::io::Cursor;
/// use xlshift::ExtractorBuilder;
///
/// # fn main() -> Result<(), xlshift::XlShiftError> {
/// let extractor = ExtractorBuilder::new().build()?;
/// let excel_data: Vec<u8> = vec![]; // Excelファイルのバイト列
/// let months = extractor.extract(Cursor::new(excel_data), 2024)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Extractor {
    pub(crate) config: ExtractorConfig,
}

impl Extractor {
    /// ワークブックからすべての月データを抽出する
    ///
    /// # 引数
    ///
    /// * `input` - Excelファイルを読み込むためのリーダー（Read + Seekトレイトを実装）
    /// * `year` - この入力全体に適用する年
    ///
    /// # 戻り値
    ///
    /// ワークブック順の`MonthData`のリスト。シート名が月番号として
    /// 解釈できないシートはスキップされます。
    pub fn extract<R: Read + Seek>(
        &self,
        input: R,
        year: u16,
    ) -> Result<Vec<MonthData>, XlShiftError> {
        let mut parser = WorkbookParser::open(input)?;
        let mut months = Vec::new();

        for sheet_name in parser.sheet_names() {
            let Ok(month) = sheet_name.trim().parse::<u32>() else {
                continue;
            };
            let grid = parser.parse_sheet(&sheet_name)?;
            months.push(extract_month(&grid, self.config.anchor, year, month));
        }

        Ok(months)
    }

    /// ファイルパスから月データを抽出する
    ///
    /// 年はファイル名（ベースネーム）に含まれる4桁の数字から導出されます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<MonthData>)` - 抽出に成功した場合
    /// * `Err(XlShiftError::Config)` - ファイル名に4桁の年が含まれない場合
    pub fn extract_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Vec<MonthData>, XlShiftError> {
        let path = path.as_ref();
        let year = year_from_filename(path).ok_or_else(|| {
            XlShiftError::Config(format!(
                "Input filename '{}' does not contain a 4-digit year",
                path.display()
            ))
        })?;

        let file = File::open(path)?;
        self.extract(file, year)
    }

    /// 複数のファイルから月データを抽出して連結する
    ///
    /// 各ファイルは独立して解析され（年もファイルごとに導出）、結果は
    /// 入力ファイル順・ファイル内はシート順で連結されます。
    pub fn extract_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<MonthData>, XlShiftError> {
        let mut months = Vec::new();
        for path in paths {
            months.extend(self.extract_path(path)?);
        }
        Ok(months)
    }
}
