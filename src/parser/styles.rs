//! Style Catalog Module
//!
//! XLSX内部のXMLファイルから、calamineで取得不可能なセル背景色の情報を
//! 抽出するモジュール。名前行スキャンの「スタイル信号」はここで解決されます。
//!
//! XLSXはZIPアーカイブであり、セルのスタイルは次の4段の参照で決まります:
//! ワークシートXMLの`<c s="N">`（スタイルインデックス）→ `xl/styles.xml`の
//! `<cellXfs>`（`fillId`）→ `<fills>`（塗りつぶし定義）→ 明示的な色の有無。

use std::collections::HashMap;
use std::io::{Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::XlShiftError;
use crate::security::{validate_zip_path, SecurityConfig};
use crate::types::CellCoord;

/// 1つの塗りつぶし定義（`<fill>`要素）
#[derive(Debug, Clone, Default)]
struct Fill {
    /// `patternFill`の`patternType`属性
    pattern_type: Option<String>,
    /// 明示的な色要素（`fgColor`/`bgColor`/`color`）を持つかどうか
    has_color: bool,
}

impl Fill {
    /// この塗りつぶしが背景色として扱えるかどうか
    ///
    /// パターンが`none`以外で、明示的な色を持つ場合のみ真。
    /// デフォルトの2つの塗りつぶし（none、色指定のないgray125）は偽になります。
    fn is_colored(&self) -> bool {
        self.has_color && self.pattern_type.as_deref() != Some("none")
    }
}

/// XLSXスタイルカタログ
///
/// ZIPアーカイブからXMLを直接解析し、「このセルは背景塗りつぶし色を
/// 持つか」という問い合わせに答えます。
pub(crate) struct StyleCatalog {
    /// 塗りつぶしインデックス → 明示的な色の有無
    fill_colored: Vec<bool>,
    /// スタイルインデックス（cellXfs） → fillId
    xf_fill_ids: Vec<u32>,
    /// シート名 → セル座標 → スタイルインデックスのマッピング
    sheet_cell_styles: HashMap<String, HashMap<CellCoord, u32>>,
}

impl StyleCatalog {
    /// XLSXファイル（ZIPアーカイブ）からスタイルカタログを構築
    ///
    /// # 引数
    ///
    /// * `reader` - XLSXファイルを読み込むためのリーダー（Read + Seekトレイトを実装）
    ///
    /// # 戻り値
    ///
    /// * `Ok(StyleCatalog)` - 解析に成功した場合
    /// * `Err(XlShiftError)` - ZIP/XML解析エラー、またはセキュリティ制限違反
    ///
    /// `xl/styles.xml`が存在しないアーカイブも有効で、その場合すべての
    /// 問い合わせが偽を返すカタログになります。
    pub fn new<R: Read + Seek>(reader: R) -> Result<Self, XlShiftError> {
        let security_config = SecurityConfig::default();

        let mut archive =
            ZipArchive::new(reader).map_err(|e| XlShiftError::Zip(format!("{}", e)))?;

        Self::check_archive(&mut archive, &security_config)?;

        // 1. xl/styles.xml: 塗りつぶし定義とcellXfsを解析
        let (fill_colored, xf_fill_ids) = match Self::read_entry(&mut archive, "xl/styles.xml")? {
            Some(xml) => Self::parse_styles(&xml)?,
            None => (Vec::new(), Vec::new()),
        };

        // 2. xl/workbook.xml: シート名とリレーションシップIDの対応（ワークブック順）
        let sheets = match Self::read_entry(&mut archive, "xl/workbook.xml")? {
            Some(xml) => Self::parse_workbook(&xml)?,
            None => Vec::new(),
        };

        // 3. xl/_rels/workbook.xml.rels: リレーションシップID → パート パス
        let rels = match Self::read_entry(&mut archive, "xl/_rels/workbook.xml.rels")? {
            Some(xml) => Self::parse_rels(&xml)?,
            None => HashMap::new(),
        };

        // 4. 各ワークシートパート: セル座標 → スタイルインデックス
        let mut sheet_cell_styles = HashMap::new();
        for (sheet_name, rel_id) in sheets {
            let Some(target) = rels.get(&rel_id) else {
                continue;
            };
            let part_path = normalize_part_path(target);
            let Some(xml) = Self::read_entry(&mut archive, &part_path)? else {
                continue;
            };
            sheet_cell_styles.insert(sheet_name, Self::parse_worksheet(&xml)?);
        }

        Ok(Self {
            fill_colored,
            xf_fill_ids,
            sheet_cell_styles,
        })
    }

    /// セルが背景塗りつぶし色を持つかどうか
    ///
    /// シート・セル・スタイル・塗りつぶしのいずれかが未知の場合は偽。
    #[allow(dead_code)]
    pub fn has_fill_color(&self, sheet_name: &str, coord: CellCoord) -> bool {
        self.sheet_cell_styles
            .get(sheet_name)
            .and_then(|cells| cells.get(&coord))
            .map(|&xf| self.xf_has_fill_color(xf))
            .unwrap_or(false)
    }

    /// シート内で背景塗りつぶし色を持つすべてのセル座標
    ///
    /// 値を持たない塗りつぶしのみのセルもここに含まれます。
    pub fn styled_cells(&self, sheet_name: &str) -> Vec<CellCoord> {
        let Some(cells) = self.sheet_cell_styles.get(sheet_name) else {
            return Vec::new();
        };
        cells
            .iter()
            .filter(|&(_, &xf)| self.xf_has_fill_color(xf))
            .map(|(&coord, _)| coord)
            .collect()
    }

    /// スタイルインデックスを塗りつぶしの有無まで解決
    fn xf_has_fill_color(&self, xf: u32) -> bool {
        self.xf_fill_ids
            .get(xf as usize)
            .and_then(|&fill_id| self.fill_colored.get(fill_id as usize))
            .copied()
            .unwrap_or(false)
    }

    /// アーカイブ全体のセキュリティチェック
    ///
    /// ファイル数の上限、各エントリのパス検証とサイズチェック、
    /// 展開後サイズの累計チェックを行います。
    fn check_archive<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        security_config: &SecurityConfig,
    ) -> Result<(), XlShiftError> {
        if archive.len() > security_config.max_file_count {
            return Err(XlShiftError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                archive.len(),
                security_config.max_file_count
            )));
        }

        let mut total_decompressed_size = 0u64;
        for i in 0..archive.len() {
            let file = archive
                .by_index(i)
                .map_err(|e| XlShiftError::Zip(format!("{}", e)))?;

            let file_name = file.name();
            validate_zip_path(file_name).map_err(|e| {
                XlShiftError::SecurityViolation(format!("Invalid ZIP path: {}", e))
            })?;

            let file_size = file.size();
            if file_size > security_config.max_file_size {
                return Err(XlShiftError::SecurityViolation(format!(
                    "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                    file_name, file_size, security_config.max_file_size
                )));
            }

            total_decompressed_size =
                total_decompressed_size
                    .checked_add(file_size)
                    .ok_or_else(|| {
                        XlShiftError::SecurityViolation(
                            "Total decompressed size calculation overflow".to_string(),
                        )
                    })?;

            if total_decompressed_size > security_config.max_decompressed_size {
                return Err(XlShiftError::SecurityViolation(format!(
                    "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                    total_decompressed_size, security_config.max_decompressed_size
                )));
            }
        }

        Ok(())
    }

    /// アーカイブからエントリを読み込む（存在しない場合は`None`）
    fn read_entry<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        name: &str,
    ) -> Result<Option<Vec<u8>>, XlShiftError> {
        let mut file = match archive.by_name(name) {
            Ok(file) => file,
            Err(_) => return Ok(None),
        };
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(Some(content))
    }

    /// xl/styles.xml の解析
    ///
    /// `<fills>`と`<cellXfs>`を解析し、塗りつぶしの色情報とスタイルごとの
    /// `fillId`を構築します。`<dxfs>`内の塗りつぶしや`<cellStyleXfs>`内の
    /// `<xf>`は対象外です。
    fn parse_styles(xml: &[u8]) -> Result<(Vec<bool>, Vec<u32>), XlShiftError> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();

        let mut fill_colored = Vec::new();
        let mut xf_fill_ids = Vec::new();
        let mut in_fills = false;
        let mut in_cell_xfs = false;
        let mut current_fill: Option<Fill> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"fills" => in_fills = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"fill" if in_fills => current_fill = Some(Fill::default()),
                    b"patternFill" => {
                        if let Some(fill) = current_fill.as_mut() {
                            fill.pattern_type = attr_value(&e, b"patternType")?;
                        }
                    }
                    b"fgColor" | b"bgColor" | b"color" => {
                        if let Some(fill) = current_fill.as_mut() {
                            if has_color_attr(&e)? {
                                fill.has_color = true;
                            }
                        }
                    }
                    b"xf" if in_cell_xfs => xf_fill_ids.push(parse_fill_id(&e)?),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    // <fill/> は定義として空（色なし）
                    b"fill" if in_fills => fill_colored.push(false),
                    b"patternFill" => {
                        if let Some(fill) = current_fill.as_mut() {
                            fill.pattern_type = attr_value(&e, b"patternType")?;
                        }
                    }
                    b"fgColor" | b"bgColor" | b"color" => {
                        if let Some(fill) = current_fill.as_mut() {
                            if has_color_attr(&e)? {
                                fill.has_color = true;
                            }
                        }
                    }
                    b"xf" if in_cell_xfs => xf_fill_ids.push(parse_fill_id(&e)?),
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"fills" => in_fills = false,
                    b"cellXfs" => in_cell_xfs = false,
                    b"fill" => {
                        if let Some(fill) = current_fill.take() {
                            fill_colored.push(fill.is_colored());
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(XlShiftError::Config(format!("XML parse error: {}", e)))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok((fill_colored, xf_fill_ids))
    }

    /// xl/workbook.xml の解析
    ///
    /// `<sheets>`内の`<sheet>`要素からシート名とリレーションシップIDを
    /// ワークブック順で取得します。
    fn parse_workbook(xml: &[u8]) -> Result<Vec<(String, String)>, XlShiftError> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();

        let mut sheets = Vec::new();
        let mut in_sheets = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"sheets" => in_sheets = true,
                    b"sheet" if in_sheets => {
                        // <sheet name="3" sheetId="1" r:id="rId1"/>
                        let name = attr_value(&e, b"name")?;
                        let rel_id = attr_value(&e, b"r:id")?;
                        if let (Some(name), Some(rel_id)) = (name, rel_id) {
                            sheets.push((name, rel_id));
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => {
                    if e.name().as_ref() == b"sheets" {
                        in_sheets = false;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(XlShiftError::Config(format!("XML parse error: {}", e)))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// xl/_rels/workbook.xml.rels の解析
    ///
    /// リレーションシップID → ターゲットパスのマッピングを構築します。
    fn parse_rels(xml: &[u8]) -> Result<HashMap<String, String>, XlShiftError> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();

        let mut rels = HashMap::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.name().as_ref() == b"Relationship" {
                        // <Relationship Id="rId1" Type="..." Target="worksheets/sheet1.xml"/>
                        let id = attr_value(&e, b"Id")?;
                        let target = attr_value(&e, b"Target")?;
                        if let (Some(id), Some(target)) = (id, target) {
                            rels.insert(id, target);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(XlShiftError::Config(format!("XML parse error: {}", e)))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// ワークシートXMLの解析
    ///
    /// `<c r="J4" s="3">`のセル参照とスタイルインデックスを収集します。
    /// 値を持たないセル（`<c r="J4" s="3"/>`）もスタイル付きであれば対象です。
    fn parse_worksheet(xml: &[u8]) -> Result<HashMap<CellCoord, u32>, XlShiftError> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();

        let mut cell_styles = HashMap::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.name().as_ref() == b"c" {
                        let cell_ref = attr_value(&e, b"r")?;
                        let style = attr_value(&e, b"s")?;
                        if let (Some(cell_ref), Some(style)) = (cell_ref, style) {
                            if let Some(coord) = CellCoord::parse_a1(&cell_ref) {
                                cell_styles.insert(coord, style.parse::<u32>()?);
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(XlShiftError::Config(format!("XML parse error: {}", e)))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(cell_styles)
    }
}

/// リレーションシップのターゲットをZIPエントリパスに正規化
///
/// ワークブックからの相対パス（`worksheets/sheet1.xml`）と、パッケージ
/// ルートからの絶対パス（`/xl/worksheets/sheet1.xml`）の両方に対応します。
fn normalize_part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => format!("xl/{}", target),
    }
}

/// 開始タグから指定した属性の値を取得
fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, XlShiftError> {
    for attr in e.attributes() {
        let attr =
            attr.map_err(|e| XlShiftError::Config(format!("XML attribute error: {}", e)))?;
        if attr.key.as_ref() == key {
            return Ok(Some(std::str::from_utf8(&attr.value)?.to_string()));
        }
    }
    Ok(None)
}

/// 色要素が明示的な色指定属性を持つかどうか
fn has_color_attr(e: &BytesStart<'_>) -> Result<bool, XlShiftError> {
    for attr in e.attributes() {
        let attr =
            attr.map_err(|e| XlShiftError::Config(format!("XML attribute error: {}", e)))?;
        if matches!(
            attr.key.as_ref(),
            b"rgb" | b"indexed" | b"theme" | b"auto"
        ) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `<xf>`要素の`fillId`属性を取得（省略時は0）
fn parse_fill_id(e: &BytesStart<'_>) -> Result<u32, XlShiftError> {
    match attr_value(e, b"fillId")? {
        Some(id) => Ok(id.parse()?),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Excel本体が書き出す形に揃えたスタイルXML:
    // fill 0 = none, fill 1 = gray125（色なし）, fill 2 = solid yellow
    const STYLES_XML: &[u8] = br#"<?xml version="1.0"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fills count="3">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
    <fill>
      <patternFill patternType="solid">
        <fgColor rgb="FFFFFF00"/>
        <bgColor indexed="64"/>
      </patternFill>
    </fill>
  </fills>
  <cellXfs count="3">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="0" fontId="0" fillId="2" borderId="0" xfId="0" applyFill="1"/>
    <xf numFmtId="0" fontId="0" borderId="0" xfId="0"/>
  </cellXfs>
</styleSheet>"#;

    #[test]
    fn test_parse_styles_fill_color_flags() {
        let (fill_colored, xf_fill_ids) = StyleCatalog::parse_styles(STYLES_XML).unwrap();

        assert_eq!(fill_colored, vec![false, false, true]);
        // fillId省略時は0
        assert_eq!(xf_fill_ids, vec![0, 2, 0]);
    }

    #[test]
    fn test_parse_styles_solid_fill_without_color_is_unstyled() {
        let xml = br#"<styleSheet>
  <fills count="1">
    <fill><patternFill patternType="solid"/></fill>
  </fills>
  <cellXfs count="1"><xf fillId="0"/></cellXfs>
</styleSheet>"#;
        let (fill_colored, _) = StyleCatalog::parse_styles(xml).unwrap();
        assert_eq!(fill_colored, vec![false]);
    }

    #[test]
    fn test_parse_workbook_sheet_order() {
        let xml = br#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="3" sheetId="1" r:id="rId1"/>
    <sheet name="4" sheetId="2" r:id="rId2"/>
  </sheets>
</workbook>"#;
        let sheets = StyleCatalog::parse_workbook(xml).unwrap();
        assert_eq!(
            sheets,
            vec![
                ("3".to_string(), "rId1".to_string()),
                ("4".to_string(), "rId2".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_rels() {
        let xml = br#"<Relationships>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;
        let rels = StyleCatalog::parse_rels(xml).unwrap();
        assert_eq!(
            rels.get("rId1").map(String::as_str),
            Some("worksheets/sheet1.xml")
        );
        assert_eq!(rels.get("rId2").map(String::as_str), Some("styles.xml"));
    }

    #[test]
    fn test_parse_worksheet_cell_styles() {
        let xml = br#"<worksheet>
  <sheetData>
    <row r="4"><c r="J4" s="1" t="s"><v>0</v></c><c r="K4"><v>1</v></c></row>
    <row r="5"><c r="J5" s="1"/></row>
  </sheetData>
</worksheet>"#;
        let styles = StyleCatalog::parse_worksheet(xml).unwrap();

        assert_eq!(styles.get(&CellCoord::new(3, 9)), Some(&1));
        // スタイルのみの空セルも収集される
        assert_eq!(styles.get(&CellCoord::new(4, 9)), Some(&1));
        // s属性のないセルは対象外
        assert_eq!(styles.get(&CellCoord::new(3, 10)), None);
    }

    #[test]
    fn test_fill_color_resolution_chain() {
        // ワークシートのスタイルインデックス → cellXfs → fills の解決を検証
        let mut cells = HashMap::new();
        cells.insert(CellCoord::new(3, 9), 1u32); // xf 1 → fill 2 → colored
        cells.insert(CellCoord::new(4, 9), 0u32); // xf 0 → fill 0 → none
        cells.insert(CellCoord::new(5, 9), 9u32); // 範囲外のxf

        let mut sheet_cell_styles = HashMap::new();
        sheet_cell_styles.insert("3".to_string(), cells);

        let catalog = StyleCatalog {
            fill_colored: vec![false, false, true],
            xf_fill_ids: vec![0, 2],
            sheet_cell_styles,
        };

        assert!(catalog.has_fill_color("3", CellCoord::new(3, 9)));
        assert!(!catalog.has_fill_color("3", CellCoord::new(4, 9)));
        assert!(!catalog.has_fill_color("3", CellCoord::new(5, 9)));
        // 未知のセル・未知のシート
        assert!(!catalog.has_fill_color("3", CellCoord::new(6, 9)));
        assert!(!catalog.has_fill_color("4", CellCoord::new(3, 9)));

        let mut styled = catalog.styled_cells("3");
        styled.sort_by_key(|coord| (coord.row, coord.col));
        assert_eq!(styled, vec![CellCoord::new(3, 9)]);
    }

    #[test]
    fn test_normalize_part_path() {
        assert_eq!(
            normalize_part_path("worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            normalize_part_path("/xl/worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
    }
}
