//! Sheet Grid Module
//!
//! 1枚のシートを疎なセルマップとして表現するモジュール。
//! 各セルは値と背景塗りつぶしの有無を持ち、抽出処理の唯一の入力となります。

use std::collections::HashMap;

use crate::types::{CellCoord, CellValue};

/// 1つのセル（値 + スタイル信号）
#[derive(Debug, Clone, Default)]
pub(crate) struct Cell {
    /// セルの値
    pub value: CellValue,

    /// 背景塗りつぶし色を持つかどうか（名前行スキャンの唯一の信号）
    pub has_fill: bool,
}

/// 1枚のシートの疎グリッド
///
/// セルは存在するもののみ保持します。存在しないセルへの問い合わせは
/// 空値・塗りつぶしなしとして扱われ、エラーにはなりません。
#[derive(Debug, Default)]
pub(crate) struct SheetGrid {
    cells: HashMap<CellCoord, Cell>,
}

impl SheetGrid {
    /// 空のグリッドを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// セルの値を設定
    pub fn set_value(&mut self, coord: CellCoord, value: CellValue) {
        self.cells.entry(coord).or_default().value = value;
    }

    /// セルに背景塗りつぶしの信号を立てる
    ///
    /// 値を持たないセルにも設定できます（塗りつぶしのみの空セル）。
    pub fn set_fill(&mut self, coord: CellCoord) {
        self.cells.entry(coord).or_default().has_fill = true;
    }

    /// セルの値を取得（存在しないセルは`None`）
    pub fn value(&self, coord: CellCoord) -> Option<&CellValue> {
        self.cells.get(&coord).map(|cell| &cell.value)
    }

    /// セルが背景塗りつぶし色を持つかどうか
    pub fn has_fill(&self, coord: CellCoord) -> bool {
        self.cells
            .get(&coord)
            .map(|cell| cell.has_fill)
            .unwrap_or(false)
    }

    /// 保持しているセル数
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }
}
