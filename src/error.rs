//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlshiftクレート全体で使用するエラー型
///
/// Excelファイルの読み込み、スタイル解析、シフト抽出、JSON出力の各処理で
/// 発生するエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み・書き込み失敗など）
/// - `Parse`: Excelファイルの解析中に発生したエラー（calamine由来）
/// - `Zip`: XLSXファイル（ZIPアーカイブ）の解析エラー
/// - `Config`: 設定や入力の検証に失敗したエラー（無効なアンカーセル指定など）
/// - `SecurityViolation`: ZIP bombなどのセキュリティ制限違反
///
/// # 使用例
///
/// ```rust,no_run
/// use xlshift::XlShiftError;
/// use std::fs::File;
///
/// fn open_schedule(path: &str) -> Result<(), XlShiftError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlShiftError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー
    ///
    /// calamineクレートがワークブックを解析する際に発生したエラーです。
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// UTF-8文字列の変換エラー
    ///
    /// XML解析時にUTF-8文字列への変換に失敗した場合に発生します。
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// ZIPアーカイブの解析エラー
    ///
    /// XLSXファイル（ZIPアーカイブ）の解析中に発生したエラーです。
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 数値の解析エラー
    ///
    /// XML属性の文字列から数値への変換に失敗した場合に発生します。
    #[error("Number parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// 設定や入力の検証に失敗したエラー
    ///
    /// `ExtractorBuilder::build()`時のアンカーセル検証、XLSX以外の形式の入力、
    /// 年を含まないファイル名などで発生します。
    ///
    /// # 例
    ///
    /// ```rust
    /// use xlshift::{ExtractorBuilder, XlShiftError};
    ///
    /// let result = ExtractorBuilder::new()
    ///     .with_anchor("not-a-cell")
    ///     .build();
    ///
    /// assert!(matches!(result, Err(XlShiftError::Config(_))));
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb攻撃、パストラバーサル攻撃、ファイルサイズ制限などの
    /// セキュリティ制限に違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    // Ioエラーのテスト
    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: XlShiftError = io_err.into();

        match error {
            XlShiftError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        let error: XlShiftError = io_err.into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("Permission denied"));
    }

    // Parseエラーのテスト
    #[test]
    fn test_parse_error() {
        let parse_err = calamine::Error::Msg("Invalid file format");
        let error: XlShiftError = parse_err.into();

        match error {
            XlShiftError::Parse(e) => match e {
                calamine::Error::Msg(msg) => {
                    assert_eq!(msg, "Invalid file format");
                }
                _ => panic!("Expected Msg variant"),
            },
            _ => panic!("Expected Parse error"),
        }
    }

    // Configエラーのテスト
    #[test]
    fn test_config_error_display() {
        let error = XlShiftError::Config("Invalid anchor cell reference: '3J'".to_string());
        let error_msg = error.to_string();

        assert!(error_msg.contains("Configuration error"));
        assert!(error_msg.contains("3J"));
    }

    // エラー変換のテスト（?演算子の動作確認）
    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), XlShiftError> {
            let _file = std::fs::File::open("nonexistent_file.xlsx")?;
            Ok(())
        }

        let result = io_operation();
        assert!(result.is_err());

        match result {
            Err(XlShiftError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    // エラーメッセージのフォーマット確認
    #[test]
    fn test_all_error_formats() {
        // Io
        let io_err: XlShiftError = io::Error::other("test io").into();
        assert!(io_err.to_string().starts_with("IO error"));

        // Parse
        let parse_err: XlShiftError = calamine::Error::Msg("test parse").into();
        assert!(parse_err
            .to_string()
            .starts_with("Failed to parse Excel file"));

        // Zip
        let zip_err = XlShiftError::Zip("bad archive".to_string());
        assert!(zip_err.to_string().starts_with("ZIP archive error"));

        // SecurityViolation
        let sec_err = XlShiftError::SecurityViolation("too many files".to_string());
        assert!(sec_err.to_string().starts_with("Security violation"));
    }
}
