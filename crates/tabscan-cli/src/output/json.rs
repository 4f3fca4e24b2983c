use std::io::Write;
use tabscan_core::error::TabscanError;
use tabscan_core::model::TableResult;

/// Write `result` as pretty-printed JSON followed by a newline.
pub fn write_result(out: &mut impl Write, result: &TableResult) -> Result<(), TabscanError> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

pub fn print(result: &TableResult) -> Result<(), TabscanError> {
    write_result(&mut std::io::stdout().lock(), result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(result: &TableResult) -> String {
        let mut buf = Vec::new();
        write_result(&mut buf, result).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_not_found_has_null_page() {
        let text = render(&TableResult::not_found());
        assert!(text.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"page": null, "numbers": [], "raw_rows": []})
        );
    }

    #[test]
    fn test_found_keeps_number_strings() {
        let result = TableResult {
            page: Some("/tmp/pages/page_2.png".to_string()),
            numbers: vec!["007".to_string(), "34.2".to_string()],
            raw_rows: vec!["Item 007  34.2".to_string()],
        };
        let value: serde_json::Value = serde_json::from_str(&render(&result)).unwrap();
        assert_eq!(value["page"], "/tmp/pages/page_2.png");
        assert_eq!(value["numbers"], serde_json::json!(["007", "34.2"]));
        assert_eq!(value["raw_rows"][0], "Item 007  34.2");
    }

    #[test]
    fn test_output_is_indented() {
        let text = render(&TableResult::not_found());
        assert!(text.starts_with("{\n  \"page\": null"));
    }
}
