/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// 只覆盖作业提交允许的文档类型，其它扩展名一律拒绝。
///
/// # Arguments
/// * `data` - 文件内容的开头部分
/// * `extension` - 文件扩展名（包含点号，如 ".pdf"）
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".pdf" => data.starts_with(b"%PDF"),
        // MS Office 旧格式 (OLE Compound Document)
        ".doc" => data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
        // OOXML 与 ODF 都是 ZIP 容器
        ".docx" | ".odt" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
        // 纯文本不应包含 NUL 字节
        ".txt" => !data.contains(&0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        let pdf_header = b"%PDF-1.4";
        assert!(validate_magic_bytes(pdf_header, ".pdf"));
        assert!(validate_magic_bytes(pdf_header, ".PDF"));
        assert!(!validate_magic_bytes(pdf_header, ".doc"));
    }

    #[test]
    fn test_office_magic() {
        let ole = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00];
        assert!(validate_magic_bytes(&ole, ".doc"));
        assert!(!validate_magic_bytes(&ole, ".docx"));

        let zip = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip, ".docx"));
        assert!(validate_magic_bytes(&zip, ".odt"));
        assert!(!validate_magic_bytes(&zip, ".pdf"));
    }

    #[test]
    fn test_text_files() {
        assert!(validate_magic_bytes(b"Hello, World!", ".txt"));
        assert!(!validate_magic_bytes(b"bin\0ary", ".txt"));
    }

    #[test]
    fn test_empty_data() {
        assert!(!validate_magic_bytes(&[], ".pdf"));
        assert!(!validate_magic_bytes(&[], ".txt"));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
        assert!(!validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04], ".zip"));
    }
}
