//! 结业证书 PDF 生成
//!
//! 生成单页 PDF 1.4 文档，不嵌入任何字体文件。
//! 西文使用 Helvetica（WinAnsiEncoding），其余文字使用 Adobe 预置的
//! STSong-Light CID 字体，由阅读器提供字形。

use chrono::{DateTime, Utc};

/// 证书内容
#[derive(Debug, Clone)]
pub struct CertificateData {
    pub student_name: String,
    pub course_name: String,
    pub completed_at: DateTime<Utc>,
    pub issuer: String,
}

// A4 横向
const PAGE_WIDTH: f64 = 842.0;
const PAGE_HEIGHT: f64 = 595.0;

const CJK_FONT: &str = "F3";

pub fn render_certificate_pdf(data: &CertificateData) -> Vec<u8> {
    let content = build_content_stream(data);

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 5 0 R /F2 6 0 R /{CJK_FONT} 7 0 R >> >> /Contents 4 0 R >>"
        ),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len() + 1,
            content
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type0 /BaseFont /STSong-Light /Encoding /UniGB-UCS2-H \
         /DescendantFonts [8 0 R] >>"
            .to_string(),
        "<< /Type /Font /Subtype /CIDFontType0 /BaseFont /STSong-Light \
         /CIDSystemInfo << /Registry (Adobe) /Ordering (GB1) /Supplement 2 >> \
         /FontDescriptor 9 0 R /DW 1000 /W [1 95 500 814 939 500] >>"
            .to_string(),
        "<< /Type /FontDescriptor /FontName /STSong-Light /Flags 6 \
         /FontBBox [-25 -254 1000 880] /ItalicAngle 0 /Ascent 880 /Descent -120 \
         /CapHeight 880 /StemV 93 >>"
            .to_string(),
    ];

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );

    out
}

fn build_content_stream(data: &CertificateData) -> String {
    let date = data.completed_at.format("%Y-%m-%d").to_string();
    let lines: [(&str, f64, f64, String); 6] = [
        ("F2", 36.0, 430.0, "Certificate of Completion".to_string()),
        ("F1", 16.0, 370.0, "This certifies that".to_string()),
        ("F2", 28.0, 320.0, data.student_name.clone()),
        ("F1", 16.0, 270.0, "has successfully completed the course".to_string()),
        ("F2", 22.0, 225.0, data.course_name.clone()),
        ("F1", 12.0, 140.0, format!("Issued by {} on {}", data.issuer, date)),
    ];

    let mut stream = String::new();
    // 边框
    stream.push_str("2 w 36 36 770 523 re S\n");
    for (font, size, y, text) in lines {
        let encoded = encode_text(&text);
        let font = if encoded.cjk { CJK_FONT } else { font };
        let x = ((PAGE_WIDTH - encoded.em_width * size) / 2.0).max(48.0);
        stream.push_str(&format!(
            "BT /{font} {size} Tf {x:.1} {y:.1} Td {} Tj ET\n",
            encoded.operand
        ));
    }
    stream.truncate(stream.trim_end().len());
    stream
}

/// 编码后的文本操作数
#[derive(Debug, PartialEq)]
struct EncodedText {
    /// 字面量 `(...)` 或十六进制 `<...>` 字符串
    operand: String,
    /// 需要使用 CID 字体
    cjk: bool,
    /// 以字号为单位的估算宽度
    em_width: f64,
}

fn encode_text(text: &str) -> EncodedText {
    let chars: Vec<char> = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    let latin: Option<Vec<u8>> = chars.iter().map(|&c| winansi_byte(c)).collect();
    match latin {
        Some(bytes) => EncodedText {
            em_width: bytes.len() as f64 * 0.5,
            operand: literal_string(&bytes),
            cjk: false,
        },
        None => {
            let mut operand = String::from("<");
            let mut em_width = 0.0;
            for c in chars {
                // UCS-2 编码表只覆盖基本多文种平面
                let code = if c.len_utf16() == 1 { c as u32 } else { '?' as u32 };
                operand.push_str(&format!("{code:04X}"));
                em_width += if c.is_ascii() { 0.5 } else { 1.0 };
            }
            operand.push('>');
            EncodedText {
                operand,
                cjk: true,
                em_width,
            }
        }
    }
}

/// WinAnsiEncoding 下的单字节编码
fn winansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        ' '..='~' | '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => return None,
    };
    Some(byte)
}

/// 转义 `\`、`(`、`)`，非 ASCII 字节写成八进制转义
fn literal_string(bytes: &[u8]) -> String {
    let mut escaped = String::with_capacity(bytes.len() + 2);
    escaped.push('(');
    for &b in bytes {
        match b {
            b'\\' | b'(' | b')' => {
                escaped.push('\\');
                escaped.push(b as char);
            }
            0x20..=0x7E => escaped.push(b as char),
            _ => escaped.push_str(&format!("\\{b:03o}")),
        }
    }
    escaped.push(')');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CertificateData {
        CertificateData {
            student_name: "Ada (Lovelace)".to_string(),
            course_name: "Rust 101".to_string(),
            completed_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            issuer: "LearnHub".to_string(),
        }
    }

    #[test]
    fn test_pdf_header_and_trailer() {
        let pdf = render_certificate_pdf(&sample());
        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(pdf.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_xref_offsets_point_to_objects() {
        let pdf = render_certificate_pdf(&sample());
        let text = String::from_utf8(pdf.clone()).unwrap();

        let startxref = text.rfind("startxref\n").unwrap();
        let xref_offset: usize = text[startxref + 10..]
            .lines()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!(text[xref_offset..].starts_with("xref\n0 10\n"));

        let entries: Vec<&str> = text[xref_offset..].lines().skip(3).take(9).collect();
        assert_eq!(entries.len(), 9);
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(text[offset..].starts_with(&expected), "object {}", i + 1);
        }
    }

    #[test]
    fn test_stream_length_matches() {
        let pdf = render_certificate_pdf(&sample());
        let text = String::from_utf8(pdf).unwrap();
        let length_pos = text.find("/Length ").unwrap() + 8;
        let length: usize = text[length_pos..]
            .split_whitespace()
            .next()
            .unwrap()
            .trim_end_matches(">>")
            .parse()
            .unwrap();
        let start = text.find("stream\n").unwrap() + 7;
        let end = text.find("endstream").unwrap();
        assert_eq!(end - start, length);
    }

    #[test]
    fn test_text_is_escaped() {
        let pdf = render_certificate_pdf(&sample());
        let text = String::from_utf8(pdf).unwrap();
        assert!(text.contains("(Ada \\(Lovelace\\))"));
        assert!(text.contains("Issued by LearnHub on 2023-11-14"));
        assert!(!text.contains("/F3 28 Tf"));
    }

    #[test]
    fn test_latin1_uses_winansi_escapes() {
        let encoded = encode_text("José Müller");
        assert!(!encoded.cjk);
        assert_eq!(encoded.operand, "(Jos\\351 M\\374ller)");
        assert_eq!(encode_text("a\\b").operand, "(a\\\\b)");
    }

    #[test]
    fn test_chinese_names_use_cid_font() {
        let data = CertificateData {
            student_name: "张伟".to_string(),
            course_name: "Rust 入门".to_string(),
            ..sample()
        };
        let pdf = render_certificate_pdf(&data);
        let text = String::from_utf8(pdf).unwrap();

        assert!(text.contains("/BaseFont /STSong-Light /Encoding /UniGB-UCS2-H"));
        assert!(text.contains("<5F204F1F> Tj"));
        assert!(text.contains("<00520075007300740020516595E8> Tj"));
        assert!(text.contains("BT /F3 28 Tf"));
        assert!(text.contains("BT /F3 22 Tf"));
        assert!(!text.contains("??"));
    }

    #[test]
    fn test_cjk_width_counts_full_width_glyphs() {
        let encoded = encode_text("Rust 入门");
        assert!(encoded.cjk);
        assert_eq!(encoded.em_width, 4.5);
    }
}
