use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture paths
pub struct TestFixtures {
    pub fixtures_dir: PathBuf,
}

impl TestFixtures {
    pub fn new() -> Self {
        let fixtures_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures");

        Self { fixtures_dir }
    }

    pub fn xml_dir(&self) -> PathBuf {
        self.fixtures_dir.join("xml")
    }

    pub fn xml(&self, name: &str) -> PathBuf {
        self.xml_dir().join(name)
    }

    pub fn standard_xml(&self) -> PathBuf {
        self.xml("standard.xml")
    }

    pub fn malformed_xml(&self) -> PathBuf {
        self.xml("malformed.xml")
    }
}

/// Two-record document used across encoding tests.
pub const STANDARD_BODY: &str = r#"<root>
  <application-reference>
    <document-id load-source="docdb"><doc-number>999000888</doc-number></document-id>
    <document-id load-source="patent-office"><doc-number>66667777</doc-number></document-id>
  </application-reference>
</root>"#;

/// Build a document with one `application-reference` holding the given
/// `(load-source, doc-number)` pairs.
pub fn patent_xml(ids: &[(Option<&str>, &str)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<root>\n  <application-reference>\n");
    for (load_source, number) in ids {
        match load_source {
            Some(source) => xml.push_str(&format!(
                "    <document-id load-source=\"{}\"><doc-number>{}</doc-number></document-id>\n",
                source, number
            )),
            None => xml.push_str(&format!(
                "    <document-id><doc-number>{}</doc-number></document-id>\n",
                number
            )),
        }
    }
    xml.push_str("  </application-reference>\n</root>\n");
    xml
}

pub fn utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

pub fn utf16be_without_bom(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect()
}

/// Encode `text` as ISO-8859-1. Panics on characters outside U+0000..=U+00FF.
pub fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).expect("character outside latin-1"))
        .collect()
}

/// Write `contents` into a fresh temporary directory and return both.
pub fn write_temp_file(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
