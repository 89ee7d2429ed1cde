use crate::error::ExtractionError;
use crate::extractor::PageCounter;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const PACKAGE_RELS_PART: &str = "_rels/.rels";
const DEFAULT_EXTENDED_PROPERTIES_PART: &str = "docProps/app.xml";
const EXTENDED_PROPERTIES_REL_SUFFIX: &str = "/extended-properties";

/// Reads the `Pages` value from the package's extended properties.
///
/// The count is whatever the authoring application last stored; the
/// document body is never paginated here.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxPageCounter;

impl PageCounter for DocxPageCounter {
    fn count_pages(&self, path: &Path) -> Result<u64, ExtractionError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        if !archive.file_names().any(|name| name == CONTENT_TYPES_PART) {
            return Err(ExtractionError::MissingPart {
                part: CONTENT_TYPES_PART.to_string(),
            });
        }

        let properties_part = match read_part(&mut archive, PACKAGE_RELS_PART) {
            Ok(rels) => extended_properties_target(&rels)?,
            Err(ExtractionError::MissingPart { .. }) => None,
            Err(e) => return Err(e),
        }
        .unwrap_or_else(|| DEFAULT_EXTENDED_PROPERTIES_PART.to_string());

        let properties = read_part(&mut archive, &properties_part)?;
        parse_page_count(&properties)
    }
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, ExtractionError> {
    let mut part = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => ExtractionError::MissingPart {
            part: name.to_string(),
        },
        other => other.into(),
    })?;

    let mut content = String::new();
    part.read_to_string(&mut content)?;
    Ok(content)
}

/// Target of the extended-properties relationship in `_rels/.rels`.
fn extended_properties_target(rels: &str) -> Result<Option<String>, ExtractionError> {
    let mut reader = Reader::from_str(rels);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut rel_type = None;
                let mut target = None;

                for attr in e.attributes() {
                    let attr = attr.map_err(xml_error)?;
                    let value = attr.unescape_value().map_err(xml_error)?.into_owned();
                    match attr.key.local_name().as_ref() {
                        b"Type" => rel_type = Some(value),
                        b"Target" => target = Some(value),
                        _ => {}
                    }
                }

                if rel_type.is_some_and(|t| t.ends_with(EXTENDED_PROPERTIES_REL_SUFFIX)) {
                    return Ok(target.map(|t| t.trim_start_matches('/').to_string()));
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn parse_page_count(properties: &str) -> Result<u64, ExtractionError> {
    let mut reader = Reader::from_str(properties);
    reader.config_mut().trim_text(true);

    let mut in_pages = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"Pages" => in_pages = true,
            Event::Text(text) if in_pages => {
                let value = text.unescape().map_err(xml_error)?;
                let value = value.trim();
                return value
                    .parse::<u64>()
                    .map_err(|_| ExtractionError::InvalidPageCount {
                        value: value.to_string(),
                    });
            }
            Event::Empty(e) if e.local_name().as_ref() == b"Pages" => {
                return Err(ExtractionError::MissingPageCount)
            }
            Event::End(e) if e.local_name().as_ref() == b"Pages" => {
                return Err(ExtractionError::MissingPageCount)
            }
            Event::Eof => return Err(ExtractionError::MissingPageCount),
            _ => {}
        }
    }
}

fn xml_error(error: impl Display) -> ExtractionError {
    ExtractionError::Xml {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_properties_xml, write_docx, write_package};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_counts_pages() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("five.docx");
        write_docx(&path, Some(5));

        assert_eq!(DocxPageCounter.count_pages(&path).unwrap(), 5);
    }

    #[test]
    fn test_missing_pages_property() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nopages.docx");
        write_docx(&path, None);

        assert!(matches!(
            DocxPageCounter.count_pages(&path),
            Err(ExtractionError::MissingPageCount)
        ));
    }

    #[test]
    fn test_not_a_zip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.docx");
        fs::write(&path, b"just some text").unwrap();

        assert!(DocxPageCounter.count_pages(&path).is_err());
    }

    #[test]
    fn test_zip_without_content_types_is_not_ooxml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("other.docx");
        write_package(&path, &[("docProps/app.xml", &app_properties_xml(Some(2)))]);

        assert!(matches!(
            DocxPageCounter.count_pages(&path),
            Err(ExtractionError::MissingPart { .. })
        ));
    }

    #[test]
    fn test_relationship_target_is_followed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.docx");
        let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="/meta/extended.xml"/>
</Relationships>"#;
        write_package(
            &path,
            &[
                ("[Content_Types].xml", "<Types/>"),
                ("_rels/.rels", rels),
                ("meta/extended.xml", &app_properties_xml(Some(12))),
            ],
        );

        assert_eq!(DocxPageCounter.count_pages(&path).unwrap(), 12);
    }

    #[test]
    fn test_falls_back_to_default_properties_part() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("norels.docx");
        write_package(
            &path,
            &[
                ("[Content_Types].xml", "<Types/>"),
                ("docProps/app.xml", &app_properties_xml(Some(4))),
            ],
        );

        assert_eq!(DocxPageCounter.count_pages(&path).unwrap(), 4);
    }

    #[test]
    fn test_parse_page_count() {
        assert_eq!(parse_page_count(&app_properties_xml(Some(9))).unwrap(), 9);
        assert_eq!(
            parse_page_count("<Properties><Pages> 14 </Pages></Properties>").unwrap(),
            14
        );
        assert!(matches!(
            parse_page_count("<Properties><Pages/></Properties>"),
            Err(ExtractionError::MissingPageCount)
        ));
        assert!(matches!(
            parse_page_count("<Properties><Pages>-3</Pages></Properties>"),
            Err(ExtractionError::InvalidPageCount { .. })
        ));
        assert!(matches!(
            parse_page_count("<Properties><Words>200</Words></Properties>"),
            Err(ExtractionError::MissingPageCount)
        ));
    }
}
