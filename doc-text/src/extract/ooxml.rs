//! Shared helpers for the zip-of-XML containers used by DOCX and PPTX.

use quick_xml::events::BytesStart;
use std::io::{Cursor, Read};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{DocError, Result};
use crate::format::DocumentFormat;

/// An opened OOXML package.
pub struct Package<'a> {
    format: DocumentFormat,
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> Package<'a> {
    pub fn open(format: DocumentFormat, content: &'a [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(content))
            .map_err(|e| DocError::processing(format, e))?;
        Ok(Self { format, archive })
    }

    /// Read a part that must exist.
    pub fn read_part(&mut self, name: &str) -> Result<String> {
        self.read_optional_part(name)?.ok_or_else(|| {
            DocError::processing(self.format, format!("missing package part {}", name))
        })
    }

    /// Read a part, returning `None` if the package does not contain it.
    pub fn read_optional_part(&mut self, name: &str) -> Result<Option<String>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(DocError::processing(self.format, e)),
        };

        let mut xml = String::new();
        file.read_to_string(&mut xml)
            .map_err(|e| DocError::processing(self.format, e))?;
        Ok(Some(xml))
    }

    /// Names of all parts in the package.
    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }
}

/// Value of the attribute whose local name is `key`, ignoring its prefix.
pub fn attribute(
    element: &BytesStart<'_>,
    key: &[u8],
    format: DocumentFormat,
) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| DocError::processing(format, e))?;
        if attr.key.local_name().as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| DocError::processing(format, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
