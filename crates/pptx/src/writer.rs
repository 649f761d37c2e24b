//! PPTX package writer.

use crate::{parts, slide};
use slidecast_core::profile::StyleProfile;
use slidecast_core::{Conversion, DocumentMetadata, Error, Result, SlideDescription};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writer for PPTX (Office Open XML) files.
pub struct PptxWriter {
    compression: CompressionMethod,
}

impl PptxWriter {
    /// Create a writer that deflates every part.
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }

    /// Store parts uncompressed.
    pub fn stored(mut self) -> Self {
        self.compression = CompressionMethod::Stored;
        self
    }

    /// Write a presentation with one slide per description.
    ///
    /// Slide size and theme come from `profile`; `metadata` fills the
    /// document properties. Returns the inner writer once the archive is
    /// finished.
    pub fn write<W: Write + Seek>(
        &self,
        writer: W,
        slides: &[SlideDescription],
        profile: &StyleProfile,
        metadata: &DocumentMetadata,
    ) -> Result<W> {
        let mut archive = ZipWriter::new(writer);
        let count = slides.len();

        self.add_part(&mut archive, "[Content_Types].xml", &parts::content_types(count)?)?;
        self.add_part(&mut archive, "_rels/.rels", &parts::root_relationships()?)?;
        self.add_part(&mut archive, "docProps/core.xml", &parts::core_properties(metadata)?)?;
        self.add_part(&mut archive, "docProps/app.xml", &parts::app_properties(count)?)?;
        self.add_part(&mut archive, "ppt/presentation.xml", &parts::presentation(profile, count)?)?;
        self.add_part(
            &mut archive,
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_relationships(count)?,
        )?;
        self.add_part(
            &mut archive,
            "ppt/slideMasters/slideMaster1.xml",
            &parts::slide_master(profile)?,
        )?;
        self.add_part(
            &mut archive,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &parts::master_relationships()?,
        )?;
        self.add_part(&mut archive, "ppt/slideLayouts/slideLayout1.xml", &parts::slide_layout()?)?;
        self.add_part(
            &mut archive,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &parts::layout_relationships()?,
        )?;
        self.add_part(&mut archive, "ppt/theme/theme1.xml", &parts::theme(profile)?)?;

        let slide_rels = parts::slide_relationships()?;
        for (index, description) in slides.iter().enumerate() {
            let number = index + 1;
            self.add_part(
                &mut archive,
                &parts::slide_part_name(number),
                &slide::slide_xml(description)?,
            )?;
            self.add_part(
                &mut archive,
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &slide_rels,
            )?;
        }

        let inner = archive
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;

        log::info!("Wrote presentation with {} slides", count);
        Ok(inner)
    }

    /// Write every slide of a finished conversion.
    pub fn write_conversion<W: Write + Seek>(
        &self,
        writer: W,
        conversion: &Conversion,
        profile: &StyleProfile,
    ) -> Result<W> {
        self.write(writer, &conversion.slides, profile, &conversion.metadata)
    }

    /// Write a conversion to a file, replacing it if it exists.
    pub fn write_to_path(
        &self,
        path: impl AsRef<Path>,
        conversion: &Conversion,
        profile: &StyleProfile,
    ) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut out = self.write_conversion(BufWriter::new(file), conversion, profile)?;
        out.flush()?;
        Ok(())
    }

    fn add_part<W: Write + Seek>(
        &self,
        archive: &mut ZipWriter<W>,
        name: &str,
        content: &[u8],
    ) -> Result<()> {
        let options = FileOptions::default().compression_method(self.compression);
        archive
            .start_file(name, options)
            .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
        archive.write_all(content)?;
        Ok(())
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}
