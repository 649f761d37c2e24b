//! Thin builder over `quick_xml::Writer` for generating package parts.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use slidecast_core::{Error, Result};

pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// Builds one XML document in memory.
pub(crate) struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// Start a document with the standard `standalone="yes"` declaration.
    pub(crate) fn new() -> Result<Self> {
        let mut builder = Self {
            writer: Writer::new(Vec::new()),
        };
        builder.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(builder)
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::XmlError(e.to_string()))
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let mut element = BytesStart::new(name);
        for &attr in attrs {
            element.push_attribute(attr);
        }
        self.event(Event::Start(element))?;
        Ok(self)
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let mut element = BytesStart::new(name);
        for &attr in attrs {
            element.push_attribute(attr);
        }
        self.event(Event::Empty(element))?;
        Ok(self)
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    /// Escaped character data.
    pub(crate) fn text(&mut self, text: &str) -> Result<&mut Self> {
        self.event(Event::Text(BytesText::new(text)))?;
        Ok(self)
    }

    /// `<name attrs>text</name>`.
    pub(crate) fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<&mut Self> {
        self.start(name, attrs)?.text(text)?.end(name)
    }

    /// Pre-escaped markup written verbatim.
    pub(crate) fn raw(&mut self, markup: &str) -> Result<&mut Self> {
        self.event(Event::Text(BytesText::from_escaped(markup)))?;
        Ok(self)
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_escapes_text_and_attributes() {
        let mut xml = XmlBuilder::new().unwrap();
        xml.start("root", &[("name", "a&b")])
            .unwrap()
            .text_element("t", &[], "<x>")
            .unwrap()
            .empty("e", &[])
            .unwrap()
            .end("root")
            .unwrap();

        let out = String::from_utf8(xml.finish()).unwrap();
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(out.contains(r#"<root name="a&amp;b">"#));
        assert!(out.contains("<t>&lt;x&gt;</t>"));
        assert!(out.contains("<e/>"));
    }

    #[test]
    fn test_raw_is_verbatim() {
        let mut xml = XmlBuilder::new().unwrap();
        xml.raw("<a:avLst/>").unwrap();
        let out = String::from_utf8(xml.finish()).unwrap();
        assert!(out.ends_with("<a:avLst/>"));
    }
}
