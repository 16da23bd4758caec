//! Sitemap document building and XML serialization
//!
//! The builder collects records for the whole crawl and is consumed by
//! [`SitemapBuilder::serialize`], so a document can only be written once.

use crate::output::record::{RecordParams, SitemapRecord};
use crate::output::{OutputError, OutputResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Namespace of the sitemaps.org protocol
pub const SITEMAPS_ORG_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Value of the `name` attribute on `<url>` elements that could not be fetched
pub const INVALID_MARKER: &str = "Invalid Website";

/// Which value is written to the `xmlns` attribute of `<urlset>`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum NamespaceStyle {
    /// The homepage URL; the historical output format of this tool
    #[default]
    #[serde(rename = "homepage")]
    Homepage,

    /// The sitemaps.org protocol namespace, for search engine submission
    #[serde(rename = "sitemaps-org")]
    SitemapsOrg,
}

impl NamespaceStyle {
    /// Resolves the namespace for a given homepage
    pub fn resolve(&self, homepage: &str) -> String {
        match self {
            Self::Homepage => homepage.to_string(),
            Self::SitemapsOrg => SITEMAPS_ORG_NAMESPACE.to_string(),
        }
    }
}

/// Accumulates sitemap records during a crawl
#[derive(Debug)]
pub struct SitemapBuilder {
    namespace: String,
    path: PathBuf,
    records: Vec<SitemapRecord>,
}

impl SitemapBuilder {
    /// Creates an empty builder
    ///
    /// # Arguments
    ///
    /// * `homepage` - Written as the `xmlns` attribute of `<urlset>`
    /// * `file_name` - Base name of the output file; `.xml` is appended
    pub fn new(homepage: &str, file_name: &str) -> Self {
        Self {
            namespace: homepage.to_string(),
            path: PathBuf::from(format!("{}.xml", file_name)),
            records: Vec::new(),
        }
    }

    /// Replaces the root namespace using the given style
    pub fn with_namespace(mut self, style: NamespaceStyle, homepage: &str) -> Self {
        self.namespace = style.resolve(homepage);
        self
    }

    /// Places the output file inside `directory`
    pub fn in_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.path = directory.as_ref().join(&self.path);
        self
    }

    /// Builds a record from `params` and appends it
    ///
    /// Nothing is appended when the parameters are rejected.
    pub fn add_url(&mut self, params: RecordParams, valid: bool) -> OutputResult<()> {
        let record = SitemapRecord::from_params(params, valid)?;
        self.add_record(record);
        Ok(())
    }

    /// Appends an already validated record
    pub fn add_record(&mut self, record: SitemapRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SitemapRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Path the document will be written to
    pub fn output_path(&self) -> &Path {
        &self.path
    }

    /// Finishes the document without writing it anywhere
    pub fn into_document(self) -> SitemapDocument {
        SitemapDocument {
            namespace: self.namespace,
            path: self.path,
            records: self.records,
        }
    }

    /// Writes the document to its output path and returns it
    ///
    /// Parent directories are created as needed.
    pub fn serialize(self) -> OutputResult<SitemapDocument> {
        let document = self.into_document();

        if let Some(parent) = document.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&document.path)?;
        let mut out = BufWriter::new(file);
        document.write_xml(&mut out)?;
        out.flush()?;

        tracing::info!(
            "Wrote sitemap with {} records to {}",
            document.len(),
            document.path.display()
        );

        Ok(document)
    }
}

/// A finished, immutable sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapDocument {
    namespace: String,
    path: PathBuf,
    records: Vec<SitemapRecord>,
}

impl SitemapDocument {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[SitemapRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up the record for a location
    pub fn get(&self, location: &str) -> Option<&SitemapRecord> {
        self.records.iter().find(|r| r.location() == location)
    }

    /// Renders the document as an XML string
    pub fn to_xml_string(&self) -> OutputResult<String> {
        let mut buffer = Vec::new();
        self.write_xml(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| OutputError::Write(e.to_string()))
    }

    /// Writes the document as XML into `out`
    ///
    /// ```text
    /// <?xml version="1.0" encoding="UTF-8"?>
    /// <urlset xmlns="https://example.com">
    ///   <url>
    ///     <loc>https://example.com</loc>
    ///     <changefreq>daily</changefreq>
    ///   </url>
    ///   <url name="Invalid Website">
    ///     <loc>https://example.com/missing</loc>
    ///     <changefreq>never</changefreq>
    ///     <priority>0.0</priority>
    ///   </url>
    /// </urlset>
    /// ```
    pub fn write_xml<W: Write>(&self, out: W) -> OutputResult<()> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);

        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;

        let mut urlset = BytesStart::new("urlset");
        urlset.push_attribute(("xmlns", self.namespace.as_str()));
        emit(&mut writer, Event::Start(urlset))?;

        for record in &self.records {
            let mut url = BytesStart::new("url");
            if !record.is_valid() {
                url.push_attribute(("name", INVALID_MARKER));
            }
            emit(&mut writer, Event::Start(url))?;

            write_text_element(&mut writer, "loc", record.location())?;
            write_text_element(&mut writer, "changefreq", record.change_frequency().as_str())?;
            if let Some(priority) = record.priority() {
                write_text_element(&mut writer, "priority", priority)?;
            }

            emit(&mut writer, Event::End(BytesEnd::new("url")))?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("urlset")))?;
        writer.into_inner().flush()?;
        Ok(())
    }
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> OutputResult<()> {
    emit(writer, Event::Start(BytesStart::new(tag)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> OutputResult<()> {
    writer
        .write_event(event)
        .map_err(|e| OutputError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::record::{ChangeFrequency, UNREACHABLE_PRIORITY};
    use tempfile::TempDir;

    const HOMEPAGE: &str = "https://example.com";

    fn populated_builder() -> SitemapBuilder {
        let mut builder = SitemapBuilder::new(HOMEPAGE, "sitemap");
        builder.add_url(RecordParams::at(HOMEPAGE), true).unwrap();
        builder
            .add_url(
                RecordParams::at("https://example.com/report.pdf")
                    .change_frequency(ChangeFrequency::Never)
                    .priority("0.8"),
                true,
            )
            .unwrap();
        builder
            .add_url(
                RecordParams::at("https://example.com/missing")
                    .change_frequency(ChangeFrequency::Never)
                    .priority(UNREACHABLE_PRIORITY),
                false,
            )
            .unwrap();
        builder
    }

    #[test]
    fn test_default_output_path() {
        let builder = SitemapBuilder::new(HOMEPAGE, "sitemap");
        assert_eq!(builder.output_path(), Path::new("sitemap.xml"));
    }

    #[test]
    fn test_rejected_record_not_appended() {
        let mut builder = SitemapBuilder::new(HOMEPAGE, "sitemap");
        let result = builder.add_url(RecordParams::default(), true);
        assert!(matches!(result, Err(OutputError::MissingLocation)));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_records_keep_insertion_order() {
        let builder = populated_builder();
        let locations: Vec<_> = builder.records().iter().map(|r| r.location()).collect();
        assert_eq!(
            locations,
            vec![
                "https://example.com",
                "https://example.com/report.pdf",
                "https://example.com/missing"
            ]
        );
    }

    #[test]
    fn test_xml_structure() {
        let xml = populated_builder().into_document().to_xml_string().unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="https://example.com">"#));
        assert!(xml.contains("<loc>https://example.com/report.pdf</loc>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert!(xml.contains(r#"<url name="Invalid Website">"#));
        assert!(xml.contains("<priority>0.0</priority>"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_priority_omitted_when_unset() {
        let mut builder = SitemapBuilder::new(HOMEPAGE, "sitemap");
        builder.add_url(RecordParams::at(HOMEPAGE), true).unwrap();
        let xml = builder.into_document().to_xml_string().unwrap();
        assert!(!xml.contains("<priority>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut builder = SitemapBuilder::new(HOMEPAGE, "sitemap");
        builder
            .add_url(RecordParams::at("https://example.com/search?a=1&b=2"), true)
            .unwrap();
        let xml = builder.into_document().to_xml_string().unwrap();
        assert!(xml.contains("<loc>https://example.com/search?a=1&amp;b=2</loc>"));
    }

    #[test]
    fn test_sitemaps_org_namespace() {
        let builder = SitemapBuilder::new(HOMEPAGE, "sitemap")
            .with_namespace(NamespaceStyle::SitemapsOrg, HOMEPAGE);
        let document = builder.into_document();
        assert_eq!(document.namespace(), SITEMAPS_ORG_NAMESPACE);
    }

    #[test]
    fn test_serialize_writes_file() {
        let dir = TempDir::new().unwrap();
        let builder = populated_builder().in_directory(dir.path().join("out"));
        let document = builder.serialize().unwrap();

        assert_eq!(document.path(), dir.path().join("out").join("sitemap.xml"));
        let written = std::fs::read_to_string(document.path()).unwrap();
        assert_eq!(written, document.to_xml_string().unwrap());
        assert_eq!(document.len(), 3);
    }

    #[test]
    fn test_serialize_empty_document() {
        let dir = TempDir::new().unwrap();
        let document = SitemapBuilder::new(HOMEPAGE, "empty")
            .in_directory(dir.path())
            .serialize()
            .unwrap();
        assert!(document.is_empty());
        let written = std::fs::read_to_string(document.path()).unwrap();
        assert!(written.contains("urlset"));
    }

    #[test]
    fn test_document_lookup() {
        let document = populated_builder().into_document();
        let missing = document.get("https://example.com/missing").unwrap();
        assert!(!missing.is_valid());
        assert!(document.get("https://example.com/nowhere").is_none());
    }
}
