use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

/// Indexable is anything that can describe itself as a document to submit:
/// a body, the URI it is stored under, and optionally its MIME type.
pub trait Indexable {
    fn content(&self) -> Cow<'_, [u8]>;
    fn uri(&self) -> &str;
    fn mime_type(&self) -> Option<&str>;
}

/// Doc is a document assembled in memory.
///
/// If explicit content is set it is submitted verbatim. Otherwise, when named
/// fields are present, the body is rendered as a flat XML document and the
/// MIME type defaults to `application/xml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Doc {
    pub uri: String,
    pub content: Option<Vec<u8>>,
    pub mime_type: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub mtime: Option<DateTime<Utc>>,
    pub size: Option<u64>,
    pub fields: BTreeMap<String, Vec<String>>,
}

const XML_CONTENT_TYPE: &str = "application/xml";

impl Doc {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Read a file from disk. The path doubles as the document URI.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let metadata = std::fs::metadata(path)?;
        let mtime = metadata.modified().ok().map(DateTime::<Utc>::from);

        Ok(Self {
            uri: path.to_string_lossy().into_owned(),
            size: Some(content.len() as u64),
            content: Some(content),
            mtime,
            ..Default::default()
        })
    }

    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Append a value to a named field. Repeated calls build a multi-value field.
    pub fn add_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.entry(name.into()).or_default().push(value.into());
        self
    }

    fn renders_xml(&self) -> bool {
        self.content.is_none() && !self.fields.is_empty()
    }

    /// Render title, summary, mtime and the named fields as `<doc>` XML
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<doc>");
        if let Some(title) = &self.title {
            push_element(&mut xml, "title", title);
        }
        if let Some(summary) = &self.summary {
            push_element(&mut xml, "summary", summary);
        }
        if let Some(mtime) = &self.mtime {
            push_element(&mut xml, "mtime", &mtime.timestamp().to_string());
        }
        for (name, values) in &self.fields {
            for value in values {
                push_element(&mut xml, name, value);
            }
        }
        xml.push_str("</doc>");
        xml
    }
}

/// Make a field name usable as an XML tag: characters outside
/// `[alnum _ - .]` become `_`, and a name that cannot start a tag gets a `_` prefix.
pub fn xml_tag_name(name: &str) -> Cow<'_, str> {
    let valid_char = |c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.');
    let valid_start = name
        .chars()
        .next()
        .map(|c| c.is_alphabetic() || c == '_')
        .unwrap_or(false);

    if valid_start && name.chars().all(valid_char) {
        return Cow::Borrowed(name);
    }

    let mut tag = String::with_capacity(name.len() + 1);
    if !valid_start {
        tag.push('_');
    }
    tag.extend(name.chars().map(|c| if valid_char(c) { c } else { '_' }));
    Cow::Owned(tag)
}

fn push_element(xml: &mut String, name: &str, text: &str) {
    let name = xml_tag_name(name);
    let name = name.as_ref();
    xml.push('<');
    xml.push_str(name);
    xml.push('>');
    xml.push_str(&quick_xml::escape::escape(text));
    xml.push_str("</");
    xml.push_str(name);
    xml.push('>');
}

impl Indexable for Doc {
    fn content(&self) -> Cow<'_, [u8]> {
        match &self.content {
            Some(bytes) => Cow::Borrowed(bytes.as_slice()),
            None if self.renders_xml() => Cow::Owned(self.to_xml().into_bytes()),
            None => Cow::Borrowed(&[]),
        }
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn mime_type(&self) -> Option<&str> {
        match &self.mime_type {
            Some(mime) => Some(mime.as_str()),
            None if self.renders_xml() => Some(XML_CONTENT_TYPE),
            None => None,
        }
    }
}
