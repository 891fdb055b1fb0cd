//! Content-type sniffing for response bodies.

use std::fmt;

/// Wire format a response body can be decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyFormat {
    /// `application/json`, `application/problem+json`, ...
    Json,
    /// `application/xml`, `text/xml`, `application/atom+xml`, ...
    Xml,
}

impl BodyFormat {
    /// Picks the decoder for a Content-Type header value.
    ///
    /// Anything mentioning `json` decodes as JSON, otherwise anything
    /// mentioning `xml` decodes as XML. A missing or unrecognized header
    /// yields `None`: there is no decodable content.
    #[must_use]
    pub fn sniff(content_type: Option<&str>) -> Option<Self> {
        let content_type = content_type?.to_ascii_lowercase();
        if content_type.contains("json") {
            Some(Self::Json)
        } else if content_type.contains("xml") {
            Some(Self::Xml)
        } else {
            None
        }
    }

    /// Returns the format name used in failure messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Xml => "XML",
        }
    }
}

impl fmt::Display for BodyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_content_types() {
        assert_eq!(BodyFormat::sniff(Some("application/json")), Some(BodyFormat::Json));
        assert_eq!(
            BodyFormat::sniff(Some("application/problem+json; charset=utf-8")),
            Some(BodyFormat::Json)
        );
    }

    // Pins xml -> XML; an xml header must never reach the JSON decoder.
    #[test]
    fn test_xml_content_types_select_xml_decoder() {
        assert_eq!(BodyFormat::sniff(Some("application/xml")), Some(BodyFormat::Xml));
        assert_eq!(BodyFormat::sniff(Some("text/xml; charset=utf-8")), Some(BodyFormat::Xml));
        assert_eq!(BodyFormat::sniff(Some("Application/XML")), Some(BodyFormat::Xml));
    }

    #[test]
    fn test_unrecognized_or_missing_content_type() {
        assert_eq!(BodyFormat::sniff(None), None);
        assert_eq!(BodyFormat::sniff(Some("")), None);
        assert_eq!(BodyFormat::sniff(Some("text/plain")), None);
        assert_eq!(BodyFormat::sniff(Some("application/octet-stream")), None);
    }
}
