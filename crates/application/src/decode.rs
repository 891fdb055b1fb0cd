//! Decoding response bodies into caller-owned entities.

use std::io::{BufReader, Read};

use serde::de::DeserializeOwned;
use thiserror::Error;
use webtest_domain::BodyFormat;

/// Error type for decode operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON for the target type.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// The body is not valid XML for the target type.
    #[error("{0}")]
    Xml(#[from] quick_xml::DeError),

    /// The body held no JSON value.
    #[error("EOF while parsing a value: empty body")]
    Empty,
}

/// A caller-owned destination a response body can be decoded into.
///
/// Implemented for every `DeserializeOwned` type: the decoded value replaces
/// whatever the caller pre-allocated. Unknown fields are ignored unless the
/// type opts into `deny_unknown_fields`; type mismatches are errors.
///
/// JSON decoding reads the first value only, so anything after it in the
/// body is left unread.
pub trait Entity {
    /// Decodes `reader` in the given format, overwriting `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is malformed or does not match the type.
    fn decode(&mut self, format: BodyFormat, reader: &mut dyn Read) -> Result<(), DecodeError>;

    /// Decodes a buffered body.
    ///
    /// # Errors
    ///
    /// Same as [`Entity::decode`].
    fn decode_bytes(&mut self, format: BodyFormat, bytes: &[u8]) -> Result<(), DecodeError> {
        let mut reader = bytes;
        self.decode(format, &mut reader)
    }
}

impl<T: DeserializeOwned> Entity for T {
    fn decode(&mut self, format: BodyFormat, reader: &mut dyn Read) -> Result<(), DecodeError> {
        let reader = BufReader::new(reader);
        *self = match format {
            BodyFormat::Json => serde_json::Deserializer::from_reader(reader)
                .into_iter::<T>()
                .next()
                .ok_or(DecodeError::Empty)??,
            BodyFormat::Xml => quick_xml::de::from_reader(reader)?,
        };
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct User {
        #[serde(alias = "Id")]
        id: String,
    }

    #[test]
    fn test_json_overwrites_target() {
        let mut user = User {
            id: "stale".to_string(),
        };
        user.decode_bytes(BodyFormat::Json, br#"{"id":"abc"}"#).unwrap();
        assert_eq!(user.id, "abc");
    }

    #[test]
    fn test_xml_uses_xml_decoder() {
        let mut user = User::default();
        user.decode_bytes(BodyFormat::Xml, b"<User><Id>abc</Id></User>")
            .unwrap();
        assert_eq!(user.id, "abc");
    }

    #[test]
    fn test_xml_body_is_rejected_by_json_decoder() {
        let mut user = User::default();
        let result = user.decode_bytes(BodyFormat::Json, b"<User><Id>abc</Id></User>");
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_json_ignores_data_after_first_value() {
        let mut user = User::default();
        user.decode_bytes(BodyFormat::Json, b"{\"id\":\"abc\"}\n{\"id\":\"def\"} trailing")
            .unwrap();
        assert_eq!(user.id, "abc");
    }

    #[test]
    fn test_empty_json_body_is_an_error() {
        let mut user = User {
            id: "kept".to_string(),
        };
        let result = user.decode_bytes(BodyFormat::Json, b"  \n");
        assert!(matches!(result, Err(DecodeError::Empty)));
        assert_eq!(user.id, "kept");
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        let mut user = User::default();
        let result = user.decode_bytes(BodyFormat::Json, br#"{"id":42}"#);
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decodes_through_trait_object() {
        let mut user = User::default();
        let entity: &mut dyn Entity = &mut user;
        entity
            .decode(BodyFormat::Json, &mut &br#"{"id":"xyz","extra":true}"#[..])
            .unwrap();
        assert_eq!(user.id, "xyz");
    }
}
