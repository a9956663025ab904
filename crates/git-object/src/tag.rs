use bstr::{BStr, BString, ByteSlice};
use git_hash::ObjectId;
use git_utils::date::Signature;

use crate::header::{parse_oid, write_field, HeaderLines};
use crate::{ObjectError, ObjectType};

const SIGNATURE_MARKERS: [&[u8]; 2] = [
    b"-----BEGIN PGP SIGNATURE-----",
    b"-----BEGIN SSH SIGNATURE-----",
];

/// A git annotated tag object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// OID of the tagged object.
    pub target: ObjectId,
    /// Kind of the tagged object, as recorded in the tag.
    pub target_type: ObjectType,
    pub tag_name: BString,
    /// Tagger identity and timestamp (absent on some old tags).
    pub tagger: Option<Signature>,
    pub message: BString,
    /// Detached signature appended to the message.
    pub gpgsig: Option<BString>,
}

impl Tag {
    /// Parse tag content from raw bytes (no object header).
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut target = None;
        let mut target_type = None;
        let mut tag_name = None;
        let mut tagger = None;

        let mut lines = HeaderLines::new(content);
        for (key, value) in lines.by_ref() {
            match key {
                b"object" => target = Some(parse_oid(&value, "object")?),
                b"type" => target_type = Some(ObjectType::from_bytes(&value)?),
                b"tag" => tag_name = Some(value),
                b"tagger" => {
                    tagger = Some(
                        Signature::parse(value.as_bstr())
                            .map_err(|e| ObjectError::InvalidSignature(e.to_string()))?,
                    )
                }
                _ => {}
            }
        }

        let rest = lines.body();
        let sig_start = SIGNATURE_MARKERS
            .iter()
            .filter_map(|marker| rest.find(marker))
            .min();
        let (message, gpgsig) = match sig_start {
            Some(pos) => (BString::from(&rest[..pos]), Some(BString::from(&rest[pos..]))),
            None => (BString::from(rest), None),
        };

        Ok(Self {
            target: target.ok_or(ObjectError::MissingTagField { field: "object" })?,
            target_type: target_type.ok_or(ObjectError::MissingTagField { field: "type" })?,
            tag_name: tag_name.ok_or(ObjectError::MissingTagField { field: "tag" })?,
            tagger,
            message,
            gpgsig,
        })
    }

    /// Serialize tag content to bytes (no object header).
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(128 + self.message.len());
        write_field(&mut out, b"object", self.target.to_hex().as_bytes());
        write_field(&mut out, b"type", self.target_type.as_bytes());
        write_field(&mut out, b"tag", &self.tag_name);
        if let Some(tagger) = &self.tagger {
            write_field(&mut out, b"tagger", &tagger.to_bytes());
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        if let Some(sig) = &self.gpgsig {
            out.extend_from_slice(sig);
        }
        out
    }

    pub fn name(&self) -> &BStr {
        self.tag_name.as_bstr()
    }
}
