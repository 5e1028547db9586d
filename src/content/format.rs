//! Import-format rendering (localized `sys` / `fields` records).

use super::{AssetRecord, EntryRecord};
use crate::error::ExportError;
use crate::types::{AssetTag, BROWSE_PAGE_CONTENT_TYPE};
use serde::Serialize;

/// A value keyed by the export locale
#[derive(Debug, Serialize)]
pub struct Localized<T> {
    #[serde(rename = "en-US")]
    pub en_us: T,
}

impl<T> Localized<T> {
    fn new(value: T) -> Self {
        Self { en_us: value }
    }
}

#[derive(Debug, Serialize)]
pub struct SysRef<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ContentTypeRef<'a> {
    pub sys: SysRef<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSys<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct FileDetails {
    pub size: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValue<'a> {
    pub url: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub details: FileDetails,
}

#[derive(Debug, Serialize)]
pub struct AssetFields<'a> {
    pub title: Localized<&'a str>,
    pub description: Localized<AssetTag>,
    pub file: Localized<FileValue<'a>>,
}

#[derive(Debug, Serialize)]
pub struct AssetDocument<'a> {
    pub sys: AssetSys<'a>,
    pub fields: AssetFields<'a>,
}

impl<'a> From<&'a AssetRecord> for AssetDocument<'a> {
    fn from(asset: &'a AssetRecord) -> Self {
        AssetDocument {
            sys: AssetSys {
                kind: "Asset",
                id: &asset.id,
            },
            fields: AssetFields {
                title: Localized::new(asset.title.as_str()),
                description: Localized::new(asset.description),
                file: Localized::new(FileValue {
                    url: &asset.source_url,
                    file_name: &asset.file_name,
                    content_type: &asset.content_type,
                    details: FileDetails {
                        size: asset.size_bytes,
                    },
                }),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySys<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: &'a str,
    pub content_type: ContentTypeRef<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSys<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub link_type: &'static str,
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Link<'a> {
    pub sys: LinkSys<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFields<'a> {
    pub category_id: Localized<&'a str>,
    pub banner_image: Localized<Link<'a>>,
}

#[derive(Debug, Serialize)]
pub struct EntryDocument<'a> {
    pub sys: EntrySys<'a>,
    pub fields: EntryFields<'a>,
}

impl<'a> From<&'a EntryRecord> for EntryDocument<'a> {
    fn from(entry: &'a EntryRecord) -> Self {
        EntryDocument {
            sys: EntrySys {
                kind: "Entry",
                id: &entry.id,
                content_type: ContentTypeRef {
                    sys: SysRef {
                        id: BROWSE_PAGE_CONTENT_TYPE,
                    },
                },
            },
            fields: EntryFields {
                category_id: Localized::new(entry.category_id.as_str()),
                banner_image: Localized::new(Link {
                    sys: LinkSys {
                        kind: "Link",
                        link_type: "Asset",
                        id: &entry.banner_asset_id,
                    },
                }),
            },
        }
    }
}

/// Top-level export document; `entries` is omitted for product exports
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryDocument<'a>>>,
    pub assets: Vec<AssetDocument<'a>>,
}

/// Render the pretty-printed (two-space) import document.
pub fn render_document(
    entries: Option<&[EntryRecord]>,
    assets: &[AssetRecord],
) -> Result<String, ExportError> {
    let document = ExportDocument {
        entries: entries.map(|e| e.iter().map(EntryDocument::from).collect()),
        assets: assets.iter().map(AssetDocument::from).collect(),
    };
    serde_json::to_string_pretty(&document)
        .map_err(|e| ExportError::SerializationFailure(e.to_string()))
}
