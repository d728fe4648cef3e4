//! Reply-to-view projection
//!
//! Pure functions turning catalog records and registry entries into
//! [`ViewDescriptor`]s. Nothing here touches navigation state; side results
//! (the playlist parent folder) are returned for the engine to commit.

use super::error::BrowseError;
use super::view::{MetadataField, RowKind, RowTag, ViewDescriptor, ViewRow};
use crate::catalog::{Record, MENU_NAME_CLOSE, MENU_NAME_OPEN};
use crate::clients::{ClientInfo, MediaInfo};
use crate::types::{title_case, ItemId, MenuKind, Slot};

pub const MEDIA_OVERVIEW_TITLE: &str = "Media overview";

/// Metadata fields in display order
pub const METADATA_FIELDS: [&str; 9] = [
    "title", "artist", "album", "genre", "key", "bpm", "comment", "rating", "duration",
];

const NO_MEDIA: &str = "No media in player";
const NO_INFO: &str = "No information available";
const MIB: u64 = 1024 * 1024;

/// "{name}, {n} tracks, {n} playlists, {free}/{total}MB free"
pub fn media_info_text(info: &MediaInfo) -> String {
    match (
        &info.name,
        info.track_count,
        info.playlist_count,
        info.bytes_total,
        info.bytes_free,
    ) {
        (Some(name), Some(tracks), Some(playlists), Some(total), Some(free)) => format!(
            "{}, {} tracks, {} playlists, {}/{}MB free",
            name,
            tracks,
            playlists,
            free / MIB,
            total / MIB
        ),
        _ => NO_INFO.to_string(),
    }
}

pub fn media_overview(info: &ClientInfo) -> ViewDescriptor {
    let rows: Vec<ViewRow> = info
        .loaded_slots()
        .map(|(slot, media)| {
            let tag = RowTag::new(RowKind::Media, Record::new().with("name", slot.name()));
            ViewRow::tagged(vec![slot.label().to_string(), media_info_text(media)], tag)
        })
        .collect();

    if rows.is_empty() {
        return ViewDescriptor {
            title: MEDIA_OVERVIEW_TITLE.to_string(),
            columns: vec!["Media".to_string()],
            rows: vec![ViewRow::inert(NO_MEDIA)],
        };
    }

    ViewDescriptor {
        title: MEDIA_OVERVIEW_TITLE.to_string(),
        columns: vec!["Media".to_string(), "Info".to_string()],
        rows,
    }
}

/// Strip the delimiters players put around root category names
pub fn unwrap_menu_name(name: &str) -> &str {
    name.strip_prefix(MENU_NAME_OPEN)
        .and_then(|inner| inner.strip_suffix(MENU_NAME_CLOSE))
        .unwrap_or(name)
}

pub fn root_menu_view(slot: Slot, records: &[Record]) -> Result<ViewDescriptor, BrowseError> {
    let rows = records
        .iter()
        .map(|record| {
            let raw = record
                .get("name")
                .and_then(|v| v.as_text())
                .ok_or(BrowseError::MalformedReply {
                    query: MenuKind::Root.name(),
                    reason: "category without a name",
                })?;
            let name = unwrap_menu_name(raw).to_string();
            let mut fields = record.clone();
            fields.insert("name", name.as_str());
            Ok::<_, BrowseError>(ViewRow::tagged(vec![name], RowTag::new(RowKind::Root, fields)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ViewDescriptor {
        title: format!("Root menu {}", slot),
        columns: vec!["Category".to_string()],
        rows,
    })
}

/// Displayed field names, taken from the first record only
///
/// Identifier fields are left out. An empty reply has no columns.
pub fn infer_columns(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|first| first.visible_keys().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Row kind of an entry inside a playlist listing
///
/// Folder listings mix sub-folders and playlists, playlist listings hold
/// tracks, all under the one playlist menu.
fn playlist_row_kind(record: &Record) -> RowKind {
    if record.contains("track_id") {
        RowKind::Title
    } else if record.contains("folder_id") {
        RowKind::Folder
    } else {
        RowKind::Playlist
    }
}

/// A list view plus the state updates it implies
#[derive(Debug, Clone, PartialEq)]
pub struct ListProjection {
    pub view: ViewDescriptor,
    /// Last `parent_id` seen in a playlist listing
    pub playlist_folder: Option<ItemId>,
}

pub fn list_view(menu: MenuKind, slot: Slot, records: &[Record]) -> ListProjection {
    let columns = infer_columns(records);
    let menu_rows = RowKind::for_menu(menu);
    let mut playlist_folder = None;
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        let kind = if menu == MenuKind::Playlist {
            if let Some(parent) = record.id("parent_id") {
                playlist_folder = Some(parent);
            }
            playlist_row_kind(record)
        } else {
            menu_rows
        };
        let cells = columns.iter().map(|column| record.text(column)).collect();
        rows.push(ViewRow::tagged(cells, RowTag::new(kind, record.clone())));
    }

    ListProjection {
        view: ViewDescriptor {
            title: format!("{} on {}", menu.display_name(), slot.name().to_uppercase()),
            columns: columns.iter().map(|c| title_case(c)).collect(),
            rows,
        },
        playlist_folder,
    }
}

/// Known metadata fields in display order, absent ones skipped
pub fn metadata_fields(record: &Record) -> Vec<MetadataField> {
    METADATA_FIELDS
        .iter()
        .filter_map(|&key| {
            record.get(key).map(|value| MetadataField {
                label: title_case(key),
                value: value.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::SlotStatus;

    fn full_info() -> MediaInfo {
        MediaInfo {
            name: Some("SANDISK".to_string()),
            track_count: Some(812),
            playlist_count: Some(14),
            bytes_total: Some(16 * 1024 * MIB),
            bytes_free: Some(3 * 1024 * MIB + 512 * 1024),
        }
    }

    #[test]
    fn test_media_info_text() {
        assert_eq!(
            media_info_text(&full_info()),
            "SANDISK, 812 tracks, 14 playlists, 3072/16384MB free"
        );
        let partial = MediaInfo {
            bytes_free: None,
            ..full_info()
        };
        assert_eq!(media_info_text(&partial), NO_INFO);
    }

    #[test]
    fn test_media_overview_without_media() {
        let view = media_overview(&ClientInfo::default());
        assert_eq!(view.title, MEDIA_OVERVIEW_TITLE);
        assert_eq!(view.columns, vec!["Media"]);
        assert_eq!(view.rows, vec![ViewRow::inert(NO_MEDIA)]);
    }

    #[test]
    fn test_media_overview_lists_loaded_slots() {
        let info = ClientInfo {
            usb: SlotStatus::Empty,
            sd: SlotStatus::Loaded(MediaInfo::default()),
        };
        let view = media_overview(&info);
        assert_eq!(view.columns, vec!["Media", "Info"]);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].cells, vec!["SD Card", NO_INFO]);
        let tag = view.row_tag(0).unwrap();
        assert_eq!(tag.kind, RowKind::Media);
        assert_eq!(tag.slot(), Some(Slot::Sd));
    }

    #[test]
    fn test_unwrap_menu_name() {
        assert_eq!(unwrap_menu_name("\u{fffa}ARTIST\u{fffb}"), "ARTIST");
        assert_eq!(unwrap_menu_name("TRACK"), "TRACK");
        assert_eq!(unwrap_menu_name("\u{fffa}HALF"), "\u{fffa}HALF");
    }

    #[test]
    fn test_root_menu_requires_names() {
        let records = vec![Record::new().with("menu_id", 1u32)];
        assert!(matches!(
            root_menu_view(Slot::Usb, &records),
            Err(BrowseError::MalformedReply { .. })
        ));
    }

    #[test]
    fn test_columns_from_first_record_only() {
        let records = vec![
            Record::new().with("name", "Rock").with("genre_id", 3u32),
            Record::new()
                .with("name", "Jazz")
                .with("extra", "ignored")
                .with("genre_id", 4u32),
        ];
        let projection = list_view(MenuKind::Genre, Slot::Usb, &records);
        assert_eq!(projection.view.columns, vec!["Name"]);
        assert_eq!(projection.view.rows[1].cells, vec!["Jazz"]);
        assert_eq!(projection.view.title, "Genre on USB");
        assert_eq!(projection.playlist_folder, None);
    }

    #[test]
    fn test_missing_cell_renders_empty() {
        let records = vec![
            Record::new().with("title", "A").with("bpm", 120.5),
            Record::new().with("title", "B"),
        ];
        let view = list_view(MenuKind::Title, Slot::Sd, &records).view;
        assert_eq!(view.columns, vec!["Title", "Bpm"]);
        assert_eq!(view.rows[0].cells, vec!["A", "120.5"]);
        assert_eq!(view.rows[1].cells, vec!["B", ""]);
        assert_eq!(view.title, "Title on SD");
    }

    #[test]
    fn test_playlist_rows_by_content() {
        let records = vec![
            Record::new().with("name", "Sets").with("folder_id", 10u32).with("parent_id", 0u32),
            Record::new().with("name", "Peak").with("playlist_id", 30u32).with("parent_id", 4u32),
            Record::new().with("name", "Loose").with("track_id", 100u32),
        ];
        let projection = list_view(MenuKind::Playlist, Slot::Usb, &records);
        let kinds: Vec<_> = projection
            .view
            .rows
            .iter()
            .filter_map(|row| row.tag.as_ref().map(|t| t.kind))
            .collect();
        assert_eq!(kinds, vec![RowKind::Folder, RowKind::Playlist, RowKind::Title]);
        // Last parent_id wins
        assert_eq!(projection.playlist_folder, Some(4));
    }

    #[test]
    fn test_metadata_fields_fixed_order() {
        let record = Record::new()
            .with("duration", 212u32)
            .with("title", "Aerodynamic")
            .with("bpm", 123.5)
            .with("artist", "Daft Punk")
            .with("track_id", 101u32);
        let fields = metadata_fields(&record);
        let labels: Vec<_> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Title", "Artist", "Bpm", "Duration"]);
        assert_eq!(fields[2].value, "123.5");
    }
}
