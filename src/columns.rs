//! Declarative column configuration.
//!
//! The grid is configured with an ordered list of children: columns, or
//! named groups of columns. Layout derives a flat [`ColumnInfo`] list from
//! them once per pass; the stable `column_key` is what survives
//! virtualization remounts, not the column index.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// A single column declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    /// Unique key identifying the column across renders.
    pub column_key: String,
    /// Base width in logical pixels.
    pub width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default)]
    pub is_resizable: bool,
    /// Whether this column absorbs leftover grid width.
    #[serde(default)]
    pub flex_grow: bool,
}

/// A named group of columns rendered under a combined group header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGroupSpec {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Visually suppressed but still occupying layout space.
    #[serde(default)]
    pub hidden: bool,
    pub columns: Vec<ColumnSpec>,
}

/// A grid child: anything else in the configuration is a fatal error, which
/// the tagged deserialization enforces at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GridChild {
    Column(ColumnSpec),
    ColumnGroup(ColumnGroupSpec),
}

/// Flattened per-column layout record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub column_key: String,
    pub width: f32,
}

/// Derived group header record with its combined width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub hidden: bool,
    pub width: f32,
}

/// Parse a JSON child list, failing fast on malformed or unknown children.
pub fn parse_children(json: &str) -> Result<Vec<GridChild>> {
    serde_json::from_str(json).map_err(|e| GridError::Config(e.to_string()))
}

fn flat_columns(children: &[GridChild]) -> impl Iterator<Item = &ColumnSpec> {
    children.iter().flat_map(|child| match child {
        GridChild::Column(column) => std::slice::from_ref(column).iter(),
        GridChild::ColumnGroup(group) => group.columns.iter(),
    })
}

/// Flatten children into the ordered column list, validating key uniqueness.
pub fn column_info(children: &[GridChild]) -> Result<Vec<ColumnInfo>> {
    let mut info: Vec<ColumnInfo> = Vec::new();
    for column in flat_columns(children) {
        if info.iter().any(|c| c.column_key == column.column_key) {
            return Err(GridError::Config(format!(
                "duplicate columnKey: {}",
                column.column_key
            )));
        }
        info.push(ColumnInfo {
            column_key: column.column_key.clone(),
            width: column.width,
        });
    }
    Ok(info)
}

/// Derive group header records. Ungrouped columns contribute no group.
pub fn group_info(children: &[GridChild]) -> Vec<GroupInfo> {
    children
        .iter()
        .filter_map(|child| match child {
            GridChild::Column(_) => None,
            GridChild::ColumnGroup(group) => Some(GroupInfo {
                key: group.key.clone(),
                header: group.header.clone(),
                hidden: group.hidden,
                width: group.columns.iter().map(|c| c.width).sum(),
            }),
        })
        .collect()
}

/// Effective render widths given the available grid width: a `flex_grow`
/// column stretches to absorb the remaining space (never below its base
/// width).
pub fn layout_widths(children: &[GridChild], available_width: f32) -> Vec<f32> {
    let mut widths = Vec::new();
    let mut left = 0.0f32;
    for column in flat_columns(children) {
        let width = if column.flex_grow {
            (available_width - left).max(column.width)
        } else {
            column.width
        };
        widths.push(width);
        left += column.width;
    }
    widths
}

/// Combined width of the frozen leading columns.
pub fn frozen_width(columns: &[ColumnInfo], frozen_leading_columns: u32) -> f32 {
    columns
        .iter()
        .take(frozen_leading_columns as usize)
        .map(|c| c.width)
        .sum()
}

/// New column width after a resize drag; `None` when the drag would collapse
/// the column to nothing (the resize is abandoned, matching a drag released
/// past the left edge).
pub fn resize_end_width(orig_width: f32, drag_start_x: f32, drag_end_x: f32) -> Option<f32> {
    let new_width = orig_width + (drag_end_x - drag_start_x);
    (new_width > 0.0).then_some(new_width)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn column(key: &str, width: f32) -> ColumnSpec {
        ColumnSpec {
            column_key: key.to_string(),
            width,
            header: None,
            is_resizable: false,
            flex_grow: false,
        }
    }

    #[test]
    fn test_parse_children_json() {
        let json = r#"[
            {"type": "column", "columnKey": "name", "width": 120.0, "isResizable": true},
            {"type": "columnGroup", "key": "metrics", "header": "Metrics", "columns": [
                {"columnKey": "a", "width": 60.0},
                {"columnKey": "b", "width": 40.0}
            ]}
        ]"#;
        let children = parse_children(json).unwrap();
        assert_eq!(children.len(), 2);
        let info = column_info(&children).unwrap();
        assert_eq!(info.len(), 3);
        assert_eq!(info[1].column_key, "a");
    }

    #[test]
    fn test_unknown_child_type_is_fatal() {
        let json = r#"[{"type": "sparkline", "columnKey": "x", "width": 10.0}]"#;
        let err = parse_children(json).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
    }

    #[test]
    fn test_duplicate_column_key_is_fatal() {
        let children = vec![
            GridChild::Column(column("a", 10.0)),
            GridChild::Column(column("a", 20.0)),
        ];
        assert!(matches!(
            column_info(&children),
            Err(GridError::Config(_))
        ));
    }

    #[test]
    fn test_group_combined_width() {
        let children = vec![
            GridChild::Column(column("id", 40.0)),
            GridChild::ColumnGroup(ColumnGroupSpec {
                key: "g".to_string(),
                header: Some("Group".to_string()),
                hidden: true,
                columns: vec![column("a", 60.0), column("b", 40.0)],
            }),
        ];
        let groups = group_info(&children);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].width, 100.0);
        assert!(groups[0].hidden);
    }

    #[test]
    fn test_flex_grow_absorbs_remaining_width() {
        let mut wide = column("wide", 100.0);
        wide.flex_grow = true;
        let children = vec![
            GridChild::Column(column("a", 50.0)),
            GridChild::Column(wide),
            GridChild::Column(column("b", 50.0)),
        ];
        let widths = layout_widths(&children, 400.0);
        assert_eq!(widths, vec![50.0, 350.0, 50.0]);
        // Never shrinks below the base width.
        let widths = layout_widths(&children, 120.0);
        assert_eq!(widths[1], 100.0);
    }

    #[test]
    fn test_frozen_width() {
        let info = vec![
            ColumnInfo {
                column_key: "a".to_string(),
                width: 40.0,
            },
            ColumnInfo {
                column_key: "b".to_string(),
                width: 60.0,
            },
            ColumnInfo {
                column_key: "c".to_string(),
                width: 80.0,
            },
        ];
        assert_eq!(frozen_width(&info, 2), 100.0);
        assert_eq!(frozen_width(&info, 0), 0.0);
        assert_eq!(frozen_width(&info, 9), 180.0);
    }

    #[test]
    fn test_resize_end_width() {
        assert_eq!(resize_end_width(100.0, 10.0, 40.0), Some(130.0));
        assert_eq!(resize_end_width(100.0, 40.0, 10.0), Some(70.0));
        assert_eq!(resize_end_width(30.0, 50.0, 10.0), None);
    }
}
