//! Layout Module - Slot row geometry.
//!
//! Uses [Taffy](https://github.com/DioxusLabs/taffy) flexbox to place the OTP
//! field inside a rectangle:
//!
//! ```text
//! ┌─────────────────────── area.width ───────────────────────┐
//! │        ╭───╮ ╭───╮ ╭───╮ ╭───╮ ╭───╮ ╭───╮                │  slot row (centered, gap 1)
//! │        │ • │ │ • │ │ 3 │ │   │ │   │ │   │                │
//! │        ╰───╯ ╰───╯ ╰───╯ ╰───╯ ╰───╯ ╰───╯                │
//! │                                                           │  spacer
//! │  ··············· message line (centered) ···············  │  always reserved
//! └───────────────────────────────────────────────────────────┘
//! ```

mod text_measure;

pub use text_measure::*;

use taffy::{
    AvailableSpace, Dimension, FlexDirection, JustifyContent, LengthPercentage, NodeId, Rect,
    Size, Style, TaffyTree,
};

use crate::error::Result;
use crate::types::ClipRect;

/// Slot box width in cells (border, pad, glyph, pad, border).
pub const SLOT_WIDTH: u16 = 5;
/// Slot box height in cells (border, glyph row, border).
pub const SLOT_HEIGHT: u16 = 3;
/// Cells between adjacent slots.
pub const SLOT_GAP: u16 = 1;
/// Rows between the slot row and the message line.
pub const MESSAGE_GAP: u16 = 1;
/// Horizontal padding either side of the message line.
pub const MESSAGE_PADDING: u16 = 2;

/// Total rows the field occupies.
pub const FIELD_HEIGHT: u16 = SLOT_HEIGHT + MESSAGE_GAP + 1;

/// Computed positions for one OTP field.
#[derive(Debug, Clone, PartialEq)]
pub struct OtpLayout {
    /// One rectangle per slot, left to right.
    pub slots: Vec<ClipRect>,
    pub message: ClipRect,
}

/// Width of the slot row for `length` slots.
pub fn slot_row_width(length: usize) -> u16 {
    let n = u16::try_from(length).unwrap_or(u16::MAX);
    n.saturating_mul(SLOT_WIDTH)
        .saturating_add(n.saturating_sub(1).saturating_mul(SLOT_GAP))
}

fn cells(value: u16) -> Dimension {
    Dimension::Length(value as f32)
}

/// Lay out `slot_count` slots and the message line inside `area`.
///
/// When the area is narrower than the slot row the row keeps its size and
/// overflows; a row that would start left of the area is shifted right as a
/// whole so its first slot sits on the area's left edge.
pub fn compute_otp_layout(area: ClipRect, slot_count: usize) -> Result<OtpLayout> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let slot_style = Style {
        size: Size {
            width: cells(SLOT_WIDTH),
            height: cells(SLOT_HEIGHT),
        },
        flex_shrink: 0.0,
        ..Default::default()
    };
    let slot_nodes: Vec<NodeId> = (0..slot_count)
        .map(|_| tree.new_leaf(slot_style.clone()))
        .collect::<std::result::Result<_, _>>()?;

    let row = tree.new_with_children(
        Style {
            flex_direction: FlexDirection::Row,
            justify_content: Some(JustifyContent::Center),
            gap: Size {
                width: LengthPercentage::Length(SLOT_GAP as f32),
                height: LengthPercentage::Length(0.0),
            },
            size: Size {
                width: Dimension::Percent(1.0),
                height: cells(SLOT_HEIGHT),
            },
            flex_shrink: 0.0,
            ..Default::default()
        },
        &slot_nodes,
    )?;

    let spacer = tree.new_leaf(Style {
        size: Size {
            width: Dimension::Percent(1.0),
            height: cells(MESSAGE_GAP),
        },
        flex_shrink: 0.0,
        ..Default::default()
    })?;

    let message = tree.new_leaf(Style {
        size: Size {
            width: Dimension::Percent(1.0),
            height: cells(1),
        },
        padding: Rect {
            left: LengthPercentage::Length(MESSAGE_PADDING as f32),
            right: LengthPercentage::Length(MESSAGE_PADDING as f32),
            top: LengthPercentage::Length(0.0),
            bottom: LengthPercentage::Length(0.0),
        },
        flex_shrink: 0.0,
        ..Default::default()
    })?;

    let root = tree.new_with_children(
        Style {
            flex_direction: FlexDirection::Column,
            size: Size {
                width: cells(area.width),
                height: Dimension::Auto,
            },
            ..Default::default()
        },
        &[row, spacer, message],
    )?;

    tree.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(area.width as f32),
            height: AvailableSpace::MaxContent,
        },
    )?;

    let row_origin = tree.layout(row)?.location;
    let row_x = area.x as f32 + row_origin.x;
    let first_x = match slot_nodes.first() {
        Some(&node) => row_x + tree.layout(node)?.location.x,
        None => row_x,
    };
    let shift = (area.x as f32 - first_x).max(0.0);

    let slots = slot_nodes
        .iter()
        .map(|&node| -> Result<ClipRect> {
            let layout = tree.layout(node)?;
            let x = row_x + layout.location.x + shift;
            let y = area.y as f32 + row_origin.y + layout.location.y;
            Ok(ClipRect::new(
                x.round() as u16,
                y.round() as u16,
                layout.size.width.round() as u16,
                layout.size.height.round() as u16,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let message_layout = tree.layout(message)?;
    let message = ClipRect::new(
        area.x + (message_layout.location.x + message_layout.padding.left).round() as u16,
        area.y + message_layout.location.y.round() as u16,
        (message_layout.size.width - message_layout.padding.left - message_layout.padding.right)
            .max(0.0)
            .round() as u16,
        1,
    );

    Ok(OtpLayout { slots, message })
}
