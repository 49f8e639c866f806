//! FILENAME: grid-engine/src/overrides.rs
//! PURPOSE: Scoped render-property overrides for header-group painting.
//! CONTEXT: Painting a header group temporarily swaps some render
//! properties (emphasis, background, indent) and must restore them
//! when the group ends, even on early return. The guard snapshots the
//! props on entry and restores them on drop.

use serde::{Deserialize, Serialize};

/// Background hint for a painted region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    Normal,
    Header,
    GroupHeader,
    Total,
}

impl Default for Background {
    fn default() -> Self {
        Background::Normal
    }
}

/// Render properties in effect while painting a region of the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderProps {
    pub background: Background,
    pub bold: bool,
    /// Indentation level applied to tree labels.
    pub indent: u8,
}

/// Partial override applied at group entry. Unset fields keep the
/// current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOverride {
    pub background: Option<Background>,
    pub bold: Option<bool>,
    pub indent: Option<u8>,
}

impl RenderOverride {
    pub fn group_header() -> Self {
        RenderOverride {
            background: Some(Background::GroupHeader),
            bold: Some(true),
            indent: None,
        }
    }
}

/// Guard that applies an override on construction and restores the
/// previous props when it goes out of scope.
pub struct ScopedOverride<'a> {
    target: &'a mut RenderProps,
    saved: RenderProps,
}

impl<'a> ScopedOverride<'a> {
    pub fn push(target: &'a mut RenderProps, patch: RenderOverride) -> Self {
        let saved = target.clone();
        if let Some(background) = patch.background {
            target.background = background;
        }
        if let Some(bold) = patch.bold {
            target.bold = bold;
        }
        if let Some(indent) = patch.indent {
            target.indent = indent;
        }
        ScopedOverride { target, saved }
    }

    pub fn props(&self) -> &RenderProps {
        self.target
    }
}

impl Drop for ScopedOverride<'_> {
    fn drop(&mut self) {
        *self.target = std::mem::take(&mut self.saved);
    }
}
