//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its partial-update shape.
//! - Apply creation-time placement rules against the live viewport.
//! - Resolve the toolbar color token into a concrete color.
//!
//! # Invariants
//! - `id` is assigned once as `max(existing ids) + 1` and never changes.
//! - Creation places notes at `x >= 10`, `y >= 70` with both sides `>= 150`.
//! - A `random` color is resolved exactly once, at creation.

use crate::model::geometry::{Point, Rect, Size};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Integer note identifier, unique within one collection.
pub type NoteId = u64;

/// Left margin applied at creation.
pub const CREATE_MIN_X: f64 = 10.0;
/// Top floor applied at creation; keeps the note clear of the toolbar.
pub const CREATE_MIN_Y: f64 = 70.0;
/// Minimum width and height applied at creation.
pub const CREATE_MIN_SIDE: f64 = 150.0;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex regex"));

/// Named entry of the fixed note palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    pub name: &'static str,
    pub hex: &'static str,
}

/// Fixed palette used for `random` resolution and named color tokens.
pub const PALETTE: [PaletteColor; 4] = [
    PaletteColor {
        name: "yellow",
        hex: "#fef9c3",
    },
    PaletteColor {
        name: "pink",
        hex: "#fecaca",
    },
    PaletteColor {
        name: "green",
        hex: "#bbf7d0",
    },
    PaletteColor {
        name: "blue",
        hex: "#c7d2fe",
    },
];

/// Returns whether `color` is one of the palette hex values.
pub fn is_palette_color(color: &str) -> bool {
    PALETTE
        .iter()
        .any(|entry| entry.hex.eq_ignore_ascii_case(color))
}

/// Validation error for note input tokens and loaded collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Color token is neither `random`, a palette name, nor a hex literal.
    InvalidColor(String),
    /// Id leaves no room for the next created note.
    IdExhausted(NoteId),
    /// Stacking key leaves no room to bring another note above it.
    ZIndexExhausted(NoteId),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColor(value) => write!(
                f,
                "invalid color `{value}`; expected random|yellow|pink|green|blue or #rgb/#rrggbb"
            ),
            Self::IdExhausted(id) => write!(f, "note id {id} has no successor"),
            Self::ZIndexExhausted(id) => write!(f, "note {id} zIndex has no successor"),
        }
    }
}

impl Error for NoteValidationError {}

/// Color token supplied by the creation form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Pick a palette entry uniformly at creation time.
    #[default]
    Random,
    /// Caller-chosen color, stored verbatim.
    Fixed(String),
}

impl ColorChoice {
    /// Resolves the token into the color stored on the note.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self {
            Self::Random => PALETTE[rng.gen_range(0..PALETTE.len())].hex.to_string(),
            Self::Fixed(color) => color.clone(),
        }
    }
}

impl FromStr for ColorChoice {
    type Err = NoteValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("random") {
            return Ok(Self::Random);
        }
        if let Some(entry) = PALETTE
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(trimmed))
        {
            return Ok(Self::Fixed(entry.hex.to_string()));
        }
        if HEX_COLOR_RE.is_match(trimmed) {
            return Ok(Self::Fixed(trimmed.to_ascii_lowercase()));
        }
        Err(NoteValidationError::InvalidColor(trimmed.to_string()))
    }
}

/// Creation parameters produced by the toolbar form.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateNoteRequest {
    pub position: Point,
    pub size: Size,
    pub color: ColorChoice,
}

impl Default for CreateNoteRequest {
    fn default() -> Self {
        Self {
            position: Point::new(20.0, 80.0),
            size: Size::new(200.0, 200.0),
            color: ColorChoice::Random,
        }
    }
}

/// Persisted note card.
///
/// Field names serialize as `id, x, y, width, height, content, zIndex, color`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Opaque rich-text markup owned by the editing surface.
    pub content: String,
    pub z_index: i64,
    pub color: String,
}

impl Note {
    /// Current geometry as one rectangle.
    pub fn geometry(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Merges the present fields of `patch` into this note.
    pub fn apply(&mut self, patch: &NotePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
    }
}

/// Partial update merged into an existing note.
///
/// Color is fixed at creation and therefore not patchable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub content: Option<String>,
    pub z_index: Option<i64>,
}

impl NotePatch {
    /// Patch replacing the full geometry.
    pub fn geometry(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn z_index(z_index: i64) -> Self {
        Self {
            z_index: Some(z_index),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Next id for `existing`: `max(ids) + 1`, or `1` when empty.
///
/// Saturates at `NoteId::MAX`; loaded collections are rejected before that
/// by [`check_collection`].
pub fn next_note_id(existing: &[Note]) -> NoteId {
    existing
        .iter()
        .map(|note| note.id)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Stacking key for a newly created note: `max(zIndex) + 1`, or `1` when empty.
pub fn next_z_index(existing: &[Note]) -> i64 {
    existing
        .iter()
        .map(|note| note.z_index)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Rejects a loaded collection whose ids or stacking keys cannot grow.
pub fn check_collection(notes: &[Note]) -> Result<(), NoteValidationError> {
    for note in notes {
        if note.id == NoteId::MAX {
            return Err(NoteValidationError::IdExhausted(note.id));
        }
        if note.z_index == i64::MAX {
            return Err(NoteValidationError::ZIndexExhausted(note.id));
        }
    }
    Ok(())
}

/// Builds a new note placed inside `viewport`.
///
/// Position is limited by the *requested* size, while the stored size is
/// limited separately, so an oversized request still lands at the margins.
/// The caller is responsible for inserting the returned note.
pub fn new_note(
    existing: &[Note],
    position: Point,
    size: Size,
    color: String,
    viewport: Size,
) -> Note {
    let constrained_x = position.x.min(viewport.width - size.width - 10.0);
    let constrained_y = position.y.min(viewport.height - size.height - 10.0);

    Note {
        id: next_note_id(existing),
        x: constrained_x.max(CREATE_MIN_X),
        y: constrained_y.max(CREATE_MIN_Y),
        width: size.width.min(viewport.width - 20.0).max(CREATE_MIN_SIDE),
        height: size.height.min(viewport.height - 80.0).max(CREATE_MIN_SIDE),
        content: String::new(),
        z_index: next_z_index(existing),
        color,
    }
}
