//! Rectangular level-transition triggers.

use serde::{Deserialize, Serialize};

/// A region that, when entered by a person, requests loading another level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Portal {
  x: i32,
  y: i32,
  width: i32,
  height: i32,
  target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
  /// Width or height below one cell.
  EmptyArea { width: i32, height: i32 },
  /// A required geometry field was absent.
  MissingGeometry(&'static str),
  MissingTarget,
}

impl std::fmt::Display for PortalError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::EmptyArea { width, height } => {
        write!(f, "portal area must be at least 1x1, got {}x{}", width, height)
      }
      Self::MissingGeometry(field) => write!(f, "portal is missing `{}`", field),
      Self::MissingTarget => write!(f, "portal has no target level"),
    }
  }
}

impl std::error::Error for PortalError {}

impl Portal {
  pub fn new(
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    target: impl Into<String>,
  ) -> Result<Self, PortalError> {
    if width < 1 || height < 1 {
      return Err(PortalError::EmptyArea { width, height });
    }
    let target = target.into();
    if target.trim().is_empty() {
      return Err(PortalError::MissingTarget);
    }
    Ok(Self {
      x,
      y,
      width,
      height,
      target,
    })
  }

  #[inline]
  pub fn target(&self) -> &str {
    &self.target
  }

  /// `(x, y, width, height)` of the trigger area.
  #[inline]
  pub fn rect(&self) -> (i32, i32, i32, i32) {
    (self.x, self.y, self.width, self.height)
  }

  /// Rectangle overlap test. Rectangles that share an edge count as
  /// overlapping.
  pub fn overlaps(&self, x: i32, y: i32, width: i32, height: i32) -> bool {
    x <= self.x + self.width
      && x + width >= self.x
      && y <= self.y + self.height
      && y + height >= self.y
  }

  pub fn record(&self) -> PortalRecord {
    PortalRecord {
      x: Some(self.x),
      y: Some(self.y),
      width: Some(self.width),
      height: Some(self.height),
      target: self.target.clone(),
    }
  }
}

/// Serializable portal. Geometry fields are optional in the file so that a
/// missing field is reported instead of silently defaulting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalRecord {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub x: Option<i32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub y: Option<i32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub width: Option<i32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub height: Option<i32>,
  #[serde(default)]
  pub target: String,
}

impl TryFrom<&PortalRecord> for Portal {
  type Error = PortalError;

  fn try_from(record: &PortalRecord) -> Result<Self, Self::Error> {
    let x = record.x.ok_or(PortalError::MissingGeometry("x"))?;
    let y = record.y.ok_or(PortalError::MissingGeometry("y"))?;
    let width = record.width.ok_or(PortalError::MissingGeometry("width"))?;
    let height = record.height.ok_or(PortalError::MissingGeometry("height"))?;
    Portal::new(x, y, width, height, record.target.clone())
  }
}
