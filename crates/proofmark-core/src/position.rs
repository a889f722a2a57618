//! Anchored placement of floating elements.
//!
//! A floating element of known size is placed on one side of a reference
//! rectangle, optionally aligned to its start or end edge, then adjusted by
//! an offset and by the `flip`/`shift` collision rules. All inputs are in
//! viewport coordinates; [`PlacementResult::to_document`] converts the result
//! with the page scroll offset.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use proofmark_config::OverlayConfig;
use proofmark_protocols::{Point, Rect, Size};

/// Side of the reference the floating element is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Top and bottom place along the y axis.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Start,
    End,
}

/// Side plus optional alignment, e.g. `bottom` or `bottom-end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub side: Side,
    pub alignment: Option<Alignment>,
}

impl Placement {
    pub const fn new(side: Side) -> Self {
        Self {
            side,
            alignment: None,
        }
    }

    pub const fn aligned(side: Side, alignment: Alignment) -> Self {
        Self {
            side,
            alignment: Some(alignment),
        }
    }

    fn with_side(self, side: Side) -> Self {
        Self { side, ..self }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.side.as_str())?;
        match self.alignment {
            Some(Alignment::Start) => f.write_str("-start"),
            Some(Alignment::End) => f.write_str("-end"),
            None => Ok(()),
        }
    }
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, alignment) = match s.split_once('-') {
            Some((side, alignment)) => (side, Some(alignment)),
            None => (s, None),
        };

        let side = match side {
            "top" => Side::Top,
            "right" => Side::Right,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            other => return Err(format!("Unknown side: {}", other)),
        };
        let alignment = match alignment {
            None => None,
            Some("start") => Some(Alignment::Start),
            Some("end") => Some(Alignment::End),
            Some(other) => return Err(format!("Unknown alignment: {}", other)),
        };

        Ok(Self { side, alignment })
    }
}

/// Displacement applied after the base placement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    /// Away from the reference; negative values move into it.
    pub main_axis: f64,
    /// Along the alignment axis, in coordinate direction.
    pub cross_axis: f64,
}

impl Offset {
    pub const fn new(main_axis: f64, cross_axis: f64) -> Self {
        Self {
            main_axis,
            cross_axis,
        }
    }
}

/// Offset computed from the reference rectangle.
pub type OffsetFn = Arc<dyn Fn(&Rect) -> Offset + Send + Sync>;

#[derive(Clone)]
pub struct PlacementConfig {
    pub placement: Placement,
    pub offset: Option<OffsetFn>,
    /// Try the opposite side when the preferred one overflows.
    pub flip: bool,
    /// Keep this much distance from the viewport edges along the cross axis.
    pub shift: Option<f64>,
}

impl PlacementConfig {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            offset: None,
            flip: false,
            shift: None,
        }
    }

    pub fn with_offset(mut self, offset: impl Fn(&Rect) -> Offset + Send + Sync + 'static) -> Self {
        self.offset = Some(Arc::new(offset));
        self
    }

    pub fn with_flip(mut self) -> Self {
        self.flip = true;
        self
    }

    pub fn with_shift(mut self, padding: f64) -> Self {
        self.shift = Some(padding);
        self
    }
}

impl fmt::Debug for PlacementConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementConfig")
            .field("placement", &self.placement)
            .field("offset", &self.offset.as_ref().map(|_| "<fn>"))
            .field("flip", &self.flip)
            .field("shift", &self.shift)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementResult {
    pub x: f64,
    pub y: f64,
    /// Placement actually used after flipping.
    pub placement: Placement,
}

impl PlacementResult {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Translate into document coordinates.
    pub fn to_document(&self, scroll: Point) -> Point {
        Point::new(self.x + scroll.x, self.y + scroll.y)
    }
}

/// Place `floating` against `reference` inside `viewport`.
pub fn place(reference: Rect, floating: Size, viewport: Rect, config: &PlacementConfig) -> PlacementResult {
    let offset = config
        .offset
        .as_ref()
        .map(|f| f(&reference))
        .unwrap_or_default();

    let mut placement = config.placement;
    let mut point = offset_coords(reference, floating, placement, offset);

    if config.flip {
        let overflow = main_overflow(point, floating, viewport, placement.side);
        if overflow > 0.0 {
            let flipped = placement.with_side(placement.side.opposite());
            let flipped_point = offset_coords(reference, floating, flipped, offset);
            let flipped_overflow = main_overflow(flipped_point, floating, viewport, flipped.side);
            if flipped_overflow < overflow {
                placement = flipped;
                point = flipped_point;
            }
        }
    }

    if let Some(padding) = config.shift {
        if placement.side.is_vertical() {
            point.x = clamp_axis(point.x, floating.width, viewport.x, viewport.right(), padding);
        } else {
            point.y = clamp_axis(point.y, floating.height, viewport.y, viewport.bottom(), padding);
        }
    }

    PlacementResult {
        x: point.x,
        y: point.y,
        placement,
    }
}

fn base_coords(reference: Rect, floating: Size, placement: Placement) -> Point {
    let center_x = reference.x + reference.width / 2.0 - floating.width / 2.0;
    let center_y = reference.y + reference.height / 2.0 - floating.height / 2.0;

    let mut point = match placement.side {
        Side::Top => Point::new(center_x, reference.y - floating.height),
        Side::Bottom => Point::new(center_x, reference.bottom()),
        Side::Left => Point::new(reference.x - floating.width, center_y),
        Side::Right => Point::new(reference.right(), center_y),
    };

    match (placement.side.is_vertical(), placement.alignment) {
        (true, Some(Alignment::Start)) => point.x = reference.x,
        (true, Some(Alignment::End)) => point.x = reference.right() - floating.width,
        (false, Some(Alignment::Start)) => point.y = reference.y,
        (false, Some(Alignment::End)) => point.y = reference.bottom() - floating.height,
        (_, None) => {}
    }

    point
}

fn offset_coords(reference: Rect, floating: Size, placement: Placement, offset: Offset) -> Point {
    let mut point = base_coords(reference, floating, placement);
    match placement.side {
        Side::Top => point.y -= offset.main_axis,
        Side::Bottom => point.y += offset.main_axis,
        Side::Left => point.x -= offset.main_axis,
        Side::Right => point.x += offset.main_axis,
    }
    if placement.side.is_vertical() {
        point.x += offset.cross_axis;
    } else {
        point.y += offset.cross_axis;
    }
    point
}

/// How far the floating element sticks out of the viewport on its main side.
fn main_overflow(point: Point, floating: Size, viewport: Rect, side: Side) -> f64 {
    let overflow = match side {
        Side::Top => viewport.y - point.y,
        Side::Bottom => point.y + floating.height - viewport.bottom(),
        Side::Left => viewport.x - point.x,
        Side::Right => point.x + floating.width - viewport.right(),
    };
    overflow.max(0.0)
}

fn clamp_axis(value: f64, length: f64, start: f64, end: f64, padding: f64) -> f64 {
    let min = start + padding;
    let max = end - padding - length;
    if max < min { min } else { value.clamp(min, max) }
}

/// Trigger button: inside the target's bottom-right corner, or vertically
/// centred when the target is too short to fit it with insets.
pub fn button_placement(config: &OverlayConfig) -> PlacementConfig {
    let size = config.button_size;
    let inset = config.button_inset;
    PlacementConfig::new(Placement::aligned(Side::Bottom, Alignment::End)).with_offset(move |reference| {
        let main_axis = if reference.height < size + 2.0 * inset {
            -(reference.height + size) / 2.0
        } else {
            -(size + inset)
        };
        Offset::new(main_axis, -inset)
    })
}

/// Tooltip: below the button, flipping above and shifting inside the viewport.
pub fn tooltip_placement(config: &OverlayConfig) -> PlacementConfig {
    PlacementConfig::new(Placement::new(Side::Bottom))
        .with_flip()
        .with_shift(config.tooltip_padding)
}
