//! Thumb geometry: where the thumb sits and how tall it is.
//!
//! Everything here is pure. A [`ScrollRegion`] is a snapshot of the four
//! measurements that matter, and [`thumb_geometry`] maps it to a
//! [`ThumbGeometry`]. [`scroll_offset_for_thumb_top`] is the way back, used
//! while dragging.

/// Minimum thumb length in pixel units, keeping a draggable target on very
/// long content.
pub const MIN_THUMB_HEIGHT: f32 = 48.0;

/// A snapshot of one scrollable area.
///
/// `scroll_offset` is clamped into `[0, content_height - visible_height]` on
/// construction; negative or non-finite measurements are treated as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRegion {
    content_height: f32,
    visible_height: f32,
    scroll_offset: f32,
    track_height: f32,
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

impl ScrollRegion {
    /// A region scrolled to the top.
    pub fn new(content_height: f32, visible_height: f32, track_height: f32) -> Self {
        Self {
            content_height: sanitize(content_height),
            visible_height: sanitize(visible_height),
            scroll_offset: 0.0,
            track_height: sanitize(track_height),
        }
    }

    /// The same region at another scroll offset (clamped).
    pub fn with_scroll_offset(mut self, offset: f32) -> Self {
        self.scroll_offset = self.clamp_offset(offset);
        self
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn visible_height(&self) -> f32 {
        self.visible_height
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn track_height(&self) -> f32 {
        self.track_height
    }

    /// Largest valid scroll offset; zero when nothing overflows.
    pub fn max_scroll_offset(&self) -> f32 {
        (self.content_height - self.visible_height).max(0.0)
    }

    /// Whether the content overflows the viewport. When it doesn't, the
    /// scrollbar is hidden.
    pub fn is_scrollable(&self) -> bool {
        self.content_height > self.visible_height
    }

    /// Clamp an offset into the valid range. NaN maps to the top.
    pub fn clamp_offset(&self, offset: f32) -> f32 {
        if offset.is_nan() {
            0.0
        } else {
            offset.clamp(0.0, self.max_scroll_offset())
        }
    }
}

/// Thumb size and position along the track, in track-relative units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThumbGeometry {
    pub height: f32,
    pub offset: f32,
}

impl ThumbGeometry {
    /// Track-relative position of the thumb's bottom edge.
    pub fn bottom(&self) -> f32 {
        self.offset + self.height
    }

    /// Whether a track-relative position falls on the thumb.
    pub fn contains(&self, track_y: f32) -> bool {
        track_y >= self.offset && track_y < self.bottom()
    }

    /// Move the thumb to match `region`'s scroll offset while keeping its
    /// current height. This is what a scroll event does; only size changes
    /// recompute the height.
    pub fn reposition(&self, region: &ScrollRegion) -> ThumbGeometry {
        let track = region.track_height();
        let height = self.height.clamp(0.0, track);
        let range = region.content_height() - region.visible_height();
        if range <= 0.0 {
            return ThumbGeometry {
                height,
                offset: 0.0,
            };
        }
        let travel = track - height;
        ThumbGeometry {
            height,
            offset: (region.scroll_offset() / range * travel).clamp(0.0, travel),
        }
    }
}

/// Compute the thumb for a region.
///
/// `height = max(min_thumb_height, visible / content * track)`, capped at the
/// track; `offset` scales the scroll offset onto the remaining travel. A
/// region that cannot scroll gets a thumb filling the whole track.
pub fn thumb_geometry(region: &ScrollRegion, min_thumb_height: f32) -> ThumbGeometry {
    let track = region.track_height();
    let range = region.content_height() - region.visible_height();
    if range <= 0.0 || !range.is_finite() {
        return ThumbGeometry {
            height: track,
            offset: 0.0,
        };
    }

    let proportional = region.visible_height() / region.content_height() * track;
    let height = proportional.max(sanitize(min_thumb_height)).min(track);
    let travel = track - height;
    ThumbGeometry {
        height,
        offset: (region.scroll_offset() / range * travel).clamp(0.0, travel),
    }
}

/// How a dragged thumb position maps back to a scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMapping {
    /// Thumb travel (`track - thumb`) maps onto the scroll range. The exact
    /// inverse of [`thumb_geometry`]: the thumb stays under the pointer.
    #[default]
    ThumbTravel,
    /// The whole track maps onto the content height, clamped to the scroll
    /// range. Drifts from the pointer when the thumb is held at its minimum
    /// size.
    TrackProportional,
}

/// The scroll offset that puts the thumb's top edge at `thumb_top`
/// (track-relative).
pub fn scroll_offset_for_thumb_top(
    region: &ScrollRegion,
    thumb_height: f32,
    thumb_top: f32,
    mapping: DragMapping,
) -> f32 {
    let track = region.track_height();
    let relative = match mapping {
        DragMapping::ThumbTravel => {
            let travel = track - thumb_height.clamp(0.0, track);
            if travel <= 0.0 {
                return 0.0;
            }
            thumb_top / travel
        }
        DragMapping::TrackProportional => {
            if track <= 0.0 {
                return 0.0;
            }
            thumb_top / track
        }
    };
    let relative = if relative.is_nan() {
        0.0
    } else {
        relative.clamp(0.0, 1.0)
    };

    match mapping {
        DragMapping::ThumbTravel => relative * region.max_scroll_offset(),
        DragMapping::TrackProportional => region.clamp_offset(relative * region.content_height()),
    }
}
