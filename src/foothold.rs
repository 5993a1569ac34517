//! Foothold geometry: the piecewise-linear ground and wall model.
//!
//! A foothold is a directed segment between two dots. Chained footholds form
//! platforms; segments with equal X endpoints are walls. The map owns the
//! footholds in an arena indexed by [`FootholdId`], and motion controllers
//! only ever hold ids or short-lived copies obtained through
//! [`FootholdQuery`].

use std::fmt;

use glam::DVec2;
use hashbrown::HashMap;
use ordered_float::OrderedFloat;

use crate::constants::DEGENERATE_SPAN;

/// Stable identity of a foothold within a loaded map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FootholdId(pub i32);

impl fmt::Display for FootholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fh#{}", self.0)
    }
}

impl From<i32> for FootholdId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Horizontal direction of travel or facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Towards negative X.
    Left,
    /// Towards positive X.
    #[default]
    Right,
}

impl Direction {
    /// Direction of a signed horizontal quantity, or `None` for zero.
    #[must_use]
    pub fn of(value: f64) -> Option<Self> {
        if value < 0.0 {
            Some(Self::Left)
        } else if value > 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Endpoints of a foothold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First dot.
    pub first: DVec2,
    /// Second dot.
    pub second: DVec2,
}

impl Segment {
    /// Creates a segment from its two dots.
    #[must_use]
    pub const fn new(first: DVec2, second: DVec2) -> Self {
        Self { first, second }
    }

    /// Whether the segment is vertical.
    #[must_use]
    pub fn is_wall(&self) -> bool {
        (self.second.x - self.first.x).abs() < DEGENERATE_SPAN
    }

    /// Whether the segment is inclined.
    #[must_use]
    pub fn is_slope(&self) -> bool {
        self.first.y != self.second.y
    }

    /// Smallest X of the two dots.
    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.first.x.min(self.second.x)
    }

    /// Largest X of the two dots.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.first.x.max(self.second.x)
    }

    /// Smallest Y of the two dots.
    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.first.y.min(self.second.y)
    }

    /// Largest Y of the two dots.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.first.y.max(self.second.y)
    }

    /// Whether `x` lies within the horizontal span, endpoints included.
    #[must_use]
    pub fn spans_x(&self, x: f64) -> bool {
        (self.min_x()..=self.max_x()).contains(&x)
    }

    /// Whether `y` lies within the vertical span, endpoints included.
    #[must_use]
    pub fn spans_y(&self, y: f64) -> bool {
        (self.min_y()..=self.max_y()).contains(&y)
    }

    /// Ground height at `x`.
    ///
    /// Linear interpolation between the dots with the parameter clamped to
    /// the segment, so queries past either end return the nearer dot's Y. A
    /// vertical segment returns the first dot's Y.
    ///
    /// # Examples
    /// ```
    /// use glam::DVec2;
    /// use ledge::foothold::Segment;
    /// let slope = Segment::new(DVec2::new(0.0, 0.0), DVec2::new(100.0, 50.0));
    /// assert_eq!(slope.interpolate_y(50.0), 25.0);
    /// let wall = Segment::new(DVec2::new(10.0, 7.0), DVec2::new(10.0, 90.0));
    /// assert_eq!(wall.interpolate_y(-3.0), 7.0);
    /// ```
    #[must_use]
    pub fn interpolate_y(&self, x: f64) -> f64 {
        let Self { first, second } = *self;
        let span = second.x - first.x;
        if span.abs() < DEGENERATE_SPAN {
            return first.y;
        }
        let t = ((x - first.x) / span).clamp(0.0, 1.0);
        first.y + (second.y - first.y) * t
    }

    /// The dot lying towards `direction`.
    #[must_use]
    pub fn end_toward(&self, direction: Direction) -> DVec2 {
        let second_is_right = self.second.x >= self.first.x;
        match (direction, second_is_right) {
            (Direction::Right, true) | (Direction::Left, false) => self.second,
            (Direction::Right, false) | (Direction::Left, true) => self.first,
        }
    }
}

/// A foothold as stored in the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootholdLine {
    /// Stable identity.
    pub id: FootholdId,
    /// Endpoints.
    pub segment: Segment,
    /// Platform (group) number shared by chained footholds.
    pub platform: i32,
    /// Render layer the foothold belongs to.
    pub layer: i32,
    /// Foothold linked at the first dot.
    pub prev: Option<FootholdId>,
    /// Foothold linked at the second dot.
    pub next: Option<FootholdId>,
    /// Entities cannot pass through this foothold.
    pub cant_through: bool,
    /// Jumping down through this foothold is not allowed.
    pub forbid_fall_down: bool,
    /// Conveyor force applied along the foothold.
    pub force: f64,
    /// Piece number used by map tooling.
    pub piece: i32,
}

impl FootholdLine {
    /// Creates an unlinked foothold on platform 0.
    #[must_use]
    pub const fn new(id: FootholdId, first: DVec2, second: DVec2) -> Self {
        Self {
            id,
            segment: Segment::new(first, second),
            platform: 0,
            layer: 0,
            prev: None,
            next: None,
            cant_through: false,
            forbid_fall_down: false,
            force: 0.0,
            piece: 0,
        }
    }

    /// Sets the platform number.
    #[must_use]
    pub const fn on_platform(mut self, platform: i32) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the links at the first and second dot.
    #[must_use]
    pub const fn linked(mut self, prev: Option<FootholdId>, next: Option<FootholdId>) -> Self {
        self.prev = prev;
        self.next = next;
        self
    }

    /// Whether the foothold is a wall.
    #[must_use]
    pub fn is_wall(&self) -> bool {
        self.segment.is_wall()
    }

    /// Whether the foothold is inclined.
    #[must_use]
    pub fn is_slope(&self) -> bool {
        self.segment.is_slope()
    }

    /// Ground height at `x`; see [`Segment::interpolate_y`].
    #[must_use]
    pub fn interpolate_y(&self, x: f64) -> f64 {
        self.segment.interpolate_y(x)
    }

    /// Id of the foothold linked at the end facing `direction`.
    #[must_use]
    pub fn link_toward(&self, direction: Direction) -> Option<FootholdId> {
        let second_is_right = self.segment.second.x >= self.segment.first.x;
        match (direction, second_is_right) {
            (Direction::Right, true) | (Direction::Left, false) => self.next,
            (Direction::Right, false) | (Direction::Left, true) => self.prev,
        }
    }
}

/// Ground height at `x` on `line`.
#[must_use]
pub fn interpolate_y(line: &FootholdLine, x: f64) -> f64 {
    line.interpolate_y(x)
}

/// Scans `lines` for the nearest walkable support at or just above `(x, y)`.
///
/// Non-wall footholds spanning `x` are candidates. With
/// `d = interpolated_y - y`, a candidate qualifies if
/// `0 <= d < search_range` or `-upward_tolerance <= d < 0`. The one with
/// the smallest `|d|` wins.
pub fn find_support_below<'a>(
    lines: impl IntoIterator<Item = &'a FootholdLine>,
    x: f64,
    y: f64,
    search_range: f64,
    upward_tolerance: f64,
) -> Option<&'a FootholdLine> {
    lines
        .into_iter()
        .filter(|line| !line.is_wall() && line.segment.spans_x(x))
        .filter_map(|line| {
            let d = line.interpolate_y(x) - y;
            let below = (0.0..search_range).contains(&d);
            let slightly_above = d < 0.0 && d >= -upward_tolerance;
            (below || slightly_above).then_some((line, d.abs()))
        })
        .min_by_key(|(_, distance)| OrderedFloat(*distance))
        .map(|(line, _)| line)
}

/// Rectangle limiting floating entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    /// Smallest X.
    pub left: f64,
    /// Smallest Y.
    pub top: f64,
    /// Largest X.
    pub right: f64,
    /// Largest Y.
    pub bottom: f64,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl MapBounds {
    /// Bounds that never clamp.
    pub const UNBOUNDED: Self = Self {
        left: f64::NEG_INFINITY,
        top: f64::NEG_INFINITY,
        right: f64::INFINITY,
        bottom: f64::INFINITY,
    };

    /// Creates bounds, normalising swapped edges.
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Clamps `position` into the rectangle.
    #[must_use]
    pub fn clamp(&self, position: DVec2) -> DVec2 {
        position.clamp(
            DVec2::new(self.left, self.top),
            DVec2::new(self.right, self.bottom),
        )
    }
}

/// Read-only geometry access used by motion controllers.
///
/// Lines are returned by value so controllers never borrow the map across
/// ticks.
#[cfg_attr(test, mockall::automock)]
pub trait FootholdQuery {
    /// Looks up a foothold by id.
    fn foothold(&self, id: FootholdId) -> Option<FootholdLine>;

    /// Nearest support at or just above `(x, y)`, ignoring `exclude`.
    ///
    /// See [`find_support_below`] for the acceptance rule.
    fn support_below(
        &self,
        x: f64,
        y: f64,
        search_range: f64,
        upward_tolerance: f64,
        exclude: Option<FootholdId>,
    ) -> Option<FootholdLine>;

    /// The foothold linked to `id` at its end facing `direction`.
    fn neighbor_toward(&self, id: FootholdId, direction: Direction) -> Option<FootholdLine>;
}

/// Arena of footholds with an id index.
#[derive(Debug, Clone, Default)]
pub struct FootholdMap {
    lines: Vec<FootholdLine>,
    index: HashMap<FootholdId, usize>,
}

impl FootholdMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `line`, returning the foothold it replaced.
    pub fn insert(&mut self, line: FootholdLine) -> Option<FootholdLine> {
        if let Some(slot) = self.index.get(&line.id).and_then(|&i| self.lines.get_mut(i)) {
            return Some(std::mem::replace(slot, line));
        }
        self.index.insert(line.id, self.lines.len());
        self.lines.push(line);
        None
    }

    /// Removes the foothold with `id`.
    pub fn remove(&mut self, id: FootholdId) -> Option<FootholdLine> {
        let slot = self.index.remove(&id)?;
        if slot >= self.lines.len() {
            return None;
        }
        let removed = self.lines.swap_remove(slot);
        if let Some(moved) = self.lines.get(slot) {
            self.index.insert(moved.id, slot);
        }
        Some(removed)
    }

    /// Borrows the foothold with `id`.
    #[must_use]
    pub fn get(&self, id: FootholdId) -> Option<&FootholdLine> {
        self.index.get(&id).and_then(|&i| self.lines.get(i))
    }

    /// Number of footholds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the map holds no footholds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterates over all footholds in insertion order, modulo removals.
    pub fn iter(&self) -> impl Iterator<Item = &FootholdLine> {
        self.lines.iter()
    }

    /// Iterates over the footholds of one platform.
    pub fn platform(&self, platform: i32) -> impl Iterator<Item = &FootholdLine> {
        self.lines.iter().filter(move |line| line.platform == platform)
    }

    /// Nearest support at or just above `(x, y)`.
    #[must_use]
    pub fn find_support_below(
        &self,
        x: f64,
        y: f64,
        search_range: f64,
        upward_tolerance: f64,
    ) -> Option<&FootholdLine> {
        find_support_below(&self.lines, x, y, search_range, upward_tolerance)
    }

    /// Like [`Self::find_support_below`], considering only footholds
    /// accepted by `keep`.
    pub fn find_support_below_where(
        &self,
        x: f64,
        y: f64,
        search_range: f64,
        upward_tolerance: f64,
        mut keep: impl FnMut(&FootholdLine) -> bool,
    ) -> Option<&FootholdLine> {
        find_support_below(
            self.lines.iter().filter(|line| keep(line)),
            x,
            y,
            search_range,
            upward_tolerance,
        )
    }

    /// Nearest wall at or left of `x` whose vertical span contains `y`.
    #[must_use]
    pub fn find_wall_left(&self, x: f64, y: f64) -> Option<&FootholdLine> {
        self.walls_at(y)
            .filter(|line| line.segment.first.x <= x)
            .max_by_key(|line| OrderedFloat(line.segment.first.x))
    }

    /// Nearest wall at or right of `x` whose vertical span contains `y`.
    #[must_use]
    pub fn find_wall_right(&self, x: f64, y: f64) -> Option<&FootholdLine> {
        self.walls_at(y)
            .filter(|line| line.segment.first.x >= x)
            .min_by_key(|line| OrderedFloat(line.segment.first.x))
    }

    fn walls_at(&self, y: f64) -> impl Iterator<Item = &FootholdLine> {
        self.lines
            .iter()
            .filter(move |line| line.is_wall() && line.segment.spans_y(y))
    }

    /// Smallest rectangle containing every foothold.
    #[must_use]
    pub fn extent(&self) -> Option<MapBounds> {
        let mut lines = self.lines.iter();
        let first = lines.next()?;
        let seed = MapBounds::new(
            first.segment.min_x(),
            first.segment.min_y(),
            first.segment.max_x(),
            first.segment.max_y(),
        );
        Some(lines.fold(seed, |acc, line| MapBounds {
            left: acc.left.min(line.segment.min_x()),
            top: acc.top.min(line.segment.min_y()),
            right: acc.right.max(line.segment.max_x()),
            bottom: acc.bottom.max(line.segment.max_y()),
        }))
    }
}

impl FromIterator<FootholdLine> for FootholdMap {
    fn from_iter<I: IntoIterator<Item = FootholdLine>>(iter: I) -> Self {
        let mut map = Self::new();
        for line in iter {
            map.insert(line);
        }
        map
    }
}

impl FootholdQuery for FootholdMap {
    fn foothold(&self, id: FootholdId) -> Option<FootholdLine> {
        self.get(id).copied()
    }

    fn support_below(
        &self,
        x: f64,
        y: f64,
        search_range: f64,
        upward_tolerance: f64,
        exclude: Option<FootholdId>,
    ) -> Option<FootholdLine> {
        self.find_support_below_where(x, y, search_range, upward_tolerance, |line| {
            Some(line.id) != exclude
        })
        .copied()
    }

    fn neighbor_toward(&self, id: FootholdId, direction: Direction) -> Option<FootholdLine> {
        let link = self.get(id)?.link_toward(direction)?;
        self.get(link).copied()
    }
}
