//! Ordered observation store with linear lookup between recorded points.

use std::fmt;

use super::mapper::map;

/// Where an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Supplied by the caller.
    Original,
    /// Produced by a forecast.
    Synthesized,
}

impl Origin {
    /// Lower-case label used in exports and trace lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Original => "original",
            Origin::Synthesized => "synthesized",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `(x, y)` point of the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Abscissa, unique within a store.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
    /// Original input or forecast output.
    pub origin: Origin,
}

impl Observation {
    /// Creates an observation.
    pub fn new(x: f64, y: f64, origin: Origin) -> Self {
        Self { x, y, origin }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={:>10.4}  y={:>12.6}  [{}]",
            self.x, self.y, self.origin
        )
    }
}

/// Outcome of an insertion attempt, carrying the neighbours involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// The store was empty.
    AsFirst,
    /// Appended after the previous maximum.
    AfterLast(Observation),
    /// Prepended before the previous minimum.
    BeforeFirst(Observation),
    /// Inserted between two existing neighbours.
    Between(Observation, Observation),
    /// An observation with the same abscissa already exists; nothing changed.
    Duplicate(Observation),
    /// The abscissa is NaN and has no place in the order.
    Unordered,
}

impl Placement {
    /// Whether the observation was actually stored.
    pub fn is_inserted(&self) -> bool {
        !matches!(self, Placement::Duplicate(_) | Placement::Unordered)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::AsFirst => f.write_str("as first"),
            Placement::AfterLast(p) => write!(f, "after last ({:.6}, {:.6})", p.x, p.y),
            Placement::BeforeFirst(p) => write!(f, "before first ({:.6}, {:.6})", p.x, p.y),
            Placement::Between(l, r) => write!(
                f,
                "between ({:.6}, {:.6}) and ({:.6}, {:.6})",
                l.x, l.y, r.x, r.y
            ),
            Placement::Duplicate(p) => write!(f, "rejected, collides with ({:.6}, {:.6})", p.x, p.y),
            Placement::Unordered => f.write_str("rejected, abscissa is NaN"),
        }
    }
}

/// Observations kept sorted by strictly increasing, unique abscissa.
///
/// # Examples
///
/// ```
/// use analog_forecast::analog::store::{ObservationStore, Origin};
///
/// let mut store = ObservationStore::new();
/// assert!(store.insert(2.0, 20.0, Origin::Original));
/// assert!(store.insert(1.0, 10.0, Origin::Original));
/// assert!(!store.insert(1.0, 99.0, Origin::Original));
///
/// assert_eq!(store.len(), 2);
/// assert_eq!(store.value_at(1.5), 15.0);
/// assert_eq!(store.value_at(-5.0), 10.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObservationStore {
    points: Vec<Observation>,
}

impl ObservationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `(x, y)` in sorted position.
    ///
    /// Returns `false` without touching the store when `x` is already present
    /// (or is NaN).
    pub fn insert(&mut self, x: f64, y: f64, origin: Origin) -> bool {
        self.place(x, y, origin).is_inserted()
    }

    /// Inserts `(x, y)` and reports where it went.
    pub fn place(&mut self, x: f64, y: f64, origin: Origin) -> Placement {
        if x.is_nan() {
            return Placement::Unordered;
        }
        let new = Observation::new(x, y, origin);

        let Some(last) = self.points.last().copied() else {
            self.points.push(new);
            return Placement::AsFirst;
        };

        if x > last.x {
            self.points.push(new);
            return Placement::AfterLast(last);
        }

        // First index whose abscissa is >= x.
        let idx = self.points.partition_point(|p| p.x < x);
        let right = self.points[idx];
        if right.x == x {
            return Placement::Duplicate(right);
        }

        self.points.insert(idx, new);
        if idx == 0 {
            Placement::BeforeFirst(right)
        } else {
            Placement::Between(self.points[idx - 1], right)
        }
    }

    /// Ordinate at `x`: flat outside the recorded domain, linear inside it,
    /// exact at recorded abscissas. Returns `0.0` for an empty store and NaN
    /// for a NaN abscissa.
    pub fn value_at(&self, x: f64) -> f64 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return 0.0;
        };
        if x.is_nan() {
            return f64::NAN;
        }
        if x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        // `next` is the first point with `x <= next.x`; `prev.x < x` follows.
        let idx = self.points.partition_point(|p| p.x < x);
        let prev = self.points[idx - 1];
        let next = self.points[idx];
        map(x, prev.x, prev.y, next.x, next.y)
    }

    /// Number of stored observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the store holds no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observation with the smallest abscissa.
    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }

    /// Observation with the largest abscissa.
    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    /// Observation at position `index` in abscissa order.
    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.points.get(index)
    }

    /// Iterates in increasing abscissa order.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.points.iter()
    }

    /// All observations in increasing abscissa order.
    pub fn as_slice(&self) -> &[Observation] {
        &self.points
    }
}

impl<'a> IntoIterator for &'a ObservationStore {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
