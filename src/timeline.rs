//! Rainfall timeline editing. Every successful change hands the whole,
//! updated list to the registered listener before returning.

use crate::models::timeline::{RainfallPoint, TimelineField};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Drag handles move 5 px per hour / per mm.
pub const DRAG_PIXELS_PER_UNIT: f64 = 5.0;

pub type TimelineListener = Box<dyn Fn(&[RainfallPoint]) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
    #[error("no timeline point at index {index} (timeline has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A raw value from an input box: either already numeric or the text the
/// user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldInput {
    pub fn coerce(&self) -> Result<i64, TimelineError> {
        match self {
            FieldInput::Integer(v) => Ok(*v),
            FieldInput::Float(v) if v.is_finite() && v.abs() < i64::MAX as f64 => {
                Ok(v.trunc() as i64)
            }
            FieldInput::Float(v) => Err(TimelineError::NotANumber(v.to_string())),
            FieldInput::Text(s) => parse_leading_int(s),
        }
    }
}

/// Integer coercion for typed input: leading whitespace, an optional sign,
/// then as many decimal digits as there are. `"12abc"` is 12, `"abc"` fails.
pub fn parse_leading_int(raw: &str) -> Result<i64, TimelineError> {
    let not_a_number = || TimelineError::NotANumber(raw.to_string());
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return Err(not_a_number());
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add((b - b'0') as i64))
            .ok_or_else(not_a_number)?;
    }
    Ok(if negative { -value } else { value })
}

/// Position of a point's drag handle in chart pixels.
pub fn handle_position(point: &RainfallPoint) -> (f64, f64) {
    (
        point.time as f64 * DRAG_PIXELS_PER_UNIT,
        -(point.rainfall as f64) * DRAG_PIXELS_PER_UNIT,
    )
}

/// Data for a stepped line chart of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<i64>,
    pub data: Vec<i64>,
    pub stepped: &'static str,
}

pub struct RainfallTimeline {
    points: Vec<RainfallPoint>,
    listener: Option<TimelineListener>,
}

impl fmt::Debug for RainfallTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RainfallTimeline")
            .field("points", &self.points)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Default for RainfallTimeline {
    fn default() -> Self {
        Self::new(vec![RainfallPoint::default()])
    }
}

impl RainfallTimeline {
    pub fn new(points: Vec<RainfallPoint>) -> Self {
        Self {
            points,
            listener: None,
        }
    }

    /// Replaces any previously registered listener.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: Fn(&[RainfallPoint]) + Send + Sync + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn points(&self) -> &[RainfallPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append and re-sort by time. Points sharing a time keep insertion order.
    pub fn insert(&mut self, point: RainfallPoint) {
        self.points.push(point);
        self.points.sort_by_key(|p| p.time);
        self.notify();
    }

    /// Insert a point from the two "new point" input boxes.
    pub fn add_from_input(
        &mut self,
        time: &FieldInput,
        rainfall: &FieldInput,
    ) -> Result<RainfallPoint, TimelineError> {
        let point = RainfallPoint::new(time.coerce()?, rainfall.coerce()?);
        self.insert(point);
        Ok(point)
    }

    /// Set one field of a point as typed. The list is not re-sorted and
    /// negative values are kept.
    pub fn edit_field(
        &mut self,
        index: usize,
        field: TimelineField,
        value: &FieldInput,
    ) -> Result<RainfallPoint, TimelineError> {
        let value = value.coerce()?;
        let point = self.point_mut(index)?;
        match field {
            TimelineField::Time => point.time = value,
            TimelineField::Rainfall => point.rainfall = value,
        }
        let point = *point;
        self.notify();
        Ok(point)
    }

    pub fn remove(&mut self, index: usize) -> Result<RainfallPoint, TimelineError> {
        self.check_index(index)?;
        let removed = self.points.remove(index);
        self.notify();
        Ok(removed)
    }

    /// Move a point by a drag delta in chart pixels. Dragging right adds
    /// time, dragging up adds rainfall; both stop at zero.
    pub fn drag(
        &mut self,
        index: usize,
        delta_x: f64,
        delta_y: f64,
    ) -> Result<RainfallPoint, TimelineError> {
        let point = self.point_mut(index)?;
        point.time = dragged(point.time, delta_x);
        point.rainfall = dragged(point.rainfall, -delta_y);
        let point = *point;
        self.notify();
        Ok(point)
    }

    pub fn chart_series(&self) -> ChartSeries {
        ChartSeries {
            labels: self.points.iter().map(|p| p.time).collect(),
            data: self.points.iter().map(|p| p.rainfall).collect(),
            stepped: "before",
        }
    }

    fn check_index(&self, index: usize) -> Result<(), TimelineError> {
        if index < self.points.len() {
            Ok(())
        } else {
            Err(TimelineError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
        }
    }

    fn point_mut(&mut self, index: usize) -> Result<&mut RainfallPoint, TimelineError> {
        self.check_index(index)?;
        Ok(&mut self.points[index])
    }

    fn notify(&self) {
        if let Some(listener) = &self.listener {
            listener(&self.points);
        }
    }
}

/// Apply whole units only; a partial unit of movement leaves the axis alone.
fn dragged(value: i64, pixels: f64) -> i64 {
    let units = (pixels / DRAG_PIXELS_PER_UNIT).trunc();
    (value as f64 + units).max(0.0) as i64
}
