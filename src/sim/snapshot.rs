//! Render snapshots
//!
//! What a variant hands to the drawing layer: plain geometry in viewport
//! pixels plus named scalar readouts. Rebuilt on every `sample()` call.

use glam::DVec2;
use serde::Serialize;

/// Line style for segments and polylines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stroke {
    Solid,
    /// Construction lines, virtual rays, envelopes
    Dashed,
}

/// What a marker represents, so the host can pick a colour/shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    Pivot,
    Bob,
    Anchor,
    Mass,
    Body,
    Node,
    Incidence,
    /// Real focal point (concave mirror)
    Focus,
    /// Virtual focal point (convex mirror)
    VirtualFocus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: DVec2,
    pub to: DVec2,
    pub stroke: Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub pos: DVec2,
    pub radius: f64,
    pub kind: MarkerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub points: Vec<DVec2>,
    pub stroke: Stroke,
}

/// Named scalar for text overlays (energy, momentum, angles...)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Readout {
    pub name: &'static str,
    pub value: f64,
}

/// Drawing primitives for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub segments: Vec<Segment>,
    pub markers: Vec<Marker>,
    pub polylines: Vec<Polyline>,
    pub readouts: Vec<Readout>,
}

impl RenderSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, from: DVec2, to: DVec2) -> &mut Self {
        self.segments.push(Segment {
            from,
            to,
            stroke: Stroke::Solid,
        });
        self
    }

    pub fn dashed(&mut self, from: DVec2, to: DVec2) -> &mut Self {
        self.segments.push(Segment {
            from,
            to,
            stroke: Stroke::Dashed,
        });
        self
    }

    pub fn marker(&mut self, pos: DVec2, radius: f64, kind: MarkerKind) -> &mut Self {
        self.markers.push(Marker { pos, radius, kind });
        self
    }

    pub fn polyline(&mut self, points: Vec<DVec2>, stroke: Stroke) -> &mut Self {
        self.polylines.push(Polyline { points, stroke });
        self
    }

    pub fn readout(&mut self, name: &'static str, value: f64) -> &mut Self {
        self.readouts.push(Readout { name, value });
        self
    }

    /// Look up a readout by name
    pub fn value(&self, name: &str) -> Option<f64> {
        self.readouts.iter().find(|r| r.name == name).map(|r| r.value)
    }

    /// Markers of one kind, in insertion order
    pub fn markers_of(&self, kind: MarkerKind) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(move |m| m.kind == kind)
    }

    /// True when every coordinate is finite (readouts excluded; energy may
    /// legitimately degenerate for out-of-range parameters)
    pub fn geometry_is_finite(&self) -> bool {
        self.segments.iter().all(|s| s.from.is_finite() && s.to.is_finite())
            && self.markers.iter().all(|m| m.pos.is_finite())
            && self
                .polylines
                .iter()
                .all(|p| p.points.iter().all(|pt| pt.is_finite()))
    }
}
