//! Mirror reflection ray trace
//!
//! Static geometry: rays fall from the top of the viewport onto a mirror
//! lying across the lower part, centred on a vertical optical axis. Angles
//! are screen angles (radians, `atan2(dy, dx)` with y growing downward).

use std::f64::consts::FRAC_PI_2;

use glam::DVec2;

use super::params::{self, ParameterSet, whole};
use super::simulation::Simulate;
use super::snapshot::{MarkerKind, RenderSnapshot, Stroke};
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::settings::{Settings, Viewport};

/// Points used to draw a curved mirror surface
const SURFACE_SAMPLES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorKind {
    Flat,
    Concave,
    Convex,
}

impl MirrorKind {
    pub fn from_index(index: f64) -> Self {
        match whole(index, 0, 2) {
            0 => MirrorKind::Flat,
            1 => MirrorKind::Concave,
            _ => MirrorKind::Convex,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorKind::Flat => "flat",
            MirrorKind::Concave => "concave",
            MirrorKind::Convex => "convex",
        }
    }
}

/// One traced ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracedRay {
    pub source: DVec2,
    /// Point of incidence on the mirror surface
    pub hit: DVec2,
    /// Direction of the surface normal (toward the incoming side)
    pub normal_angle: f64,
    /// Direction from the hit point back toward the source
    pub incidence_angle: f64,
    /// Direction of the reflected ray, `2·normal − incidence`
    pub reflected_angle: f64,
    pub reflected_end: DVec2,
    /// Backward extension behind a convex mirror (drawn dashed)
    pub virtual_end: Option<DVec2>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalPoint {
    pub pos: DVec2,
    /// Real for concave mirrors, virtual for convex
    pub real: bool,
}

/// Complete trace for the current parameters
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorTrace {
    pub rays: Vec<TracedRay>,
    pub focal: Option<FocalPoint>,
    pub surface: Vec<DVec2>,
}

#[derive(Debug, Clone)]
pub struct MirrorReflection {
    /// Raw `mirrorType` knob; see [`MirrorKind::from_index`]
    pub mirror_type: f64,
    pub curvature: f64,
    /// Angle of incidence from the optical axis (degrees)
    pub angle: f64,
    /// Raw `rays` knob
    pub rays: f64,
    viewport: Viewport,
}

impl MirrorReflection {
    pub fn new(params: &ParameterSet, settings: &Settings) -> Self {
        Self {
            mirror_type: params.value("mirrorType"),
            curvature: params.value("curvature"),
            angle: params.value("angle"),
            rays: params.value("rays"),
            viewport: settings.viewport,
        }
    }

    pub fn kind(&self) -> MirrorKind {
        MirrorKind::from_index(self.mirror_type)
    }

    pub fn ray_count(&self) -> usize {
        whole(self.rays, 1, 10) as usize
    }

    /// Radius of curvature (px)
    pub fn radius(&self) -> f64 {
        MIRROR_BASE_RADIUS / self.curvature
    }

    /// Where the optical axis meets the mirror
    pub fn vertex(&self) -> DVec2 {
        DVec2::new(self.viewport.width / 2.0, self.viewport.height * 0.8)
    }

    fn source_row(&self) -> f64 {
        self.viewport.height * 0.1
    }

    /// Centre of curvature for curved mirrors
    pub fn center_of_curvature(&self) -> Option<DVec2> {
        let v = self.vertex();
        match self.kind() {
            MirrorKind::Flat => None,
            MirrorKind::Concave => Some(v - DVec2::new(0.0, self.radius())),
            MirrorKind::Convex => Some(v + DVec2::new(0.0, self.radius())),
        }
    }

    /// Focal point at `R/2` from the vertex
    pub fn focal_point(&self) -> Option<FocalPoint> {
        let v = self.vertex();
        let f = self.radius() / 2.0;
        match self.kind() {
            MirrorKind::Flat => None,
            MirrorKind::Concave => Some(FocalPoint {
                pos: v - DVec2::new(0.0, f),
                real: true,
            }),
            MirrorKind::Convex => Some(FocalPoint {
                pos: v + DVec2::new(0.0, f),
                real: false,
            }),
        }
    }

    /// Ray offsets from the axis at the mirror, evenly spaced
    fn offsets(&self) -> Vec<f64> {
        let n = self.ray_count();
        let half = match self.kind() {
            MirrorKind::Flat => MIRROR_HALF_APERTURE,
            _ => MIRROR_HALF_APERTURE.min(0.8 * self.radius()),
        };
        if n == 1 {
            return vec![0.0];
        }
        (0..n)
            .map(|i| -half + 2.0 * half * i as f64 / (n - 1) as f64)
            .collect()
    }

    /// Arc point at horizontal offset `dx` from the axis
    fn arc_point(&self, center: DVec2, dx: f64) -> DVec2 {
        let r = self.radius();
        let psi = (dx / r).clamp(-1.0, 1.0).asin();
        match self.kind() {
            MirrorKind::Convex => center + polar_to_cartesian(r, -FRAC_PI_2 + psi),
            _ => center + polar_to_cartesian(r, FRAC_PI_2 - psi),
        }
    }

    /// Trace every ray
    pub fn trace(&self) -> MirrorTrace {
        let vertex = self.vertex();
        let top = self.source_row();
        let incidence = self.angle.to_radians();
        let dir_in = DVec2::new(incidence.sin(), incidence.cos());
        let reflected_len = self.viewport.height;
        let center = self.center_of_curvature();

        let rays = self
            .offsets()
            .into_iter()
            .map(|dx| {
                let (source, hit, normal_angle) = match center {
                    None => {
                        // line intersection with y = vertex.y
                        let drop = vertex.y - top;
                        let source = DVec2::new(vertex.x + dx - drop * incidence.tan(), top);
                        let hit = source + dir_in * (drop / incidence.cos());
                        (source, hit, -FRAC_PI_2)
                    }
                    Some(c) => {
                        let hit = self.arc_point(c, dx);
                        let source = hit - dir_in * ((hit.y - top) / incidence.cos());
                        let normal = match self.kind() {
                            MirrorKind::Convex => hit - c,
                            _ => c - hit,
                        };
                        (source, hit, normal.y.atan2(normal.x))
                    }
                };

                let back = source - hit;
                let incidence_angle = back.y.atan2(back.x);
                let reflected_angle = 2.0 * normal_angle - incidence_angle;
                let out = DVec2::new(reflected_angle.cos(), reflected_angle.sin());
                let virtual_end =
                    (self.kind() == MirrorKind::Convex).then(|| hit - out * self.radius());

                TracedRay {
                    source,
                    hit,
                    normal_angle,
                    incidence_angle,
                    reflected_angle,
                    reflected_end: hit + out * reflected_len,
                    virtual_end,
                }
            })
            .collect();

        MirrorTrace {
            rays,
            focal: self.focal_point(),
            surface: self.surface(),
        }
    }

    fn surface(&self) -> Vec<DVec2> {
        let vertex = self.vertex();
        let half = self.viewport.width * 0.3;
        match self.center_of_curvature() {
            None => vec![vertex - DVec2::new(half, 0.0), vertex + DVec2::new(half, 0.0)],
            Some(c) => {
                let extent = half.min(self.radius());
                (0..SURFACE_SAMPLES)
                    .map(|i| {
                        let t = i as f64 / (SURFACE_SAMPLES - 1) as f64;
                        self.arc_point(c, -extent + 2.0 * extent * t)
                    })
                    .collect()
            }
        }
    }
}

impl Simulate for MirrorReflection {
    /// Static trace; time does not enter
    fn update(&mut self, _dt: f64) {}

    fn update_parameter(&mut self, name: &str, value: f64) -> bool {
        match name {
            "mirrorType" => self.mirror_type = value,
            "curvature" => self.curvature = value,
            "angle" => self.angle = value,
            "rays" => self.rays = value,
            _ => return false,
        }
        true
    }

    fn parameters(&self) -> ParameterSet {
        let mut set = ParameterSet::from_specs(params::MIRROR_REFLECTION);
        set.set("mirrorType", self.mirror_type);
        set.set("curvature", self.curvature);
        set.set("angle", self.angle);
        set.set("rays", self.rays);
        set
    }

    fn reset(&mut self) {}

    fn sample(&self) -> RenderSnapshot {
        let trace = self.trace();
        let vertex = self.vertex();

        let mut snap = RenderSnapshot::new();
        snap.polyline(trace.surface, Stroke::Solid).dashed(
            DVec2::new(vertex.x, 0.0),
            DVec2::new(vertex.x, self.viewport.height),
        );
        for ray in &trace.rays {
            snap.line(ray.source, ray.hit)
                .line(ray.hit, ray.reflected_end)
                .marker(ray.hit, 3.0, MarkerKind::Incidence);
            if let Some(end) = ray.virtual_end {
                snap.dashed(ray.hit, end);
            }
        }
        if let Some(focal) = trace.focal {
            let kind = if focal.real {
                MarkerKind::Focus
            } else {
                MarkerKind::VirtualFocus
            };
            snap.marker(focal.pos, 5.0, kind)
                .readout("focalLength", self.radius() / 2.0);
        }
        snap.readout("incidenceAngle", self.angle)
            .readout("rays", self.ray_count() as f64);
        snap
    }
}
