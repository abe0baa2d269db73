//! The gizmo part table.
//!
//! The cube is a shell of 26 clickable pieces (6 faces, 12 edges, 8 corners)
//! plus a wireframe decoration, and two rotation arrow halves that live in the
//! view plane. Parts are built once and addressed by [`PartId`].

use bevy::prelude::*;

use crate::arrows::RotationArrowRig;
use crate::hit_test::PartColors;
use crate::types::{ArrowSide, GizmoPart, PartId, PartKind, PartShape, ViewGizmoStyle};

/// Side length of the cube.
pub const CUBE_SIZE: f32 = 1.8;
/// Width of the edge and corner band, and depth of every shell piece.
pub const EDGE_SECTION_SIZE: f32 = 0.35;
/// Radius of the rotation arrow ring.
pub const ARROW_RADIUS: f32 = 1.9;
/// Half width of the clickable band around the arrow ring.
pub const ARROW_THICKNESS: f32 = 0.14;
/// Angle between the top of the ring and the start of each arrow.
pub const ARROW_GAP: f32 = 0.08;
/// Angle between the top of the ring and each arrow head.
pub const ARROW_SPAN: f32 = 0.8;

pub const WIREFRAME_NAME: &str = "Wireframe";

const X_LABELS: [&str; 2] = ["LEFT", "RIGHT"];
const Y_LABELS: [&str; 2] = ["BOTTOM", "TOP"];
const Z_LABELS: [&str; 2] = ["BACK", "FRONT"];

/// All parts of one gizmo.
#[derive(Resource, Debug, Clone)]
pub struct GizmoParts {
    parts: Vec<GizmoPart>,
    /// Placement and visibility of the rotation arrows.
    pub arrows: RotationArrowRig,
}

impl GizmoParts {
    pub fn new(style: &ViewGizmoStyle) -> Self {
        let mut builder = PartTableBuilder::default();
        let half = CUBE_SIZE * 0.5;
        let shell = half - EDGE_SECTION_SIZE * 0.5;
        let inner = half - EDGE_SECTION_SIZE;
        let band = EDGE_SECTION_SIZE * 0.5;

        // A piece is picked by a sign per axis: 0 spans the inner region,
        // +/-1 sits in the outer band on that side.
        for sx in -1..=1 {
            for sy in -1..=1 {
                for sz in -1..=1 {
                    let signs = IVec3::new(sx, sy, sz);
                    let outer = signs.abs().element_sum();
                    let kind = match outer {
                        1 => PartKind::Face,
                        2 => PartKind::Edge,
                        3 => PartKind::Corner,
                        _ => continue,
                    };
                    let dir = signs.as_vec3();
                    let center = dir * shell;
                    let half_extents = Vec3::select(
                        signs.cmpeq(IVec3::ZERO),
                        Vec3::splat(inner),
                        Vec3::splat(band),
                    );
                    let color = match kind {
                        PartKind::Face => style.face_color,
                        PartKind::Edge => style.edge_color,
                        _ => style.corner_color,
                    };
                    builder.push(
                        format!("{kind} {}", part_label(signs)),
                        kind,
                        Some(dir),
                        PartShape::Box {
                            center,
                            half_extents,
                        },
                        color,
                        true,
                        None,
                    );
                }
            }
        }

        builder.push(
            WIREFRAME_NAME.to_string(),
            PartKind::Decoration,
            None,
            PartShape::Box {
                center: Vec3::ZERO,
                half_extents: Vec3::splat(half),
            },
            style.wireframe_color,
            false,
            None,
        );

        for (side, start, end, name) in [
            (ArrowSide::Left, -ARROW_GAP, -ARROW_SPAN, "Arrow LEFT"),
            (ArrowSide::Right, ARROW_GAP, ARROW_SPAN, "Arrow RIGHT"),
        ] {
            builder.push(
                name.to_string(),
                PartKind::RotationArrow,
                None,
                PartShape::Arc {
                    radius: ARROW_RADIUS,
                    thickness: ARROW_THICKNESS,
                    start,
                    end,
                },
                style.arrow_color,
                true,
                Some(side),
            );
        }

        Self {
            parts: builder.parts,
            arrows: RotationArrowRig::default(),
        }
    }

    pub fn get(&self, id: PartId) -> Option<&GizmoPart> {
        self.parts.get(id.0)
    }

    #[cfg(test)]
    pub fn find(&self, name: &str) -> Option<&GizmoPart> {
        self.parts.iter().find(|part| part.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GizmoPart> {
        self.parts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Whether a part takes part in hit testing and drawing right now.
    pub fn is_visible(&self, part: &GizmoPart) -> bool {
        part.kind != PartKind::RotationArrow || self.arrows.visible
    }

    /// Drop every part. Ids handed out earlier become stale.
    pub fn clear(&mut self) {
        self.parts.clear();
        self.arrows = RotationArrowRig::default();
    }
}

impl PartColors for GizmoParts {
    fn part_color(&self, id: PartId) -> Option<Color> {
        self.get(id)
            .filter(|part| part.highlightable)
            .map(|part| part.color)
    }

    fn set_part_color(&mut self, id: PartId, color: Color) -> bool {
        match self.parts.get_mut(id.0) {
            Some(part) => {
                part.color = color;
                true
            }
            None => false,
        }
    }
}

#[derive(Default)]
struct PartTableBuilder {
    parts: Vec<GizmoPart>,
}

impl PartTableBuilder {
    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        name: String,
        kind: PartKind,
        bound_vector: Option<Vec3>,
        shape: PartShape,
        color: Color,
        highlightable: bool,
        arrow: Option<ArrowSide>,
    ) {
        let id = PartId(self.parts.len());
        self.parts.push(GizmoPart {
            id,
            name,
            kind,
            bound_vector,
            shape,
            color,
            highlightable,
            arrow,
        });
    }
}

fn part_label(signs: IVec3) -> String {
    let pick = |labels: [&'static str; 2], sign: i32| match sign {
        s if s < 0 => Some(labels[0]),
        s if s > 0 => Some(labels[1]),
        _ => None,
    };
    [
        pick(Y_LABELS, signs.y),
        pick(Z_LABELS, signs.z),
        pick(X_LABELS, signs.x),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> GizmoParts {
        GizmoParts::new(&ViewGizmoStyle::default())
    }

    #[test]
    fn table_has_every_piece_once() {
        let parts = parts();
        let count = |kind| parts.iter().filter(|p| p.kind == kind).count();
        assert_eq!(count(PartKind::Face), 6);
        assert_eq!(count(PartKind::Edge), 12);
        assert_eq!(count(PartKind::Corner), 8);
        assert_eq!(count(PartKind::Decoration), 1);
        assert_eq!(count(PartKind::RotationArrow), 2);
        assert_eq!(parts.iter().count(), 29);

        let mut names: Vec<_> = parts.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), parts.iter().count(), "part names must be unique");
    }

    #[test]
    fn ids_match_positions() {
        let parts = parts();
        for (i, part) in parts.iter().enumerate() {
            assert_eq!(part.id, PartId(i));
        }
    }

    #[test]
    fn faces_are_named_and_bound_outward() {
        let parts = parts();
        let front = parts.find("Face FRONT").expect("front face");
        assert_eq!(front.bound_vector, Some(Vec3::Z));
        let corner = parts.find("Corner TOP FRONT RIGHT").expect("corner");
        assert_eq!(corner.bound_vector, Some(Vec3::ONE));
        let edge = parts.find("Edge BOTTOM LEFT").expect("edge");
        assert_eq!(edge.bound_vector, Some(Vec3::new(-1.0, -1.0, 0.0)));
        assert!(parts.find(WIREFRAME_NAME).is_some_and(|p| p.bound_vector.is_none()));
    }

    #[test]
    fn decoration_is_not_highlightable() {
        let parts = parts();
        let wireframe = parts.find(WIREFRAME_NAME).expect("wireframe");
        assert_eq!(parts.part_color(wireframe.id), None);
        let face = parts.find("Face TOP").expect("top face");
        assert!(parts.part_color(face.id).is_some());
    }

    #[test]
    fn clear_makes_ids_stale() {
        let mut parts = parts();
        parts.clear();
        assert!(parts.is_empty());
        assert!(!parts.set_part_color(PartId(0), Color::WHITE));
    }
}
