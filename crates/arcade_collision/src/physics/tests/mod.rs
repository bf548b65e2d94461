//! Scenario tests for the resolvers against small hand-built arenas


use crate::foundation::math::{utils, Mat4, Vec3};
use crate::physics::{Collider, ColliderConfig, MeshData, SourceMesh};
use crate::scene::SceneNode;
use crate::spatial::BvhConfig;

/// Two-triangle quad through four corners (in order around the rim)
pub(super) fn quad(corners: [Vec3; 4]) -> MeshData {
    MeshData::indexed(corners.to_vec(), vec![0, 1, 2, 0, 2, 3])
}

/// Vertical wall filling the plane x = `x` around the origin
pub(super) fn wall_x(x: f32) -> MeshData {
    quad([
        Vec3::new(x, -1.0, -10.0),
        Vec3::new(x, -1.0, 10.0),
        Vec3::new(x, 5.0, 10.0),
        Vec3::new(x, 5.0, -10.0),
    ])
}

/// Vertical wall filling the plane z = `z` around the origin
pub(super) fn wall_z(z: f32) -> MeshData {
    quad([
        Vec3::new(-10.0, -1.0, z),
        Vec3::new(-10.0, 5.0, z),
        Vec3::new(10.0, 5.0, z),
        Vec3::new(10.0, -1.0, z),
    ])
}

/// Collider over a single wall at x = `x`
pub(super) fn single_wall_collider(x: f32) -> Collider {
    let meshes = [SourceMesh::new("wall", wall_x(x), Mat4::identity())];
    Collider::from_meshes(&meshes, Mat4::identity(), &BvhConfig::default())
        .expect("wall produces geometry")
}

/// Square room (walls at +/-5 on X and Z), a ground plane and a 1x1 pillar
/// at (-2, 0, -2). Built through the scene path with the default filter.
pub(super) fn arena() -> Collider {
    let ground = quad([
        Vec3::new(-10.0, 0.0, -10.0),
        Vec3::new(-10.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, -10.0),
    ]);

    let pillar_faces = [
        wall_x(0.5),
        wall_x(-0.5),
        wall_z(0.5),
        wall_z(-0.5),
    ]
    .into_iter()
    .map(|mut face| {
        // Shrink each face to the pillar footprint
        for p in &mut face.positions {
            p.x = p.x.clamp(-0.5, 0.5);
            p.z = p.z.clamp(-0.5, 0.5);
        }
        face
    });

    let mut pillar = SceneNode::new("pillar").with_transform(utils::translation(-2.0, 0.0, -2.0));
    for (i, face) in pillar_faces.enumerate() {
        pillar.add_child(SceneNode::new(format!("pillar_face_{i}")).with_mesh(face));
    }

    let scene = SceneNode::new("arena")
        .with_child(SceneNode::new("Ground").with_mesh(ground))
        .with_child(SceneNode::new("wall_east").with_mesh(wall_x(5.0)))
        .with_child(SceneNode::new("wall_west").with_mesh(wall_x(-5.0)))
        .with_child(SceneNode::new("wall_north").with_mesh(wall_z(5.0)))
        .with_child(SceneNode::new("wall_south").with_mesh(wall_z(-5.0)))
        .with_child(pillar);

    Collider::from_scene(&scene, &ColliderConfig::default()).expect("arena produces geometry")
}
