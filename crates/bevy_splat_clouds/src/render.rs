//! Bridge from the controller's splat set to a Bevy mesh.
//!
//! Each splat is drawn as a small octahedron scaled by the splat's extents,
//! coloured per vertex with the splat's alpha. The mesh entity is disposable:
//! every rebuild despawns it and spawns a fresh one, while per-frame drift
//! only re-uploads positions.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use crate::controller::CloudController;
use crate::splats::{SplatRecord, SplatSet};

/// Octahedron corners on the unit axes.
const CORNERS: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

/// Eight outward-facing triangles over [`CORNERS`].
const FACES: [[u32; 3]; 8] = [
    [0, 2, 4],
    [4, 2, 1],
    [1, 2, 5],
    [5, 2, 0],
    [4, 3, 0],
    [1, 3, 4],
    [5, 3, 1],
    [0, 3, 5],
];

pub const VERTICES_PER_SPLAT: usize = CORNERS.len();

/// Parent of the cloud mesh; carries the cloud's placement in the scene.
#[derive(Component)]
pub struct CloudRoot;

/// The disposable mesh child for one controller generation.
#[derive(Component)]
pub struct CloudMesh {
    pub generation: u64,
}

/// Shared material for all cloud meshes.
#[derive(Resource)]
pub struct CloudMaterial(pub Handle<StandardMaterial>);

/// What is currently on screen.
#[derive(Resource, Default)]
pub struct RenderedCloud {
    pub generation: Option<u64>,
    entity: Option<Entity>,
    mesh: Option<Handle<Mesh>>,
}

pub fn cloud_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        cull_mode: None,
        ..default()
    }
}

fn splat_positions(splat: &SplatRecord) -> impl Iterator<Item = [f32; 3]> + '_ {
    CORNERS
        .iter()
        .map(move |corner| (splat.center + splat.rotation * (*corner * splat.scale)).to_array())
}

/// Vertex positions for every splat, in splat order.
pub fn positions(splats: &SplatSet) -> Vec<[f32; 3]> {
    splats.iter().flat_map(splat_positions).collect()
}

/// Build a triangle mesh with one octahedron per splat.
pub fn build_cloud_mesh(splats: &SplatSet) -> Mesh {
    let n = splats.len() * VERTICES_PER_SPLAT;
    let mut normals = Vec::with_capacity(n);
    let mut colors = Vec::with_capacity(n);
    let mut indices = Vec::with_capacity(splats.len() * FACES.len() * 3);

    for (index, splat) in splats.iter().enumerate() {
        let base = (index * VERTICES_PER_SPLAT) as u32;
        let rgba = [splat.color.x, splat.color.y, splat.color.z, splat.opacity];
        for corner in CORNERS {
            normals.push((splat.rotation * corner).to_array());
            colors.push(rgba);
        }
        for face in FACES {
            indices.extend(face.iter().map(|i| base + i));
        }
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions(splats))
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

/// Keep the on-screen mesh in step with the controller.
///
/// A new generation replaces the mesh entity; a dirty set of the same
/// generation only has its positions rewritten.
pub(crate) fn sync_cloud_mesh(
    mut commands: Commands,
    mut controller: ResMut<CloudController>,
    mut rendered: ResMut<RenderedCloud>,
    mut meshes: ResMut<Assets<Mesh>>,
    material: Res<CloudMaterial>,
    root: Single<Entity, With<CloudRoot>>,
) {
    let generation = controller.generation();

    if rendered.generation != Some(generation) {
        if let Some(entity) = rendered.entity.take() {
            commands.entity(entity).despawn();
        }
        if let Some(mesh) = rendered.mesh.take() {
            meshes.remove(&mesh);
        }

        if !controller.splats().is_empty() {
            let mesh = meshes.add(build_cloud_mesh(controller.splats()));
            let entity = commands
                .spawn((
                    Name::new("Cloud Splats"),
                    CloudMesh { generation },
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material.0.clone()),
                    Transform::default(),
                ))
                .id();
            commands.entity(*root).add_child(entity);
            rendered.entity = Some(entity);
            rendered.mesh = Some(mesh);
        }

        rendered.generation = Some(generation);
        controller.mark_rendered();
        return;
    }

    if !controller.splats().needs_update() {
        return;
    }

    if let Some(mesh) = rendered.mesh.as_ref().and_then(|handle| meshes.get_mut(handle)) {
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions(controller.splats()));
    }
    controller.mark_rendered();
}
