//! Background sky: a textured sphere drawn by its own camera behind the scene.
//!
//! The sphere lives on a separate render layer and is drawn first, so the
//! clouds are never hidden by it however far they drift. A missing or broken
//! texture is reported once and otherwise ignored.

use bevy::asset::LoadState;
use bevy::camera::visibility::RenderLayers;
use bevy::prelude::*;

use crate::camera::FlyCamera;
use crate::constants::{CLEAR_COLOR, sky};

/// Render layer reserved for the sky sphere
pub const SKY_RENDER_LAYER: usize = 1;

pub struct SkyPlugin;

impl Plugin for SkyPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(CLEAR_COLOR))
            .add_systems(Startup, spawn_sky.after(crate::camera::spawn_fly_camera))
            .add_systems(Update, (watch_sky_texture, sync_sky_projection));
    }
}

#[derive(Component)]
pub struct SkySphere;

/// Camera that draws only the sky, parented to the fly camera.
#[derive(Component)]
pub struct SkyCamera;

/// Progress of the sky texture load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkyStatus {
    #[default]
    Pending,
    Ready,
    Failed,
}

impl SkyStatus {
    /// Fold an asset load state into the status. Settled states never change.
    pub fn advance(self, state: &LoadState) -> Self {
        match (self, state) {
            (Self::Pending, LoadState::Loaded) => Self::Ready,
            (Self::Pending, LoadState::Failed(_)) => Self::Failed,
            (status, _) => status,
        }
    }
}

#[derive(Resource)]
pub struct SkyTexture {
    pub handle: Handle<Image>,
    pub status: SkyStatus,
}

pub fn sky_material(texture: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        unlit: true,
        cull_mode: None,
        ..default()
    }
}

fn spawn_sky(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    fly_camera: Query<(Entity, &Projection), With<FlyCamera>>,
) {
    let texture: Handle<Image> = asset_server.load(sky::TEXTURE);
    let layer = RenderLayers::layer(SKY_RENDER_LAYER);

    commands.spawn((
        Name::new("Sky"),
        SkySphere,
        Mesh3d(meshes.add(Sphere::new(sky::RADIUS).mesh().uv(sky::SECTORS, sky::STACKS))),
        MeshMaterial3d(materials.add(sky_material(texture.clone()))),
        // Mirrored so the texture reads correctly from inside.
        Transform::from_scale(Vec3::new(-1.0, 1.0, 1.0)),
        layer.clone(),
    ));

    commands.insert_resource(SkyTexture {
        handle: texture,
        status: SkyStatus::Pending,
    });

    let Ok((camera, projection)) = fly_camera.single() else {
        warn!("No fly camera found; sky will not be drawn");
        return;
    };

    commands.entity(camera).insert(Camera {
        clear_color: ClearColorConfig::None,
        ..default()
    });
    let sky_camera = commands
        .spawn((
            Name::new("Sky Camera"),
            SkyCamera,
            Camera3d::default(),
            Camera {
                order: -1,
                ..default()
            },
            projection.clone(),
            Transform::default(),
            layer,
        ))
        .id();
    commands.entity(camera).add_child(sky_camera);
}

fn watch_sky_texture(asset_server: Res<AssetServer>, texture: Option<ResMut<SkyTexture>>) {
    let Some(mut texture) = texture else {
        return;
    };
    if texture.status != SkyStatus::Pending {
        return;
    }

    let state = asset_server.load_state(&texture.handle);
    texture.status = texture.status.advance(&state);
    match (&state, texture.status) {
        (LoadState::Failed(err), _) => {
            warn!("Sky texture '{}' failed to load: {}", sky::TEXTURE, err);
        }
        (_, SkyStatus::Ready) => info!("Sky texture loaded"),
        _ => {}
    }
}

/// Keep the sky camera's field of view in step with the fly camera.
fn sync_sky_projection(
    fly_camera: Query<&Projection, (With<FlyCamera>, Changed<Projection>)>,
    mut sky_camera: Query<&mut Projection, (With<SkyCamera>, Without<FlyCamera>)>,
) {
    let Ok(projection) = fly_camera.single() else {
        return;
    };
    for mut sky in &mut sky_camera {
        *sky = projection.clone();
    }
}
