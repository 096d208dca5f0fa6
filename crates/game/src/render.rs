//! World texture: one texel per cell, refreshed every frame.

use bevy::asset::RenderAssetUsages;
use bevy::camera::ScalingMode;
use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use sand_world::{CellPos, Materials, SandWorld, materialize};

#[derive(Component)]
pub struct GameCamera;

#[derive(Component)]
pub struct WorldSprite;

#[derive(Resource)]
pub struct WorldTexture(pub Handle<Image>);

pub struct WorldRenderPlugin;

impl Plugin for WorldRenderPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(Startup, setup_world_view)
      .add_systems(PostUpdate, upload_world);
  }
}

fn texture_size(width: u32, height: u32) -> Extent3d {
  Extent3d {
    width,
    height,
    depth_or_array_layers: 1,
  }
}

/// Creates an RGBA8 texture with nearest-neighbor sampling.
pub fn create_world_texture(images: &mut Assets<Image>, width: u32, height: u32) -> Handle<Image> {
  let mut image = Image::new_fill(
    texture_size(width, height),
    TextureDimension::D2,
    &[0, 0, 0, 0],
    TextureFormat::Rgba8UnormSrgb,
    RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
  );
  image.sampler = ImageSampler::nearest();
  images.add(image)
}

fn projection_for(width: u32, height: u32) -> Projection {
  Projection::Orthographic(OrthographicProjection {
    scaling_mode: ScalingMode::AutoMin {
      min_width: width as f32,
      min_height: height as f32,
    },
    ..OrthographicProjection::default_2d()
  })
}

fn setup_world_view(
  mut commands: Commands,
  mut images: ResMut<Assets<Image>>,
  world: Res<SandWorld>,
) {
  let (width, height) = (world.width(), world.height());
  let handle = create_world_texture(&mut images, width, height);

  commands.spawn((GameCamera, Camera2d, projection_for(width, height)));
  commands.spawn((
    WorldSprite,
    Sprite {
      image: handle.clone(),
      custom_size: Some(Vec2::new(width as f32, height as f32)),
      ..default()
    },
    Transform::default(),
  ));
  commands.insert_resource(WorldTexture(handle));
  info!("World view {}x{}", width, height);
}

/// Copies the completed grid into the texture, resizing after a level of a
/// different size was loaded.
fn upload_world(
  world: Res<SandWorld>,
  materials: Res<Materials>,
  texture: Option<Res<WorldTexture>>,
  mut images: ResMut<Assets<Image>>,
  mut sprites: Query<&mut Sprite, With<WorldSprite>>,
  mut cameras: Query<&mut Projection, With<GameCamera>>,
) {
  let Some(texture) = texture else {
    return;
  };
  let Some(image) = images.get_mut(&texture.0) else {
    return;
  };

  let (width, height) = (world.width(), world.height());
  if image.width() != width || image.height() != height {
    image.resize(texture_size(width, height));
    for mut sprite in &mut sprites {
      sprite.custom_size = Some(Vec2::new(width as f32, height as f32));
    }
    for mut projection in &mut cameras {
      *projection = projection_for(width, height);
    }
    info!("World view resized to {}x{}", width, height);
  }

  if let Some(ref mut data) = image.data {
    materialize(&world, &materials, data);
  }
}

/// Maps a point in sprite space (origin at the center, y up) to the cell
/// under it.
pub fn point_to_cell(point: Vec2, width: u32, height: u32) -> CellPos {
  let x = (point.x + width as f32 / 2.0).floor() as i32;
  let y = (height as f32 / 2.0 - point.y).floor() as i32;
  CellPos::new(x, y)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn corners_map_to_corner_cells() {
    assert_eq!(point_to_cell(Vec2::new(-50.0, 40.0), 100, 80), CellPos::new(0, 0));
    assert_eq!(
      point_to_cell(Vec2::new(49.5, -39.5), 100, 80),
      CellPos::new(99, 79)
    );
  }

  #[test]
  fn center_maps_to_middle_cell() {
    assert_eq!(point_to_cell(Vec2::ZERO, 10, 10), CellPos::new(5, 5));
    assert_eq!(point_to_cell(Vec2::new(-0.1, 0.1), 10, 10), CellPos::new(4, 4));
  }

  #[test]
  fn outside_points_give_outside_cells() {
    let cell = point_to_cell(Vec2::new(-60.0, 0.0), 100, 80);
    assert!(cell.x < 0);
  }
}
