use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use bevy::render::render_asset::RenderAssetUsages;

pub const VERTICES_PER_QUAD: usize = 4;

const QUAD_UVS: [[f32; 2]; VERTICES_PER_QUAD] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Corner offsets of a camera-facing quad, counter-clockwise from bottom left.
pub fn quad_corners(right: Vec3, up: Vec3, size: f32) -> [Vec3; VERTICES_PER_QUAD] {
    let half_right = right * (size * 0.5);
    let half_up = up * (size * 0.5);
    [
        -half_right - half_up,
        half_right - half_up,
        half_right + half_up,
        -half_right + half_up,
    ]
}

/// One quad per point, positions collapsed until the first billboard pass.
///
/// Kept in the main world too, since positions and colours are rewritten on the
/// CPU every frame.
pub fn create_billboard_mesh(colours: &[LinearRgba]) -> Mesh {
    let count = colours.len();
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());

    let positions = vec![[0.0_f32; 3]; count * VERTICES_PER_QUAD];
    let uvs: Vec<[f32; 2]> = (0..count).flat_map(|_| QUAD_UVS).collect();
    let vertex_colours: Vec<[f32; 4]> = colours
        .iter()
        .flat_map(|colour| [colour.to_f32_array(); VERTICES_PER_QUAD])
        .collect();
    let indices: Vec<u32> = (0..count as u32)
        .flat_map(|quad| QUAD_INDICES.map(|i| quad * VERTICES_PER_QUAD as u32 + i))
        .collect();

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, vertex_colours);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Re-face every quad toward the camera. `right` and `up` are in mesh space.
pub fn write_billboard_positions(mesh: &mut Mesh, centres: &[Vec3], right: Vec3, up: Vec3, size: f32) {
    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
    else {
        warn!("Billboard mesh has no Float32x3 positions");
        return;
    };

    let corners = quad_corners(right, up, size);
    for (quad, centre) in positions.chunks_exact_mut(VERTICES_PER_QUAD).zip(centres) {
        for (vertex, corner) in quad.iter_mut().zip(corners) {
            *vertex = (*centre + corner).to_array();
        }
    }
}

pub fn write_billboard_colours(mesh: &mut Mesh, colours: &[LinearRgba]) {
    let Some(VertexAttributeValues::Float32x4(vertex_colours)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_COLOR)
    else {
        warn!("Billboard mesh has no Float32x4 colours");
        return;
    };

    for (quad, colour) in vertex_colours.chunks_exact_mut(VERTICES_PER_QUAD).zip(colours) {
        quad.fill(colour.to_f32_array());
    }
}
