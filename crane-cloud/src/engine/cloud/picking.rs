use bevy::prelude::*;

/// A crane close enough to the pointer ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointHit {
    pub index: usize,
    /// World distance from the ray origin to the closest point on the ray.
    pub distance: f32,
}

/// Ray query parameters shared by every crane in the cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickSettings {
    pub threshold: f32,
    pub near: f32,
    pub far: f32,
}

/// All cranes within `threshold` of the ray, nearest first.
///
/// The ray is taken into the cloud's local space so positions never have to be
/// re-transformed. Equal distances keep ascending index order.
pub fn intersect_points(
    ray: Ray3d,
    positions: &[Vec3],
    cloud_transform: &GlobalTransform,
    settings: PickSettings,
) -> Vec<PointHit> {
    let local_from_world = cloud_transform.compute_matrix().inverse();
    let origin = local_from_world.transform_point3(ray.origin);
    let direction = local_from_world
        .transform_vector3(ray.direction.as_vec3())
        .normalize_or_zero();
    if direction == Vec3::ZERO {
        return Vec::new();
    }

    let scale = cloud_transform.scale();
    let local_threshold = settings.threshold / ((scale.x + scale.y + scale.z) / 3.0);
    let threshold_sq = local_threshold * local_threshold;

    let mut hits: Vec<PointHit> = positions
        .iter()
        .enumerate()
        .filter_map(|(index, &position)| {
            // Points behind the origin measure against the origin itself.
            let t = (position - origin).dot(direction).max(0.0);
            let closest = origin + direction * t;
            let distance_sq = closest.distance_squared(position);
            if distance_sq >= threshold_sq {
                return None;
            }

            let distance = ray.origin.distance(cloud_transform.transform_point(closest));
            if distance < settings.near || distance > settings.far {
                return None;
            }

            Some(PointHit { index, distance })
        })
        .collect();

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

pub fn nearest_hit(
    ray: Ray3d,
    positions: &[Vec3],
    cloud_transform: &GlobalTransform,
    settings: PickSettings,
) -> Option<PointHit> {
    intersect_points(ray, positions, cloud_transform, settings)
        .into_iter()
        .next()
}
