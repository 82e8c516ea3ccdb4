//! Environment collaborator: статическая геометрия мира + геометрические запросы
//!
//! Line-of-sight и трассировка прицела спрашивают `Environment` (trait object,
//! подменяется внешним движком). Overlap по акторам - обычные ECS запросы
//! через `actors_in_radius`.

use bevy::prelude::*;

/// Статическая геометрия, блокирующая взгляд и прицел
pub trait WorldGeometry: Send + Sync {
    /// Первая точка пересечения отрезка from → to с геометрией (None - чисто)
    fn line_trace(&self, from: Vec3, to: Vec3) -> Option<Vec3>;
}

/// Resource-обёртка над геометрией мира
#[derive(Resource)]
pub struct Environment {
    geometry: Box<dyn WorldGeometry>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(StaticObstacles::default())
    }
}

impl Environment {
    pub fn new(geometry: impl WorldGeometry + 'static) -> Self {
        Self {
            geometry: Box::new(geometry),
        }
    }

    pub fn line_trace(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        self.geometry.line_trace(from, to)
    }

    pub fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        self.line_trace(from, to).is_none()
    }
}

/// Препятствие статической геометрии
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    Sphere { center: Vec3, radius: f32 },
    Box { min: Vec3, max: Vec3 },
}

impl Obstacle {
    /// Параметр t ∈ [0, 1] первого пересечения отрезка origin + t * delta
    fn intersect(&self, origin: Vec3, delta: Vec3) -> Option<f32> {
        match *self {
            Obstacle::Sphere { center, radius } => {
                let a = delta.length_squared();
                if a <= f32::EPSILON {
                    return (origin.distance(center) <= radius).then_some(0.0);
                }
                let m = origin - center;
                let b = m.dot(delta);
                let c = m.length_squared() - radius * radius;
                if c <= 0.0 {
                    // Начало внутри сферы
                    return Some(0.0);
                }
                let discriminant = b * b - a * c;
                if discriminant < 0.0 {
                    return None;
                }
                let t = (-b - discriminant.sqrt()) / a;
                (0.0..=1.0).contains(&t).then_some(t)
            }
            Obstacle::Box { min, max } => {
                // Slab test
                let mut t_min = 0.0_f32;
                let mut t_max = 1.0_f32;
                for axis in 0..3 {
                    let o = origin[axis];
                    let d = delta[axis];
                    if d.abs() <= f32::EPSILON {
                        if o < min[axis] || o > max[axis] {
                            return None;
                        }
                        continue;
                    }
                    let inv = 1.0 / d;
                    let mut t1 = (min[axis] - o) * inv;
                    let mut t2 = (max[axis] - o) * inv;
                    if t1 > t2 {
                        std::mem::swap(&mut t1, &mut t2);
                    }
                    t_min = t_min.max(t1);
                    t_max = t_max.min(t2);
                    if t_min > t_max {
                        return None;
                    }
                }
                Some(t_min)
            }
        }
    }
}

/// Простейшая геометрия: список сфер и боксов
#[derive(Debug, Clone, Default)]
pub struct StaticObstacles {
    pub obstacles: Vec<Obstacle>,
}

impl StaticObstacles {
    pub fn with(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }
}

impl WorldGeometry for StaticObstacles {
    fn line_trace(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        let delta = to - from;
        self.obstacles
            .iter()
            .filter_map(|obstacle| obstacle.intersect(from, delta))
            .min_by(|a, b| a.total_cmp(b))
            .map(|t| from + delta * t)
    }
}

/// Sphere overlap по акторам: (entity, distance), отсортировано по дистанции,
/// при равенстве - по Entity (детерминизм)
pub fn actors_in_radius<'a>(
    center: Vec3,
    radius: f32,
    actors: impl IntoIterator<Item = (Entity, &'a Transform)>,
) -> Vec<(Entity, f32)> {
    let mut found: Vec<(Entity, f32)> = actors
        .into_iter()
        .map(|(entity, transform)| (entity, transform.translation.distance(center)))
        .filter(|(_, distance)| *distance <= radius)
        .collect();

    found.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    found
}

/// Пересечение луча с вертикальной капсулой актора
///
/// Возвращает (t вдоль луча ∈ [0, 1], точку на луче у оси капсулы).
pub fn ray_capsule_hit(
    origin: Vec3,
    delta: Vec3,
    center: Vec3,
    half_height: f32,
    radius: f32,
) -> Option<(f32, Vec3)> {
    let axis_start = center - Vec3::Y * half_height;
    let axis_delta = Vec3::Y * (2.0 * half_height);

    let (s, t) = closest_params(origin, delta, axis_start, axis_delta);
    let on_ray = origin + delta * s;
    let on_axis = axis_start + axis_delta * t;

    (on_ray.distance(on_axis) <= radius).then_some((s, on_ray))
}

/// Параметры ближайших точек двух отрезков p1 + s*d1, p2 + t*d2 (s, t ∈ [0, 1])
fn closest_params(p1: Vec3, d1: Vec3, p2: Vec3, d2: Vec3) -> (f32, f32) {
    let r = p1 - p2;
    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let f = d2.dot(r);

    if a <= f32::EPSILON && e <= f32::EPSILON {
        return (0.0, 0.0);
    }
    if a <= f32::EPSILON {
        return (0.0, (f / e).clamp(0.0, 1.0));
    }

    let c = d1.dot(r);
    if e <= f32::EPSILON {
        return ((-c / a).clamp(0.0, 1.0), 0.0);
    }

    let b = d1.dot(d2);
    let denom = a * e - b * b;
    let mut s = if denom > f32::EPSILON {
        ((b * f - c * e) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut t = (b * s + f) / e;

    if t < 0.0 {
        t = 0.0;
        s = (-c / a).clamp(0.0, 1.0);
    } else if t > 1.0 {
        t = 1.0;
        s = ((b - c) / a).clamp(0.0, 1.0);
    }
    (s, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_world_has_line_of_sight() {
        let environment = Environment::default();
        assert!(environment.has_line_of_sight(Vec3::ZERO, Vec3::new(1000.0, 0.0, 0.0)));
    }

    #[test]
    fn test_box_blocks_line_of_sight() {
        let geometry = StaticObstacles::default().with(Obstacle::Box {
            min: Vec3::new(400.0, -100.0, -100.0),
            max: Vec3::new(500.0, 300.0, 100.0),
        });
        let environment = Environment::new(geometry);

        let hit = environment.line_trace(Vec3::ZERO, Vec3::new(1000.0, 0.0, 0.0));
        assert_eq!(hit, Some(Vec3::new(400.0, 0.0, 0.0)));

        // Над боксом - видно
        assert!(environment.has_line_of_sight(Vec3::new(0.0, 500.0, 0.0), Vec3::new(1000.0, 500.0, 0.0)));
    }

    #[test]
    fn test_sphere_blocks_line_of_sight() {
        let geometry = StaticObstacles::default().with(Obstacle::Sphere {
            center: Vec3::new(500.0, 0.0, 0.0),
            radius: 50.0,
        });

        let hit = geometry.line_trace(Vec3::ZERO, Vec3::new(1000.0, 0.0, 0.0));
        assert!(hit.is_some_and(|point| (point.x - 450.0).abs() < 0.01));
        assert!(geometry.line_trace(Vec3::ZERO, Vec3::new(400.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_actors_in_radius_sorted() {
        let near = Transform::from_xyz(100.0, 0.0, 0.0);
        let mid = Transform::from_xyz(1000.0, 0.0, 0.0);
        let far = Transform::from_xyz(3000.0, 0.0, 0.0);

        let found = actors_in_radius(
            Vec3::ZERO,
            2000.0,
            [
                (Entity::from_raw(3), &far),
                (Entity::from_raw(2), &mid),
                (Entity::from_raw(1), &near),
            ],
        );

        let entities: Vec<Entity> = found.iter().map(|(entity, _)| *entity).collect();
        assert_eq!(entities, vec![Entity::from_raw(1), Entity::from_raw(2)]);
    }

    #[test]
    fn test_ray_hits_capsule() {
        let origin = Vec3::new(0.0, 50.0, 0.0);
        let delta = Vec3::new(0.0, 0.0, -1000.0);

        let hit = ray_capsule_hit(origin, delta, Vec3::new(0.0, 0.0, -500.0), 96.0, 42.0);
        let (t, point) = hit.expect("ray passes through capsule axis");
        assert!((t - 0.5).abs() < 0.01);
        assert!((point.y - 50.0).abs() < 0.01);

        // Мимо (в стороне на 200)
        assert!(ray_capsule_hit(origin, delta, Vec3::new(200.0, 0.0, -500.0), 96.0, 42.0).is_none());
    }
}
