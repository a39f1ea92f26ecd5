use glam::Vec2;

/// Vertex for CPU-built line geometry. Two vertices per segment.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    /// Premultiplied RGBA.
    pub color: [f32; 4],
}

/// A dot marking every Nth point of a recorded route.
#[derive(Debug, Clone, Copy)]
pub struct Waypoint {
    pub position: [f32; 2],
    pub radius: f32,
}

/// Every how many route points a waypoint dot is placed.
const WAYPOINT_INTERVAL: usize = 10;
const WAYPOINT_RADIUS: f32 = 3.0;

/// Route polyline color (muted blue, faint).
const ROUTE_COLOR: (f32, f32, f32, f32) = (0.18, 0.56, 0.9, 0.3);
/// Waypoint dot color (deep violet, opaque).
const WAYPOINT_COLOR: (f32, f32, f32, f32) = (0.22, 0.10, 0.9, 1.0);
/// Pet-to-target sight line color (olive, opaque).
const SIGHT_COLOR: (f32, f32, f32, f32) = (0.5, 0.7, 0.0, 1.0);

fn premultiplied((r, g, b, a): (f32, f32, f32, f32)) -> [f32; 4] {
    [r * a, g * a, b * a, a]
}

/// Append the single debug line from the pet to its target.
pub fn sight_line(pet: Vec2, target: Vec2, out: &mut Vec<LineVertex>) {
    let color = premultiplied(SIGHT_COLOR);
    out.push(LineVertex {
        position: pet.into(),
        color,
    });
    out.push(LineVertex {
        position: target.into(),
        color,
    });
}

/// Build the preview geometry for a recorded route: one faint segment per
/// consecutive point pair, plus a waypoint dot every few points.
pub fn route_preview(route: &[Vec2], lines: &mut Vec<LineVertex>, dots: &mut Vec<Waypoint>) {
    let color = premultiplied(ROUTE_COLOR);
    for pair in route.windows(2) {
        lines.push(LineVertex {
            position: pair[0].into(),
            color,
        });
        lines.push(LineVertex {
            position: pair[1].into(),
            color,
        });
    }

    for (i, point) in route.iter().enumerate() {
        if i % WAYPOINT_INTERVAL == 0 {
            dots.push(Waypoint {
                position: (*point).into(),
                radius: WAYPOINT_RADIUS,
            });
        }
    }
}

/// The dot color, for hosts that draw the waypoints.
pub fn waypoint_color() -> [f32; 4] {
    premultiplied(WAYPOINT_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sight_line_is_one_segment() {
        let mut out = Vec::new();
        sight_line(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, [1.0, 2.0]);
        assert_eq!(out[1].position, [3.0, 4.0]);
    }

    #[test]
    fn route_preview_counts() {
        let route: Vec<Vec2> = (0..25).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let mut lines = Vec::new();
        let mut dots = Vec::new();
        route_preview(&route, &mut lines, &mut dots);

        // 24 segments, 2 vertices each; dots at points 0, 10 and 20.
        assert_eq!(lines.len(), 48);
        assert_eq!(dots.len(), 3);
        assert_eq!(dots[1].position, [10.0, 0.0]);
    }

    #[test]
    fn empty_and_single_point_routes_build_nothing_but_dots() {
        let mut lines = Vec::new();
        let mut dots = Vec::new();
        route_preview(&[], &mut lines, &mut dots);
        assert!(lines.is_empty());
        assert!(dots.is_empty());

        route_preview(&[Vec2::ZERO], &mut lines, &mut dots);
        assert!(lines.is_empty());
        assert_eq!(dots.len(), 1);
    }

    #[test]
    fn route_color_is_premultiplied() {
        let route = [Vec2::ZERO, Vec2::X];
        let mut lines = Vec::new();
        route_preview(&route, &mut lines, &mut Vec::new());
        let [r, _, _, a] = lines[0].color;
        assert!((a - 0.3).abs() < 1e-6);
        assert!((r - 0.18 * 0.3).abs() < 1e-6);
    }
}
