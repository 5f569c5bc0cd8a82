use glam::{Vec2, Vec3};
use petalfx::config::CameraConfig;
use petalfx::mesh::{quad, uv_sphere};
use petalfx::pointer::{direction_from, Camera, PointerState};

#[test]
fn client_coordinates_map_to_ndc_with_y_up() {
    let centre = PointerState::from_client(400.0, 300.0, 800.0, 600.0);
    assert_eq!(centre.ndc(), Some(Vec2::ZERO));
    let top_left = PointerState::from_client(0.0, 0.0, 800.0, 600.0);
    assert_eq!(top_left.ndc(), Some(Vec2::new(-1.0, 1.0)));
    assert_eq!(top_left.to_client(800.0, 600.0), Some(Vec2::ZERO));
}

#[test]
fn zero_sized_viewport_has_no_pointer() {
    assert_eq!(PointerState::from_client(10.0, 10.0, 0.0, 600.0), PointerState::Absent);
    assert_eq!(PointerState::Absent.to_client(800.0, 600.0), None);
}

#[test]
fn centre_of_screen_unprojects_to_world_origin() {
    let camera = Camera::new(CameraConfig::default(), 16.0 / 9.0);
    let hit = camera.unproject_to_plane(Vec2::ZERO).unwrap();
    assert!(hit.length() < 1e-3, "hit {hit}");
}

#[test]
fn unprojected_point_lands_on_the_plane_and_reprojects() {
    let camera = Camera::new(CameraConfig::default(), 1.5);
    let ndc = Vec2::new(0.5, -0.25);
    let hit = camera.unproject_to_plane(ndc).unwrap();
    assert!(hit.z.abs() < 1e-3);
    assert!(hit.x > 0.0 && hit.y < 0.0);
    let back = camera.view_projection().project_point3(hit);
    assert!((back.truncate() - ndc).length() < 1e-3);
}

#[test]
fn absent_pointer_has_no_world_position() {
    let camera = Camera::new(CameraConfig::default(), 1.0);
    assert_eq!(camera.pointer_world(PointerState::Absent), None);
}

#[test]
fn bad_aspect_falls_back_to_square() {
    let square = Camera::new(CameraConfig::default(), 1.0).projection();
    let mut camera = Camera::new(CameraConfig::default(), 0.0);
    assert_eq!(camera.projection(), square);
    camera.set_aspect(f32::NAN);
    assert!(camera.projection().is_finite());
    assert_eq!(camera.projection(), square);
}

#[test]
fn coincident_points_have_no_direction() {
    assert!(direction_from(Vec3::ONE, Vec3::ONE).is_none());
    let (dir, dist) = direction_from(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0)).unwrap();
    assert!((dist - 5.0).abs() < 1e-6);
    assert!((dir.length() - 1.0).abs() < 1e-6);
}

#[test]
fn meshes_index_only_their_own_vertices() {
    for mesh in [uv_sphere(1.0, 8, 6), quad(1.0)] {
        let count = mesh.vertex_count();
        assert!(mesh.indices.iter().all(|&i| (i as usize) < count));
        assert_eq!(mesh.indices.len() % 3, 0);
    }
    let sphere = uv_sphere(2.0, 8, 6);
    for v in sphere.positions.chunks(3) {
        assert!((Vec3::from_slice(v).length() - 2.0).abs() < 1e-4);
    }
}
