use glitter_ngin::{
    cgmath::{InnerSpace, Point3, Vector3},
    resources::mesh::{MeshData, PrimitiveData, parse_obj, unit_cube},
};

#[test]
fn unit_cube_faces_point_outwards() {
    let cube = unit_cube();
    assert_eq!(cube.bounds.min, Point3::new(-0.5, -0.5, -0.5));
    assert_eq!(cube.bounds.max, Point3::new(0.5, 0.5, 0.5));
    assert_eq!(cube.index_count(), 36);

    let primitive = &cube.primitives[0];
    assert_eq!(primitive.vertices.len(), 24);
    for triangle in primitive.indices.chunks(3) {
        let [a, b, c] = [0, 1, 2].map(|i| primitive.vertices[triangle[i] as usize]);
        let p0 = Vector3::from(a.position);
        let face_normal = (Vector3::from(b.position) - p0).cross(Vector3::from(c.position) - p0);
        let normal = Vector3::from(a.normal);
        assert!(face_normal.dot(normal) > 0.0);
        // outward: the normal points away from the centre
        assert!(p0.dot(normal) > 0.0);
    }
}

#[test]
fn obj_bounds_fold_all_vertices() {
    let obj = "v 0 0 0\nv 1 0 0\nv 0 2 -1\nf 1 2 3\n";
    let mesh = futures::executor::block_on(parse_obj("triangle.obj", obj)).unwrap();
    assert_eq!(mesh.index_count(), 3);
    assert_eq!(mesh.bounds.min, Point3::new(0.0, 0.0, -1.0));
    assert_eq!(mesh.bounds.max, Point3::new(1.0, 2.0, 0.0));
}

#[test]
fn meshes_without_vertices_are_rejected() {
    assert!(futures::executor::block_on(parse_obj("empty.obj", "")).is_err());
    assert!(MeshData::new("empty", vec![PrimitiveData::default()]).is_err());
}
