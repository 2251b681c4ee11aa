//! Integration tests for scene and settings files.

use lightbake::prelude::*;
use lightbake::scene::cornell_box;

use std::io::Write;
use tempfile::NamedTempFile;

const TRIANGLE_SCENE: &str = r#"{
    "meshes": [
        {
            "name": "tri",
            "positions": [[0, 0, 0], [1, 0, 0], [0, 0, 1]],
            "lightmap_uvs": [[0, 0], [1, 0], [0, 1]],
            "subsets": [{ "indices": [0, 1, 2], "material": { "name": "grey", "diffuse": [0.5, 0.5, 0.5] } }]
        },
        {
            "positions": [[0, 1, 0], [0, 1, 1], [1, 1, 0]],
            "lightmap_uvs": [[0, 0], [0, 1], [1, 0]],
            "subsets": [{ "indices": [0, 1, 2] }]
        }
    ],
    "lights": [{ "type": "directional", "forward": [0, -1, 0], "color": [1, 1, 1], "intensity": 1.5 }],
    "camera": { "position": [0, 2, 4], "target": [0, 0, 0] }
}"#;

#[test]
fn test_load_scene_from_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(TRIANGLE_SCENE.as_bytes()).expect("Failed to write scene");

    let scene = Scene::load(file.path()).expect("Failed to load scene");
    let mesh = &scene.geometry.mesh;
    assert_eq!(mesh.num_vertices(), 6);
    assert_eq!(mesh.num_subsets(), 2);
    assert_eq!(mesh.indices(1), &[3, 4, 5]);
    assert_eq!(scene.lights.len(), 1);
    assert_eq!(scene.camera.position, Vec3::new(0.0, 2.0, 4.0));
    // Fields missing from the camera keep their defaults
    assert_eq!(scene.camera.up, Vec3::Y);

    // The second subset has no diffuse color and is not baked
    let mut baker = Lightmapper::new(BakeSettings {
        mip_levels: 2,
        indirect_source_level: 1,
        ..BakeSettings::with_resolution(8, 8)
    })
    .unwrap();
    let stats = baker.set_geometry(&scene.geometry).unwrap();
    assert_eq!(stats.skipped_subsets, 1);
    assert_eq!(stats.triangles, 1);
}

#[test]
fn test_missing_scene_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Scene::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_malformed_scene_is_json_error() {
    let err = Scene::from_json(r#"{ "meshes": [ { "positions": 3 } ] }"#).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn test_scene_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cornell.json");

    let desc = cornell_box();
    desc.save(&path).unwrap();
    let reloaded = SceneDesc::load(&path).unwrap();
    assert_eq!(reloaded, desc);

    let scene = reloaded.into_scene().unwrap();
    assert_eq!(scene.geometry.mesh.num_triangles(), 20);
    assert_eq!(scene.geometry.materials.len(), 10);
}

#[test]
fn test_settings_file_with_partial_fields() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "width": 64, "height": 32, "emissive": "material_channel" }}"#).unwrap();

    let settings = BakeSettings::load(file.path()).unwrap();
    assert_eq!((settings.width, settings.height), (64, 32));
    assert_eq!(settings.emissive, EmissiveSource::MaterialChannel);
    assert_eq!(settings.mip_levels, BakeSettings::default().mip_levels);
}

#[test]
fn test_settings_file_is_validated() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "width": 8, "height": 8, "mip_levels": 5 }}"#).unwrap();
    assert!(matches!(BakeSettings::load(file.path()), Err(Error::InvalidSettings(_))));
}

#[test]
fn test_settings_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = BakeSettings {
        ray_epsilon: 0.005,
        indirect_source_level: 2,
        ..BakeSettings::with_resolution(256, 128)
    };
    settings.save(&path).unwrap();
    assert_eq!(BakeSettings::load(&path).unwrap(), settings);
}

#[test]
fn test_demo_scene_bakes_cleanly() {
    let scene = cornell_box().into_scene().unwrap();
    let raycaster = TriangleRaycaster::from_geometry(&scene.geometry);

    let mut baker = Lightmapper::new(BakeSettings {
        mip_levels: 3,
        indirect_source_level: 2,
        ..BakeSettings::with_resolution(32, 32)
    })
    .unwrap();
    let stats = baker.set_geometry(&scene.geometry).unwrap();
    assert_eq!(stats.skipped_subsets, 0);
    assert!(stats.patches_per_level.iter().all(|&n| n > 0));

    baker.render_lights(&scene.lights, &raycaster);
    baker.render(&scene.camera, &raycaster);

    let out = baker.composite();
    assert_eq!(out.data.len(), 32 * 32);
    assert!(out.data.iter().all(|c| c.is_finite() && c.min_element() >= 0.0));
    assert_eq!(out.as_bytes().len(), 32 * 32 * 12);
    assert_eq!(out.to_rgba_f16().len(), 32 * 32);
}
