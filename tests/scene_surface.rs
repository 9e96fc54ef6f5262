use egui::{Color32, Pos2};
use image::{Rgba, RgbaImage};
use markpad::element::{StampKind, factory};
use markpad::error::ExportError;
use markpad::geometry::fit;
use markpad::intake::{LoadedImage, decode_bytes};
use markpad::scene::{Scene, Surface};

fn loaded_image(width: u32, height: u32, pixel: [u8; 4]) -> LoadedImage {
    let image =
        image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(pixel)));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode test image");
    decode_bytes(&buffer.into_inner()).expect("decode test image")
}

fn ready_scene(width: u32, height: u32) -> Scene {
    let mut scene = Scene::new();
    let fitted = fit(1024.0, width as f32, height as f32);
    scene.set_dimensions(fitted.width, fitted.height);
    scene.set_background(loaded_image(width, height, [255, 255, 255, 255]), fitted);
    scene
}

#[test]
fn the_scene_is_drivable_through_the_surface_trait_object() {
    let mut scene = Scene::new();
    let surface: &mut dyn Surface = &mut scene;

    let fitted = fit(1024.0, 80.0, 40.0);
    surface.set_dimensions(fitted.width, fitted.height);
    surface.set_background(loaded_image(80, 40, [255, 255, 255, 255]), fitted);
    surface.add_element(factory::create_stamp(
        1,
        StampKind::Circle,
        Pos2::new(40.0, 20.0),
        Color32::RED,
        3.0,
    ));

    assert_eq!(surface.background_size(), Some((80, 40)));
    assert!(surface.export_png().is_ok());
}

#[test]
fn a_later_background_wins() {
    let mut scene = Scene::new();
    let first = loaded_image(50, 50, [255, 255, 255, 255]);
    let second = loaded_image(70, 30, [0, 0, 0, 255]);
    let second_uri = second.data_uri().to_owned();

    scene.set_background(first, fit(1024.0, 50.0, 50.0));
    scene.set_background(second, fit(1024.0, 70.0, 30.0));

    assert_eq!(scene.background_size(), Some((70, 30)));
    assert_eq!(scene.background().unwrap().data_uri(), second_uri);
}

#[test]
fn clearing_removes_annotations_but_not_the_background() {
    let mut scene = ready_scene(100, 100);
    scene.add_element(factory::create_stamp(
        1,
        StampKind::Arrow,
        Pos2::new(50.0, 50.0),
        Color32::RED,
        3.0,
    ));
    scene.add_element(factory::create_text(
        2,
        "note".into(),
        Pos2::new(50.0, 20.0),
        Color32::RED,
        40.0,
    ));
    assert_eq!(scene.annotation_count(), 2);

    scene.clear_annotations();

    assert_eq!(scene.annotation_count(), 0);
    assert_eq!(scene.background_size(), Some((100, 100)));
    assert_eq!(scene.size(), egui::Vec2::new(100.0, 100.0));
}

#[test]
fn export_composites_annotations_at_natural_resolution() {
    let mut scene = ready_scene(100, 100);
    scene.add_element(factory::create_stamp(
        1,
        StampKind::Cross,
        Pos2::new(50.0, 50.0),
        Color32::RED,
        4.0,
    ));

    let png = scene.export_png().expect("export");
    let exported = image::load_from_memory(&png).expect("decode export").to_rgba8();

    assert_eq!(exported.dimensions(), (100, 100));
    let center = exported.get_pixel(50, 50);
    assert!(center[0] > 200, "cross center should be red, got {center:?}");
    assert!(center[1] < 60);
    let corner = exported.get_pixel(2, 50);
    assert_eq!(*corner, Rgba([255, 255, 255, 255]), "background survives");
}

#[test]
fn export_scales_canvas_coordinates_up_to_the_image() {
    // 2048x1024 natural, canvas fitted to 1024x512: a cross at the canvas
    // center must land at the image center after export.
    let mut scene = ready_scene(2048, 1024);
    assert_eq!(scene.size(), egui::Vec2::new(1024.0, 512.0));
    scene.add_element(factory::create_stamp(
        1,
        StampKind::Cross,
        Pos2::new(512.0, 256.0),
        Color32::RED,
        4.0,
    ));

    let png = scene.export_png().expect("export");
    let exported = image::load_from_memory(&png).expect("decode export").to_rgba8();

    assert_eq!(exported.dimensions(), (2048, 1024));
    let center = exported.get_pixel(1024, 512);
    assert!(center[0] > 200, "cross center should be red, got {center:?}");
}

#[test]
fn empty_surface_cannot_be_exported() {
    let scene = Scene::new();
    assert!(matches!(scene.export_png(), Err(ExportError::EmptySurface)));
}

#[test]
fn export_data_uri_is_an_opaque_png_string() {
    let scene = ready_scene(16, 16);
    let uri = scene.export_data_uri().expect("export");
    assert!(uri.starts_with("data:image/png;base64,"));
}
