use image::RgbaImage;
use markpad::element::ElementType;
use markpad::error::ExportError;
use markpad::geometry::FitResult;
use markpad::intake::{LoadedImage, decode_bytes};
use markpad::scene::Surface;
use markpad::session::{CanvasSession, InteractionMode, SessionState};

/// Records every command the session issues, standing in for the real scene.
#[derive(Default)]
struct MockSurface {
    dimensions: Vec<(f32, f32)>,
    background: Option<(u32, u32)>,
    background_sets: usize,
    clears: usize,
    elements: usize,
}

impl Surface for MockSurface {
    fn set_dimensions(&mut self, width: f32, height: f32) {
        self.dimensions.push((width, height));
    }

    fn set_background(&mut self, image: LoadedImage, _fitted: FitResult) {
        self.background = Some((image.width(), image.height()));
        self.background_sets += 1;
    }

    fn background_size(&self) -> Option<(u32, u32)> {
        self.background
    }

    fn add_element(&mut self, _element: ElementType) {
        self.elements += 1;
    }

    fn clear_annotations(&mut self) {
        self.clears += 1;
        self.elements = 0;
    }

    fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::EmptySurface)
    }
}

fn loaded_image(width: u32, height: u32) -> LoadedImage {
    let image = image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([128, 128, 128, 255]),
    ));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode test image");
    decode_bytes(&buffer.into_inner()).expect("decode test image")
}

#[test]
fn upload_walks_empty_loading_ready() {
    let mut session = CanvasSession::new(1024.0);
    let mut surface = MockSurface::default();
    assert!(session.state().is_empty());

    session.begin_loading(1);
    assert_eq!(session.state(), SessionState::Loading { generation: 1 });

    let fitted = session
        .commit_background(loaded_image(2048, 1024), &mut surface)
        .expect("commit should succeed while loading");

    assert!(session.state().is_ready());
    assert!(fitted.resized);
    assert_eq!((fitted.width, fitted.height), (1024.0, 512.0));
    assert_eq!(surface.dimensions.last(), Some(&(1024.0, 512.0)));
    assert_eq!(surface.background, Some((2048, 1024)));
}

#[test]
fn commit_outside_loading_is_rejected() {
    let mut session = CanvasSession::new(1024.0);
    let mut surface = MockSurface::default();

    assert!(
        session
            .commit_background(loaded_image(10, 10), &mut surface)
            .is_none()
    );
    assert!(session.state().is_empty());
    assert_eq!(surface.background_sets, 0);
    assert!(surface.dimensions.is_empty());
}

#[test]
fn decode_failure_falls_back_to_empty() {
    let mut session = CanvasSession::new(1024.0);
    session.begin_loading(3);
    session.fail_loading();
    assert!(session.state().is_empty());
    assert!(session.background_fit().is_none());
}

#[test]
fn clear_refits_and_keeps_the_background() {
    let mut session = CanvasSession::new(1024.0);
    let mut surface = MockSurface::default();
    session.begin_loading(1);
    session.commit_background(loaded_image(2048, 1024), &mut surface);
    surface.elements = 2;

    session.toggle_drawing();
    session.clear(&mut surface);

    assert_eq!(surface.clears, 1);
    assert_eq!(surface.elements, 0);
    assert_eq!(surface.background, Some((2048, 1024)), "background survives");
    // The re-fit pushed the same dimensions a second time
    assert_eq!(surface.dimensions, vec![(1024.0, 512.0), (1024.0, 512.0)]);
    assert_eq!(
        session.background_fit().map(|f| (f.width, f.height)),
        Some((1024.0, 512.0))
    );
    assert_eq!(session.mode(), InteractionMode::Idle);
}

#[test]
fn clear_before_ready_is_ignored() {
    let mut session = CanvasSession::new(1024.0);
    let mut surface = MockSurface::default();
    session.clear(&mut surface);
    assert_eq!(surface.clears, 0);
}

#[test]
fn drawing_and_typing_exclude_each_other_after_commit() {
    let mut session = CanvasSession::new(1024.0);
    let mut surface = MockSurface::default();
    session.begin_loading(1);
    session.commit_background(loaded_image(100, 100), &mut surface);

    session.toggle_drawing();
    assert!(session.is_drawing());

    session.toggle_typing();
    assert!(session.is_typing());
    assert!(!session.is_drawing());

    session.leave_typing();
    assert_eq!(session.mode(), InteractionMode::Idle);
}

#[test]
fn a_second_upload_replaces_the_first() {
    let mut session = CanvasSession::new(1024.0);
    let mut surface = MockSurface::default();
    session.begin_loading(1);
    session.commit_background(loaded_image(2048, 1024), &mut surface);

    session.begin_loading(2);
    assert_eq!(session.state(), SessionState::Loading { generation: 2 });
    session.commit_background(loaded_image(500, 300), &mut surface);

    assert_eq!(surface.background, Some((500, 300)));
    assert_eq!(surface.dimensions.last(), Some(&(500.0, 300.0)));
    assert_eq!(
        session.background_fit().map(|f| f.resized),
        Some(false),
        "the small replacement needs no resize"
    );
}
