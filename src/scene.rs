use egui::{Pos2, Vec2};
use image::RgbaImage;
use log::{debug, info};

use crate::element::{Element, ElementType};
use crate::error::ExportError;
use crate::flatten;
use crate::geometry::FitResult;
use crate::intake::LoadedImage;

/// The command interface the session drives the graphics surface through.
///
/// The production implementation is [`Scene`]; tests substitute recording
/// mocks, which is the point of keeping the seam this narrow.
pub trait Surface {
    /// Set the on-screen (fitted) canvas dimensions.
    fn set_dimensions(&mut self, width: f32, height: f32);

    /// Install a new background, replacing any previous one.
    fn set_background(&mut self, image: LoadedImage, fitted: FitResult);

    /// Natural pixel size of the current background, if any.
    fn background_size(&self) -> Option<(u32, u32)>;

    /// Add an annotation element on top of the background.
    fn add_element(&mut self, element: ElementType);

    /// Remove every annotation; the background and its dimensions survive.
    fn clear_annotations(&mut self);

    /// Composite background + annotations and encode as PNG bytes.
    fn export_png(&self) -> Result<Vec<u8>, ExportError>;

    /// Composite and wrap as a `data:image/png;base64,…` string.
    fn export_data_uri(&self) -> Result<String, ExportError> {
        Ok(flatten::png_data_uri(&self.export_png()?))
    }
}

/// The background committed to the scene: natural-resolution pixels, the
/// source data URI, and the fit it is displayed at.
#[derive(Clone, Debug)]
pub struct Background {
    image: LoadedImage,
    fitted: FitResult,
}

impl Background {
    pub fn data_uri(&self) -> &str {
        self.image.data_uri()
    }

    pub fn pixels(&self) -> &RgbaImage {
        self.image.pixels()
    }

    pub fn fitted(&self) -> FitResult {
        self.fitted
    }
}

/// The mutable annotation scene: one optional background plus the drawn
/// elements, all in canvas-local coordinates.
#[derive(Default)]
pub struct Scene {
    size: Vec2,
    background: Option<Background>,
    elements: Vec<ElementType>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current on-screen canvas size.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn elements(&self) -> &[ElementType] {
        &self.elements
    }

    pub fn annotation_count(&self) -> usize {
        self.elements.len()
    }

    /// Id of the topmost element under `pos`, if any.
    pub fn topmost_hit(&self, pos: Pos2) -> Option<usize> {
        self.elements
            .iter()
            .rev()
            .find(|element| element.hit_test(pos))
            .map(|element| element.id())
    }

    pub fn element_mut(&mut self, id: usize) -> Option<&mut ElementType> {
        self.elements.iter_mut().find(|element| element.id() == id)
    }
}

impl Surface for Scene {
    fn set_dimensions(&mut self, width: f32, height: f32) {
        debug!("surface dimensions set to {width}x{height}");
        self.size = Vec2::new(width, height);
    }

    fn set_background(&mut self, image: LoadedImage, fitted: FitResult) {
        info!(
            "background set: {}x{} (fitted {}x{}, resized: {})",
            image.width(),
            image.height(),
            fitted.width,
            fitted.height,
            fitted.resized
        );
        self.background = Some(Background { image, fitted });
    }

    fn background_size(&self) -> Option<(u32, u32)> {
        self.background
            .as_ref()
            .map(|background| (background.pixels().width(), background.pixels().height()))
    }

    fn add_element(&mut self, element: ElementType) {
        debug!(
            "adding {} element {}",
            element.element_type(),
            element.id()
        );
        self.elements.push(element);
    }

    fn clear_annotations(&mut self) {
        info!("clearing {} annotation(s)", self.elements.len());
        self.elements.clear();
    }

    fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        let background = self.background.as_ref().ok_or(ExportError::EmptySurface)?;
        let raster = flatten::flatten(background.pixels(), &background.fitted, &self.elements)?;
        flatten::encode_png(&raster)
    }
}
