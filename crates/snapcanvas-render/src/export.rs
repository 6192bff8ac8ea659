//! Capturing rendered panels as images.

use crate::compositor::{Compositor, RenderOptions};
use crate::pixmap::PixmapSurface;
use crate::surface::{Surface, SurfaceError};
use kurbo::Size;
use snapcanvas_core::panel::PanelId;
use snapcanvas_core::raster::{RasterError, RasterImage};
use snapcanvas_core::scene::Scene;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("encode error: {0}")]
    Raster(#[from] RasterError),
    #[error("panel {0} is not part of the current split layout")]
    UnknownPanel(PanelId),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// PNG bytes of whatever `surface` currently shows.
pub fn surface_png(surface: &dyn Surface) -> ExportResult<Vec<u8>> {
    Ok(surface.read_pixels().encode_png()?)
}

/// Render `panel` of `scene` at `width`×`height` without selection chrome.
pub fn render_panel_image(
    compositor: &Compositor,
    scene: &Scene,
    panel: &PanelId,
    width: u32,
    height: u32,
) -> ExportResult<RasterImage> {
    if !scene.split_mode.has_panel(panel) {
        return Err(ExportError::UnknownPanel(panel.clone()));
    }
    let mut surface = PixmapSurface::new(width, height)?;
    compositor.render_panel(&mut surface, scene, panel, &RenderOptions::new().without_chrome())?;
    Ok(surface.read_pixels())
}

/// Render every panel into one image of `size`, each placed at its rectangle
/// in the split layout.
pub fn render_composite(compositor: &Compositor, scene: &Scene, size: Size) -> ExportResult<RasterImage> {
    let width = size.width.round().max(1.0) as u32;
    let height = size.height.round().max(1.0) as u32;
    let mut target = PixmapSurface::new(width, height)?;
    for (panel, rect) in scene.split_mode.layout(size) {
        let image = render_panel_image(
            compositor,
            scene,
            &panel,
            rect.width().round().max(1.0) as u32,
            rect.height().round().max(1.0) as u32,
        )?;
        target.draw_image(&image, rect, None)?;
    }
    Ok(target.read_pixels())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapcanvas_core::color::{Color, Fill};
    use snapcanvas_core::panel::SplitMode;

    #[test]
    fn test_panel_png_decodes() {
        let scene = Scene::new();
        let compositor = Compositor::default();
        let image = render_panel_image(&compositor, &scene, &PanelId::default(), 16, 8).unwrap();
        let png = image.encode_png().unwrap();
        let decoded = RasterImage::decode(&png).unwrap();
        assert_eq!(decoded, image);
        assert_eq!(decoded.pixel(3, 3), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_composite_places_panels() {
        let mut scene = Scene::new();
        scene.split_mode = SplitMode::TwoWay;
        scene.backgrounds.insert(PanelId::numbered(1), Fill::solid(Color::rgb(255, 0, 0)));
        scene.backgrounds.insert(PanelId::numbered(2), Fill::solid(Color::rgb(0, 0, 255)));
        let image = render_composite(&Compositor::default(), &scene, Size::new(200.0, 100.0)).unwrap();
        assert_eq!(image.pixel(50, 50), Some([255, 0, 0, 255]));
        assert_eq!(image.pixel(150, 50), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_unknown_panel_rejected() {
        let scene = Scene::new();
        assert!(matches!(
            render_panel_image(&Compositor::default(), &scene, &PanelId::numbered(3), 10, 10),
            Err(ExportError::UnknownPanel(_))
        ));
    }
}
