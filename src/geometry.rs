use serde::{Deserialize, Serialize};

/// Outcome of fitting an image into a bounded viewport.
///
/// `width`/`height` are the on-screen dimensions; when `resized` is false
/// they are the image's natural dimensions unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub resized: bool,
    pub width: f32,
    pub height: f32,
}

/// Scale an image down so its longer side matches `target_length_px`,
/// preserving aspect ratio. Images that already fit are returned unchanged.
///
/// All inputs must be strictly positive; callers validate before invoking
/// (the intake rejects zero-sized images before they can reach this point).
pub fn fit(target_length_px: f32, natural_width: f32, natural_height: f32) -> FitResult {
    debug_assert!(target_length_px > 0.0 && natural_width > 0.0 && natural_height > 0.0);

    let longest_side = natural_width.max(natural_height);
    if longest_side <= target_length_px {
        return FitResult {
            resized: false,
            width: natural_width,
            height: natural_height,
        };
    }

    // Square images take the wide branch so the output is deterministic.
    if natural_width >= natural_height {
        FitResult {
            resized: true,
            width: target_length_px,
            height: natural_height * target_length_px / natural_width,
        }
    } else {
        FitResult {
            resized: true,
            width: natural_width * target_length_px / natural_height,
            height: target_length_px,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fit;

    #[test]
    fn small_image_is_untouched() {
        let result = fit(1024.0, 500.0, 300.0);
        assert!(!result.resized);
        assert_eq!(result.width, 500.0);
        assert_eq!(result.height, 300.0);
    }

    #[test]
    fn wide_image_scales_to_target_width() {
        let result = fit(1024.0, 2048.0, 1024.0);
        assert!(result.resized);
        assert_eq!(result.width, 1024.0);
        assert_eq!(result.height, 512.0);
    }

    #[test]
    fn tall_image_scales_to_target_height() {
        let result = fit(1024.0, 1024.0, 2048.0);
        assert!(result.resized);
        assert_eq!(result.width, 512.0);
        assert_eq!(result.height, 1024.0);
    }

    #[test]
    fn square_image_takes_the_wide_branch() {
        let result = fit(100.0, 200.0, 200.0);
        assert!(result.resized);
        assert_eq!(result.width, 100.0);
        assert_eq!(result.height, 100.0);
    }

    #[test]
    fn exact_fit_is_not_resized() {
        let result = fit(1024.0, 1024.0, 768.0);
        assert!(!result.resized);
        assert_eq!(result.width, 1024.0);
        assert_eq!(result.height, 768.0);
    }
}
