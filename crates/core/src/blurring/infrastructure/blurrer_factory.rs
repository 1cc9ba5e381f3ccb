use crate::blurring::domain::frame_blurrer::FrameBlurrer;

use super::cpu_gaussian_blurrer::CpuGaussianBlurrer;

/// Creates the background blurrer for `sigma` and logs how it will run.
pub fn create_blurrer(sigma: f64) -> Box<dyn FrameBlurrer> {
    let blurrer = CpuGaussianBlurrer::new(sigma);
    if blurrer.scale() > 1 {
        log::info!(
            "Using CPU Gaussian blur (sigma={sigma}, downscale x{})",
            blurrer.scale()
        );
    } else {
        log::info!("Using CPU Gaussian blur (sigma={sigma})");
    }
    Box::new(blurrer)
}
