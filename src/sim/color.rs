use eframe::egui::Color32;
use rand::Rng;

/// Linear RGB triple with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Rgb {
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random(), rng.random(), rng.random())
    }

    pub fn complement(self) -> Self {
        Self::new(
            (self.red - 1.0).abs(),
            (self.green - 1.0).abs(),
            (self.blue - 1.0).abs(),
        )
    }

    /// Attach an alpha channel. NaN reads as fully transparent.
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        let alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        Rgba { rgb: self, alpha }
    }

    pub fn opaque(self) -> Rgba {
        self.with_alpha(1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl From<Rgba> for Color32 {
    fn from(color: Rgba) -> Self {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(
            channel(color.rgb.red),
            channel(color.rgb.green),
            channel(color.rgb.blue),
            channel(color.alpha),
        )
    }
}
