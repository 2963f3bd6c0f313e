// Speeds up gamma-correct blending by replacing powf with table lookups.
// Visual: translucent overlay cells mix with the video without the dark
// fringes a naive sRGB lerp produces.

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1) as f32
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255) via 4096-step quantization
    // (index = (linear * 4095).round())
    linear_to_srgb: [u8; 4096],
}

impl GammaLut {
    /// Build both tables once at startup.
    pub fn new() -> Self {
        // sRGB -> linear
        let mut s2l = [0.0f32; 256];
        for v in 0..=255 {
            let c = v as f32 / 255.0;
            s2l[v] = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        // linear -> sRGB (quantized to 4096 steps)
        let mut l2s = [0u8; 4096];
        for i in 0..4096 {
            let l = (i as f32) / 4095.0; // 0..1
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            let v = (s * 255.0).round().clamp(0.0, 255.0) as u8;
            l2s[i] = v;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        // Quantize to 0..4095 index
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx]
    }

    /// Mix `over` onto `under` (both 0x00RRGGBB) with the given opacity,
    /// channel by channel in linear light.
    #[inline]
    pub fn blend(&self, under: u32, over: u32, alpha: f32) -> u32 {
        if alpha <= 0.0 {
            return under;
        }
        if alpha >= 1.0 {
            return over;
        }

        let ru = ((under >> 16) & 0xFF) as u8;
        let gu = ((under >> 8) & 0xFF) as u8;
        let bu = (under & 0xFF) as u8;

        let ro = ((over >> 16) & 0xFF) as u8;
        let go = ((over >> 8) & 0xFF) as u8;
        let bo = (over & 0xFF) as u8;

        let inv = 1.0 - alpha;
        let r_lin = alpha * self.srgb_u8_to_linear(ro) + inv * self.srgb_u8_to_linear(ru);
        let g_lin = alpha * self.srgb_u8_to_linear(go) + inv * self.srgb_u8_to_linear(gu);
        let b_lin = alpha * self.srgb_u8_to_linear(bo) + inv * self.srgb_u8_to_linear(bu);

        let r = self.linear_to_srgb_u8(r_lin) as u32;
        let g = self.linear_to_srgb_u8(g_lin) as u32;
        let b = self.linear_to_srgb_u8(b_lin) as u32;
        (r << 16) | (g << 8) | b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_round_trip_endpoints() {
        let lut = GammaLut::new();
        assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(0)), 0);
        assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(255)), 255);
    }

    #[test]
    fn table_round_trip_is_close_everywhere() {
        let lut = GammaLut::new();
        for v in 0..=255u8 {
            let back = lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(v));
            assert!((back as i32 - v as i32).abs() <= 1, "v={v} back={back}");
        }
    }

    #[test]
    fn blend_alpha_extremes_pick_a_side() {
        let lut = GammaLut::new();
        assert_eq!(lut.blend(0x00123456, 0x00654321, 0.0), 0x00123456);
        assert_eq!(lut.blend(0x00123456, 0x00654321, 1.0), 0x00654321);
    }

    #[test]
    fn blend_of_equal_colors_is_stable() {
        let lut = GammaLut::new();
        assert_eq!(lut.blend(0x0000C800, 0x0000C800, 0.65), 0x0000C800);
    }
}
