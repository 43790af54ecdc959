/// Linear mapping from a fixed domain to a fixed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLinear {
    domain: (f32, f32),
    range: (f32, f32),
    clamp: bool,
}

impl ScaleLinear {
    pub const fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    /// Same mapping, but inputs outside the domain pin to the range bounds.
    pub const fn clamped(self) -> Self {
        Self {
            clamp: true,
            ..self
        }
    }

    pub fn domain(&self) -> (f32, f32) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    pub fn map(&self, value: f32) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        // A collapsed domain has no slope.
        if span == 0.0 || !span.is_finite() {
            return r0;
        }

        let mut t = (value - d0) / span;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        if t == 1.0 {
            return r1;
        }
        r0 + (r1 - r0) * t
    }
}

/// Bin index → x and amplitude → y, fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    x: ScaleLinear,
    y: ScaleLinear,
}

impl CoordinateMapper {
    /// `amplitude_range` is `(y for amplitude 0, y for amplitude 255)`; pass a
    /// larger first value to draw louder bins higher up.
    pub fn new(bin_count: usize, width: f32, amplitude_range: (f32, f32)) -> Self {
        let last_bin = bin_count.saturating_sub(1) as f32;
        Self {
            x: ScaleLinear::new((0.0, last_bin), (0.0, width)),
            y: ScaleLinear::new((0.0, 255.0), amplitude_range).clamped(),
        }
    }

    /// Amplitudes span the band between `band.0 * height` (silence) and
    /// `band.1 * height` (full scale).
    pub fn with_band(bin_count: usize, width: f32, height: f32, band: (f32, f32)) -> Self {
        Self::new(bin_count, width, (band.0 * height, band.1 * height))
    }

    pub fn map_index_to_x(&self, index: usize) -> f32 {
        self.x.map(index as f32)
    }

    pub fn map_amplitude_to_y(&self, amplitude: u8) -> f32 {
        self.y.map(amplitude as f32)
    }

    pub fn x_scale(&self) -> &ScaleLinear {
        &self.x
    }

    pub fn y_scale(&self) -> &ScaleLinear {
        &self.y
    }
}
