//! Smooth curves through the spectrum points.
//!
//! A [`Path`] is built once from a point sequence and can then be encoded two
//! ways: replayed as drawing calls on a [`RasterSurface`], or written out as
//! SVG path data for a [`VectorSurface`](crate::surface::VectorSurface).

use alloc::{string::String, vec::Vec};
use core::fmt::Write;

use crate::surface::RasterSurface;

/// Chord lengths at or below this are treated as coincident points.
const EPSILON: f32 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// Straight segments between points.
    Linear,
    /// Catmull-Rom spline parameterised by chord length raised to `alpha`.
    CatmullRom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveConfig {
    pub kind: CurveKind,
    /// 0.0 uniform, 0.5 centripetal, 1.0 chordal. Clamped into `[0, 1]`.
    pub alpha: f32,
}

impl CurveConfig {
    pub const CENTRIPETAL: CurveConfig = CurveConfig {
        kind: CurveKind::CatmullRom,
        alpha: 0.5,
    };

    pub const LINEAR: CurveConfig = CurveConfig {
        kind: CurveKind::Linear,
        alpha: 0.0,
    };
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self::CENTRIPETAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    CubicTo {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x: f32,
        y: f32,
    },
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Emit the path's segments onto `surface` without beginning or stroking.
    pub fn trace<R: RasterSurface + ?Sized>(&self, surface: &mut R) {
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo { x, y } => surface.move_to(x, y),
                PathCommand::LineTo { x, y } => surface.line_to(x, y),
                PathCommand::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => surface.bezier_curve_to(x1, y1, x2, y2, x, y),
                PathCommand::Close => surface.close_path(),
            }
        }
    }

    /// Begin a path, trace it and stroke it with the surface's current style.
    pub fn replay<R: RasterSurface + ?Sized>(&self, surface: &mut R) {
        surface.begin_path();
        self.trace(surface);
        surface.stroke();
    }

    /// Overwrite `out` with the SVG path data for this path.
    pub fn write_svg(&self, out: &mut String) {
        out.clear();
        for command in &self.commands {
            // Writing into a String cannot fail.
            let _ = match *command {
                PathCommand::MoveTo { x, y } => write!(out, "M{},{}", x, y),
                PathCommand::LineTo { x, y } => write!(out, "L{},{}", x, y),
                PathCommand::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => write!(out, "C{},{},{},{},{},{}", x1, y1, x2, y2, x, y),
                PathCommand::Close => out.write_char('Z'),
            };
        }
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        self.write_svg(&mut out);
        out
    }
}

/// Build a curve through `(xs[i], ys[i])`. Extra values in the longer slice
/// are ignored.
pub fn build_path(xs: &[f32], ys: &[f32], config: &CurveConfig) -> Path {
    let mut path = Path::with_capacity(xs.len().min(ys.len()) + 1);
    build_path_into(xs, ys, config, &mut path);
    path
}

/// Like [`build_path`] but reuses `path`'s allocation.
///
/// No points gives an empty path, one point gives `M x,y Z`, two points a
/// straight line.
pub fn build_path_into(xs: &[f32], ys: &[f32], config: &CurveConfig, path: &mut Path) {
    path.clear();
    let points = xs.iter().copied().zip(ys.iter().copied());
    match config.kind {
        CurveKind::Linear => {
            let mut count = 0usize;
            for (x, y) in points {
                path.commands.push(if count == 0 {
                    PathCommand::MoveTo { x, y }
                } else {
                    PathCommand::LineTo { x, y }
                });
                count += 1;
            }
            if count == 1 {
                path.commands.push(PathCommand::Close);
            }
        }
        CurveKind::CatmullRom => {
            let mut spline = CatmullRom::new(&mut path.commands, config.alpha.clamp(0.0, 1.0));
            for (x, y) in points {
                spline.point(x, y);
            }
            spline.finish();
        }
    }
}

/// Streams points into cubic segments. Each segment from `p1` to `p2` is
/// emitted once `p3` is known; the last one by repeating the final point.
struct CatmullRom<'a> {
    out: &'a mut Vec<PathCommand>,
    alpha: f32,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    // Chord lengths to the power alpha, and their squares.
    l01_a: f32,
    l12_a: f32,
    l23_a: f32,
    l01_2a: f32,
    l12_2a: f32,
    l23_2a: f32,
    seen: u8,
}

impl<'a> CatmullRom<'a> {
    fn new(out: &'a mut Vec<PathCommand>, alpha: f32) -> Self {
        Self {
            out,
            alpha,
            x0: 0.0,
            y0: 0.0,
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            l01_a: 0.0,
            l12_a: 0.0,
            l23_a: 0.0,
            l01_2a: 0.0,
            l12_2a: 0.0,
            l23_2a: 0.0,
            seen: 0,
        }
    }

    fn point(&mut self, x: f32, y: f32) {
        if self.seen > 0 {
            let dx = self.x2 - x;
            let dy = self.y2 - y;
            // |d|^alpha taken from the squared length, so that l_2a == l_a * l_a
            // holds exactly and collinear points stay collinear.
            self.l23_a = libm::powf(dx * dx + dy * dy, self.alpha * 0.5);
            self.l23_2a = self.l23_a * self.l23_a;
        }

        match self.seen {
            0 => {
                self.seen = 1;
                self.out.push(PathCommand::MoveTo { x, y });
            }
            1 => self.seen = 2,
            2 => {
                self.seen = 3;
                self.segment(x, y);
            }
            _ => self.segment(x, y),
        }

        self.l01_a = self.l12_a;
        self.l12_a = self.l23_a;
        self.l01_2a = self.l12_2a;
        self.l12_2a = self.l23_2a;
        self.x0 = self.x1;
        self.x1 = self.x2;
        self.x2 = x;
        self.y0 = self.y1;
        self.y1 = self.y2;
        self.y2 = y;
    }

    fn segment(&mut self, x: f32, y: f32) {
        let (mut cx1, mut cy1) = (self.x1, self.y1);
        let (mut cx2, mut cy2) = (self.x2, self.y2);

        if self.l01_a > EPSILON {
            let a = 2.0 * self.l01_2a + 3.0 * self.l01_a * self.l12_a + self.l12_2a;
            let n = 3.0 * self.l01_a * (self.l01_a + self.l12_a);
            cx1 = (self.x1 * a - self.x0 * self.l12_2a + self.x2 * self.l01_2a) / n;
            cy1 = (self.y1 * a - self.y0 * self.l12_2a + self.y2 * self.l01_2a) / n;
        }

        if self.l23_a > EPSILON {
            let b = 2.0 * self.l23_2a + 3.0 * self.l23_a * self.l12_a + self.l12_2a;
            let m = 3.0 * self.l23_a * (self.l23_a + self.l12_a);
            cx2 = (self.x2 * b + self.x1 * self.l23_2a - x * self.l12_2a) / m;
            cy2 = (self.y2 * b + self.y1 * self.l23_2a - y * self.l12_2a) / m;
        }

        self.out.push(PathCommand::CubicTo {
            x1: cx1,
            y1: cy1,
            x2: cx2,
            y2: cy2,
            x: self.x2,
            y: self.y2,
        });
    }

    fn finish(&mut self) {
        match self.seen {
            1 => self.out.push(PathCommand::Close),
            2 => self.out.push(PathCommand::LineTo {
                x: self.x2,
                y: self.y2,
            }),
            3 => {
                let (x, y) = (self.x2, self.y2);
                self.point(x, y);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use approx::assert_abs_diff_eq;

    fn ys_of(path: &Path) -> Vec<f32> {
        let mut ys = Vec::new();
        for command in path.commands() {
            match *command {
                PathCommand::MoveTo { y, .. } | PathCommand::LineTo { y, .. } => ys.push(y),
                PathCommand::CubicTo { y1, y2, y, .. } => ys.extend([y1, y2, y]),
                PathCommand::Close => {}
            }
        }
        ys
    }

    #[test]
    fn test_empty_input_gives_empty_path() {
        let path = build_path(&[], &[], &CurveConfig::default());
        assert!(path.is_empty());
        assert_eq!(path.to_svg(), "");
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let path = build_path(&[3.0], &[4.0], &CurveConfig::default());
        assert_eq!(
            path.commands(),
            &[PathCommand::MoveTo { x: 3.0, y: 4.0 }, PathCommand::Close]
        );
        assert_eq!(path.to_svg(), "M3,4Z");
    }

    #[test]
    fn test_two_points_make_a_line() {
        let path = build_path(&[0.0, 10.0], &[5.0, 7.5], &CurveConfig::default());
        assert_eq!(path.to_svg(), "M0,5L10,7.5");
    }

    #[test]
    fn test_curve_passes_through_every_point() {
        let xs = [0.0, 10.0, 20.0, 30.0, 40.0];
        let ys = [5.0, 50.0, 0.0, 80.0, 10.0];
        let path = build_path(&xs, &ys, &CurveConfig::default());

        let commands = path.commands();
        assert_eq!(commands.len(), 5);
        assert_eq!(commands[0], PathCommand::MoveTo { x: 0.0, y: 5.0 });
        for (i, command) in commands[1..].iter().enumerate() {
            match *command {
                PathCommand::CubicTo { x, y, .. } => {
                    assert_eq!((x, y), (xs[i + 1], ys[i + 1]));
                }
                other => panic!("unexpected command {:?}", other),
            }
        }
    }

    #[test]
    fn test_flat_input_stays_flat() {
        for bins in [2usize, 3, 7, 100, 512] {
            let xs: Vec<f32> = (0..bins).map(|i| i as f32 * 12.8).collect();
            let ys = vec![360.0f32; bins];
            let path = build_path(&xs, &ys, &CurveConfig::default());
            for y in ys_of(&path) {
                assert_abs_diff_eq!(y, 360.0, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_scaled_points_scale_the_curve() {
        let xs = [0.0, 12.0, 24.0, 36.0, 48.0, 60.0];
        let ys = [300.0, 120.0, 250.0, 90.0, 400.0, 310.0];
        let scale = 2.0;
        let sxs: Vec<f32> = xs.iter().map(|v| v * scale).collect();
        let sys: Vec<f32> = ys.iter().map(|v| v * scale).collect();

        let plain = build_path(&xs, &ys, &CurveConfig::default());
        let scaled = build_path(&sxs, &sys, &CurveConfig::default());
        assert_eq!(plain.commands().len(), scaled.commands().len());

        for (a, b) in plain.commands().iter().zip(scaled.commands()) {
            match (*a, *b) {
                (
                    PathCommand::CubicTo { x1, y1, x2, y2, x, y },
                    PathCommand::CubicTo {
                        x1: sx1,
                        y1: sy1,
                        x2: sx2,
                        y2: sy2,
                        x: sx,
                        y: sy,
                    },
                ) => {
                    for (p, s) in [(x1, sx1), (y1, sy1), (x2, sx2), (y2, sy2), (x, sx), (y, sy)] {
                        assert_abs_diff_eq!(p * scale, s, epsilon = 1e-2);
                    }
                }
                (PathCommand::MoveTo { x, y }, PathCommand::MoveTo { x: sx, y: sy }) => {
                    assert_eq!((x * scale, y * scale), (sx, sy));
                }
                (a, b) => panic!("mismatched commands {:?} / {:?}", a, b),
            }
        }
    }

    #[test]
    fn test_repeated_points_do_not_produce_nan() {
        let xs = [1.0, 1.0, 1.0, 2.0];
        let ys = [1.0, 1.0, 1.0, 2.0];
        let path = build_path(&xs, &ys, &CurveConfig::default());
        for y in ys_of(&path) {
            assert!(y.is_finite());
        }
    }

    #[test]
    fn test_linear_kind() {
        let path = build_path(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], &CurveConfig::LINEAR);
        assert_eq!(path.to_svg(), "M0,0L1,1L2,0");
    }

    #[test]
    fn test_write_svg_reuses_buffer() {
        let path = build_path(&[0.0, 1.0], &[0.0, 1.0], &CurveConfig::default());
        let mut out = String::from("stale contents");
        path.write_svg(&mut out);
        assert_eq!(out, "M0,0L1,1");
    }
}
