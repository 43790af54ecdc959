use std::{fs, io, path::Path};

use audioline_viz::VectorSurface;

const PATH_STYLE: &str = "fill: none; stroke: red; stroke-width: 2px";

/// Vector surface holding the latest curve as an SVG document.
pub struct SvgSurface {
    width: f32,
    height: f32,
    path: String,
}

impl SvgSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            path: String::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn document(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\
             <path d=\"{d}\" style=\"{style}\"/></svg>\n",
            w = self.width,
            h = self.height,
            d = self.path,
            style = PATH_STYLE,
        )
    }

    pub fn write_to(&self, file: &Path) -> io::Result<()> {
        fs::write(file, self.document())
    }
}

impl VectorSurface for SvgSurface {
    fn set_path(&mut self, description: &str) {
        self.path.clear();
        self.path.push_str(description);
    }
}
