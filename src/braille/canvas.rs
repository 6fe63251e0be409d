use ratatui::style::Color;

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots) and may carry
/// a color that overrides the layer color when drawn.
/// Unicode Braille patterns: U+2800 to U+28FF
#[derive(Clone, Debug)]
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<u8>,
    tints: Vec<Option<Color>>,
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; width * height],
            tints: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    /// Blank every cell, resizing if the dimensions changed.
    pub fn reset(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            *self = Self::new(width, height);
        } else {
            self.cells.fill(0);
            self.tints.fill(None);
        }
    }

    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    #[inline(always)]
    fn dot(x: usize, y: usize) -> u8 {
        match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        }
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        let cx = x / 2;
        let cy = y / 4;
        (cx < self.width && cy < self.height).then(|| cy * self.width + cx)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] |= Self::dot(x, y);
        }
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    /// Set a pixel and color its whole cell. Last writer wins.
    pub fn paint_pixel_signed(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] |= Self::dot(x, y);
            self.tints[idx] = Some(color);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&b| b == 0)
    }

    /// Character and color of a cell; `None` for blank cells.
    pub fn cell(&self, col: usize, row: usize) -> Option<(char, Option<Color>)> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let idx = row * self.width + col;
        let bits = self.cells[idx];
        if bits == 0 {
            return None;
        }
        let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
        Some((ch, self.tints[idx]))
    }

    /// Convert the canvas to a string of Braille characters
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| {
                row.iter()
                    .map(|&b| char::from_u32(0x2800 + b as u32).unwrap_or(' '))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_layout() {
        let mut canvas = BrailleCanvas::new(3, 1);
        canvas.set_pixel(0, 0);
        canvas.set_pixel(1, 1);
        canvas.set_pixel(2, 2);
        canvas.set_pixel(3, 3);
        for x in 4..6 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        // left column top-down 0x01 0x02 0x04 0x40, right 0x08 0x10 0x20 0x80
        assert_eq!(canvas.to_string(), "⠑⢄⣿");
        assert_eq!(canvas.cell(2, 0), Some(('⣿', None)));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set_pixel(4, 0);
        canvas.set_pixel(0, 8);
        canvas.set_pixel_signed(-1, 3);
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_paint_tints_cell() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.paint_pixel_signed(2, 0, Color::Red);
        assert_eq!(canvas.cell(1, 0), Some(('⠁', Some(Color::Red))));
        assert_eq!(canvas.cell(0, 0), None);
    }

    #[test]
    fn test_reset_clears_and_resizes() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.paint_pixel_signed(0, 0, Color::Red);
        canvas.reset(2, 1);
        assert!(canvas.is_empty());
        canvas.reset(4, 3);
        assert_eq!(canvas.pixel_width(), 8);
        assert_eq!(canvas.pixel_height(), 12);
    }
}
