use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use glam::{DMat4, DVec3};
use ratatui::style::Color;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::braille::BrailleCanvas;
use crate::data::{self, LineString, BUILTIN_EARTH};
use crate::geo::{surface_point, walk_arc, GeoPosition, GLOBE_RADIUS};
use crate::globe::{GlobeBackend, GlobeError, GlobeTextures, MeshHandle};
use crate::term::camera::{faces_eye, hidden_by_sphere, PerspectiveCamera};
use crate::term::geometry::{draw_line, draw_ring, fill_square};

/// Scale of the atmosphere halo relative to the earth.
const ATMOSPHERE_SCALE: f64 = 1.1;

/// Earth line layer as densified points on the sphere surface.
type SphereLine = Vec<DVec3>;

/// A projected segment and whether its start faces the light.
type Segment = (i32, i32, i32, i32, bool);

#[derive(Clone, Debug)]
struct BlockMesh {
    color: Color,
    position: DVec3,
    scale: f64,
}

/// Rasterized layers of the last rendered frame, back to front.
#[derive(Clone, Debug)]
pub struct TerminalFrame {
    pub atmosphere: BrailleCanvas,
    pub limb: BrailleCanvas,
    pub coast_dark: BrailleCanvas,
    pub coast_lit: BrailleCanvas,
    pub water: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub blocks: BrailleCanvas,
    pub visible_blocks: usize,
}

impl TerminalFrame {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            atmosphere: BrailleCanvas::new(cols, rows),
            limb: BrailleCanvas::new(cols, rows),
            coast_dark: BrailleCanvas::new(cols, rows),
            coast_lit: BrailleCanvas::new(cols, rows),
            water: BrailleCanvas::new(cols, rows),
            borders: BrailleCanvas::new(cols, rows),
            blocks: BrailleCanvas::new(cols, rows),
            visible_blocks: 0,
        }
    }

    fn reset(&mut self, cols: usize, rows: usize) {
        for canvas in [
            &mut self.atmosphere,
            &mut self.limb,
            &mut self.coast_dark,
            &mut self.coast_lit,
            &mut self.water,
            &mut self.borders,
            &mut self.blocks,
        ] {
            canvas.reset(cols, rows);
        }
        self.visible_blocks = 0;
    }
}

/// Globe backend drawing into Braille canvases for a ratatui widget.
///
/// The earth "texture" is a GeoJSON coastline file, bump maps to a borders
/// overlay and specular to a water-body overlay. Listening for input means
/// capturing the terminal mouse.
pub struct TerminalBackend {
    capture_mouse: bool,
    listening: bool,
    coastlines: Vec<SphereLine>,
    borders: Vec<SphereLine>,
    water: Vec<SphereLine>,
    meshes: HashMap<MeshHandle, BlockMesh>,
    next_mesh: u64,
    camera: PerspectiveCamera,
    light: DVec3,
    cols: usize,
    rows: usize,
    frame: TerminalFrame,
}

impl TerminalBackend {
    /// `cols` x `rows` terminal cells. With `capture_mouse` off, attaching
    /// listeners leaves the terminal alone.
    pub fn new(cols: usize, rows: usize, capture_mouse: bool) -> Self {
        let mut backend = Self {
            capture_mouse,
            listening: false,
            coastlines: Vec::new(),
            borders: Vec::new(),
            water: Vec::new(),
            meshes: HashMap::new(),
            next_mesh: 0,
            camera: PerspectiveCamera::default(),
            light: DVec3::ZERO,
            cols,
            rows,
            frame: TerminalFrame::new(cols, rows),
        };
        backend.update_aspect();
        backend
    }

    pub fn frame(&self) -> &TerminalFrame {
        &self.frame
    }

    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn has_earth(&self) -> bool {
        !self.coastlines.is_empty()
    }

    fn update_aspect(&mut self) {
        let (w, h) = (self.cols * 2, self.rows * 4);
        self.camera.aspect = if h == 0 { 1.0 } else { w as f64 / h as f64 };
    }

    fn load_earth(source: &str) -> Result<Vec<LineString>, GlobeError> {
        if source == BUILTIN_EARTH {
            return Ok(data::builtin_coastlines());
        }

        let path = Path::new(source);
        if !path.exists() {
            warn!(path = %path.display(), "earth data not found, using built-in outlines");
            return Ok(data::builtin_coastlines());
        }

        data::load_lines(path).map_err(|e| GlobeError::Texture {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Optional overlays are skipped on any failure.
    fn load_overlay(source: Option<&str>, what: &str) -> Vec<SphereLine> {
        let Some(source) = source else {
            return Vec::new();
        };
        match data::load_lines(Path::new(source)) {
            Ok(lines) => lift_to_sphere(&lines),
            Err(e) => {
                warn!(source, error = %e, "skipping {what} overlay");
                Vec::new()
            }
        }
    }

    fn project_layer(
        &self,
        layer: &[SphereLine],
        view_proj: &DMat4,
        width: usize,
        height: usize,
    ) -> Vec<Segment> {
        let eye = self.camera.position;
        let light = self.light;
        let camera = &self.camera;

        layer
            .par_iter()
            .flat_map_iter(|line| {
                let mut segments = Vec::new();
                let mut prev: Option<(i32, i32)> = None;
                for &p in line {
                    let visible = faces_eye(eye, p);
                    let projected = visible
                        .then(|| camera.project(view_proj, p, width, height))
                        .flatten()
                        .map(|sp| sp.pixel());

                    if let (Some((x0, y0)), Some((x1, y1))) = (prev, projected) {
                        let jump = ((x1 - x0).abs() + (y1 - y0).abs()) as usize;
                        if jump < width.max(1) && segment_on_screen((x0, y0), (x1, y1), width, height) {
                            segments.push((x0, y0, x1, y1, p.dot(light) > 0.0));
                        }
                    }
                    prev = projected;
                }
                segments
            })
            .collect()
    }
}

impl GlobeBackend for TerminalBackend {
    fn load_globe(&mut self, textures: &GlobeTextures) -> Result<(), GlobeError> {
        let earth = textures.earth().ok_or(GlobeError::MissingEarthTexture)?;
        let coastlines = Self::load_earth(earth)?;

        self.coastlines = lift_to_sphere(&coastlines);
        self.borders = Self::load_overlay(textures.bump.as_deref(), "borders");
        self.water = Self::load_overlay(textures.specular.as_deref(), "water");

        debug!(
            coastlines = self.coastlines.len(),
            borders = self.borders.len(),
            water = self.water.len(),
            "earth layers loaded"
        );
        Ok(())
    }

    fn create_block(&mut self, color: &str) -> MeshHandle {
        self.next_mesh += 1;
        let handle = MeshHandle(self.next_mesh);
        self.meshes.insert(
            handle,
            BlockMesh {
                color: parse_color(color),
                position: DVec3::ZERO,
                scale: 1.0,
            },
        );
        handle
    }

    fn remove_mesh(&mut self, mesh: MeshHandle) {
        self.meshes.remove(&mesh);
    }

    fn set_mesh_position(&mut self, mesh: MeshHandle, position: DVec3) {
        if let Some(m) = self.meshes.get_mut(&mesh) {
            m.position = position;
        }
    }

    fn set_mesh_scale(&mut self, mesh: MeshHandle, scale: f64) {
        if let Some(m) = self.meshes.get_mut(&mesh) {
            m.scale = scale;
        }
    }

    // Blocks are drawn as screen-aligned squares, so orientation is moot.
    fn mesh_look_at(&mut self, _mesh: MeshHandle, _target: DVec3) {}

    fn set_camera_position(&mut self, position: DVec3) {
        self.camera.position = position;
    }

    fn camera_look_at(&mut self, target: DVec3) {
        self.camera.target = target;
    }

    fn set_light_position(&mut self, position: DVec3) {
        self.light = position;
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.cols = width as usize;
        self.rows = height as usize;
        self.update_aspect();
    }

    fn render(&mut self) {
        let (cols, rows) = (self.cols, self.rows);
        self.frame.reset(cols, rows);
        let (width, height) = (cols * 2, rows * 4);
        if width == 0 || height == 0 {
            return;
        }

        let view_proj = self.camera.view_projection();
        let eye = self.camera.position;

        // Sphere silhouettes
        if let Some(center) = self.camera.project(&view_proj, DVec3::ZERO, width, height) {
            let (cx, cy) = center.pixel();
            let r = self.camera.sphere_screen_radius(GLOBE_RADIUS, height);
            let halo = self
                .camera
                .sphere_screen_radius(GLOBE_RADIUS * ATMOSPHERE_SCALE, height);
            draw_ring(&mut self.frame.limb, cx, cy, r.round() as i32);
            draw_ring(&mut self.frame.atmosphere, cx, cy, halo.round() as i32);
        }

        // Earth layers
        for (x0, y0, x1, y1, lit) in self.project_layer(&self.coastlines, &view_proj, width, height) {
            let canvas = if lit {
                &mut self.frame.coast_lit
            } else {
                &mut self.frame.coast_dark
            };
            draw_line(canvas, x0, y0, x1, y1);
        }
        for (x0, y0, x1, y1, _) in self.project_layer(&self.water, &view_proj, width, height) {
            draw_line(&mut self.frame.water, x0, y0, x1, y1);
        }
        for (x0, y0, x1, y1, _) in self.project_layer(&self.borders, &view_proj, width, height) {
            draw_line(&mut self.frame.borders, x0, y0, x1, y1);
        }

        // Blocks, far to near so closer ones win the cell color
        let mut visible: Vec<(f64, i32, i32, i32, Color)> = self
            .meshes
            .values()
            .filter(|m| !hidden_by_sphere(eye, m.position, GLOBE_RADIUS))
            .filter_map(|m| {
                let sp = self.camera.project(&view_proj, m.position, width, height)?;
                let (x, y) = sp.pixel();
                if x < -8 || y < -8 || x >= width as i32 + 8 || y >= height as i32 + 8 {
                    return None;
                }
                let half = self.camera.world_to_pixels(m.scale, sp.depth, height) / 2.0;
                Some((sp.depth, x, y, half.round() as i32, m.color))
            })
            .collect();
        visible.sort_by(|a, b| b.0.total_cmp(&a.0));

        for &(_, x, y, half, color) in &visible {
            fill_square(&mut self.frame.blocks, x, y, half, color);
        }
        self.frame.visible_blocks = visible.len();
    }

    fn attach_listeners(&mut self) -> Result<(), GlobeError> {
        if self.capture_mouse && !self.listening {
            execute!(std::io::stdout(), EnableMouseCapture)
                .map_err(|e| GlobeError::Backend(format!("enabling mouse capture: {e}")))?;
        }
        self.listening = true;
        Ok(())
    }

    fn detach_listeners(&mut self) {
        if self.capture_mouse && self.listening {
            if let Err(e) = execute!(std::io::stdout(), DisableMouseCapture) {
                warn!(error = %e, "failed to release mouse capture");
            }
        }
        self.listening = false;
    }
}

/// Lift lon/lat lines onto the sphere, subdividing long segments along
/// great circles so they curve with the surface.
fn lift_to_sphere(lines: &[LineString]) -> Vec<SphereLine> {
    lines
        .par_iter()
        .filter(|line| line.len() >= 2)
        .map(|line| {
            let mut out = Vec::with_capacity(line.len());
            let mut prev: Option<DVec3> = None;
            for &(lon, lat) in line {
                let p = surface_point(GeoPosition::new(lat, lon), GLOBE_RADIUS);
                match prev {
                    Some(a) => walk_arc(a, p, |q| out.push(q)),
                    None => out.push(p),
                }
                prev = Some(p);
            }
            out
        })
        .collect()
}

#[inline]
fn segment_on_screen(p1: (i32, i32), p2: (i32, i32), width: usize, height: usize) -> bool {
    let min_x = p1.0.min(p2.0);
    let max_x = p1.0.max(p2.0);
    let min_y = p1.1.min(p2.1);
    let max_y = p1.1.max(p2.1);

    max_x >= 0 && min_x < width as i32 && max_y >= 0 && min_y < height as i32
}

/// `#rgb`, `#rrggbb` or anything ratatui understands ("red", "lightblue").
pub fn parse_color(s: &str) -> Color {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let expand = |i: usize| u8::from_str_radix(&hex[i..i + 1].repeat(2), 16).unwrap_or(0);
            return Color::Rgb(expand(0), expand(1), expand(2));
        }
    }
    Color::from_str(s).unwrap_or_else(|_| {
        warn!(color = s, "unrecognized block color, using white");
        Color::White
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::to_cartesian;
    use crate::globe::CameraRig;

    fn backend() -> TerminalBackend {
        let mut backend = TerminalBackend::new(40, 20, false);
        backend
            .load_globe(&GlobeTextures::new(BUILTIN_EARTH))
            .expect("built-in earth");
        backend
    }

    fn look_from(backend: &mut TerminalBackend, rig: &CameraRig) {
        backend.set_camera_position(rig.camera_position());
        backend.set_light_position(rig.light_position());
        backend.camera_look_at(DVec3::ZERO);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#fff"), Color::Rgb(255, 255, 255));
        assert_eq!(parse_color("#0a0"), Color::Rgb(0, 170, 0));
        assert_eq!(parse_color("#ff8800"), Color::Rgb(255, 136, 0));
        assert_eq!(parse_color("red"), Color::Red);
        assert_eq!(parse_color("no such color"), Color::White);
    }

    #[test]
    fn test_missing_earth_file_falls_back_to_builtin() {
        let mut backend = TerminalBackend::new(10, 10, false);
        backend
            .load_globe(&GlobeTextures::new("/no/such/coastline.json"))
            .expect("fallback");
        assert!(backend.has_earth());
    }

    #[test]
    fn test_corrupt_earth_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(file.path(), "{").expect("write");
        let mut backend = TerminalBackend::new(10, 10, false);
        let textures = GlobeTextures::new(file.path().to_string_lossy());
        assert!(matches!(
            backend.load_globe(&textures),
            Err(GlobeError::Texture { .. })
        ));
    }

    #[test]
    fn test_bad_overlay_is_skipped() {
        let mut backend = TerminalBackend::new(10, 10, false);
        let textures = GlobeTextures::new(BUILTIN_EARTH).with_bump("/no/borders.json");
        backend.load_globe(&textures).expect("overlay failure is not fatal");
        assert!(backend.borders.is_empty());
    }

    #[test]
    fn test_render_draws_globe() {
        let mut backend = backend();
        look_from(&mut backend, &CameraRig::default());
        backend.render();

        let frame = backend.frame();
        assert!(!frame.limb.is_empty());
        assert!(!frame.atmosphere.is_empty());
        assert!(!frame.coast_lit.is_empty() || !frame.coast_dark.is_empty());
    }

    #[test]
    fn test_block_facing_camera_is_drawn_and_far_side_is_not() {
        let mut backend = backend();
        let rig = CameraRig::default();
        look_from(&mut backend, &rig);

        let near = backend.create_block("#f00");
        backend.set_mesh_position(near, to_cartesian(rig.orientation(), 201.0));
        backend.set_mesh_scale(near, 4.0);

        let far = backend.create_block("#0f0");
        let mut opposite = rig.orientation();
        opposite.x += std::f64::consts::PI;
        opposite.y = -opposite.y;
        backend.set_mesh_position(far, to_cartesian(opposite, 201.0));

        backend.render();
        assert_eq!(backend.frame().visible_blocks, 1);

        // the near block sits in the middle of the screen
        let (cols, rows) = backend.size();
        let (_, tint) = backend
            .frame()
            .blocks
            .cell(cols / 2, rows / 2)
            .expect("block at center");
        assert_eq!(tint, Some(Color::Rgb(255, 0, 0)));
    }

    #[test]
    fn test_block_beneath_surface_is_hidden() {
        let mut backend = backend();
        let rig = CameraRig::default();
        look_from(&mut backend, &rig);
        let mesh = backend.create_block("white");
        backend.set_mesh_position(mesh, to_cartesian(rig.orientation(), 198.0));
        backend.render();
        assert_eq!(backend.frame().visible_blocks, 0);
    }

    #[test]
    fn test_viewport_resize_changes_canvas() {
        let mut backend = backend();
        backend.set_viewport(80, 30);
        look_from(&mut backend, &CameraRig::default());
        backend.render();
        assert_eq!(backend.frame().limb.width(), 80);
        assert_eq!(backend.frame().limb.height(), 30);

        backend.set_viewport(0, 0);
        backend.render();
        assert!(backend.frame().limb.is_empty());
    }

    #[test]
    fn test_removed_mesh_ignores_updates() {
        let mut backend = backend();
        let mesh = backend.create_block("blue");
        backend.remove_mesh(mesh);
        backend.set_mesh_position(mesh, DVec3::X * 201.0);
        assert_eq!(backend.mesh_count(), 0);
    }
}
