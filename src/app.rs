use tracing::info;

use tui_globe::config::{FeedConfig, GlobeConfig};
use tui_globe::geo::{to_geo, GeoPosition, Orientation};
use tui_globe::globe::{BlockSpec, CameraRig, Globe, GlobeError, ScrollDelta};
use tui_globe::hash::RandStream;
use tui_globe::term::TerminalBackend;

/// Zoom change for one key press.
const KEY_ZOOM_STEP: f64 = 60.0;
/// Browser-style wheel delta of one notch.
const WHEEL_NOTCH: f64 = 120.0;
const SNAP_ZOOM: f64 = 400.0;

/// Random blocks rising out of the globe, one every few frames.
pub struct DemoFeed {
    config: FeedConfig,
    rng: RandStream,
    /// Where the newest block went.
    pub last: Option<GeoPosition>,
    pub spawned: u64,
}

impl DemoFeed {
    pub fn new(config: FeedConfig) -> Self {
        let rng = RandStream::new(config.seed);
        Self {
            config,
            rng,
            last: None,
            spawned: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// True on frames where a block should appear.
    pub fn due(&self, frame: u64) -> bool {
        self.config.enabled && frame % self.config.spawn_interval.max(1) == 0
    }

    pub fn next_spec(&mut self) -> BlockSpec {
        let lat = self.rng.latitude();
        let lon = self.rng.range(-180.0, 180.0);
        let (lo, hi) = (
            self.config.min_size.min(self.config.max_size),
            self.config.min_size.max(self.config.max_size),
        );
        let size = self.rng.range(lo, hi);
        let color = self.pick_color();

        self.last = Some(GeoPosition::new(lat, lon));
        self.spawned += 1;
        BlockSpec::new(lat, lon, size, color)
    }

    fn pick_color(&mut self) -> String {
        if self.config.palette.is_empty() {
            return "white".to_string();
        }
        let idx = (self.rng.next_f64() * self.config.palette.len() as f64) as usize;
        self.config.palette[idx.min(self.config.palette.len() - 1)].clone()
    }
}

/// Application state
pub struct App {
    pub globe: Globe<TerminalBackend>,
    pub feed: DemoFeed,
    pub should_quit: bool,
    pub paused: bool,
    max_blocks: usize,
    home: CameraRig,
    frame: u64,
}

/// Globe area inside the border, above the status bar.
fn map_cells(width: usize, height: usize) -> (usize, usize) {
    (width.saturating_sub(2), height.saturating_sub(3))
}

/// Terminal cell to Braille pixel inside the map border.
fn cell_to_pixel(col: u16, row: u16) -> (f64, f64) {
    (
        (col.saturating_sub(1) as f64) * 2.0,
        (row.saturating_sub(1) as f64) * 4.0,
    )
}

impl App {
    /// Build and initialize the globe for a `width` x `height` terminal.
    pub fn new(
        config: &GlobeConfig,
        width: usize,
        height: usize,
        capture_mouse: bool,
    ) -> Result<Self, GlobeError> {
        let (cols, rows) = map_cells(width, height);
        let backend = TerminalBackend::new(cols, rows, capture_mouse);
        let home = CameraRig::new(
            Orientation::new(config.camera.azimuth, config.camera.elevation),
            config.camera.zoom,
        );

        let mut globe = Globe::with_rig(backend, config.textures.clone(), home.clone())?;
        globe.init()?;

        Ok(Self {
            globe,
            feed: DemoFeed::new(config.feed.clone()),
            should_quit: false,
            paused: false,
            max_blocks: config.feed.max_blocks,
            home,
            frame: 0,
        })
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (cols, rows) = map_cells(width, height);
        self.globe.resize(cols as u32, rows as u32);
    }

    /// One frame: spawn from the feed, then advance the globe.
    pub fn update(&mut self) {
        if !self.paused && self.feed.due(self.frame) {
            if self.globe.markers().len() >= self.max_blocks {
                info!(blocks = self.globe.markers().len(), "block limit reached, clearing globe");
                self.globe.remove_all_blocks();
            }
            let spec = self.feed.next_spec();
            self.globe.add_levitating_block(&spec);
        }

        self.globe.tick();
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn zoom_in(&mut self) {
        self.globe.zoom_relative(KEY_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.globe.zoom_relative(-KEY_ZOOM_STEP);
    }

    pub fn snap_zoom(&mut self) {
        self.globe.zoom_immediately_to(SNAP_ZOOM);
    }

    /// Ease back to the starting view.
    pub fn reset_view(&mut self) {
        self.globe
            .center(to_geo(self.home.orientation()))
            .zoom_to(self.home.zoom());
    }

    pub fn center_on_newest(&mut self) {
        if let Some(pos) = self.feed.last {
            self.globe.center(pos);
        }
    }

    pub fn clear_blocks(&mut self) {
        self.globe.remove_all_blocks();
    }

    pub fn toggle_feed(&mut self) {
        self.paused = !self.paused;
    }

    /// Drop a resting block where the camera is looking.
    pub fn pin_center(&mut self) {
        let center = self.center();
        let spec = BlockSpec::new(center.lat, center.lon, 3.0, "#ffffff");
        self.globe.add_block(&spec);
    }

    pub fn drag_start(&mut self, col: u16, row: u16) {
        let (x, y) = cell_to_pixel(col, row);
        self.globe.drag_start(x, y);
    }

    pub fn drag_move(&mut self, col: u16, row: u16) {
        let (x, y) = cell_to_pixel(col, row);
        self.globe.drag_move(x, y);
    }

    pub fn drag_end(&mut self) {
        self.globe.drag_end();
    }

    pub fn scroll_up(&mut self) {
        self.globe.scroll(ScrollDelta::WheelDelta(WHEEL_NOTCH));
    }

    pub fn scroll_down(&mut self) {
        self.globe.scroll(ScrollDelta::WheelDelta(-WHEEL_NOTCH));
    }

    /// Geographic point currently facing the camera.
    pub fn center(&self) -> GeoPosition {
        to_geo(self.globe.rig().orientation())
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.0}", self.globe.rig().zoom())
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        let c = self.center();
        format!(
            "{:.1}°{}, {:.1}°{}",
            c.lat.abs(),
            if c.lat >= 0.0 { "N" } else { "S" },
            c.lon.abs(),
            if c.lon >= 0.0 { "E" } else { "W" }
        )
    }

    pub fn block_counts(&self) -> String {
        format!(
            "{} blocks ({} rising, {} fed)",
            self.globe.markers().len(),
            self.globe.levitating_count(),
            self.feed.spawned
        )
    }

    pub fn feed_state(&self) -> &'static str {
        match (self.feed.is_enabled(), self.paused) {
            (false, _) => "off",
            (true, true) => "paused",
            (true, false) => "live",
        }
    }
}
