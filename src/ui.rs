use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};
use tui_globe::braille::BrailleCanvas;
use tui_globe::term::TerminalFrame;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Globe
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_globe(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_globe(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Globe ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(GlobeWidget { frame: app.globe.backend().frame() }, inner);
}

/// Draws the layers of the last rendered globe frame.
struct GlobeWidget<'a> {
    frame: &'a TerminalFrame,
}

/// Copy a Braille layer into the buffer. Cells with their own tint keep it.
fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    let rows = canvas.height().min(area.height as usize);
    let cols = canvas.width().min(area.width as usize);
    for row in 0..rows {
        for col in 0..cols {
            let Some((ch, tint)) = canvas.cell(col, row) else {
                continue;
            };
            if ch == '\u{2800}' {
                continue;
            }
            let x = area.x + col as u16;
            let y = area.y + row as u16;
            buf[(x, y)].set_char(ch).set_fg(tint.unwrap_or(color));
        }
    }
}

impl Widget for GlobeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let f = self.frame;
        // Back to front
        render_layer(&f.atmosphere, Color::Rgb(70, 110, 70), area, buf);
        render_layer(&f.limb, Color::Blue, area, buf);
        render_layer(&f.coast_dark, Color::DarkGray, area, buf);
        render_layer(&f.coast_lit, Color::Green, area, buf);
        render_layer(&f.water, Color::Cyan, area, buf);
        render_layer(&f.borders, Color::Yellow, area, buf);
        render_layer(&f.blocks, Color::White, area, buf);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let feed_color = match app.feed_state() {
        "live" => Color::Green,
        "paused" => Color::Yellow,
        _ => Color::DarkGray,
    };

    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.block_counts(), Style::default().fg(Color::Magenta)),
        Span::styled(" feed:", Style::default().fg(Color::DarkGray)),
        Span::styled(app.feed_state(), Style::default().fg(feed_color)),
        Span::styled(
            " | drag:rotate +/-:zoom 0:snap c:newest s:pin x:clear space:feed q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_globe::config::GlobeConfig;

    #[test]
    fn test_widget_draws_globe() {
        let mut app = App::new(&GlobeConfig::default(), 62, 33, false).expect("globe");
        app.update();

        let area = Rect::new(0, 0, 60, 30);
        let mut buf = Buffer::empty(area);
        GlobeWidget { frame: app.globe.backend().frame() }.render(area, &mut buf);

        let drawn = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .filter(|&(x, y)| buf[(x, y)].symbol() != " ")
            .count();
        assert!(drawn > 0);
    }
}
