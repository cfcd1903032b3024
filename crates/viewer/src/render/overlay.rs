//! Overlay rendering: header, info panel, orbital figures and the scale slider.

use glam::Vec2;
use renderer::OverlayTextBuilder;
use shipmind::HabitatInfo;

use crate::scale::{group_thousands, OrbitalStats, ScaleRatio};

const MARGIN: f32 = 24.0;
const PADDING: f32 = 14.0;

const TITLE_SCALE: f32 = 4.0;
const HEADING_SCALE: f32 = 2.0;
const BODY_SCALE: f32 = 1.5;
const SMALL_SCALE: f32 = 1.25;

const PANEL_MAX_WIDTH: f32 = 400.0;
const FOOTER_MAX_WIDTH: f32 = 460.0;
const FOOTER_HEIGHT: f32 = 100.0;
const SLIDER_OFFSET_Y: f32 = 46.0;
const SLIDER_HEIGHT: f32 = 8.0;
/// Extra pixels around the bar that still count as grabbing it.
const SLIDER_GRAB_SLOP: f32 = 10.0;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const LIGHT: [f32; 4] = [0.85, 0.87, 0.9, 1.0];
const GRAY: [f32; 4] = [0.6, 0.63, 0.68, 1.0];
const DIM: [f32; 4] = [0.42, 0.45, 0.5, 1.0];
const EMERALD: [f32; 4] = [0.2, 0.83, 0.6, 1.0];
const SKY: [f32; 4] = [0.38, 0.65, 0.98, 1.0];
const HINT_BLUE: [f32; 4] = [0.75, 0.86, 1.0, 1.0];
const PANEL_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
const FOOTER_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
const HINT_BG: [f32; 4] = [0.12, 0.23, 0.54, 0.25];
const BUTTON_BG: [f32; 4] = [0.06, 0.73, 0.5, 0.25];
const TRACK: [f32; 4] = [0.22, 0.25, 0.32, 1.0];

const INTRO: &str = "Vavatch is a massive Orbital structure from the Culture series. Unlike a Ringworld \
which encircles a star, an Orbital is a smaller ring orbiting a star like a planet.";
const QUOTE: &str = "\"God, it was big...\" - Horza";
const QUERY_HINT: &str = "Press Q to retrieve a detailed analysis from the fleet database.";

/// Everything the HUD shows for one frame.
pub struct Hud<'a> {
    pub ratio: ScaleRatio,
    pub show_panel: bool,
    pub loading: bool,
    pub info: Option<&'a HabitatInfo>,
    pub stats: OrbitalStats,
    pub fps: f32,
}

/// Screen rectangle of the scale slider's bar, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SliderLayout {
    pub fn for_screen(sw: f32, sh: f32) -> Self {
        let (fx, fy, fw) = footer_rect(sw, sh);
        Self {
            x: fx + PADDING,
            y: fy + SLIDER_OFFSET_Y,
            width: (fw - PADDING * 2.0).max(1.0),
            height: SLIDER_HEIGHT,
        }
    }

    /// Whether a press at `point` grabs the slider.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x - SLIDER_GRAB_SLOP
            && point.x <= self.x + self.width + SLIDER_GRAB_SLOP
            && point.y >= self.y - SLIDER_GRAB_SLOP
            && point.y <= self.y + self.height + SLIDER_GRAB_SLOP
    }

    /// Ratio under cursor x, quantised and clamped.
    pub fn ratio_at(&self, x: f32) -> ScaleRatio {
        ScaleRatio::from_value((x - self.x) / self.width)
    }
}

/// Footer box: (x, y, width).
fn footer_rect(sw: f32, sh: f32) -> (f32, f32, f32) {
    let width = FOOTER_MAX_WIDTH.min(sw - MARGIN * 2.0).max(160.0);
    (MARGIN, sh - MARGIN - FOOTER_HEIGHT, width)
}

/// Greedy word wrap to at most `max_chars` per line. Longer words are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct Line {
    text: String,
    scale: f32,
    color: [f32; 4],
    gap_after: f32,
}

impl Line {
    fn new(text: impl Into<String>, scale: f32, color: [f32; 4]) -> Self {
        Self { text: text.into(), scale, color, gap_after: 3.0 }
    }

    fn gap(mut self, gap: f32) -> Self {
        self.gap_after = gap;
        self
    }

    fn height(&self) -> f32 {
        OverlayTextBuilder::line_height(self.scale) + self.gap_after
    }
}

fn push_wrapped(lines: &mut Vec<Line>, text: &str, prefix: &str, max_chars: usize, scale: f32, color: [f32; 4]) {
    let indent = " ".repeat(prefix.chars().count());
    let wrapped = wrap_text(text, max_chars.saturating_sub(prefix.len()).max(1));
    for (i, part) in wrapped.into_iter().enumerate() {
        let lead = if i == 0 { prefix } else { indent.as_str() };
        lines.push(Line::new(format!("{}{}", lead, part), scale, color));
    }
}

/// Build the screen-space overlay for one frame.
pub fn build(hud: &Hud, sw: f32, sh: f32) -> OverlayTextBuilder {
    let mut tb = OverlayTextBuilder::new(sw, sh);

    // Header
    tb.add_text(MARGIN, MARGIN, "VAVATCH ORBITAL", TITLE_SCALE, SKY);
    tb.add_text(
        MARGIN,
        MARGIN + OverlayTextBuilder::line_height(TITLE_SCALE) + 8.0,
        "Consider Phlebas Visualization",
        BODY_SCALE,
        GRAY,
    );
    let toggle = if hud.show_panel { "[I] Hide info" } else { "[I] Show info" };
    let toggle_w = OverlayTextBuilder::text_width(toggle, SMALL_SCALE);
    tb.add_text_with_bg(sw - MARGIN - toggle_w, MARGIN, toggle, SMALL_SCALE, LIGHT, [1.0, 1.0, 1.0, 0.1]);

    if hud.show_panel {
        build_panel(&mut tb, hud, sw);
    }
    build_footer(&mut tb, hud, sw, sh);

    let fps = format!("{:.0} fps", hud.fps);
    let fps_w = OverlayTextBuilder::text_width(&fps, SMALL_SCALE);
    tb.add_text(
        sw - MARGIN - fps_w,
        sh - MARGIN - OverlayTextBuilder::line_height(SMALL_SCALE),
        &fps,
        SMALL_SCALE,
        DIM,
    );

    tb
}

fn build_panel(tb: &mut OverlayTextBuilder, hud: &Hud, sw: f32) {
    let panel_w = PANEL_MAX_WIDTH.min(sw * 0.45).max(160.0);
    let panel_x = sw - MARGIN - panel_w;
    let panel_y = MARGIN + 72.0;
    let inner_w = panel_w - PADDING * 2.0;
    let body_chars = (inner_w / OverlayTextBuilder::text_width("M", BODY_SCALE)) as usize;
    let small_chars = (inner_w / OverlayTextBuilder::text_width("M", SMALL_SCALE)) as usize;

    let mut lines = Vec::new();
    let mut hint_range = None;
    match hud.info {
        None => {
            push_wrapped(&mut lines, INTRO, "", body_chars, BODY_SCALE, LIGHT);
            if let Some(last) = lines.last_mut() {
                last.gap_after = 10.0;
            }
            lines.push(Line::new(QUOTE, SMALL_SCALE, DIM).gap(12.0));
            let start = lines.len();
            push_wrapped(&mut lines, QUERY_HINT, "", small_chars, SMALL_SCALE, HINT_BLUE);
            hint_range = Some((start, lines.len()));
        }
        Some(info) => {
            push_wrapped(&mut lines, &info.description, "", body_chars, BODY_SCALE, LIGHT);
            if let Some(last) = lines.last_mut() {
                last.gap_after = 12.0;
            }
            lines.push(Line::new("KEY METRICS", SMALL_SCALE, GRAY).gap(6.0));
            for fact in &info.facts {
                push_wrapped(&mut lines, fact, "* ", small_chars, SMALL_SCALE, LIGHT);
                if let Some(last) = lines.last_mut() {
                    last.gap_after = 5.0;
                }
            }
        }
    }
    if let Some(last) = lines.last_mut() {
        last.gap_after = 16.0;
    }

    let stats = &hud.stats;
    lines.push(Line::new("TRUE-SCALE FIGURES", SMALL_SCALE, GRAY).gap(6.0));
    for (name, value) in [
        ("Circumference", format!("{} km", group_thousands(stats.circumference_km))),
        ("Diameter", format!("{} km", group_thousands(stats.diameter_km))),
        ("Plate width", format!("{} km", group_thousands(stats.plate_width_km))),
        (
            "Spin for 1 g",
            format!("{:.1} h ({:.0} km/s)", stats.spin_period_hours, stats.rim_speed_km_s),
        ),
    ] {
        lines.push(Line::new(format!("{:<14}{}", name, value), SMALL_SCALE, LIGHT));
    }

    let heading_h = OverlayTextBuilder::line_height(HEADING_SCALE) + 14.0;
    let body_h: f32 = lines.iter().map(Line::height).sum();
    tb.add_rect(panel_x, panel_y, panel_w, PADDING * 2.0 + heading_h + body_h, PANEL_BG);

    // Heading row with the query trigger on the right
    tb.add_text(panel_x + PADDING, panel_y + PADDING, "Orbital Data", HEADING_SCALE, EMERALD);
    let button = if hud.loading { "Querying..." } else { "Query Ship Mind [Q]" };
    let button_w = OverlayTextBuilder::text_width(button, SMALL_SCALE) + 4.0 * SMALL_SCALE;
    let button_color = if hud.loading { GRAY } else { EMERALD };
    tb.add_text_with_bg(
        panel_x + panel_w - PADDING - button_w,
        panel_y + PADDING,
        button,
        SMALL_SCALE,
        button_color,
        BUTTON_BG,
    );

    let mut y = panel_y + PADDING + heading_h;
    if let Some((start, end)) = hint_range {
        let top = y + lines[..start].iter().map(Line::height).sum::<f32>() - 4.0;
        let height = lines[start..end].iter().map(Line::height).sum::<f32>() - 8.0;
        tb.add_rect(panel_x + PADDING - 4.0, top, inner_w + 8.0, height, HINT_BG);
    }
    for line in &lines {
        tb.add_text(panel_x + PADDING, y, &line.text, line.scale, line.color);
        y += line.height();
    }
}

fn build_footer(tb: &mut OverlayTextBuilder, hud: &Hud, sw: f32, sh: f32) {
    let (fx, fy, fw) = footer_rect(sw, sh);
    tb.add_rect(fx, fy, fw, FOOTER_HEIGHT, FOOTER_BG);

    tb.add_text(fx + PADDING, fy + PADDING, "Scale Comparison", HEADING_SCALE, LIGHT);
    let label = hud.ratio.label();
    let label_w = OverlayTextBuilder::text_width(&label, SMALL_SCALE);
    tb.add_text(fx + fw - PADDING - label_w, fy + PADDING + 3.0, &label, SMALL_SCALE, EMERALD);

    let slider = SliderLayout::for_screen(sw, sh);
    let fraction = hud.ratio.value();
    tb.add_bar(slider.x, slider.y, slider.width, slider.height, fraction, TRACK, EMERALD);
    let knob_x = slider.x + slider.width * fraction;
    tb.add_rect(knob_x - 3.0, slider.y - 5.0, 6.0, slider.height + 10.0, WHITE);

    let ends_y = slider.y + slider.height + 14.0;
    tb.add_text(slider.x, ends_y, "VISIBLE", SMALL_SCALE, DIM);
    let true_w = OverlayTextBuilder::text_width("TRUE SCALE", SMALL_SCALE);
    tb.add_text(slider.x + slider.width - true_w, ends_y, "TRUE SCALE", SMALL_SCALE, DIM);

    let radius = format!("R = {:.1}", hud.ratio.ring_radius());
    let radius_w = OverlayTextBuilder::text_width(&radius, SMALL_SCALE);
    tb.add_text(fx + (fw - radius_w) * 0.5, ends_y, &radius, SMALL_SCALE, GRAY);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hud(info: Option<&HabitatInfo>, show_panel: bool, loading: bool) -> Hud<'_> {
        Hud {
            ratio: ScaleRatio::from_value(0.3),
            show_panel,
            loading,
            info,
            stats: OrbitalStats::true_scale(1.5),
            fps: 60.0,
        }
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn wrap_splits_long_words() {
        let lines = wrap_text("a supercalifragilistic b", 8);
        assert_eq!(lines, vec!["a", "supercal", "ifragili", "stic b"]);
    }

    #[test]
    fn wrap_empty_text() {
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn slider_maps_cursor_to_ratio() {
        let slider = SliderLayout::for_screen(1280.0, 720.0);
        assert_eq!(slider.ratio_at(slider.x), ScaleRatio::VISIBLE);
        assert_eq!(slider.ratio_at(slider.x + slider.width), ScaleRatio::TRUE);
        assert_eq!(slider.ratio_at(slider.x - 50.0), ScaleRatio::VISIBLE);
        assert_eq!(slider.ratio_at(slider.x + slider.width * 0.5).steps(), 50);
    }

    #[test]
    fn slider_hit_test() {
        let slider = SliderLayout::for_screen(1280.0, 720.0);
        let centre = Vec2::new(slider.x + slider.width * 0.5, slider.y + slider.height * 0.5);
        assert!(slider.contains(centre));
        assert!(!slider.contains(Vec2::new(640.0, 100.0)));
        assert!(slider.y + slider.height < 720.0);
    }

    #[test]
    fn hidden_panel_draws_less() {
        let shown = build(&hud(None, true, false), 1280.0, 720.0);
        let hidden = build(&hud(None, false, false), 1280.0, 720.0);
        assert!(hidden.vertices.len() < shown.vertices.len());
        assert_eq!(shown.indices.len() / 6, shown.vertices.len() / 4);
    }

    #[test]
    fn answer_replaces_intro() {
        let info = HabitatInfo {
            description: "Short.".into(),
            facts: vec!["A".into(), "B".into(), "C".into()],
        };
        let intro = build(&hud(None, true, false), 1280.0, 720.0);
        let answered = build(&hud(Some(&info), true, false), 1280.0, 720.0);
        assert_ne!(intro.vertices.len(), answered.vertices.len());
    }

    #[test]
    fn tiny_window_still_builds() {
        let tb = build(&hud(None, true, true), 1.0, 1.0);
        assert!(!tb.vertices.is_empty());
    }
}
