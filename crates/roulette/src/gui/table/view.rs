use super::{
    CELL_FONT_SIZE, HUB_RADIUS, POCKET_FONT_SIZE, RADIANT_LINES, SPINDLE_RADIUS, WheelMetrics,
};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use croupier::Snapshot;
use croupier::geometry::{Point, Rect};
use croupier::grid::{BetCategory, BetCell};
use croupier::ledger::Chips;
use croupier::wheel::{Label, Pocket};
use palette::Srgba;
use std::f64::consts::{FRAC_PI_2, TAU};

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn show_centered(cr: &Context, text: &str, x: f64, y: f64) -> Result<(), cairo::Error> {
    let ext = cr.text_extents(text)?;
    cr.move_to(
        x - ext.width() / 2.0 - ext.x_bearing(),
        y - ext.height() / 2.0 - ext.y_bearing(),
    );
    cr.show_text(text)
}

struct WheelRenderer<'a> {
    snapshot: &'a Snapshot<'a>,
    metrics: &'a WheelMetrics,
    colors: &'a ThemeColors,
}

impl<'a> WheelRenderer<'a> {
    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        let c = self.metrics.center;
        cr.save()?;
        cr.translate(c, c);
        self.draw_rim(cr)?;
        self.draw_pockets(cr)?;
        self.draw_hub(cr)?;
        self.draw_ball(cr)?;
        cr.restore()
    }

    fn draw_rim(&self, cr: &Context) -> Result<(), cairo::Error> {
        let m = self.metrics;
        let rim = m.outside_radius + 15.0 * m.scale();

        let gradient = cairo::RadialGradient::new(0.0, 0.0, m.outside_radius, 0.0, 0.0, rim);
        let (r, g, b, a) = self.colors.rim.into_components();
        gradient.add_color_stop_rgba(0.0, r, g, b, a);
        let (r, g, b, a) = self.colors.rim_shadow.into_components();
        gradient.add_color_stop_rgba(1.0, r, g, b, a);
        cr.set_source(&gradient)?;
        cr.arc(0.0, 0.0, rim, 0.0, TAU);
        cr.fill()?;

        set_source(cr, self.colors.black);
        cr.arc(0.0, 0.0, m.outside_radius + 2.0 * m.scale(), 0.0, TAU);
        cr.fill()
    }

    fn draw_pockets(&self, cr: &Context) -> Result<(), cairo::Error> {
        let m = self.metrics;
        let arc = self.snapshot.arc;

        for pocket in self.snapshot.pockets {
            let start = self.snapshot.wheel_angle + pocket.index as f64 * arc;
            set_source(cr, self.colors.pocket(pocket.color));
            cr.move_to(0.0, 0.0);
            cr.arc(0.0, 0.0, m.outside_radius, start, start + arc);
            cr.close_path();
            cr.fill_preserve()?;
            set_source(cr, self.colors.rim_shadow);
            cr.set_line_width(1.0);
            cr.stroke()?;
        }

        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(POCKET_FONT_SIZE * m.scale());
        set_source(cr, self.colors.line);
        for pocket in self.snapshot.pockets {
            self.draw_pocket_label(cr, pocket)?;
        }

        set_source(cr, self.colors.rim_shadow);
        cr.arc(0.0, 0.0, m.inside_radius, 0.0, TAU);
        cr.fill()
    }

    fn draw_pocket_label(&self, cr: &Context, pocket: &Pocket) -> Result<(), cairo::Error> {
        let angle = self.snapshot.wheel_angle + (pocket.index as f64 + 0.5) * self.snapshot.arc;
        cr.save()?;
        cr.rotate(angle);
        cr.translate(self.metrics.text_radius, 0.0);
        // read outward from the hub
        cr.rotate(FRAC_PI_2);
        show_centered(cr, pocket.label.as_str(), 0.0, 0.0)?;
        cr.restore()
    }

    fn draw_hub(&self, cr: &Context) -> Result<(), cairo::Error> {
        let m = self.metrics;
        let scale = m.scale();

        set_source(cr, self.colors.gold);
        cr.set_line_width(2.0 * scale);
        for i in 0..RADIANT_LINES {
            let angle = self.snapshot.wheel_angle + i as f64 * TAU / RADIANT_LINES as f64;
            cr.move_to(0.0, 0.0);
            cr.line_to(
                angle.cos() * m.inside_radius * 0.8,
                angle.sin() * m.inside_radius * 0.8,
            );
        }
        cr.stroke()?;

        set_source(cr, self.colors.hub);
        cr.arc(0.0, 0.0, HUB_RADIUS * scale, 0.0, TAU);
        cr.fill()?;
        set_source(cr, self.colors.gold);
        cr.arc(0.0, 0.0, SPINDLE_RADIUS * scale, 0.0, TAU);
        cr.fill()
    }

    fn draw_ball(&self, cr: &Context) -> Result<(), cairo::Error> {
        let Some(ball) = self.snapshot.ball else {
            return Ok(());
        };
        let distance = ball.radius * self.metrics.ball_track_radius;
        let (x, y) = (ball.angle.cos() * distance, ball.angle.sin() * distance);

        cr.arc(x, y, self.metrics.ball_size, 0.0, TAU);
        set_source(cr, self.colors.ball);
        cr.fill_preserve()?;
        cr.set_source_rgb(0.4, 0.4, 0.4);
        cr.set_line_width(1.0);
        cr.stroke()
    }
}

struct TableRenderer<'a> {
    snapshot: &'a Snapshot<'a>,
    origin: Point,
    colors: &'a ThemeColors,
}

impl<'a> TableRenderer<'a> {
    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        cr.save()?;
        cr.translate(self.origin.x, self.origin.y);

        set_source(cr, self.colors.felt);
        cr.paint()?;

        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        for cell in self.snapshot.cells {
            self.draw_cell(cr, cell)?;
        }
        for (cell, amount) in self.stacks() {
            self.draw_chip(cr, &cell.rect, amount)?;
        }
        cr.restore()
    }

    fn winning_label(&self) -> Option<&Label> {
        self.snapshot
            .last
            .filter(|_| self.snapshot.ball.is_some_and(|b| b.landed))
            .map(|s| &s.winning.label)
    }

    fn draw_cell(&self, cr: &Context, cell: &BetCell) -> Result<(), cairo::Error> {
        let r = cell.rect;
        cr.rectangle(r.x, r.y, r.w, r.h);
        set_source(cr, self.colors.pocket(cell.color));
        cr.fill_preserve()?;

        let highlighted = self.winning_label() == Some(&cell.label)
            && cell.category == BetCategory::Straight;
        if highlighted {
            set_source(cr, self.colors.gold);
            cr.set_line_width(3.0);
        } else {
            set_source(cr, self.colors.line);
            cr.set_line_width(1.0);
        }
        cr.stroke()?;

        // narrow cells get proportionally smaller text
        let size = CELL_FONT_SIZE * (r.w.min(r.h) / 53.0).clamp(0.6, 1.0);
        cr.set_font_size(size);
        set_source(cr, self.colors.line);
        let center = r.center();
        show_centered(cr, cell.label.as_str(), center.x, center.y)
    }

    /// Total stake per cell, in placement order of each cell's first bet.
    fn stacks(&self) -> Vec<(&'a BetCell, Chips)> {
        let mut stacks: Vec<(&BetCell, Chips)> = Vec::new();
        for bet in self.snapshot.bets {
            match stacks.iter_mut().find(|(cell, _)| **cell == bet.cell) {
                Some((_, total)) => *total += bet.amount,
                None => stacks.push((&bet.cell, bet.amount)),
            }
        }
        stacks
    }

    fn draw_chip(&self, cr: &Context, rect: &Rect, amount: Chips) -> Result<(), cairo::Error> {
        let center = rect.center();
        let radius = rect.w.min(rect.h) * 0.35;

        cr.arc(center.x, center.y, radius, 0.0, TAU);
        set_source(cr, self.colors.chip);
        cr.fill_preserve()?;
        set_source(cr, self.colors.chip_edge);
        cr.set_line_width(2.0);
        cr.stroke()?;

        cr.set_font_size(radius * 0.8);
        cr.set_source_rgb(0.0, 0.0, 0.0);
        show_centered(cr, &amount.to_string(), center.x, center.y)
    }
}

pub fn draw_wheel(
    cr: &Context,
    snapshot: &Snapshot,
    metrics: &WheelMetrics,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    WheelRenderer {
        snapshot,
        metrics,
        colors,
    }
    .draw(cr)
}

pub fn draw_table(
    cr: &Context,
    snapshot: &Snapshot,
    origin: Point,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    TableRenderer {
        snapshot,
        origin,
        colors,
    }
    .draw(cr)
}
