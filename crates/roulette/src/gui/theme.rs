use croupier::wheel::Color;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub felt: Srgba<f64>,
    pub red: Srgba<f64>,
    pub black: Srgba<f64>,
    pub green: Srgba<f64>,
    pub line: Srgba<f64>,
    pub rim: Srgba<f64>,
    pub rim_shadow: Srgba<f64>,
    pub hub: Srgba<f64>,
    pub gold: Srgba<f64>,
    pub chip: Srgba<f64>,
    pub chip_edge: Srgba<f64>,
    pub ball: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            felt: Self::lookup_color(context, "roulette_felt", rgb(0x0f, 0x67, 0x2e), None),
            red: Self::lookup_color(context, "roulette_red", rgb(0xc0, 0x1b, 0x1b), None),
            black: Self::lookup_color(context, "roulette_black", rgb(0x11, 0x11, 0x11), None),
            green: Self::lookup_color(context, "roulette_green", rgb(0x0a, 0x7d, 0x32), None),
            line: Self::lookup_color(context, "roulette_line", rgb(0xff, 0xff, 0xff), Some(0.9)),
            rim: Self::lookup_color(context, "roulette_rim", rgb(0xa8, 0x7b, 0x51), None),
            rim_shadow: Self::lookup_color(
                context,
                "roulette_rim_shadow",
                rgb(0x5e, 0x39, 0x1c),
                None,
            ),
            hub: Self::lookup_color(context, "roulette_hub", rgb(0x88, 0x88, 0x88), None),
            gold: Self::lookup_color(context, "roulette_gold", rgb(0xd4, 0xaf, 0x37), None),
            chip: Self::lookup_color(context, "roulette_chip", rgb(0xff, 0xd7, 0x00), None),
            chip_edge: Self::lookup_color(
                context,
                "roulette_chip_edge",
                rgb(0xb8, 0x86, 0x0b),
                None,
            ),
            ball: Self::lookup_color(context, "roulette_ball", rgb(0xff, 0xff, 0xff), None),
        }
    }

    pub fn pocket(&self, color: Color) -> Srgba<f64> {
        match color {
            Color::Red => self.red,
            Color::Black => self.black,
            Color::Green => self.green,
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Srgba<f64> {
    Srgba::new(r, g, b, 255).into_format()
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
@define-color roulette_felt #0f672e;
@define-color roulette_red #c01b1b;
@define-color roulette_black #111111;

.roulette-window {
    background-color: #0b4d22;
}
.roulette-status {
    color: white;
    font-weight: bold;
}
.roulette-stats label {
    color: #ffd700;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_scales_to_unit_range() {
        let (r, g, b, a) = rgb(0xff, 0x00, 0x33).into_components();
        assert_eq!((r, g, a), (1.0, 0.0, 1.0));
        assert!((b - 0.2).abs() < 1e-9);
    }
}
