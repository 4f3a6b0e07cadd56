use tabbycat::attributes::Color;

pub const FONT: &str = "DejaVu Sans";
pub const FONTSIZE: f64 = 10.0; // pt
pub const SQUARE_HEIGHT: f64 = 0.15; // in
pub const CIRCLE_HEIGHT: f64 = 0.20; // in
pub const NODE_MARGIN: f64 = 0.025; // in

pub const Z_COLOR   : Color = Color::Rgb(115, 150, 250); // blue
pub const X_COLOR   : Color = Color::Rgb(230, 115, 125); // red
pub const H_COLOR   : Color = Color::Rgb(250, 205, 115); // yellow
pub const MBQC_COLOR: Color = Color::Rgb(170, 220, 170); // green
pub const BOX_COLOR : Color = Color::Rgb(220, 220, 220); // light gray
pub const H_WIRE    : Color = Color::Rgb(68,  136, 255); // lighter blue
pub const C_WIRE    : Color = Color::Rgb(128, 128, 128); // gray
pub const HIGHLIGHT : Color = Color::Rgb(205, 0,   0  ); // dark red
