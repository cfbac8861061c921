//! Catppuccin Mocha accents and the default colour for each opcode digit.
use nu_ansi_term::Color;

pub mod mocha {
    use nu_ansi_term::Color;

    pub const TEXT: Color = Color::Rgb(205, 214, 244);
    pub const OVERLAY0: Color = Color::Rgb(108, 112, 134);

    pub const RED: Color = Color::Rgb(243, 139, 168);
    pub const GREEN: Color = Color::Rgb(166, 227, 161);
    pub const YELLOW: Color = Color::Rgb(249, 226, 175);
    pub const BLUE: Color = Color::Rgb(137, 180, 250);
    pub const MAUVE: Color = Color::Rgb(203, 166, 247);
    pub const PEACH: Color = Color::Rgb(250, 179, 135);
    pub const TEAL: Color = Color::Rgb(148, 226, 213);
    pub const SKY: Color = Color::Rgb(137, 220, 235);
    pub const PINK: Color = Color::Rgb(245, 194, 231);
}

/// Default colours indexed by digit.
///
/// Arithmetic is green, bank traffic teal/sky, IO yellow, control flow
/// mauve/pink, and the no-op dims into the background.
pub fn default_opcode_colors() -> [Color; 10] {
    [
        mocha::OVERLAY0, // 0 NOP
        mocha::GREEN,    // 1 ADD
        mocha::YELLOW,   // 2 IO
        mocha::MAUVE,    // 3 JUMP
        mocha::TEAL,     // 4 PUSH
        mocha::SKY,      // 5 POP
        mocha::BLUE,     // 6 SKIP
        mocha::RED,      // 7 FLAG
        mocha::PEACH,    // 8 ROTATE
        mocha::PINK,     // 9 LOOP
    ]
}
