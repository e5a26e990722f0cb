use crate::color::Rgb;
use crate::theme::ThemeMode;

/// Concrete colours for one theme mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub accent: Rgb,
    pub accent_secondary: Rgb,
    pub error: Rgb,
    pub skin: Rgb,
    pub shirt: Rgb,
    pub trousers: Rgb,
    pub eyes: Rgb,
    pub particle: Rgb,
    pub wireframe: Rgb,
}

impl Palette {
    pub const DARK: Palette = Palette {
        background: Rgb::new(0x0f, 0x17, 0x2a),
        text: Rgb::new(0xe2, 0xe8, 0xf0),
        muted: Rgb::new(0x94, 0xa3, 0xb8),
        accent: Rgb::new(0x3b, 0x82, 0xf6),
        accent_secondary: Rgb::new(0x8b, 0x5c, 0xf6),
        error: Rgb::new(0xf8, 0x71, 0x71),
        skin: Rgb::new(0xfb, 0xbf, 0x24),
        shirt: Rgb::new(0x3b, 0x82, 0xf6),
        trousers: Rgb::new(0x1f, 0x29, 0x37),
        eyes: Rgb::new(0x1f, 0x29, 0x37),
        particle: Rgb::new(0x06, 0xb6, 0xd4),
        wireframe: Rgb::WHITE,
    };

    pub const LIGHT: Palette = Palette {
        background: Rgb::new(0xf8, 0xfa, 0xfc),
        text: Rgb::new(0x1e, 0x29, 0x3b),
        muted: Rgb::new(0x64, 0x74, 0x8b),
        accent: Rgb::new(0x25, 0x63, 0xeb),
        accent_secondary: Rgb::new(0x7c, 0x3a, 0xed),
        error: Rgb::new(0xdc, 0x26, 0x26),
        skin: Rgb::new(0xf5, 0x9e, 0x0b),
        shirt: Rgb::new(0x25, 0x63, 0xeb),
        trousers: Rgb::new(0x33, 0x41, 0x55),
        eyes: Rgb::new(0x11, 0x18, 0x27),
        particle: Rgb::new(0x08, 0x91, 0xb2),
        wireframe: Rgb::new(0x1e, 0x29, 0x3b),
    };

    pub fn for_mode(mode: ThemeMode) -> Palette {
        match mode {
            ThemeMode::Dark => Palette::DARK,
            ThemeMode::Light => Palette::LIGHT,
        }
    }
}
