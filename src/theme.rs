use ratatui::style::Color;

/// One colour palette: page background, ink, and an accent used for
/// the cursor, progress bar, and history highlights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
}

pub const THEMES: &[Theme] = &[
    Theme {
        name: "white",
        bg: Color::Rgb(255, 255, 255),
        fg: Color::Rgb(0, 0, 0),
        accent: Color::Rgb(0, 0, 0),
    },
    Theme {
        name: "dark",
        bg: Color::Rgb(0x28, 0x2c, 0x34),
        fg: Color::Rgb(0xab, 0xb2, 0xbf),
        accent: Color::Rgb(0x61, 0xaf, 0xef),
    },
    Theme {
        name: "plum",
        bg: Color::Rgb(0x4a, 0x20, 0x40),
        fg: Color::Rgb(0xff, 0xff, 0xff),
        accent: Color::Rgb(0xff, 0xb8, 0x5f),
    },
    Theme {
        name: "parchment",
        bg: Color::Rgb(0xe8, 0xe8, 0xd3),
        fg: Color::Rgb(0x5a, 0x5a, 0x42),
        accent: Color::Rgb(0xa8, 0x9f, 0x91),
    },
    Theme {
        name: "rosewood",
        bg: Color::Rgb(0x7a, 0x1f, 0x3d),
        fg: Color::Rgb(0xf5, 0xc6, 0xd0),
        accent: Color::Rgb(0xf2, 0x8e, 0x8e),
    },
    Theme {
        name: "daybreak",
        bg: Color::Rgb(0xf9, 0xe4, 0xc8),
        fg: Color::Rgb(0x5d, 0xa9, 0xe9),
        accent: Color::Rgb(0xf4, 0xa2, 0x59),
    },
    Theme {
        name: "sage",
        bg: Color::Rgb(0xd9, 0xd9, 0xc3),
        fg: Color::Rgb(0x3c, 0x5a, 0x3e),
        accent: Color::Rgb(0x6b, 0x8e, 0x23),
    },
    Theme {
        name: "warm-red",
        bg: Color::Rgb(0x8b, 0x00, 0x00),
        fg: Color::Rgb(0xff, 0xd7, 0x00),
        accent: Color::Rgb(0xff, 0x63, 0x47),
    },
    Theme {
        name: "cool-blue",
        bg: Color::Rgb(0x1e, 0x3a, 0x5f),
        fg: Color::Rgb(0xa9, 0xd6, 0xe5),
        accent: Color::Rgb(0x46, 0x82, 0xb4),
    },
    Theme {
        name: "muted-purple",
        bg: Color::Rgb(0x5d, 0x3a, 0x9b),
        fg: Color::Rgb(0xd4, 0xc4, 0xfb),
        accent: Color::Rgb(0x93, 0x70, 0xdb),
    },
    Theme {
        name: "forest-green",
        bg: Color::Rgb(0x01, 0x32, 0x20),
        fg: Color::Rgb(0xa7, 0xc9, 0x57),
        accent: Color::Rgb(0x22, 0x8b, 0x22),
    },
    Theme {
        name: "earthy-brown",
        bg: Color::Rgb(0x4e, 0x34, 0x2e),
        fg: Color::Rgb(0xd7, 0xcc, 0xc8),
        accent: Color::Rgb(0x8b, 0x45, 0x13),
    },
];

pub fn by_name(name: &str) -> Option<usize> {
    THEMES.iter().position(|t| t.name == name)
}

pub fn next(index: usize) -> usize {
    (index + 1) % THEMES.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("white"), Some(0));
        assert_eq!(by_name("dark"), Some(1));
        assert_eq!(by_name("neon"), None);
    }

    #[test]
    fn names_are_unique() {
        for (i, a) in THEMES.iter().enumerate() {
            for b in &THEMES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn cycling_wraps_around() {
        let mut idx = 0;
        for _ in 0..THEMES.len() {
            idx = next(idx);
        }
        assert_eq!(idx, 0);
    }
}
