use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use cross_xdg::BaseDirs;
use nu_ansi_term::Color;

use crate::theme::{self, mocha};

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "CODEXTER_CONFIG";

#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    /// One colour per opcode digit.
    pub opcodes: [Color; 10],
    pub pointer: Color,
    pub flag_on: Color,
    pub text: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            opcodes: theme::default_opcode_colors(),
            pointer: mocha::YELLOW,
            flag_on: mocha::GREEN,
            text: mocha::TEXT,
        }
    }
}

impl Colors {
    pub fn for_digit(&self, digit: u8) -> Color {
        self.opcodes[usize::from(digit.min(9))]
    }
}

/// Fallback execution limits; flags and environment variables win over these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Limits {
    pub timeout_ms: Option<u64>,
    pub max_steps: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub colors: Colors,
    pub limits: Limits,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| load_from_toml().unwrap_or_default())
}

fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        return None;
    }

    let name = s.to_ascii_lowercase();
    Some(match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "purple" | "magenta" => Color::Purple,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "darkgray" | "dark_gray" | "darkgrey" | "dark_grey" => Color::DarkGray,
        "lightred" | "light_red" => Color::LightRed,
        "lightgreen" | "light_green" => Color::LightGreen,
        "lightyellow" | "light_yellow" => Color::LightYellow,
        "lightblue" | "light_blue" => Color::LightBlue,
        "lightpurple" | "light_purple" | "lightmagenta" | "light_magenta" => Color::LightPurple,
        "lightcyan" | "light_cyan" => Color::LightCyan,
        "lightgray" | "light_gray" | "lightgrey" | "light_grey" => Color::LightGray,
        _ => return None,
    })
}

fn config_path() -> Option<PathBuf> {
    if let Ok(explicit) = env::var(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().into_iter().next()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("codexter.toml");
    Some(path)
}

fn load_from_toml() -> Option<Config> {
    let content = fs::read_to_string(config_path()?).ok()?;
    Some(parse_config(&content))
}

/// Parse the small TOML subset the config file uses: `[section]` headers,
/// `key = value` pairs with quoted or bare values, and `#` comment lines.
/// Unknown sections, keys and malformed values are ignored.
pub fn parse_config(content: &str) -> Config {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current = String::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            current = line[1..line.len() - 1].trim().to_string();
            continue;
        }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim().to_string();
            let val_raw = line[eq + 1..].trim();
            let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
                val_raw[1..val_raw.len() - 1].to_string()
            } else { val_raw.to_string() };
            sections.entry(current.clone()).or_default().insert(key, val);
        }
    }

    let mut cfg = Config::default();

    if let Some(colors) = sections.get("colors") {
        for (digit, slot) in cfg.colors.opcodes.iter_mut().enumerate() {
            if let Some(c) = colors.get(&format!("op_{digit}")).and_then(|s| parse_color(s)) {
                *slot = c;
            }
        }

        macro_rules! set {
            ($field:ident, $key:literal) => {
                if let Some(v) = colors.get($key).and_then(|s| parse_color(s)) { cfg.colors.$field = v; }
            };
        }

        set!(pointer, "pointer");
        set!(flag_on, "flag_on");
        set!(text, "text");
    }

    if let Some(limits) = sections.get("limits") {
        cfg.limits.timeout_ms = limits.get("timeout_ms").and_then(|s| s.parse().ok());
        cfg.limits.max_steps = limits.get("max_steps").and_then(|s| s.parse().ok());
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config(""), Config::default());
    }

    #[test]
    fn parses_colors_by_digit_and_name() {
        let cfg = parse_config(
            r##"
# colours
[colors]
op_9 = "#ff0000"
op_0 = gray
pointer = "light_cyan"
"##,
        );
        assert_eq!(cfg.colors.for_digit(9), Color::Rgb(255, 0, 0));
        assert_eq!(cfg.colors.for_digit(0), Color::DarkGray);
        assert_eq!(cfg.colors.pointer, Color::LightCyan);
        assert_eq!(cfg.colors.for_digit(1), mocha::GREEN);
    }

    #[test]
    fn bad_colors_keep_defaults() {
        let cfg = parse_config("[colors]\nop_1 = \"#12\"\nflag_on = chartreuse\n");
        assert_eq!(cfg.colors, Colors::default());
    }

    #[test]
    fn parses_limits() {
        let cfg = parse_config("[limits]\ntimeout_ms = 250\nmax_steps = \"1000\"\n");
        assert_eq!(cfg.limits.timeout_ms, Some(250));
        assert_eq!(cfg.limits.max_steps, Some(1000));
    }

    #[test]
    fn keys_outside_their_section_are_ignored() {
        let cfg = parse_config("max_steps = 5\n[colors]\ntimeout_ms = 9\n");
        assert_eq!(cfg.limits, Limits::default());
    }
}
