/// How `present` waits for the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapInterval {
    /// Present immediately, tearing allowed.
    Immediate,
    /// Wait for vertical blank.
    VSync,
}

/// Environment-level render settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Synchronize `present` with the display refresh.
    pub vsync: bool,
    /// Check the backend for errors after every call and report them.
    /// Forces vsync off so frame times reflect actual work.
    pub debug_graphics: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            debug_graphics: false,
        }
    }
}

impl RenderConfig {
    pub const VSYNC_VAR: &'static str = "DUSKFORGE_VSYNC";
    pub const DEBUG_GRAPHICS_VAR: &'static str = "DUSKFORGE_DEBUG_GRAPHICS";

    /// Read settings from `DUSKFORGE_VSYNC` and `DUSKFORGE_DEBUG_GRAPHICS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unset or
    /// unrecognized values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            vsync: lookup(Self::VSYNC_VAR)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.vsync),
            debug_graphics: lookup(Self::DEBUG_GRAPHICS_VAR)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.debug_graphics),
        }
    }

    pub fn swap_interval(&self) -> SwapInterval {
        if self.vsync && !self.debug_graphics {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
