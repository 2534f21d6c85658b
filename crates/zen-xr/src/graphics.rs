//! Graphics-side rules that do not need a live context: the EGL config
//! requirements and how GL debug output maps onto log severities.

use zen_common::Severity;

/// `GL_DEBUG_TYPE_*` classes reported by the debug-output callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMessageType {
    Error,
    DeprecatedBehavior,
    UndefinedBehavior,
    Portability,
    Performance,
    Other,
    Marker,
    PushGroup,
    PopGroup,
    Unknown(u32),
}

impl DebugMessageType {
    pub fn from_gl(raw: u32) -> Self {
        match raw {
            0x824C => Self::Error,
            0x824D => Self::DeprecatedBehavior,
            0x824E => Self::UndefinedBehavior,
            0x824F => Self::Portability,
            0x8250 => Self::Performance,
            0x8251 => Self::Other,
            0x8268 => Self::Marker,
            0x8269 => Self::PushGroup,
            0x826A => Self::PopGroup,
            other => Self::Unknown(other),
        }
    }

    /// Exactly one severity per message type.
    pub fn severity(self) -> Severity {
        match self {
            Self::Error | Self::UndefinedBehavior => Severity::Error,
            Self::DeprecatedBehavior => Severity::Warn,
            Self::Portability
            | Self::Performance
            | Self::Other
            | Self::Marker
            | Self::PushGroup
            | Self::PopGroup => Severity::Debug,
            Self::Unknown(_) => Severity::Error,
        }
    }

    /// Group push/pop messages are noise and are silenced at the source.
    pub fn silenced(self) -> bool {
        matches!(self, Self::PushGroup | Self::PopGroup)
    }
}

/// Attributes of one EGL framebuffer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigAttributes {
    pub renderable_es3: bool,
    pub window_surface: bool,
    pub pbuffer_surface: bool,
    pub red_size: i32,
    pub green_size: i32,
    pub blue_size: i32,
    pub alpha_size: i32,
    pub depth_size: i32,
    pub sample_buffers: i32,
    pub samples: i32,
}

impl ConfigAttributes {
    /// RGBA8, 24-bit depth, no multisampling, GLES 3 renderable, usable for
    /// both window and pbuffer surfaces.
    pub fn acceptable(&self) -> bool {
        self.renderable_es3
            && self.window_surface
            && self.pbuffer_surface
            && self.red_size == 8
            && self.green_size == 8
            && self.blue_size == 8
            && self.alpha_size == 8
            && self.depth_size == 24
            && self.sample_buffers == 0
            && self.samples == 0
    }
}

/// Index of the first acceptable configuration.
pub fn choose_config(configs: &[ConfigAttributes]) -> Option<usize> {
    configs.iter().position(ConfigAttributes::acceptable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba8_depth24() -> ConfigAttributes {
        ConfigAttributes {
            renderable_es3: true,
            window_surface: true,
            pbuffer_surface: true,
            red_size: 8,
            green_size: 8,
            blue_size: 8,
            alpha_size: 8,
            depth_size: 24,
            sample_buffers: 0,
            samples: 0,
        }
    }

    #[test]
    fn test_debug_types_map_to_one_severity() {
        assert_eq!(DebugMessageType::from_gl(0x824C).severity(), Severity::Error);
        assert_eq!(DebugMessageType::from_gl(0x824E).severity(), Severity::Error);
        assert_eq!(DebugMessageType::from_gl(0x824D).severity(), Severity::Warn);
        for raw in [0x824F, 0x8250, 0x8251, 0x8268, 0x8269, 0x826A] {
            assert_eq!(DebugMessageType::from_gl(raw).severity(), Severity::Debug, "{raw:#x}");
        }
        assert_eq!(DebugMessageType::from_gl(0x1234), DebugMessageType::Unknown(0x1234));
        assert_eq!(DebugMessageType::Unknown(0x1234).severity(), Severity::Error);
    }

    #[test]
    fn test_group_messages_silenced() {
        assert!(DebugMessageType::PushGroup.silenced());
        assert!(DebugMessageType::PopGroup.silenced());
        assert!(!DebugMessageType::Marker.silenced());
    }

    #[test]
    fn test_config_requirements() {
        assert!(rgba8_depth24().acceptable());
        assert!(!ConfigAttributes { samples: 4, sample_buffers: 1, ..rgba8_depth24() }.acceptable());
        assert!(!ConfigAttributes { depth_size: 16, ..rgba8_depth24() }.acceptable());
        assert!(!ConfigAttributes { pbuffer_surface: false, ..rgba8_depth24() }.acceptable());
        assert!(!ConfigAttributes { renderable_es3: false, ..rgba8_depth24() }.acceptable());
    }

    #[test]
    fn test_choose_first_acceptable_config() {
        let rgb565 = ConfigAttributes { red_size: 5, green_size: 6, blue_size: 5, alpha_size: 0, ..rgba8_depth24() };
        assert_eq!(choose_config(&[rgb565, rgba8_depth24(), rgba8_depth24()]), Some(1));
        assert_eq!(choose_config(&[rgb565]), None);
    }
}
