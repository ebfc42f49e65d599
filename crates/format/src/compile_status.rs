//! Per-scene export flags.

use bitflags::bitflags;

bitflags! {
    /// How a scene takes part in an export of the story.
    ///
    /// `INCLUDE` is the "include in export" switch; when it is clear the other flags carry no
    /// meaning. The title and break flags each come as an override bit plus a value bit, which is
    /// what the tri-state [`IncludeOptions`] accessors read and write.
    ///
    /// Stored in the header as a plain integer. Bits this version does not know about are kept so
    /// files written by newer editors survive a load/save cycle.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CompileStatus: u64 {
        const INCLUDE                = 0b0000_0000_0000_0001;
        const OVERRIDE_INCLUDE_TITLE = 0b0000_0000_0000_0010;
        const INCLUDE_TITLE          = 0b0000_0000_0000_0100;
        const OVERRIDE_BREAK_AT_END  = 0b0000_0000_0000_1000;
        const BREAK_AT_END           = 0b0000_0000_0001_0000;

        const _ = !0;
    }
}

impl Default for CompileStatus {
    fn default() -> Self {
        CompileStatus::INCLUDE
    }
}

/// Per-scene override of a project-wide export setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IncludeOptions {
    /// Follow the project setting.
    #[default]
    Default,
    Always,
    Never,
}

impl CompileStatus {
    /// Legacy headers store a bool: `true` means included with no overrides.
    pub fn from_legacy_bool(include: bool) -> Self {
        if include {
            CompileStatus::INCLUDE
        } else {
            CompileStatus::empty()
        }
    }

    pub fn include(&self) -> bool {
        self.contains(CompileStatus::INCLUDE)
    }

    pub fn set_include(&mut self, include: bool) {
        self.set(CompileStatus::INCLUDE, include);
    }

    pub fn include_title(&self) -> IncludeOptions {
        self.read_option(
            CompileStatus::OVERRIDE_INCLUDE_TITLE,
            CompileStatus::INCLUDE_TITLE,
        )
    }

    pub fn set_include_title(&mut self, options: IncludeOptions) {
        self.write_option(
            CompileStatus::OVERRIDE_INCLUDE_TITLE,
            CompileStatus::INCLUDE_TITLE,
            options,
        );
    }

    pub fn break_at_end(&self) -> IncludeOptions {
        self.read_option(
            CompileStatus::OVERRIDE_BREAK_AT_END,
            CompileStatus::BREAK_AT_END,
        )
    }

    pub fn set_break_at_end(&mut self, options: IncludeOptions) {
        self.write_option(
            CompileStatus::OVERRIDE_BREAK_AT_END,
            CompileStatus::BREAK_AT_END,
            options,
        );
    }

    fn read_option(&self, override_flag: Self, value_flag: Self) -> IncludeOptions {
        if !self.contains(override_flag) {
            IncludeOptions::Default
        } else if self.contains(value_flag) {
            IncludeOptions::Always
        } else {
            IncludeOptions::Never
        }
    }

    // Clearing the override leaves the value bit untouched, matching older files.
    fn write_option(&mut self, override_flag: Self, value_flag: Self, options: IncludeOptions) {
        match options {
            IncludeOptions::Default => self.set(override_flag, false),
            IncludeOptions::Always => {
                self.set(override_flag, true);
                self.set(value_flag, true);
            }
            IncludeOptions::Never => {
                self.set(override_flag, true);
                self.set(value_flag, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_included_without_overrides() {
        let status = CompileStatus::default();
        assert!(status.include());
        assert_eq!(status.bits(), 1);
        assert_eq!(status.include_title(), IncludeOptions::Default);
        assert_eq!(status.break_at_end(), IncludeOptions::Default);
    }

    #[test]
    fn legacy_bool_maps_to_include_flag() {
        assert_eq!(CompileStatus::from_legacy_bool(true), CompileStatus::INCLUDE);
        assert!(CompileStatus::from_legacy_bool(false).is_empty());
    }

    #[test]
    fn include_title_cycles_through_options() {
        let mut status = CompileStatus::default();

        status.set_include_title(IncludeOptions::Always);
        assert_eq!(status.include_title(), IncludeOptions::Always);
        assert_eq!(status.bits(), 0b0111);

        status.set_include_title(IncludeOptions::Never);
        assert_eq!(status.include_title(), IncludeOptions::Never);
        assert_eq!(status.bits(), 0b0011);

        status.set_include_title(IncludeOptions::Default);
        assert_eq!(status.include_title(), IncludeOptions::Default);
        assert_eq!(status.bits(), 0b0001);
    }

    #[test]
    fn break_at_end_is_independent_of_title() {
        let mut status = CompileStatus::default();
        status.set_include_title(IncludeOptions::Never);
        status.set_break_at_end(IncludeOptions::Always);

        assert_eq!(status.include_title(), IncludeOptions::Never);
        assert_eq!(status.break_at_end(), IncludeOptions::Always);
        assert!(status.include());
    }

    #[test]
    fn unknown_bits_are_retained() {
        let status = CompileStatus::from_bits_retain(0b1_0000_0000_0001);
        assert!(status.include());
        assert_eq!(status.bits(), 0b1_0000_0000_0001);

        let mut status = status;
        status.set_include(false);
        assert_eq!(status.bits(), 0b1_0000_0000_0000);
    }
}
